//! SimulationContext: явный контекст симуляции вместо глобальных синглтонов
//!
//! Владеет Bevy App (World + UnitTick schedule), реестром типов и live-группой.
//! `reset()` переинициализирует только этот контекст.

use bevy::ecs::event::Events;
use bevy::prelude::*;
use thiserror::Error;

use crate::ai::{StateChanged, Transition};
use crate::combat::{find_target, DamageDealt, PendingDamage, TargetProbe, UnitDied, UnitRetired};
use crate::command::{dispatch, CommandError, CommandTarget, PendingCommands, UnitCommand};
use crate::components::{InSimulation, Team, TickClock, Unit};
use crate::config::SimulationConfig;
use crate::content::{ContentError, UnitType, UnitTypeRegistry};
use crate::{SimulationPlugin, UnitTick};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("entity {0:?} is not a unit")]
    UnknownUnit(Entity),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

pub struct SimulationContext {
    app: App,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl SimulationContext {
    pub fn new(config: SimulationConfig) -> Self {
        crate::logger::init_logger();
        crate::logger::set_log_level(config.log_level);

        let mut app = App::new();
        app.insert_resource(config)
            .insert_resource(UnitTypeRegistry::with_builtins())
            .add_plugins(SimulationPlugin);

        Self { app }
    }

    pub fn config(&self) -> &SimulationConfig {
        self.app.world().resource::<SimulationConfig>()
    }

    pub fn clock(&self) -> TickClock {
        *self.app.world().resource::<TickClock>()
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    // --- Content ---

    pub fn registry(&self) -> &UnitTypeRegistry {
        self.app.world().resource::<UnitTypeRegistry>()
    }

    pub fn register_unit_type(&mut self, unit_type: UnitType) -> Result<(), SimulationError> {
        self.app
            .world_mut()
            .resource_mut::<UnitTypeRegistry>()
            .register(unit_type)?;
        Ok(())
    }

    pub fn load_unit_types(&mut self, source: &str) -> Result<usize, SimulationError> {
        let loaded = self
            .app
            .world_mut()
            .resource_mut::<UnitTypeRegistry>()
            .load_ron(source)?;
        Ok(loaded)
    }

    // --- Units ---

    /// Factory: detached юнит из зарегистрированного типа
    pub fn create(&self, type_id: &str, team: Team) -> Result<Unit, SimulationError> {
        Ok(self.registry().get(type_id)?.create(team))
    }

    /// Регистрация юнита в live-группе
    pub fn add(&mut self, unit: Unit) -> Entity {
        let description = format!("{} ({} team) at {}", unit.type_id(), unit.team(), unit.position());
        let entity = self.app.world_mut().spawn((unit, InSimulation)).id();

        crate::logger::log(&format!("Unit {:?} added: {}", entity, description));
        entity
    }

    /// create + set(x, y) + add
    pub fn spawn(&mut self, type_id: &str, team: Team, x: f32, y: f32) -> Result<Entity, SimulationError> {
        let mut unit = self.create(type_id, team)?;
        unit.set(x, y);
        Ok(self.add(unit))
    }

    pub fn unit(&self, id: Entity) -> Option<&Unit> {
        self.app.world().get::<Unit>(id)
    }

    pub fn unit_mut(&mut self, id: Entity) -> Option<Mut<'_, Unit>> {
        self.app.world_mut().get_mut::<Unit>(id)
    }

    pub fn is_live(&self, id: Entity) -> bool {
        self.app.world().get::<InSimulation>(id).is_some()
    }

    /// Live юниты, отсортированы по Entity
    pub fn live_units(&mut self) -> Vec<Entity> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<Entity, (With<Unit>, With<InSimulation>)>();
        let mut entities: Vec<Entity> = query.iter(world).collect();
        entities.sort();
        entities
    }

    fn live_probes(&mut self) -> Vec<TargetProbe> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<(Entity, &Unit), With<InSimulation>>();
        let mut probes: Vec<TargetProbe> = query
            .iter(world)
            .map(|(entity, unit)| TargetProbe::of(entity, unit))
            .collect();
        probes.sort_by_key(|probe| probe.entity);
        probes
    }

    /// Kill / revive по id. Оживлённый юнит сразу возвращается в live-группу
    /// (без ожидания `restore_revived_units` в следующем тике).
    pub fn set_dead(&mut self, id: Entity, dead: bool) -> Result<Transition, SimulationError> {
        let world = self.app.world_mut();
        let mut entity = world.get_entity_mut(id).map_err(|_| SimulationError::UnknownUnit(id))?;
        let (transition, alive) = {
            let mut unit = entity.get_mut::<Unit>().ok_or(SimulationError::UnknownUnit(id))?;
            let transition = unit.set_dead(dead);
            (transition, !unit.is_dead())
        };

        if alive && !entity.contains::<InSimulation>() {
            entity.insert(InSimulation);
            crate::logger::log(&format!("Unit {:?} revived, back in simulation", id));
        }
        Ok(transition)
    }

    /// On-demand target query против текущей live-группы (без ожидания тика)
    pub fn find_target(&mut self, id: Entity) -> Result<Option<Entity>, SimulationError> {
        let probes = self.live_probes();
        let actor = self.unit(id).ok_or(SimulationError::UnknownUnit(id))?;

        if actor.is_dead() {
            return Ok(None);
        }
        Ok(find_target(id, actor, &probes))
    }

    pub fn is_shooting(&mut self, id: Entity) -> Result<bool, SimulationError> {
        Ok(self.find_target(id)?.is_some())
    }

    // --- Commands ---

    /// Немедленный dispatch (вне тика)
    pub fn on_command(&mut self, id: Entity, command: UnitCommand) -> Result<Transition, SimulationError> {
        let mut unit = self.unit_mut(id).ok_or(SimulationError::UnknownUnit(id))?;
        Ok(dispatch(&mut unit, command))
    }

    /// Dispatch по позиции в `UnitCommand::ALL` (индекс из внешнего command layer)
    pub fn on_command_index(&mut self, id: Entity, index: usize) -> Result<Transition, SimulationError> {
        let command = UnitCommand::from_index(index)?;
        self.on_command(id, command)
    }

    /// Немедленный dispatch всем live юнитам команды
    pub fn command_team(&mut self, team: Team, command: UnitCommand) -> Vec<(Entity, Transition)> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<(Entity, &mut Unit), With<InSimulation>>();

        let mut results: Vec<(Entity, Transition)> = query
            .iter_mut(world)
            .filter(|(_, unit)| unit.team() == team)
            .map(|(entity, mut unit)| (entity, dispatch(&mut unit, command)))
            .collect();
        results.sort_by_key(|(entity, _)| *entity);
        results
    }

    // --- Tick-boundary queues ---

    pub fn queue_damage(&mut self, id: Entity, amount: f32) {
        self.app.world_mut().resource_mut::<PendingDamage>().push(id, amount);
    }

    pub fn queue_command(&mut self, id: Entity, command: UnitCommand) {
        self.app
            .world_mut()
            .resource_mut::<PendingCommands>()
            .push(CommandTarget::Unit(id), command);
    }

    pub fn queue_team_command(&mut self, team: Team, command: UnitCommand) {
        self.app
            .world_mut()
            .resource_mut::<PendingCommands>()
            .push(CommandTarget::Team(team), command);
    }

    // --- Tick ---

    /// Один тик симуляции: damage → commands → targeting → cleanup
    pub fn tick(&mut self, delta: f32) {
        let world = self.app.world_mut();

        // События живут два тика (как в Bevy): старше: отбрасываются
        rotate_events(world);

        world.resource_mut::<TickClock>().advance(delta);
        world.run_schedule(UnitTick);
    }

    /// Тик с delta из конфига
    pub fn step(&mut self) {
        let delta = self.config().fixed_delta();
        self.tick(delta);
    }

    pub fn drain_events<E: Event>(&mut self) -> Vec<E> {
        self.app
            .world_mut()
            .get_resource_mut::<Events<E>>()
            .map(|mut events| events.drain().collect())
            .unwrap_or_default()
    }

    /// Сброс симуляции: все юниты, очереди, события и clock.
    /// Реестр типов и конфиг сохраняются.
    pub fn reset(&mut self) {
        let world = self.app.world_mut();

        world.clear_entities();
        world.resource_mut::<PendingDamage>().clear();
        world.resource_mut::<PendingCommands>().clear();
        *world.resource_mut::<TickClock>() = TickClock::default();

        self.drain_events::<DamageDealt>();
        self.drain_events::<UnitDied>();
        self.drain_events::<UnitRetired>();
        self.drain_events::<StateChanged>();

        crate::logger::log_info("Simulation context reset");
    }
}

fn rotate_events(world: &mut World) {
    world.resource_mut::<Events<DamageDealt>>().update();
    world.resource_mut::<Events<UnitDied>>().update();
    world.resource_mut::<Events<UnitRetired>>().update();
    world.resource_mut::<Events<StateChanged>>().update();
}
