//! Базовые компоненты юнитов: Team, Health, Unit

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ai::{BehaviorMachine, Transition, UnitState};
use crate::command::UnitCommand;
use crate::content::{BodyStats, UnitTypeId, WeaponSpec};
use crate::context::SimulationContext;

/// Команда (сторона конфликта)
///
/// Opaque identifier: сравнивается только на равенство.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team(pub u8);

impl Team {
    pub const DERELICT: Team = Team(0);
    pub const SHARDED: Team = Team(1);
    pub const CRUX: Team = Team(2);
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Team::DERELICT => write!(f, "derelict"),
            Team::SHARDED => write!(f, "sharded"),
            Team::CRUX => write!(f, "crux"),
            Team(id) => write!(f, "team#{}", id),
        }
    }
}

/// Здоровье юнита
///
/// Свободный signed scalar: `damage` всегда вычитает, без clamp снизу и сверху.
/// Отрицательный damage лечит (в том числе выше `max`), overkill уводит в минус.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn get(&self) -> f32 {
        self.current
    }

    /// Прямое присваивание. NaN/inf отбрасываются, возвращает `false`.
    pub fn set(&mut self, value: f32) -> bool {
        if !value.is_finite() {
            crate::logger::log_warning(&format!("Health: rejected non-finite value {}", value));
            return false;
        }

        self.current = value;
        true
    }

    /// `current -= amount` для любого конечного amount.
    ///
    /// NaN/inf отбрасываются, возвращает `false`.
    pub fn damage(&mut self, amount: f32) -> bool {
        if !amount.is_finite() {
            crate::logger::log_warning(&format!(
                "Health: rejected non-finite damage amount {}",
                amount
            ));
            return false;
        }

        // Переполнение f32 насыщается до ±MAX, health остаётся конечным
        self.current = (self.current - amount).clamp(f32::MIN, f32::MAX);
        true
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// current / max (для логов и UI, может быть < 0 и > 1)
    pub fn fraction(&self) -> f32 {
        if self.max == 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

/// Результат одного вызова `Unit::damage`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub applied: bool,
    pub health_before: f32,
    pub health_after: f32,
    /// Этот damage перевёл юнит в Dead
    pub killed: bool,
}

/// Наземный боевой юнит
///
/// Композиция: Health + BehaviorMachine + позиция + копия статов из UnitType.
/// Создаётся через `UnitType::create(team)` (detached), в симуляцию попадает через `add`.
#[derive(Component, Debug, Clone)]
pub struct Unit {
    type_id: UnitTypeId,
    team: Team,
    position: Vec2,
    health: Health,
    body: BodyStats,
    weapon: WeaponSpec,
    behavior: BehaviorMachine,
    /// Цель из последнего тика (Some → юнит стреляет)
    target: Option<Entity>,
}

impl Unit {
    pub(crate) fn new(
        type_id: UnitTypeId,
        team: Team,
        health: Health,
        body: BodyStats,
        weapon: WeaponSpec,
        start_state: UnitState,
    ) -> Self {
        Self {
            type_id,
            team,
            position: Vec2::ZERO,
            health,
            body,
            weapon,
            behavior: BehaviorMachine::new(start_state),
            target: None,
        }
    }

    pub fn type_id(&self) -> &UnitTypeId {
        &self.type_id
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn body(&self) -> &BodyStats {
        &self.body
    }

    pub fn weapon(&self) -> &WeaponSpec {
        &self.weapon
    }

    // --- Health ---

    pub fn health(&self) -> f32 {
        self.health.get()
    }

    pub fn max_health(&self) -> f32 {
        self.health.max
    }

    /// Прямое присваивание, смерть НЕ выводится. Non-finite value игнорируется.
    pub fn set_health(&mut self, value: f32) -> bool {
        self.health.set(value)
    }

    /// Применить урон. Если health ≤ 0 после урона: юнит переходит в Dead.
    pub fn damage(&mut self, amount: f32) -> DamageOutcome {
        let health_before = self.health.get();
        let applied = self.health.damage(amount);

        let killed = applied && self.health.is_depleted() && !self.behavior.is_dead();
        if killed {
            self.behavior.kill();
            self.target = None;
        }

        DamageOutcome {
            applied,
            health_before,
            health_after: self.health.get(),
            killed,
        }
    }

    // --- Behavior ---

    pub fn state(&self) -> UnitState {
        self.behavior.current()
    }

    pub fn is(&self, state: UnitState) -> bool {
        self.behavior.is(state)
    }

    pub fn behavior(&self) -> &BehaviorMachine {
        &self.behavior
    }

    pub fn set_state(&mut self, state: UnitState) -> Transition {
        let transition = self.behavior.set(state);
        if self.behavior.is_dead() {
            self.target = None;
        }
        transition
    }

    pub fn on_command(&mut self, command: UnitCommand) -> Transition {
        self.behavior.on_command(command)
    }

    pub fn is_dead(&self) -> bool {
        self.behavior.is_dead()
    }

    /// `true`: kill без урона, `false`: revive в start state
    pub fn set_dead(&mut self, dead: bool) -> Transition {
        if dead {
            self.target = None;
            self.behavior.kill()
        } else {
            self.behavior.revive()
        }
    }

    // --- Position / targeting ---

    pub fn set(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Derived Shooting: есть валидная цель (независимо от commanded state)
    pub fn is_shooting(&self) -> bool {
        self.target.is_some()
    }

    pub(crate) fn set_target(&mut self, target: Option<Entity>) {
        self.target = target;
    }

    /// Регистрирует юнит в live-группе симуляции
    pub fn add(self, ctx: &mut SimulationContext) -> Entity {
        ctx.add(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin;

    fn dagger() -> Unit {
        builtin::dagger().create(Team::DERELICT)
    }

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(130.0);
        assert_eq!(health.get(), 130.0);

        assert!(health.damage(30.0));
        assert_eq!(health.get(), 100.0);
        assert!(!health.is_depleted());

        health.damage(150.0); // Без saturating: уходим в минус
        assert_eq!(health.get(), -50.0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_health_negative_damage_overheals() {
        let mut health = Health::new(100.0);
        health.damage(-25.0);
        assert_eq!(health.get(), 125.0); // Не clamp к max
        assert_eq!(health.max, 100.0);
    }

    #[test]
    fn test_health_rejects_non_finite() {
        let mut health = Health::new(100.0);
        assert!(!health.damage(f32::NAN));
        assert!(!health.damage(f32::INFINITY));
        assert!(!health.damage(f32::NEG_INFINITY));
        assert_eq!(health.get(), 100.0);
    }

    #[test]
    fn test_health_saturates_on_overflow() {
        let mut health = Health::new(100.0);
        health.damage(f32::MAX);
        health.damage(f32::MAX);
        assert!(health.get().is_finite());
        assert_eq!(health.get(), f32::MIN);
        assert!(health.is_depleted());

        health.damage(-f32::MAX);
        health.damage(-f32::MAX);
        health.damage(-f32::MAX);
        assert_eq!(health.get(), f32::MAX);
    }

    #[test]
    fn test_health_set_rejects_non_finite() {
        let mut health = Health::new(100.0);
        assert!(!health.set(f32::NAN));
        assert!(!health.set(f32::NEG_INFINITY));
        assert_eq!(health.get(), 100.0);
        assert!(health.set(-5.0));
        assert_eq!(health.get(), -5.0);
    }

    #[test]
    fn test_unit_with_rejected_nan_health_can_still_die() {
        let mut unit = dagger();
        assert!(!unit.set_health(f32::NAN));
        assert_eq!(unit.health(), 130.0);

        assert!(unit.damage(130.0).killed);
    }

    #[test]
    fn test_health_fraction() {
        let mut health = Health::new(200.0);
        health.set(50.0);
        assert_eq!(health.fraction(), 0.25);

        let zero = Health::new(0.0);
        assert_eq!(zero.fraction(), 0.0);
    }

    #[test]
    fn test_unit_damage_kills_at_zero() {
        let mut unit = dagger();
        unit.set_health(130.0);

        let outcome = unit.damage(130.0);
        assert_eq!(outcome.health_after, 0.0);
        assert!(outcome.killed);
        assert!(unit.is_dead());
        assert!(unit.is(UnitState::Dead));
    }

    #[test]
    fn test_unit_damage_on_dead_unit_keeps_subtracting() {
        let mut unit = dagger();
        unit.set_health(10.0);
        assert!(unit.damage(20.0).killed);

        let outcome = unit.damage(5.0);
        assert!(!outcome.killed); // Уже мёртв, повторно не убиваем
        assert_eq!(unit.health(), -15.0);
    }

    #[test]
    fn test_set_health_does_not_kill() {
        let mut unit = dagger();
        unit.set_health(-5.0);
        assert!(!unit.is_dead());

        // Первый же damage (даже нулевой) выводит смерть
        assert!(unit.damage(0.0).killed);
    }

    #[test]
    fn test_set_dead_and_revive() {
        let mut unit = dagger();
        unit.set_state(UnitState::Rally);

        assert!(unit.set_dead(true).is_changed());
        assert!(unit.is_dead());

        unit.set_dead(false);
        assert!(!unit.is_dead());
        assert_eq!(unit.state(), unit.behavior().start_state());
    }

    #[test]
    fn test_team_display() {
        assert_eq!(Team::DERELICT.to_string(), "derelict");
        assert_eq!(Team(9).to_string(), "team#9");
        assert_ne!(Team::DERELICT, Team::SHARDED);
    }
}
