//! FSM systems: применение отложенных команд.

use bevy::prelude::*;

use crate::ai::{StateChanged, Transition};
use crate::command::{dispatch, CommandTarget, PendingCommands, UnitCommand};
use crate::components::{InSimulation, Unit};

/// Система: dispatch отложенных команд
///
/// Команды применяются в порядке постановки. Team-команда уходит всем live юнитам команды
/// (по возрастанию Entity).
/// Dead юниты игнорируют команды сами (см. BehaviorMachine::on_command).
pub fn dispatch_pending_commands(
    mut pending: ResMut<PendingCommands>,
    mut units: Query<(Entity, &mut Unit), With<InSimulation>>,
    mut state_events: EventWriter<StateChanged>,
) {
    for request in pending.take() {
        match request.target {
            CommandTarget::Unit(target) => {
                let Ok((entity, mut unit)) = units.get_mut(target) else {
                    crate::logger::log_warning(&format!(
                        "Command {}: target {:?} is not a live unit",
                        request.command, target
                    ));
                    continue;
                };

                apply_command(entity, &mut unit, request.command, &mut state_events);
            }

            CommandTarget::Team(team) => {
                // Порядок событий по Entity, как в `SimulationContext::command_team`
                let mut members: Vec<(Entity, Mut<Unit>)> = units
                    .iter_mut()
                    .filter(|(_, unit)| unit.team() == team)
                    .collect();
                members.sort_by_key(|(entity, _)| *entity);

                for (entity, mut unit) in members {
                    apply_command(entity, &mut unit, request.command, &mut state_events);
                }
            }
        }
    }
}

fn apply_command(
    entity: Entity,
    unit: &mut Unit,
    command: UnitCommand,
    state_events: &mut EventWriter<StateChanged>,
) {
    if let Transition::Changed { from, to } = dispatch(unit, command) {
        state_events.write(StateChanged {
            entity,
            from,
            to,
            command,
        });
    }
}
