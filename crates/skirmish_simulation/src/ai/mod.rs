//! AI decision-making module
//!
//! Behavior FSM юнита: Attack / Retreat / Rally / Shooting / Dead.
//! Переходы: команды (command layer), урон (Dead), target validity (derived Shooting).

use bevy::prelude::*;

use crate::TickSet;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{BehaviorMachine, Transition, UnitState};
pub use events::StateChanged;

/// Behavior Plugin
///
/// Регистрирует dispatch команд в UnitTick (TickSet::Commands):
/// после урона (умершие в этом тике уже Dead и команду игнорируют),
/// до target acquisition.
pub struct BehaviorPlugin;

impl Plugin for BehaviorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StateChanged>()
            .init_resource::<crate::command::PendingCommands>()
            .add_systems(
                crate::UnitTick,
                systems::dispatch_pending_commands.in_set(TickSet::Commands),
            );
    }
}
