//! AI Events: изменения behavior state

use bevy::prelude::*;

use crate::ai::UnitState;
use crate::command::UnitCommand;

/// Событие: FSM юнита сменил состояние по команде
///
/// Генерируется только для `Transition::Changed` (self-transition и Dead не дают события).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct StateChanged {
    pub entity: Entity,
    pub from: UnitState,
    pub to: UnitState,
    pub command: UnitCommand,
}
