//! Command dispatch: внешние команды (игрок / AI командир) → переходы FSM
//!
//! Dispatch по identity команды. Позиционный доступ (`UnitCommand::ALL[i]`,
//! `from_index`): удобство для внешнего кода, в сам dispatch не входит.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ai::{Transition, UnitState};
use crate::components::{Team, Unit};

/// Закрытый набор команд. Порядок объявления = канонический порядок `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCommand {
    Attack,
    Retreat,
    Rally,
}

/// Неизвестная команда: ошибка вызывающего кода (fail fast)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("command index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown command `{0}`")]
    Unknown(String),
}

impl UnitCommand {
    pub const ALL: [UnitCommand; 3] = [UnitCommand::Attack, UnitCommand::Retreat, UnitCommand::Rally];

    pub fn from_index(index: usize) -> Result<Self, CommandError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CommandError::IndexOutOfRange {
                index,
                len: Self::ALL.len(),
            })
    }

    pub fn index(self) -> usize {
        match self {
            UnitCommand::Attack => 0,
            UnitCommand::Retreat => 1,
            UnitCommand::Rally => 2,
        }
    }

    /// Одноимённое состояние (таблица переходов не зависит от текущего)
    pub fn target_state(self) -> UnitState {
        match self {
            UnitCommand::Attack => UnitState::Attack,
            UnitCommand::Retreat => UnitState::Retreat,
            UnitCommand::Rally => UnitState::Rally,
        }
    }

    pub fn name(self) -> &'static str {
        self.target_state().name()
    }
}

impl fmt::Display for UnitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CommandError::Unknown(s.to_string()))
    }
}

impl TryFrom<usize> for UnitCommand {
    type Error = CommandError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

/// Применить команду к юниту. Фильтрации нет: Dead юнит сам игнорирует.
pub fn dispatch(unit: &mut Unit, command: UnitCommand) -> Transition {
    let transition = unit.on_command(command);

    match transition {
        Transition::Changed { from, to } => crate::logger::log(&format!(
            "Command {}: {} → {} ({} team)",
            command,
            from,
            to,
            unit.team()
        )),
        Transition::Ignored(state) => crate::logger::log(&format!(
            "Command {} ignored: unit is {}",
            command, state
        )),
        Transition::Unchanged(_) => {}
    }

    transition
}

/// Кому адресована отложенная команда
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTarget {
    Unit(Entity),
    /// Все live юниты команды (command center)
    Team(Team),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRequest {
    pub target: CommandTarget,
    pub command: UnitCommand,
}

/// Очередь команд, применяется на границе тика (`dispatch_pending_commands`)
#[derive(Resource, Debug, Default)]
pub struct PendingCommands {
    requests: Vec<CommandRequest>,
}

impl PendingCommands {
    pub fn push(&mut self, target: CommandTarget, command: UnitCommand) {
        self.requests.push(CommandRequest { target, command });
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// Забирает все запросы в порядке постановки
    pub fn take(&mut self) -> Vec<CommandRequest> {
        std::mem::take(&mut self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin;

    #[test]
    fn test_canonical_order() {
        assert_eq!(UnitCommand::ALL[0], UnitCommand::Attack);
        assert_eq!(UnitCommand::ALL[1], UnitCommand::Retreat);
        assert_eq!(UnitCommand::ALL[2], UnitCommand::Rally);

        for (index, command) in UnitCommand::ALL.into_iter().enumerate() {
            assert_eq!(command.index(), index);
            assert_eq!(UnitCommand::from_index(index), Ok(command));
        }
    }

    #[test]
    fn test_from_index_out_of_range() {
        assert_eq!(
            UnitCommand::from_index(3),
            Err(CommandError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(UnitCommand::try_from(usize::MAX).is_err());
    }

    #[test]
    fn test_parse_by_name() {
        assert_eq!("attack".parse::<UnitCommand>(), Ok(UnitCommand::Attack));
        assert_eq!(" Rally ".parse::<UnitCommand>(), Ok(UnitCommand::Rally));
        assert_eq!(
            "shooting".parse::<UnitCommand>(),
            Err(CommandError::Unknown("shooting".to_string()))
        );
        assert_eq!(
            "dead".parse::<UnitCommand>(),
            Err(CommandError::Unknown("dead".to_string()))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CommandError::IndexOutOfRange { index: 7, len: 3 }.to_string(),
            "command index 7 out of range (0..3)"
        );
        assert_eq!(
            CommandError::Unknown("charge".into()).to_string(),
            "unknown command `charge`"
        );
    }

    #[test]
    fn test_dispatch_moves_unit() {
        let mut unit = builtin::dagger().create(Team::DERELICT);
        unit.set_state(UnitState::Attack);

        let transition = dispatch(&mut unit, UnitCommand::Retreat);
        assert!(transition.is_changed());
        assert!(unit.is(UnitState::Retreat));
        assert!(!unit.is(UnitState::Attack));
        assert!(!unit.is(UnitState::Rally));
    }

    #[test]
    fn test_dispatch_to_dead_unit_is_ignored() {
        let mut unit = builtin::dagger().create(Team::DERELICT);
        unit.set_dead(true);

        assert_eq!(
            dispatch(&mut unit, UnitCommand::Attack),
            Transition::Ignored(UnitState::Dead)
        );
        assert!(unit.is_dead());
    }

    #[test]
    fn test_pending_commands_take_preserves_order() {
        let mut pending = PendingCommands::default();
        pending.push(CommandTarget::Team(Team::SHARDED), UnitCommand::Rally);
        pending.push(CommandTarget::Team(Team::CRUX), UnitCommand::Retreat);
        assert_eq!(pending.len(), 2);

        let taken = pending.take();
        assert!(pending.is_empty());
        assert_eq!(taken[0].command, UnitCommand::Rally);
        assert_eq!(taken[1].target, CommandTarget::Team(Team::CRUX));
    }
}
