//! Behavior FSM: состояния юнита и правила переходов.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::command::UnitCommand;

/// Тактическое состояние юнита (ровно одно активно)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitState {
    /// Attack: начальное состояние по умолчанию
    #[default]
    Attack,

    /// Retreat: отход по команде
    Retreat,

    /// Rally: сбор по команде
    Rally,

    /// Shooting: только явное присваивание, командой не выставляется.
    /// "Стреляет ли юнит": отдельный derived факт (`Unit::is_shooting`).
    Shooting,

    /// Dead: терминальное состояние, команды игнорируются
    Dead,
}

impl UnitState {
    pub const ALL: [UnitState; 5] = [
        UnitState::Attack,
        UnitState::Retreat,
        UnitState::Rally,
        UnitState::Shooting,
        UnitState::Dead,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnitState::Attack => "attack",
            UnitState::Retreat => "retreat",
            UnitState::Rally => "rally",
            UnitState::Shooting => "shooting",
            UnitState::Dead => "dead",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == UnitState::Dead
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Результат запроса на переход
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed { from: UnitState, to: UnitState },
    /// Self-transition: запрошено текущее состояние
    Unchanged(UnitState),
    /// Юнит в Dead, запрос отброшен
    Ignored(UnitState),
}

impl Transition {
    pub fn is_changed(&self) -> bool {
        matches!(self, Transition::Changed { .. })
    }

    /// Состояние после перехода
    pub fn state(&self) -> UnitState {
        match *self {
            Transition::Changed { to, .. } => to,
            Transition::Unchanged(state) | Transition::Ignored(state) => state,
        }
    }
}

/// Конечный автомат поведения
///
/// Инвариант: Dead: терминальное; выйти можно только через `revive`.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorMachine {
    current: UnitState,
    start: UnitState,
}

impl Default for BehaviorMachine {
    fn default() -> Self {
        Self::new(UnitState::default())
    }
}

impl BehaviorMachine {
    pub fn new(start: UnitState) -> Self {
        Self {
            current: start,
            start,
        }
    }

    pub fn current(&self) -> UnitState {
        self.current
    }

    pub fn start_state(&self) -> UnitState {
        self.start
    }

    pub fn is(&self, state: UnitState) -> bool {
        self.current == state
    }

    pub fn is_dead(&self) -> bool {
        self.current.is_terminal()
    }

    /// Явное присваивание состояния (setState)
    pub fn set(&mut self, state: UnitState) -> Transition {
        if self.is_dead() {
            return if state.is_terminal() {
                Transition::Unchanged(self.current)
            } else {
                Transition::Ignored(self.current)
            };
        }

        if self.current == state {
            return Transition::Unchanged(state);
        }

        let from = self.current;
        self.current = state;
        Transition::Changed { from, to: state }
    }

    /// onCommand: любое не-Dead состояние → одноимённое команде.
    /// Переход определяется командой, а не текущим состоянием.
    pub fn on_command(&mut self, command: UnitCommand) -> Transition {
        if self.is_dead() {
            return Transition::Ignored(self.current);
        }
        self.set(command.target_state())
    }

    pub fn kill(&mut self) -> Transition {
        self.set(UnitState::Dead)
    }

    /// Dead → start state (respawn). Для живого юнита ничего не делает.
    pub fn revive(&mut self) -> Transition {
        if !self.is_dead() {
            return Transition::Unchanged(self.current);
        }

        let to = if self.start.is_terminal() {
            UnitState::default()
        } else {
            self.start
        };
        self.current = to;
        Transition::Changed {
            from: UnitState::Dead,
            to,
        }
    }
}
