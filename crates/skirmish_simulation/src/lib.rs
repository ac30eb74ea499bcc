//! Skirmish Simulation Core
//!
//! Behavior engine наземного боевого юнита на Bevy ECS:
//! - Health model (free-running signed health)
//! - Target validity oracle (team + weapon range)
//! - Behavior FSM (Attack / Retreat / Rally / Shooting / Dead)
//! - Command dispatch (внешний command layer → переходы FSM)
//!
//! Мир, карта, сеть, рендер, баллистика, pathfinding: внешние коллабораторы.
//! Single-threaded tick: все изменения применяются внутри `UnitTick` по порядку `TickSet`.

use bevy::ecs::schedule::{ExecutorKind, ScheduleLabel};
use bevy::prelude::*;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod command;
pub mod components;
pub mod config;
pub mod content;
pub mod context;
pub mod logger;

// Re-export базовых типов для удобства
pub use ai::{BehaviorMachine, BehaviorPlugin, StateChanged, Transition, UnitState};
pub use combat::{
    invalidate_target, invalidate_target_at, CombatPlugin, DamageDealt, Targetable, UnitDied,
    UnitRetired,
};
pub use command::{dispatch, CommandError, UnitCommand};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use content::{builtin, ContentError, UnitType, UnitTypeId, UnitTypeRegistry};
pub use context::{SimulationContext, SimulationError};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel};

/// Schedule одного тика симуляции (запускается из `SimulationContext::tick`)
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitTick;

/// Фазы тика (строго последовательно)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Очередь урона → Health, смерть
    Damage,
    /// Очередь команд → FSM
    Commands,
    /// Target acquisition (derived Shooting)
    Targeting,
    /// Мёртвые покидают live-группу
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_schedule(UnitTick)
            .edit_schedule(UnitTick, |schedule| {
                // Single writer на тик: без параллельного executor
                schedule.set_executor_kind(ExecutorKind::SingleThreaded);
            })
            .configure_sets(
                UnitTick,
                (
                    TickSet::Damage,
                    TickSet::Commands,
                    TickSet::Targeting,
                    TickSet::Cleanup,
                )
                    .chain(),
            )
            .init_resource::<TickClock>()
            .init_resource::<SimulationConfig>()
            .init_resource::<UnitTypeRegistry>()
            // Подсистемы
            .add_plugins((CombatPlugin, BehaviorPlugin));
    }
}
