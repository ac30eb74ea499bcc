//! Combat module: урон, смерть, target validity
//!
//! ECS ответственность:
//! - Health правила (free-running signed scalar)
//! - Target validity oracle (team + range)
//! - Events: DamageDealt, UnitDied, UnitRetired
//!
//! Баллистика, cooldown оружия, коллизии: вне этого модуля (внешние коллабораторы).

use bevy::prelude::*;

use crate::TickSet;

pub mod damage;
pub mod systems;
pub mod targeting;

// Re-export основных типов
pub use damage::{DamageDealt, DamageRequest, PendingDamage, UnitDied, UnitRetired};
pub use targeting::{
    find_target, invalidate_target, invalidate_target_at, within_range, TargetProbe, Targetable,
};

/// Combat Plugin
///
/// Регистрирует combat системы в UnitTick.
///
/// Порядок выполнения (через TickSet):
/// 1. restore_revived_units: оживлённые возвращаются в live-группу
/// 2. apply_pending_damage: очередь урона → Health, смерть
/// 3. acquire_targets: derived Shooting
/// 4. retire_dead_units: мёртвые покидают live-группу
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий и очередей
        app.add_event::<DamageDealt>()
            .add_event::<UnitDied>()
            .add_event::<UnitRetired>()
            .init_resource::<PendingDamage>();

        app.add_systems(
            crate::UnitTick,
            (systems::restore_revived_units, systems::apply_pending_damage)
                .chain()
                .in_set(TickSet::Damage),
        )
            .add_systems(crate::UnitTick, systems::acquire_targets.in_set(TickSet::Targeting))
            .add_systems(crate::UnitTick, systems::retire_dead_units.in_set(TickSet::Cleanup));
    }
}
