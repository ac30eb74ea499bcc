//! Damage and death systems.

use bevy::prelude::*;

use crate::combat::{DamageDealt, PendingDamage, UnitDied, UnitRetired};
use crate::components::{InSimulation, Unit};
use crate::config::SimulationConfig;

/// Система: применить отложенный урон
///
/// 1. Забираем все DamageRequest в порядке постановки
/// 2. `Unit::damage` (health -= amount, смерть при health ≤ 0)
/// 3. Генерируем DamageDealt и UnitDied события
pub fn apply_pending_damage(
    mut pending: ResMut<PendingDamage>,
    mut units: Query<&mut Unit, With<InSimulation>>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut unit_died_events: EventWriter<UnitDied>,
) {
    for request in pending.take() {
        let Ok(mut unit) = units.get_mut(request.target) else {
            crate::logger::log_warning(&format!(
                "Damage: target {:?} is not a live unit, {} damage dropped",
                request.target, request.amount
            ));
            continue;
        };

        let outcome = unit.damage(request.amount);
        if !outcome.applied {
            continue;
        }

        damage_dealt_events.write(DamageDealt {
            target: request.target,
            amount: request.amount,
            health_before: outcome.health_before,
            health_after: outcome.health_after,
            target_died: outcome.killed,
        });

        if outcome.killed {
            unit_died_events.write(UnitDied {
                entity: request.target,
                team: unit.team(),
            });

            crate::logger::log_info(&format!(
                "💀 Unit {:?} ({}) killed: health {} → {}",
                request.target,
                unit.type_id(),
                outcome.health_before,
                outcome.health_after
            ));
        }
    }
}

/// Система: убрать мёртвых из live-группы
///
/// Снимает InSimulation (entity остаётся, despawn: ответственность внешнего кода).
/// Ловит и юнитов, убитых напрямую через `set_dead(true)`.
pub fn retire_dead_units(
    mut commands: Commands,
    units: Query<(Entity, &Unit), With<InSimulation>>,
    config: Res<SimulationConfig>,
    mut retired_events: EventWriter<UnitRetired>,
) {
    if !config.retire_dead {
        return;
    }

    for (entity, unit) in units.iter() {
        if !unit.is_dead() {
            continue;
        }

        commands.entity(entity).remove::<InSimulation>();
        retired_events.write(UnitRetired { entity });

        crate::logger::log(&format!("⚰️ Unit {:?} retired from simulation", entity));
    }
}

/// Система: вернуть в live-группу юнитов, оживлённых через `Unit::set_dead(false)`
///
/// Выполняется первой в тике (до урона и команд), так что оживлённый юнит
/// получает урон, команды и цель уже в этом тике.
pub fn restore_revived_units(
    mut commands: Commands,
    units: Query<(Entity, &Unit), Without<InSimulation>>,
) {
    for (entity, unit) in units.iter() {
        if unit.is_dead() {
            continue;
        }

        commands.entity(entity).insert(InSimulation);

        crate::logger::log(&format!("Unit {:?} revived, back in simulation", entity));
    }
}
