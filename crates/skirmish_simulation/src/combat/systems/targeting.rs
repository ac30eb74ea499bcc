//! Target acquisition system (derived Shooting).

use bevy::prelude::*;

use crate::combat::targeting::{find_target, TargetProbe};
use crate::components::{InSimulation, Unit};

/// Система: обновить цель каждого live юнита
///
/// Shooting: derived факт: юнит стреляет, если у него есть валидная цель
/// (вражеская команда, в радиусе оружия), независимо от commanded state.
/// Кандидаты берутся из снимка в начале системы, чтобы порядок обхода не влиял на результат.
pub fn acquire_targets(mut units: Query<(Entity, &mut Unit), With<InSimulation>>) {
    let probes: Vec<TargetProbe> = units
        .iter()
        .map(|(entity, unit)| TargetProbe::of(entity, unit))
        .collect();

    for (entity, mut unit) in units.iter_mut() {
        let target = if unit.is_dead() {
            None
        } else {
            find_target(entity, &*unit, &probes)
        };

        if unit.target() == target {
            continue;
        }

        match target {
            Some(found) => crate::logger::log(&format!(
                "🎯 Unit {:?} ({}) acquired target {:?}",
                entity,
                unit.team(),
                found
            )),
            None => crate::logger::log(&format!("Unit {:?} lost its target", entity)),
        }

        unit.set_target(target);
    }
}
