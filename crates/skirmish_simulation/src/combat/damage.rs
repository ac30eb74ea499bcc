//! Damage pipeline: очередь урона и события
//!
//! Внешние источники урона (сеть, снаряды) не трогают Health напрямую:
//! ставят `DamageRequest` в очередь, `apply_pending_damage` применяет на границе тика.

use bevy::prelude::*;

use crate::components::Team;

/// Событие: урон применён
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: f32,
    pub health_before: f32,
    pub health_after: f32,
    pub target_died: bool,
}

/// Событие: юнит умер от урона (health ≤ 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct UnitDied {
    pub entity: Entity,
    pub team: Team,
}

/// Событие: мёртвый юнит убран из live-группы
#[derive(Event, Debug, Clone, PartialEq)]
pub struct UnitRetired {
    pub entity: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Очередь урона (single writer на тик)
#[derive(Resource, Debug, Default)]
pub struct PendingDamage {
    requests: Vec<DamageRequest>,
}

impl PendingDamage {
    pub fn push(&mut self, target: Entity, amount: f32) {
        self.requests.push(DamageRequest { target, amount });
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

    pub fn take(&mut self) -> Vec<DamageRequest> {
        std::mem::take(&mut self.requests)
    }
}
