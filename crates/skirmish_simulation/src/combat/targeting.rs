//! Target validity oracle
//!
//! Кандидат: легальная цель (invalidate → false) тогда и только тогда, когда:
//! - команда кандидата отличается от команды актора
//! - расстояние до кандидата ≤ range (граница включительно)
//!
//! Две формы вызова: live юнит против live юнита (range из оружия актора)
//! и юнит против явного кортежа (team, x, y, range). При совпадающих данных дают одинаковый ответ.

use bevy::prelude::*;

use crate::components::{Team, Unit};

/// Spatial/team query seam: всё, что oracle знает о кандидате
pub trait Targetable {
    fn team(&self) -> Team;
    fn position(&self) -> Vec2;

    /// Дальность оружия (0 для объектов без оружия)
    fn range(&self) -> f32 {
        0.0
    }

    fn is_alive(&self) -> bool {
        true
    }
}

impl Targetable for Unit {
    fn team(&self) -> Team {
        Unit::team(self)
    }

    fn position(&self) -> Vec2 {
        Unit::position(self)
    }

    fn range(&self) -> f32 {
        self.weapon().range
    }

    fn is_alive(&self) -> bool {
        !self.is_dead()
    }
}

/// Снимок кандидата (для систем, где нельзя держать borrow на Unit)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetProbe {
    pub entity: Entity,
    pub team: Team,
    pub position: Vec2,
    pub range: f32,
    pub alive: bool,
}

impl TargetProbe {
    pub fn of(entity: Entity, unit: &Unit) -> Self {
        Self {
            entity,
            team: unit.team(),
            position: unit.position(),
            range: unit.weapon().range,
            alive: !unit.is_dead(),
        }
    }
}

impl Targetable for TargetProbe {
    fn team(&self) -> Team {
        self.team
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn range(&self) -> f32 {
        self.range
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Расстояние ≤ range, включительно. Отрицательный/NaN range: никогда.
pub fn within_range(a: Vec2, b: Vec2, range: f32) -> bool {
    range >= 0.0 && a.distance_squared(b) <= range * range
}

/// Live форма: актор и кандидат: live юниты, range = оружие актора
pub fn invalidate_target<C, A>(candidate: &C, actor: &A) -> bool
where
    C: Targetable + ?Sized,
    A: Targetable + ?Sized,
{
    let origin = actor.position();
    invalidate_target_at(candidate, actor.team(), origin.x, origin.y, actor.range())
}

/// Tuple форма: явная позиция (probe) вместо позиции актора
pub fn invalidate_target_at<C>(candidate: &C, team: Team, x: f32, y: f32, range: f32) -> bool
where
    C: Targetable + ?Sized,
{
    candidate.team() == team || !within_range(candidate.position(), Vec2::new(x, y), range)
}

/// Ближайшая легальная живая цель (не сам актор)
///
/// При равных дистанциях: меньший Entity (детерминизм).
pub fn find_target<'a, A, I>(actor_entity: Entity, actor: &A, candidates: I) -> Option<Entity>
where
    A: Targetable + ?Sized,
    I: IntoIterator<Item = &'a TargetProbe>,
{
    let origin = actor.position();

    candidates
        .into_iter()
        .filter(|probe| probe.entity != actor_entity)
        .filter(|probe| probe.alive)
        .filter(|probe| !invalidate_target(*probe, actor))
        .map(|probe| (probe.entity, origin.distance_squared(probe.position)))
        .min_by(|(a_entity, a_dist), (b_entity, b_dist)| {
            a_dist.total_cmp(b_dist).then_with(|| a_entity.cmp(b_entity))
        })
        .map(|(entity, _)| entity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(index: u32, team: Team, x: f32, y: f32) -> TargetProbe {
        TargetProbe {
            entity: Entity::from_raw(index),
            team,
            position: Vec2::new(x, y),
            range: 10.0,
            alive: true,
        }
    }

    #[test]
    fn test_within_range_inclusive_boundary() {
        // 3-4-5 треугольник: ровно на границе
        assert!(within_range(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0));
        assert!(!within_range(Vec2::ZERO, Vec2::new(3.0, 4.0), 4.99));
        assert!(within_range(Vec2::ZERO, Vec2::ZERO, 0.0));
    }

    #[test]
    fn test_within_range_rejects_bad_range() {
        assert!(!within_range(Vec2::ZERO, Vec2::ZERO, -1.0));
        assert!(!within_range(Vec2::ZERO, Vec2::ZERO, f32::NAN));
    }

    #[test]
    fn test_tuple_form_scenarios() {
        let candidate = probe(1, Team::SHARDED, 0.0, 0.0);

        // Probe в (0,0), range 10 → стреляем
        assert!(!invalidate_target_at(&candidate, Team::DERELICT, 0.0, 0.0, 10.0));
        // Probe в (1,1): тоже в радиусе
        assert!(!invalidate_target_at(&candidate, Team::DERELICT, 1.0, 1.0, 10.0));
        // Probe в (100,100): вне радиуса
        assert!(invalidate_target_at(&candidate, Team::DERELICT, 100.0, 100.0, 10.0));
    }

    #[test]
    fn test_oracle_boundary_is_inclusive() {
        // Ровно range (3-4-5 и ось): цель легальна в обеих формах
        let actor = probe(0, Team::DERELICT, 0.0, 0.0);
        let on_edge = probe(1, Team::SHARDED, 6.0, 8.0);
        let on_axis = probe(2, Team::SHARDED, 10.0, 0.0);
        let past_edge = probe(3, Team::SHARDED, 10.001, 0.0);

        for candidate in [&on_edge, &on_axis] {
            assert!(!invalidate_target(candidate, &actor));
            assert!(!invalidate_target_at(candidate, Team::DERELICT, 0.0, 0.0, 10.0));
        }
        assert!(invalidate_target(&past_edge, &actor));
        assert!(invalidate_target_at(&past_edge, Team::DERELICT, 0.0, 0.0, 10.0));
    }

    #[test]
    fn test_same_team_is_never_a_target() {
        let candidate = probe(1, Team::SHARDED, 0.0, 0.0);
        assert!(invalidate_target_at(&candidate, Team::SHARDED, 0.0, 0.0, 1000.0));
    }

    #[test]
    fn test_live_and_tuple_forms_agree() {
        let actor = probe(0, Team::DERELICT, 2.0, -3.0);
        let positions = [(0.0, 0.0), (8.0, 5.0), (12.0, 5.0), (2.0, 7.0), (-50.0, 0.0)];

        for team in [Team::DERELICT, Team::SHARDED] {
            for (x, y) in positions {
                let candidate = probe(1, team, x, y);
                assert_eq!(
                    invalidate_target(&candidate, &actor),
                    invalidate_target_at(&candidate, actor.team, actor.position.x, actor.position.y, actor.range),
                    "candidate {:?} at ({}, {})",
                    team,
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_find_target_picks_nearest_enemy() {
        let actor = probe(0, Team::DERELICT, 0.0, 0.0);
        let candidates = [
            actor,
            probe(1, Team::SHARDED, 5.0, 0.0),
            probe(2, Team::SHARDED, 3.0, 0.0),  // ближе
            probe(3, Team::DERELICT, 1.0, 0.0), // союзник
            probe(4, Team::SHARDED, 15.0, 0.0), // вне радиуса
        ];

        assert_eq!(find_target(actor.entity, &actor, &candidates), Some(Entity::from_raw(2)));
    }

    #[test]
    fn test_find_target_skips_dead_and_breaks_ties() {
        let actor = probe(0, Team::DERELICT, 0.0, 0.0);
        let mut dead = probe(1, Team::SHARDED, 1.0, 0.0);
        dead.alive = false;
        let candidates = [dead, probe(7, Team::SHARDED, 0.0, 4.0), probe(5, Team::SHARDED, 4.0, 0.0)];

        assert_eq!(find_target(actor.entity, &actor, &candidates), Some(Entity::from_raw(5)));
    }

    #[test]
    fn test_find_target_none_when_alone() {
        let actor = probe(0, Team::DERELICT, 0.0, 0.0);
        assert_eq!(find_target(actor.entity, &actor, &[actor]), None);
    }
}
