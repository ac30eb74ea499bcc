//! Live-группа симуляции и tick clock

use bevy::prelude::*;

/// Marker: юнит зарегистрирован в live-группе (`Unit::add`)
///
/// Tick системы обрабатывают только `With<InSimulation>`.
/// Мёртвые юниты теряют маркер в `retire_dead_units`, entity остаётся (despawn внешний).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct InSimulation;

/// Счётчик тиков симуляции
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TickClock {
    pub tick: u64,
    /// Суммарное время (секунды)
    pub elapsed: f32,
    /// Delta последнего тика
    pub delta: f32,
}

impl TickClock {
    pub fn advance(&mut self, delta: f32) {
        self.tick += 1;
        self.delta = delta;
        self.elapsed += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = TickClock::default();
        clock.advance(0.5);
        clock.advance(0.25);

        assert_eq!(clock.tick, 2);
        assert_eq!(clock.delta, 0.25);
        assert_eq!(clock.elapsed, 0.75);
    }
}
