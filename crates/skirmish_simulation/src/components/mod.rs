//! ECS Components для юнитов
//!
//! Организация по доменам:
//! - actor: Team, Health, Unit (композиция health + FSM + позиция)
//! - world: live-группа (InSimulation) и TickClock

pub mod actor;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use world::*;
