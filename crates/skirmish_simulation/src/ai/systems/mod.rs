//! AI systems (tick logic)

pub mod fsm;

// Re-export all systems
pub use fsm::*;
