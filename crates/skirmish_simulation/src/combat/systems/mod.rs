//! Combat systems (tick logic)

pub mod damage;
pub mod targeting;


// Re-export all systems
pub use damage::*;
pub use targeting::*;
