//! # Utilities Module
//!
//! Level-scaling lookups, grid vector math and the A* movement helpers shared
//! by monster AI and the autopilot.

pub mod math;
pub mod pathfinding;

pub use math::*;
pub use pathfinding::*;
