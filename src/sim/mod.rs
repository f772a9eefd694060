//! Deterministic JumpBall simulation
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - One tick per frame callback, constant per-tick delta
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::ball_hits_obstacle;
pub use state::{Ball, JumpState, Obstacle, ObstacleKind, RunState};
pub use tick::tick;
