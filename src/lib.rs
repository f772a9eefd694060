//! GameHub - casual mini-games for Telegram Mini Apps
//!
//! Core modules:
//! - `sim`: Deterministic JumpBall simulation (physics, spawning, collisions)
//! - `render`: Frame painting over the abstract drawing surface
//! - `driver`: Frame-loop scheduling and run/game-over/restart lifecycle
//! - `hub`: Game module contract and active-module registry
//! - `games`: The shipped modules (JumpBall, Tapper, MemoryMatch)
//! - `platform`: Injected collaborators (surface, scheduler, input, storage,
//!   host bridge) with browser implementations and in-memory fakes

pub mod driver;
pub mod games;
pub mod hub;
pub mod platform;
pub mod render;
pub mod sim;

pub use hub::{GameModule, HostServices, Hub};
pub use sim::JumpState;

/// Game configuration constants
pub mod consts {
    /// Logical playfield resolution; the host scales presentation to fit
    pub const PLAYFIELD_WIDTH: f32 = 300.0;
    pub const PLAYFIELD_HEIGHT: f32 = 150.0;

    /// Height of the ground strip painted along the bottom edge
    pub const GROUND_THICKNESS: f32 = 10.0;

    /// Ball defaults - x is fixed, only y moves
    pub const BALL_X: f32 = 40.0;
    pub const BALL_RADIUS: f32 = 10.0;
    /// Resting baseline for the ball's contact point
    pub const GROUND_Y: f32 = PLAYFIELD_HEIGHT - 20.0;

    /// Vertical acceleration per tick
    pub const GRAVITY: f32 = 0.5;
    /// Impulse applied by a grounded jump (negative = up)
    pub const JUMP_VELOCITY: f32 = -8.0;

    /// Obstacles spawn every this many ticks
    pub const SPAWN_INTERVAL: u64 = 90;
    /// Chance that a spawn is a bird rather than a ground obstacle
    pub const BIRD_PROBABILITY: f32 = 0.3;
    /// Leftward obstacle movement per tick
    pub const SCROLL_SPEED: f32 = 3.0;

    /// Ground obstacle footprint (anchor at its bottom edge)
    pub const GROUND_OBSTACLE_Y: f32 = PLAYFIELD_HEIGHT - GROUND_THICKNESS;
    pub const GROUND_OBSTACLE_WIDTH: f32 = 20.0;
    pub const GROUND_OBSTACLE_HEIGHT: f32 = 20.0;

    /// Bird obstacle footprint - elevated, avoided by staying low
    pub const BIRD_Y: f32 = 60.0;
    pub const BIRD_WIDTH: f32 = 30.0;
    pub const BIRD_HEIGHT: f32 = 20.0;
}
