//! JumpBall game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Whether the run is still in play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Terminal until an explicit restart
    GameOver,
}

/// Obstacle flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Low obstacle, avoided by jumping
    Ground,
    /// Elevated obstacle, avoided by staying low
    Bird,
}

/// The player's ball. `pos.x` is fixed; only `pos.y` moves.
///
/// `pos.y` is the ball's contact point with the ground; the circle is drawn
/// centered one radius above it. Larger y is lower on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
    /// Vertical velocity, positive is downward
    pub vel_y: f32,
}

impl Ball {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(BALL_X, GROUND_Y),
            radius: BALL_RADIUS,
            vel_y: 0.0,
        }
    }

    /// At or below the resting baseline
    pub fn is_grounded(&self) -> bool {
        self.pos.y >= GROUND_Y
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// A scrolling obstacle. `pos.y` anchors the rectangle's bottom edge, so it
/// spans `[pos.y - size.y, pos.y]` vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Ground obstacle entering at the right edge of the playfield
    pub fn ground() -> Self {
        Self {
            pos: Vec2::new(PLAYFIELD_WIDTH, GROUND_OBSTACLE_Y),
            size: Vec2::new(GROUND_OBSTACLE_WIDTH, GROUND_OBSTACLE_HEIGHT),
            kind: ObstacleKind::Ground,
        }
    }

    /// Bird entering at the right edge of the playfield
    pub fn bird() -> Self {
        Self {
            pos: Vec2::new(PLAYFIELD_WIDTH, BIRD_Y),
            size: Vec2::new(BIRD_WIDTH, BIRD_HEIGHT),
            kind: ObstacleKind::Bird,
        }
    }

    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// Complete JumpBall state. A seed fully determines a run given the same
/// input timing.
#[derive(Debug, Clone)]
pub struct JumpState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub ball: Ball,
    /// Active obstacles in spawn order, owned by the simulation step
    pub obstacles: Vec<Obstacle>,
    /// Tick counter; gates spawn cadence only
    pub frame: u64,
    /// Obstacles survived so far; frozen once the run is over
    pub score: u32,
    pub run_state: RunState,
    rng: Pcg32,
}

impl JumpState {
    /// Fresh state: ball at rest on the ground, empty playfield
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ball: Ball::new(),
            obstacles: Vec::new(),
            frame: 0,
            score: 0,
            run_state: RunState::Running,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn is_over(&self) -> bool {
        self.run_state == RunState::GameOver
    }

    /// Apply the jump impulse if the ball is grounded. Airborne calls are a
    /// no-op, so there is no double jump. The ball itself only moves on the
    /// next tick.
    pub fn jump(&mut self) {
        if self.ball.is_grounded() {
            self.ball.vel_y = JUMP_VELOCITY;
        }
    }

    /// Roll the kind and push a fresh obstacle at the right edge
    pub(crate) fn spawn_obstacle(&mut self) {
        let is_bird = self.rng.random::<f32>() < BIRD_PROBABILITY;
        self.obstacles.push(if is_bird {
            Obstacle::bird()
        } else {
            Obstacle::ground()
        });
    }
}
