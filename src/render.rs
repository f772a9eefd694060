//! Paints the current JumpBall state
//!
//! Pure function of state, no logic: clear, obstacles, ground strip, ball.

use crate::consts::*;
use crate::platform::Surface;
use crate::sim::{JumpState, ObstacleKind};

const GROUND_OBSTACLE_COLOR: &str = "#ef4444";
const BIRD_COLOR: &str = "#fbbf24";
const GROUND_STRIP_COLOR: &str = "#0f172a";
const BALL_COLOR: &str = "#3b82f6";

pub fn draw_frame(surface: &mut dyn Surface, state: &JumpState) {
    surface.clear();

    for obstacle in &state.obstacles {
        let color = match obstacle.kind {
            ObstacleKind::Ground => GROUND_OBSTACLE_COLOR,
            ObstacleKind::Bird => BIRD_COLOR,
        };
        surface.fill_rect(
            obstacle.pos.x,
            obstacle.pos.y - obstacle.size.y,
            obstacle.size.x,
            obstacle.size.y,
            color,
        );
    }

    surface.fill_rect(
        0.0,
        PLAYFIELD_HEIGHT - GROUND_THICKNESS,
        PLAYFIELD_WIDTH,
        GROUND_THICKNESS,
        GROUND_STRIP_COLOR,
    );

    surface.fill_circle(
        state.ball.pos.x,
        state.ball.pos.y - state.ball.radius,
        state.ball.radius,
        BALL_COLOR,
    );
}
