//! Ball-obstacle hit test

use crate::sim::state::{Ball, Obstacle};

/// Axis-aligned overlap between the ball and an obstacle rectangle.
///
/// Horizontal overlap uses the ball's full circle bounds. The vertical test
/// keys off the circle's center (`pos.y - radius`) and the contact point
/// rather than the full circle extent, which makes grazing the top of an
/// obstacle survivable. Deliberately loose tuning for a casual game; do not
/// tighten to true circle-rectangle intersection.
pub fn ball_hits_obstacle(ball: &Ball, obstacle: &Obstacle) -> bool {
    let hit_x = obstacle.pos.x < ball.pos.x + ball.radius
        && obstacle.right_edge() > ball.pos.x - ball.radius;
    let hit_y = obstacle.pos.y > ball.pos.y - ball.radius
        && obstacle.pos.y - obstacle.size.y < ball.pos.y + ball.radius;
    hit_x && hit_y
}
