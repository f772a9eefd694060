//! Per-frame simulation step

use crate::consts::*;
use crate::sim::collision::ball_hits_obstacle;
use crate::sim::state::{JumpState, RunState};

/// Advance the state by one tick. Frozen once the run is over; only an
/// explicit restart (a fresh [`JumpState`]) resumes play.
///
/// Order within a tick: integrate, clamp, spawn, move + hit-test, prune.
/// Spawning precedes the hit tests, so a fresh obstacle can never collide on
/// its spawn tick; pruning follows them, so an exiting obstacle can still end
/// the run on its exit tick.
pub fn tick(state: &mut JumpState) {
    if state.run_state != RunState::Running {
        return;
    }

    // Integrate gravity, then clamp to the resting baseline
    state.ball.vel_y += GRAVITY;
    state.ball.pos.y += state.ball.vel_y;
    if state.ball.pos.y > GROUND_Y {
        state.ball.pos.y = GROUND_Y;
        state.ball.vel_y = 0.0;
    }

    state.frame += 1;
    if state.frame % SPAWN_INTERVAL == 0 {
        state.spawn_obstacle();
    }

    // Every obstacle advances even after a hit: the frame completes, it just
    // stops mattering who else we touch
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= SCROLL_SPEED;
        if state.run_state == RunState::Running && ball_hits_obstacle(&state.ball, obstacle) {
            state.run_state = RunState::GameOver;
            log::info!(
                "jumpball: hit {:?} at frame {}, final score {}",
                obstacle.kind,
                state.frame,
                state.score
            );
        }
    }

    // Obstacles that cleared the left edge score, including on the tick that
    // ended the run
    let mut exited = 0u32;
    state.obstacles.retain(|o| {
        if o.right_edge() < 0.0 {
            exited += 1;
            false
        } else {
            true
        }
    });
    state.score += exited;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ball, Obstacle, ObstacleKind};
    use proptest::prelude::*;

    /// Jump over incoming ground obstacles the way a player would: leave
    /// early enough that the ball is well clear when the obstacle reaches it.
    fn avoid_obstacles(state: &mut JumpState) {
        let danger = state
            .obstacles
            .iter()
            .any(|o| o.kind == ObstacleKind::Ground && o.pos.x > 52.0 && o.pos.x <= 64.0);
        if danger {
            state.jump();
        }
    }

    #[test]
    fn gravity_only_stays_clamped() {
        let mut state = JumpState::new(1);
        for _ in 0..50 {
            tick(&mut state);
            assert_eq!(state.ball.pos.y, GROUND_Y);
            assert_eq!(state.ball.vel_y, 0.0);
        }
    }

    #[test]
    fn jump_then_tick_leaves_the_ground() {
        let mut state = JumpState::new(1);
        state.jump();
        tick(&mut state);
        // Strictly faster upward than the gravity-only baseline of 0
        assert!(state.ball.vel_y < 0.0);
        assert!(state.ball.pos.y < GROUND_Y);
        assert_eq!(state.ball.vel_y, JUMP_VELOCITY + GRAVITY);
    }

    #[test]
    fn no_double_jump_while_airborne() {
        let mut state = JumpState::new(1);
        state.jump();
        assert_eq!(state.ball.vel_y, JUMP_VELOCITY);
        tick(&mut state);
        let airborne_vel = state.ball.vel_y;
        state.jump();
        assert_eq!(state.ball.vel_y, airborne_vel);
    }

    #[test]
    fn jump_impulse_decays_by_gravity_each_tick() {
        let mut state = JumpState::new(1);
        state.jump();
        assert_eq!(state.ball.vel_y, -8.0);
        let mut last_y = state.ball.pos.y;
        for expected_vel in [-7.5, -7.0, -6.5] {
            tick(&mut state);
            assert_eq!(state.ball.vel_y, expected_vel);
            assert!(state.ball.pos.y < last_y);
            last_y = state.ball.pos.y;
        }
    }

    #[test]
    fn full_jump_arc_returns_to_rest() {
        let mut state = JumpState::new(1);
        state.jump();
        for _ in 0..40 {
            tick(&mut state);
            assert!(state.ball.pos.y <= GROUND_Y);
        }
        assert_eq!(state.ball.pos.y, GROUND_Y);
        assert_eq!(state.ball.vel_y, 0.0);
    }

    #[test]
    fn spawn_cadence_is_exact() {
        let mut state = JumpState::new(7);
        for tick_index in 1..=(3 * SPAWN_INTERVAL) {
            avoid_obstacles(&mut state);
            tick(&mut state);
            assert_eq!(state.run_state, RunState::Running);
            let spawned = state.score as u64 + state.obstacles.len() as u64;
            assert_eq!(spawned, tick_index / SPAWN_INTERVAL);
        }
    }

    #[test]
    fn obstacle_crosses_field_in_100_ticks_and_scores_on_removal() {
        let mut state = JumpState::new(7);
        state.obstacles.push(Obstacle::ground());

        // 100 ticks bring the leading edge from 300 to exactly 0
        for _ in 0..100 {
            avoid_obstacles(&mut state);
            tick(&mut state);
        }
        assert_eq!(state.run_state, RunState::Running);
        assert_eq!(state.obstacles[0].pos.x, 0.0);
        assert_eq!(state.score, 0);

        // Removal waits for the trailing edge to clear the left side
        let mut removal_tick = None;
        for extra in 1..=20u64 {
            avoid_obstacles(&mut state);
            tick(&mut state);
            if state.score == 1 {
                removal_tick = Some(extra);
                break;
            }
        }
        // 20 / 3 units per tick past x = 0
        assert_eq!(removal_tick, Some(7));
        assert!(state.obstacles.iter().all(|o| o.right_edge() >= 0.0));
    }

    #[test]
    fn stationary_ball_eventually_loses_to_ground_obstacle() {
        let mut state = JumpState::new(7);
        state.obstacles.push(Obstacle::ground());
        for _ in 0..200 {
            tick(&mut state);
        }
        assert_eq!(state.run_state, RunState::GameOver);
    }

    #[test]
    fn game_over_freezes_everything() {
        let mut state = JumpState::new(7);
        let mut obstacle = Obstacle::ground();
        obstacle.pos.x = BALL_X + 5.0;
        state.obstacles.push(obstacle);
        tick(&mut state);
        assert_eq!(state.run_state, RunState::GameOver);

        let frozen = state.clone();
        for _ in 0..25 {
            tick(&mut state);
        }
        assert_eq!(state.ball, frozen.ball);
        assert_eq!(state.obstacles, frozen.obstacles);
        assert_eq!(state.frame, frozen.frame);
        assert_eq!(state.score, frozen.score);
    }

    #[test]
    fn exit_still_scores_on_the_game_over_tick() {
        let mut state = JumpState::new(7);
        // One obstacle about to clear the left edge...
        let mut leaving = Obstacle::ground();
        leaving.pos.x = -GROUND_OBSTACLE_WIDTH - 1.0;
        state.obstacles.push(leaving);
        // ...and one about to land on the ball
        let mut incoming = Obstacle::ground();
        incoming.pos.x = BALL_X + 5.0;
        state.obstacles.push(incoming);

        tick(&mut state);
        assert_eq!(state.run_state, RunState::GameOver);
        assert_eq!(state.score, 1);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn fresh_spawn_cannot_collide_on_its_spawn_tick() {
        let mut state = JumpState::new(7);
        state.frame = SPAWN_INTERVAL - 1;
        tick(&mut state);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.run_state, RunState::Running);
        // It entered off the right edge and moved once
        assert_eq!(state.obstacles[0].pos.x, PLAYFIELD_WIDTH - SCROLL_SPEED);
    }

    #[test]
    fn restart_equals_fresh_state() {
        let mut state = JumpState::new(7);
        let mut obstacle = Obstacle::ground();
        obstacle.pos.x = BALL_X + 5.0;
        state.obstacles.push(obstacle);
        while !state.is_over() {
            tick(&mut state);
        }

        let restarted = JumpState::new(42);
        assert_eq!(restarted.score, 0);
        assert_eq!(restarted.frame, 0);
        assert!(restarted.obstacles.is_empty());
        assert_eq!(restarted.ball, Ball::default());
        assert_eq!(restarted.run_state, RunState::Running);
    }

    proptest! {
        #[test]
        fn ball_never_passes_below_baseline(jumps in proptest::collection::vec(any::<bool>(), 1..300)) {
            let mut state = JumpState::new(11);
            for jump in jumps {
                if jump {
                    state.jump();
                }
                tick(&mut state);
                prop_assert!(state.ball.pos.y <= GROUND_Y);
            }
        }

        #[test]
        fn score_never_decreases(seed in 0u64..1000, jumps in proptest::collection::vec(any::<bool>(), 1..400)) {
            let mut state = JumpState::new(seed);
            let mut last_score = 0;
            for jump in jumps {
                if jump {
                    state.jump();
                }
                tick(&mut state);
                prop_assert!(state.score >= last_score);
                last_score = state.score;
            }
        }
    }
}
