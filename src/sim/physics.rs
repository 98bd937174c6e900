//! Player and ball movement against the screen edges
//!
//! Both bodies use the same edge rule per axis: a reflecting edge pushes the
//! body back just inside, an open edge lets it leave completely and brings it
//! in from the opposite side.

use glam::Vec2;

use super::stages::FINAL_STAGE;
use super::state::GameState;
use crate::consts::*;
use crate::math::normalized;
use crate::screen_center;

/// What happened at the edges along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Inside,
    /// Pushed back inside a reflecting edge
    Reflected,
    /// Left through an open edge and re-entered on the other side
    Wrapped,
}

/// Apply the edge rule to one coordinate of a body of `radius` on `[0, extent]`
pub fn confine(pos: f32, radius: f32, extent: f32, reflect: bool) -> (f32, Edge) {
    if reflect {
        if pos + radius >= extent {
            (extent - radius - 1.0, Edge::Reflected)
        } else if pos - radius <= 0.0 {
            (radius + 1.0, Edge::Reflected)
        } else {
            (pos, Edge::Inside)
        }
    } else if pos - radius >= extent {
        (radius + 1.0, Edge::Wrapped)
    } else if pos + radius <= 0.0 {
        (extent - radius - 1.0, Edge::Wrapped)
    } else {
        (pos, Edge::Inside)
    }
}

/// Integrate the player for one tick. `input_dir` is the raw stick vector
/// (right - left, down - up); diagonals are normalized.
pub fn move_player(state: &mut GameState, input_dir: Vec2, dt: f32) {
    let player = &mut state.player;
    let acceleration = normalized(input_dir) * PLAYER_ACCELERATION;
    player.vel += acceleration * dt;
    player.vel *= PLAYER_FRICTION;
    if player.vel.length() < PLAYER_SETTLE_SPEED {
        player.vel = Vec2::ZERO;
    }
    player.pos += player.vel * dt;

    // The final stage is fought inside the big circle
    if state.cursor.stage == FINAL_STAGE {
        player.pos = keep_in_arena(player.pos);
    }

    let (x, _) = confine(player.pos.x, PLAYER_RADIUS, SCREEN_WIDTH, state.ball.h_reflect);
    let (y, _) = confine(player.pos.y, PLAYER_RADIUS, SCREEN_HEIGHT, state.ball.v_reflect);
    player.pos = Vec2::new(x, y);
}

/// Push a point back inside the circular arena by its penetration plus one
pub fn keep_in_arena(pos: Vec2) -> Vec2 {
    let center = screen_center();
    let dist = (pos - center).length();
    let limit = SCREEN_WIDTH / 2.0 - PLAYER_RADIUS;
    if dist >= limit {
        pos + normalized(center - pos) * (dist - limit + 1.0)
    } else {
        pos
    }
}

/// Propose the ball's next position from its velocity and resolve the edges.
/// Does nothing while phases place the ball directly.
///
/// Reflection only adjusts `next_pos`. Wrapping is a teleport: it commits
/// `pos` (and `prev_pos`) immediately so no trail or sweep spans the jump.
pub fn move_ball(state: &mut GameState, dt: f32) {
    if !state.ball.moves_physically {
        return;
    }
    let ball = &mut state.ball;
    ball.next_pos = ball.pos + ball.direction * ball.speed * dt;
    let radius = ball.effective_radius();

    let (x, edge) = confine(ball.next_pos.x, radius, SCREEN_WIDTH, ball.h_reflect);
    ball.next_pos.x = x;
    match edge {
        Edge::Reflected => {
            state.ball.direction.x = -state.ball.direction.x;
            state.bounce_effect();
        }
        Edge::Wrapped => commit_teleport(state),
        Edge::Inside => {}
    }

    let ball = &mut state.ball;
    let (y, edge) = confine(ball.next_pos.y, radius, SCREEN_HEIGHT, ball.v_reflect);
    ball.next_pos.y = y;
    match edge {
        Edge::Reflected => {
            state.ball.direction.y = -state.ball.direction.y;
            state.bounce_effect();
        }
        Edge::Wrapped => commit_teleport(state),
        Edge::Inside => {}
    }
}

fn commit_teleport(state: &mut GameState) {
    state.ball.pos = state.ball.next_pos;
    state.ball.prev_pos = state.ball.next_pos;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::sim::state::{GameEvent, Mode};
    use proptest::prelude::*;

    fn playing() -> GameState {
        let mut state = GameState::new();
        state.mode = Mode::Playing;
        state.drain_events();
        state
    }

    #[test]
    fn test_player_accelerates_and_settles() {
        let mut state = playing();
        move_player(&mut state, Vec2::new(1.0, 0.0), SIM_DT);
        // 12000 * dt * 0.75
        assert!((state.player.vel.x - 150.0).abs() < 1e-3);
        assert!(state.player.pos.x > 360.0);

        for _ in 0..60 {
            move_player(&mut state, Vec2::ZERO, SIM_DT);
        }
        assert_eq!(state.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let mut straight = playing();
        let mut diagonal = playing();
        move_player(&mut straight, Vec2::new(1.0, 0.0), SIM_DT);
        move_player(&mut diagonal, Vec2::new(1.0, 1.0), SIM_DT);
        assert!((straight.player.vel.length() - diagonal.player.vel.length()).abs() < 1e-3);
    }

    #[test]
    fn test_player_reflects_and_wraps() {
        let mut state = playing();
        state.player.pos = Vec2::new(SCREEN_WIDTH - 10.0, 360.0);
        move_player(&mut state, Vec2::ZERO, SIM_DT);
        assert_eq!(state.player.pos.x, SCREEN_WIDTH - PLAYER_RADIUS - 1.0);

        state.ball.h_reflect = false;
        state.player.pos = Vec2::new(SCREEN_WIDTH + PLAYER_RADIUS + 5.0, 360.0);
        move_player(&mut state, Vec2::ZERO, SIM_DT);
        assert_eq!(state.player.pos.x, PLAYER_RADIUS + 1.0);

        state.player.pos = Vec2::new(-PLAYER_RADIUS - 5.0, 360.0);
        move_player(&mut state, Vec2::ZERO, SIM_DT);
        assert_eq!(state.player.pos.x, SCREEN_WIDTH - PLAYER_RADIUS - 1.0);
    }

    #[test]
    fn test_final_stage_arena() {
        let mut state = playing();
        state.cursor.stage = FINAL_STAGE;
        state.player.pos = Vec2::new(360.0 + 340.0, 360.0);
        move_player(&mut state, Vec2::ZERO, SIM_DT);
        // limit 332, pushed in by 340 - 332 + 1
        assert!((state.player.pos.x - (360.0 + 331.0)).abs() < 1e-3);
    }

    #[test]
    fn test_ball_reflects_off_right_edge() {
        let mut state = playing();
        state.ball.scale = 0.05; // radius 25.6
        state.ball.pos = Vec2::new(690.0, 360.0);
        state.ball.direction = Vec2::new(1.0, 0.0);
        state.ball.speed = 600.0;
        move_ball(&mut state, SIM_DT);
        assert!((state.ball.next_pos.x - (SCREEN_WIDTH - 25.6 - 1.0)).abs() < 1e-3);
        assert_eq!(state.ball.direction, Vec2::new(-1.0, 0.0));
        // Reflection defers the commit
        assert_eq!(state.ball.pos, Vec2::new(690.0, 360.0));
        assert_eq!(
            state.events,
            vec![GameEvent::Sound(SoundEffect::Bounce(0))]
        );
    }

    #[test]
    fn test_ball_wraps_and_commits_immediately() {
        let mut state = playing();
        state.ball.h_reflect = false;
        state.ball.scale = 0.02; // radius 10.24
        state.ball.pos = Vec2::new(SCREEN_WIDTH + 8.0, 200.0);
        state.ball.direction = Vec2::new(1.0, 0.0);
        state.ball.speed = 300.0;
        move_ball(&mut state, SIM_DT);
        assert!((state.ball.next_pos.x - 11.24).abs() < 1e-3);
        assert_eq!(state.ball.pos, state.ball.next_pos);
        assert_eq!(state.ball.prev_pos, state.ball.next_pos);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_scripted_ball_is_left_alone() {
        let mut state = playing();
        state.ball.moves_physically = false;
        state.ball.next_pos = Vec2::new(1.0, 2.0);
        move_ball(&mut state, SIM_DT);
        assert_eq!(state.ball.next_pos, Vec2::new(1.0, 2.0));
    }

    proptest! {
        #[test]
        fn prop_reflecting_ball_stays_on_screen(
            x in 0.0f32..720.0,
            y in 0.0f32..720.0,
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 100.0f32..1900.0,
            scale in 0.01f32..0.5,
        ) {
            let mut state = playing();
            state.ball.pos = Vec2::new(x, y);
            state.ball.direction = Vec2::new(angle.cos(), angle.sin());
            state.ball.speed = speed;
            state.ball.scale = scale;
            move_ball(&mut state, SIM_DT);
            let r = state.ball.effective_radius();
            prop_assert!(state.ball.next_pos.x > r);
            prop_assert!(state.ball.next_pos.x < SCREEN_WIDTH - r);
            prop_assert!(state.ball.next_pos.y > r);
            prop_assert!(state.ball.next_pos.y < SCREEN_HEIGHT - r);
        }

        #[test]
        fn prop_arena_keeps_player_inside(x in -200.0f32..920.0, y in -200.0f32..920.0) {
            let pos = keep_in_arena(Vec2::new(x, y));
            let limit = SCREEN_WIDTH / 2.0 - PLAYER_RADIUS;
            prop_assert!((pos - screen_center()).length() < limit + 1e-2);
        }
    }
}
