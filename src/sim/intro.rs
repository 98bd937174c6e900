//! Scripted intro: the enemy slides in, gloats three times, drops the ball
//! and leaves. Driven only by the Beginning frame counter.

use glam::Vec2;

use super::state::GameState;
use crate::consts::*;
use crate::math::ease_between;

/// Dialogue lines, indexed by `IntroOverlay::message` (0 = silent)
pub const ENEMY_MESSAGES: [&str; 4] = [
    "",
    "Crabland belongs \nto ME!",
    "You can't win against \nmy new weapon!",
    "Bwa ha ha ha",
];

const MID_X: f32 = SCREEN_WIDTH / 2.0;

/// Apply intro frame `f` (0-based)
pub fn update(state: &mut GameState, f: u32) {
    if f == 0 {
        state.ball.pos.y = -32.0;
    }

    if f <= 60 {
        state.enemy_pos = ease_between(
            Vec2::new(MID_X, 0.0),
            Vec2::new(MID_X, 45.0),
            f as f32 / 60.0,
        );
    } else if f < 240 {
        talk(state, 1, f);
    } else if f == 240 {
        quiet(state);
    } else if f <= 300 {
        // pause
    } else if f < 480 {
        talk(state, 2, f);
    } else if f == 480 {
        quiet(state);
    } else if f <= 540 {
        // the weapon appears
        state.ball.next_pos = ease_between(
            Vec2::new(MID_X, 60.0),
            Vec2::new(MID_X, 90.0),
            (f - 480) as f32 / 60.0,
        );
        state.ball.pos = state.ball.next_pos;
    } else if f <= 600 {
        // pause
    } else if f < BEGINNING_FRAMES {
        talk(state, 3, f);
        state.enemy_pos = ease_between(
            Vec2::new(MID_X, 45.0),
            Vec2::new(MID_X, -45.0),
            (f - 600) as f32 / 120.0,
        );
    }
}

/// Intro is over after this frame count
pub fn finished(frames: u32) -> bool {
    frames >= BEGINNING_FRAMES
}

/// Silence the enemy before play starts
pub fn quiet(state: &mut GameState) {
    state.intro.message = 0;
    state.intro.enemy_sprite_frame = 0;
}

fn talk(state: &mut GameState, message: u8, f: u32) {
    state.intro.message = message;
    if f % SPRITE_FRAMES == 0 {
        state.intro.enemy_sprite_frame ^= 1;
    }
}
