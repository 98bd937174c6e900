//! Final-stage destination chasing
//!
//! The ball runs corner to corner around a polygon inscribed in the arena
//! circle. Each script modulates speed, scale, the polygon's rotation and the
//! marker overlay over its phase, then takes one chase step.

use std::f32::consts::PI;

use serde::Serialize;

use super::state::GameState;
use crate::consts::*;
use crate::math::normalized;

/// Per-phase modulation for the final stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChaseScript {
    /// Two-point line: speed up, swing forward, swing back and slow down
    LineSweep,
    /// Pentagram appears: speed up while markers fade in
    PentagramReveal,
    /// Pentagram wobbles forward then back, ending with a brake
    PentagramSpin,
    /// Ball swells and shrinks while the star turns; markers fade out
    StarSwell,
}

/// Apply `script` at phase frame `f`, then step toward the current corner
pub fn run(state: &mut GameState, script: ChaseScript, f: u32) {
    match script {
        ChaseScript::LineSweep => line_sweep(state, f),
        ChaseScript::PentagramReveal => pentagram_reveal(state, f),
        ChaseScript::PentagramSpin => pentagram_spin(state, f),
        ChaseScript::StarSwell => star_swell(state, f),
    }
    chase_step(state);
}

/// `sin(π · (f - start) / span)`
#[inline]
fn swing(f: u32, start: u32, span: f32) -> f32 {
    ((f - start) as f32 / span * PI).sin()
}

fn line_sweep(state: &mut GameState, f: u32) {
    if f < 270 {
        state.ball.speed *= MUL_UP_2;
    } else if f < 675 {
        state.dests.rotate(swing(f, 270, 405.0));
    } else {
        state.dests.rotate(-2.0 * swing(f, 675, 405.0));
        if f > 1080 {
            state.ball.speed *= MUL_DOWN_1;
        }
    }
}

fn pentagram_reveal(state: &mut GameState, f: u32) {
    if f < 360 {
        state.ball.speed *= MUL_UP_1;
    }
    if f < 540 {
        let red = (255.0 * (f as f32 / 540.0)) as u8;
        state.dests.marker_color[0] = red;
        state.dests.marker_color[3] = red.saturating_sub(128);
    }
}

fn pentagram_spin(state: &mut GameState, f: u32) {
    if f < 360 {
        state.dests.rotate(swing(f, 0, 360.0));
    } else if f < 540 {
        // hold
    } else if f < 1260 {
        state.dests.rotate(-2.0 * swing(f, 540, 720.0));
    } else if f < 1440 {
        state.ball.speed *= MUL_DOWN_2;
    }
}

fn star_swell(state: &mut GameState, f: u32) {
    if f < 360 {
        state.ball.scale *= MUL_UP_1L;
        state.dests.rotate(swing(f, 0, 360.0));
        state.dests.marker_color[3] = (128.0 - 128.0 * (f as f32 / 360.0)).max(0.0) as u8;
    } else if f < 540 {
        state.dests.markers_visible = false;
        state.ball.scale *= MUL_UP_2L;
        state.ball.speed *= MUL_DOWN_1;
    } else if f < 1260 {
        if f > 1080 {
            state.dests.markers_visible = false;
            state.ball.scale *= MUL_DOWN_1L;
            state.ball.speed *= MUL_UP_1;
        }
        state.dests.rotate(-swing(f, 540, 720.0));
    } else if f < 1440 {
        state.ball.speed *= MUL_DOWN_2;
    }
}

/// Move `next_pos` one fixed step toward the current corner. Arriving (or
/// being within a step) snaps onto the corner, advances to the next one and
/// counts as a bounce.
pub fn chase_step(state: &mut GameState) {
    let target = state.dests.target();
    let to_target = target - state.ball.next_pos;
    let remaining = to_target.length();
    let step = state.ball.speed * FIXED_DELTA;
    if remaining <= step {
        state.ball.next_pos = target;
        state.dests.advance();
        state.bounce_effect();
    } else {
        state.ball.next_pos += normalized(to_target) * step;
    }
}
