//! Ball phase engine
//!
//! A phase is a duration plus a [`Motion`] record. The engine applies the
//! current phase's motion once per tick until it has run `frames` times, then
//! spends one tick moving the cursor on. Motions are plain data interpreted
//! by [`apply`]; they talk to later phases only through `GameState::curve`
//! and `GameState::dests`.

use std::f32::consts::PI;

use glam::Vec2;
use serde::Serialize;

use super::chase::{self, ChaseScript};
use super::state::{GameState, Polygon};
use crate::consts::*;
use crate::math::{ease_between, lerp_toward, normalized};
use crate::screen_center;

/// Frames over which one unit of curve parameter is swept
pub const CURVE_PERIOD: f32 = 540.0;

/// One timed step of a stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phase {
    /// Number of ticks the motion is applied
    pub frames: u32,
    pub motion: Motion,
}

impl Phase {
    pub const fn new(frames: u32, motion: Motion) -> Self {
        Self { frames, motion }
    }
}

/// What a phase does to the ball each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Motion {
    /// Nothing; the ball keeps doing what it was doing
    Idle,
    /// Stage entry configuration
    Setup(Setup),
    /// Multiply speed and scale every tick
    Tune { speed: f32, scale: f32 },
    /// Set which screen edges reflect
    Walls { h_reflect: bool, v_reflect: bool },
    /// Sine ease over the phase from `from` to `to`
    Ease { from: Origin, to: Vec2 },
    /// Each tick, cover `frames / divisor` of the remaining way to `to`
    Approach { to: Vec2, divisor: f32 },
    /// Closed-form parametric curve
    Curve {
        sweep: Sweep,
        anchor: Anchor,
        path: Path,
    },
    /// Chase the destination polygon
    Chase(ChaseScript),
}

/// Stage entry configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Setup {
    /// Phases place the ball directly
    Scripted,
    /// Free bouncing off every edge
    Bouncing,
    /// Stop physical motion so a scripted move can take over
    Glide,
    /// Park the ball at the top and start chasing a polygon
    Chase(Polygon),
    /// Switch polygon and fade in its markers
    RevealMarkers(Polygon),
}

/// Start point of an ease
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Origin {
    Fixed(Vec2),
    /// Ball position on the phase's first tick
    PhaseStart,
}

/// Curve parameter `t` as a function of phase frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Sweep {
    /// `offset + f/540 * rate * π`
    Linear { rate: f32, offset: f32 },
    /// Rate itself ramps: `f/540 * (start + f/540 * delta) * π`
    Ramp { start: f32, delta: f32 },
    /// Runs back toward zero: `(1 - f/540) * rate * π`
    Unwind { rate: f32 },
}

impl Sweep {
    pub fn at(&self, frames: u32) -> f32 {
        let u = frames as f32 / CURVE_PERIOD;
        match *self {
            Sweep::Linear { rate, offset } => offset + u * rate * PI,
            Sweep::Ramp { start, delta } => u * (start + u * delta) * PI,
            Sweep::Unwind { rate } => (1.0 - u) * rate * PI,
        }
    }
}

/// Curve center
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Anchor {
    Screen,
    /// Slowly circles the screen center at an eighth of the curve rate
    Drift { radius: f32 },
}

impl Anchor {
    pub fn at(&self, t: f32) -> Vec2 {
        match *self {
            Anchor::Screen => screen_center(),
            Anchor::Drift { radius } => {
                screen_center() + Vec2::new((t / 8.0).cos(), (t / 8.0).sin()) * radius
            }
        }
    }
}

/// Curve shape around the center
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Path {
    Ellipse { radius: f32 },
    /// `r (cos t + cos kt, sin t + sin kt)`
    Rose { radius: f32, harmonic: f32 },
    /// Archimedean spiral `b t (cos, sin)`. `pitch` overwrites the shared `b`;
    /// `half_turn` rotates the spiral by π.
    Spiral { pitch: Option<f32>, half_turn: bool },
}

/// What the engine did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The phase's motion ran
    Applied,
    /// The phase was used up; the cursor moved to the next phase
    Advanced,
}

/// Advance one phase by one tick
pub fn step(state: &mut GameState, phase: &Phase) -> Step {
    if state.cursor.frames < phase.frames {
        apply(state, phase);
        state.cursor.frames += 1;
        Step::Applied
    } else {
        state.cursor.phase += 1;
        state.cursor.frames = 0;
        log::debug!(
            "Ball stage {} phase {}",
            state.cursor.stage,
            state.cursor.phase
        );
        Step::Advanced
    }
}

/// Apply a phase's motion for the current frame
pub fn apply(state: &mut GameState, phase: &Phase) {
    let f = state.cursor.frames;
    match phase.motion {
        Motion::Idle => {}
        Motion::Setup(setup) => apply_setup(state, setup),
        Motion::Tune { speed, scale } => {
            state.ball.speed *= speed;
            state.ball.scale *= scale;
        }
        Motion::Walls {
            h_reflect,
            v_reflect,
        } => {
            state.ball.h_reflect = h_reflect;
            state.ball.v_reflect = v_reflect;
        }
        Motion::Ease { from, to } => {
            let from = match from {
                Origin::Fixed(p) => p,
                Origin::PhaseStart => {
                    if f == 0 {
                        state.curve.origin = state.ball.pos;
                    }
                    state.curve.origin
                }
            };
            state.ball.next_pos = ease_between(from, to, f as f32 / phase.frames as f32);
        }
        Motion::Approach { to, divisor } => {
            state.ball.next_pos = lerp_toward(state.ball.pos, to, f as f32 / divisor);
        }
        Motion::Curve {
            sweep,
            anchor,
            path,
        } => {
            let t = sweep.at(f);
            let center = anchor.at(t);
            state.curve.center = center;
            state.ball.next_pos = match path {
                Path::Ellipse { radius } => center + Vec2::new(t.cos(), t.sin()) * radius,
                Path::Rose { radius, harmonic } => {
                    center
                        + Vec2::new(
                            t.cos() + (harmonic * t).cos(),
                            t.sin() + (harmonic * t).sin(),
                        ) * radius
                }
                Path::Spiral { pitch, half_turn } => {
                    if let Some(b) = pitch {
                        state.curve.b = b;
                    }
                    let angle = if half_turn { t + PI } else { t };
                    center + Vec2::new(angle.cos(), angle.sin()) * (state.curve.b * t)
                }
            };
        }
        Motion::Chase(script) => chase::run(state, script, f),
    }
}

fn apply_setup(state: &mut GameState, setup: Setup) {
    let ball = &mut state.ball;
    match setup {
        Setup::Scripted => {
            ball.moves_physically = false;
            ball.moves_linearly = false;
        }
        Setup::Bouncing => {
            ball.moves_physically = true;
            ball.moves_linearly = true;
            ball.h_reflect = true;
            ball.v_reflect = true;
            ball.direction = normalized(Vec2::new(0.5, 0.4));
        }
        Setup::Glide => ball.moves_physically = false,
        Setup::Chase(polygon) => {
            let top = Vec2::new(SCREEN_WIDTH / 2.0, 40.0);
            ball.pos = top;
            ball.prev_pos = top;
            ball.next_pos = top;
            ball.moves_physically = false;
            ball.moves_linearly = true;
            ball.h_reflect = true;
            ball.v_reflect = true;
            ball.direction = normalized(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT) - top);
            state.dests.use_polygon(polygon);
        }
        Setup::RevealMarkers(polygon) => {
            state.dests.use_polygon(polygon);
            state.dests.markers_visible = true;
            state.dests.marker_color = [0, 0, 0, 0];
        }
    }
}
