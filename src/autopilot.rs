//! Demo player
//!
//! Drives the crab for attract mode and headless runs: wander around the
//! middle of the screen and run from the ball when it gets close.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::math::normalized;
use crate::platform::ControllerInput;
use crate::screen_center;
use crate::sim::{GameState, Mode};

/// Ticks between wander direction changes
const WANDER_TICKS: u32 = 45;
/// Extra clearance on top of the touch distance before fleeing
const FLEE_MARGIN: f32 = 140.0;
/// Ticks of ball motion to lead the ball by
const LEAD_TICKS: f32 = 6.0;

/// Seeded demo player
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    wander: Vec2,
    wander_ticks: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            wander: Vec2::ZERO,
            wander_ticks: 0,
        }
    }

    /// Input for the next tick
    pub fn input(&mut self, state: &GameState) -> ControllerInput {
        match state.mode {
            Mode::MainMenu => ControllerInput {
                button_start: true,
                ..Default::default()
            },
            Mode::Playing => steer(self.direction(state)),
            _ => ControllerInput::default(),
        }
    }

    fn direction(&mut self, state: &GameState) -> Vec2 {
        let player = state.player.pos;
        let ball = &state.ball;

        // Predict where the ball is heading (lead the target slightly)
        let velocity = ball.pos - ball.prev_pos;
        let ahead = ball.pos + velocity * LEAD_TICKS;
        let danger = PLAYER_RADIUS + ball.effective_radius() + FLEE_MARGIN;

        let closest = [ball.pos, ahead]
            .into_iter()
            .min_by(|a, b| {
                (*a - player)
                    .length()
                    .partial_cmp(&(*b - player).length())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(ball.pos);

        let away = player - closest;
        if away.length() < danger {
            // Run sideways to the ball's path as well as away from it
            let side = normalized(velocity).perp();
            let side = if side.dot(away) < 0.0 { -side } else { side };
            return normalized(normalized(away) + side * 0.5);
        }

        if self.wander_ticks == 0 {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            self.wander = Vec2::new(angle.cos(), angle.sin());
            self.wander_ticks = WANDER_TICKS;
        }
        self.wander_ticks -= 1;

        // Drift back toward the middle when near the walls
        let home = (screen_center() - player) / (SCREEN_WIDTH / 2.0);
        let drift = self.wander * 0.6 + home;
        if drift.length() < 0.25 {
            Vec2::ZERO
        } else {
            normalized(drift)
        }
    }
}

/// Stick input pointing along `direction`
fn steer(direction: Vec2) -> ControllerInput {
    ControllerInput {
        dir_left: (-direction.x).max(0.0),
        dir_right: direction.x.max(0.0),
        dir_up: (-direction.y).max(0.0),
        dir_down: direction.y.max(0.0),
        ..Default::default()
    }
}
