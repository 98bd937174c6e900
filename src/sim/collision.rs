//! Ball/player collision
//!
//! A fast ball can cover more than its own diameter in one tick and jump
//! clean over the player, so long moves are also tested at intermediate
//! points.

use glam::Vec2;

use crate::consts::PLAYER_RADIUS;
use crate::math::within;

/// Fractions of a long move that are tested before the end point
pub const SUB_STEPS: [f32; 3] = [0.25, 0.5, 0.75];

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the ball touched the player
    pub hit: bool,
    /// Where the ball ends up this tick: the first touching sub-step, or the
    /// end of the move
    pub point: Vec2,
}

/// Sweep the ball from `from` to `to` against a player at `player_pos`
pub fn sweep_ball(from: Vec2, to: Vec2, player_pos: Vec2, ball_radius: f32) -> CollisionResult {
    let touch_limit = PLAYER_RADIUS + ball_radius;
    let travel = to - from;
    if travel.length() > ball_radius * 2.0 {
        for fraction in SUB_STEPS {
            let point = from + travel * fraction;
            if within(point, player_pos, touch_limit) {
                return CollisionResult { hit: true, point };
            }
        }
    }
    CollisionResult {
        hit: within(to, player_pos, touch_limit),
        point: to,
    }
}
