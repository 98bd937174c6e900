//! 2D vector helpers
//!
//! Vector arithmetic (add/sub/scale/Hadamard/divide/dot/length) comes from
//! `glam::Vec2` operators; this module adds the few operations the game
//! spells differently.

use glam::Vec2;

pub type Vector2f = Vec2;

/// Unit vector in the same direction, or zero for a zero-length input
#[inline]
pub fn normalized(v: Vector2f) -> Vector2f {
    v.normalize_or_zero()
}

/// Component-wise product
#[inline]
pub fn hadamard(a: Vector2f, b: Vector2f) -> Vector2f {
    a * b
}

/// Sine ease-out from `from` to `to`, `t` in [0, 1]
#[inline]
pub fn ease_between(from: Vector2f, to: Vector2f, t: f32) -> Vector2f {
    from + (to - from) * (0.5 * std::f32::consts::PI * t).sin()
}

/// Move `pos` a fraction of the way toward `to` (fraction may exceed 1)
#[inline]
pub fn lerp_toward(pos: Vector2f, to: Vector2f, fraction: f32) -> Vector2f {
    pos + (to - pos) * fraction
}

/// True when `a` and `b` are strictly closer than `limit`
#[inline]
pub fn within(a: Vector2f, b: Vector2f, limit: f32) -> bool {
    (a - b).length() < limit
}
