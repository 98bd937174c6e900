//! Beware the Orb - an arcade dodge game
//!
//! Core modules:
//! - `sim`: Simulation (phase engine, stage sequencer, physics, state machine)
//! - `renderer`: Per-tick scene description handed to the host for drawing
//! - `platform`: Input normalization
//! - `audio`: Music/sound cues and the backend seam
//! - `settings`: User preferences

pub mod audio;
pub mod autopilot;
pub mod error;
pub mod math;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::Error;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical screen dimensions
    pub const SCREEN_WIDTH: f32 = 720.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Nominal simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed per-tick delta used by destination chasing, independent of frame timing
    pub const FIXED_DELTA: f32 = 0.017;

    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 28.0;
    pub const PLAYER_START_LIVES: u32 = 5;
    /// Player acceleration (pixels/s²) at full stick
    pub const PLAYER_ACCELERATION: f32 = 12000.0;
    /// Velocity multiplier applied every tick
    pub const PLAYER_FRICTION: f32 = 0.75;
    /// Velocities below this magnitude settle to zero
    pub const PLAYER_SETTLE_SPEED: f32 = 0.2;

    /// Ball radius at scale 1.0; effective radius is `scale * BALL_RADIUS`
    pub const BALL_RADIUS: f32 = 512.0;
    pub const BALL_START_SPEED: f32 = 500.0;
    pub const BALL_START_SCALE: f32 = 0.01;
    /// Bounces above this speed shake the screen
    pub const BALL_SHAKE_SPEED: f32 = 2000.0;

    /// Radius of the circle destination angles are placed on
    pub const DEST_RADIUS: f32 = SCREEN_HEIGHT / 2.0;

    /// Invulnerability window after respawn (ticks)
    pub const INVULNERABLE_FRAMES: u32 = 60;
    /// Visibility flicker period while dead or invulnerable (ticks)
    pub const FLICKER_FRAMES: u32 = 20;
    /// Time spent in Dead before respawning (ticks)
    pub const DEAD_FRAMES: u32 = 90;
    /// Scripted intro length (ticks)
    pub const BEGINNING_FRAMES: u32 = 720;
    /// Game over title drop-in (ticks)
    pub const GAMEOVER_INTRO_FRAMES: u32 = 95;
    /// Game over auto-return to menu (ticks)
    pub const GAMEOVER_TIMEOUT_FRAMES: u32 = 240;
    /// Sprite animation period (ticks)
    pub const SPRITE_FRAMES: u32 = 10;

    /// Music fade when the run is lost (ms)
    pub const GAMEOVER_FADE_MS: u32 = 300;

    /// Speed/scale multipliers, per tick. `L` = large (scale) variants,
    /// bare = speed.
    pub const MUL_UP_1L: f32 = 1.005;
    pub const MUL_UP_2L: f32 = 1.01;
    pub const MUL_DOWN_1L: f32 = 0.995025;
    pub const MUL_DOWN_2L: f32 = 0.990099;

    pub const MUL_UP_1: f32 = 1.0045;
    pub const MUL_UP_2: f32 = 1.009;
    pub const MUL_DOWN_1: f32 = 0.995520159;
    pub const MUL_DOWN_2: f32 = 0.9910802775;
}

/// Screen center
#[inline]
pub fn screen_center() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH / 2.0, consts::SCREEN_HEIGHT / 2.0)
}

/// Convert polar (r, degrees) around the screen center to screen coordinates
#[inline]
pub fn polar_to_screen(r: f32, degrees: f32) -> Vec2 {
    let theta = degrees.to_radians();
    screen_center() + Vec2::new(r * theta.cos(), r * theta.sin())
}
