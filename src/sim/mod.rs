//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per frame, run to completion
//! - No randomness; every ball motion is scripted in the stage tables
//! - No rendering, audio or platform dependencies (side effects are events)

pub mod chase;
pub mod collision;
pub mod intro;
pub mod phase;
pub mod physics;
pub mod stages;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, sweep_ball};
pub use phase::{Motion, Phase, Step};
pub use stages::{Progress, STAGES};
pub use state::{Ball, GameEvent, GameState, Mode, Player, Polygon};
pub use tick::tick;
