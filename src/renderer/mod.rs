//! Render contract
//!
//! The crate does not draw. Each frame the host captures a `Scene` from the
//! game state and draws it with whatever backend it owns.

pub mod scene;

pub use scene::{Overlay, Scene, Screen, World};
