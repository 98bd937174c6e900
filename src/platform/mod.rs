//! Platform abstraction layer
//!
//! Normalizes keyboard, gamepad and mouse events into one input shape.

pub mod input;

pub use input::{Axis, ControllerInput, Key, MouseButton, PadButton};
