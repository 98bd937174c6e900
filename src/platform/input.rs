//! Normalized controller input
//!
//! Keyboard, gamepad and mouse all feed the same `ControllerInput`. The host
//! forwards raw events into it and hands the struct to `tick` once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerInput {
    /// Direction intensities, 0..1. Opposing pairs are never both non-zero
    /// from the same source.
    pub dir_left: f32,
    pub dir_right: f32,
    pub dir_up: f32,
    pub dir_down: f32,

    /// Accumulated mouse motion since the last `end_frame`
    pub mouse_move_x: i32,
    pub mouse_move_y: i32,
    pub mouse_wheel: i32,
    pub button_mouse_l: bool,
    pub button_mouse_r: bool,
    pub button_mouse_m: bool,

    pub button_a: bool,
    pub button_b: bool,
    pub button_c: bool,
    pub button_d: bool,
    pub button_l: bool,
    pub button_r: bool,
    pub button_l2: bool,
    pub button_r2: bool,
    pub button_select: bool,
    pub button_start: bool,
}

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    P,
    Escape,
}

impl Key {
    /// Parse a key name as reported by browser/winit style key events
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "w" | "W" => Key::W,
            "a" | "A" => Key::A,
            "s" | "S" => Key::S,
            "d" | "D" => Key::D,
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            " " | "Space" => Key::Space,
            "p" | "P" => Key::P,
            "Escape" => Key::Escape,
            _ => return None,
        };
        Some(key)
    }
}

/// Gamepad axes that steer the crab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    LeftX,
    LeftY,
}

/// Gamepad buttons, standard controller layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadButton {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    A,
    B,
    X,
    Y,
    LeftShoulder,
    RightShoulder,
    Start,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[inline]
fn intensity(down: bool) -> f32 {
    if down { 1.0 } else { 0.0 }
}

impl ControllerInput {
    /// Key press or release. Auto-repeat events should not be forwarded.
    pub fn key(&mut self, key: Key, down: bool) {
        match key {
            Key::W | Key::Up => self.dir_up = intensity(down),
            Key::S | Key::Down => self.dir_down = intensity(down),
            Key::A | Key::Left => self.dir_left = intensity(down),
            Key::D | Key::Right => self.dir_right = intensity(down),
            Key::Space | Key::P => self.button_start = down,
            Key::Escape => self.button_select = down,
        }
    }

    /// Analog stick motion with a raw signed 16-bit value
    pub fn axis(&mut self, axis: Axis, raw: i16) {
        let value = if raw > 0 {
            raw as f32 / 32767.0
        } else {
            raw as f32 / 32768.0
        };
        let (negative, positive) = match axis {
            Axis::LeftX => (&mut self.dir_left, &mut self.dir_right),
            Axis::LeftY => (&mut self.dir_up, &mut self.dir_down),
        };
        if value < 0.0 {
            *negative = -value;
            *positive = 0.0;
        } else {
            *positive = value;
            *negative = 0.0;
        }
    }

    /// Gamepad button press or release
    pub fn pad_button(&mut self, button: PadButton, pressed: bool) {
        match button {
            PadButton::DpadUp => self.dir_up = intensity(pressed),
            PadButton::DpadDown => self.dir_down = intensity(pressed),
            PadButton::DpadLeft => self.dir_left = intensity(pressed),
            PadButton::DpadRight => self.dir_right = intensity(pressed),
            PadButton::A => self.button_a = pressed,
            PadButton::B => self.button_b = pressed,
            PadButton::X => self.button_c = pressed,
            PadButton::Y => self.button_d = pressed,
            PadButton::LeftShoulder => self.button_l = pressed,
            PadButton::RightShoulder => self.button_r = pressed,
            PadButton::Start => self.button_start = pressed,
            PadButton::Back => self.button_select = pressed,
        }
    }

    pub fn mouse_motion(&mut self, dx: i32, dy: i32) {
        self.mouse_move_x += dx;
        self.mouse_move_y += dy;
    }

    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.button_mouse_l = pressed,
            MouseButton::Right => self.button_mouse_r = pressed,
            MouseButton::Middle => self.button_mouse_m = pressed,
        }
    }

    pub fn mouse_wheel(&mut self, delta: i32) {
        self.mouse_wheel += delta;
    }

    /// Clear per-frame accumulators; held buttons and directions persist
    pub fn end_frame(&mut self) {
        self.mouse_move_x = 0;
        self.mouse_move_y = 0;
        self.mouse_wheel = 0;
    }

    /// Raw steering vector (right - left, down - up), not normalized
    pub fn move_direction(&self) -> Vec2 {
        Vec2::new(
            self.dir_right - self.dir_left,
            self.dir_down - self.dir_up,
        )
    }

    /// Either pause button is held
    pub fn pause_pressed(&self) -> bool {
        self.button_start || self.button_select
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut input = ControllerInput::default();
        input.key(Key::W, true);
        input.key(Key::Right, true);
        assert_eq!(input.move_direction(), Vec2::new(1.0, -1.0));

        input.key(Key::W, false);
        input.key(Key::Down, true);
        assert_eq!(input.move_direction(), Vec2::new(1.0, 1.0));

        input.key(Key::P, true);
        assert!(input.button_start);
        assert!(input.pause_pressed());
        input.key(Key::P, false);
        input.key(Key::Escape, true);
        assert!(input.button_select);
        assert!(!input.button_start);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("d"), Some(Key::D));
        assert_eq!(Key::from_name("Enter"), None);
    }

    #[test]
    fn test_axis_scaling_and_exclusion() {
        let mut input = ControllerInput::default();
        input.axis(Axis::LeftX, i16::MAX);
        assert_eq!(input.dir_right, 1.0);
        assert_eq!(input.dir_left, 0.0);

        input.axis(Axis::LeftX, i16::MIN);
        assert_eq!(input.dir_left, 1.0);
        assert_eq!(input.dir_right, 0.0);

        input.axis(Axis::LeftY, -16384);
        assert_eq!(input.dir_up, 0.5);
        assert_eq!(input.dir_down, 0.0);

        input.axis(Axis::LeftY, 0);
        assert_eq!(input.dir_up, 0.0);
        assert_eq!(input.dir_down, 0.0);
    }

    #[test]
    fn test_pad_buttons() {
        let mut input = ControllerInput::default();
        input.pad_button(PadButton::X, true);
        input.pad_button(PadButton::Y, true);
        input.pad_button(PadButton::Back, true);
        input.pad_button(PadButton::DpadLeft, true);
        assert!(input.button_c);
        assert!(input.button_d);
        assert!(input.button_select);
        assert_eq!(input.dir_left, 1.0);

        input.pad_button(PadButton::DpadLeft, false);
        assert_eq!(input.dir_left, 0.0);
    }

    #[test]
    fn test_mouse_accumulates_until_end_frame() {
        let mut input = ControllerInput::default();
        input.mouse_motion(3, -2);
        input.mouse_motion(4, 1);
        input.mouse_wheel(1);
        input.mouse_button(MouseButton::Middle, true);
        assert_eq!((input.mouse_move_x, input.mouse_move_y), (7, -1));
        assert_eq!(input.mouse_wheel, 1);

        input.end_frame();
        assert_eq!((input.mouse_move_x, input.mouse_move_y, input.mouse_wheel), (0, 0, 0));
        assert!(input.button_mouse_m);
    }
}
