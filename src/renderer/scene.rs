//! Per-tick scene description
//!
//! Everything a host needs to draw one frame, captured from the game state
//! after `tick`. Drawing itself (textures, fonts, the window) happens outside
//! the crate.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::intro::ENEMY_MESSAGES;
use crate::sim::stages::FINAL_STAGE;
use crate::sim::tick::game_over_title_y;
use crate::sim::{GameState, Mode};

/// Title screen text
pub const TITLE_TEXT: &str = "Beware \nthe Orb";
pub const GAME_OVER_TEXT: &str = "Game Over";
/// Background texture height; the 720px view scrolls through it
pub const BACKGROUND_HEIGHT: u64 = 1440;
/// Destination marker size (drawn from its top-left corner)
pub const MARKER_SIZE: f32 = 10.0;

/// A sprite cell at a center position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub pos: Vec2,
    /// Animation cell (0 or 1)
    pub frame: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Markers {
    /// RGBA tint
    pub color: [u8; 4],
    /// Top-left corners
    pub positions: Vec<Vec2>,
    pub size: f32,
}

/// A reflecting wall, drawn as a grey line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
}

/// Text or image drawn over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Overlay {
    None,
    EnemyMessage(&'static str),
    Paused,
    GameOver { text: &'static str, y: f32 },
}

/// The playfield, drawn in every mode except the title and ending screens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct World {
    /// Circular arena backdrop for the final stage
    pub big_circle: bool,
    /// None while blinking
    pub player: Option<Sprite>,
    pub enemy: Sprite,
    pub ball: BallSprite,
    /// Ghost copies behind a fast ball, nearest first
    pub trail: Vec<Vec2>,
    pub markers: Option<Markers>,
    pub walls: Vec<Line>,
    pub lives: u32,
    pub lives_label: String,
    pub overlay: Overlay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Screen {
    Title { text: &'static str },
    World(World),
    Ending,
}

/// Renderable scene for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Source y of the visible background window
    pub background_y: f32,
    /// Whole-frame offset while shaking
    pub shake_offset: Vec2,
    pub screen: Screen,
}

impl Scene {
    /// Build the scene for the current state
    pub fn capture(state: &GameState, settings: &Settings) -> Self {
        let shake_offset = if settings.effective_screen_shake() {
            state.shake_offset
        } else {
            Vec2::ZERO
        };
        let screen = match state.mode {
            Mode::MainMenu => Screen::Title { text: TITLE_TEXT },
            Mode::Ending => Screen::Ending,
            _ => Screen::World(capture_world(state, settings)),
        };
        Self {
            background_y: background_y(state.scroll_frames),
            shake_offset,
            screen,
        }
    }
}

/// Background window position for a scroll count; scrolls up two pixels per tick
pub fn background_y(scroll_frames: u64) -> f32 {
    (BACKGROUND_HEIGHT - (scroll_frames * 2) % BACKGROUND_HEIGHT) as f32
}

fn capture_world(state: &GameState, settings: &Settings) -> World {
    let ball = &state.ball;
    let radius = ball.effective_radius();

    let trail = if settings.trails && state.mode == Mode::Playing && ball.moves_linearly {
        trail_ghosts(ball.pos, ball.prev_pos, radius)
    } else {
        Vec::new()
    };

    let markers = state.dests.markers_visible.then(|| Markers {
        color: state.dests.marker_color,
        positions: state.dests.positions(),
        size: MARKER_SIZE,
    });

    let overlay = match state.mode {
        Mode::Paused => Overlay::Paused,
        Mode::GameOver { frames } => Overlay::GameOver {
            text: GAME_OVER_TEXT,
            y: game_over_title_y(frames),
        },
        Mode::Beginning { .. } if state.intro.message > 0 => ENEMY_MESSAGES
            .get(state.intro.message as usize)
            .map_or(Overlay::None, |&text| Overlay::EnemyMessage(text)),
        _ => Overlay::None,
    };

    World {
        big_circle: state.cursor.stage == FINAL_STAGE,
        player: state.player.visible.then_some(Sprite {
            pos: state.player.pos,
            frame: state.player.sprite_frame,
        }),
        enemy: Sprite {
            pos: state.enemy_pos,
            frame: state.intro.enemy_sprite_frame,
        },
        ball: BallSprite {
            pos: ball.pos,
            radius,
            color: ball.color,
        },
        trail,
        markers,
        walls: walls(ball.h_reflect, ball.v_reflect),
        lives: state.player.lives,
        lives_label: format!("x {}", state.player.lives),
        overlay,
    }
}

/// Ghost positions behind a ball that moved from `prev_pos` to `pos`. The
/// faster the ball relative to its own diameter, the more ghosts, spaced
/// evenly back along the move.
pub fn trail_ghosts(pos: Vec2, prev_pos: Vec2, radius: f32) -> Vec<Vec2> {
    let diff = pos - prev_pos;
    let distance = diff.length();
    let diameter = 2.0 * radius.trunc();
    let (count, spacing) = if distance < diameter * 3.0 {
        (0, 0.0)
    } else if distance < diameter * 6.0 {
        (1, 0.5)
    } else if distance < diameter * 8.0 {
        (2, 0.33)
    } else if distance < diameter * 10.0 {
        (3, 0.25)
    } else {
        (5, 0.167)
    };
    (1..=count)
        .map(|i| pos - diff * spacing * i as f32)
        .collect()
}

fn walls(h_reflect: bool, v_reflect: bool) -> Vec<Line> {
    let right = SCREEN_WIDTH - 1.0;
    let bottom = SCREEN_HEIGHT - 1.0;
    let mut lines = Vec::new();
    if h_reflect {
        lines.push(Line {
            from: Vec2::ZERO,
            to: Vec2::new(0.0, bottom),
        });
        lines.push(Line {
            from: Vec2::new(right, 0.0),
            to: Vec2::new(right, bottom),
        });
    }
    if v_reflect {
        lines.push(Line {
            from: Vec2::ZERO,
            to: Vec2::new(right, 0.0),
        });
        lines.push(Line {
            from: Vec2::new(0.0, bottom),
            to: Vec2::new(right, bottom),
        });
    }
    lines
}
