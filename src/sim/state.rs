//! Game state and core simulation types
//!
//! One aggregate owned by the host and mutated by `tick`. Everything a run
//! needs lives here, including the scratch the ball phases share, so phases
//! communicate only through declared fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{MusicTrack, SoundEffect, Volume};
use crate::consts::*;
use crate::math::normalized;
use crate::screen_center;

/// Top-level game mode. Counters live in the variant that uses them and
/// start from zero every time the variant is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Title screen
    MainMenu,
    /// Scripted intro before the first stage
    Beginning { frames: u32 },
    /// Active gameplay
    Playing,
    /// Player was hit and is blinking before respawn
    Dead { frames: u32 },
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver { frames: u32 },
    /// Screen shake; `for_dead` shakes harder and leads to `Dead`
    Shaking { frames: u32, for_dead: bool },
    /// All stages survived
    Ending,
}

/// Side effects for the host (audio, process exit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Music(MusicTrack),
    Sound(SoundEffect),
    MusicVolume(Volume),
    FadeOutMusic { millis: u32 },
    Quit,
}

/// The player's crab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub visible: bool,
    pub lives: u32,
    /// Walk animation cell (0 or 1)
    pub sprite_frame: u8,
    /// Ticks since respawn; collisions are ignored below `INVULNERABLE_FRAMES`
    pub respawn_frames: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: screen_center(),
            vel: Vec2::ZERO,
            visible: true,
            lives: PLAYER_START_LIVES,
            sprite_frame: 0,
            respawn_frames: 0,
        }
    }
}

impl Player {
    pub fn is_invulnerable(&self) -> bool {
        self.respawn_frames < INVULNERABLE_FRAMES
    }
}

/// The orb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Position used for rendering and collision
    pub pos: Vec2,
    /// Position at the start of the tick (motion trail)
    pub prev_pos: Vec2,
    /// Candidate position for this tick, committed after collision
    pub next_pos: Vec2,
    /// Unit direction (physical motion only)
    pub direction: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// Radius multiplier over `BALL_RADIUS`
    pub scale: f32,
    /// Display color derived from speed and scale
    pub color: [u8; 3],
    pub h_reflect: bool,
    pub v_reflect: bool,
    /// Position derives from direction and speed (otherwise phases write it)
    pub moves_physically: bool,
    /// Fast motion leaves ghost copies behind
    pub moves_linearly: bool,
}

impl Default for Ball {
    fn default() -> Self {
        let mut ball = Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0, 40.0),
            prev_pos: Vec2::new(SCREEN_WIDTH / 2.0, 90.0),
            next_pos: Vec2::new(SCREEN_WIDTH / 2.0, 40.0),
            direction: normalized(Vec2::new(0.5, 0.4)),
            speed: BALL_START_SPEED,
            scale: BALL_START_SCALE,
            color: [255, 255, 255],
            h_reflect: true,
            v_reflect: true,
            moves_physically: true,
            moves_linearly: false,
        };
        ball.refresh_color();
        ball
    }
}

impl Ball {
    /// Radius used for reflection, collision and drawing
    #[inline]
    pub fn effective_radius(&self) -> f32 {
        self.scale * BALL_RADIUS
    }

    /// Faster is redder, bigger is bluer
    pub fn refresh_color(&mut self) {
        let r = (self.speed / 18.0).min(255.0) as u8;
        let b = (self.scale * 400.0).min(255.0) as u8;
        self.color = [r, 255 - r, b];
    }

    /// Bounce sound tier by size
    pub fn bounce_tier(&self) -> u8 {
        match self.scale {
            s if s < 0.1 => 0,
            s if s < 0.2 => 1,
            s if s < 0.35 => 2,
            _ => 3,
        }
    }
}

/// Where the phase engine is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCursor {
    /// Index into the stage list; equals the stage count once all are done
    pub stage: usize,
    /// Index into the current stage's phases
    pub phase: usize,
    /// Ticks the current phase has run
    pub frames: u32,
}

/// Curve parameters that persist from one phase to the next
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveSession {
    /// Spiral pitch
    pub b: f32,
    /// Last curve center
    pub center: Vec2,
    /// Ball position captured on the first tick of the current phase
    pub origin: Vec2,
}

impl Default for CurveSession {
    fn default() -> Self {
        Self {
            b: -4.0,
            center: screen_center(),
            origin: Vec2::ZERO,
        }
    }
}

/// Destination polygons for the final stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polygon {
    Line,
    Pentagram,
}

impl Polygon {
    /// Starting angles in degrees, in visiting order
    pub fn angles(self) -> &'static [f32] {
        match self {
            Polygon::Line => &[90.0, 270.0],
            Polygon::Pentagram => &[54.0, 198.0, 342.0, 126.0, 270.0],
        }
    }
}

/// Destination chasing state plus the marker overlay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destinations {
    /// Angles in degrees on the `DEST_RADIUS` circle; animated by the phases
    pub angles: Vec<f32>,
    /// Index of the angle being chased
    pub current: usize,
    pub markers_visible: bool,
    /// RGBA
    pub marker_color: [u8; 4],
}

impl Default for Destinations {
    fn default() -> Self {
        Self {
            angles: Polygon::Line.angles().to_vec(),
            current: 0,
            markers_visible: false,
            marker_color: [0, 0, 0, 0],
        }
    }
}

impl Destinations {
    /// Swap in a polygon; the chase index carries over
    pub fn use_polygon(&mut self, polygon: Polygon) {
        self.angles = polygon.angles().to_vec();
        if self.current >= self.angles.len() {
            self.current = 0;
        }
    }

    /// Offset every angle by `degrees`
    pub fn rotate(&mut self, degrees: f32) {
        for angle in &mut self.angles {
            *angle += degrees;
        }
    }

    /// Screen position of the destination being chased
    pub fn target(&self) -> Vec2 {
        crate::polar_to_screen(DEST_RADIUS, self.angles[self.current])
    }

    /// Move on to the next corner
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.angles.len();
    }

    /// Screen positions of all markers
    pub fn positions(&self) -> Vec<Vec2> {
        self.angles
            .iter()
            .map(|&a| crate::polar_to_screen(DEST_RADIUS, a))
            .collect()
    }
}

/// Intro dialogue overlay
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IntroOverlay {
    /// Index into `ENEMY_MESSAGES` (0 = silent)
    pub message: u8,
    /// Enemy talk animation cell (0 or 1)
    pub enemy_sprite_frame: u8,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current mode
    pub mode: Mode,
    pub player: Player,
    pub ball: Ball,
    pub cursor: PhaseCursor,
    pub curve: CurveSession,
    pub dests: Destinations,
    /// Only moves during the intro
    pub enemy_pos: Vec2,
    pub intro: IntroOverlay,
    /// Ticks spent in Playing this run
    pub playing_frames: u32,
    /// Offset published by the current shake frame
    pub shake_offset: Vec2,
    /// Pause button state last tick; shared by Playing and Paused. Survives resets.
    pub pause_latch: bool,
    /// Ticks not spent paused or shaking; drives background scrolling. Survives resets.
    pub scroll_frames: u64,
    /// Pending side effects for the host
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state on the title screen
    pub fn new() -> Self {
        let mut state = Self::fresh_run();
        state.events.push(GameEvent::Music(MusicTrack::Title));
        state
    }

    fn fresh_run() -> Self {
        Self {
            mode: Mode::MainMenu,
            player: Player::default(),
            ball: Ball::default(),
            cursor: PhaseCursor::default(),
            curve: CurveSession::default(),
            dests: Destinations::default(),
            enemy_pos: Vec2::new(SCREEN_WIDTH / 2.0, -32.0),
            intro: IntroOverlay::default(),
            playing_frames: 0,
            shake_offset: Vec2::ZERO,
            pause_latch: false,
            scroll_frames: 0,
            events: Vec::new(),
        }
    }

    /// Reset everything a run owns; keeps the pause latch, scroll counter and queued events
    pub fn reset_for_new_run(&mut self) {
        let fresh = Self::fresh_run();
        let pause_latch = self.pause_latch;
        let scroll_frames = self.scroll_frames;
        let events = std::mem::take(&mut self.events);
        *self = Self {
            pause_latch,
            scroll_frames,
            events,
            ..fresh
        };
    }

    /// Queue a side effect for the host
    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending side effects
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch modes, applying the side effects of the transition
    pub fn set_mode(&mut self, next: Mode) {
        let current = self.mode;
        match (current, next) {
            (Mode::Playing, Mode::Paused) => self.emit(GameEvent::MusicVolume(Volume::Half)),
            (Mode::Paused, Mode::Playing) => self.emit(GameEvent::MusicVolume(Volume::Full)),
            (Mode::MainMenu, Mode::Beginning { .. }) => {
                self.emit(GameEvent::Music(MusicTrack::Level1));
                self.reset_for_new_run();
            }
            (Mode::GameOver { .. }, Mode::MainMenu) => {
                self.emit(GameEvent::Music(MusicTrack::Title))
            }
            (Mode::Dead { .. }, Mode::Playing) => self.player.respawn_frames = 0,
            (_, Mode::GameOver { .. }) => {
                self.emit(GameEvent::FadeOutMusic {
                    millis: GAMEOVER_FADE_MS,
                });
                self.emit(GameEvent::Sound(SoundEffect::GameOver));
            }
            (_, Mode::Ending) => self.emit(GameEvent::Music(MusicTrack::Ending)),
            _ => {}
        }
        log::info!("Mode {:?} -> {:?}", current, next);
        self.mode = next;
    }

    /// Sound for a ball bounce; hard bounces shake the screen
    pub fn bounce_effect(&mut self) {
        let tier = self.ball.bounce_tier();
        self.emit(GameEvent::Sound(SoundEffect::Bounce(tier)));
        if self.ball.speed > BALL_SHAKE_SPEED {
            self.set_mode(Mode::Shaking {
                frames: 0,
                for_dead: false,
            });
        }
    }
}
