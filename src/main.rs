//! Beware the Orb entry point
//!
//! Windowing, drawing and audio devices belong to the host. Natively this
//! runs a headless attract-mode game: the autopilot plays one run at a fixed
//! timestep, audio cues go to the logging backend, and the final scene is
//! printed as JSON.

use beware_orb::audio::{AudioManager, NullAudio};
use beware_orb::autopilot::Autopilot;
use beware_orb::consts::*;
use beware_orb::renderer::Scene;
use beware_orb::settings::{SETTINGS_FILE, Settings};
use beware_orb::sim::{GameEvent, GameState, Mode, tick};

/// Autopilot seed for the attract run
const DEMO_SEED: u64 = 0x0b;
/// Stop after ten minutes of game time
const MAX_TICKS: u32 = 60 * 60 * 10;

/// Game instance holding all state
struct Game {
    state: GameState,
    settings: Settings,
    audio: AudioManager<NullAudio>,
    pilot: Autopilot,
    ticks: u32,
    quit: bool,
}

impl Game {
    fn new(settings: Settings, seed: u64) -> Self {
        let audio = AudioManager::new(NullAudio, &settings);
        Self {
            state: GameState::new(),
            settings,
            audio,
            pilot: Autopilot::new(seed),
            ticks: 0,
            quit: false,
        }
    }

    /// Run one fixed step and route its side effects
    fn step(&mut self) {
        let input = self.pilot.input(&self.state);
        tick(&mut self.state, &input, SIM_DT);
        self.ticks += 1;

        for event in self.state.drain_events() {
            if event == GameEvent::Quit {
                self.quit = true;
            }
            self.audio.handle(&event);
        }
    }

    fn finished(&self) -> bool {
        self.quit
            || self.ticks >= MAX_TICKS
            || matches!(self.state.mode, Mode::Ending | Mode::GameOver { .. })
    }
}

fn main() {
    env_logger::init();
    log::info!("Beware the Orb (headless) starting...");

    let settings = Settings::load_or_default(SETTINGS_FILE);
    let mut game = Game::new(settings, DEMO_SEED);

    // Leave the title screen first so the run loop sees the new run
    game.step();
    while !game.finished() {
        game.step();
    }

    log::info!(
        "Run ended after {} ticks in {:?} at stage {}, {} lives left",
        game.ticks,
        game.state.mode,
        game.state.cursor.stage,
        game.state.player.lives
    );

    let scene = Scene::capture(&game.state, &game.settings);
    match serde_json::to_string_pretty(&scene) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize scene: {}", e),
    }
}
