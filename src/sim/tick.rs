//! Fixed timestep simulation tick
//!
//! Top-level mode dispatch. Each tick runs exactly one mode handler to
//! completion, then publishes the shake offset, the ball color and the
//! background scroll counter.

use glam::Vec2;

use super::collision::sweep_ball;
use super::intro;
use super::physics::{move_ball, move_player};
use super::stages::{self, Progress, STAGES};
use super::state::{GameEvent, GameState, Mode};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::platform::ControllerInput;

/// Light shake after a hard bounce (only the first two frames are used)
const BOUNCE_SHAKE_XS: [i8; 4] = [-2, 0, 2, 0];
const BOUNCE_SHAKE_YS: [i8; 4] = [0, -2, 0, 2];
const BOUNCE_SHAKE_FRAMES: u32 = 2;

/// Heavy shake when the player is hit
const DEATH_SHAKE_XS: [i8; 8] = [-6, 3, 5, 2, -3, 2, -2, 0];
const DEATH_SHAKE_YS: [i8; 8] = [3, -6, 2, 4, -2, 3, 1, -1];
const DEATH_SHAKE_FRAMES: u32 = 8;

/// Final y of the game over title
pub const GAMEOVER_TITLE_Y: f32 = 210.0;

/// Game over title height for the stored game over counter.
///
/// The handler places the title from the counter before bumping it, so the
/// title drawn after a tick lags the stored counter by one.
pub fn game_over_title_y(frames: u32) -> f32 {
    let frames = frames.saturating_sub(1);
    if frames <= GAMEOVER_INTRO_FRAMES {
        frames as f32 / GAMEOVER_INTRO_FRAMES as f32 * GAMEOVER_TITLE_Y
    } else {
        GAMEOVER_TITLE_Y
    }
}

/// Screen offset for shake frame `frame`
pub fn shake_offset(frame: u32, for_dead: bool) -> Vec2 {
    let (xs, ys): (&[i8], &[i8]) = if for_dead {
        (&DEATH_SHAKE_XS, &DEATH_SHAKE_YS)
    } else {
        (&BOUNCE_SHAKE_XS, &BOUNCE_SHAKE_YS)
    };
    let i = frame as usize;
    match (xs.get(i), ys.get(i)) {
        (Some(&x), Some(&y)) => Vec2::new(x as f32, y as f32),
        _ => Vec2::ZERO,
    }
}

fn shake_frames(for_dead: bool) -> u32 {
    if for_dead {
        DEATH_SHAKE_FRAMES
    } else {
        BOUNCE_SHAKE_FRAMES
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &ControllerInput, dt: f32) {
    match state.mode {
        Mode::MainMenu => main_menu(state, input),
        Mode::Beginning { frames } => beginning(state, frames),
        Mode::Playing => playing(state, input, dt),
        Mode::Dead { frames } => dead(state, frames),
        Mode::Paused => paused(state, input),
        Mode::GameOver { frames } => game_over(state, input, frames),
        Mode::Shaking { frames, for_dead } => {
            if frames >= shake_frames(for_dead) {
                let next = if for_dead {
                    Mode::Dead { frames: 0 }
                } else {
                    Mode::Playing
                };
                state.set_mode(next);
            }
        }
        Mode::Ending => ending(state, input),
    }

    // The shake frame advances after its offset is published
    if let Mode::Shaking { frames, for_dead } = state.mode {
        state.shake_offset = shake_offset(frames, for_dead);
        state.mode = Mode::Shaking {
            frames: frames + 1,
            for_dead,
        };
    } else {
        state.shake_offset = Vec2::ZERO;
    }

    state.ball.refresh_color();

    if !matches!(state.mode, Mode::Paused | Mode::Shaking { .. }) {
        state.scroll_frames += 1;
    }
}

fn main_menu(state: &mut GameState, input: &ControllerInput) {
    if input.button_start {
        // Holding start into the run must not pause it
        state.pause_latch = true;
        state.set_mode(Mode::Beginning { frames: 0 });
    }
    if input.button_select {
        state.emit(GameEvent::Quit);
    }
}

fn beginning(state: &mut GameState, frames: u32) {
    intro::update(state, frames);
    let frames = frames + 1;
    if intro::finished(frames) {
        intro::quiet(state);
        state.set_mode(Mode::Playing);
    } else {
        state.mode = Mode::Beginning { frames };
    }
}

fn playing(state: &mut GameState, input: &ControllerInput, dt: f32) {
    let pause_pressed = input.pause_pressed();
    if !state.pause_latch && pause_pressed {
        state.set_mode(Mode::Paused);
        state.pause_latch = true;
        return;
    }
    state.pause_latch = pause_pressed;

    let invulnerable = state.player.is_invulnerable();
    if invulnerable {
        if state.player.respawn_frames % FLICKER_FRAMES == 0 {
            state.player.visible = !state.player.visible;
        }
        state.player.respawn_frames += 1;
    } else {
        state.player.visible = true;
    }

    let direction = input.move_direction();
    move_player(state, direction, dt);

    if direction != Vec2::ZERO {
        state.emit(GameEvent::Sound(SoundEffect::Step));
        if state.playing_frames % SPRITE_FRAMES == 0 {
            state.player.sprite_frame ^= 1;
        }
    }

    state.ball.prev_pos = state.ball.pos;
    if stages::advance(state, STAGES) == Progress::Finished {
        state.set_mode(Mode::Ending);
        return;
    }

    move_ball(state, dt);

    if invulnerable {
        state.ball.pos = state.ball.next_pos;
    } else {
        let result = sweep_ball(
            state.ball.pos,
            state.ball.next_pos,
            state.player.pos,
            state.ball.effective_radius(),
        );
        state.ball.pos = result.point;
        if result.hit {
            log::debug!("Ball hit player at {:?}", result.point);
            state.emit(GameEvent::Sound(SoundEffect::Lose));
            if state.player.lives > 0 {
                state.player.lives -= 1;
                state.set_mode(Mode::Shaking {
                    frames: 0,
                    for_dead: true,
                });
            } else {
                state.set_mode(Mode::GameOver { frames: 0 });
            }
        }
    }

    state.playing_frames += 1;
}

fn dead(state: &mut GameState, frames: u32) {
    if frames % FLICKER_FRAMES == 0 {
        state.player.visible = !state.player.visible;
    }
    if frames >= DEAD_FRAMES {
        state.player.visible = true;
        state.set_mode(Mode::Playing);
    } else {
        state.mode = Mode::Dead { frames: frames + 1 };
    }
}

fn paused(state: &mut GameState, input: &ControllerInput) {
    let pause_pressed = input.pause_pressed();
    if !state.pause_latch && pause_pressed {
        state.set_mode(Mode::Playing);
    }
    if !state.pause_latch && input.button_select {
        state.emit(GameEvent::Quit);
    }
    state.pause_latch = pause_pressed;
}

fn game_over(state: &mut GameState, input: &ControllerInput, frames: u32) {
    let dismissed = frames > GAMEOVER_INTRO_FRAMES && input.button_select;
    if dismissed || frames > GAMEOVER_TIMEOUT_FRAMES {
        state.set_mode(Mode::MainMenu);
    } else {
        state.mode = Mode::GameOver { frames: frames + 1 };
    }
}

fn ending(state: &mut GameState, input: &ControllerInput) {
    if input.button_start {
        state.set_mode(Mode::MainMenu);
    }
    if input.button_select {
        state.emit(GameEvent::Quit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{MusicTrack, Volume};
    use crate::sim::stages::{FINAL, FINAL_STAGE};

    fn idle() -> ControllerInput {
        ControllerInput::default()
    }

    fn start() -> ControllerInput {
        ControllerInput {
            button_start: true,
            ..Default::default()
        }
    }

    fn select() -> ControllerInput {
        ControllerInput {
            button_select: true,
            ..Default::default()
        }
    }

    /// Playing, vulnerable, with a scripted ball parked on the player
    fn parked_on_player() -> GameState {
        let mut state = GameState::new();
        state.mode = Mode::Playing;
        state.cursor.stage = 1;
        state.cursor.phase = 1; // idle phase
        state.ball.moves_physically = false;
        state.ball.pos = state.player.pos;
        state.ball.next_pos = state.player.pos;
        state.player.respawn_frames = INVULNERABLE_FRAMES;
        state.drain_events();
        state
    }

    /// Same, with the ball parked in a corner instead
    fn parked_away() -> GameState {
        let mut state = parked_on_player();
        state.ball.pos = Vec2::new(50.0, 50.0);
        state.ball.next_pos = state.ball.pos;
        state
    }

    #[test]
    fn test_start_runs_intro_then_plays() {
        let mut state = GameState::new();
        state.drain_events();
        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.mode, Mode::Beginning { frames: 0 });
        assert!(state.pause_latch);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Music(MusicTrack::Level1)]
        );

        for _ in 0..BEGINNING_FRAMES - 1 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert!(matches!(state.mode, Mode::Beginning { .. }));
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::Playing);
        assert_eq!(state.intro.message, 0);
        assert!((state.ball.pos - Vec2::new(360.0, 90.0)).length() < 1e-3);
    }

    #[test]
    fn test_menu_select_quits() {
        let mut state = GameState::new();
        state.drain_events();
        tick(&mut state, &select(), SIM_DT);
        assert_eq!(state.mode, Mode::MainMenu);
        assert_eq!(state.drain_events(), vec![GameEvent::Quit]);
    }

    #[test]
    fn test_pause_is_edge_triggered() {
        let mut state = parked_away();

        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.mode, Mode::Paused);

        // Still held: stays paused
        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.mode, Mode::Paused);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::Paused);

        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.mode, Mode::Playing);

        // Held through the resume tick: no immediate re-pause
        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.mode, Mode::Playing);

        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::MusicVolume(Volume::Half),
                GameEvent::MusicVolume(Volume::Full)
            ]
        );
    }

    #[test]
    fn test_pause_freezes_scroll() {
        let mut state = parked_away();
        tick(&mut state, &start(), SIM_DT);
        let scroll = state.scroll_frames;
        tick(&mut state, &idle(), SIM_DT);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.scroll_frames, scroll);
    }

    #[test]
    fn test_paused_select_quits() {
        let mut state = GameState::new();
        state.mode = Mode::Paused;
        state.drain_events();
        tick(&mut state, &select(), SIM_DT);
        assert!(state.drain_events().contains(&GameEvent::Quit));
    }

    #[test]
    fn test_hit_with_lives_shakes_then_dies_then_respawns() {
        let mut state = parked_on_player();
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.player.lives, PLAYER_START_LIVES - 1);
        assert_eq!(
            state.mode,
            Mode::Shaking {
                frames: 1,
                for_dead: true
            }
        );
        assert_eq!(state.shake_offset, Vec2::new(-6.0, 3.0));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Sound(SoundEffect::Lose)]
        );

        for _ in 1..DEATH_SHAKE_FRAMES {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.shake_offset, Vec2::new(0.0, -1.0));
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::Dead { frames: 0 });
        assert_eq!(state.shake_offset, Vec2::ZERO);

        for _ in 0..DEAD_FRAMES {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.mode, Mode::Dead { frames: DEAD_FRAMES });
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::Playing);
        assert!(state.player.visible);
        assert_eq!(state.player.respawn_frames, 0);
    }

    #[test]
    fn test_no_collision_while_invulnerable() {
        let mut state = parked_on_player();
        state.player.respawn_frames = 0;
        for _ in 0..INVULNERABLE_FRAMES {
            tick(&mut state, &idle(), SIM_DT);
            assert_eq!(state.mode, Mode::Playing);
        }
        assert_eq!(state.player.lives, PLAYER_START_LIVES);
        tick(&mut state, &idle(), SIM_DT);
        assert!(matches!(state.mode, Mode::Shaking { for_dead: true, .. }));
    }

    #[test]
    fn test_invulnerable_player_flickers() {
        let mut state = parked_on_player();
        state.player.respawn_frames = 0;
        tick(&mut state, &idle(), SIM_DT);
        assert!(!state.player.visible);
        for _ in 1..FLICKER_FRAMES {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert!(!state.player.visible);
        tick(&mut state, &idle(), SIM_DT);
        assert!(state.player.visible);
    }

    #[test]
    fn test_last_hit_is_game_over() {
        let mut state = parked_on_player();
        state.player.lives = 0;
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::GameOver { frames: 0 });
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::Sound(SoundEffect::Lose),
                GameEvent::FadeOutMusic {
                    millis: GAMEOVER_FADE_MS
                },
                GameEvent::Sound(SoundEffect::GameOver),
            ]
        );
    }

    #[test]
    fn test_last_life_then_game_over() {
        let mut state = parked_on_player();
        state.player.lives = 1;

        // The last life is spent on a normal death
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.player.lives, 0);
        assert_eq!(
            state.mode,
            Mode::Shaking {
                frames: 1,
                for_dead: true
            }
        );
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Sound(SoundEffect::Lose)]
        );

        for _ in 0..DEATH_SHAKE_FRAMES + DEAD_FRAMES + 1 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.mode, Mode::Playing);
        state.drain_events();

        // Hit again once the respawn grace runs out
        let mut parked = parked_on_player();
        parked.player.lives = state.player.lives;
        parked.player.respawn_frames = state.player.respawn_frames;
        let mut state = parked;
        for _ in 0..INVULNERABLE_FRAMES {
            tick(&mut state, &idle(), SIM_DT);
            assert_eq!(state.mode, Mode::Playing);
        }
        state.drain_events();
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::GameOver { frames: 0 });
        assert_eq!(state.player.lives, 0);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::Sound(SoundEffect::Lose),
                GameEvent::FadeOutMusic {
                    millis: GAMEOVER_FADE_MS
                },
                GameEvent::Sound(SoundEffect::GameOver),
            ]
        );
    }

    #[test]
    fn test_game_over_returns_to_menu() {
        let mut state = GameState::new();
        state.mode = Mode::GameOver { frames: 0 };
        state.drain_events();

        // Select is ignored while the title drops in
        for _ in 0..=GAMEOVER_INTRO_FRAMES {
            tick(&mut state, &select(), SIM_DT);
        }
        assert!(matches!(state.mode, Mode::GameOver { .. }));

        for _ in GAMEOVER_INTRO_FRAMES + 1..=GAMEOVER_TIMEOUT_FRAMES {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(
            state.mode,
            Mode::GameOver {
                frames: GAMEOVER_TIMEOUT_FRAMES + 1
            }
        );
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::MainMenu);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Music(MusicTrack::Title)]
        );
    }

    #[test]
    fn test_game_over_select_after_intro() {
        let mut state = GameState::new();
        state.mode = Mode::GameOver {
            frames: GAMEOVER_INTRO_FRAMES + 1,
        };
        tick(&mut state, &select(), SIM_DT);
        assert_eq!(state.mode, Mode::MainMenu);
    }

    #[test]
    fn test_game_over_title_drops_in() {
        assert_eq!(game_over_title_y(0), 0.0);
        // First handler tick places the title at the top
        assert_eq!(game_over_title_y(1), 0.0);
        assert!(game_over_title_y(GAMEOVER_INTRO_FRAMES) < GAMEOVER_TITLE_Y);
        assert!((game_over_title_y(GAMEOVER_INTRO_FRAMES + 1) - 210.0).abs() < 1e-3);
        assert_eq!(game_over_title_y(200), 210.0);
    }

    #[test]
    fn test_bounce_shake_returns_to_playing() {
        let mut state = GameState::new();
        state.mode = Mode::Shaking {
            frames: 0,
            for_dead: false,
        };
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.shake_offset, Vec2::new(-2.0, 0.0));
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.shake_offset, Vec2::new(0.0, -2.0));
        assert_eq!(state.scroll_frames, 0);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::Playing);
        assert_eq!(state.shake_offset, Vec2::ZERO);
        assert_eq!(state.scroll_frames, 1);
    }

    #[test]
    fn test_last_stage_exhausted_is_ending() {
        let mut state = parked_away();
        state.cursor.stage = FINAL_STAGE;
        state.cursor.phase = FINAL.len();
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.mode, Mode::Ending);
        assert_eq!(state.cursor.stage, STAGES.len());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Music(MusicTrack::Ending)]
        );

        tick(&mut state, &select(), SIM_DT);
        assert_eq!(state.drain_events(), vec![GameEvent::Quit]);
        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.mode, Mode::MainMenu);
    }

    #[test]
    fn test_walking_steps_and_animates() {
        let mut state = parked_away();
        let right = ControllerInput {
            dir_right: 1.0,
            ..Default::default()
        };
        tick(&mut state, &right, SIM_DT);
        assert_eq!(state.player.sprite_frame, 1);
        assert!(state.player.pos.x > 360.0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Sound(SoundEffect::Step)]
        );
    }

    #[test]
    fn test_color_follows_speed() {
        let mut state = GameState::new();
        state.ball.speed = 1800.0;
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.ball.color[0], 100);
    }

    #[test]
    fn test_full_run_reaches_ending() {
        let mut state = GameState::new();
        tick(&mut state, &start(), SIM_DT);
        state.player.lives = 10_000;

        let mut ticks = 0;
        while state.mode != Mode::Ending && ticks < 200_000 {
            tick(&mut state, &idle(), SIM_DT);
            ticks += 1;
        }
        assert_eq!(state.mode, Mode::Ending);
        assert_eq!(state.cursor.stage, STAGES.len());

        let music: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Music(track) => Some(track),
                _ => None,
            })
            .collect();
        assert_eq!(
            music,
            vec![
                MusicTrack::Title,
                MusicTrack::Level1,
                MusicTrack::Level2,
                MusicTrack::Level3,
                MusicTrack::Ending
            ]
        );
    }
}
