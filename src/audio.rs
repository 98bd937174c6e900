//! Audio cues and playback routing
//!
//! The simulation only names cues; a backend plays them. `AudioManager`
//! applies channel policy and volume settings on the way through.

use serde::{Deserialize, Serialize};

use crate::Settings;
use crate::sim::GameEvent;

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    Title,
    Level1,
    Level2,
    Level3,
    Ending,
}

impl MusicTrack {
    pub fn asset_path(&self) -> &'static str {
        match self {
            MusicTrack::Title => "assets/title.ogg",
            MusicTrack::Level1 => "assets/level1.ogg",
            MusicTrack::Level2 => "assets/level2.ogg",
            MusicTrack::Level3 => "assets/level3.ogg",
            MusicTrack::Ending => "assets/ending.ogg",
        }
    }
}

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player footstep
    Step,
    /// Player hit by the ball
    Lose,
    /// Out of lives
    GameOver,
    /// Ball bounce, tier 0 (tiny) to 3 (huge)
    Bounce(u8),
}

/// Mixer channel a sound is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// First free channel
    Any,
    Fixed(u8),
}

impl SoundEffect {
    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundEffect::Step => "assets/step1.wav",
            SoundEffect::Lose => "assets/lose.wav",
            SoundEffect::GameOver => "assets/gameover.wav",
            SoundEffect::Bounce(0) => "assets/bounce0.wav",
            SoundEffect::Bounce(1) => "assets/bounce1.wav",
            SoundEffect::Bounce(2) => "assets/bounce2.wav",
            SoundEffect::Bounce(_) => "assets/bounce3.wav",
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            SoundEffect::Step => Channel::Fixed(1),
            SoundEffect::Lose => Channel::Fixed(2),
            SoundEffect::Bounce(_) => Channel::Fixed(3),
            SoundEffect::GameOver => Channel::Any,
        }
    }

    /// Footsteps don't restart while the previous one is still playing
    pub fn waits_for_channel(&self) -> bool {
        matches!(self, SoundEffect::Step)
    }
}

/// Music volume levels the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Volume {
    Full,
    Half,
}

/// Device-side playback. Calls are fire-and-forget.
pub trait AudioBackend {
    /// Start a looping music track, replacing the current one
    fn play_music(&mut self, track: MusicTrack);
    /// Set music volume (0.0 - 1.0)
    fn set_music_volume(&mut self, volume: f32);
    /// Fade the current track out
    fn fade_out_music(&mut self, millis: u32);
    /// Play a one-shot effect at the given volume
    fn play_sound(&mut self, effect: SoundEffect, channel: Channel, volume: f32);
    /// Whether a fixed channel is still playing
    fn is_channel_playing(&self, channel: u8) -> bool;
}

/// Backend that only logs cues (headless runs, missing audio device)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play_music(&mut self, track: MusicTrack) {
        log::debug!("music: {}", track.asset_path());
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("music volume: {volume:.3}");
    }

    fn fade_out_music(&mut self, millis: u32) {
        log::debug!("music fade out over {millis} ms");
    }

    fn play_sound(&mut self, effect: SoundEffect, channel: Channel, volume: f32) {
        log::debug!("sound: {} on {:?} at {volume:.2}", effect.asset_path(), channel);
    }

    fn is_channel_playing(&self, _channel: u8) -> bool {
        false
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    music_volume: f32,
    sfx_volume: f32,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(mut backend: B, settings: &Settings) -> Self {
        let music_volume = settings.effective_music_volume();
        backend.set_music_volume(music_volume);
        Self {
            backend,
            music_volume,
            sfx_volume: settings.effective_sfx_volume(),
        }
    }

    /// Pick up changed settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.music_volume = settings.effective_music_volume();
        self.sfx_volume = settings.effective_sfx_volume();
        self.backend.set_music_volume(self.music_volume);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Route one simulation event. Non-audio events are ignored.
    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Music(track) => self.backend.play_music(track),
            GameEvent::MusicVolume(Volume::Full) => self.backend.set_music_volume(self.music_volume),
            GameEvent::MusicVolume(Volume::Half) => {
                self.backend.set_music_volume(self.music_volume / 2.0)
            }
            GameEvent::FadeOutMusic { millis } => self.backend.fade_out_music(millis),
            GameEvent::Sound(effect) => self.play(effect),
            GameEvent::Quit => {}
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.sfx_volume <= 0.0 {
            return;
        }
        let channel = effect.channel();
        if let Channel::Fixed(ch) = channel {
            if effect.waits_for_channel() && self.backend.is_channel_playing(ch) {
                return;
            }
        }
        self.backend.play_sound(effect, channel, self.sfx_volume);
    }
}
