//! Sound-effect triggers
//!
//! The simulation only queues [`SoundEffect`]s. The manager applies the
//! mix (per-effect gain, master and sfx volume, mute) and hands the result
//! to whatever backend the frontend plugged in.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player left the ground or a wall
    Jump,
    /// Dash started
    Dash,
    /// Enemy fired
    Shoot,
    /// Player or enemy was hit
    Hit,
    /// Background loop
    Ambience,
}

impl SoundEffect {
    /// Mix level relative to the other effects
    pub fn gain(self) -> f32 {
        match self {
            SoundEffect::Jump => 0.7,
            SoundEffect::Dash => 0.3,
            SoundEffect::Shoot => 0.4,
            SoundEffect::Hit => 0.8,
            SoundEffect::Ambience => 0.0,
        }
    }

    /// Asset path of the sample
    pub fn path(self) -> &'static str {
        match self {
            SoundEffect::Jump => "data/sfx/jump.wav",
            SoundEffect::Dash => "data/sfx/dash.wav",
            SoundEffect::Shoot => "data/sfx/shoot.wav",
            SoundEffect::Hit => "data/sfx/hit.wav",
            SoundEffect::Ambience => "data/sfx/ambience.wav",
        }
    }
}

/// Music volume before the user's music slider
pub const MUSIC_GAIN: f32 = 0.5;

/// Something that can actually make noise
pub trait AudioBackend {
    /// Fire and forget a sample at the given volume
    fn play(&mut self, effect: SoundEffect, volume: f32, looping: bool);
    /// Start the background music loop
    fn play_music(&mut self, volume: f32);
    /// Stop everything and release the device
    fn shutdown(&mut self);
}

/// Backend that only logs; used headless and in tests
#[derive(Debug, Default)]
pub struct LogBackend {
    pub played: Vec<SoundEffect>,
}

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32, looping: bool) {
        log::debug!("sfx {:?} at {:.2}{}", effect, volume, if looping { " (loop)" } else { "" });
        self.played.push(effect);
    }

    fn play_music(&mut self, volume: f32) {
        log::debug!("music at {:.2}", volume);
    }

    fn shutdown(&mut self) {
        log::debug!("audio shut down");
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B, settings: &Settings) -> Self {
        Self {
            backend,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume() * effect.gain();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol, false);
    }

    /// Start music and the ambience loop
    pub fn start_background(&mut self) {
        if self.muted {
            return;
        }
        self.backend
            .play_music(MUSIC_GAIN * self.master_volume * self.music_volume);
        let ambience = self.effective_volume() * SoundEffect::Ambience.gain();
        if ambience > 0.0 {
            self.backend.play(SoundEffect::Ambience, ambience, true);
        }
    }

    pub fn play_all(&mut self, effects: impl IntoIterator<Item = SoundEffect>) {
        for effect in effects {
            self.play(effect);
        }
    }

    pub fn shutdown(&mut self) {
        self.backend.shutdown();
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
