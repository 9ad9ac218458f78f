//! Animation playback and entity actions

use serde::{Deserialize, Serialize};

use crate::assets::{AnimationDef, AnimationKey};

/// What an entity is doing; selects its animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Run,
    Jump,
    Slide,
    WallSlide,
}

/// Playback cursor over a shared animation definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub key: AnimationKey,
    def: AnimationDef,
    /// Tick counter within the playthrough
    pub frame: u32,
    pub done: bool,
}

impl Animation {
    pub fn new(key: AnimationKey) -> Self {
        Self::starting_at(key, 0)
    }

    pub fn starting_at(key: AnimationKey, frame: u32) -> Self {
        Self {
            key,
            def: key.def(),
            frame,
            done: false,
        }
    }

    pub fn def(&self) -> AnimationDef {
        self.def
    }

    /// Advance one tick
    pub fn update(&mut self) {
        let total = self.def.duration().max(1);
        if self.def.looping {
            self.frame = (self.frame + 1) % total;
        } else {
            self.frame = (self.frame + 1).min(total - 1);
            if self.frame >= total - 1 {
                self.done = true;
            }
        }
    }

    /// Index of the image due at the current tick
    pub fn image(&self) -> u32 {
        (self.frame / self.def.img_dur.max(1)).min(self.def.frames.saturating_sub(1))
    }
}
