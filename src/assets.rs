//! Animation table and sprite handles
//!
//! The asset loader owns the actual images. The simulation only needs to
//! know how many frames each animation has, how long each is held and
//! whether it loops, so those live here as compile-time data. Everything
//! the renderer draws is named by a [`Sprite`] handle.

use serde::{Deserialize, Serialize};

use crate::sim::animation::Action;
use crate::sim::tilemap::TileKind;

/// Frame count, hold duration and loop flag for one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDef {
    pub frames: u32,
    pub img_dur: u32,
    pub looping: bool,
}

impl AnimationDef {
    pub const fn new(frames: u32, img_dur: u32, looping: bool) -> Self {
        Self {
            frames,
            img_dur,
            looping,
        }
    }

    /// Total ticks in one playthrough
    pub const fn duration(&self) -> u32 {
        self.frames * self.img_dur
    }
}

/// Default hold for animations that don't set one
pub const DEFAULT_IMG_DUR: u32 = 5;

/// Who an animation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
}

/// Particle families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Leaf,
    Impact,
}

/// Every animation the game plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKey {
    EnemyIdle,
    EnemyRun,
    PlayerIdle,
    PlayerRun,
    PlayerJump,
    PlayerSlide,
    PlayerWallSlide,
    Leaf,
    Impact,
}

impl AnimationKey {
    pub const fn def(self) -> AnimationDef {
        match self {
            AnimationKey::EnemyIdle => AnimationDef::new(16, 6, true),
            AnimationKey::EnemyRun => AnimationDef::new(8, 4, true),
            AnimationKey::PlayerIdle => AnimationDef::new(22, 6, true),
            AnimationKey::PlayerRun => AnimationDef::new(8, 4, true),
            AnimationKey::PlayerJump => AnimationDef::new(1, DEFAULT_IMG_DUR, true),
            AnimationKey::PlayerSlide => AnimationDef::new(1, DEFAULT_IMG_DUR, true),
            AnimationKey::PlayerWallSlide => AnimationDef::new(1, DEFAULT_IMG_DUR, true),
            AnimationKey::Leaf => AnimationDef::new(18, 20, false),
            AnimationKey::Impact => AnimationDef::new(4, 6, false),
        }
    }

    /// Animation for an entity's current action. Enemies only have idle and
    /// run sheets, so airborne actions fall back to idle.
    pub const fn for_entity(kind: EntityKind, action: Action) -> Self {
        match (kind, action) {
            (EntityKind::Player, Action::Idle) => AnimationKey::PlayerIdle,
            (EntityKind::Player, Action::Run) => AnimationKey::PlayerRun,
            (EntityKind::Player, Action::Jump) => AnimationKey::PlayerJump,
            (EntityKind::Player, Action::Slide) => AnimationKey::PlayerSlide,
            (EntityKind::Player, Action::WallSlide) => AnimationKey::PlayerWallSlide,
            (EntityKind::Enemy, Action::Run) => AnimationKey::EnemyRun,
            (EntityKind::Enemy, _) => AnimationKey::EnemyIdle,
        }
    }

    pub const fn for_particle(kind: ParticleKind) -> Self {
        match kind {
            ParticleKind::Leaf => AnimationKey::Leaf,
            ParticleKind::Impact => AnimationKey::Impact,
        }
    }

    /// Asset path relative to the image root
    pub fn path(self) -> &'static str {
        match self {
            AnimationKey::EnemyIdle => "entities/enemy/idle",
            AnimationKey::EnemyRun => "entities/enemy/run",
            AnimationKey::PlayerIdle => "entities/player/idle",
            AnimationKey::PlayerRun => "entities/player/run",
            AnimationKey::PlayerJump => "entities/player/jump",
            AnimationKey::PlayerSlide => "entities/player/slide",
            AnimationKey::PlayerWallSlide => "entities/player/wall_slide",
            AnimationKey::Leaf => "particles/leaf",
            AnimationKey::Impact => "particles/particle",
        }
    }
}

/// Number of cloud images
pub const CLOUD_VARIANTS: u32 = 2;

/// Handle for anything the renderer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    Tile { kind: TileKind, variant: u32 },
    Frame { key: AnimationKey, image: u32 },
    Cloud(u32),
    Gun,
    Projectile,
}
