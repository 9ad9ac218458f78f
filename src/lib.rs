//! Grove Dash - a tile-based 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tilemap, physics, entities, effects, level loop)
//! - `renderer`: Render-surface contract and scene composition
//! - `platform`: Input mapping and frame pacing
//! - `persistence`: Level file catalog
//! - `assets`: Animation table and sprite handles
//! - `audio`: Sound-effect triggers

pub mod assets;
pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::MapError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate; every rule below is tuned per frame at this rate
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Low-res framebuffer the game draws into
    pub const DISPLAY_WIDTH: u32 = 320;
    pub const DISPLAY_HEIGHT: u32 = 240;

    /// Default pixels per grid cell
    pub const TILE_SIZE: i32 = 16;

    /// Gravity added to vertical velocity every frame
    pub const GRAVITY: f32 = 0.1;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 5.0;

    /// Player and enemy hitbox (pixels)
    pub const ENTITY_SIZE: (i32, i32) = (8, 15);

    /// Visual nudge from hitbox top-left to sprite top-left
    pub const ANIM_OFFSET: (f32, f32) = (-3.0, -3.0);

    /// Screen shake applied on hits and kills
    pub const HIT_SHAKE: u32 = 16;

    /// Length of the circular wipe, in frames
    pub const TRANSITION_FRAMES: i32 = 30;
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Floor-divide a pixel coordinate into a grid cell index
#[inline]
pub fn cell_of(pixel: f32, tile_size: i32) -> i32 {
    (pixel / tile_size as f32).floor() as i32
}
