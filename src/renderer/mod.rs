//! Rendering module
//!
//! The game draws into a 320x240 framebuffer made of two layers: a backdrop
//! (background, clouds, outline underlay) and the main layer on top. A
//! frontend implements [`Canvas`] for its graphics API; [`DrawList`]
//! records the calls instead, for headless runs and tests.

pub mod scene;
pub mod shapes;

use std::collections::HashMap;

use glam::{IVec2, UVec2, Vec2};

use crate::assets::Sprite;
use crate::consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

pub use scene::render;

/// Linear RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const SPARK: Color = [1.0, 1.0, 1.0, 1.0];
    /// Outline underlay, black at 180/255
    pub const SILHOUETTE: Color = [0.0, 0.0, 0.0, 180.0 / 255.0];
    pub const WIPE: Color = [0.0, 0.0, 0.0, 1.0];
    pub const BANNER: Color = [1.0, 1.0, 1.0, 1.0];
}

/// Draw target layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Backdrop,
    Main,
}

/// Render-surface contract
pub trait Canvas {
    /// Pixel size of the framebuffer
    fn surface_size(&self) -> UVec2;

    /// Pixel size of a sprite image
    fn sprite_size(&self, sprite: Sprite) -> UVec2;

    /// Clear both layers for a new frame
    fn begin_frame(&mut self);

    fn draw_sprite(&mut self, layer: Layer, sprite: Sprite, pos: Vec2, flip: bool);

    fn draw_polygon(&mut self, layer: Layer, points: &[Vec2], color: Color);

    fn draw_text(&mut self, layer: Layer, text: &str, center: Vec2, color: Color);

    /// Stamp the alpha mask of everything drawn on `Main` so far onto
    /// `Backdrop`, once per offset, in `color`
    fn silhouette(&mut self, offsets: &[IVec2], color: Color);

    /// Cover `Main` in `color`, leaving a clear disc of `radius` at `center`.
    /// A radius of zero or less covers everything.
    fn wipe(&mut self, center: Vec2, radius: f32, color: Color);

    /// Composite the layers and scale-blit to the output, jittered by `offset`
    fn present(&mut self, offset: Vec2);
}

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginFrame,
    Sprite {
        layer: Layer,
        sprite: Sprite,
        pos: Vec2,
        flip: bool,
    },
    Polygon {
        layer: Layer,
        points: Vec<Vec2>,
        color: Color,
    },
    Text {
        layer: Layer,
        text: String,
        center: Vec2,
        color: Color,
    },
    Silhouette {
        offsets: Vec<IVec2>,
        color: Color,
    },
    Wipe {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Present {
        offset: Vec2,
    },
}

/// Canvas that records draw calls
#[derive(Debug, Clone)]
pub struct DrawList {
    size: UVec2,
    default_sprite_size: UVec2,
    sprite_sizes: HashMap<Sprite, UVec2>,
    pub commands: Vec<DrawCommand>,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new(UVec2::new(DISPLAY_WIDTH, DISPLAY_HEIGHT))
    }
}

impl DrawList {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            default_sprite_size: UVec2::new(16, 16),
            sprite_sizes: HashMap::new(),
            commands: Vec::new(),
        }
    }

    /// Override the size reported for one sprite
    pub fn with_sprite_size(mut self, sprite: Sprite, size: UVec2) -> Self {
        self.sprite_sizes.insert(sprite, size);
        self
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded sprites, in draw order
    pub fn sprites(&self) -> impl Iterator<Item = (Layer, Sprite, Vec2, bool)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Sprite {
                layer,
                sprite,
                pos,
                flip,
            } => Some((*layer, *sprite, *pos, *flip)),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn surface_size(&self) -> UVec2 {
        self.size
    }

    fn sprite_size(&self, sprite: Sprite) -> UVec2 {
        self.sprite_sizes
            .get(&sprite)
            .copied()
            .unwrap_or(self.default_sprite_size)
    }

    fn begin_frame(&mut self) {
        self.commands.push(DrawCommand::BeginFrame);
    }

    fn draw_sprite(&mut self, layer: Layer, sprite: Sprite, pos: Vec2, flip: bool) {
        self.commands.push(DrawCommand::Sprite {
            layer,
            sprite,
            pos,
            flip,
        });
    }

    fn draw_polygon(&mut self, layer: Layer, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            layer,
            points: points.to_vec(),
            color,
        });
    }

    fn draw_text(&mut self, layer: Layer, text: &str, center: Vec2, color: Color) {
        self.commands.push(DrawCommand::Text {
            layer,
            text: text.to_owned(),
            center,
            color,
        });
    }

    fn silhouette(&mut self, offsets: &[IVec2], color: Color) {
        self.commands.push(DrawCommand::Silhouette {
            offsets: offsets.to_vec(),
            color,
        });
    }

    fn wipe(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Wipe {
            center,
            radius,
            color,
        });
    }

    fn present(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Present { offset });
    }
}
