//! Parallax clouds drifting behind the level

use glam::{IVec2, UVec2, Vec2};
use rand::Rng;

use crate::assets::CLOUD_VARIANTS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub variant: u32,
    pub speed: f32,
    /// Scroll factor; smaller is farther away
    pub depth: f32,
}

impl Cloud {
    pub fn update(&mut self) {
        self.pos.x += self.speed;
    }

    /// Screen position, wrapped so the cloud re-enters from the far side.
    /// `image` is the cloud sprite size, `view` the target surface size.
    pub fn render_pos(&self, scroll: IVec2, image: UVec2, view: UVec2) -> Vec2 {
        let parallax = self.pos - scroll.as_vec2() * self.depth;
        let span = (view + image).as_vec2();
        Vec2::new(
            parallax.x.rem_euclid(span.x) - image.x as f32,
            parallax.y.rem_euclid(span.y) - image.y as f32,
        )
    }
}

/// Clouds sorted back to front
#[derive(Debug, Clone, Default)]
pub struct CloudSet {
    pub clouds: Vec<Cloud>,
}

impl CloudSet {
    pub fn new(count: usize, rng: &mut impl Rng) -> Self {
        let mut clouds: Vec<Cloud> = (0..count)
            .map(|_| Cloud {
                pos: Vec2::new(rng.random::<f32>() * 99999.0, rng.random::<f32>() * 99999.0),
                variant: rng.random_range(0..CLOUD_VARIANTS),
                speed: rng.random::<f32>() * 0.05 + 0.05,
                depth: rng.random::<f32>() * 0.6 + 0.2,
            })
            .collect();
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.update();
        }
    }
}
