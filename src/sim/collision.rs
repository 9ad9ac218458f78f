//! Axis-aligned integer rectangles for hitboxes and tile boxes
//!
//! Edges follow the usual sprite-engine convention: `right = x + w` and
//! `bottom = y + h` are exclusive, so two boxes that merely share an edge do
//! not overlap. Fractional positions are truncated toward zero when a
//! hitbox is built, which is why the physics pass needs an explicit
//! "touching" check for ground contact.

use glam::{IVec2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect from a float top-left, truncating like an integer cast
    pub fn from_pos(pos: Vec2, size: IVec2) -> Self {
        Self::new(pos.x as i32, pos.y as i32, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn centerx(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub fn centery(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.centerx() as f32, self.centery() as f32)
    }

    pub fn area(&self) -> i32 {
        self.w * self.h
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    /// Strict overlap; shared edges and empty rects never collide
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Half-open containment: left/top edges inside, right/bottom outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x as f32
            && p.x < self.right() as f32
            && p.y >= self.y as f32
            && p.y < self.bottom() as f32
    }
}
