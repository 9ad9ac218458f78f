//! Box physics against the tile grid
//!
//! Movement is resolved one axis at a time: x is applied and pushed out of
//! every overlapping solid tile, then the hitbox is rebuilt from the
//! corrected position and the same is done for y. Resolving both axes at
//! once lets diagonal motion slip into corners.

use glam::{IVec2, Vec2};

use super::animation::{Action, Animation};
use super::collision::Rect;
use super::tilemap::Tilemap;
use crate::assets::{AnimationKey, EntityKind, Sprite};
use crate::consts::{ANIM_OFFSET, GRAVITY, MAX_FALL_SPEED};

/// Which sides touched solid tiles during the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }
}

#[derive(Debug, Clone)]
pub struct PhysicsEntity {
    pub kind: EntityKind,
    /// Top-left of the hitbox, pixels
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hitbox width/height
    pub size: IVec2,
    pub collisions: Collisions,
    pub action: Action,
    pub animation: Animation,
    pub flip: bool,
    /// Input movement from the last update, before velocity
    pub last_movement: Vec2,
    pub anim_offset: Vec2,
}

impl PhysicsEntity {
    pub fn new(kind: EntityKind, pos: Vec2, size: IVec2) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
            size,
            collisions: Collisions::default(),
            action: Action::Idle,
            animation: Animation::new(AnimationKey::for_entity(kind, Action::Idle)),
            flip: false,
            last_movement: Vec2::ZERO,
            anim_offset: Vec2::new(ANIM_OFFSET.0, ANIM_OFFSET.1),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos(self.pos, self.size)
    }

    /// Switch action, restarting the animation only when it changes
    pub fn set_action(&mut self, action: Action) {
        if action != self.action {
            self.action = action;
            self.animation = Animation::new(AnimationKey::for_entity(self.kind, action));
        }
    }

    /// One physics step with the given input movement
    pub fn update(&mut self, tilemap: &Tilemap, movement: Vec2) {
        self.collisions = Collisions::default();

        let frame_movement = movement + self.vel;

        self.pos.x += frame_movement.x;
        let mut rect = self.rect();
        for tile in tilemap.physics_rects_around(self.pos) {
            if rect.intersects(&tile) {
                if frame_movement.x > 0.0 {
                    rect.set_right(tile.left());
                    self.collisions.right = true;
                } else {
                    rect.set_left(tile.right());
                    self.collisions.left = true;
                }
                self.pos.x = rect.x as f32;
            }
        }

        self.pos.y += frame_movement.y;
        let mut rect = self.rect();
        for tile in tilemap.physics_rects_around(self.pos) {
            // Truncating a fractional y can leave the feet exactly on the
            // tile's top edge without overlapping it
            if rect.bottom() == tile.top()
                && rect.centerx() >= tile.left()
                && rect.centerx() <= tile.right()
            {
                self.collisions.down = true;
            }
            if rect.intersects(&tile) {
                if frame_movement.y == 0.0 {
                    self.collisions.down = true;
                }
                if frame_movement.y > 0.0 {
                    rect.set_bottom(tile.top());
                    self.collisions.down = true;
                }
                if frame_movement.y < 0.0 {
                    rect.set_top(tile.bottom());
                    self.collisions.up = true;
                }
                self.pos.y = rect.y as f32;
            }
        }

        if movement.x != 0.0 {
            self.flip = movement.x < 0.0;
        }
        self.last_movement = movement;

        self.vel.y = (self.vel.y + GRAVITY).min(MAX_FALL_SPEED);
        if self.collisions.down || self.collisions.up {
            self.vel.y = 0.0;
        }

        self.animation.update();
    }

    /// Current animation image
    pub fn sprite(&self) -> Sprite {
        Sprite::Frame {
            key: self.animation.key,
            image: self.animation.image(),
        }
    }

    /// Where the sprite's top-left lands on screen
    pub fn render_pos(&self, scroll: IVec2) -> Vec2 {
        self.pos - scroll.as_vec2() + self.anim_offset
    }
}
