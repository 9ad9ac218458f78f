//! The player: running, jumping, wall-sliding and dashing
//!
//! `dashing` is a signed countdown. Its sign is the dash direction and its
//! magnitude falls by one each frame from 60. Above 50 the player is in the
//! dash window: fast, invisible and lethal to enemies.

use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use rand::Rng;

use super::animation::Action;
use super::collision::Rect;
use super::effects::Effects;
use super::entity::PhysicsEntity;
use super::tilemap::Tilemap;
use crate::assets::{EntityKind, ParticleKind};
use crate::audio::SoundEffect;
use crate::consts::ENTITY_SIZE;
use crate::direction;

/// Magnitude `dashing` is set to when a dash starts
pub const DASH_FRAMES: i32 = 60;
/// `|dashing|` above this is the active dash window
pub const DASH_WINDOW: i32 = 50;
/// Horizontal speed during the dash window
pub const DASH_SPEED: f32 = 8.0;
/// Airborne frames before the player counts as jumping or wall-sliding
pub const COYOTE_FRAMES: u32 = 4;
/// Airborne frames with no solid tiles nearby before the fall kills
pub const FALL_DEATH_FRAMES: u32 = 120;

#[derive(Debug, Clone)]
pub struct Player {
    pub entity: PhysicsEntity,
    /// Frames since last grounded
    pub air_time: u32,
    pub dashing: i32,
    pub wall_slide: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        let size = IVec2::new(ENTITY_SIZE.0, ENTITY_SIZE.1);
        Self {
            entity: PhysicsEntity::new(EntityKind::Player, pos, size),
            air_time: 0,
            dashing: 0,
            wall_slide: false,
        }
    }

    pub fn rect(&self) -> Rect {
        self.entity.rect()
    }

    pub fn pos(&self) -> Vec2 {
        self.entity.pos
    }

    /// Inside the damaging part of a dash (enemy contact kills the enemy)
    pub fn is_dash_attacking(&self) -> bool {
        self.dashing.abs() >= DASH_WINDOW
    }

    /// Hidden during the dash window
    pub fn is_visible(&self) -> bool {
        self.dashing.abs() <= DASH_WINDOW
    }

    /// Advance one frame. Returns true if the player fell out of the world.
    pub fn update(
        &mut self,
        tilemap: &Tilemap,
        movement: Vec2,
        effects: &mut Effects,
        rng: &mut impl Rng,
    ) -> bool {
        self.entity.update(tilemap, movement);

        self.air_time += 1;
        let fell = self.air_time > FALL_DEATH_FRAMES
            && tilemap.physics_rects_around(self.entity.pos).is_empty();

        if self.entity.collisions.down {
            self.air_time = 0;
        }

        self.wall_slide = false;
        if self.entity.collisions.horizontal() && self.air_time > COYOTE_FRAMES {
            self.wall_slide = true;
            self.entity.vel.y = self.entity.vel.y.min(0.5);
            if self.entity.collisions.right {
                self.entity.flip = false;
            }
            if self.entity.collisions.left {
                self.entity.flip = true;
            }
            self.entity.set_action(Action::WallSlide);
        }

        if !self.wall_slide {
            if self.air_time > COYOTE_FRAMES {
                self.entity.set_action(Action::Jump);
            } else if movement.x != 0.0 {
                self.entity.set_action(Action::Run);
            } else {
                self.entity.set_action(Action::Idle);
            }
        }

        let center = self.rect().center();
        if matches!(self.dashing.abs(), DASH_WINDOW | DASH_FRAMES) {
            for _ in 0..20 {
                let angle = rng.random::<f32>() * TAU;
                let speed = rng.random::<f32>() * 0.5 + 0.5;
                let frame = rng.random_range(0..=7);
                effects.spawn_particle(ParticleKind::Impact, center, direction(angle) * speed, frame);
            }
        }

        self.dashing -= self.dashing.signum();

        if self.dashing.abs() > DASH_WINDOW {
            let sign = self.dashing.signum() as f32;
            self.entity.vel.x = sign * DASH_SPEED;
            if self.dashing.abs() == DASH_WINDOW + 1 {
                self.entity.vel.x *= 0.1;
            }
            let trail = Vec2::new(sign * rng.random::<f32>() * 3.0, 0.0);
            let frame = rng.random_range(0..=7);
            effects.spawn_particle(ParticleKind::Impact, center, trail, frame);
        }

        if self.entity.vel.x > 0.0 {
            self.entity.vel.x = (self.entity.vel.x - 0.1).max(0.0);
        } else {
            self.entity.vel.x = (self.entity.vel.x + 0.1).min(0.0);
        }

        fell
    }

    /// Try to jump. Returns whether a jump happened.
    pub fn jump(&mut self) -> bool {
        let entity = &mut self.entity;
        if self.wall_slide {
            if entity.flip && entity.last_movement.x < 0.0 {
                entity.vel = Vec2::new(3.5, -2.5);
                self.air_time = COYOTE_FRAMES + 1;
                return true;
            } else if !entity.flip && entity.last_movement.x > 0.0 {
                entity.vel = Vec2::new(-3.5, -2.5);
                self.air_time = COYOTE_FRAMES + 1;
                return true;
            }
        }
        if entity.collisions.down {
            entity.vel.y = -3.0;
            return true;
        }
        false
    }

    /// Start a dash in the facing direction unless one is running
    pub fn dash(&mut self, effects: &mut Effects) -> bool {
        if self.dashing != 0 {
            return false;
        }
        effects.play(SoundEffect::Dash);
        self.dashing = if self.entity.flip {
            -DASH_FRAMES
        } else {
            DASH_FRAMES
        };
        true
    }

    /// Respawn at a level's spawn point
    pub fn respawn(&mut self, pos: Vec2) {
        self.entity.pos = pos;
        self.air_time = 0;
    }
}
