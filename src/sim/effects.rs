//! Short-lived kinematic effects: sparks, particles and enemy projectiles
//!
//! None of these affect each other. The level loop advances them once per
//! frame and drops the ones that report dead.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use crate::assets::{AnimationKey, ParticleKind};
use crate::audio::SoundEffect;
use crate::direction;
use crate::sim::animation::Animation;

/// Speed lost by a spark every frame
pub const SPARK_DECAY: f32 = 0.1;

/// Residual speed treated as stopped; repeated f32 subtraction of 0.1 never
/// lands on zero exactly
const SPARK_REST: f32 = 1e-4;

/// A streak of light that slows to a stop along a fixed heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
}

impl Spark {
    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self { pos, angle, speed }
    }

    /// Move and slow down. Returns true once the spark has stopped.
    pub fn update(&mut self) -> bool {
        self.pos += direction(self.angle) * self.speed;
        self.speed = (self.speed - SPARK_DECAY).max(0.0);
        if self.speed < SPARK_REST {
            self.speed = 0.0;
        }
        self.speed == 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.speed == 0.0
    }
}

/// An animated particle that dies when its one-shot animation ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub animation: Animation,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: Vec2, vel: Vec2, frame: u32) -> Self {
        Self {
            kind,
            pos,
            vel,
            animation: Animation::starting_at(AnimationKey::for_particle(kind), frame),
        }
    }

    /// Advance one frame. The kill flag reflects the animation state from
    /// before this frame, so a particle lives one frame past its last image.
    pub fn update(&mut self) -> bool {
        let kill = self.animation.done;
        self.pos += self.vel;
        self.animation.update();
        kill
    }
}

/// Frames a projectile survives without hitting anything
pub const PROJECTILE_MAX_AGE: u32 = 360;

/// Horizontal speed of an enemy shot
pub const PROJECTILE_SPEED: f32 = 1.5;

/// An enemy shot; travels horizontally only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Signed horizontal speed
    pub direction: f32,
    pub age: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, direction: f32) -> Self {
        Self {
            pos,
            direction,
            age: 0,
        }
    }

    pub fn advance(&mut self) {
        self.pos.x += self.direction;
        self.age += 1;
    }

    pub fn expired(&self) -> bool {
        self.age > PROJECTILE_MAX_AGE
    }
}

/// Spawn sink handed to entities so they can emit effects and sounds
/// without seeing the rest of the level.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub sparks: Vec<Spark>,
    pub projectiles: Vec<Projectile>,
    /// Sounds requested this frame, drained by the frontend
    pub sounds: Vec<SoundEffect>,
    pub screen_shake: u32,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, sound: SoundEffect) {
        self.sounds.push(sound);
    }

    /// Raise screen shake to at least `amount`
    pub fn shake(&mut self, amount: u32) {
        self.screen_shake = self.screen_shake.max(amount);
    }

    pub fn spawn_particle(&mut self, kind: ParticleKind, pos: Vec2, vel: Vec2, frame: u32) {
        self.particles.push(Particle::new(kind, pos, vel, frame));
    }

    /// Four sparks within half a radian of `heading`
    pub fn spark_spray(&mut self, pos: Vec2, heading: f32, rng: &mut impl Rng) {
        for _ in 0..4 {
            let angle = rng.random::<f32>() - 0.5 + heading;
            let speed = 2.0 + rng.random::<f32>();
            self.sparks.push(Spark::new(pos, angle, speed));
        }
    }

    /// Radial burst of 30 sparks with 30 impact particles flying inward-out
    pub fn explosion(&mut self, center: Vec2, rng: &mut impl Rng) {
        for _ in 0..30 {
            let angle = rng.random::<f32>() * TAU;
            let speed = rng.random::<f32>() * 5.0;
            self.sparks
                .push(Spark::new(center, angle, rng.random::<f32>() + 2.0));
            let vel = direction(angle + PI) * speed * 0.5;
            let frame = rng.random_range(0..=7);
            self.spawn_particle(ParticleKind::Impact, center, vel, frame);
        }
    }

    /// Forget all effects, e.g. on level load
    pub fn clear(&mut self) {
        self.particles.clear();
        self.sparks.clear();
        self.projectiles.clear();
    }

    /// Take the sounds queued since the last drain
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }
}
