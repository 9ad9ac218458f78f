//! Patrolling gunner
//!
//! Idle enemies occasionally start a patrol. A patrolling enemy walks until
//! a wall or ledge turns it around, and when the patrol ends it fires at the
//! player if they share a row and the enemy is facing them.

use std::f32::consts::PI;

use glam::{IVec2, Vec2};
use rand::Rng;

use super::animation::Action;
use super::collision::Rect;
use super::effects::{Effects, PROJECTILE_SPEED, Projectile, Spark};
use super::entity::PhysicsEntity;
use super::player::Player;
use super::tilemap::Tilemap;
use crate::assets::EntityKind;
use crate::audio::SoundEffect;
use crate::consts::{ENTITY_SIZE, HIT_SHAKE};

/// Per-frame chance an idle enemy starts patrolling
pub const PATROL_CHANCE: f32 = 0.01;
/// Walk speed while patrolling
pub const PATROL_SPEED: f32 = 0.5;
/// Horizontal reach of the ledge probe and of the gun muzzle from center
const PROBE_REACH: i32 = 7;
/// Probe depth below the hitbox top; just under the feet
const PROBE_DEPTH: f32 = 23.0;
/// Vertical distance within which the enemy will shoot
const SIGHT_RANGE: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub entity: PhysicsEntity,
    /// Patrol countdown; 0 means idle
    pub walking: u32,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        let size = IVec2::new(ENTITY_SIZE.0, ENTITY_SIZE.1);
        Self {
            entity: PhysicsEntity::new(EntityKind::Enemy, pos, size),
            walking: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.entity.rect()
    }

    /// Advance one frame. Returns true when a dashing player killed it.
    pub fn update(
        &mut self,
        tilemap: &Tilemap,
        player: &Player,
        effects: &mut Effects,
        rng: &mut impl Rng,
    ) -> bool {
        let mut movement = Vec2::ZERO;

        if self.walking > 0 {
            let reach = if self.entity.flip { -PROBE_REACH } else { PROBE_REACH };
            let probe = Vec2::new(
                (self.rect().centerx() + reach) as f32,
                self.entity.pos.y + PROBE_DEPTH,
            );
            if tilemap.solid_check(probe).is_some() {
                if self.entity.collisions.horizontal() {
                    self.entity.flip = !self.entity.flip;
                } else {
                    movement.x = if self.entity.flip { -PATROL_SPEED } else { PATROL_SPEED };
                }
            } else {
                self.entity.flip = !self.entity.flip;
            }

            // Two ticks per frame: patrols last half their rolled length
            self.walking = self.walking.saturating_sub(1);
            self.walking = self.walking.saturating_sub(1);

            if self.walking == 0 {
                self.try_shoot(player, effects, rng);
            }
        } else if rng.random::<f32>() < PATROL_CHANCE {
            self.walking = rng.random_range(30..=120);
        }

        self.entity.update(tilemap, movement);

        if movement.x != 0.0 {
            self.entity.set_action(Action::Run);
        } else {
            self.entity.set_action(Action::Idle);
        }

        if player.is_dash_attacking() && self.rect().intersects(&player.rect()) {
            self.explode(effects, rng);
            return true;
        }
        false
    }

    fn try_shoot(&self, player: &Player, effects: &mut Effects, rng: &mut impl Rng) {
        let dis = player.pos() - self.entity.pos;
        if dis.y.abs() >= SIGHT_RANGE {
            return;
        }
        let rect = self.rect();
        let (muzzle_x, speed, heading) = match (self.entity.flip, dis.x) {
            (true, dx) if dx < 0.0 => (rect.centerx() - PROBE_REACH, -PROJECTILE_SPEED, PI),
            (false, dx) if dx > 0.0 => (rect.centerx() + PROBE_REACH, PROJECTILE_SPEED, 0.0),
            _ => return,
        };
        let muzzle = Vec2::new(muzzle_x as f32, rect.centery() as f32);
        effects.play(SoundEffect::Shoot);
        effects.projectiles.push(Projectile::new(muzzle, speed));
        effects.spark_spray(muzzle, heading, rng);
    }

    fn explode(&self, effects: &mut Effects, rng: &mut impl Rng) {
        let center = self.rect().center();
        effects.play(SoundEffect::Hit);
        effects.shake(HIT_SHAKE);
        effects.explosion(center, rng);
        effects
            .sparks
            .push(Spark::new(center, 0.0, 5.0 + rng.random::<f32>()));
        effects
            .sparks
            .push(Spark::new(center, PI, 5.0 + rng.random::<f32>()));
        log::debug!("enemy killed at {center}");
    }

    /// Top-left of the gun sprite, given its width; the gun sits on the
    /// facing side of the body at center height
    pub fn gun_pos(&self, gun_width: f32) -> Vec2 {
        let rect = self.rect();
        let x = if self.entity.flip {
            (rect.centerx() - 4) as f32 - gun_width
        } else {
            (rect.centerx() + 4) as f32
        };
        Vec2::new(x, rect.centery() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tilemap::{Tile, TileKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Floor on grid row 2 (pixel y 32) from x cell 0 to 9
    fn ledge_map() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in 0..10 {
            map.insert(Tile::new(TileKind::Grass, 0, IVec2::new(x, 2)));
        }
        map
    }

    fn standing_enemy(x: f32) -> Enemy {
        Enemy::new(Vec2::new(x, 17.0))
    }

    #[test]
    fn test_idle_enemy_starts_patrol_on_low_roll() {
        let seed = (0u64..10_000)
            .find(|&s| Pcg32::seed_from_u64(s).random::<f32>() < PATROL_CHANCE)
            .expect("some seed rolls under 1%");
        let mut rng = Pcg32::seed_from_u64(seed);

        let map = ledge_map();
        let player = Player::new(Vec2::new(500.0, 500.0));
        let mut effects = Effects::new();
        let mut enemy = standing_enemy(40.0);
        assert_eq!(enemy.walking, 0);

        enemy.update(&map, &player, &mut effects, &mut rng);
        assert!((30..=120).contains(&enemy.walking));
    }

    #[test]
    fn test_patrol_counts_down_by_two() {
        let map = ledge_map();
        let player = Player::new(Vec2::new(500.0, 500.0));
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = standing_enemy(40.0);
        enemy.walking = 10;
        enemy.update(&map, &player, &mut effects, &mut rng);
        assert_eq!(enemy.walking, 8);
        assert_eq!(enemy.entity.action, Action::Run);
        assert_eq!(enemy.entity.pos.x, 40.5);
    }

    #[test]
    fn test_patrol_turns_at_ledge() {
        let map = ledge_map();
        let player = Player::new(Vec2::new(500.0, 500.0));
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(2);
        // Right edge of the floor is x = 160; probe at centerx + 7 falls off
        let mut enemy = standing_enemy(150.0);
        enemy.walking = 40;
        enemy.update(&map, &player, &mut effects, &mut rng);
        assert!(enemy.entity.flip);
        assert_eq!(enemy.entity.pos.x, 150.0);
        assert_eq!(enemy.entity.action, Action::Idle);
    }

    #[test]
    fn test_patrol_turns_at_wall() {
        let mut map = ledge_map();
        map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(4, 1)));
        let player = Player::new(Vec2::new(500.0, 500.0));
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut enemy = standing_enemy(50.0);
        enemy.walking = 100;

        let mut frames = 0;
        while !enemy.entity.collisions.right {
            enemy.update(&map, &player, &mut effects, &mut rng);
            frames += 1;
            assert!(frames < 30, "enemy never reached the wall");
        }
        // Pushed back flush against the stone at x = 64
        assert_eq!(enemy.entity.pos.x, 56.0);
        assert!(!enemy.entity.flip);

        // Last frame's wall contact turns it around without a step
        enemy.update(&map, &player, &mut effects, &mut rng);
        assert!(enemy.entity.flip);
        assert_eq!(enemy.entity.pos.x, 56.0);
        assert_eq!(enemy.entity.action, Action::Idle);
    }

    #[test]
    fn test_shoots_at_player_in_sight() {
        let map = ledge_map();
        let player = Player::new(Vec2::new(100.0, 20.0));
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = standing_enemy(40.0);
        enemy.walking = 2;
        enemy.update(&map, &player, &mut effects, &mut rng);

        assert_eq!(enemy.walking, 0);
        assert_eq!(effects.projectiles.len(), 1);
        let shot = effects.projectiles[0];
        assert_eq!(shot.direction, PROJECTILE_SPEED);
        // Fired from the pre-move hitbox: centerx 44 + 7, centery 17 + 7
        assert_eq!(shot.pos, Vec2::new(51.0, 24.0));
        assert_eq!(effects.sparks.len(), 4);
        assert_eq!(effects.sounds, vec![SoundEffect::Shoot]);
    }

    #[test]
    fn test_no_shot_when_facing_away_or_out_of_row() {
        let map = ledge_map();
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(4);

        let behind = Player::new(Vec2::new(10.0, 17.0));
        let mut enemy = standing_enemy(40.0);
        enemy.walking = 2;
        enemy.update(&map, &behind, &mut effects, &mut rng);
        assert!(effects.projectiles.is_empty());

        let above = Player::new(Vec2::new(100.0, -20.0));
        let mut enemy = standing_enemy(40.0);
        enemy.walking = 2;
        enemy.update(&map, &above, &mut effects, &mut rng);
        assert!(effects.projectiles.is_empty());
        assert!(effects.sounds.is_empty());
    }

    #[test]
    fn test_dashing_player_kills_enemy() {
        let map = ledge_map();
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut player = Player::new(Vec2::new(42.0, 17.0));
        player.dashing = 55;
        let mut enemy = standing_enemy(40.0);

        assert!(enemy.update(&map, &player, &mut effects, &mut rng));
        assert_eq!(effects.sparks.len(), 32);
        assert_eq!(effects.particles.len(), 30);
        assert_eq!(effects.screen_shake, HIT_SHAKE);
        assert_eq!(effects.sounds, vec![SoundEffect::Hit]);
    }

    #[test]
    fn test_touching_without_dash_is_harmless() {
        let map = ledge_map();
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut player = Player::new(Vec2::new(42.0, 17.0));
        player.dashing = 49;
        let mut enemy = standing_enemy(40.0);
        assert!(!enemy.update(&map, &player, &mut effects, &mut rng));
        assert!(effects.sparks.is_empty());
    }

    #[test]
    fn test_gun_sits_on_facing_side() {
        let mut enemy = standing_enemy(40.0);
        assert_eq!(enemy.gun_pos(6.0), Vec2::new(48.0, 24.0));
        enemy.entity.flip = true;
        assert_eq!(enemy.gun_pos(6.0), Vec2::new(34.0, 24.0));
    }
}
