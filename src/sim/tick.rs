//! Fixed timestep simulation tick
//!
//! Advances the level loop by one frame. Drawing is separate (see
//! `renderer::scene`); everything that changes state happens here, in a
//! fixed order.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::effects::Effects;
use super::player::Player;
use super::state::{GamePhase, GameState, LeafSpawners};
use crate::assets::ParticleKind;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::error::MapError;

/// Camera closes 1/N of its distance to the player each frame
pub const SCROLL_SMOOTHING: f32 = 10.0;
/// Dead frames before the wipe starts closing
pub const DEATH_WIPE_START: u32 = 10;
/// Dead frames before the level restarts
pub const DEATH_RELOAD: u32 = 40;
/// Tree zones shed a leaf when `random * N < area`
const LEAF_RATE: f32 = 49999.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Jump pressed this frame
    pub jump: bool,
    /// Dash pressed this frame
    pub dash: bool,
}

impl TickInput {
    /// Horizontal input movement: -1, 0 or 1
    pub fn movement(&self) -> Vec2 {
        Vec2::new(f32::from(self.right as u8) - f32::from(self.left as u8), 0.0)
    }
}

/// Advance the game state by one frame.
///
/// Errors only when a level transition hits a level file that exists but
/// cannot be used.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), MapError> {
    state.time_ticks += 1;
    state.effects.screen_shake = state.effects.screen_shake.saturating_sub(1);

    if state.phase == GamePhase::Won {
        state.clouds.update();
        update_sparks_and_particles(&mut state.effects);
        roll_shake(state);
        return Ok(());
    }

    if state.level.enemies.is_empty() {
        state.level.transition += 1;
        if state.level.transition > TRANSITION_FRAMES {
            state.advance_level()?;
            if state.phase == GamePhase::Won {
                return Ok(());
            }
        }
    }
    if state.level.transition < 0 {
        state.level.transition += 1;
    }

    if state.level.dead > 0 {
        state.level.dead += 1;
        if state.level.dead >= DEATH_WIPE_START {
            state.level.transition = (state.level.transition + 1).min(TRANSITION_FRAMES);
        }
        state.effects.shake(HIT_SHAKE);
        if state.level.dead > DEATH_RELOAD {
            state.load_level(state.level_index)?;
        }
    }

    let half_view = Vec2::new(DISPLAY_WIDTH as f32, DISPLAY_HEIGHT as f32) / 2.0;
    let target = state.player.rect().center() - half_view;
    state.level.scroll += (target - state.level.scroll) / SCROLL_SMOOTHING;

    let GameState {
        rng,
        player,
        level,
        effects,
        clouds,
        ..
    } = state;

    spawn_leaves(&level.leaf_spawners, player, effects, rng);
    clouds.update();

    let tilemap = &level.tilemap;
    level
        .enemies
        .retain_mut(|enemy| !enemy.update(tilemap, player, effects, rng));

    if level.dead == 0 && player.update(tilemap, input.movement(), effects, rng) {
        log::debug!("player fell out of the world");
        effects.shake(HIT_SHAKE);
        level.dead += 1;
    }

    let body = player.rect();
    let dash_attacking = player.is_dash_attacking();
    let mut projectiles = std::mem::take(&mut effects.projectiles);
    projectiles.retain_mut(|projectile| {
        projectile.advance();
        if tilemap.solid_check(projectile.pos).is_some() {
            let heading = if projectile.direction > 0.0 { PI } else { 0.0 };
            effects.spark_spray(projectile.pos, heading, rng);
            false
        } else if projectile.expired() {
            false
        } else if !dash_attacking && body.contains_point(projectile.pos) {
            log::debug!("player shot at {}", projectile.pos);
            effects.play(SoundEffect::Hit);
            level.dead += 1;
            effects.shake(HIT_SHAKE);
            effects.explosion(body.center(), rng);
            false
        } else {
            true
        }
    });
    effects.projectiles = projectiles;

    update_sparks_and_particles(effects);

    if input.jump && player.jump() {
        effects.play(SoundEffect::Jump);
    }
    if input.dash {
        player.dash(effects);
    }

    roll_shake(state);
    Ok(())
}

fn update_sparks_and_particles(effects: &mut Effects) {
    effects.sparks.retain_mut(|spark| !spark.update());
    effects.particles.retain_mut(|particle| {
        let kill = particle.update();
        if particle.kind == ParticleKind::Leaf {
            particle.pos.x += (particle.animation.frame as f32 * 0.035).sin() * 0.3;
        }
        !kill
    });
}

/// Ambient leaves from tree canopies, plus extras when the player brushes
/// through trees and bushes
fn spawn_leaves(spawners: &LeafSpawners, player: &Player, effects: &mut Effects, rng: &mut impl Rng) {
    let body = player.rect();
    let vel = player.entity.vel;

    for tree in &spawners.trees {
        if rng.random::<f32>() * LEAF_RATE < tree.area() as f32 {
            let pos = Vec2::new(
                tree.x as f32 + rng.random::<f32>() * tree.w as f32,
                tree.y as f32 + rng.random::<f32>() * tree.h as f32,
            );
            spawn_leaf(pos, effects, rng);
        }
        if body.intersects(tree) && rng.random_range(0..=10) < 3 {
            let pos = point_in(tree, rng);
            spawn_leaf(pos, effects, rng);
        }
    }

    for bush in &spawners.bushes {
        if !body.intersects(bush) {
            continue;
        }
        let moving = player.entity.last_movement.x != 0.0 || vel.x != 0.0;
        if moving && rng.random_range(0..=10) < 1 {
            let pos = point_in(bush, rng);
            spawn_leaf(pos, effects, rng);
        }
        if vel.y.abs() > 0.1 && (rng.random_range(0..=10) as f32) < vel.y * 2.0 {
            for _ in 0..(vel.y * 3.0).round() as u32 {
                let pos = point_in(bush, rng);
                spawn_leaf(pos, effects, rng);
            }
        }
    }
}

/// Whole-pixel point inside `rect`, edges included
fn point_in(rect: &Rect, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        (rect.x + rng.random_range(0..=rect.w)) as f32,
        (rect.y + rng.random_range(0..=rect.h)) as f32,
    )
}

fn spawn_leaf(pos: Vec2, effects: &mut Effects, rng: &mut impl Rng) {
    let vel = Vec2::new(
        rng.random_range(-1..=1) as f32,
        rng.random_range(-2..=6) as f32 * 0.1,
    );
    let frame = rng.random_range(0..=20);
    effects.spawn_particle(ParticleKind::Leaf, pos, vel, frame);
}

/// Roll this frame's render jitter from the shake counter
fn roll_shake(state: &mut GameState) {
    let s = state.effects.screen_shake as f32;
    state.shake_offset = if state.shake_enabled && s > 0.0 {
        Vec2::new(
            state.rng.random::<f32>() * s - s / 2.0,
            state.rng.random::<f32>() * s * 2.0 - s,
        )
    } else {
        Vec2::ZERO
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::{PROJECTILE_MAX_AGE, Projectile};
    use crate::sim::enemy::Enemy;
    use crate::sim::tilemap::{Tile, TileKind, Tilemap};
    use glam::IVec2;

    /// Player spawner at (2,2) over a long floor, with an optional enemy
    /// parked far away so the level does not end
    fn test_map(with_enemy: bool) -> Tilemap {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Spawners, 0, IVec2::new(2, 2)));
        if with_enemy {
            map.insert(Tile::new(TileKind::Spawners, 1, IVec2::new(40, 2)));
        }
        for x in -10..60 {
            map.insert(Tile::new(TileKind::Grass, 0, IVec2::new(x, 3)));
        }
        map
    }

    fn playing_state(seed: u64) -> GameState {
        GameState::with_tilemap(test_map(true), seed)
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_end_to_end_spawn_position() {
        let state = GameState::with_tilemap(test_map(false), 1);
        assert_eq!(state.player.pos(), Vec2::new(32.0, 32.0));
        assert!(state.level.enemies.is_empty());
    }

    #[test]
    fn test_transition_opens_over_thirty_frames() {
        let mut state = playing_state(2);
        assert_eq!(state.level.transition, -30);
        for _ in 0..30 {
            tick(&mut state, &idle()).unwrap();
        }
        assert_eq!(state.level.transition, 0);
        tick(&mut state, &idle()).unwrap();
        assert_eq!(state.level.transition, 0);
    }

    #[test]
    fn test_clearing_only_level_wins() {
        let mut state = GameState::with_tilemap(test_map(false), 3);
        // -30 climbs twice per frame while opening, then once per frame
        for _ in 0..100 {
            tick(&mut state, &idle()).unwrap();
            if state.is_won() {
                break;
            }
        }
        assert!(state.is_won());
        let ticks = state.time_ticks;
        tick(&mut state, &idle()).unwrap();
        assert_eq!(state.time_ticks, ticks + 1);
        assert!(state.is_won());
    }

    #[test]
    fn test_scroll_eases_toward_player() {
        let mut state = playing_state(4);
        tick(&mut state, &idle()).unwrap();
        let center = state.player.rect().center();
        // First step is a tenth of the way from the origin
        let expected = (center - Vec2::new(160.0, 120.0)) / 10.0;
        assert!((state.level.scroll - expected).length() < 1e-4);
    }

    #[test]
    fn test_old_projectile_is_removed() {
        let mut state = playing_state(5);
        let mut shot = Projectile::new(Vec2::new(300.0, -200.0), 1.5);
        shot.age = PROJECTILE_MAX_AGE;
        state.effects.projectiles.push(shot);
        tick(&mut state, &idle()).unwrap();
        assert!(state.effects.projectiles.is_empty());
        assert!(state.effects.sparks.is_empty());
    }

    #[test]
    fn test_projectile_hitting_wall_sparks() {
        let mut state = playing_state(6);
        // One step short of the floor row's top edge, moving right into it
        state.effects.projectiles.push(Projectile::new(Vec2::new(200.0, 48.5), 1.5));
        tick(&mut state, &idle()).unwrap();
        assert!(state.effects.projectiles.is_empty());
        assert_eq!(state.effects.sparks.len(), 4);
        for spark in &state.effects.sparks {
            // Sprayed back against the travel direction
            assert!((spark.angle - PI).abs() <= 0.5);
        }
    }

    #[test]
    fn test_projectile_in_flight_survives() {
        let mut state = playing_state(7);
        state.effects.projectiles.push(Projectile::new(Vec2::new(300.0, -200.0), -1.5));
        tick(&mut state, &idle()).unwrap();
        assert_eq!(state.effects.projectiles.len(), 1);
        assert_eq!(state.effects.projectiles[0].pos.x, 298.5);
        assert_eq!(state.effects.projectiles[0].age, 1);
    }

    #[test]
    fn test_shot_player_dies_and_level_restarts() {
        let mut state = playing_state(8);
        for _ in 0..5 {
            tick(&mut state, &idle()).unwrap();
        }
        let center = state.player.rect().center();
        state
            .effects
            .projectiles
            .push(Projectile::new(center - Vec2::new(1.5, 0.0), 1.5));
        tick(&mut state, &idle()).unwrap();

        assert_eq!(state.level.dead, 1);
        assert!(state.effects.projectiles.is_empty());
        assert!(state.effects.sounds.contains(&SoundEffect::Hit));
        assert_eq!(state.effects.sparks.len(), 30);

        // Shake is held while dead
        for _ in 0..20 {
            tick(&mut state, &idle()).unwrap();
            assert!(state.effects.screen_shake >= HIT_SHAKE - 1);
        }
        assert!(state.level.transition > 0);

        // Level file is missing, so the map is kept but the counters reset
        for _ in 0..20 {
            tick(&mut state, &idle()).unwrap();
        }
        assert_eq!(state.level.dead, 0);
    }

    #[test]
    fn test_dashing_player_ignores_shots() {
        let mut state = playing_state(9);
        tick(&mut state, &idle()).unwrap();
        state.player.dashing = 55;
        let center = state.player.rect().center();
        state.effects.projectiles.push(Projectile::new(center, 0.0));
        tick(&mut state, &idle()).unwrap();
        assert_eq!(state.level.dead, 0);
    }

    #[test]
    fn test_jump_input_plays_sound() {
        let mut state = playing_state(10);
        for _ in 0..40 {
            tick(&mut state, &idle()).unwrap();
        }
        state.effects.drain_sounds();
        let jump = TickInput {
            jump: true,
            ..TickInput::default()
        };
        tick(&mut state, &jump).unwrap();
        assert_eq!(state.effects.sounds, vec![SoundEffect::Jump]);
        assert_eq!(state.player.entity.vel.y, -3.0);
    }

    #[test]
    fn test_dash_kills_enemy_in_path() {
        let mut state = playing_state(11);
        for _ in 0..40 {
            tick(&mut state, &idle()).unwrap();
        }
        let pos = state.player.pos() + Vec2::new(30.0, 0.0);
        state.level.enemies.push(Enemy::new(pos));
        let dash = TickInput {
            dash: true,
            ..TickInput::default()
        };
        tick(&mut state, &dash).unwrap();
        for _ in 0..12 {
            tick(&mut state, &idle()).unwrap();
        }
        assert_eq!(state.level.enemies.len(), 1);
    }

    #[test]
    fn test_reduced_motion_keeps_picture_still() {
        let mut state = playing_state(12);
        state.shake_enabled = false;
        state.effects.shake(HIT_SHAKE);
        tick(&mut state, &idle()).unwrap();
        assert_eq!(state.shake_offset, Vec2::ZERO);

        state.shake_enabled = true;
        state.effects.shake(HIT_SHAKE);
        tick(&mut state, &idle()).unwrap();
        let s = (HIT_SHAKE - 1) as f32;
        assert!(state.shake_offset.x.abs() <= s / 2.0);
        assert!(state.shake_offset.y.abs() <= s);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |frame: u32| TickInput {
            right: frame % 90 < 60,
            left: frame % 90 >= 60,
            jump: frame % 37 == 0,
            dash: frame % 53 == 0,
        };
        let mut a = playing_state(77);
        let mut b = playing_state(77);
        for frame in 0..400 {
            tick(&mut a, &script(frame)).unwrap();
            tick(&mut b, &script(frame)).unwrap();
        }
        assert_eq!(a.player.pos(), b.player.pos());
        assert_eq!(a.effects.particles.len(), b.effects.particles.len());
        assert_eq!(a.shake_offset, b.shake_offset);
    }

    #[test]
    fn test_leaves_fall_from_trees() {
        let mut state = playing_state(13);
        state.level.leaf_spawners.trees = vec![Rect::new(500, -100, 200, 200)];
        for _ in 0..200 {
            tick(&mut state, &idle()).unwrap();
        }
        assert!(
            state
                .effects
                .particles
                .iter()
                .any(|p| p.kind == ParticleKind::Leaf)
        );
    }

    fn leaf_count(state: &GameState) -> usize {
        state
            .effects
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Leaf)
            .count()
    }

    /// Player landed on the floor with nothing left over from spawning
    fn settled_state(seed: u64) -> GameState {
        let mut state = playing_state(seed);
        for _ in 0..30 {
            tick(&mut state, &idle()).unwrap();
        }
        assert!(state.player.entity.collisions.down);
        state.effects.particles.clear();
        state
    }

    #[test]
    fn test_falling_through_bush_sheds_leaf_bursts() {
        let mut state = settled_state(14);
        state.level.leaf_spawners.bushes = vec![Rect::new(0, 0, 100, 60)];
        for _ in 0..40 {
            state.player.entity.vel.y = 2.0;
            tick(&mut state, &idle()).unwrap();
        }
        let leaves = leaf_count(&state);
        assert!(leaves > 0);
        // Every burst is round(2.0 * 3) leaves
        assert_eq!(leaves % 6, 0);
    }

    #[test]
    fn test_still_or_rising_player_leaves_bush_alone() {
        let mut state = settled_state(15);
        state.level.leaf_spawners.bushes = vec![Rect::new(0, 0, 100, 60)];
        for _ in 0..100 {
            tick(&mut state, &idle()).unwrap();
        }
        assert_eq!(leaf_count(&state), 0);

        state.level.leaf_spawners.bushes = vec![Rect::new(0, -300, 100, 360)];
        for _ in 0..50 {
            state.player.entity.vel.y = -2.0;
            tick(&mut state, &idle()).unwrap();
        }
        assert_eq!(leaf_count(&state), 0);
    }

    #[test]
    fn test_walking_through_bush_sheds_leaves() {
        let mut state = settled_state(16);
        state.level.leaf_spawners.bushes = vec![Rect::new(0, 0, 300, 60)];
        let right = TickInput {
            right: true,
            ..TickInput::default()
        };
        for _ in 0..100 {
            tick(&mut state, &right).unwrap();
        }
        assert!(leaf_count(&state) > 0);
    }

    #[test]
    fn test_standing_in_tree_shakes_leaves_loose() {
        let mut state = settled_state(17);
        let body = state.player.rect();
        // Small canopy: the area roll alone almost never fires
        state.level.leaf_spawners.trees = vec![Rect::new(body.x - 2, body.y - 2, 12, 19)];
        for _ in 0..60 {
            tick(&mut state, &idle()).unwrap();
        }
        assert!(leaf_count(&state) >= 5);
    }

    #[test]
    fn test_leaves_drift_sideways() {
        let mut effects = Effects::new();
        let start = Vec2::new(10.0, 10.0);
        effects.spawn_particle(ParticleKind::Leaf, start, Vec2::ZERO, 0);
        effects.spawn_particle(ParticleKind::Impact, start, Vec2::ZERO, 0);
        update_sparks_and_particles(&mut effects);

        let leaf = &effects.particles[0];
        let drift = (leaf.animation.frame as f32 * 0.035).sin() * 0.3;
        assert_eq!(leaf.animation.frame, 1);
        assert!((leaf.pos.x - (start.x + drift)).abs() < 1e-6);
        assert!(drift > 0.0);
        assert_eq!(effects.particles[1].pos, start);
    }
}
