//! Game state and the per-level bundle
//!
//! Everything the level loop mutates lives here. A level load builds a
//! fresh [`Level`] from a tilemap and swaps it in whole, so the map, enemy
//! list, scroll and counters never disagree.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clouds::CloudSet;
use super::collision::Rect;
use super::effects::Effects;
use super::enemy::Enemy;
use super::player::Player;
use super::tilemap::{TileKind, Tilemap};
use crate::consts::TRANSITION_FRAMES;
use crate::error::MapError;
use crate::persistence::MapLibrary;
use crate::settings::Settings;

/// Number of parallax clouds
pub const CLOUD_COUNT: usize = 8;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Final level cleared
    Won,
}

/// Zones that shed leaves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafSpawners {
    pub trees: Vec<Rect>,
    pub bushes: Vec<Rect>,
}

impl LeafSpawners {
    /// Canopy and bush areas of the large decorations in `tilemap`
    pub fn from_tilemap(tilemap: &mut Tilemap) -> Self {
        let trees = tilemap
            .extract(&[(TileKind::LargeDecor, 2)], true)
            .into_iter()
            .map(|tree| Rect::new(tree.pos.x as i32 + 4, tree.pos.y as i32 + 4, 23, 13))
            .collect();
        let bushes = tilemap
            .extract(&[(TileKind::LargeDecor, 1)], true)
            .into_iter()
            .map(|bush| Rect::new(bush.pos.x as i32 + 3, bush.pos.y as i32 + 3, 19, 9))
            .collect();
        Self { trees, bushes }
    }
}

/// State that belongs to one loaded level
#[derive(Debug, Clone)]
pub struct Level {
    pub tilemap: Tilemap,
    pub enemies: Vec<Enemy>,
    pub leaf_spawners: LeafSpawners,
    /// Camera top-left, smoothed toward the player
    pub scroll: Vec2,
    /// Frames since the player died; 0 while alive
    pub dead: u32,
    /// Wipe counter: negative while opening, positive while closing
    pub transition: i32,
}

impl Level {
    /// Consume the spawner tiles of `tilemap` and build the level around it.
    /// Returns the player spawn point if the map has one.
    pub fn build(mut tilemap: Tilemap) -> (Self, Option<Vec2>) {
        let leaf_spawners = LeafSpawners::from_tilemap(&mut tilemap);

        let mut spawn = None;
        let mut enemies = Vec::new();
        let spawners = tilemap.extract(&[(TileKind::Spawners, 0), (TileKind::Spawners, 1)], false);
        for spawner in spawners {
            if spawner.variant == 0 {
                spawn = Some(spawner.pos);
            } else {
                enemies.push(Enemy::new(spawner.pos));
            }
        }

        let level = Self {
            tilemap,
            enemies,
            leaf_spawners,
            scroll: Vec2::ZERO,
            dead: 0,
            transition: -TRANSITION_FRAMES,
        };
        (level, spawn)
    }

    /// Scroll rounded toward zero, as used for drawing
    pub fn render_scroll(&self) -> IVec2 {
        IVec2::new(self.scroll.x as i32, self.scroll.y as i32)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::build(Tilemap::default()).0
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub level: Level,
    /// Particles, sparks, projectiles, queued sounds and shake
    pub effects: Effects,
    pub clouds: CloudSet,
    /// Index of the loaded level
    pub level_index: usize,
    pub library: MapLibrary,
    /// Whether shake moves the picture
    pub shake_enabled: bool,
    /// Render offset rolled this frame from the shake counter
    pub shake_offset: Vec2,
}

impl GameState {
    /// Start a run from the configured maps directory and start level
    pub fn new(settings: &Settings) -> Result<Self, MapError> {
        let seed = settings.seed.unwrap_or_else(seed_from_clock);
        let mut state = Self::empty(seed, MapLibrary::open(&settings.maps_dir));
        state.shake_enabled = settings.effective_screen_shake();
        state.load_level(settings.start_level)?;
        Ok(state)
    }

    /// Start a run on an in-memory map with no level files behind it
    pub fn with_tilemap(tilemap: Tilemap, seed: u64) -> Self {
        let mut state = Self::empty(seed, MapLibrary::empty());
        state.install(tilemap);
        state
    }

    fn empty(seed: u64, library: MapLibrary) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let clouds = CloudSet::new(CLOUD_COUNT, &mut rng);
        Self {
            seed,
            rng,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::new(Vec2::new(50.0, 50.0)),
            level: Level::default(),
            effects: Effects::new(),
            clouds,
            level_index: 0,
            library,
            shake_enabled: true,
            shake_offset: Vec2::ZERO,
        }
    }

    /// Load level `index`. A missing file keeps the current map; any other
    /// failure is returned.
    pub fn load_level(&mut self, index: usize) -> Result<(), MapError> {
        let tilemap = match self.library.load(index) {
            Ok(tilemap) => tilemap,
            Err(e) if e.is_not_found() => {
                log::warn!("{e}; keeping the current map");
                std::mem::take(&mut self.level.tilemap)
            }
            Err(e) => return Err(e),
        };
        self.level_index = index;
        self.install(tilemap);
        Ok(())
    }

    fn install(&mut self, tilemap: Tilemap) {
        let (level, spawn) = Level::build(tilemap);
        if let Some(pos) = spawn {
            self.player.respawn(pos);
        }
        self.player.entity.vel = Vec2::ZERO;
        self.effects.clear();
        self.level = level;
        log::info!(
            "Loaded level {} ({} tiles, {} enemies)",
            self.level_index,
            self.level.tilemap.len(),
            self.level.enemies.len()
        );
    }

    /// Move on after a level is cleared, or finish the game on the last one
    pub fn advance_level(&mut self) -> Result<(), MapError> {
        if self.library.is_final(self.level_index) {
            log::info!("Final level {} cleared", self.level_index);
            self.phase = GamePhase::Won;
            self.level.transition = TRANSITION_FRAMES;
            return Ok(());
        }
        log::info!("Advancing to level {}", self.level_index + 1);
        self.load_level(self.level_index + 1)
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }
}

fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tilemap::{OffgridTile, Tile};
    use glam::IVec2;

    fn spawn_map() -> Tilemap {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Spawners, 0, IVec2::new(2, 2)));
        map.insert(Tile::new(TileKind::Grass, 0, IVec2::new(2, 3)));
        map
    }

    #[test]
    fn test_single_player_spawner_places_player() {
        let state = GameState::with_tilemap(spawn_map(), 1);
        assert_eq!(state.player.pos(), Vec2::new(32.0, 32.0));
        assert!(state.level.enemies.is_empty());
        // Spawners are consumed, the floor stays
        assert_eq!(state.level.tilemap.len(), 1);
        assert_eq!(state.level.transition, -TRANSITION_FRAMES);
    }

    #[test]
    fn test_enemy_spawners_and_leaf_zones() {
        let mut map = spawn_map();
        map.insert(Tile::new(TileKind::Spawners, 1, IVec2::new(5, 2)));
        map.insert_offgrid(OffgridTile {
            kind: TileKind::Spawners,
            variant: 1,
            pos: Vec2::new(100.5, 20.0),
        });
        map.insert_offgrid(OffgridTile {
            kind: TileKind::LargeDecor,
            variant: 2,
            pos: Vec2::new(40.0, 0.0),
        });
        map.insert(Tile::new(TileKind::LargeDecor, 1, IVec2::new(6, 1)));

        let (level, spawn) = Level::build(map);
        assert_eq!(spawn, Some(Vec2::new(32.0, 32.0)));
        assert_eq!(level.enemies.len(), 2);
        assert_eq!(level.enemies[0].entity.pos, Vec2::new(100.5, 20.0));
        assert_eq!(level.enemies[1].entity.pos, Vec2::new(80.0, 32.0));
        assert_eq!(level.leaf_spawners.trees, vec![Rect::new(44, 4, 23, 13)]);
        assert_eq!(level.leaf_spawners.bushes, vec![Rect::new(99, 19, 19, 9)]);
        // Decorations are kept, spawners are not
        assert_eq!(level.tilemap.offgrid_tiles().len(), 1);
        assert_eq!(level.tilemap.len(), 2);
    }

    #[test]
    fn test_missing_level_keeps_current_map() {
        let dir = tempfile::tempdir().unwrap();
        let mut map = spawn_map();
        map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(0, 0)));
        map.save(dir.path().join("0.json")).unwrap();

        let settings = Settings {
            maps_dir: dir.path().to_path_buf(),
            seed: Some(3),
            ..Settings::default()
        };
        let mut state = GameState::new(&settings).unwrap();
        assert_eq!(state.level.tilemap.len(), 2);

        state.level.dead = 12;
        state.load_level(7).unwrap();
        assert_eq!(state.level_index, 7);
        assert_eq!(state.level.tilemap.len(), 2);
        assert_eq!(state.level.dead, 0);
    }

    #[test]
    fn test_malformed_level_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("0.json"), "{\"tilemap\": 3").unwrap();
        let settings = Settings {
            maps_dir: dir.path().to_path_buf(),
            seed: Some(3),
            ..Settings::default()
        };
        let err = GameState::new(&settings).unwrap_err();
        assert!(matches!(err, MapError::Malformed { .. }));
    }

    #[test]
    fn test_clearing_last_level_wins() {
        let mut state = GameState::with_tilemap(spawn_map(), 9);
        state.advance_level().unwrap();
        assert!(state.is_won());
        assert_eq!(state.level.transition, TRANSITION_FRAMES);
    }

    #[test]
    fn test_same_seed_same_clouds() {
        let a = GameState::with_tilemap(spawn_map(), 42);
        let b = GameState::with_tilemap(spawn_map(), 42);
        assert_eq!(a.clouds.clouds.len(), CLOUD_COUNT);
        assert_eq!(a.clouds.clouds, b.clouds.clouds);
    }
}
