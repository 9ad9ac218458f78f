//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one update per frame at 60 Hz)
//! - Seeded RNG only, passed down by `&mut`
//! - Stable iteration order (BTreeMap grid, ordered entity lists)
//! - No rendering or platform dependencies

pub mod animation;
pub mod clouds;
pub mod collision;
pub mod effects;
pub mod enemy;
pub mod entity;
pub mod player;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use animation::{Action, Animation};
pub use clouds::{Cloud, CloudSet};
pub use collision::Rect;
pub use effects::{Effects, Particle, Projectile, Spark};
pub use enemy::Enemy;
pub use entity::{Collisions, PhysicsEntity};
pub use player::Player;
pub use state::{GamePhase, GameState, LeafSpawners, Level};
pub use tick::{TickInput, tick};
pub use tilemap::{OffgridTile, PlacedTile, Tile, TileId, TileKind, Tilemap};
