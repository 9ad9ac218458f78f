//! Sparse tile grid: storage, neighbor queries, autotiling and the level codec
//!
//! Gridded tiles live in a map keyed by integer cell coordinates, off-grid
//! decorations in an ordered list with pixel positions. On disk the grid is
//! keyed by `"x;y"` strings; that form exists only at the codec boundary.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::cell_of;
use crate::error::MapError;

/// Tile type names as they appear in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
    Spawners,
}

impl TileKind {
    /// Tiles entities collide with
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Tiles whose variant is picked from their neighbors
    pub fn autotiles(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Stone => "stone",
            TileKind::Decor => "decor",
            TileKind::LargeDecor => "large_decor",
            TileKind::Spawners => "spawners",
        }
    }
}

/// `(type, variant)` pair used to select tiles for extraction
pub type TileId = (TileKind, u32);

/// A tile snapped to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: u32,
    /// Grid cell, not pixels
    pub pos: IVec2,
}

impl Tile {
    pub fn new(kind: TileKind, variant: u32, pos: IVec2) -> Self {
        Self { kind, variant, pos }
    }
}

/// A decorative tile placed freely in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: u32,
    pub pos: Vec2,
}

/// A tile returned by [`Tilemap::extract`], always in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub kind: TileKind,
    pub variant: u32,
    pub pos: Vec2,
}

/// Neighbor direction bits for autotiling
pub mod neighbors {
    pub const RIGHT: u8 = 1 << 0;
    pub const DOWN: u8 = 1 << 1;
    pub const LEFT: u8 = 1 << 2;
    pub const UP: u8 = 1 << 3;

    /// Orthogonal offsets paired with their bit
    pub const ORTHOGONAL: [((i32, i32), u8); 4] =
        [((1, 0), RIGHT), ((0, 1), DOWN), ((-1, 0), LEFT), ((0, -1), UP)];
}

use neighbors::{DOWN, LEFT, RIGHT, UP};

/// Same-type neighbor set -> variant. Sets not listed keep their variant.
const AUTOTILE_MAP: [(u8, u32); 10] = [
    (0, 1),
    (RIGHT | DOWN, 0),
    (RIGHT | DOWN | LEFT, 1),
    (DOWN | LEFT, 2),
    (DOWN | LEFT | UP, 3),
    (LEFT | UP, 4),
    (LEFT | UP | RIGHT, 5),
    (UP | RIGHT, 6),
    (UP | RIGHT | DOWN, 7),
    (RIGHT | LEFT | DOWN | UP, 8),
];

/// Variant for a neighbor set, if the set is one the tileset draws
pub fn autotile_variant(neighbor_set: u8) -> Option<u32> {
    AUTOTILE_MAP
        .iter()
        .find(|(set, _)| *set == neighbor_set)
        .map(|(_, variant)| *variant)
}

/// The containing cell plus its 8 neighbors
const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone)]
pub struct Tilemap {
    tile_size: i32,
    tiles: BTreeMap<(i32, i32), Tile>,
    offgrid: Vec<OffgridTile>,
}

impl Tilemap {
    /// Empty map; `tile_size` is clamped to at least one pixel
    pub fn new(tile_size: i32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            tiles: BTreeMap::new(),
            offgrid: Vec::new(),
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Place a gridded tile, replacing whatever occupied its cell
    pub fn insert(&mut self, tile: Tile) {
        self.tiles.insert((tile.pos.x, tile.pos.y), tile);
    }

    pub fn insert_offgrid(&mut self, tile: OffgridTile) {
        self.offgrid.push(tile);
    }

    pub fn get(&self, cell: IVec2) -> Option<&Tile> {
        self.tiles.get(&(cell.x, cell.y))
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn offgrid_tiles(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    /// Number of gridded tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.offgrid.is_empty()
    }

    fn cell_at(&self, pixel: Vec2) -> IVec2 {
        IVec2::new(cell_of(pixel.x, self.tile_size), cell_of(pixel.y, self.tile_size))
    }

    /// The solid tile covering a pixel, if any
    pub fn solid_check(&self, pixel: Vec2) -> Option<&Tile> {
        self.get(self.cell_at(pixel)).filter(|tile| tile.kind.is_solid())
    }

    /// Every tile in the 3x3 block of cells centered on the pixel's cell
    pub fn tiles_around(&self, pixel: Vec2) -> Vec<&Tile> {
        let cell = self.cell_at(pixel);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.get(cell + IVec2::new(dx, dy)))
            .collect()
    }

    /// Collision boxes of the solid tiles around a pixel
    pub fn physics_rects_around(&self, pixel: Vec2) -> Vec<Rect> {
        self.tiles_around(pixel)
            .into_iter()
            .filter(|tile| tile.kind.is_solid())
            .map(|tile| self.tile_rect(tile.pos))
            .collect()
    }

    pub fn tile_rect(&self, cell: IVec2) -> Rect {
        Rect::new(
            cell.x * self.tile_size,
            cell.y * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Same-type orthogonal neighbor bits of a cell
    pub fn neighbor_set(&self, tile: &Tile) -> u8 {
        neighbors::ORTHOGONAL
            .iter()
            .filter(|((dx, dy), _)| {
                self.get(tile.pos + IVec2::new(*dx, *dy))
                    .is_some_and(|other| other.kind == tile.kind)
            })
            .fold(0, |set, (_, bit)| set | bit)
    }

    /// Re-pick the variant of every autotiling tile from its neighbors
    pub fn autotile(&mut self) {
        let updates: Vec<((i32, i32), u32)> = self
            .tiles
            .iter()
            .filter(|(_, tile)| tile.kind.autotiles())
            .filter_map(|(key, tile)| {
                autotile_variant(self.neighbor_set(tile)).map(|variant| (*key, variant))
            })
            .collect();

        for (key, variant) in updates {
            if let Some(tile) = self.tiles.get_mut(&key) {
                tile.variant = variant;
            }
        }
    }

    /// Collect tiles whose `(type, variant)` is in `ids`, off-grid first.
    ///
    /// Gridded positions come back converted to pixels. Unless `keep` is set
    /// the matches are removed from the map.
    pub fn extract(&mut self, ids: &[TileId], keep: bool) -> Vec<PlacedTile> {
        let wanted = |kind: TileKind, variant: u32| ids.contains(&(kind, variant));
        let mut matches = Vec::new();

        for tile in &self.offgrid {
            if wanted(tile.kind, tile.variant) {
                matches.push(PlacedTile {
                    kind: tile.kind,
                    variant: tile.variant,
                    pos: tile.pos,
                });
            }
        }
        if !keep {
            self.offgrid.retain(|tile| !wanted(tile.kind, tile.variant));
        }

        let grid_hits: Vec<(i32, i32)> = self
            .tiles
            .iter()
            .filter(|(_, tile)| wanted(tile.kind, tile.variant))
            .map(|(key, _)| *key)
            .collect();
        for key in grid_hits {
            let Some(tile) = self.tiles.get(&key).copied() else {
                continue;
            };
            matches.push(PlacedTile {
                kind: tile.kind,
                variant: tile.variant,
                pos: (tile.pos * self.tile_size).as_vec2(),
            });
            if !keep {
                self.tiles.remove(&key);
            }
        }

        matches
    }

    /// Gridded tiles inside a view window, scanning only the visible cells
    pub fn visible_tiles(&self, scroll: IVec2, view: UVec2) -> Vec<&Tile> {
        let ts = self.tile_size;
        let x0 = scroll.x.div_euclid(ts);
        let x1 = (scroll.x + view.x as i32).div_euclid(ts);
        let y0 = scroll.y.div_euclid(ts);
        let y1 = (scroll.y + view.y as i32).div_euclid(ts);

        let mut visible = Vec::new();
        for x in x0..=x1 {
            for y in y0..=y1 {
                if let Some(tile) = self.tiles.get(&(x, y)) {
                    visible.push(tile);
                }
            }
        }
        visible
    }

    /// Parse a level file. A missing file is reported as [`MapError::NotFound`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MapError::from_io(path, e))?;
        let file: MapFile = serde_json::from_str(&text).map_err(|source| MapError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        if file.tile_size < 1 {
            return Err(MapError::Malformed {
                path: path.to_path_buf(),
                source: serde::de::Error::custom("tile_size must be at least 1"),
            });
        }
        Self::from_file(file)
    }

    /// Write the whole map as a level file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let json = serde_json::to_string(&self.to_file()).map_err(|source| MapError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_file(file: MapFile) -> Result<Self, MapError> {
        let mut map = Tilemap::new(file.tile_size);
        for (key, record) in file.tilemap {
            let pos = IVec2::from(record.pos);
            if parse_key(&key) != Some(pos) {
                return Err(MapError::InvalidKey { key });
            }
            map.insert(Tile::new(record.kind, record.variant, pos));
        }
        map.offgrid = file
            .offgrid_tiles
            .into_iter()
            .map(|record| OffgridTile {
                kind: record.kind,
                variant: record.variant,
                pos: Vec2::from(record.pos),
            })
            .collect();
        Ok(map)
    }

    fn to_file(&self) -> MapFile {
        MapFile {
            tilemap: self
                .tiles
                .values()
                .map(|tile| {
                    (
                        format_key(tile.pos),
                        TileRecord {
                            kind: tile.kind,
                            variant: tile.variant,
                            pos: tile.pos.to_array(),
                        },
                    )
                })
                .collect(),
            tile_size: self.tile_size,
            offgrid_tiles: self
                .offgrid
                .iter()
                .map(|tile| OffgridRecord {
                    kind: tile.kind,
                    variant: tile.variant,
                    pos: tile.pos.to_array(),
                })
                .collect(),
        }
    }
}

impl Default for Tilemap {
    fn default() -> Self {
        Self::new(crate::consts::TILE_SIZE)
    }
}

/// On-disk level layout
#[derive(Debug, Serialize, Deserialize)]
struct MapFile {
    tilemap: BTreeMap<String, TileRecord>,
    tile_size: i32,
    offgrid_tiles: Vec<OffgridRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TileRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: u32,
    pos: [i32; 2],
}

#[derive(Debug, Serialize, Deserialize)]
struct OffgridRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: u32,
    pos: [f32; 2],
}

fn format_key(cell: IVec2) -> String {
    format!("{};{}", cell.x, cell.y)
}

fn parse_key(key: &str) -> Option<IVec2> {
    let (x, y) = key.split_once(';')?;
    Some(IVec2::new(x.parse().ok()?, y.parse().ok()?))
}
