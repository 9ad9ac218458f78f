//! Level catalog
//!
//! Levels are numbered JSON files in one directory (`0.json`, `1.json`, ...).
//! The number of `.json` files fixes the last level index.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MapError;
use crate::sim::tilemap::Tilemap;

#[derive(Debug, Clone, Default)]
pub struct MapLibrary {
    dir: PathBuf,
    level_count: usize,
}

impl MapLibrary {
    /// Scan `dir` for level files. An unreadable directory holds no levels.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let level_count = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count(),
            Err(e) => {
                log::warn!("Cannot list maps in {}: {e}", dir.display());
                0
            }
        };
        log::info!("Found {} level(s) in {}", level_count, dir.display());
        Self { dir, level_count }
    }

    /// A catalog with no files behind it, for levels built in memory
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn level_count(&self) -> usize {
        self.level_count
    }

    /// True when clearing `level` ends the game
    pub fn is_final(&self, level: usize) -> bool {
        level + 1 >= self.level_count
    }

    pub fn path_for(&self, level: usize) -> PathBuf {
        self.dir.join(format!("{level}.json"))
    }

    pub fn load(&self, level: usize) -> Result<Tilemap, MapError> {
        Tilemap::load(self.path_for(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tilemap::{Tile, TileKind};
    use glam::IVec2;

    #[test]
    fn test_counts_only_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(1, 1)));
        map.save(dir.path().join("0.json")).unwrap();
        map.save(dir.path().join("1.json")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a level").unwrap();

        let library = MapLibrary::open(dir.path());
        assert_eq!(library.level_count(), 2);
        assert!(!library.is_final(0));
        assert!(library.is_final(1));
        assert_eq!(library.load(1).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_level_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let library = MapLibrary::open(dir.path());
        assert_eq!(library.level_count(), 0);
        let err = library.load(3).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_directory_has_no_levels() {
        let library = MapLibrary::open("/definitely/not/a/maps/dir");
        assert_eq!(library.level_count(), 0);
        assert!(library.is_final(0));
        assert_eq!(library.path_for(4), PathBuf::from("/definitely/not/a/maps/dir/4.json"));
    }
}
