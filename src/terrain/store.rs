use bevy::prelude::*;
use std::collections::HashMap;

use super::coords::TileCoord;

/// Component marking a spawned terrain tile entity with its grid position
#[derive(Component, Debug, Clone, Copy)]
pub struct Tile {
    pub coord: TileCoord,
}

impl Tile {
    pub fn new(coord: TileCoord) -> Self {
        Self { coord }
    }
}

/// Resource tracking every generated terrain tile.
///
/// Tiles are generated at most once per coordinate and never despawned, so
/// the mapping only grows as the walker roams.
#[derive(Resource, Default)]
pub struct TileStore {
    /// Map of tile coordinates to their spawned entities
    tiles: HashMap<TileCoord, Entity>,

    /// Tile cell the walker was last seen in (drives streaming decisions)
    pub walker_cell: Option<TileCoord>,
}

impl TileStore {
    /// Check if a tile has already been generated at this coordinate
    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.tiles.contains_key(coord)
    }

    /// Get the entity for a generated tile
    pub fn get(&self, coord: &TileCoord) -> Option<Entity> {
        self.tiles.get(coord).copied()
    }

    /// Return the tile at `coord`, materializing it first if missing.
    /// Existing tiles are returned as-is and `materialize` never runs for them.
    pub fn ensure_with(
        &mut self,
        coord: TileCoord,
        materialize: impl FnOnce() -> Entity,
    ) -> Entity {
        *self.tiles.entry(coord).or_insert_with(materialize)
    }

    /// Materialize every missing tile in the square window around `center`.
    /// `materialize` runs once per missing coordinate, in unspecified order.
    pub fn ensure_window_with(
        &mut self,
        center: TileCoord,
        radius: i32,
        mut materialize: impl FnMut(TileCoord) -> Entity,
    ) {
        for coord in center.window(radius) {
            self.ensure_with(coord, || materialize(coord));
        }
    }

    /// Number of tiles generated so far
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Record the walker's current tile cell
    pub fn update_walker_cell(&mut self, cell: TileCoord) {
        self.walker_cell = Some(cell);
    }

    /// Snapshot of the store state for logging and the HUD
    pub fn stats(&self) -> TileStoreStats {
        TileStoreStats {
            generated_tiles: self.tiles.len(),
            walker_cell: self.walker_cell,
        }
    }
}

/// Statistics about the current tile store state
#[derive(Debug, Clone, Copy)]
pub struct TileStoreStats {
    pub generated_tiles: usize,
    pub walker_cell: Option<TileCoord>,
}

impl std::fmt::Display for TileStoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tiles: {} | Cell: ", self.generated_tiles)?;
        match self.walker_cell {
            Some(cell) => write!(f, "{}", cell),
            None => write!(f, "-"),
        }
    }
}
