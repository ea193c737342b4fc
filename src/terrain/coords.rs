use bevy::prelude::*;

use super::constants::{TILE_HALF, TILE_SIZE};

/// Tile position in tile-grid coordinates (not world units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert from a world-space ground position to the containing tile.
    /// Tile (0, 0) spans [-64, 64) on both ground axes.
    pub fn from_world(x: f32, z: f32) -> Self {
        Self {
            x: ((x + TILE_HALF) / TILE_SIZE).floor() as i32,
            y: ((z + TILE_HALF) / TILE_SIZE).floor() as i32,
        }
    }

    /// World position of the tile's mesh origin corner
    pub fn to_world(&self) -> Vec3 {
        Vec3::new(
            self.x as f32 * TILE_SIZE - TILE_HALF,
            0.0,
            self.y as f32 * TILE_SIZE - TILE_HALF,
        )
    }

    /// World position of the tile's center on the ground plane
    pub fn center(&self) -> Vec3 {
        self.to_world() + Vec3::new(TILE_HALF, 0.0, TILE_HALF)
    }

    /// All tile coordinates in a square window of the given radius around this one.
    /// Iteration order is unspecified; callers must not rely on it.
    pub fn window(&self, radius: i32) -> Vec<TileCoord> {
        let mut coords = Vec::with_capacity(((radius * 2 + 1) * (radius * 2 + 1)) as usize);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                coords.push(TileCoord::new(self.x + dx, self.y + dy));
            }
        }
        coords
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<IVec2> for TileCoord {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<TileCoord> for IVec2 {
    fn from(coord: TileCoord) -> Self {
        IVec2::new(coord.x, coord.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world() {
        // Origin tile
        assert_eq!(TileCoord::from_world(0.0, 0.0), TileCoord::new(0, 0));

        // Tile boundaries: tile 0 spans [-64, 64)
        assert_eq!(TileCoord::from_world(63.9, 0.0), TileCoord::new(0, 0));
        assert_eq!(TileCoord::from_world(64.0, 0.0), TileCoord::new(1, 0));
        assert_eq!(TileCoord::from_world(-64.0, 0.0), TileCoord::new(0, 0));
        assert_eq!(TileCoord::from_world(-64.5, 0.0), TileCoord::new(-1, 0));

        // Mixed signs: (127+64)/128 = 1, floor((-65+64)/128) = -1
        assert_eq!(TileCoord::from_world(127.0, -65.0), TileCoord::new(1, -1));

        // Far negative
        assert_eq!(TileCoord::from_world(-300.0, -300.0), TileCoord::new(-2, -2));
    }

    #[test]
    fn test_to_world_placement() {
        assert_eq!(TileCoord::new(0, 0).to_world(), Vec3::new(-64.0, 0.0, -64.0));
        assert_eq!(
            TileCoord::new(2, -1).to_world(),
            Vec3::new(192.0, 0.0, -192.0)
        );
    }

    #[test]
    fn test_center() {
        assert_eq!(TileCoord::new(0, 0).center(), Vec3::ZERO);
        assert_eq!(TileCoord::new(1, 0).center(), Vec3::new(128.0, 0.0, 0.0));
    }

    #[test]
    fn test_window() {
        let coords = TileCoord::new(0, 0).window(2);
        assert_eq!(coords.len(), 25); // 5x5 grid
        assert!(coords.contains(&TileCoord::new(-2, -2)));
        assert!(coords.contains(&TileCoord::new(2, 2)));
        assert!(!coords.contains(&TileCoord::new(3, 0)));

        let coords = TileCoord::new(-4, 7).window(1);
        assert_eq!(coords.len(), 9);
        assert!(coords.contains(&TileCoord::new(-4, 7)));
        assert!(coords.contains(&TileCoord::new(-3, 8)));
    }

    #[test]
    fn test_roundtrip_through_center() {
        for coord in TileCoord::new(0, 0).window(3) {
            let center = coord.center();
            assert_eq!(TileCoord::from_world(center.x, center.z), coord);
        }
    }
}
