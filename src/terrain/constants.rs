/// Edge length of one terrain tile in world units
pub const TILE_SIZE: f32 = 128.0;

/// Half a tile edge; tile (0, 0) spans [-TILE_HALF, TILE_HALF) on each ground axis
pub const TILE_HALF: f32 = 64.0;

/// Vertical scale applied to normalized heightfield samples
pub const HEIGHT_SCALE: f32 = 100.0;

/// Radius of tiles to keep generated around the walker (5x5 window)
pub const STREAM_RADIUS: i32 = 2;

/// Block subdivision size of the heightfield grid; caps mesh simplification
pub const LOD_BLOCK_SIZE: u32 = 32;

/// Distance to the focal viewpoint under which a tile meshes at full resolution
pub const LOD_NEAR: f32 = 40.0;

/// Distance to the focal viewpoint beyond which a tile meshes at maximum simplification
pub const LOD_FAR: f32 = 100.0;

/// Repeat factor for the grass texture across one tile
pub const TEXTURE_SCALE: f32 = 50.0;

/// Asset path of the shared height-map image (every tile reuses it)
pub const HEIGHTMAP_PATH: &str = "height-map.png";

/// Asset path of the tiled grass texture
pub const GRASS_TEXTURE_PATH: &str = "grass-texture.png";
