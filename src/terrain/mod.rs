pub mod constants;
pub mod coords;
pub mod heightfield;
pub mod store;
pub mod streamer;

// Re-export commonly used items
pub use coords::TileCoord;
pub use heightfield::Heightfield;
pub use store::{Tile, TileStore};

use bevy::prelude::*;

/// Plugin for the terrain tile-streaming subsystem
pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TileStore>()
            .add_systems(Startup, streamer::load_terrain_assets)
            .add_systems(
                Update,
                (
                    streamer::abort_on_asset_failure,
                    streamer::decode_heightfield,
                    streamer::update_walker_cell,
                    streamer::stream_tiles_around_walker
                        .after(streamer::update_walker_cell)
                        .after(streamer::decode_heightfield),
                ),
            );
    }
}
