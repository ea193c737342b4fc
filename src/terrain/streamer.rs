use bevy::app::AppExit;
use bevy::asset::LoadState;
use bevy::image::{
    ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor,
};
use bevy::prelude::*;

use super::constants::{GRASS_TEXTURE_PATH, HEIGHTMAP_PATH, STREAM_RADIUS};
use super::coords::TileCoord;
use super::heightfield::{build_tile_mesh, lod_step_for_distance, Heightfield};
use super::store::{Tile, TileStore};
use crate::walker::Walker;

/// Handles to the shared terrain assets, loaded once at startup
#[derive(Resource)]
pub struct TerrainAssets {
    pub heightmap: Handle<Image>,
    pub grass: Handle<Image>,
    pub material: Handle<StandardMaterial>,
}

/// Startup system that kicks off the height-map and grass texture loads and
/// prepares the material every tile shares
pub fn load_terrain_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let heightmap = asset_server.load(HEIGHTMAP_PATH);

    // The grass texture repeats across each tile, so it needs a repeat sampler
    let grass = asset_server.load_with_settings(
        GRASS_TEXTURE_PATH,
        |settings: &mut ImageLoaderSettings| {
            settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
                address_mode_u: ImageAddressMode::Repeat,
                address_mode_v: ImageAddressMode::Repeat,
                ..ImageSamplerDescriptor::default()
            });
        },
    );

    let material = materials.add(StandardMaterial {
        base_color_texture: Some(grass.clone()),
        perceptual_roughness: 0.9,
        ..default()
    });

    commands.insert_resource(TerrainAssets {
        heightmap,
        grass,
        material,
    });
}

/// System to track the walker's position and record its current tile cell
pub fn update_walker_cell(
    walker_query: Query<&Transform, With<Walker>>,
    mut store: ResMut<TileStore>,
) {
    if let Ok(transform) = walker_query.single() {
        let cell = TileCoord::from_world(transform.translation.x, transform.translation.z);

        if store.walker_cell != Some(cell) {
            store.update_walker_cell(cell);
            info!("Walker moved to tile {}", cell);
        }
    }
}

/// System that decodes the height-map image into a `Heightfield` resource
/// once the asset arrives. Decode failures are fatal: the asset path is
/// static, so retrying cannot change the outcome.
pub fn decode_heightfield(
    mut commands: Commands,
    terrain_assets: Res<TerrainAssets>,
    images: Res<Assets<Image>>,
    field: Option<Res<Heightfield>>,
    mut exit: MessageWriter<AppExit>,
) {
    if field.is_some() {
        return;
    }
    let Some(image) = images.get(&terrain_assets.heightmap) else {
        return;
    };

    match Heightfield::from_image(image) {
        Ok(field) => {
            info!("Decoded {}: {}x{} samples", HEIGHTMAP_PATH, field.width, field.height);
            commands.insert_resource(field);
        }
        Err(e) => {
            error!("Height-map {} is unusable: {}", HEIGHTMAP_PATH, e);
            exit.write(AppExit::error());
        }
    }
}

/// System to materialize missing terrain tiles around the walker.
///
/// Runs every frame; does nothing until the heightfield is decoded and the
/// walker's cell is known. Each missing tile in the 5x5 window gets a mesh at
/// a level of detail chosen from its distance to the camera, then is spawned
/// at its world origin and registered in the store.
pub fn stream_tiles_around_walker(
    mut commands: Commands,
    mut store: ResMut<TileStore>,
    mut meshes: ResMut<Assets<Mesh>>,
    field: Option<Res<Heightfield>>,
    terrain_assets: Res<TerrainAssets>,
    camera_query: Query<&Transform, With<Camera3d>>,
) {
    let Some(field) = field else {
        return;
    };
    let Some(cell) = store.walker_cell else {
        return;
    };

    // Skip the frame entirely when the window is already covered
    let window = cell.window(STREAM_RADIUS);
    if window.iter().all(|coord| store.contains(coord)) {
        return;
    }

    let focal_point = camera_query
        .single()
        .map(|camera| camera.translation)
        .unwrap_or(Vec3::ZERO);

    let mut created = 0;
    store.ensure_window_with(cell, STREAM_RADIUS, |coord| {
        let origin = coord.to_world();
        let step = lod_step_for_distance(focal_point.distance(coord.center()));
        let mesh = meshes.add(build_tile_mesh(&field, step));

        created += 1;
        debug!("Generated tile {} at {:?} with step {}", coord, origin, step);

        commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(terrain_assets.material.clone()),
                Transform::from_translation(origin),
                Tile::new(coord),
            ))
            .id()
    });

    info!("Generated {} tiles | {}", created, store.stats());

    #[cfg(feature = "debug_tiles")]
    print_tile_grid(&store, cell);
}

/// System that surfaces terrain asset load failures as a fatal error.
/// The store cannot produce any tile without them, so there is no retry path.
pub fn abort_on_asset_failure(
    asset_server: Res<AssetServer>,
    terrain_assets: Res<TerrainAssets>,
    mut exit: MessageWriter<AppExit>,
) {
    let assets = [
        (HEIGHTMAP_PATH, terrain_assets.heightmap.id().untyped()),
        (GRASS_TEXTURE_PATH, terrain_assets.grass.id().untyped()),
    ];

    for (path, id) in assets {
        if let LoadState::Failed(err) = asset_server.load_state(id) {
            error!("Failed to load {}: {}", path, err);
            exit.write(AppExit::error());
        }
    }
}

/// Print a small grid of generated tiles around the walker
#[cfg(feature = "debug_tiles")]
fn print_tile_grid(store: &TileStore, walker_cell: TileCoord) {
    let view = STREAM_RADIUS + 1;
    let mut grid = String::new();

    for y in (walker_cell.y - view..=walker_cell.y + view).rev() {
        for x in walker_cell.x - view..=walker_cell.x + view {
            let coord = TileCoord::new(x, y);
            grid.push_str(if coord == walker_cell {
                " @ "
            } else if store.contains(&coord) {
                " # "
            } else {
                " . "
            });
        }
        grid.push('\n');
    }

    info!("Tile grid around {}:\n{}", walker_cell, grid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::world::World;

    /// Drive the store the way one streamer poll does, with entities minted
    /// from a bare ECS world standing in for spawned tiles
    fn poll(world: &mut World, store: &mut TileStore, x: f32, z: f32) {
        let cell = TileCoord::from_world(x, z);
        store.update_walker_cell(cell);
        store.ensure_window_with(cell, STREAM_RADIUS, |_| world.spawn_empty().id());
    }

    #[test]
    fn test_first_poll_covers_five_by_five() {
        let mut world = World::new();
        let mut store = TileStore::default();

        poll(&mut world, &mut store, 0.0, 0.0);

        assert_eq!(store.tile_count(), 25);
        for x in -2..=2 {
            for y in -2..=2 {
                assert!(store.contains(&TileCoord::new(x, y)));
            }
        }
    }

    #[test]
    fn test_streaming_scenario_grows_union() {
        let mut world = World::new();
        let mut store = TileStore::default();

        poll(&mut world, &mut store, 0.0, 0.0);
        let original: Vec<(TileCoord, Entity)> = (-2..=2)
            .flat_map(|x| (-2..=2).map(move |y| TileCoord::new(x, y)))
            .map(|coord| (coord, store.get(&coord).unwrap()))
            .collect();

        // position (300, 0) lands in cell (2, 0); window becomes (0..4)x(-2..2)
        poll(&mut world, &mut store, 300.0, 0.0);

        assert_eq!(store.tile_count(), 34); // 9 new, 16 overlapping, 25 original
        for x in 0..=4 {
            for y in -2..=2 {
                assert!(store.contains(&TileCoord::new(x, y)));
            }
        }
        // every previously generated tile keeps its handle
        for (coord, entity) in original {
            assert_eq!(store.get(&coord), Some(entity));
        }
    }

    #[test]
    fn test_monotonic_growth_along_a_path() {
        let mut world = World::new();
        let mut store = TileStore::default();
        let mut last = 0;

        let mut x = 0.0;
        while x <= 2000.0 {
            poll(&mut world, &mut store, x, 0.0);
            assert!(store.tile_count() >= last);
            last = store.tile_count();
            x += 50.0;
        }

        // 2000 units of travel crosses cells 0..=16
        assert_eq!(store.tile_count(), 5 * 21);
    }

    #[test]
    fn test_stationary_polls_are_no_ops() {
        let mut world = World::new();
        let mut store = TileStore::default();

        for _ in 0..10 {
            poll(&mut world, &mut store, 12.0, -30.0);
        }

        assert_eq!(store.tile_count(), 25);
    }
}
