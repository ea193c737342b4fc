use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;

mod terrain;
mod walker;

use terrain::{TerrainPlugin, TileStore};
use walker::{chase_camera, spawn_walker, walker_move, walker_turn};

/// Scene tint shared by the clear color and the fog
const SKY_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);

/// Exponential fog density
const FOG_DENSITY: f32 = 0.01;

/// Marker component for the HUD stats text
#[derive(Component)]
struct StatsText;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(TerrainPlugin)
        .insert_resource(ClearColor(SKY_COLOR))
        .add_systems(Startup, (setup_scene, spawn_walker, setup_hud))
        .add_systems(
            Update,
            (
                walker_move,
                walker_turn,
                chase_camera.after(walker_move).after(walker_turn),
                update_hud,
            ),
        )
        .run();
}

fn setup_scene(mut commands: Commands) {
    // Chase camera; also the focal viewpoint for terrain level of detail
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 8.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: SKY_COLOR,
            falloff: FogFalloff::Exponential {
                density: FOG_DENSITY,
            },
            ..default()
        },
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 200.0,
        ..default()
    });
}

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        StatsText,
        Text::new("Tiles: 0 | Cell: -"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.9, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
    ));
}

/// Refresh the stats overlay whenever the tile store changes
fn update_hud(store: Res<TileStore>, mut query: Query<&mut Text, With<StatsText>>) {
    if !store.is_changed() {
        return;
    }
    if let Ok(mut text) = query.single_mut() {
        text.0 = store.stats().to_string();
    }
}
