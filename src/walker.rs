use bevy::prelude::*;

/// Walking speed at full ramp, world units per second
const WALK_SPEED: f32 = 15.0;

/// Seconds of key-hold for the walk speed to reach full ramp
const RAMP_TIME: f32 = 1.0;

/// Turn rate in degrees per second
const TURN_RATE_DEG: f32 = 80.0;

/// Chase camera placement relative to the walker
const CAMERA_DISTANCE: f32 = 20.0;
const CAMERA_HEIGHT: f32 = 8.0;
const CAMERA_PITCH_DEG: f32 = -10.0;

/// Marker component for the keyboard-controlled character
#[derive(Component)]
pub struct Walker;

/// Explicit per-walker movement state: how long the walk key has been held,
/// driving the speed ramp
#[derive(Component, Debug, Default)]
pub struct WalkState {
    held: f32,
}

impl WalkState {
    /// Advance the hold timer
    pub fn tick(&mut self, delta: f32) {
        self.held += delta;
    }

    /// Drop back to a standing start
    pub fn reset(&mut self) {
        self.held = 0.0;
    }

    /// Current speed factor in [0, 1]; full speed after RAMP_TIME
    pub fn ramp_factor(&self) -> f32 {
        (self.held / RAMP_TIME).min(1.0)
    }
}

/// Spawn the walker at the world origin
pub fn spawn_walker(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body = meshes.add(Capsule3d::new(1.0, 3.0));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.65, 0.55),
        ..default()
    });

    commands.spawn((
        Mesh3d(body),
        MeshMaterial3d(material),
        Transform::from_xyz(0.0, 2.5, 0.0),
        Walker,
        WalkState::default(),
    ));
}

/// Arrow-key forward/backward movement with a ramped speed, so the walker
/// accelerates over the first second of a key hold
pub fn walker_move(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<(&mut Transform, &mut WalkState), With<Walker>>,
) {
    let Ok((mut transform, mut state)) = query.single_mut() else {
        return;
    };

    let mut direction = 0.0;
    if keyboard.pressed(KeyCode::ArrowUp) {
        direction += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        direction -= 1.0;
    }

    if direction == 0.0 {
        state.reset();
        return;
    }

    state.tick(time.delta_secs());
    let step = WALK_SPEED * state.ramp_factor() * time.delta_secs();
    let forward = transform.forward();
    transform.translation += forward * direction * step;
}

/// Arrow-key turning
pub fn walker_turn(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<&mut Transform, With<Walker>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };

    let mut turn = 0.0;
    if keyboard.pressed(KeyCode::ArrowLeft) {
        turn += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        turn -= 1.0;
    }

    if turn != 0.0 {
        transform.rotate_y(turn * TURN_RATE_DEG.to_radians() * time.delta_secs());
    }
}

/// Keep the camera a fixed distance behind the walker, above the ground,
/// pitched slightly down. The camera is also the focal viewpoint terrain
/// level-of-detail is judged against.
pub fn chase_camera(
    walker_query: Query<&Transform, (With<Walker>, Without<Camera3d>)>,
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
) {
    let Ok(walker) = walker_query.single() else {
        return;
    };
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };

    let back = walker.back();
    let mut position = walker.translation + back * CAMERA_DISTANCE;
    position.y = CAMERA_HEIGHT;

    camera.translation = position;
    camera.rotation = walker.rotation * Quat::from_rotation_x(CAMERA_PITCH_DEG.to_radians());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_reaches_full_speed() {
        let mut state = WalkState::default();
        assert_eq!(state.ramp_factor(), 0.0);

        state.tick(0.25);
        assert!((state.ramp_factor() - 0.25).abs() < 1e-6);

        state.tick(0.25);
        assert!((state.ramp_factor() - 0.5).abs() < 1e-6);

        // holding past the ramp time caps at full speed
        state.tick(2.0);
        assert_eq!(state.ramp_factor(), 1.0);
    }

    #[test]
    fn test_ramp_resets_on_release() {
        let mut state = WalkState::default();
        state.tick(5.0);
        assert_eq!(state.ramp_factor(), 1.0);

        state.reset();
        assert_eq!(state.ramp_factor(), 0.0);
    }
}
