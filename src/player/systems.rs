use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::MouseMotion;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::view::Hdr;

use super::PlayerConfig;
use super::entities::{LookAngles, PhysicsFlags, Player, PlayerCamera, Riding, VerticalVelocity};
use crate::math;
use crate::vehicle::{Vehicle, VehicleConfig};
use crate::world::Heightfield;

/// Spawns the player capsule standing on the terrain at the world origin,
/// plus the first-person camera with HDR and bloom.
pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<PlayerConfig>,
    field: Res<Heightfield>,
) {
    let ground = field.height_at(0.0, 0.0);
    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            LookAngles::default(),
            PhysicsFlags::default(),
            VerticalVelocity::default(),
            Riding::default(),
            Transform::from_xyz(0.0, ground, 0.0),
            Visibility::default(),
        ))
        .id();

    let body_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.8, 0.5, 0.2),
        perceptual_roughness: 0.8,
        ..default()
    });
    let body = commands
        .spawn((
            Name::new("PlayerBody"),
            Mesh3d(meshes.add(Capsule3d::new(cfg.body_radius, 1.0))),
            MeshMaterial3d(body_material),
            Transform::from_xyz(0.0, 0.95, 0.0),
        ))
        .id();
    commands.entity(player).add_child(body);

    commands.spawn((
        Name::new("PlayerCamera"),
        PlayerCamera,
        Camera3d::default(),
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: cfg.bloom_intensity,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
        Transform::from_xyz(0.0, ground + cfg.eye_height, 0.0),
    ));
}

/// Mouse look: accumulates yaw freely, clamps pitch short of vertical.
pub fn look(
    cfg: Res<PlayerConfig>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut query: Query<&mut LookAngles, With<Player>>,
) {
    let Ok(mut look) = query.single_mut() else {
        // Consume events even if the player entity is missing.
        for _ in mouse_motion.read() {}
        return;
    };
    let limit = std::f32::consts::FRAC_PI_2 - cfg.pitch_margin;
    for motion in mouse_motion.read() {
        look.yaw -= motion.delta.x * cfg.mouse_sensitivity_x;
        look.pitch = (look.pitch - motion.delta.y * cfg.mouse_sensitivity_y).clamp(-limit, limit);
    }
}

/// WASD walking relative to view yaw, with gravity, terrain grounding, and a
/// radial keep-out against the buggy. Skipped entirely while frozen or aboard
/// a vehicle.
pub fn walk(
    time: Res<Time>,
    cfg: Res<PlayerConfig>,
    vehicle_cfg: Res<VehicleConfig>,
    field: Res<Heightfield>,
    keys: Res<ButtonInput<KeyCode>>,
    mut query: Query<
        (
            &mut Transform,
            &LookAngles,
            &mut VerticalVelocity,
            &PhysicsFlags,
            &Riding,
        ),
        (With<Player>, Without<Vehicle>),
    >,
    vehicles: Query<&Transform, (With<Vehicle>, Without<Player>)>,
) {
    let Ok((mut transform, look, mut vertical, flags, riding)) = query.single_mut() else {
        return;
    };
    if flags.frozen || riding.0.is_some() {
        return;
    }
    let dt = time.delta_secs();

    // WASD in the view's horizontal plane
    let forward = math::yaw_forward(look.yaw);
    let right = math::yaw_right(look.yaw);
    let mut direction = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keys.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keys.pressed(KeyCode::KeyD) {
        direction += right;
    }
    if keys.pressed(KeyCode::KeyA) {
        direction -= right;
    }
    if direction != Vec3::ZERO {
        transform.translation += direction.normalize() * cfg.walk_speed * dt;
    }

    // Gravity, then land on the terrain
    vertical.0 -= cfg.gravity * dt;
    transform.translation.y += vertical.0 * dt;
    if flags.collide_world {
        let ground = field.height_at(transform.translation.x, transform.translation.z);
        if transform.translation.y <= ground {
            transform.translation.y = ground;
            vertical.0 = 0.0;
        }
    }

    if flags.collide_entities {
        for vehicle_tf in &vehicles {
            transform.translation = math::push_out_horizontal(
                transform.translation,
                vehicle_tf.translation,
                cfg.body_radius + vehicle_cfg.footprint_radius,
            );
        }
    }
}

/// Parks the first-person camera at the current viewpoint: the player's eyes,
/// or the seat above the occupied vehicle.
pub fn sync_camera(
    player_cfg: Res<PlayerConfig>,
    vehicle_cfg: Res<VehicleConfig>,
    players: Query<
        (&Transform, &LookAngles, &Riding),
        (With<Player>, Without<PlayerCamera>, Without<Vehicle>),
    >,
    vehicles: Query<&Transform, (With<Vehicle>, Without<PlayerCamera>, Without<Player>)>,
    mut camera: Query<&mut Transform, With<PlayerCamera>>,
) {
    let Ok((player_tf, look, riding)) = players.single() else {
        return;
    };
    let Ok(mut camera_tf) = camera.single_mut() else {
        return;
    };

    let anchor = match riding.0.and_then(|v| vehicles.get(v).ok()) {
        Some(vehicle_tf) => vehicle_tf.translation + Vec3::Y * vehicle_cfg.seat_height,
        None => player_tf.translation + Vec3::Y * player_cfg.eye_height,
    };
    camera_tf.translation = anchor;
    camera_tf.rotation = Quat::from_euler(EulerRot::YXZ, look.yaw, look.pitch, 0.0);
}
