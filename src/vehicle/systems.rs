use bevy::prelude::*;

use super::VehicleConfig;
use super::entities::Vehicle;
use crate::player::{PhysicsFlags, Player, Riding};
use crate::world::Heightfield;

/// Spawns the buggy parked on the terrain at its configured spot.
pub fn spawn_vehicle(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<VehicleConfig>,
    field: Res<Heightfield>,
) {
    let ground = field.height_at(cfg.spawn_offset.x, cfg.spawn_offset.y);
    let body_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.15, 0.1),
        perceptual_roughness: 0.4,
        metallic: 0.6,
        ..default()
    });

    let vehicle = commands
        .spawn((
            Name::new("Buggy"),
            Vehicle,
            PhysicsFlags::default(),
            Mesh3d(meshes.add(Cuboid::new(1.8, 0.8, 3.0))),
            MeshMaterial3d(body_material.clone()),
            Transform::from_xyz(cfg.spawn_offset.x, ground + cfg.clearance, cfg.spawn_offset.y),
            Visibility::default(),
        ))
        .id();

    // Cabin block toward the rear so the buggy reads as forward-facing.
    let cabin = commands
        .spawn((
            Name::new("BuggyCabin"),
            Mesh3d(meshes.add(Cuboid::new(1.4, 0.6, 1.2))),
            MeshMaterial3d(body_material),
            Transform::from_xyz(0.0, 0.7, 0.5),
        ))
        .id();
    commands.entity(vehicle).add_child(cabin);
}

/// Boards the nearest buggy in range on F, or hops out beside the current one.
pub fn mount(
    keys: Res<ButtonInput<KeyCode>>,
    cfg: Res<VehicleConfig>,
    field: Res<Heightfield>,
    mut players: Query<(&mut Transform, &mut Riding, &mut Visibility), (With<Player>, Without<Vehicle>)>,
    vehicles: Query<(Entity, &Transform), (With<Vehicle>, Without<Player>)>,
) {
    if !keys.just_pressed(KeyCode::KeyF) {
        return;
    }
    let Ok((mut transform, mut riding, mut visibility)) = players.single_mut() else {
        return;
    };

    if let Some(current) = riding.0 {
        // Dismount: step out beside the buggy, onto the ground
        if let Ok((_, vehicle_tf)) = vehicles.get(current) {
            let side = vehicle_tf.translation + *vehicle_tf.right() * 2.2;
            let ground = field.height_at(side.x, side.z);
            transform.translation = Vec3::new(side.x, ground, side.z);
        }
        riding.0 = None;
        *visibility = Visibility::Inherited;
        return;
    }

    let standing = transform.translation;
    let in_range = vehicles
        .iter()
        .find(|(_, tf)| tf.translation.distance(standing) <= cfg.mount_radius);
    if let Some((vehicle, _)) = in_range {
        riding.0 = Some(vehicle);
        *visibility = Visibility::Hidden;
    }
}

/// Throttle and steering while the player is aboard. The buggy stays glued to
/// the terrain unless its world collision has been switched off.
pub fn drive(
    time: Res<Time>,
    cfg: Res<VehicleConfig>,
    field: Res<Heightfield>,
    keys: Res<ButtonInput<KeyCode>>,
    players: Query<&Riding, With<Player>>,
    mut vehicles: Query<(&mut Transform, &PhysicsFlags), (With<Vehicle>, Without<Player>)>,
) {
    let Ok(riding) = players.single() else {
        return;
    };
    let Some(current) = riding.0 else {
        return;
    };
    let Ok((mut transform, flags)) = vehicles.get_mut(current) else {
        return;
    };
    if flags.frozen {
        return;
    }
    let dt = time.delta_secs();

    let mut throttle: f32 = 0.0;
    if keys.pressed(KeyCode::KeyW) {
        throttle += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        throttle -= 1.0;
    }
    let mut steer = 0.0;
    if keys.pressed(KeyCode::KeyA) {
        steer += 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        steer -= 1.0;
    }

    // Steering only bites while rolling, and flips with reverse
    if steer != 0.0 && throttle != 0.0 {
        transform.rotate_y(steer * cfg.steer_rate * throttle.signum() * dt);
    }
    if throttle != 0.0 {
        let forward = *transform.forward();
        transform.translation += forward * throttle * cfg.drive_speed * dt;
    }
    if flags.collide_world {
        let ground = field.height_at(transform.translation.x, transform.translation.z);
        transform.translation.y = ground + cfg.clearance;
    }
}

/// Keeps the (hidden) player attached to the buggy they occupy, so camera
/// anchoring, dismounting, and target resolution stay in one place.
pub fn ride_along(
    mut players: Query<(&mut Transform, &Riding), (With<Player>, Without<Vehicle>)>,
    vehicles: Query<&Transform, (With<Vehicle>, Without<Player>)>,
) {
    let Ok((mut transform, riding)) = players.single_mut() else {
        return;
    };
    let Some(current) = riding.0 else {
        return;
    };
    if let Ok(vehicle_tf) = vehicles.get(current) {
        transform.translation = vehicle_tf.translation;
    }
}
