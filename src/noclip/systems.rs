//! ECS adapters for the flight controller.
//!
//! Each service seam gets a `SystemParam` implementing its trait over the
//! relevant queries, and the driver systems below hand those adapters to the
//! controller once per frame.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::ecs::system::SystemParam;
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::render::view::Hdr;

use super::NoClipConfig;
use super::controller::NoClipController;
use super::entities::{FlightCamera, KeyBindings};
use super::services::{
    Action, CameraRig, GroundProbe, InputSource, Target, TargetGateway, TargetKind,
};
use crate::math;
use crate::player::{PhysicsFlags, Player, PlayerCamera, Riding};
use crate::vehicle::Vehicle;
use crate::world::Heightfield;

// ── service adapters ────────────────────────────────────────────────

/// Held-key lookup through the rebindable key table.
struct Keys<'a> {
    input: &'a ButtonInput<KeyCode>,
    bindings: &'a KeyBindings,
}

impl InputSource for Keys<'_> {
    fn held(&self, action: Action) -> bool {
        self.input.pressed(self.bindings.key(action))
    }
}

/// Camera service: spawns a dedicated flight camera where the first-person
/// camera was looking, parking the latter until release.
#[derive(SystemParam)]
pub struct RigPort<'w, 's> {
    commands: Commands<'w, 's>,
    main: Query<
        'w,
        's,
        (&'static mut Camera, &'static GlobalTransform),
        (With<PlayerCamera>, Without<FlightCamera>),
    >,
    flight: Query<'w, 's, &'static Transform, With<FlightCamera>>,
}

impl CameraRig for RigPort<'_, '_> {
    fn acquire(&mut self) -> Option<Entity> {
        // No first-person camera to take over from means no flight session.
        let (mut main_cam, anchor) = self.main.single_mut().ok()?;
        main_cam.is_active = false;
        let camera = self
            .commands
            .spawn((
                Name::new("FlightCamera"),
                FlightCamera,
                Camera3d::default(),
                Hdr,
                Tonemapping::TonyMcMapface,
                anchor.compute_transform(),
            ))
            .id();
        Some(camera)
    }

    fn release(&mut self, camera: Entity) {
        self.commands.entity(camera).despawn();
        if let Ok((mut main_cam, _)) = self.main.single_mut() {
            main_cam.is_active = true;
        }
    }

    fn forward(&self, camera: Entity) -> Option<Vec3> {
        let transform = self.flight.get(camera).ok()?;
        Some(*transform.forward())
    }
}

/// Entity service over the player and vehicle queries.
#[derive(SystemParam)]
pub struct GatewayPort<'w, 's> {
    player: Query<
        'w,
        's,
        (
            Entity,
            &'static mut Transform,
            &'static mut PhysicsFlags,
            &'static Riding,
        ),
        (With<Player>, Without<Vehicle>, Without<FlightCamera>),
    >,
    vehicle: Query<
        'w,
        's,
        (&'static mut Transform, &'static mut PhysicsFlags),
        (With<Vehicle>, Without<Player>, Without<FlightCamera>),
    >,
}

impl TargetGateway for GatewayPort<'_, '_> {
    fn resolve(&self) -> Option<Target> {
        let (player, _, _, riding) = self.player.single().ok()?;
        match riding.0 {
            Some(vehicle) if self.vehicle.contains(vehicle) => Some(Target {
                entity: vehicle,
                kind: TargetKind::Vehicle,
            }),
            _ => Some(Target {
                entity: player,
                kind: TargetKind::Player,
            }),
        }
    }

    fn position(&self, target: Target) -> Option<Vec3> {
        match target.kind {
            TargetKind::Player => {
                let (_, transform, _, _) = self.player.get(target.entity).ok()?;
                Some(transform.translation)
            }
            TargetKind::Vehicle => {
                let (transform, _) = self.vehicle.get(target.entity).ok()?;
                Some(transform.translation)
            }
        }
    }

    fn set_position(&mut self, target: Target, position: Vec3) {
        match target.kind {
            TargetKind::Player => {
                if let Ok((_, mut transform, _, _)) = self.player.get_mut(target.entity) {
                    transform.translation = position;
                }
            }
            TargetKind::Vehicle => {
                if let Ok((mut transform, _)) = self.vehicle.get_mut(target.entity) {
                    transform.translation = position;
                }
            }
        }
    }

    fn set_frozen(&mut self, target: Target, frozen: bool) {
        match target.kind {
            TargetKind::Player => {
                if let Ok((_, _, mut flags, _)) = self.player.get_mut(target.entity) {
                    flags.frozen = frozen;
                }
            }
            TargetKind::Vehicle => {
                if let Ok((_, mut flags)) = self.vehicle.get_mut(target.entity) {
                    flags.frozen = frozen;
                }
            }
        }
    }

    fn set_collision(&mut self, target: Target, world: bool, entities: bool) {
        match target.kind {
            TargetKind::Player => {
                if let Ok((_, _, mut flags, _)) = self.player.get_mut(target.entity) {
                    flags.collide_world = world;
                    flags.collide_entities = entities;
                }
            }
            TargetKind::Vehicle => {
                if let Ok((_, mut flags)) = self.vehicle.get_mut(target.entity) {
                    flags.collide_world = world;
                    flags.collide_entities = entities;
                }
            }
        }
    }
}

/// Terrain lookup for the end-of-flight ground snap.
#[derive(SystemParam)]
pub struct GroundPort<'w> {
    field: Res<'w, Heightfield>,
}

impl GroundProbe for GroundPort<'_> {
    fn ground_height(&self, x: f32, z: f32, _y_hint: f32) -> f32 {
        self.field.height_at(x, z)
    }
}

/// Everything the controller needs from the ECS, bundled for the drivers.
#[derive(SystemParam)]
pub struct ControllerPort<'w, 's> {
    keys: Res<'w, ButtonInput<KeyCode>>,
    bindings: Res<'w, KeyBindings>,
    time: Res<'w, Time>,
    rig: RigPort<'w, 's>,
    gateway: GatewayPort<'w, 's>,
    ground: GroundPort<'w>,
}

// ── driver systems ──────────────────────────────────────────────────

/// Runs the occupancy guard, then flips flight on the toggle key's down-edge.
pub fn toggle(mut controller: ResMut<NoClipController>, mut port: ControllerPort) {
    controller.guard_target(&mut port.rig, &mut port.gateway, &port.ground);
    if port.keys.just_pressed(port.bindings.key(Action::Toggle)) {
        controller.toggle(&mut port.rig, &mut port.gateway, &port.ground);
    }
}

/// Per-frame movement step, throttled by the controller's tick interval.
pub fn tick(mut controller: ResMut<NoClipController>, mut port: ControllerPort) {
    let now_ms = port.time.elapsed().as_millis() as u64;
    if !controller.should_tick(now_ms) {
        return;
    }
    let input = Keys {
        input: &port.keys,
        bindings: &port.bindings,
    };
    controller.tick(&input, &port.rig, &mut port.gateway, now_ms);
}

/// Mouse look for the flight camera, pitch-clamped like the walking camera.
pub fn aim(
    controller: Res<NoClipController>,
    cfg: Res<NoClipConfig>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut query: Query<&mut Transform, With<FlightCamera>>,
) {
    if !controller.is_active() {
        // Drain events so they don't accumulate while flight is off.
        for _ in mouse_motion.read() {}
        return;
    }
    let Ok(mut transform) = query.single_mut() else {
        for _ in mouse_motion.read() {}
        return;
    };

    let mut yaw = 0.0;
    let mut pitch = 0.0;
    for ev in mouse_motion.read() {
        yaw -= ev.delta.x * cfg.mouse_sensitivity_x;
        pitch -= ev.delta.y * cfg.mouse_sensitivity_y;
    }
    if yaw != 0.0 {
        transform.rotate_y(yaw);
    }
    if pitch != 0.0 {
        let (_, current_pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
        let pitch_delta = math::clamp_pitch(current_pitch, pitch, cfg.pitch_margin);
        transform.rotate_local_x(pitch_delta);
    }
}

/// Keeps the flight camera riding just above whatever is being flown.
pub fn follow(
    controller: Res<NoClipController>,
    cfg: Res<NoClipConfig>,
    anchors: Query<&Transform, Without<FlightCamera>>,
    mut flight: Query<&mut Transform, With<FlightCamera>>,
) {
    let Some(target) = controller.target() else {
        return;
    };
    let Ok(anchor) = anchors.get(target.entity) else {
        return;
    };
    let Ok(mut transform) = flight.single_mut() else {
        return;
    };
    transform.translation = anchor.translation + Vec3::Y * cfg.camera_height;
}
