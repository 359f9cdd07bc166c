//! Binary entry point: window setup, plugin assembly, and CLI flags.

use bevy::app::AppExit;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy::window::{CursorGrabMode, CursorOptions};
use bevy_inspector_egui::quick::WorldInspectorPlugin;
#[cfg(feature = "native")]
use clap::Parser;

use noclip_sandbox::{GameState, noclip, player, vehicle, world};

/// Command-line options (native builds only).
#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(about = "Free-flight sandbox: walk, drive, or noclip through a heightfield")]
struct Args {
    /// Seed for the terrain elevation noise.
    #[arg(long)]
    seed: Option<u32>,
    /// Side length of the terrain patch in world units.
    #[arg(long)]
    size: Option<f32>,
    /// Generate a flat slab instead of rolling hills.
    #[arg(long)]
    flat: bool,
}

fn main() {
    let mut world_cfg = world::WorldConfig::default();

    #[cfg(feature = "native")]
    {
        let args = Args::parse();
        if let Some(seed) = args.seed {
            world_cfg.seed = seed;
        }
        if let Some(size) = args.size {
            world_cfg.size = size;
        }
        if args.flat {
            world_cfg.flat = true;
        }
    }

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "NoClip Sandbox".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(world::WorldPlugin(world_cfg))
    .add_plugins(player::PlayerPlugin(player::PlayerConfig::default()))
    .add_plugins(vehicle::VehiclePlugin(vehicle::VehicleConfig::default()))
    .add_plugins(noclip::NoClipPlugin(noclip::NoClipConfig::default()))
    .add_systems(Startup, grab_cursor)
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Debugging)));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

fn grab_cursor(mut q: Query<&mut CursorOptions>) {
    for mut opts in &mut q {
        opts.visible = false;
        opts.grab_mode = CursorGrabMode::Locked;
    }
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
    mut cursors: Query<&mut CursorOptions>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            GameState::Running => GameState::Debugging,
            GameState::Debugging => GameState::Running,
        };
        let entering_debug = new_state == GameState::Debugging;
        next.set(new_state);
        for mut opts in &mut cursors {
            if entering_debug {
                opts.visible = true;
                opts.grab_mode = CursorGrabMode::None;
            } else {
                opts.visible = false;
                opts.grab_mode = CursorGrabMode::Locked;
            }
        }
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
