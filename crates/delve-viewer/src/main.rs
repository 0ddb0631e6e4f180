//! Delve Viewer - Bevy-based visualization for dungeon generation
//!
//! Controls:
//!   WASD / arrows  pan the camera
//!   Q / E          raise and lower the camera
//!   Tab            toggle between cell and room wireframes
//!   Space          pause/resume the connection ticks
//!   R              regenerate with a fresh seed
//!   Ctrl+S / Ctrl+L  save / load the dungeon

use bevy::prelude::*;
use delve_core::engine::{DebugDraw, DrawMode, DungeonEngine, GenerationStatus};
use delve_core::generation::DungeonConfig;
use delve_core::tree::NodeId;
use delve_logic::aabb::{Aabb, Vec3 as DungeonVec3};

const TICK_INTERVAL_SECS: f32 = 0.5;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Delve - Dungeon Generation".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(DungeonWrapper(generate_dungeon(42)))
        .insert_resource(ViewerState::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                drive_generation,
                handle_input,
                camera_controls,
                render_dungeon,
                update_status_text,
            ),
        )
        .run();
}

#[derive(Resource)]
struct DungeonWrapper(DungeonEngine);

#[derive(Resource)]
struct ViewerState {
    mode: DrawMode,
    paused: bool,
    tick_timer: Timer,
    seed: u64,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            mode: DrawMode::Rooms,
            paused: false,
            tick_timer: Timer::from_seconds(TICK_INTERVAL_SECS, TimerMode::Repeating),
            seed: 42,
        }
    }
}

#[derive(Component)]
struct StatusText;

fn generate_dungeon(seed: u64) -> DungeonEngine {
    let volume = Aabb::new(DungeonVec3::ZERO, DungeonVec3::new(80.0, 10.0, 80.0));
    DungeonEngine::generate(volume, seed, DungeonConfig::default())
        .expect("standard volume is generatable")
}

fn setup(mut commands: Commands, dungeon: Res<DungeonWrapper>) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(40.0, 90.0, 130.0).looking_at(Vec3::new(40.0, 0.0, 40.0), Vec3::Y),
    ));

    commands.spawn((
        Text::new("generating..."),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        StatusText,
    ));

    info!(
        "Generated dungeon: seed {}, {} rooms",
        dungeon.0.seed(),
        dungeon.0.rooms().len()
    );
}

fn drive_generation(
    time: Res<Time>,
    mut state: ResMut<ViewerState>,
    mut dungeon: ResMut<DungeonWrapper>,
) {
    if state.paused || dungeon.0.is_complete() {
        return;
    }
    state.tick_timer.tick(time.delta());
    // One tick per interval so each connection level is visible.
    if state.tick_timer.just_finished()
        && dungeon.0.tick() == GenerationStatus::Complete
        && !dungeon.0.is_fully_connected()
    {
        warn!("generation settled with unconnected partitions");
    }
}

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<ViewerState>,
    mut dungeon: ResMut<DungeonWrapper>,
) {
    if keyboard.just_pressed(KeyCode::Tab) {
        state.mode = match state.mode {
            DrawMode::Cells => DrawMode::Rooms,
            DrawMode::Rooms => DrawMode::Cells,
        };
    }

    if keyboard.just_pressed(KeyCode::Space) {
        state.paused = !state.paused;
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        state.seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64)
            .unwrap_or(0);
        dungeon.0 = generate_dungeon(state.seed);
        info!("Regenerated with seed {}", state.seed);
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    if ctrl && keyboard.just_pressed(KeyCode::KeyS) {
        match std::fs::File::create("dungeon.bin") {
            Ok(file) => match dungeon.0.save(std::io::BufWriter::new(file)) {
                Ok(()) => info!("Saved dungeon to dungeon.bin"),
                Err(e) => error!("Failed to save: {}", e),
            },
            Err(e) => error!("Failed to create save file: {}", e),
        }
    }

    if ctrl && keyboard.just_pressed(KeyCode::KeyL) {
        match std::fs::File::open("dungeon.bin") {
            Ok(file) => match DungeonEngine::load(std::io::BufReader::new(file)) {
                Ok(loaded) => {
                    state.seed = loaded.seed();
                    dungeon.0 = loaded;
                    info!("Loaded dungeon from dungeon.bin");
                }
                Err(e) => error!("Failed to load: {}", e),
            },
            Err(e) => error!("Failed to open save file: {}", e),
        }
    }
}

fn camera_controls(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
) {
    let Ok(mut transform) = camera_query.get_single_mut() else {
        return;
    };
    let speed = 40.0 * time.delta_secs();

    let mut delta = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        delta.z -= speed;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        delta.z += speed;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        delta.x -= speed;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        delta.x += speed;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        delta.y += speed;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        delta.y -= speed;
    }
    transform.translation += delta;
}

/// Feeds engine volumes into gizmo wireframes, one stable color per node.
struct GizmoSink<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
}

impl DebugDraw for GizmoSink<'_, '_, '_> {
    fn draw_volume(&mut self, node: NodeId, volume: &Aabb) {
        self.gizmos
            .cuboid(volume_transform(volume), node_color(node));
    }
}

fn volume_transform(volume: &Aabb) -> Transform {
    let center = volume.center();
    let size = volume.size();
    Transform::from_translation(Vec3::new(center.x, center.y, center.z))
        .with_scale(Vec3::new(size.x, size.y, size.z))
}

/// Golden-ratio hue walk keyed by node index, so colors stay stable across
/// frames and regenerations of the same tree shape.
fn node_color(node: NodeId) -> Color {
    let hue = (node.index() as f32 * 137.507_8) % 360.0;
    Color::hsv(hue, 0.8, 0.9)
}

fn render_dungeon(state: Res<ViewerState>, dungeon: Res<DungeonWrapper>, mut gizmos: Gizmos) {
    let mut sink = GizmoSink {
        gizmos: &mut gizmos,
    };
    dungeon.0.draw_volumes(state.mode, &mut sink);

    for hallway in dungeon.0.hallways() {
        gizmos.cuboid(volume_transform(&hallway), Color::srgb(0.9, 0.9, 0.9));
    }
}

fn update_status_text(
    state: Res<ViewerState>,
    dungeon: Res<DungeonWrapper>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let Ok(mut text) = query.get_single_mut() else {
        return;
    };
    let phase = if !dungeon.0.is_complete() {
        if state.paused {
            "paused"
        } else {
            "connecting"
        }
    } else if dungeon.0.is_fully_connected() {
        "complete"
    } else {
        "settled (unconnected)"
    };
    let mode = match state.mode {
        DrawMode::Cells => "cells",
        DrawMode::Rooms => "rooms",
    };
    text.0 = format!(
        "seed {} | {} rooms, {} hallways | tick {} | {} | showing {}",
        dungeon.0.seed(),
        dungeon.0.rooms().len(),
        dungeon.0.hallways().len(),
        dungeon.0.ticks(),
        phase,
        mode,
    );
}
