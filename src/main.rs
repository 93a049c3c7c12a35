//! Walkable demo dungeon.
//!
//! W/S step, A/D strafe, Q/E turn; hold the right mouse button to look around.
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use gridstep::{
    init_logging, GridLayout, GridMovementPlugin, GridMovementSettings, GridMover,
    MovementValidator,
};
use log::info;

const DEMO_LAYOUT: &str = "
#########
#.......#
#.##.##.#
#.#...#.#
#...#...#
#.#...#.#
#.##.##.#
#...S...#
#########
";

/// Camera height above the floor, as a fraction of the cell size.
const EYE_HEIGHT: f32 = 0.5;

/// Grid stepping demo
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// ASCII layout file (`#` wall, `.` floor, `S` start)
    #[arg(short, long)]
    layout: Option<PathBuf>,
}

#[derive(Resource)]
struct Dungeon(GridLayout);

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = match &args.config {
        Some(path) => GridMovementSettings::load(path)
            .with_context(|| format!("load settings from {}", path.display()))?,
        None => GridMovementSettings::default(),
    };
    let layout_text = match &args.layout {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read layout {}", path.display()))?,
        None => DEMO_LAYOUT.to_owned(),
    };
    let layout = GridLayout::parse(&layout_text, settings.grid_size).context("parse layout")?;
    info!(
        "dungeon has {} floor cells, starting at {}",
        layout.floors().count(),
        layout.start_cell()
    );

    App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .insert_resource(settings)
        .insert_resource(MovementValidator::new(layout.clone()))
        .insert_resource(Dungeon(layout))
        .add_plugins(GridMovementPlugin)
        .add_systems(Startup, spawn_dungeon)
        .run();

    Ok(())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn spawn_dungeon(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    dungeon: Res<Dungeon>,
) {
    let layout = &dungeon.0;
    let size = layout.grid_size();

    let wall_mesh = meshes.add(Cuboid::new(size, size, size));
    let wall_material = materials.add(Color::srgb(0.45, 0.42, 0.38));
    for cell in layout.walls() {
        commands.spawn((
            Mesh3d(wall_mesh.clone()),
            MeshMaterial3d(wall_material.clone()),
            Transform::from_translation(layout.cell_centre(cell) + Vec3::Y * size * 0.5),
        ));
    }

    let floor_mesh = meshes.add(Cuboid::new(size, 0.1, size));
    let floor_material = materials.add(Color::srgb(0.2, 0.2, 0.22));
    for cell in layout.floors() {
        commands.spawn((
            Mesh3d(floor_mesh.clone()),
            MeshMaterial3d(floor_material.clone()),
            Transform::from_translation(layout.cell_centre(cell) - Vec3::Y * 0.05),
        ));
    }

    let eye = layout.cell_centre(layout.start_cell()) + Vec3::Y * size * EYE_HEIGHT;
    let transform = Transform::from_translation(eye);
    commands.spawn((
        Camera3d::default(),
        transform,
        GridMover::from(&transform),
        PointLight {
            range: size * 4.0,
            ..default()
        },
        Name::new("Player"),
    ));
}
