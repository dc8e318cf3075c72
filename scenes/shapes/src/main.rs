//! A test scene that only uses primitive 2D shapes.

use avian_nav2d::prelude::*;
use avian2d::prelude::*;
use bevy::{color::palettes::tailwind, prelude::*};
use bevy_nav2d::{nav2d::Nav2dConfigBuilder, prelude::*};

fn main() -> AppExit {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PhysicsPlugins::default().with_length_unit(50.0))
        .add_plugins((
            Nav2dPlugin::default(),
            Nav2dDebugPlugin::default(),
            AvianNav2dPlugin::default(),
        ))
        .add_systems(Startup, (setup, generate_navmesh).chain())
        .add_systems(Update, log_probes)
        .run()
}

#[derive(Resource)]
struct SceneNavmesh(Handle<Navmesh2d>);

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);

    let gray = Color::from(tailwind::GRAY_400);
    let red = Color::from(tailwind::RED_500);
    let blue = Color::from(tailwind::BLUE_500);

    commands.spawn((
        Name::new("Ground"),
        RigidBody::Static,
        Collider::rectangle(1000.0, 40.0),
        Sprite::from_color(gray, Vec2::new(1000.0, 40.0)),
        Transform::from_xyz(0.0, -220.0, 0.0),
    ));
    commands.spawn((
        Name::new("Crate"),
        RigidBody::Static,
        Collider::rectangle(80.0, 80.0),
        Sprite::from_color(red, Vec2::new(80.0, 80.0)),
        Transform::from_xyz(-200.0, -160.0, 0.0).with_rotation(Quat::from_rotation_z(0.3)),
    ));
    commands.spawn((
        Name::new("Rock"),
        RigidBody::Static,
        Collider::circle(50.0),
        Transform::from_xyz(250.0, -150.0, 0.0),
    ));
    commands.spawn((
        Name::new("Ramp"),
        RigidBody::Static,
        Collider::triangle(
            Vec2::new(-100.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 80.0),
        ),
        Transform::from_xyz(0.0, -200.0, 0.0),
    ));

    // A hollow platform: the window is a hole, the block inside it is solid again.
    commands.spawn((
        Name::new("Platform"),
        RigidBody::Static,
        Collider::rectangle(300.0, 120.0),
        Sprite::from_color(blue, Vec2::new(300.0, 120.0)),
        Transform::from_xyz(0.0, 120.0, -1.0),
    ));
    commands.spawn((
        Name::new("Window"),
        RigidBody::Static,
        Collider::rectangle(200.0, 60.0),
        Transform::from_xyz(0.0, 120.0, 0.0),
    ));
    commands.spawn((
        Name::new("Block"),
        RigidBody::Static,
        Collider::rectangle(40.0, 40.0),
        Sprite::from_color(red, Vec2::new(40.0, 40.0)),
        Transform::from_xyz(0.0, 120.0, 1.0),
    ));

    commands.spawn((
        Name::new("Rail"),
        RigidBody::Static,
        Collider::segment(Vec2::new(-150.0, 0.0), Vec2::new(150.0, 0.0)),
        Transform::from_xyz(0.0, 260.0, 0.0),
    ));
}

fn generate_navmesh(mut commands: Commands, mut generator: Nav2dGenerator) -> Result {
    let config = Nav2dConfigBuilder {
        name: "shapes".to_string(),
        map_point_max_deviation: 30.0,
        map_point_instant_accept_deviation: 0.5,
        enforce_winding: true,
        ..default()
    }
    .build()?;
    let handle = generator.generate(config);
    commands.spawn((Name::new("Navmesh"), DebugNavmesh2d(handle.clone())));
    commands.insert_resource(SceneNavmesh(handle));
    Ok(())
}

fn log_probes(
    scene_navmesh: Res<SceneNavmesh>,
    navmeshes: Res<Assets<Navmesh2d>>,
    mut logged: Local<bool>,
) {
    if *logged {
        return;
    }
    let Some(navmesh) = navmeshes.get(&scene_navmesh.0) else {
        return;
    };
    *logged = true;

    for warning in &navmesh.warnings {
        warn!("{warning}");
    }
    let probes = [
        Vec2::new(-400.0, -190.0),
        Vec2::new(0.0, 120.0),
        Vec2::new(60.0, 120.0),
        Vec2::new(0.0, 300.0),
        Vec2::new(250.0, -90.0),
    ];
    for probe in probes {
        match navmesh.try_map_point(probe) {
            Some(mapped) => info!("Probe {probe} maps to {mapped}"),
            None => info!("Probe {probe} is blocked or too far away from any surface"),
        }
    }
}
