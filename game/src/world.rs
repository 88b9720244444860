//! World systems
//!
//! Spawning the movement sandbox: flat ground, ramps on both sides of the
//! walkable-angle limit, obstacles, and lighting.

use bevy::light::{light_consts::lux, CascadeShadowConfigBuilder};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Collision group for everything the ground probe may hit.
pub const GROUND_GROUP: Group = Group::GROUP_1;

/// Collision group for the player body itself.
pub const PLAYER_GROUP: Group = Group::GROUP_2;

/// Marker for static world geometry.
#[derive(Component)]
pub struct WorldGeometry;

/// Spawn the sandbox geometry and lights.
pub fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.45, 0.35),
        perceptual_roughness: 0.9,
        ..default()
    });
    let ramp_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.5, 0.4),
        perceptual_roughness: 0.8,
        ..default()
    });
    let block_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.4, 0.4, 0.55),
        perceptual_roughness: 0.7,
        ..default()
    });

    // --- Ground slab ---
    commands.spawn((
        WorldGeometry,
        Mesh3d(meshes.add(Cuboid::new(120.0, 1.0, 120.0))),
        MeshMaterial3d(ground_material),
        Transform::from_xyz(0.0, -0.5, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(60.0, 0.5, 60.0),
        CollisionGroups::new(GROUND_GROUP, Group::ALL),
    ));

    // --- Ramps ---
    // One below the default 45 degree walkable limit, one past it.
    spawn_ramp(
        &mut commands,
        &mut meshes,
        ramp_material.clone(),
        Vec3::new(10.0, 1.5, -8.0),
        25.0,
    );
    spawn_ramp(
        &mut commands,
        &mut meshes,
        ramp_material,
        Vec3::new(-10.0, 2.5, -8.0),
        60.0,
    );

    // --- Obstacles ---
    for (x, z) in [(4.0, 6.0), (-5.0, 9.0), (0.0, 14.0)] {
        commands.spawn((
            WorldGeometry,
            Mesh3d(meshes.add(Cuboid::new(2.0, 2.0, 2.0))),
            MeshMaterial3d(block_material.clone()),
            Transform::from_xyz(x, 1.0, z),
            RigidBody::Fixed,
            Collider::cuboid(1.0, 1.0, 1.0),
            CollisionGroups::new(GROUND_GROUP, Group::ALL),
        ));
    }

    // --- Sun ---
    commands.spawn((
        DirectionalLight {
            illuminance: lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        CascadeShadowConfigBuilder {
            num_cascades: 3,
            maximum_distance: 120.0,
            first_cascade_far_bound: 12.0,
            ..default()
        }
        .build(),
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.85, 0.87, 0.95),
        brightness: 120.0,
        affects_lightmapped_meshes: true,
    });
}

fn spawn_ramp(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    angle_deg: f32,
) {
    commands.spawn((
        WorldGeometry,
        Mesh3d(meshes.add(Cuboid::new(8.0, 0.4, 12.0))),
        MeshMaterial3d(material),
        Transform::from_translation(position)
            .with_rotation(Quat::from_rotation_x(angle_deg.to_radians())),
        RigidBody::Fixed,
        Collider::cuboid(4.0, 0.2, 6.0),
        CollisionGroups::new(GROUND_GROUP, Group::ALL),
    ));
}
