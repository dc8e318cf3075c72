//! Avian 2D backend for `bevy_nav2d`. Bakes navigation data from the colliders of your physics world.

use avian2d::prelude::*;
use bevy::{ecs::entity_disabling::Disabled, prelude::*};
use bevy_nav2d::{Nav2dAffector, Nav2dApp as _};
use nav2d::ShapeDescriptor;

mod collider_to_shape;
pub use collider_to_shape::{ToShapeDescriptors, affine2_from_global_transform};

pub use bevy_nav2d;

/// Everything you need to get started with the Avian 2D navigation backend.
pub mod prelude {
    pub use crate::{AvianNav2dAffectorSettings, AvianNav2dPlugin, ToShapeDescriptors as _};
}

/// The plugin of the crate. Will make all entities with both [`Collider`] and [`Nav2dAffector`] available for navigation baking.
#[derive(Debug, Default)]
pub struct AvianNav2dPlugin {
    /// Settings for when [`Nav2dAffector`] is inserted automatically.
    pub affector_settings: AvianNav2dAffectorSettings,
}

/// The settings for when [`Nav2dAffector`] is inserted automatically.
#[derive(Debug, Default)]
pub enum AvianNav2dAffectorSettings {
    /// All entities with [`Collider`] belonging to a static [`RigidBody`] will have [`Nav2dAffector`] inserted automatically.
    #[default]
    Static,
    /// [`Nav2dAffector`] will not be inserted automatically. The user must manually insert it.
    Manual,
}

impl Plugin for AvianNav2dPlugin {
    fn build(&self, app: &mut App) {
        app.set_nav2d_affector_backend(collider_backend);
        match self.affector_settings {
            AvianNav2dAffectorSettings::Static => {
                app.add_observer(insert_nav2d_affector_to_static_bodies);
            }
            AvianNav2dAffectorSettings::Manual => {}
        }
    }
}

fn insert_nav2d_affector_to_static_bodies(
    trigger: Trigger<OnAdd, ColliderOf>,
    mut commands: Commands,
    collider_of: Query<&ColliderOf, Or<(With<Disabled>, Without<Disabled>)>>,
    bodies: Query<&RigidBody>,
) {
    let entity = trigger.target();
    let Ok(collider_of) = collider_of.get(entity) else {
        return;
    };

    let Ok(body) = bodies.get(collider_of.body) else {
        return;
    };

    if !body.is_static() {
        return;
    }

    commands.entity(entity).insert(Nav2dAffector);
}

fn collider_backend(
    colliders: Query<(&GlobalTransform, &Collider), With<Nav2dAffector>>,
) -> Vec<ShapeDescriptor> {
    colliders
        .iter()
        .flat_map(|(transform, collider)| {
            collider.to_shape_descriptors(affine2_from_global_transform(transform))
        })
        .collect::<Vec<_>>()
}
