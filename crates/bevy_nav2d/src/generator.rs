//! Utilities for generating navigation data at runtime.

use std::collections::VecDeque;

use bevy_app::prelude::*;
use bevy_asset::prelude::*;
use bevy_derive::{Deref, DerefMut};
use bevy_ecs::{prelude::*, system::SystemParam};
use bevy_transform::TransformSystem;
use nav2d::{Nav2dConfig, NavigationData};

use crate::{Nav2dAffectorBackend, Navmesh2d};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Nav2dQueue>();
    app.add_systems(
        PostUpdate,
        generate_queued_navmeshes.after(TransformSystem::TransformPropagate),
    );
}

/// System parameter for generating navigation data.
#[derive(SystemParam)]
pub struct Nav2dGenerator<'w> {
    #[system_param(
        validation_message = "Failed to find `Assets<Navmesh2d>`. Did you forget to add `Nav2dPlugin` to your app?"
    )]
    navmeshes: Res<'w, Assets<Navmesh2d>>,
    queue: ResMut<'w, Nav2dQueue>,
}

impl<'w> Nav2dGenerator<'w> {
    /// Queue a bake of all shapes provided by the current affector backend.
    /// The returned handle becomes available once the bake ran, which is at the end of the current frame
    /// at the latest. Calling it multiple times will queue multiple bakes that run in a FIFO order.
    pub fn generate(&mut self, config: Nav2dConfig) -> Handle<Navmesh2d> {
        let handle = self.navmeshes.reserve_handle();
        self.queue.push_back((handle.clone(), config));
        handle
    }

    /// The number of bakes that are queued but did not run yet.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[derive(Resource, Default, Deref, DerefMut)]
struct Nav2dQueue(VecDeque<(Handle<Navmesh2d>, Nav2dConfig)>);

fn generate_queued_navmeshes(world: &mut World) {
    let Some(mut queue) = world.get_resource_mut::<Nav2dQueue>() else {
        return;
    };
    if queue.is_empty() {
        return;
    }
    let queue = std::mem::take(&mut queue.0);

    let Some(backend) = world.get_resource::<Nav2dAffectorBackend>().cloned() else {
        tracing::error!(
            "Failed to generate {} queued navmeshes: no affector backend registered. Did you forget to add one?",
            queue.len()
        );
        return;
    };

    for (handle, config) in queue {
        let shapes = match world.run_system(*backend) {
            Ok(shapes) => shapes,
            Err(err) => {
                tracing::error!("Failed to generate navmesh: affector backend failed: {err}");
                continue;
            }
        };
        let navigation_data = NavigationData::bake(&shapes, &config);
        if let Err(err) = navigation_data.validate() {
            tracing::error!("Generated navmesh \"{}\" is invalid: {err}", navigation_data.name);
            continue;
        }
        tracing::debug!(
            "Generated navmesh \"{}\" from {} shapes with {} nodes",
            navigation_data.name,
            shapes.len(),
            navigation_data.nodes.len()
        );

        let Some(mut navmeshes) = world.get_resource_mut::<Assets<Navmesh2d>>() else {
            tracing::error!(
                "Failed to store generated navmesh: `Assets<Navmesh2d>` is missing. Did you forget to add `Nav2dPlugin` to your app?"
            );
            return;
        };
        navmeshes.insert(handle.id(), Navmesh2d::from(navigation_data));
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::system::SystemState;
    use glam::{Affine2, Vec2};
    use nav2d::{PointMapping, ShapeDescriptor};

    use super::*;

    fn world_with_backend() -> World {
        let mut world = World::new();
        world.init_resource::<Assets<Navmesh2d>>();
        world.init_resource::<Nav2dQueue>();
        let backend = world.register_system(square_backend);
        world.insert_resource(Nav2dAffectorBackend(backend));
        world
    }

    fn square_backend() -> Vec<ShapeDescriptor> {
        vec![ShapeDescriptor::rectangle(
            Affine2::from_translation(Vec2::new(2.0, 2.0)),
            [2.0, 2.0],
        )]
    }

    fn generate(world: &mut World, config: Nav2dConfig) -> Handle<Navmesh2d> {
        let mut state = SystemState::<Nav2dGenerator>::new(world);
        let mut generator = state.get_mut(world);
        let handle = generator.generate(config);
        state.apply(world);
        handle
    }

    #[test]
    fn generates_queued_navmesh() -> anyhow::Result<()> {
        let mut world = world_with_backend();
        let handle = generate(&mut world, Nav2dConfig::default());
        assert!(world.resource::<Assets<Navmesh2d>>().get(&handle).is_none());

        generate_queued_navmeshes(&mut world);

        let navmeshes = world.resource::<Assets<Navmesh2d>>();
        let navmesh = navmeshes
            .get(&handle)
            .ok_or_else(|| anyhow::anyhow!("navmesh was not generated"))?;
        navmesh.validate()?;
        assert_eq!(navmesh.nodes.len(), 1);
        assert_eq!(
            navmesh.map_point(Vec2::new(2.0, 2.0)),
            PointMapping::Blocked { node: 0 }
        );
        assert!(world.resource::<Nav2dQueue>().is_empty());
        Ok(())
    }

    #[test]
    fn generates_in_fifo_order() {
        let mut world = world_with_backend();
        let first = generate(
            &mut world,
            Nav2dConfig {
                name: "first".to_string(),
                ..Default::default()
            },
        );
        let second = generate(
            &mut world,
            Nav2dConfig {
                name: "second".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(world.resource::<Nav2dQueue>().len(), 2);

        generate_queued_navmeshes(&mut world);

        let navmeshes = world.resource::<Assets<Navmesh2d>>();
        let name = |handle: &Handle<Navmesh2d>| navmeshes.get(handle).map(|n| n.name.clone());
        assert_eq!(name(&first).as_deref(), Some("first"));
        assert_eq!(name(&second).as_deref(), Some("second"));
    }

    #[test]
    fn does_nothing_without_backend() {
        let mut world = World::new();
        world.init_resource::<Assets<Navmesh2d>>();
        world.init_resource::<Nav2dQueue>();
        let handle = generate(&mut world, Nav2dConfig::default());

        generate_queued_navmeshes(&mut world);

        assert!(world.resource::<Assets<Navmesh2d>>().get(&handle).is_none());
        assert!(world.resource::<Nav2dQueue>().is_empty());
    }
}
