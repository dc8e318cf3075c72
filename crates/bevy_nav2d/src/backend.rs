//! The backend decides which geometry ends up in a bake.
//!
//! A backend is a system that returns [`ShapeDescriptor`]s with their transform already
//! resolved to world space. Every call to [`Nav2dGenerator::generate`](crate::generator::Nav2dGenerator::generate)
//! runs it once, right before baking. Shapes the bake cannot use, such as
//! [`ShapeKind::Edge`](nav2d::ShapeKind::Edge), may still be returned: they are skipped and
//! show up in [`NavigationData::warnings`](nav2d::NavigationData::warnings).

use bevy_app::prelude::*;
use bevy_derive::{Deref, DerefMut};
use bevy_ecs::{prelude::*, system::SystemId};
use nav2d::ShapeDescriptor;

/// The shape-collecting system registered through [`Nav2dApp::set_nav2d_affector_backend`].
#[derive(Resource, Clone, Deref, DerefMut)]
pub struct Nav2dAffectorBackend(pub SystemId<(), Vec<ShapeDescriptor>>);

/// Adds [`Nav2dApp::set_nav2d_affector_backend`] to [`App`].
pub trait Nav2dApp {
    /// Registers `system` as the source of world-space shapes for every bake.
    ///
    /// There is exactly one backend per app; a later call replaces the earlier one.
    /// Without a backend, queued bakes are dropped with an error.
    fn set_nav2d_affector_backend<M>(
        &mut self,
        system: impl IntoSystem<(), Vec<ShapeDescriptor>, M> + 'static,
    ) -> &mut App;
}

impl Nav2dApp for App {
    fn set_nav2d_affector_backend<M>(
        &mut self,
        system: impl IntoSystem<(), Vec<ShapeDescriptor>, M> + 'static,
    ) -> &mut App {
        let id = self.register_system(system);
        self.world_mut().insert_resource(Nav2dAffectorBackend(id));
        self
    }
}

#[cfg(test)]
mod tests {
    use glam::Affine2;

    use super::*;

    fn circle_backend() -> Vec<ShapeDescriptor> {
        vec![ShapeDescriptor::circle(Affine2::IDENTITY, 1.0)]
    }

    fn empty_backend() -> Vec<ShapeDescriptor> {
        Vec::new()
    }

    #[test]
    fn later_backend_replaces_earlier_one() {
        let mut app = App::new();
        app.set_nav2d_affector_backend(circle_backend);
        app.set_nav2d_affector_backend(empty_backend);

        let backend = app.world().resource::<Nav2dAffectorBackend>().clone();
        let Ok(shapes) = app.world_mut().run_system(*backend) else {
            panic!("registered backend failed to run");
        };
        assert!(shapes.is_empty());
    }
}
