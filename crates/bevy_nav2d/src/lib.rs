#![doc = include_str!("../../../readme.md")]

use bevy_app::prelude::*;
use bevy_asset::prelude::*;
use bevy_derive::Deref;
use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;

mod backend;
#[cfg(feature = "debug_plugin")]
pub mod debug;
pub mod generator;
pub use backend::*;

pub use nav2d;
use nav2d::NavigationData;

/// Everything you need to get started with the 2D navigation plugins.
pub mod prelude {
    #[cfg(feature = "debug_plugin")]
    pub use crate::debug::{DebugNavmesh2d, Nav2dDebugPlugin};
    pub use crate::{
        Nav2dAffector, Nav2dApp as _, Nav2dPlugin, Navmesh2d, generator::Nav2dGenerator,
    };
}

/// The main plugin of the crate. Adds functionality for creating and managing 2D navigation data.
#[non_exhaustive]
#[derive(Default)]
pub struct Nav2dPlugin;

impl Plugin for Nav2dPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<Navmesh2d>();
        app.register_type::<Nav2dAffector>();
        app.add_plugins(generator::plugin);
    }
}

/// Asset containing baked 2D navigation data.
/// Create this using [`Nav2dGenerator`](generator::Nav2dGenerator).
///
/// Dereferences to [`NavigationData`], so all queries are available directly on the asset.
/// The data is read-only: nodes must stay sorted for the queries to work, so a changed level
/// is baked into a new asset instead of being edited in place.
#[derive(Debug, Default, Clone, PartialEq, Asset, Reflect, Deref)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Navmesh2d(NavigationData);

impl Navmesh2d {
    /// Consumes the asset and returns the contained navigation data.
    pub fn into_inner(self) -> NavigationData {
        self.0
    }
}

impl From<NavigationData> for Navmesh2d {
    fn from(navigation_data: NavigationData) -> Self {
        Self(navigation_data)
    }
}

/// Marks an entity whose geometry should be handed to the bake by the registered backend.
/// What geometry that is depends on the backend, see [`Nav2dApp::set_nav2d_affector_backend`].
#[derive(Debug, Default, Clone, Copy, Component, Reflect)]
#[reflect(Component, Default)]
pub struct Nav2dAffector;

#[cfg(test)]
mod tests {
    use glam::{Affine2, Vec2};
    use nav2d::{Nav2dConfig, PointMapping, ShapeDescriptor};

    use super::*;

    #[test]
    fn asset_exposes_queries_of_baked_data() {
        let shapes = [ShapeDescriptor::rectangle(Affine2::IDENTITY, [1.0, 1.0])];
        let navigation_data = NavigationData::bake(&shapes, &Nav2dConfig::default());
        let navmesh = Navmesh2d::from(navigation_data.clone());

        assert_eq!(navmesh.nodes.len(), 1);
        assert_eq!(navmesh.map_point(Vec2::ZERO), PointMapping::Blocked { node: 0 });
        assert_eq!(navmesh.into_inner(), navigation_data);
    }
}
