//! Gizmo drawing of [`Navmesh2d`] assets.

use bevy_app::prelude::*;
use bevy_asset::prelude::*;
use bevy_color::Color;
use bevy_derive::{Deref, DerefMut};
use bevy_ecs::prelude::*;
use bevy_gizmos::prelude::*;
use bevy_reflect::prelude::*;
use nav2d::NavNode;

use crate::Navmesh2d;

/// Draws all navigation data referenced by a [`DebugNavmesh2d`] using gizmos.
/// Requires the gizmo plugin, which is part of Bevy's default plugins.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Nav2dDebugPlugin;

impl Plugin for Nav2dDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Nav2dGizmoConfig>();
        app.register_type::<DebugNavmesh2d>();
        app.register_type::<Nav2dGizmoConfig>();
        app.add_systems(
            Update,
            draw_debug_navmeshes.run_if(|config: Res<Nav2dGizmoConfig>| config.enabled),
        );
    }
}

/// Component that requests the referenced navigation data to be drawn.
#[derive(Debug, Clone, Component, Deref, DerefMut, Reflect)]
#[reflect(Component)]
pub struct DebugNavmesh2d(pub Handle<Navmesh2d>);

/// Controls how [`Nav2dDebugPlugin`] draws navigation data.
#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct Nav2dGizmoConfig {
    /// Whether anything is drawn at all.
    pub enabled: bool,
    /// The radius of the circle drawn at each vertex. Set to 0 to hide vertices.
    pub vertex_radius: f32,
}

impl Default for Nav2dGizmoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            vertex_radius: 0.1,
        }
    }
}

fn draw_debug_navmeshes(
    mut gizmos: Gizmos,
    config: Res<Nav2dGizmoConfig>,
    debug_navmeshes: Query<&DebugNavmesh2d>,
    navmeshes: Res<Assets<Navmesh2d>>,
) {
    for debug_navmesh in &debug_navmeshes {
        let Some(navmesh) = navmeshes.get(&debug_navmesh.0) else {
            continue;
        };
        for (index, node) in navmesh.nodes.iter().enumerate() {
            draw_node(&mut gizmos, node, node_color(index, node), config.vertex_radius);
        }
    }
}

fn draw_node(gizmos: &mut Gizmos, node: &NavNode, color: Color, vertex_radius: f32) {
    let points = node.vertices.iter().map(|vertex| vertex.point);
    let closing = node
        .vertices
        .first()
        .filter(|_| node.is_closed)
        .map(|vertex| vertex.point);
    gizmos.linestrip_2d(points.chain(closing), color);

    if vertex_radius > 0.0 {
        for vertex in &node.vertices {
            gizmos.circle_2d(vertex.point, vertex_radius, color);
        }
    }
}

/// Spreads hues over the nodes so neighbors are easy to tell apart. Holes are drawn darker.
fn node_color(index: usize, node: &NavNode) -> Color {
    let hue = (index as f32 * 137.5) % 360.0;
    let lightness = if node.is_solid() { 0.6 } else { 0.35 };
    Color::hsl(hue, 0.8, lightness)
}
