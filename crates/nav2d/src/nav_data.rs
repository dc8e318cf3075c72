//! The baked, read-only navigation asset and the queries it answers.

use glam::Vec2;
use thiserror::Error;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

use crate::{
    BakeWarning, MapPointConfig,
    math::{Aabb2d, closest_point_on_segment, crossing_test, line_side},
};

/// The baked navigation data. Immutable after baking; a re-bake produces a new instance.
///
/// Build with [`NavigationData::bake`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct NavigationData {
    /// Identifies the asset.
    pub name: String,
    /// The version stamp of the asset.
    pub version: u32,
    /// The nodes, sorted ascending by `aabb.min.x`. Queries rely on this order.
    pub nodes: Vec<NavNode>,
    /// The tolerances used by [`NavigationData::map_point`].
    pub map_point: MapPointConfig,
    /// Issues found during the bake.
    pub warnings: Vec<BakeWarning>,
}

/// One baked boundary loop.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct NavNode {
    /// The tight bounds of all vertices.
    pub aabb: Aabb2d,
    /// Whether the last vertex connects back to the first.
    pub is_closed: bool,
    /// 0 = solid, 1 = hole, 2 = solid, ...
    pub hierarchy_depth: u32,
    /// The boundary of the node.
    pub vertices: Vec<NavVertex>,
    /// Connections to other nodes. Currently never populated by the bake.
    pub links: Vec<NavNodeLink>,
}

/// One boundary point of a [`NavNode`], together with the shape of the boundary around it.
///
/// For a vertex `b` with predecessor `a` and successor `c`:
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct NavVertex {
    /// The position of `b`.
    pub point: Vec2,
    /// Signed angle from `a -> b` to `b -> c` in radians. Positive for left turns.
    pub turn_angle: f32,
    /// Angle of `b -> c` against the x-axis in radians.
    pub slope_angle: f32,
    /// Length of `b -> c`.
    pub edge_length: f32,
    /// The first dynamic obstruction on `b -> c`. Never populated by the bake.
    pub obstruction: Option<DynamicObstruction>,
}

/// Placeholder for a dynamic obstacle registered on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct DynamicObstruction;

/// A traversal between two nodes, e.g. a jump. Reserved for graph pathfinding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct NavNodeLink {
    /// Index of the target node in [`NavigationData::nodes`].
    pub target: usize,
    /// Where the traversal starts.
    pub start: Vec2,
    /// Where the traversal ends.
    pub end: Vec2,
    /// How the traversal is performed.
    pub kind: NavNodeLinkKind,
}

/// How a [`NavNodeLink`] is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub enum NavNodeLinkKind {
    /// The target cannot be reached.
    #[default]
    NotAccessible,
    /// The target is reached by jumping.
    Jump,
    /// The target is reached by climbing.
    Ladder,
}

/// A point mapped onto the boundary of a [`NavNode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedPoint {
    /// The boundary point.
    pub point: Vec2,
    /// Distance from the query point to [`MappedPoint::point`].
    pub distance: f32,
    /// Index of the node in [`NavigationData::nodes`].
    pub node: usize,
}

/// The outcome of [`NavigationData::map_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointMapping {
    /// The point was mapped onto a boundary.
    Mapped(MappedPoint),
    /// The point lies inside the closed node at this index.
    Blocked {
        /// Index of the blocking node in [`NavigationData::nodes`].
        node: usize,
    },
    /// No boundary is within tolerance.
    NoMatch,
}

impl PointMapping {
    /// The mapped point, if any.
    pub fn mapped(self) -> Option<MappedPoint> {
        match self {
            PointMapping::Mapped(mapped) => Some(mapped),
            PointMapping::Blocked { .. } | PointMapping::NoMatch => None,
        }
    }
}

/// Errors reported by [`NavigationData::validate`].
/// Any of these means the asset is corrupted and must not be queried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationDataError {
    /// Happens when the nodes are not sorted by the minimum x of their bounds.
    #[error("Nodes are not sorted by min x: node {index} starts at {min_x}, before its predecessor at {previous_min_x}")]
    UnsortedNodes {
        /// Index of the first out-of-order node
        index: usize,
        /// min x of the node
        min_x: f32,
        /// min x of the previous node
        previous_min_x: f32,
    },
    /// Happens when the cached bounds of a node do not enclose its vertices.
    #[error("Bounds of node {index} do not match its vertices")]
    InvalidBounds {
        /// Index of the node
        index: usize,
    },
}

impl NavNode {
    /// The number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the node has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Even depths are solid, odd depths are holes.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.hierarchy_depth % 2 == 0
    }

    /// Even-odd point-in-polygon test.
    ///
    /// Only meaningful for closed nodes. Open and degenerate nodes never contain anything.
    pub fn contains(&self, point: Vec2) -> bool {
        if !self.is_closed || self.vertices.len() < 3 {
            return false;
        }
        if !self.aabb.contains_point(point) {
            return false;
        }
        crossing_test(self.vertices.iter().map(|v| v.point), point)
    }

    /// Finds the closest point on the boundary, looking only at edges that face `point`.
    ///
    /// An edge `a -> b` faces the point if the point lies on its right side,
    /// which is the outside of a counter-clockwise contour.
    /// If the point lies on the infinite line through any edge, the point itself is returned with distance 0.
    ///
    /// Returns `(distance, nearest_point)`, or `None` if no edge qualifies.
    pub fn closest_point_on_contour(&self, point: Vec2) -> Option<(f32, Vec2)> {
        let (mut previous, edges) = match (self.is_closed, self.vertices.split_first()) {
            (_, None) => return None,
            (true, Some(_)) => (self.vertices[self.vertices.len() - 1].point, &self.vertices[..]),
            (false, Some((first, rest))) => (first.point, rest),
        };

        let mut best: Option<(f32, Vec2)> = None;
        for vertex in edges {
            let (a, b) = (previous, vertex.point);
            previous = b;
            if a == b {
                continue;
            }
            let side = line_side(a, b, point);
            if side == 0.0 {
                return Some((0.0, point));
            }
            if side > 0.0 {
                continue;
            }
            let (projected, distance_squared) = closest_point_on_segment(a, b, point);
            if best.is_none_or(|(best_distance, _)| distance_squared < best_distance) {
                best = Some((distance_squared, projected));
            }
        }
        best.map(|(distance_squared, point)| (distance_squared.sqrt(), point))
    }
}

impl NavigationData {
    /// Maps `point` onto the nearest navigable boundary within tolerance.
    ///
    /// Nodes are scanned in order. A node is skipped if `point` lies outside its bounds
    /// expanded by [`MapPointConfig::max_deviation`]. The first closed node that contains the point
    /// blocks it and ends the search. A match within [`MapPointConfig::instant_accept_deviation`]
    /// ends the search immediately; otherwise the closest match over all nodes wins.
    pub fn map_point(&self, point: Vec2) -> PointMapping {
        self.debug_assert_sorted();
        let MapPointConfig {
            max_deviation,
            instant_accept_deviation,
        } = self.map_point;

        let mut best: Option<MappedPoint> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            if node.aabb.min.x - max_deviation > point.x {
                // Sorted by min x, so no later node can pass the bounds test either.
                break;
            }
            if !node.aabb.expanded(max_deviation).contains_point(point) {
                continue;
            }
            if node.is_closed && node.contains(point) {
                return PointMapping::Blocked { node: index };
            }
            let Some((distance, nearest)) = node.closest_point_on_contour(point) else {
                continue;
            };
            if best.is_some_and(|best| best.distance <= distance) {
                continue;
            }
            let mapped = MappedPoint {
                point: nearest,
                distance,
                node: index,
            };
            if distance <= instant_accept_deviation {
                return PointMapping::Mapped(mapped);
            }
            best = Some(mapped);
        }
        best.map_or(PointMapping::NoMatch, PointMapping::Mapped)
    }

    /// Maps `point` onto the nearest navigable boundary. Returns `None` if the point is blocked
    /// or no boundary is within tolerance. See [`NavigationData::map_point`].
    pub fn try_map_point(&self, point: Vec2) -> Option<Vec2> {
        self.map_point(point).mapped().map(|mapped| mapped.point)
    }

    /// Checks the invariants the queries rely on. Use this on data that was not produced
    /// by [`NavigationData::bake`] in the same process, e.g. after deserializing.
    pub fn validate(&self) -> Result<(), NavigationDataError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if index > 0 {
                let previous_min_x = self.nodes[index - 1].aabb.min.x;
                if node.aabb.min.x < previous_min_x {
                    return Err(NavigationDataError::UnsortedNodes {
                        index,
                        min_x: node.aabb.min.x,
                        previous_min_x,
                    });
                }
            }
            let encloses_all = node
                .vertices
                .iter()
                .all(|vertex| node.aabb.contains_point(vertex.point));
            if !encloses_all {
                return Err(NavigationDataError::InvalidBounds { index });
            }
        }
        Ok(())
    }

    #[inline]
    fn debug_assert_sorted(&self) {
        debug_assert!(
            self.nodes
                .windows(2)
                .all(|pair| pair[0].aabb.min.x <= pair[1].aabb.min.x),
            "Navigation nodes of {} are not sorted by min x",
            self.name
        );
    }
}
