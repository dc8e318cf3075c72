//! Flattens a [`ContourTree`] into the sorted node array of a [`NavigationData`].

use glam::Vec2;

use crate::{
    BakeWarning, ContourTree, Nav2dConfig, NavNode, NavVertex, NavigationData, contour::Contour,
    math::Aabb2d,
};

impl ContourTree {
    /// Bakes every contour of the tree into a [`NavNode`] and sorts the result by `aabb.min.x`.
    ///
    /// The hierarchy depth of a node is its tree depth minus one, so contours directly below
    /// the root end up at depth 0, which is solid.
    ///
    /// `warnings` is moved into the produced asset after the bake's own diagnostics are appended.
    pub fn bake(&self, config: &Nav2dConfig, mut warnings: Vec<BakeWarning>) -> NavigationData {
        self.debug_assert_valid();

        let mut nodes = Vec::with_capacity(self.len());
        for (_key, tree_node) in self.iter_depth_first() {
            let Some(contour) = tree_node.contour() else {
                continue;
            };
            let hierarchy_depth = tree_node.depth() - 1;
            let source = tree_node.source();
            let mut contour = contour.clone();

            let zero_length_edges = contour.count_zero_length_edges();
            if zero_length_edges > 0 {
                tracing::warn!(
                    "Contour of shape {source:?} has {zero_length_edges} zero-length edges"
                );
                if config.prune_degenerate_edges {
                    contour.remove_degenerate_edges();
                }
                warnings.push(BakeWarning::ZeroLengthEdges {
                    shape: source,
                    count: zero_length_edges,
                    removed: config.prune_degenerate_edges,
                });
            }

            if contour.is_degenerate() {
                tracing::warn!(
                    "Contour of shape {source:?} is degenerate with {} vertices",
                    contour.len()
                );
                warnings.push(BakeWarning::DegenerateContour {
                    shape: source,
                    vertex_count: contour.len(),
                });
            } else if contour.is_closed() && contour.len() >= 3 {
                let should_be_solid = hierarchy_depth % 2 == 0;
                if contour.is_solid_winding() != should_be_solid {
                    if config.enforce_winding {
                        contour.reverse();
                    }
                    warnings.push(BakeWarning::WindingMismatch {
                        shape: source,
                        hierarchy_depth,
                        reversed: config.enforce_winding,
                    });
                }
            }

            nodes.push(bake_node(&contour, hierarchy_depth));
        }

        // Stable, so nodes with equal min x keep their traversal order.
        nodes.sort_by(|a, b| a.aabb.min.x.total_cmp(&b.aabb.min.x));

        tracing::debug!(
            "Baked {} navigation nodes with {} warnings",
            nodes.len(),
            warnings.len()
        );

        let navigation_data = NavigationData {
            name: config.name.clone(),
            version: config.version,
            nodes,
            map_point: config.map_point,
            warnings,
        };
        debug_assert_eq!(navigation_data.validate(), Ok(()));
        navigation_data
    }
}

fn bake_node(contour: &Contour, hierarchy_depth: u32) -> NavNode {
    let points = contour.vertices();
    let is_closed = contour.is_closed();
    let len = points.len();

    let vertices = (0..len)
        .map(|i| {
            let previous = if i > 0 {
                Some(points[i - 1])
            } else if is_closed {
                Some(points[len - 1])
            } else {
                None
            };
            let next = if i + 1 < len {
                Some(points[i + 1])
            } else if is_closed {
                Some(points[0])
            } else {
                None
            };
            bake_vertex(previous, points[i], next)
        })
        .collect();

    NavNode {
        aabb: Aabb2d::from_verts(points),
        is_closed,
        hierarchy_depth,
        vertices,
        links: Vec::new(),
    }
}

/// Computes the metadata of `b` in the chain `a -> b -> c`.
/// Missing neighbors at the ends of open contours leave the corresponding values at 0.
fn bake_vertex(a: Option<Vec2>, b: Vec2, c: Option<Vec2>) -> NavVertex {
    let outgoing = c.map(|c| c - b);
    let turn_angle = match (a, outgoing) {
        (Some(a), Some(bc)) => {
            let ab = b - a;
            ab.perp_dot(bc).atan2(ab.dot(bc))
        }
        _ => 0.0,
    };
    let (slope_angle, edge_length) =
        outgoing.map_or((0.0, 0.0), |bc| (bc.y.atan2(bc.x), bc.length()));
    NavVertex {
        point: b,
        turn_angle,
        slope_angle,
        edge_length,
        obstruction: None,
    }
}
