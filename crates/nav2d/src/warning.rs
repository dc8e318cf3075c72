use thiserror::Error;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// A non-fatal issue found while baking. Warnings never abort a bake, they are
/// attached to the produced [`NavigationData`](crate::NavigationData) so that they can be inspected later.
///
/// `shape` refers to the index of the originating [`ShapeDescriptor`](crate::ShapeDescriptor)
/// in the input slice, if the geometry came from one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub enum BakeWarning {
    /// The shape kind cannot be turned into a closed contour and was skipped.
    #[error("Skipped shape {shape}: {kind} shapes are not supported")]
    UnsupportedShape {
        /// Index of the skipped shape
        shape: usize,
        /// Name of the shape kind
        kind: String,
    },
    /// The contour has fewer than two vertices and therefore no edges.
    #[error("Contour of shape {shape:?} is degenerate: it has {vertex_count} vertices")]
    DegenerateContour {
        /// Index of the originating shape
        shape: Option<usize>,
        /// Number of vertices left in the contour
        vertex_count: usize,
    },
    /// The contour contained edges with zero length.
    #[error("Contour of shape {shape:?} has {count} zero-length edges (removed: {removed})")]
    ZeroLengthEdges {
        /// Index of the originating shape
        shape: Option<usize>,
        /// Number of zero-length edges found
        count: usize,
        /// Whether the edges were pruned from the baked node
        removed: bool,
    },
    /// The winding of the contour does not match the solidity implied by its hierarchy depth.
    #[error(
        "Contour of shape {shape:?} at hierarchy depth {hierarchy_depth} has the wrong winding (reversed: {reversed})"
    )]
    WindingMismatch {
        /// Index of the originating shape
        shape: Option<usize>,
        /// The baked hierarchy depth of the node
        hierarchy_depth: u32,
        /// Whether the vertex order was reversed to fix the winding
        reversed: bool,
    },
}
