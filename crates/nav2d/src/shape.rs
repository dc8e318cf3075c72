//! Describes the physical collision shapes that act as input to the bake.

use glam::{Affine2, Vec2};

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// A single collision shape placed in the world.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeDescriptor {
    /// The local-to-world transform of the shape.
    pub transform: Affine2,
    /// The geometry of the shape in local space.
    pub kind: ShapeKind,
}

impl ShapeDescriptor {
    /// Creates a new shape descriptor.
    pub fn new(transform: Affine2, kind: ShapeKind) -> Self {
        Self { transform, kind }
    }

    /// A box with the given half extents, centered at the local origin.
    pub fn rectangle(transform: Affine2, half_size: impl Into<Vec2>) -> Self {
        Self::new(
            transform,
            ShapeKind::Box {
                half_size: half_size.into(),
                offset: Vec2::ZERO,
            },
        )
    }

    /// A circle with the given radius, centered at the local origin.
    pub fn circle(transform: Affine2, radius: f32) -> Self {
        Self::new(
            transform,
            ShapeKind::Circle {
                radius,
                offset: Vec2::ZERO,
            },
        )
    }

    /// A closed polygon through the given local points.
    pub fn polygon(transform: Affine2, points: impl Into<Vec<Vec2>>) -> Self {
        Self::new(
            transform,
            ShapeKind::Polygon {
                points: points.into(),
                offset: Vec2::ZERO,
            },
        )
    }
}

/// The supported shape geometries. All parameters are in the local space of the shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub enum ShapeKind {
    /// An axis-aligned box.
    Box {
        /// Half of the box extents.
        half_size: Vec2,
        /// Position of the box center.
        offset: Vec2,
    },
    /// A circle, tessellated into a regular polygon during extraction.
    Circle {
        /// Radius of the circle.
        radius: f32,
        /// Position of the circle center.
        offset: Vec2,
    },
    /// A closed polygon. The last point connects back to the first.
    Polygon {
        /// The outline of the polygon, in order.
        points: Vec<Vec2>,
        /// Added to every point.
        offset: Vec2,
    },
    /// An open outline.
    ///
    /// Open outlines are not supported by the bake and are skipped with a warning.
    Edge {
        /// The points of the outline, in order.
        points: Vec<Vec2>,
        /// Added to every point.
        offset: Vec2,
    },
}

impl ShapeKind {
    /// A human-readable name of the kind, used for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Box { .. } => "box",
            ShapeKind::Circle { .. } => "circle",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Edge { .. } => "edge",
        }
    }
}
