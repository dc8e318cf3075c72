//! Turns [`ShapeDescriptor`]s into world-space [`Contour`]s.

use std::f32::consts::TAU;

use glam::{Affine2, Vec2};

use crate::{
    BakeWarning,
    contour::Contour,
    shape::{ShapeDescriptor, ShapeKind},
};

/// The raw world-space contours of all supported shapes, produced once per bake.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionGeometrySet {
    contours: Vec<Contour>,
    /// For every contour, the index of the shape it was extracted from.
    sources: Vec<usize>,
}

impl CollisionGeometrySet {
    /// Extracts one contour per supported shape.
    ///
    /// - Boxes produce 4 vertices in counter-clockwise local order: (+x,+y), (-x,+y), (-x,-y), (+x,-y).
    /// - Circles produce `circle_vertex_count` vertices, counter-clockwise, starting at local angle 0.
    /// - Polygons keep their input order.
    ///
    /// Unsupported shapes are skipped, and a warning is pushed to `warnings`.
    pub fn extract(
        shapes: &[ShapeDescriptor],
        circle_vertex_count: u16,
        warnings: &mut Vec<BakeWarning>,
    ) -> Self {
        let mut set = Self::default();
        let angle_per_vertex = TAU / circle_vertex_count.max(1) as f32;
        for (index, shape) in shapes.iter().enumerate() {
            let transform = shape.transform;
            let contour = match &shape.kind {
                ShapeKind::Box { half_size, offset } => box_contour(transform, *half_size, *offset),
                ShapeKind::Circle { radius, offset } => circle_contour(
                    transform,
                    *radius,
                    *offset,
                    circle_vertex_count,
                    angle_per_vertex,
                ),
                ShapeKind::Polygon { points, offset } => {
                    polygon_contour(transform, points, *offset)
                }
                ShapeKind::Edge { .. } => {
                    let kind = shape.kind.name();
                    tracing::warn!("Skipping shape {index}: {kind} shapes are not supported");
                    warnings.push(BakeWarning::UnsupportedShape {
                        shape: index,
                        kind: kind.to_string(),
                    });
                    continue;
                }
            };
            set.push(contour, index);
        }
        set
    }

    /// Adds a contour extracted from the shape at index `source`.
    pub fn push(&mut self, contour: Contour, source: usize) {
        self.contours.push(contour);
        self.sources.push(source);
    }

    /// The extracted contours.
    #[inline]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Iterates over the contours together with the index of the shape they came from.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Contour)> {
        self.sources.iter().copied().zip(self.contours.iter())
    }

    /// The number of contours.
    #[inline]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Returns `true` if no contour was extracted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }
}

fn box_contour(transform: Affine2, half_size: Vec2, offset: Vec2) -> Contour {
    [
        half_size,
        Vec2::new(-half_size.x, half_size.y),
        -half_size,
        Vec2::new(half_size.x, -half_size.y),
    ]
    .into_iter()
    .map(|corner| transform.transform_point2(corner + offset))
    .collect()
}

fn circle_contour(
    transform: Affine2,
    radius: f32,
    offset: Vec2,
    vertex_count: u16,
    angle_per_vertex: f32,
) -> Contour {
    (0..vertex_count)
        .map(|i| {
            let angle = angle_per_vertex * i as f32;
            let local = offset + radius * Vec2::from_angle(angle);
            transform.transform_point2(local)
        })
        .collect()
}

fn polygon_contour(transform: Affine2, points: &[Vec2], offset: Vec2) -> Contour {
    points
        .iter()
        .map(|point| transform.transform_point2(*point + offset))
        .collect()
}
