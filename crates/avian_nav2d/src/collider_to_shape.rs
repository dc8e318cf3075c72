//! Contains traits and methods for converting [`Collider`]s into [`ShapeDescriptor`]s.

use avian2d::{
    parry::{
        math::{Isometry, Point},
        shape::{Compound, SharedShape, TypedShape},
    },
    prelude::*,
};
use bevy::{math::Affine2, prelude::*};
use nav2d::{ShapeDescriptor, ShapeKind};

/// Convenience trait that allows a [`Collider`] to be converted into [`ShapeDescriptor`]s.
pub trait ToShapeDescriptors {
    /// Converts the collider into shape descriptors placed by `transform`.
    ///
    /// Compound colliders produce one descriptor per supported child shape. The result is empty
    /// if the collider is not supported.
    ///
    /// The following shapes are not supported:
    /// - [`Capsule`](avian2d::parry::shape::Capsule)
    /// - [`TriMesh`](avian2d::parry::shape::TriMesh)
    /// - [`HeightField`](avian2d::parry::shape::HeightField)
    /// - [`HalfSpace`](avian2d::parry::shape::HalfSpace)
    /// - Custom shapes
    ///
    /// [`Segment`](avian2d::parry::shape::Segment)s and [`Polyline`](avian2d::parry::shape::Polyline)s
    /// are converted to [`ShapeKind::Edge`], which the bake reports and skips.
    ///
    /// Rounded shapes are supported, but only the inner shape without rounding is used.
    fn to_shape_descriptors(&self, transform: Affine2) -> Vec<ShapeDescriptor>;
}

impl ToShapeDescriptors for Collider {
    fn to_shape_descriptors(&self, transform: Affine2) -> Vec<ShapeDescriptor> {
        let mut descriptors = Vec::new();
        append_shape(&mut descriptors, self.shape(), transform);
        descriptors
    }
}

/// Converts a [`GlobalTransform`] into the 2D affine transform of the XY plane, ignoring depth.
pub fn affine2_from_global_transform(transform: &GlobalTransform) -> Affine2 {
    let affine = transform.affine();
    Affine2::from_cols(
        affine.matrix3.x_axis.truncate(),
        affine.matrix3.y_axis.truncate(),
        affine.translation.truncate(),
    )
}

fn append_shape(descriptors: &mut Vec<ShapeDescriptor>, shape: &SharedShape, transform: Affine2) {
    let kind = match shape.as_typed_shape() {
        TypedShape::Cuboid(cuboid) => cuboid_kind(cuboid.half_extents.x, cuboid.half_extents.y),
        TypedShape::Ball(ball) => circle_kind(ball.radius),
        TypedShape::ConvexPolygon(convex_polygon) => polygon_kind(convex_polygon.points()),
        TypedShape::Triangle(triangle) => polygon_kind(&[triangle.a, triangle.b, triangle.c]),
        // Compounds need to be unpacked
        TypedShape::Compound(compound) => {
            append_compound(descriptors, compound, transform);
            return;
        }
        // Rounded shapes ignore the rounding and use the inner shape
        TypedShape::RoundCuboid(round_shape) => cuboid_kind(
            round_shape.inner_shape.half_extents.x,
            round_shape.inner_shape.half_extents.y,
        ),
        TypedShape::RoundTriangle(round_shape) => polygon_kind(&[
            round_shape.inner_shape.a,
            round_shape.inner_shape.b,
            round_shape.inner_shape.c,
        ]),
        TypedShape::RoundConvexPolygon(round_shape) => {
            polygon_kind(round_shape.inner_shape.points())
        }
        // Open chains, skipped by the bake
        TypedShape::Segment(segment) => edge_kind(&[segment.a, segment.b]),
        TypedShape::Polyline(polyline) => edge_kind(polyline.vertices()),
        // Not supported
        _ => {
            tracing::warn!(
                "Collider shape {:?} is not supported for 2D navigation, skipping",
                shape.shape_type()
            );
            return;
        }
    };
    descriptors.push(ShapeDescriptor::new(transform, kind));
}

fn append_compound(
    descriptors: &mut Vec<ShapeDescriptor>,
    compound: &Compound,
    transform: Affine2,
) {
    for (isometry, shape) in compound.shapes() {
        append_shape(descriptors, shape, transform * affine2_from_isometry(isometry));
    }
}

fn affine2_from_isometry(isometry: &Isometry<f32>) -> Affine2 {
    Affine2::from_angle_translation(
        isometry.rotation.angle(),
        Vec2::new(isometry.translation.vector.x, isometry.translation.vector.y),
    )
}

fn to_vec2(point: &Point<f32>) -> Vec2 {
    Vec2::new(point.x, point.y)
}

fn cuboid_kind(half_x: f32, half_y: f32) -> ShapeKind {
    ShapeKind::Box {
        half_size: Vec2::new(half_x, half_y),
        offset: Vec2::ZERO,
    }
}

fn circle_kind(radius: f32) -> ShapeKind {
    ShapeKind::Circle {
        radius,
        offset: Vec2::ZERO,
    }
}

fn polygon_kind(points: &[Point<f32>]) -> ShapeKind {
    ShapeKind::Polygon {
        points: points.iter().map(to_vec2).collect(),
        offset: Vec2::ZERO,
    }
}

fn edge_kind(points: &[Point<f32>]) -> ShapeKind {
    ShapeKind::Edge {
        points: points.iter().map(to_vec2).collect(),
        offset: Vec2::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn converts_rectangle_to_box() {
        let collider = Collider::rectangle(4.0, 2.0);
        let descriptors = collider.to_shape_descriptors(Affine2::IDENTITY);
        assert_eq!(
            descriptors,
            vec![ShapeDescriptor::rectangle(Affine2::IDENTITY, [2.0, 1.0])]
        );
    }

    #[test]
    fn converts_circle() {
        let transform = Affine2::from_translation(Vec2::new(3.0, 1.0));
        let descriptors = Collider::circle(0.5).to_shape_descriptors(transform);
        assert_eq!(descriptors, vec![ShapeDescriptor::circle(transform, 0.5)]);
    }

    #[test]
    fn converts_segment_to_edge() {
        let collider = Collider::segment(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        let descriptors = collider.to_shape_descriptors(Affine2::IDENTITY);
        let [descriptor] = descriptors.as_slice() else {
            panic!("expected a single descriptor, got {descriptors:?}");
        };
        assert_eq!(
            descriptor.kind,
            ShapeKind::Edge {
                points: vec![Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0)],
                offset: Vec2::ZERO,
            }
        );
    }

    #[test]
    fn skips_capsule() {
        let collider = Collider::capsule(0.5, 2.0);
        assert!(collider.to_shape_descriptors(Affine2::IDENTITY).is_empty());
    }

    #[test]
    fn unpacks_compound() {
        let collider = Collider::compound(vec![
            (Vec2::new(2.0, 0.0), Rotation::IDENTITY, Collider::circle(1.0)),
            (Vec2::new(-2.0, 0.0), Rotation::IDENTITY, Collider::rectangle(1.0, 1.0)),
        ]);
        let transform = Affine2::from_translation(Vec2::new(0.0, 5.0));
        let descriptors = collider.to_shape_descriptors(transform);
        assert_eq!(descriptors.len(), 2);
        let centers: Vec<_> = descriptors
            .iter()
            .map(|descriptor| descriptor.transform.translation)
            .collect();
        assert!(centers.contains(&Vec2::new(2.0, 5.0)));
        assert!(centers.contains(&Vec2::new(-2.0, 5.0)));
    }

    #[test]
    fn global_transform_keeps_rotation_in_plane() {
        let transform = GlobalTransform::from(
            Transform::from_xyz(1.0, 2.0, 7.0).with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
        );
        let affine = affine2_from_global_transform(&transform);
        let point = affine.transform_point2(Vec2::X);
        assert!((point - Vec2::new(1.0, 3.0)).length() < 1.0e-5);
    }
}
