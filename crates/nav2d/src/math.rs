use glam::Vec2;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// A 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct Aabb2d {
    /// The minimum point of the box
    pub min: Vec2,
    /// The maximum point of the box
    pub max: Vec2,
}

impl Default for Aabb2d {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb2d {
    /// An inverted box that contains nothing. Extending it with any point yields a box around that point.
    pub const EMPTY: Self = Self {
        min: Vec2::INFINITY,
        max: Vec2::NEG_INFINITY,
    };

    /// Creates a new box from its corners.
    #[inline]
    pub fn new(min: impl Into<Vec2>, max: impl Into<Vec2>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Computes the tight bounds of the given points.
    /// Returns [`Aabb2d::EMPTY`] if there are no points.
    pub fn from_verts(vertices: &[Vec2]) -> Self {
        vertices
            .iter()
            .fold(Self::EMPTY, |aabb, vertex| aabb.extended(*vertex))
    }

    /// Returns `true` if the box has no area and no points, i.e. was never extended.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Returns a copy of the box that also encloses `point`.
    #[inline]
    pub fn extended(self, point: Vec2) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Returns a copy of the box grown by `amount` on all four sides.
    #[inline]
    pub fn expanded(self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Inclusive point test.
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Inclusive box test. An empty `other` is never contained.
    #[inline]
    pub fn contains_aabb(&self, other: &Aabb2d) -> bool {
        !other.is_empty()
            && other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }
}

/// The z component of the 3D cross product of `b - a` and `point - a`.
/// Positive if `point` lies to the left of the directed line `a -> b`.
#[inline]
pub(crate) fn line_side(a: Vec2, b: Vec2, point: Vec2) -> f32 {
    (b - a).perp_dot(point - a)
}

/// Projects `point` onto the segment `a -> b`, clamping to its endpoints.
/// Returns the projected point and its squared distance to `point`.
#[inline]
pub(crate) fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> (Vec2, f32) {
    let ab = b - a;
    let ap = point - a;
    let t = (ap.dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
    let projected = a + ab * t;
    (projected, projected.distance_squared(point))
}

/// Even-odd crossing test of `point` against the closed ring `vertices`.
pub(crate) fn crossing_test(vertices: impl Iterator<Item = Vec2> + Clone, point: Vec2) -> bool {
    let Some(mut previous) = vertices.clone().last() else {
        return false;
    };
    let mut inside = false;
    for current in vertices {
        if (current.y > point.y) != (previous.y > point.y)
            && point.x
                < (previous.x - current.x) * (point.y - current.y) / (previous.y - current.y)
                    + current.x
        {
            inside = !inside;
        }
        previous = current;
    }
    inside
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn empty_aabb_contains_nothing() {
        let aabb = Aabb2d::from_verts(&[]);
        assert!(aabb.is_empty());
        assert!(!aabb.contains_point(Vec2::ZERO));
        assert!(!Aabb2d::new([-1.0, -1.0], [1.0, 1.0]).contains_aabb(&aabb));
    }

    #[test]
    fn expanded_aabb_grows_on_all_sides() {
        let aabb = Aabb2d::new([0.0, 0.0], [4.0, 4.0]).expanded(1.0);
        assert_eq!(aabb, Aabb2d::new([-1.0, -1.0], [5.0, 5.0]));
    }

    #[test]
    fn projection_is_clamped_to_segment() {
        let (point, distance_squared) =
            closest_point_on_segment(Vec2::ZERO, Vec2::X * 2.0, Vec2::new(5.0, 0.0));
        assert_eq!(point, Vec2::new(2.0, 0.0));
        assert_relative_eq!(distance_squared, 9.0);

        let (point, distance_squared) =
            closest_point_on_segment(Vec2::ZERO, Vec2::X * 2.0, Vec2::new(1.0, -3.0));
        assert_eq!(point, Vec2::new(1.0, 0.0));
        assert_relative_eq!(distance_squared, 9.0);
    }

    #[test]
    fn line_side_is_positive_on_the_left() {
        assert!(line_side(Vec2::ZERO, Vec2::X, Vec2::Y) > 0.0);
        assert!(line_side(Vec2::ZERO, Vec2::X, -Vec2::Y) < 0.0);
        assert_eq!(line_side(Vec2::ZERO, Vec2::X, Vec2::X * 7.0), 0.0);
    }
}
