//! The [`Contour`] is the polygon loop everything else in the bake is built from.

use std::cell::Cell;

use glam::Vec2;

use crate::math::{Aabb2d, crossing_test};

/// An ordered polygon boundary, closed or open.
///
/// The vertex order defines the direction of the boundary. Counter-clockwise contours
/// have a positive [`Contour::compute_area`] and are considered to have solid winding.
///
/// The bounding box is computed lazily and cached until the next vertex mutation.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Contour {
    vertices: Vec<Vec2>,
    is_closed: bool,
    #[cfg_attr(feature = "serialize", serde(skip))]
    bounds: Cell<Option<Aabb2d>>,
}

impl PartialEq for Contour {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.is_closed == other.is_closed
    }
}

impl FromIterator<Vec2> for Contour {
    fn from_iter<T: IntoIterator<Item = Vec2>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Contour {
    /// Creates a closed contour.
    pub fn new(vertices: impl Into<Vec<Vec2>>) -> Self {
        Self {
            vertices: vertices.into(),
            is_closed: true,
            bounds: Cell::new(None),
        }
    }

    /// Creates an open contour. The last vertex does not connect back to the first.
    pub fn open(vertices: impl Into<Vec<Vec2>>) -> Self {
        Self {
            is_closed: false,
            ..Self::new(vertices)
        }
    }

    /// The vertices of the contour, in boundary order.
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Whether the last vertex connects back to the first.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// The number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the contour has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// A contour with fewer than two vertices has no edges and cannot be used for queries.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 2
    }

    /// Appends a vertex to the end of the boundary.
    pub fn add_vertex(&mut self, vertex: Vec2) {
        self.vertices.push(vertex);
        // Growing the bounds is cheaper than invalidating them.
        if let Some(bounds) = self.bounds.get() {
            self.bounds.set(Some(bounds.extended(vertex)));
        }
    }

    /// Removes the vertex at `index`.
    ///
    /// Out-of-range indices and removing the last remaining vertex are no-ops.
    /// Returns whether a vertex was removed.
    pub fn remove_vertex_at(&mut self, index: usize) -> bool {
        if index >= self.vertices.len() || self.vertices.len() == 1 {
            return false;
        }
        self.vertices.remove(index);
        self.bounds.set(None);
        true
    }

    /// Reverses the direction of the boundary, flipping its winding.
    pub fn reverse(&mut self) {
        self.vertices.reverse();
    }

    /// The tight bounding box of the vertices. [`Aabb2d::EMPTY`] for an empty contour.
    pub fn bounds(&self) -> Aabb2d {
        if let Some(bounds) = self.bounds.get() {
            return bounds;
        }
        let bounds = Aabb2d::from_verts(&self.vertices);
        self.bounds.set(Some(bounds));
        bounds
    }

    /// The signed area of the polygon, using the shoelace formula.
    /// Positive for counter-clockwise contours, negative for clockwise ones.
    pub fn compute_area(&self) -> f32 {
        let Some(&last) = self.vertices.last() else {
            return 0.0;
        };
        let mut previous = last;
        let mut double_area = 0.0;
        for &current in &self.vertices {
            double_area += previous.perp_dot(current);
            previous = current;
        }
        double_area / 2.0
    }

    /// Whether the contour has the winding of a solid region, i.e. is counter-clockwise.
    ///
    /// Note that the hierarchy depth in a [`ContourTree`](crate::ContourTree) is what decides
    /// whether a region is solid. This only reports the winding.
    #[inline]
    pub fn is_solid_winding(&self) -> bool {
        self.compute_area() >= 0.0
    }

    /// Collapses consecutive duplicate vertices. On closed contours, also removes a closing vertex
    /// that repeats the first one. Open contours keep it, as it ends their last edge.
    /// Returns the number of removed vertices.
    pub fn remove_degenerate_edges(&mut self) -> usize {
        let len_before = self.vertices.len();
        self.vertices.dedup();
        if self.is_closed
            && self.vertices.len() > 1
            && self.vertices.first() == self.vertices.last()
        {
            self.vertices.pop();
        }
        let removed = len_before - self.vertices.len();
        if removed > 0 {
            self.bounds.set(None);
        }
        removed
    }

    /// Counts the edges with zero length, including the closing edge of a closed contour.
    pub fn count_zero_length_edges(&self) -> usize {
        let inner = self
            .vertices
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .count();
        let closing = self.is_closed
            && self.vertices.len() > 1
            && self.vertices.first() == self.vertices.last();
        inner + usize::from(closing)
    }

    /// Even-odd point-in-polygon test. Always `false` for open or degenerate contours.
    pub fn contains_point(&self, point: Vec2) -> bool {
        if !self.is_closed || self.vertices.len() < 3 {
            return false;
        }
        if !self.bounds().contains_point(point) {
            return false;
        }
        crossing_test(self.vertices.iter().copied(), point)
    }

    /// Whether `other` lies within this contour.
    ///
    /// This holds if the bounds of `other` are inside the bounds of `self`, and at least one
    /// vertex of `other` lies inside `self`.
    pub fn contains_contour(&self, other: &Contour) -> bool {
        self.bounds().contains_aabb(&other.bounds())
            && other.vertices.iter().any(|v| self.contains_point(*v))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn square(min: f32, max: f32) -> Contour {
        Contour::new([
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ])
    }

    #[test]
    fn area_is_positive_for_counter_clockwise() {
        let contour = square(0.0, 4.0);
        assert_relative_eq!(contour.compute_area(), 16.0);
        assert!(contour.is_solid_winding());
    }

    #[test]
    fn area_is_negative_for_clockwise() {
        let mut contour = square(0.0, 4.0);
        contour.reverse();
        assert_relative_eq!(contour.compute_area(), -16.0);
        assert!(!contour.is_solid_winding());
    }

    #[test]
    fn bounds_are_recomputed_after_removal() {
        let mut contour = Contour::new([
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(1.0, 1.0),
        ]);
        assert_eq!(contour.bounds(), Aabb2d::new([0.0, 0.0], [10.0, 1.0]));
        assert!(contour.remove_vertex_at(1));
        assert_eq!(contour.bounds(), Aabb2d::new([0.0, 0.0], [1.0, 1.0]));
    }

    #[test]
    fn bounds_grow_when_adding_vertices() {
        let mut contour = square(0.0, 1.0);
        assert_eq!(contour.bounds(), Aabb2d::new([0.0, 0.0], [1.0, 1.0]));
        contour.add_vertex(Vec2::new(-3.0, 0.5));
        assert_eq!(contour.bounds(), Aabb2d::new([-3.0, 0.0], [1.0, 1.0]));
    }

    #[test]
    fn cannot_remove_last_vertex_or_out_of_range() {
        let mut contour = Contour::new([Vec2::ONE]);
        assert!(!contour.remove_vertex_at(0));
        assert!(!contour.remove_vertex_at(5));
        assert_eq!(contour.vertices(), &[Vec2::ONE]);
    }

    #[test]
    fn single_vertex_is_degenerate() {
        let contour = Contour::new([Vec2::ONE]);
        assert!(contour.is_degenerate());
        assert!(!contour.contains_point(Vec2::ONE));
        assert!(Contour::default().is_degenerate());
    }

    #[test]
    fn removes_duplicate_and_closing_vertices() {
        let mut contour = Contour::new([
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 0.0),
        ]);
        assert_eq!(contour.count_zero_length_edges(), 3);
        assert_eq!(contour.remove_degenerate_edges(), 3);
        assert_eq!(
            contour.vertices(),
            &[Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0)]
        );
        assert_eq!(contour.count_zero_length_edges(), 0);
    }

    #[test]
    fn open_contour_keeps_vertex_repeating_the_first() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(4.0, 0.0);
        let c = Vec2::new(4.0, 4.0);
        let mut contour = Contour::open([a, b, b, c, a]);
        assert_eq!(contour.count_zero_length_edges(), 1);
        assert_eq!(contour.remove_degenerate_edges(), 1);
        assert_eq!(contour.vertices(), &[a, b, c, a]);
    }

    #[test]
    fn removing_degenerate_edges_of_empty_contour_is_fine() {
        let mut contour = Contour::default();
        assert_eq!(contour.remove_degenerate_edges(), 0);
    }

    #[test]
    fn contains_points_inside() {
        let contour = square(0.0, 4.0);
        assert!(contour.contains_point(Vec2::new(2.0, 2.0)));
        assert!(contour.contains_point(Vec2::new(0.1, 3.9)));
        assert!(!contour.contains_point(Vec2::new(5.0, 2.0)));
        assert!(!contour.contains_point(Vec2::new(-1.0, -1.0)));
    }

    #[test]
    fn open_contour_contains_nothing() {
        let contour = Contour::open(square(0.0, 4.0).vertices().to_vec());
        assert!(!contour.contains_point(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn concave_contour_excludes_notch() {
        // A "U" shape opening upwards.
        let contour = Contour::new([
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(2.0, 3.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(0.0, 3.0),
        ]);
        assert!(contour.contains_point(Vec2::new(0.5, 2.0)));
        assert!(!contour.contains_point(Vec2::new(1.5, 2.0)));
    }

    #[test]
    fn contains_nested_contour() {
        let outer = square(0.0, 10.0);
        let inner = square(2.0, 4.0);
        assert!(outer.contains_contour(&inner));
        assert!(!inner.contains_contour(&outer));
    }

    #[test]
    fn overlapping_contours_do_not_contain_each_other() {
        let a = square(0.0, 4.0);
        let b = square(2.0, 6.0);
        assert!(!a.contains_contour(&b));
        assert!(!b.contains_contour(&a));
    }
}
