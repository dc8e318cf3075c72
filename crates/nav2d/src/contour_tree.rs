//! Nests contours into a hierarchy of alternating blocked and walkable regions.
//!
//! The tree starts with a synthetic root that represents the unbounded walkable region
//! outside of all geometry. Every contour is attached beneath the deepest contour that contains it,
//! so depth 1 contours are blocked, depth 2 contours are holes in them (walkable), and so on.

use slotmap::SlotMap;

use crate::{CollisionGeometrySet, contour::Contour};

slotmap::new_key_type! {
    /// The key of a [`ContourNode`] inside a [`ContourTree`].
    pub struct ContourNodeKey;
}

/// A node of the [`ContourTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContourNode {
    parent: Option<ContourNodeKey>,
    children: Vec<ContourNodeKey>,
    contour: Option<Contour>,
    depth: u32,
    source: Option<usize>,
}

impl ContourNode {
    /// The parent of this node. `None` only for the root.
    #[inline]
    pub fn parent(&self) -> Option<ContourNodeKey> {
        self.parent
    }

    /// The children of this node, in insertion order.
    #[inline]
    pub fn children(&self) -> &[ContourNodeKey] {
        &self.children
    }

    /// The contour this node represents. `None` only for the root.
    #[inline]
    pub fn contour(&self) -> Option<&Contour> {
        self.contour.as_ref()
    }

    /// Depth in the hierarchy. The root has depth 0.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The index of the shape this contour was extracted from, if known.
    #[inline]
    pub fn source(&self) -> Option<usize> {
        self.source
    }

    /// Whether the region enclosed by this node is blocked. Odd depths are blocked, even depths walkable.
    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.depth % 2 == 1
    }
}

/// A hierarchy of nested contours. Build with [`ContourTree::build`] or [`ContourTree::insert`].
#[derive(Debug, Clone)]
pub struct ContourTree {
    nodes: SlotMap<ContourNodeKey, ContourNode>,
    root: ContourNodeKey,
}

impl Default for ContourTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContourTree {
    /// Creates a tree containing only the root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(ContourNode {
            parent: None,
            children: Vec::new(),
            contour: None,
            depth: 0,
            source: None,
        });
        Self { nodes, root }
    }

    /// Nests every contour of the set, in set order.
    pub fn build(geometry: &CollisionGeometrySet) -> Self {
        let mut tree = Self::new();
        for (source, contour) in geometry.iter() {
            tree.insert_with_source(contour.clone(), Some(source));
        }
        tree
    }

    /// The synthetic root, representing the region outside of all contours.
    #[inline]
    pub fn root(&self) -> ContourNodeKey {
        self.root
    }

    /// Gets a node by key.
    #[inline]
    pub fn get(&self, key: ContourNodeKey) -> Option<&ContourNode> {
        self.nodes.get(key)
    }

    /// The number of contours in the tree, excluding the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns `true` if no contour was inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a contour beneath the deepest node that contains it.
    pub fn insert(&mut self, contour: Contour) -> ContourNodeKey {
        self.insert_with_source(contour, None)
    }

    /// Same as [`ContourTree::insert`], but remembers the index of the shape the contour came from.
    pub fn insert_with_source(
        &mut self,
        contour: Contour,
        source: Option<usize>,
    ) -> ContourNodeKey {
        let parent = self.find_container(&contour);
        let parent_depth = self.nodes[parent].depth;

        // Previously inserted siblings that lie inside the new contour move beneath it.
        let (adopted, kept): (Vec<_>, Vec<_>) =
            self.nodes[parent].children.iter().copied().partition(|child| {
                self.nodes[*child]
                    .contour
                    .as_ref()
                    .is_some_and(|sibling| contour.contains_contour(sibling))
            });

        let key = self.nodes.insert(ContourNode {
            parent: Some(parent),
            children: adopted.clone(),
            contour: Some(contour),
            depth: parent_depth + 1,
            source,
        });

        let parent_node = &mut self.nodes[parent];
        parent_node.children = kept;
        parent_node.children.push(key);

        for child in adopted {
            self.nodes[child].parent = Some(key);
            self.shift_depth(child);
        }
        key
    }

    /// Walks down from the root, always entering the first child that contains `contour`.
    fn find_container(&self, contour: &Contour) -> ContourNodeKey {
        let mut current = self.root;
        'descend: loop {
            for &child in &self.nodes[current].children {
                let contains = self.nodes[child]
                    .contour
                    .as_ref()
                    .is_some_and(|candidate| candidate.contains_contour(contour));
                if contains {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Increments the depth of `key` and its whole subtree.
    fn shift_depth(&mut self, key: ContourNodeKey) {
        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            let node = &mut self.nodes[key];
            node.depth += 1;
            stack.extend_from_slice(&node.children);
        }
    }

    /// Iterates over all nodes except the root in depth-first pre-order.
    /// Children are visited in insertion order, which makes the traversal deterministic.
    pub fn iter_depth_first(&self) -> impl Iterator<Item = (ContourNodeKey, &ContourNode)> {
        let mut stack: Vec<_> = self.nodes[self.root].children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let key = stack.pop()?;
            let node = &self.nodes[key];
            stack.extend(node.children.iter().rev().copied());
            Some((key, node))
        })
    }

    /// Checks the parent/child links and depths of every node.
    /// Panics in debug builds if the hierarchy is malformed.
    pub(crate) fn debug_assert_valid(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        for (key, node) in self.iter_depth_first() {
            let Some(parent) = node.parent.and_then(|parent| self.nodes.get(parent)) else {
                panic!("Contour node {key:?} has no parent");
            };
            assert_eq!(node.depth, parent.depth + 1, "Depth mismatch at {key:?}");
            assert!(
                parent.children.contains(&key),
                "Parent of {key:?} does not own it"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn square(min: f32, max: f32) -> Contour {
        Contour::new([
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ])
    }

    fn depths(tree: &ContourTree) -> Vec<(f32, u32)> {
        let mut depths: Vec<_> = tree
            .iter_depth_first()
            .map(|(_, node)| (node.contour().unwrap().bounds().min.x, node.depth()))
            .collect();
        depths.sort_by(|a, b| a.0.total_cmp(&b.0));
        depths
    }

    #[test]
    fn empty_tree_has_only_root() {
        let tree = ContourTree::new();
        assert!(tree.is_empty());
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.depth(), 0);
        assert!(root.contour().is_none());
        assert!(!root.is_blocking());
    }

    #[test]
    fn nests_contours_in_order() {
        let mut tree = ContourTree::new();
        tree.insert(square(0.0, 10.0));
        tree.insert(square(1.0, 9.0));
        tree.insert(square(2.0, 8.0));
        tree.debug_assert_valid();
        assert_eq!(depths(&tree), vec![(0.0, 1), (1.0, 2), (2.0, 3)]);
    }

    #[test]
    fn nests_contours_in_reverse_order() {
        let mut tree = ContourTree::new();
        tree.insert(square(2.0, 8.0));
        tree.insert(square(1.0, 9.0));
        tree.insert(square(0.0, 10.0));
        tree.debug_assert_valid();
        assert_eq!(depths(&tree), vec![(0.0, 1), (1.0, 2), (2.0, 3)]);
    }

    #[test]
    fn disjoint_contours_are_siblings() {
        let mut tree = ContourTree::new();
        let a = tree.insert(square(0.0, 1.0));
        let b = tree.insert(square(5.0, 6.0));
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.children(), &[a, b]);
        assert_eq!(tree.get(a).unwrap().depth(), 1);
        assert_eq!(tree.get(b).unwrap().depth(), 1);
        assert!(tree.get(a).unwrap().is_blocking());
    }

    #[test]
    fn overlapping_contours_are_siblings() {
        let mut tree = ContourTree::new();
        let a = tree.insert(square(0.0, 4.0));
        let b = tree.insert(square(2.0, 6.0));
        assert_eq!(tree.get(a).unwrap().parent(), Some(tree.root()));
        assert_eq!(tree.get(b).unwrap().parent(), Some(tree.root()));
    }

    #[test]
    fn enclosing_contour_adopts_only_contained_siblings() {
        let mut tree = ContourTree::new();
        let inside = tree.insert(square(1.0, 2.0));
        let outside = tree.insert(square(20.0, 21.0));
        let enclosing = tree.insert(square(0.0, 10.0));
        tree.debug_assert_valid();

        assert_eq!(tree.get(inside).unwrap().parent(), Some(enclosing));
        assert_eq!(tree.get(inside).unwrap().depth(), 2);
        assert_eq!(tree.get(outside).unwrap().parent(), Some(tree.root()));
        assert_eq!(
            tree.get(tree.root()).unwrap().children(),
            &[outside, enclosing]
        );
    }

    #[test]
    fn depth_first_visits_children_in_insertion_order() {
        let mut tree = ContourTree::new();
        let outer = tree.insert(square(0.0, 10.0));
        let hole_a = tree.insert(square(1.0, 2.0));
        let hole_b = tree.insert(square(5.0, 6.0));
        let other = tree.insert(square(20.0, 30.0));
        let order: Vec<_> = tree.iter_depth_first().map(|(key, _)| key).collect();
        assert_eq!(order, vec![outer, hole_a, hole_b, other]);
    }

    #[test]
    fn remembers_source() {
        let mut tree = ContourTree::new();
        let key = tree.insert_with_source(square(0.0, 1.0), Some(7));
        assert_eq!(tree.get(key).unwrap().source(), Some(7));
    }
}
