// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compressed quadtree: single-child chains elided, nodes addressed by
//! mask.

use hashbrown::HashMap;
use kurbo::{Point, Rect};

use crate::RegionError;
use crate::mask::Mask;
use crate::util::{
    contains_closed, contains_half_open, inflate, intersect, is_void, quadrant, quadrant_of,
};

/// Identifier of a node within one compressed quadtree's arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A compressed-quadtree node.
///
/// Leaves hold at most one point. Internal nodes below the root always have
/// at least two non-empty children: a node that would have exactly one is
/// elided, and its surviving child takes its place under the first
/// branching ancestor.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadNode {
    pub(crate) rect: Rect,
    pub(crate) leaf: bool,
    pub(crate) point: Option<Point>,
    pub(crate) mask: Mask,
    pub(crate) children: [Option<NodeId>; 4],
}

impl QuadNode {
    /// The node's box.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// The stored point, for non-empty leaves.
    pub fn point(&self) -> Option<Point> {
        self.point
    }

    /// The node's mask (its identity across skip levels).
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// The child occupying the given quadrant, if any.
    pub(crate) fn child(&self, quadrant: u8) -> Option<NodeId> {
        self.children[usize::from(quadrant)]
    }
}

/// A path-compressed quadtree over a fixed half-open domain.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressedQuadTree {
    nodes: Vec<QuadNode>,
    by_mask: HashMap<Mask, NodeId>,
    root: NodeId,
    bounds: Rect,
}

impl CompressedQuadTree {
    /// An empty tree over `[x0, x1) × [y0, y1)`.
    pub fn new(bounds: Rect) -> Self {
        let root = QuadNode {
            rect: bounds,
            leaf: true,
            point: None,
            mask: Mask::root(),
            children: [None; 4],
        };
        let mut by_mask = HashMap::new();
        by_mask.insert(Mask::root(), NodeId(0));
        Self {
            nodes: vec![root],
            by_mask,
            root: NodeId(0),
            bounds,
        }
    }

    /// The domain the tree covers.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> &QuadNode {
        &self.nodes[id.idx()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut QuadNode {
        &mut self.nodes[id.idx()]
    }

    pub(crate) fn node_by_mask(&self, mask: &Mask) -> Option<NodeId> {
        self.by_mask.get(mask).copied()
    }

    fn push_node(&mut self, rect: Rect, mask: Mask) -> NodeId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Arena ids are 32-bit by design."
        )]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(QuadNode {
            rect,
            leaf: true,
            point: None,
            mask: mask.clone(),
            children: [None; 4],
        });
        self.by_mask.insert(mask, id);
        id
    }

    /// Insert a point; duplicates are no-ops.
    pub fn insert(&mut self, p: Point) -> Result<(), RegionError> {
        if !contains_half_open(&self.bounds, p) {
            return Err(RegionError::OutOfBounds);
        }
        // The root is the fixed anchor of the mask map; any elision result
        // at this level is deliberately dropped.
        let _ = self.insert_at(self.root, p);
        Ok(())
    }

    /// Insert starting from the node registered under `mask` (the skip
    /// structure's locator hand-off).
    pub(crate) fn insert_from(&mut self, mask: &Mask, p: Point) {
        let n = self
            .node_by_mask(mask)
            .expect("locator masks address live nodes");
        // Locator targets are internal (or the root), so the elision result
        // is unreachable below the root and dropped as at the root.
        let _ = self.insert_at(n, p);
    }

    /// Insert under `n`; returns the node now occupying `n`'s slot (the
    /// single surviving child when `n` was elided, otherwise `n`).
    fn insert_at(&mut self, n: NodeId, p: Point) -> NodeId {
        if self.node(n).leaf {
            match self.node(n).point {
                None => {
                    self.node_mut(n).point = Some(p);
                    return n;
                }
                Some(q) if q == p => return n,
                Some(q) => {
                    self.node_mut(n).leaf = false;
                    self.node_mut(n).point = None;
                    let rect = self.node(n).rect;
                    let mask = self.node(n).mask.clone();
                    if let Some(i) = quadrant_of(&rect, q) {
                        let child = self.push_node(quadrant(rect, i), mask.child(i));
                        self.node_mut(child).point = Some(q);
                        self.node_mut(n).children[usize::from(i)] = Some(child);
                    }
                }
            }
        }

        let rect = self.node(n).rect;
        if let Some(i) = quadrant_of(&rect, p) {
            let slot = usize::from(i);
            match self.node(n).children[slot] {
                None => {
                    let mask = self.node(n).mask.clone();
                    let child = self.push_node(quadrant(rect, i), mask.child(i));
                    self.node_mut(child).point = Some(p);
                    self.node_mut(n).children[slot] = Some(child);
                }
                Some(c) if contains_half_open(&self.node(c).rect, p) => {
                    let replacement = self.insert_at(c, p);
                    self.node_mut(n).children[slot] = Some(replacement);
                }
                Some(c) => {
                    // The existing child is a compressed descendant whose
                    // box misses `p`: materialise the first box where the
                    // two diverge and hang both below it.
                    let old_rect = self.node(c).rect;
                    let old_probe = Point::new(old_rect.x0, old_rect.y0);
                    let mut branch_rect = rect;
                    let mut branch_mask = self.node(n).mask.clone();
                    let old_slot = loop {
                        let oi = quadrant_of(&branch_rect, old_probe)
                            .expect("descendant stays inside its ancestor");
                        let pi = quadrant_of(&branch_rect, p)
                            .expect("point stays inside the branch box");
                        if oi != pi {
                            break oi;
                        }
                        branch_rect = quadrant(branch_rect, pi);
                        branch_mask = branch_mask.child(pi);
                    };

                    let branch = self.push_node(branch_rect, branch_mask);
                    self.node_mut(branch).leaf = false;
                    self.node_mut(branch).children[usize::from(old_slot)] = Some(c);
                    let replacement = self.insert_at(branch, p);
                    self.node_mut(n).children[slot] = Some(replacement);
                }
            }
        }

        let mut non_empty = 0;
        let mut survivor = n;
        for child in self.node(n).children.iter().flatten() {
            non_empty += 1;
            survivor = *child;
        }
        if non_empty == 1 {
            let mask = self.node(n).mask.clone();
            if !mask.is_root() {
                self.by_mask.remove(&mask);
            }
            return survivor;
        }
        n
    }

    /// The deepest node whose box contains `p`.
    pub fn find(&self, p: Point) -> Option<&QuadNode> {
        if !contains_half_open(&self.bounds, p) {
            return None;
        }
        Some(self.node(self.find_from(self.root, p)))
    }

    pub(crate) fn find_from(&self, n: NodeId, p: Point) -> NodeId {
        for child in self.node(n).children.iter().flatten() {
            if contains_half_open(&self.node(*child).rect, p) {
                return self.find_from(*child, p);
            }
        }
        n
    }

    /// Whether `p` is stored in the tree.
    pub fn contains(&self, p: Point) -> bool {
        self.find(p).is_some_and(|n| n.point == Some(p))
    }

    /// The mask of the deepest internal node on the path to `p` whose child
    /// toward `p` exists and is not a leaf ("lowest interesting" node).
    pub(crate) fn lowest_interesting(&self, start: &Mask, p: Point) -> Mask {
        let n = self
            .node_by_mask(start)
            .expect("locator masks address live nodes");
        self.lowest_interesting_from(n, p)
    }

    fn lowest_interesting_from(&self, n: NodeId, p: Point) -> Mask {
        for child in self.node(n).children.iter().flatten() {
            let c = self.node(*child);
            if contains_half_open(&c.rect, p) && !c.leaf {
                return self.lowest_interesting_from(*child, p);
            }
        }
        self.node(n).mask.clone()
    }

    /// Approximate rectangle report with slack `eps` (see the crate docs
    /// for the ε-contract).
    pub fn range(&self, rect: Rect, eps: f64) -> Vec<Point> {
        let mut out = Vec::new();
        self.range_from(self.root, &rect, eps, &mut out);
        out
    }

    fn range_from(&self, n: NodeId, rect: &Rect, eps: f64, out: &mut Vec<Point>) {
        let node = self.node(n);
        if node.leaf {
            if let Some(p) = node.point {
                if contains_closed(rect, p) {
                    out.push(p);
                }
            }
            return;
        }

        let eps_rect = inflate(rect, eps);
        for child in node.children.iter().flatten() {
            let quad = self.node(*child).rect;
            if intersect(&eps_rect, &quad) == quad {
                self.collect_subtree(*child, out);
            } else if !is_void(&intersect(rect, &quad)) {
                self.range_from(*child, rect, eps, out);
            }
        }
    }

    /// Append every point stored under `n`.
    pub(crate) fn collect_subtree(&self, n: NodeId, out: &mut Vec<Point>) {
        let node = self.node(n);
        if node.leaf {
            if let Some(p) = node.point {
                out.push(p);
            }
            return;
        }
        for child in node.children.iter().flatten() {
            self.collect_subtree(*child, out);
        }
    }

    /// Every stored point.
    pub fn points(&self) -> Vec<Point> {
        let mut out = Vec::new();
        self.collect_subtree(self.root, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Rect {
        Rect::new(-200.0, -200.0, 200.0, 200.0)
    }

    /// Walk the live structure from the root, asserting the compression
    /// invariant below the root.
    fn assert_compressed(tree: &CompressedQuadTree) {
        fn walk(tree: &CompressedQuadTree, n: NodeId, is_root: bool) {
            let node = tree.node(n);
            if node.leaf {
                return;
            }
            let kids: Vec<NodeId> = node.children.iter().flatten().copied().collect();
            if !is_root {
                assert!(
                    kids.len() >= 2,
                    "internal node below the root has a single child"
                );
            }
            for c in kids {
                walk(tree, c, false);
            }
        }
        walk(tree, tree.root_id(), true);
    }

    #[test]
    fn find_returns_the_leaf_with_the_stored_point() {
        let mut tree = CompressedQuadTree::new(domain());
        for p in [
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(-50.0, 30.0),
        ] {
            tree.insert(p).expect("inside the domain");
        }

        for p in [
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(-50.0, 30.0),
        ] {
            let node = tree.find(p).expect("node exists");
            assert!(node.is_leaf());
            assert_eq!(node.point(), Some(p));
        }
        assert_compressed(&tree);
    }

    #[test]
    fn close_points_branch_at_equal_depth() {
        let mut tree = CompressedQuadTree::new(domain());
        tree.insert(Point::new(10.0, 10.0)).expect("in bounds");
        tree.insert(Point::new(10.001, 10.001)).expect("in bounds");

        let a = tree.find(Point::new(10.0, 10.0)).expect("leaf");
        let b = tree.find(Point::new(10.001, 10.001)).expect("leaf");
        assert_eq!(a.point(), Some(Point::new(10.0, 10.0)));
        assert_eq!(b.point(), Some(Point::new(10.001, 10.001)));

        // Branching happened at the first disagreeing quadrant: the two
        // leaves sit at the same depth and differ in the last digit only.
        assert_eq!(a.mask().depth(), b.mask().depth());
        let d = a.mask().depth();
        assert_eq!(a.mask().digits()[..d - 1], b.mask().digits()[..d - 1]);
        assert_ne!(a.mask().digits()[d - 1], b.mask().digits()[d - 1]);
        assert_compressed(&tree);
    }

    #[test]
    fn double_insert_is_idempotent() {
        let mut tree = CompressedQuadTree::new(domain());
        tree.insert(Point::new(17.0, -3.0)).expect("in bounds");
        tree.insert(Point::new(-120.0, 55.0)).expect("in bounds");

        let snapshot = tree.clone();
        tree.insert(Point::new(17.0, -3.0)).expect("in bounds");
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn out_of_bounds_points_are_rejected() {
        let mut tree = CompressedQuadTree::new(domain());
        assert_eq!(
            tree.insert(Point::new(500.0, 0.0)),
            Err(RegionError::OutOfBounds)
        );
        assert!(tree.points().is_empty());
    }

    #[test]
    fn compression_invariant_holds_under_many_inserts() {
        let mut tree = CompressedQuadTree::new(domain());
        // A deterministic but scattered set, including clustered points
        // that force deep branch nodes.
        let mut points = Vec::new();
        for i in 0..200i32 {
            let x = f64::from((i * 37) % 399) - 199.0;
            let y = f64::from((i * 91) % 397) - 198.0;
            points.push(Point::new(x, y));
        }
        points.push(Point::new(10.0, 10.0));
        points.push(Point::new(10.0001, 10.0001));
        points.push(Point::new(10.0002, 10.0001));

        for &p in &points {
            tree.insert(p).expect("in bounds");
        }
        assert_compressed(&tree);

        for &p in &points {
            assert!(tree.contains(p), "lost {p:?}");
        }

        let mut stored = tree.points();
        stored.sort_by(|a, b| (a.x, a.y).partial_cmp(&(b.x, b.y)).expect("finite"));
        let mut expected: Vec<Point> = points.clone();
        expected.sort_by(|a, b| (a.x, a.y).partial_cmp(&(b.x, b.y)).expect("finite"));
        expected.dedup();
        assert_eq!(stored, expected);
    }

    #[test]
    fn range_respects_the_slack_contract() {
        let mut tree = CompressedQuadTree::new(domain());
        let points = [
            Point::new(0.0, 0.0),
            Point::new(149.0, -149.0),
            Point::new(150.0, 150.0),
            Point::new(170.0, 0.0),
            Point::new(-199.0, -199.0),
        ];
        for p in points {
            tree.insert(p).expect("in bounds");
        }

        let out = tree.range(Rect::new(-150.0, -150.0, 150.0, 150.0), 10.0);
        // Closed rectangle: all three inside points are reported.
        assert!(out.contains(&Point::new(0.0, 0.0)));
        assert!(out.contains(&Point::new(149.0, -149.0)));
        assert!(out.contains(&Point::new(150.0, 150.0)));
        // Beyond the slack band: never reported.
        assert!(!out.contains(&Point::new(170.0, 0.0)));
        assert!(!out.contains(&Point::new(-199.0, -199.0)));
    }
}
