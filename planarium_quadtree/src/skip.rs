// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The skip quadtree: a chain of compressed quadtrees.
//!
//! Level 0 stores every point; each higher level stores a geometrically
//! thinned subset, decided by a promotion coin at insertion time. Queries
//! start in the sparsest level and hand the reached mask down to the next
//! denser level, which resumes from the homologous node instead of from its
//! root — the quadtree analogue of a skip list's express lanes.

use std::collections::VecDeque;

use kurbo::{Point, Rect};

use crate::compressed::{CompressedQuadTree, NodeId, QuadNode};
use crate::mask::Mask;
use crate::sample::Sampler;
use crate::util::{contains_closed, contains_half_open, inflate, intersect, is_void};
use crate::RegionError;

/// Probability of promoting a point to the next level.
const PROMOTION_THRESHOLD: f64 = 0.5;

/// A randomised multi-level compressed quadtree.
#[derive(Clone, Debug)]
pub struct SkipQuadTree {
    bounds: Rect,
    levels: Vec<CompressedQuadTree>,
    threshold: f64,
    sampler: Sampler,
}

impl SkipQuadTree {
    /// An empty tree over `[x0, x1) × [y0, y1)`, with an entropy-seeded
    /// promotion coin.
    pub fn new(bounds: Rect) -> Self {
        Self::with_sampler(bounds, Sampler::from_entropy())
    }

    /// An empty tree whose promotion coin is deterministically seeded.
    pub fn with_seed(bounds: Rect, seed: u64) -> Self {
        Self::with_sampler(bounds, Sampler::with_seed(seed))
    }

    fn with_sampler(bounds: Rect, sampler: Sampler) -> Self {
        Self {
            bounds,
            levels: vec![CompressedQuadTree::new(bounds)],
            threshold: PROMOTION_THRESHOLD,
            sampler,
        }
    }

    /// The domain the tree covers.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of levels currently in the chain.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Every point stored at the given level (level 0 holds them all).
    pub fn points_at_level(&self, level: usize) -> Option<Vec<Point>> {
        self.levels.get(level).map(CompressedQuadTree::points)
    }

    /// Insert a point.
    ///
    /// Locates the insertion node in every level with one locator walk from
    /// the sparsest level down, inserts at level 0, then flips the
    /// promotion coin level by level until it comes up tails (growing at
    /// most one new level). Re-inserting a stored point is a structural
    /// no-op across all levels and consumes no randomness.
    pub fn insert(&mut self, p: Point) -> Result<(), RegionError> {
        if !contains_half_open(&self.bounds, p) {
            return Err(RegionError::OutOfBounds);
        }
        if self.levels[0].contains(p) {
            return Ok(());
        }

        let mut mask = Mask::root();
        let mut landing = Vec::with_capacity(self.levels.len());
        for level in self.levels.iter().rev() {
            mask = level.lowest_interesting(&mask, p);
            landing.push(mask.clone());
        }
        self.levels[0].insert_from(landing.last().expect("level 0 exists"), p);

        let mut current = 1;
        loop {
            if self.sampler.unit() >= self.threshold {
                if current == self.levels.len() {
                    let mut top = CompressedQuadTree::new(self.bounds);
                    top.insert(p).expect("bounds already checked");
                    self.levels.push(top);
                    break;
                }
                let hand_off = &landing[landing.len() - current - 1];
                self.levels[current].insert_from(hand_off, p);
                current += 1;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// The level-0 node whose box contains `p`, found via the locator walk.
    pub fn find(&self, p: Point) -> Option<&QuadNode> {
        if !contains_half_open(&self.bounds, p) {
            return None;
        }
        let mut mask = Mask::root();
        for level in self.levels.iter().rev() {
            mask = level.lowest_interesting(&mask, p);
        }
        let base = &self.levels[0];
        let start = base.node_by_mask(&mask)?;
        Some(base.node(base.find_from(start, p)))
    }

    /// Whether `p` is stored (at level 0).
    pub fn contains(&self, p: Point) -> bool {
        self.find(p).is_some_and(|n| n.point() == Some(p))
    }

    /// The node containing `p` at every level, sparsest last.
    pub fn search_all_levels(&self, p: Point) -> Vec<&QuadNode> {
        let mut result = Vec::with_capacity(self.levels.len());
        let mut mask = Mask::root();
        for level in self.levels.iter().rev() {
            mask = level.lowest_interesting(&mask, p);
            if let Some(start) = level.node_by_mask(&mask) {
                result.push(level.node(level.find_from(start, p)));
            }
        }
        result.reverse();
        result
    }

    /// Approximate rectangle report over level 0.
    pub fn range(&self, rect: Rect, eps: f64) -> Vec<Point> {
        self.range_at_level(rect, eps, 0)
    }

    /// Approximate rectangle report over the points of a given level.
    ///
    /// Breadth-first over the level's nodes; a node none of whose children
    /// refines the query (non-critical) is replaced by its lowest critical
    /// homologue, skipping the chain of redundant compressed nodes between
    /// them via the sparser levels.
    pub fn range_at_level(&self, rect: Rect, eps: f64, level: usize) -> Vec<Point> {
        let mut out = Vec::new();
        let Some(tree) = self.levels.get(level) else {
            return out;
        };
        if is_void(&intersect(&tree.node(tree.root_id()).rect(), &rect)) {
            return out;
        }

        let eps_rect = inflate(&rect, eps);
        let mut queue = VecDeque::new();
        queue.push_back(tree.root_id());

        while let Some(n) = queue.pop_front() {
            let node = tree.node(n);
            let quad = node.rect();

            if node.is_leaf() {
                if let Some(p) = node.point() {
                    if contains_closed(&rect, p) {
                        out.push(p);
                    }
                }
            } else if intersect(&eps_rect, &quad) == quad {
                tree.collect_subtree(n, &mut out);
            } else if !is_critical(tree, &eps_rect, &quad, n) {
                queue.push_back(self.lowest_critical(&eps_rect, &quad, node.mask(), level));
            } else {
                for child in node_children(tree, n) {
                    if !is_void(&intersect(&tree.node(child).rect(), &rect)) {
                        queue.push_back(child);
                    }
                }
            }
        }
        out
    }

    /// Starting from the node registered under `mask` at the query level,
    /// find the deepest non-critical descendant chain end, using sparser
    /// levels to leapfrog runs of redundant nodes.
    fn lowest_critical(
        &self,
        eps_rect: &Rect,
        quad_rect: &Rect,
        mask: &Mask,
        level: usize,
    ) -> NodeId {
        let mut resume = level;
        for i in (level + 1..self.levels.len()).rev() {
            if let Some(n) = self.levels[i].node_by_mask(mask) {
                if !is_critical(&self.levels[i], eps_rect, quad_rect, n) {
                    resume = i;
                    break;
                }
            }
        }

        let mut last = self.levels[resume]
            .node_by_mask(mask)
            .expect("homologous mask exists at the resume level");
        loop {
            let tree = &self.levels[resume];
            let mut step_down_level = true;
            for child in node_children(tree, last) {
                let child_rect = tree.node(child).rect();
                if intersect(&child_rect, eps_rect) == intersect(quad_rect, eps_rect) {
                    if resume == level {
                        step_down_level = false;
                        last = child;
                    } else if !tree.node(child).is_leaf() {
                        step_down_level = false;
                        last = child;
                    }
                    break;
                }
            }

            if step_down_level {
                if resume == level {
                    break;
                }
                resume -= 1;
                last = self.levels[resume]
                    .node_by_mask(mask)
                    .expect("homologous mask exists at denser levels");
            }
        }
        last
    }
}

/// The existing children of a node, in quadrant order.
fn node_children(tree: &CompressedQuadTree, n: NodeId) -> Vec<NodeId> {
    (0..4_u8)
        .filter_map(|i| tree.node(n).child(i))
        .collect()
}

/// A node is critical when none of its children covers the same restricted
/// query rectangle, i.e. splitting further actually discriminates.
fn is_critical(tree: &CompressedQuadTree, eps_rect: &Rect, quad_rect: &Rect, n: NodeId) -> bool {
    for child in node_children(tree, n) {
        let child_rect = tree.node(child).rect();
        if intersect(&child_rect, eps_rect) == intersect(quad_rect, eps_rect) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn domain() -> Rect {
        Rect::new(-200.0, -200.0, 200.0, 200.0)
    }

    fn key(p: Point) -> (u64, u64) {
        (p.x.to_bits(), p.y.to_bits())
    }

    #[test]
    fn every_inserted_point_is_findable() {
        let mut tree = SkipQuadTree::with_seed(domain(), 11);
        let points = Sampler::with_seed(23).points_in(domain(), 1000);
        for &p in &points {
            tree.insert(p).expect("in bounds");
        }
        for &p in &points {
            assert!(tree.contains(p), "lost {p:?}");
            let levels = tree.search_all_levels(p);
            assert_eq!(levels.len(), tree.level_count());
            assert_eq!(levels[0].point(), Some(p));
        }
    }

    #[test]
    fn levels_form_a_descending_chain() {
        let mut tree = SkipQuadTree::with_seed(domain(), 5);
        for p in Sampler::with_seed(29).points_in(domain(), 2000) {
            tree.insert(p).expect("in bounds");
        }

        assert!(tree.level_count() > 1, "promotions happened");
        let mut prev: Option<HashSet<(u64, u64)>> = None;
        for level in 0..tree.level_count() {
            let pts: HashSet<_> = tree
                .points_at_level(level)
                .expect("level exists")
                .into_iter()
                .map(key)
                .collect();
            if let Some(prev) = &prev {
                assert!(
                    pts.is_subset(prev),
                    "level {level} is not a subset of level {}",
                    level - 1
                );
                assert!(pts.len() <= prev.len());
            }
            prev = Some(pts);
        }
    }

    #[test]
    fn duplicate_insert_is_a_structural_no_op() {
        let mut tree = SkipQuadTree::with_seed(domain(), 3);
        for p in Sampler::with_seed(31).points_in(domain(), 200) {
            tree.insert(p).expect("in bounds");
        }
        let p = Point::new(12.5, -40.25);
        tree.insert(p).expect("in bounds");

        let snapshot = tree.levels.clone();
        tree.insert(p).expect("in bounds");
        assert_eq!(tree.levels, snapshot);
    }

    #[test]
    fn out_of_bounds_points_are_rejected() {
        let mut tree = SkipQuadTree::with_seed(domain(), 1);
        assert_eq!(
            tree.insert(Point::new(1000.0, 0.0)),
            Err(RegionError::OutOfBounds)
        );
        assert_eq!(tree.level_count(), 1);
        assert!(tree.points_at_level(0).expect("level 0").is_empty());
    }

    #[test]
    fn range_honours_the_slack_contract_on_uniform_points() {
        let mut tree = SkipQuadTree::with_seed(domain(), 17);
        let points = Sampler::with_seed(99).points_in(domain(), 10_000);
        for &p in &points {
            tree.insert(p).expect("in bounds");
        }

        let rect = Rect::new(-150.0, -150.0, 150.0, 150.0);
        let eps = 10.0;
        let out = tree.range(rect, eps);

        let reported: HashSet<_> = out.iter().copied().map(key).collect();
        assert_eq!(reported.len(), out.len(), "output has duplicates");

        for &p in &points {
            let inside = p.x.abs() <= 150.0 && p.y.abs() <= 150.0;
            let beyond = p.x.abs() > 160.0 || p.y.abs() > 160.0;
            if inside {
                assert!(reported.contains(&key(p)), "missed inner point {p:?}");
            }
            if beyond {
                assert!(!reported.contains(&key(p)), "leaked outer point {p:?}");
            }
        }
    }

    #[test]
    fn range_at_sparser_levels_reports_only_stored_points() {
        let mut tree = SkipQuadTree::with_seed(domain(), 41);
        for p in Sampler::with_seed(43).points_in(domain(), 3000) {
            tree.insert(p).expect("in bounds");
        }

        let rect = Rect::new(-100.0, -100.0, 100.0, 100.0);
        for level in 0..tree.level_count() {
            let stored: HashSet<_> = tree
                .points_at_level(level)
                .expect("level exists")
                .into_iter()
                .map(key)
                .collect();
            for p in tree.range_at_level(rect, 5.0, level) {
                assert!(stored.contains(&key(p)));
                assert!(p.x.abs() <= 105.0 && p.y.abs() <= 105.0);
            }
        }
    }
}
