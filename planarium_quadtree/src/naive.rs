// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The naive quadtree: plain recursive subdivision.

use kurbo::{Point, Rect};

use crate::RegionError;
use crate::util::{contains_closed, contains_half_open, inflate, intersect, is_void, quadrant};

/// A quadtree node holding at most one point per leaf.
///
/// On the second insertion into a leaf, the node splits into four quadrant
/// children and redistributes. Removal collapses any internal node whose
/// children have become empty leaves (at most one point among them) back
/// into a leaf, so the structure shrinks with its contents.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadTree {
    rect: Rect,
    point: Option<Point>,
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    /// An empty tree over the half-open domain `[x0, x1) × [y0, y1)`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            rect: bounds,
            point: None,
            children: None,
        }
    }

    /// The node's box.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The stored point, for leaves that hold one.
    pub fn point(&self) -> Option<Point> {
        self.point
    }

    /// Whether the node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Insert a point. Duplicates are no-ops; points outside the domain are
    /// rejected.
    pub fn insert(&mut self, p: Point) -> Result<(), RegionError> {
        if !contains_half_open(&self.rect, p) {
            return Err(RegionError::OutOfBounds);
        }
        self.insert_inner(p);
        Ok(())
    }

    fn insert_inner(&mut self, p: Point) {
        if !contains_half_open(&self.rect, p) {
            return;
        }

        if self.children.is_none() {
            match self.point {
                None => {
                    self.point = Some(p);
                    return;
                }
                Some(q) if q == p => return,
                Some(q) => {
                    let rect = self.rect;
                    self.children = Some(Box::new([
                        Self::new(quadrant(rect, 0)),
                        Self::new(quadrant(rect, 1)),
                        Self::new(quadrant(rect, 2)),
                        Self::new(quadrant(rect, 3)),
                    ]));
                    self.point = None;
                    self.insert_inner(q);
                }
            }
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                child.insert_inner(p);
            }
        }
    }

    /// The deepest node whose box contains `p`: a leaf, which may or may
    /// not store the point.
    pub fn find(&self, p: Point) -> Option<&Self> {
        if !contains_half_open(&self.rect, p) {
            return None;
        }
        self.find_inner(p)
    }

    fn find_inner(&self, p: Point) -> Option<&Self> {
        match &self.children {
            None => Some(self),
            Some(children) => children
                .iter()
                .find(|c| contains_half_open(&c.rect, p))
                .and_then(|c| c.find_inner(p)),
        }
    }

    /// Remove a point if present, collapsing emptied subdivisions.
    pub fn remove(&mut self, p: Point) {
        if !contains_half_open(&self.rect, p) {
            return;
        }

        let Some(children) = self.children.as_mut() else {
            if self.point == Some(p) {
                self.point = None;
            }
            return;
        };

        for child in children.iter_mut() {
            if contains_half_open(&child.rect, p) {
                child.remove(p);
            }
        }

        let mut all_leaves = true;
        let mut stored = 0usize;
        let mut last = None;
        for child in children.iter() {
            if child.children.is_none() {
                if let Some(q) = child.point {
                    stored += 1;
                    last = Some(q);
                }
            } else {
                all_leaves = false;
            }
        }

        if all_leaves && stored <= 1 {
            self.children = None;
            self.point = last;
        }
    }

    /// Approximate rectangle report: every point in the closed `rect` is
    /// returned, no point outside `rect` grown by `eps` is, and points in
    /// the slack band may or may not be.
    pub fn range(&self, rect: Rect, eps: f64) -> Vec<Point> {
        let mut out = Vec::new();
        self.range_into(&rect, eps, &mut out);
        out
    }

    fn range_into(&self, rect: &Rect, eps: f64, out: &mut Vec<Point>) {
        let Some(children) = self.children.as_ref() else {
            if let Some(p) = self.point {
                if contains_closed(rect, p) {
                    out.push(p);
                }
            }
            return;
        };

        let eps_rect = inflate(rect, eps);
        for child in children.iter() {
            let quad = child.rect;
            if intersect(&eps_rect, &quad) == quad {
                child.collect_into(out);
            } else if !is_void(&intersect(rect, &quad)) {
                child.range_into(rect, eps, out);
            }
        }
    }

    fn collect_into(&self, out: &mut Vec<Point>) {
        match &self.children {
            None => {
                if let Some(p) = self.point {
                    out.push(p);
                }
            }
            Some(children) => {
                for child in children.iter() {
                    child.collect_into(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Rect {
        Rect::new(-200.0, -200.0, 200.0, 200.0)
    }

    #[test]
    fn find_returns_the_leaf_with_the_stored_point() {
        let mut tree = QuadTree::new(domain());
        for p in [
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(-50.0, 30.0),
        ] {
            tree.insert(p).expect("inside the domain");
        }

        let node = tree.find(Point::new(0.0, 0.0)).expect("leaf exists");
        assert!(node.is_leaf());
        assert_eq!(node.point(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn out_of_bounds_points_are_rejected() {
        let mut tree = QuadTree::new(domain());
        assert_eq!(
            tree.insert(Point::new(200.0, 0.0)),
            Err(RegionError::OutOfBounds)
        );
        assert_eq!(tree, QuadTree::new(domain()));
    }

    #[test]
    fn double_insert_is_idempotent() {
        let mut tree = QuadTree::new(domain());
        tree.insert(Point::new(3.0, 4.0)).expect("in bounds");
        tree.insert(Point::new(-7.0, 11.0)).expect("in bounds");

        let snapshot = tree.clone();
        tree.insert(Point::new(3.0, 4.0)).expect("in bounds");
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn removal_collapses_emptied_subdivisions() {
        let mut tree = QuadTree::new(domain());
        tree.insert(Point::new(10.0, 10.0)).expect("in bounds");
        tree.insert(Point::new(12.0, 10.0)).expect("in bounds");
        assert!(!tree.is_leaf());

        tree.remove(Point::new(12.0, 10.0));

        // One point left: the structure folds back to what inserting only
        // that point would have built.
        let mut expected = QuadTree::new(domain());
        expected.insert(Point::new(10.0, 10.0)).expect("in bounds");
        assert_eq!(tree, expected);

        tree.remove(Point::new(10.0, 10.0));
        assert_eq!(tree, QuadTree::new(domain()));
    }

    #[test]
    fn removing_an_absent_point_changes_nothing() {
        let mut tree = QuadTree::new(domain());
        tree.insert(Point::new(10.0, 10.0)).expect("in bounds");
        let snapshot = tree.clone();
        tree.remove(Point::new(99.0, 99.0));
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn range_reports_inner_points_and_respects_slack() {
        let mut tree = QuadTree::new(domain());
        let inside = Point::new(-10.0, 20.0);
        let far = Point::new(180.0, -180.0);
        tree.insert(inside).expect("in bounds");
        tree.insert(far).expect("in bounds");
        tree.insert(Point::new(40.0, 40.0)).expect("in bounds");

        let out = tree.range(Rect::new(-50.0, -50.0, 50.0, 50.0), 5.0);
        assert!(out.contains(&inside));
        assert!(out.contains(&Point::new(40.0, 40.0)));
        assert!(!out.contains(&far));
    }
}
