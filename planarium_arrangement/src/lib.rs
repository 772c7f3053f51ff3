// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planarium Arrangement: point location over arrangements of lines.
//!
//! An [`Arrangement`] maintains the planar subdivision induced by a growing
//! set of lines as a doubly-connected edge list ([`Dcel`]), and optionally a
//! Kirkpatrick triangulation hierarchy for fast queries.
//!
//! - [`Arrangement::add_line`] inserts a line incrementally, splitting each
//!   crossed edge locally.
//! - [`Arrangement::locate_naive`] answers "which face contains this point?"
//!   by breadth-first search over the DCEL — linear, simple, and the
//!   reference for tests.
//! - [`Arrangement::build_hierarchy`] clips the arrangement to a bounding
//!   triangle, triangulates it, and coarsens level by level; after that
//!   [`Arrangement::locate_fast`] descends the triangle DAG in expected
//!   logarithmic time.
//!
//! All topological decisions route through the exact predicate cascade of
//! `planarium_predicates`; coordinates are only accepted at the query
//! boundary. Lines must be in general position: no two parallel (checked)
//! and no three through one point (the caller's obligation).
//!
//! # Example
//!
//! ```rust
//! use planarium_arrangement::Arrangement;
//! use planarium_primitives::{Line, Point};
//!
//! let mut arr = Arrangement::new(
//!     Line::new(0.0, -1.0, 0.0), // y = 0
//!     Line::new(1.0, 0.0, 0.0),  // x = 0
//! )
//! .expect("seed lines cross");
//! arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");
//!
//! let face = arr.locate_naive(Point::new(1.0, 1.0));
//! assert!(face.is_some());
//!
//! arr.build_hierarchy();
//! assert!(arr.locate_fast(Point::new(1.0, 1.0)).is_ok());
//! ```

mod dcel;
mod hierarchy;
mod types;

pub use dcel::Dcel;
pub use types::{EdgeFlags, EdgeId, TriId, VertexId};

use hierarchy::Hierarchy;
use kurbo::Point;
use planarium_predicates::{Sign, sign_det2};
use planarium_primitives::Line;

/// Precondition violations when mutating an arrangement.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ArrangementError {
    /// The line is parallel to a line already in the arrangement.
    #[error("line is parallel to a line already in the arrangement")]
    ParallelLine,
}

/// Failures of the fast locator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LocateError {
    /// The hierarchy was never built, or lines were added since it was.
    #[error("hierarchy is stale; call build_hierarchy first")]
    StaleHierarchy,
    /// The query point lies outside the bounding triangle of the hierarchy.
    #[error("query point lies outside the bounding triangle")]
    OutsideHull,
    /// The descent stalled; the input violated the general-position
    /// precondition when the hierarchy was built.
    #[error("hierarchy descent stalled on degenerate input")]
    Degenerate,
}

/// A line arrangement with naive and hierarchical point location.
#[derive(Clone, Debug)]
pub struct Arrangement {
    dcel: Dcel,
    hierarchy: Option<Hierarchy>,
}

impl Arrangement {
    /// Start an arrangement from two non-parallel seed lines.
    pub fn new(line1: Line, line2: Line) -> Result<Self, ArrangementError> {
        if parallel(&line1, &line2) {
            return Err(ArrangementError::ParallelLine);
        }
        Ok(Self {
            dcel: Dcel::from_seed_pair(line1, line2),
            hierarchy: None,
        })
    }

    /// Insert a line. Invalidates a previously built hierarchy.
    pub fn add_line(&mut self, line: Line) -> Result<(), ArrangementError> {
        if self.dcel.lines().iter().any(|l| parallel(l, &line)) {
            return Err(ArrangementError::ParallelLine);
        }
        self.hierarchy = None;
        self.dcel.add_line(line);
        Ok(())
    }

    /// Build (or rebuild) the point-location hierarchy for the current
    /// lines.
    pub fn build_hierarchy(&mut self) {
        self.hierarchy = Some(Hierarchy::build(self.dcel.lines()));
    }

    /// Naive point location on the unbounded DCEL. Returns a half-edge of
    /// the containing face, or `None` if no face admits the point.
    pub fn locate_naive(&self, p: Point) -> Option<EdgeId> {
        self.dcel.face_by_point(p)
    }

    /// Hierarchical point location. Returns a half-edge of the containing
    /// level-0 triangle (see [`Arrangement::triangulated_dcel`]).
    pub fn locate_fast(&self, p: Point) -> Result<EdgeId, LocateError> {
        self.hierarchy
            .as_ref()
            .ok_or(LocateError::StaleHierarchy)?
            .locate(p)
    }

    /// Every half-edge of the unbounded DCEL crossed by `line`, in
    /// traversal order.
    pub fn intersected_edges(&self, line: &Line) -> Vec<EdgeId> {
        self.dcel.intersected_edges(line)
    }

    /// The unbounded DCEL.
    pub fn dcel(&self) -> &Dcel {
        &self.dcel
    }

    /// The lines inserted so far, in insertion order.
    pub fn lines(&self) -> &[Line] {
        self.dcel.lines()
    }

    /// The hull-clipped, untriangulated DCEL of the built hierarchy.
    pub fn hulled_dcel(&self) -> Option<&Dcel> {
        self.hierarchy.as_ref().map(|h| &h.hulled)
    }

    /// The level-0 (fan-triangulated) DCEL that fast-locate results index
    /// into.
    pub fn triangulated_dcel(&self) -> Option<&Dcel> {
        self.hierarchy.as_ref().map(Hierarchy::base_dcel)
    }

    /// Number of triangulation levels, zero before the hierarchy is built.
    pub fn level_count(&self) -> usize {
        self.hierarchy.as_ref().map_or(0, |h| h.levels.len())
    }

    /// The DCEL snapshot of a given triangulation level.
    pub fn level_dcel(&self, level: usize) -> Option<&Dcel> {
        self.hierarchy
            .as_ref()
            .and_then(|h| h.levels.get(level))
            .map(|l| &l.dcel)
    }

    /// Vertices removed while coarsening each level, for visualisation and
    /// tests. Empty before the hierarchy is built.
    pub fn deleted_vertices(&self) -> &[Vec<VertexId>] {
        self.hierarchy.as_ref().map_or(&[], |h| h.deleted.as_slice())
    }
}

fn parallel(a: &Line, b: &Line) -> bool {
    sign_det2(a.a, a.b, b.a, b.b) == Sign::Zero
}

#[cfg(test)]
mod tests {
    use super::*;
    use planarium_predicates::Orientation;

    fn quadrants() -> Arrangement {
        Arrangement::new(Line::new(0.0, -1.0, 0.0), Line::new(1.0, 0.0, 0.0))
            .expect("axes cross")
    }

    fn assert_face_admits(dcel: &Dcel, e: EdgeId, p: Point) {
        let mut f = e;
        loop {
            assert_ne!(
                dcel.edge_orientation(f, p),
                Orientation::Right,
                "face boundary excludes the query point"
            );
            f = dcel.next(f);
            if f == e {
                break;
            }
        }
    }

    #[test]
    fn locate_in_two_line_arrangement() {
        let arr = quadrants();
        let e = arr.locate_naive(Point::new(1.0, 1.0)).expect("face");
        let dcel = arr.dcel();

        // The upper-right wedge: two rays meeting at the origin, cycle
        // closed through the infinite vertex.
        assert_eq!(dcel.face_len(e), 2);
        assert!(dcel.face_is_unbounded(e));
        assert_face_admits(dcel, e, Point::new(1.0, 1.0));
    }

    #[test]
    fn parallel_lines_are_rejected() {
        assert!(matches!(
            Arrangement::new(Line::new(0.0, 1.0, 0.0), Line::new(0.0, 2.0, 5.0)),
            Err(ArrangementError::ParallelLine)
        ));

        let mut arr = quadrants();
        // Parallel to the seed y = 0, including with flipped orientation.
        assert_eq!(
            arr.add_line(Line::new(0.0, 1.0, 7.0)),
            Err(ArrangementError::ParallelLine)
        );
        assert_eq!(arr.lines().len(), 2);
        assert!(arr.add_line(Line::new(1.0, -1.0, 50.0)).is_ok());
    }

    #[test]
    fn three_lines_make_six_wedges_and_one_bounded_face() {
        let mut arr = quadrants();
        arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");

        let dcel = arr.dcel();
        let faces = dcel.face_representatives();
        let unbounded = faces.iter().filter(|&&f| dcel.face_is_unbounded(f)).count();
        assert_eq!(unbounded, 6);
        assert_eq!(faces.len(), 7);
    }

    #[test]
    fn fast_locate_requires_a_built_hierarchy() {
        let mut arr = quadrants();
        assert_eq!(
            arr.locate_fast(Point::new(1.0, 1.0)),
            Err(LocateError::StaleHierarchy)
        );

        arr.build_hierarchy();
        assert!(arr.locate_fast(Point::new(1.0, 1.0)).is_ok());

        // Adding a line invalidates the hierarchy again.
        arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");
        assert_eq!(
            arr.locate_fast(Point::new(1.0, 1.0)),
            Err(LocateError::StaleHierarchy)
        );
    }

    #[test]
    fn fast_locate_returns_a_containing_triangle() {
        let mut arr = quadrants();
        arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");
        arr.add_line(Line::new(1.0, 1.0, 30.0)).expect("general position");
        arr.build_hierarchy();

        let tri_dcel = arr.triangulated_dcel().expect("hierarchy built");
        for p in [
            Point::new(1.0, 1.0),
            Point::new(-100.0, 3.0),
            Point::new(10.0, -90.0),
            Point::new(-40.0, -12.0),
            Point::new(17.0, 23.0),
        ] {
            let e = arr.locate_fast(p).expect("point inside the hull");
            assert_eq!(tri_dcel.face_len(e), 3, "leaf faces are triangles");
            assert_face_admits(tri_dcel, e, p);

            // Agreement with the naive locator: both faces admit the point.
            let naive = arr.locate_naive(p).expect("naive face");
            assert_face_admits(arr.dcel(), naive, p);
        }
    }

    #[test]
    fn fast_locate_rejects_points_outside_the_hull() {
        let mut arr = quadrants();
        arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");
        arr.build_hierarchy();

        // The bounding triangle is grown from finite shift steps; a point
        // far beyond them is outside.
        assert_eq!(
            arr.locate_fast(Point::new(1e7, 1e7)),
            Err(LocateError::OutsideHull)
        );
    }

    #[test]
    fn hierarchy_root_covers_every_leaf() {
        let mut arr = quadrants();
        arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");
        arr.build_hierarchy();

        let h = arr.hierarchy.as_ref().expect("hierarchy built");
        let root = h.root.expect("root exists");

        // Depth-first walk of the DAG from the root.
        let mut reachable = vec![false; h.nodes.len()];
        let mut stack = vec![root];
        while let Some(t) = stack.pop() {
            if reachable[t.idx()] {
                continue;
            }
            reachable[t.idx()] = true;
            for &c in &h.nodes[t.idx()].children {
                stack.push(c);
            }
        }

        for (i, node) in h.nodes.iter().enumerate() {
            if node.leaf {
                assert!(reachable[i], "leaf {i} not covered by the root");
            }
        }
    }

    #[test]
    fn hierarchy_levels_shrink_and_record_deletions() {
        let mut arr = quadrants();
        arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");
        arr.add_line(Line::new(1.0, 1.0, 30.0)).expect("general position");
        arr.build_hierarchy();

        assert!(arr.level_count() >= 2, "coarsening happened");
        let total_deleted: usize = arr.deleted_vertices().iter().map(Vec::len).sum();
        assert!(total_deleted > 0, "interior vertices were removed");

        // The hulled DCEL and level 0 are well-formed; level 0 additionally
        // has every interior face triangulated.
        assert!(arr.hulled_dcel().expect("hulled").well_formed());
        let tri = arr.triangulated_dcel().expect("level 0");
        assert!(tri.well_formed());
        for f in tri.face_representatives() {
            let hull_cycle = {
                let mut any_hull = false;
                let mut e = f;
                loop {
                    if tri.flags_of(e).contains(EdgeFlags::HULL) {
                        any_hull = true;
                    }
                    e = tri.next(e);
                    if e == f {
                        break;
                    }
                }
                any_hull
            };
            if !hull_cycle {
                assert_eq!(tri.face_len(f), 3, "interior faces are triangles");
            }
        }
    }

    #[test]
    fn intersected_edges_cross_the_probe_line() {
        let mut arr = quadrants();
        arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");

        let probe = Line::new(1.0, 2.0, 5.0);
        let crossed = arr.intersected_edges(&probe);
        assert!(!crossed.is_empty());
        for &e in &crossed {
            assert!(arr.dcel().edge_crossed_by(&probe, e));
        }
    }
}
