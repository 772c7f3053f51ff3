// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planarium: planar point location and approximate range search.
//!
//! This crate is the query surface over two independent subsystems:
//!
//! - [`Arrangement`] answers "which face of this arrangement of lines
//!   contains the point?" — either naively over the DCEL or in expected
//!   logarithmic time through a Kirkpatrick triangulation hierarchy.
//! - [`PointIndex`] answers approximate rectangle queries over a planar
//!   point set through a randomised skip-compressed quadtree.
//!
//! Both rest on an exact predicate kernel (re-exported from
//! [`planarium_predicates`]) that decides every sign with a
//! float → interval → big-rational cascade, so the combinatorial structure
//! is immune to rounding.
//!
//! The member crates are usable on their own; this facade re-exports their
//! public types so that collaborators (viewers, data loaders, classifiers)
//! can depend on a single crate.
//!
//! # Point location
//!
//! ```rust
//! use planarium::{Arrangement, Line, Point};
//!
//! let mut arr = Arrangement::new(
//!     Line::new(0.0, -1.0, 0.0), // y = 0
//!     Line::new(1.0, 0.0, 0.0),  // x = 0
//! )
//! .expect("seed lines cross");
//! arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");
//!
//! arr.build_hierarchy();
//! let face = arr.locate_fast(Point::new(1.0, 1.0)).expect("inside the hull");
//! let naive = arr.locate_naive(Point::new(1.0, 1.0)).expect("some face");
//! let _ = (face, naive);
//! ```
//!
//! # Range search
//!
//! ```rust
//! use planarium::{Point, PointIndex, Rect};
//!
//! let mut index = PointIndex::new(Rect::new(-200.0, -200.0, 200.0, 200.0));
//! for p in [
//!     Point::new(0.0, 0.0),
//!     Point::new(100.0, 100.0),
//!     Point::new(-50.0, 30.0),
//! ] {
//!     index.insert(p).expect("in bounds");
//! }
//! let hits = index.range(Rect::new(-150.0, -150.0, 150.0, 150.0), 10.0);
//! assert_eq!(hits.len(), 3);
//! ```

pub use kurbo::{Point, Rect};
pub use planarium_arrangement::{
    Arrangement, ArrangementError, Dcel, EdgeFlags, EdgeId, LocateError, TriId, VertexId,
};
pub use planarium_predicates::{Orientation, Sign};
pub use planarium_primitives::{Line, LineCross, LineTriangle};
pub use planarium_quadtree::{
    CompressedQuadTree, Mask, PointIndex, QuadNode, QuadTree, RegionError, Sampler, SkipQuadTree,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_subsystems_compose() {
        let mut arr = Arrangement::new(Line::new(0.0, -1.0, 0.0), Line::new(1.0, 0.0, 0.0))
            .expect("seed lines cross");
        arr.add_line(Line::new(1.0, -1.0, 50.0)).expect("general position");
        arr.build_hierarchy();

        let mut index = PointIndex::with_seed(Rect::new(-200.0, -200.0, 200.0, 200.0), 2);
        let mut sampler = Sampler::with_seed(4);
        // Sampling box chosen inside the hierarchy's bounding triangle, so
        // the fast locator is defined for every sample.
        for p in sampler.points_in(Rect::new(-150.0, -150.0, 90.0, 90.0), 64) {
            index.insert(p).expect("in bounds");

            // Every indexed point also lies in some face of the
            // arrangement.
            assert!(arr.locate_naive(p).is_some());
            assert!(arr.locate_fast(p).is_ok());
        }
        assert_eq!(index.points().len(), 64);
    }
}
