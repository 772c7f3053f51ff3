// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planarium Quadtree: planar point indexing with approximate range
//! queries.
//!
//! Three structures over a fixed half-open domain `[x0, x1) × [y0, y1)`:
//!
//! - [`QuadTree`] — naive recursive subdivision, at most one point per
//!   leaf, with deletion via structural collapse. The simplest baseline.
//! - [`CompressedQuadTree`] — single-child chains elided; every node is
//!   addressed by its [`Mask`] (the quadrant path from the root), which a
//!   top-level map resolves in O(1).
//! - [`SkipQuadTree`] — a chain of compressed quadtrees, each level a
//!   geometrically thinned subset of the one below (promotion probability
//!   ½). Point location and range queries use the sparse levels as express
//!   lanes for expected logarithmic descents.
//!
//! [`PointIndex`] is the facade most callers want: a skip quadtree with
//! checked insertion, point lookup, and rectangle reporting.
//!
//! # The ε-contract
//!
//! Rectangle queries take a closed query rectangle `R` and a slack `eps`,
//! and report points such that
//!
//! - every stored point inside `R` is reported,
//! - no stored point outside `R` grown by `eps` on each side is reported,
//! - points in the slack band may or may not be reported,
//!
//! and the output is duplicate-free. The slack is what lets the skip
//! structure skip chains of compressed nodes that cannot change the answer.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use planarium_quadtree::PointIndex;
//!
//! let mut index = PointIndex::new(Rect::new(-200.0, -200.0, 200.0, 200.0));
//! index.insert(Point::new(0.0, 0.0)).expect("in bounds");
//! index.insert(Point::new(100.0, 100.0)).expect("in bounds");
//! index.insert(Point::new(-50.0, 30.0)).expect("in bounds");
//!
//! let node = index.find(Point::new(0.0, 0.0)).expect("indexed");
//! assert_eq!(node.point(), Some(Point::new(0.0, 0.0)));
//!
//! let hits = index.range(Rect::new(-60.0, -10.0, 10.0, 40.0), 1.0);
//! assert!(hits.contains(&Point::new(0.0, 0.0)));
//! assert!(hits.contains(&Point::new(-50.0, 30.0)));
//! ```

mod compressed;
mod mask;
mod naive;
mod sample;
mod skip;
pub(crate) mod util;

pub use compressed::{CompressedQuadTree, QuadNode};
pub use mask::Mask;
pub use naive::QuadTree;
pub use sample::Sampler;
pub use skip::SkipQuadTree;

use kurbo::{Point, Rect};

/// Precondition violations when mutating a point structure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RegionError {
    /// The point lies outside the structure's domain box.
    #[error("point lies outside the index bounds")]
    OutOfBounds,
}

/// The public point-index surface: a skip quadtree behind a small facade.
#[derive(Clone, Debug)]
pub struct PointIndex {
    tree: SkipQuadTree,
}

impl PointIndex {
    /// An empty index over the half-open domain box.
    pub fn new(bounds: Rect) -> Self {
        Self {
            tree: SkipQuadTree::new(bounds),
        }
    }

    /// An empty index with a deterministically seeded level coin.
    pub fn with_seed(bounds: Rect, seed: u64) -> Self {
        Self {
            tree: SkipQuadTree::with_seed(bounds, seed),
        }
    }

    /// The domain the index covers.
    pub fn bounds(&self) -> Rect {
        self.tree.bounds()
    }

    /// Insert a point. Idempotent on duplicates; points outside the domain
    /// are rejected.
    pub fn insert(&mut self, p: Point) -> Result<(), RegionError> {
        self.tree.insert(p)
    }

    /// The node whose box contains `p`.
    pub fn find(&self, p: Point) -> Option<&QuadNode> {
        self.tree.find(p)
    }

    /// Whether `p` is stored.
    pub fn contains(&self, p: Point) -> bool {
        self.tree.contains(p)
    }

    /// Approximate rectangle report (see the crate-level ε-contract).
    pub fn range(&self, rect: Rect, eps: f64) -> Vec<Point> {
        self.tree.range(rect, eps)
    }

    /// Every stored point.
    pub fn points(&self) -> Vec<Point> {
        self.tree
            .points_at_level(0)
            .expect("level 0 always exists")
    }

    /// Access to the underlying skip structure.
    pub fn skip_tree(&self) -> &SkipQuadTree {
        &self.tree
    }
}
