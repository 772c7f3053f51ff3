// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Containment and intersection tests on crossing-defined triangles.

use kurbo::Point;
use planarium_primitives::{Line, LineTriangle};

use crate::{Orientation, Sign, point_segment_orientation, turn, x_diff};

/// Whether the plain coordinate point `p` lies in the closed triangle `t`.
///
/// The triangle is assumed counterclockwise; "not strictly right of any
/// directed boundary edge" is the containment rule, so boundary points are
/// inside.
pub fn triangle_contains_point(t: &LineTriangle, p: Point) -> bool {
    for i in 0..3 {
        let a = t.corner(i);
        let b = t.corner(i + 1);
        if point_segment_orientation(&a.l1, &a.l2, &b.l1, &b.l2, p) == Orientation::Right {
            return false;
        }
    }
    true
}

/// Whether the line-defined point `l1 ∩ l2` lies strictly inside `t`.
///
/// Used during retriangulation to keep the removed star vertex out of
/// candidate ears; boundary points are outside.
pub fn triangle_contains_star_point(t: &LineTriangle, l1: &Line, l2: &Line) -> bool {
    for i in 0..3 {
        let a = t.corner(i);
        let b = t.corner(i + 1);
        if turn(&a.l1, &a.l2, &b.l1, &b.l2, l1, l2) != Orientation::Left {
            return false;
        }
    }
    true
}

/// Whether the line-defined point `l1 ∩ l2` lies in the closed triangle `t`.
pub fn triangle_contains_convex_point(t: &LineTriangle, l1: &Line, l2: &Line) -> bool {
    for i in 0..3 {
        let a = t.corner(i);
        let b = t.corner(i + 1);
        if turn(&a.l1, &a.l2, &b.l1, &b.l2, l1, l2) == Orientation::Right {
            return false;
        }
    }
    true
}

/// Whether two crossing-defined triangles overlap.
///
/// Resolves to three sub-tests: a corner of one inside the other (both
/// ways), then a proper crossing between any pair of boundary segments,
/// including the collinear-overlap case decided by `x`-coordinate order.
pub fn triangles_intersect(t1: &LineTriangle, t2: &LineTriangle) -> bool {
    for i in 0..3 {
        let c = t2.corner(i);
        if triangle_contains_convex_point(t1, &c.l1, &c.l2) {
            return true;
        }
    }

    for i in 0..3 {
        let c = t1.corner(i);
        if triangle_contains_convex_point(t2, &c.l1, &c.l2) {
            return true;
        }
    }

    for i in 0..3 {
        for j in 0..3 {
            let (a1, a2) = (t1.corner(i), t1.corner(i + 1));
            let (b1, b2) = (t2.corner(j), t2.corner(j + 1));

            let turn1 = turn(&a1.l1, &a1.l2, &a2.l1, &a2.l2, &b1.l1, &b1.l2);
            let turn2 = turn(&a1.l1, &a1.l2, &a2.l1, &a2.l2, &b2.l1, &b2.l2);

            if turn1 == turn2 && turn1 == Orientation::Collinear {
                // Both segments on one line: order each by x and test the
                // four endpoint-between-bounds combinations.
                let (mut min1, mut max1) = (a1, a2);
                if x_diff(&min1.l1, &min1.l2, &max1.l1, &max1.l2) == Sign::Positive {
                    core::mem::swap(&mut min1, &mut max1);
                }
                let (mut min2, mut max2) = (b1, b2);
                if x_diff(&min2.l1, &min2.l2, &max2.l1, &max2.l2) == Sign::Positive {
                    core::mem::swap(&mut min2, &mut max2);
                }

                let between = |p: &planarium_primitives::LineCross,
                               lo: &planarium_primitives::LineCross,
                               hi: &planarium_primitives::LineCross| {
                    x_diff(&p.l1, &p.l2, &lo.l1, &lo.l2) != Sign::Negative
                        && x_diff(&p.l1, &p.l2, &hi.l1, &hi.l2) != Sign::Positive
                };

                if between(b1, min1, max1)
                    || between(b2, min1, max1)
                    || between(a1, min2, max2)
                    || between(a2, min2, max2)
                {
                    return true;
                }
            } else if turn1 != turn2 {
                let turn3 = turn(&b1.l1, &b1.l2, &b2.l1, &b2.l2, &a1.l1, &a1.l2);
                let turn4 = turn(&b1.l1, &b1.l2, &b2.l1, &b2.l2, &a2.l1, &a2.l2);
                if turn3 != turn4 {
                    return true;
                }
            }
        }
    }

    false
}
