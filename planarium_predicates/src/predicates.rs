// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite predicates on lines, rays, and segments.
//!
//! These combine the determinant cascades into the queries the DCEL walks
//! ask: which side of a line a line-defined point falls on, and whether an
//! edge (ray or bounded segment) is crossed by a line.

use kurbo::Point;
use planarium_primitives::Line;

use crate::{Sign, sign_det2, sign_det3};

/// Side of the oriented line `l` on which the point `sl1 ∩ sl2` lies.
///
/// Positive means the side the normal of `l` points into. The raw 3×3 sign
/// is corrected by the orientation of the defining pair.
pub fn line_point_sign(l: &Line, sl1: &Line, sl2: &Line) -> Sign {
    let vpos = sign_det3(
        [l.a, l.b, l.c],
        [sl1.a, sl1.b, sl1.c],
        [sl2.a, sl2.b, sl2.c],
    );
    let vdet = sign_det2(sl1.a, sl1.b, sl2.a, sl2.b);
    vpos * vdet
}

/// Side of `line` on which the plain coordinate point `p` lies, with the
/// line normalised so its normal points upward.
pub fn line_side_of_point(line: &Line, p: Point) -> Sign {
    let l = if line.is_normal_up() {
        *line
    } else {
        line.inverted()
    };
    line_point_sign(
        &l,
        &Line::vertical_through(p.x),
        &Line::horizontal_through(p.y),
    )
}

/// Whether `cross_line` crosses the ray supported by `edge_line` whose
/// finite endpoint is `sl1 ∩ sl2`.
///
/// The ray runs from the endpoint to infinity along the direction of
/// `edge_line`. The test reduces to a half-plane check on the endpoint plus
/// a comparison of the two direction vectors.
pub fn ray_crosses_line(cross_line: &Line, edge_line: &Line, sl1: &Line, sl2: &Line) -> bool {
    let l = if cross_line.is_normal_up() {
        *cross_line
    } else {
        cross_line.inverted()
    };

    let res = line_point_sign(&l, sl1, sl2);

    let s = edge_line.direction();
    let mut p = l.direction();
    if edge_line.is_right_directed() {
        p = -p;
    }

    // Left turn from the ray direction to the (adjusted) crossing direction
    // is Positive, right turn Negative.
    let orient = sign_det2(s.x, s.y, p.x, p.y);
    if orient == Sign::Zero {
        return false;
    }

    if res == Sign::Positive {
        if edge_line.is_right_directed() {
            orient == Sign::Positive
        } else {
            orient == Sign::Negative
        }
    } else if edge_line.is_right_directed() {
        orient == Sign::Negative
    } else {
        orient == Sign::Positive
    }
}

/// Whether `l` separates the segment endpoints `sl1 ∩ sl2` and `dl1 ∩ dl2`.
///
/// An endpoint exactly on `l` counts as a crossing when the other endpoint
/// is strictly off the line.
pub fn segment_crosses_line(l: &Line, sl1: &Line, sl2: &Line, dl1: &Line, dl2: &Line) -> bool {
    line_point_sign(l, sl1, sl2) != line_point_sign(l, dl1, dl2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_point(x: f64, y: f64) -> (Line, Line) {
        (Line::vertical_through(x), Line::horizontal_through(y))
    }

    #[test]
    fn line_side_of_plain_points() {
        // y = 0: normal (0, 1) points up.
        let l = Line::horizontal_through(0.0);
        assert_eq!(line_side_of_point(&l, Point::new(3.0, 2.0)), Sign::Positive);
        assert_eq!(
            line_side_of_point(&l, Point::new(3.0, -2.0)),
            Sign::Negative
        );
        assert_eq!(line_side_of_point(&l, Point::new(3.0, 0.0)), Sign::Zero);

        // Normalisation makes the answer independent of the stored
        // orientation.
        let flipped = l.inverted();
        assert_eq!(
            line_side_of_point(&flipped, Point::new(3.0, 2.0)),
            Sign::Positive
        );
    }

    #[test]
    fn line_point_sign_on_defined_points() {
        let l = Line::horizontal_through(0.0);
        let (s1, s2) = cross_point(1.0, 5.0);
        assert_eq!(line_point_sign(&l, &s1, &s2), Sign::Positive);
        // Swapping the defining pair must not change the answer.
        assert_eq!(line_point_sign(&l, &s2, &s1), Sign::Positive);
    }

    #[test]
    fn segment_crossing() {
        let l = Line::vertical_through(0.0);
        let (s1, s2) = cross_point(-1.0, 0.0);
        let (d1, d2) = cross_point(1.0, 0.0);
        assert!(segment_crosses_line(&l, &s1, &s2, &d1, &d2));

        let (d1, d2) = cross_point(-2.0, 0.0);
        assert!(!segment_crosses_line(&l, &s1, &s2, &d1, &d2));
    }

    #[test]
    fn ray_crossing() {
        // Ray along +x from (1, 1): supporting line y = 1, right-directed
        // orientation (0, -1, 1).
        let edge = Line::new(0.0, -1.0, 1.0);
        assert!(edge.is_right_directed());
        let (s1, s2) = cross_point(1.0, 1.0);

        // x = 3 crosses the ray; x = 0 lies behind the endpoint.
        assert!(ray_crosses_line(
            &Line::vertical_through(3.0),
            &edge,
            &s1,
            &s2
        ));
        assert!(!ray_crosses_line(
            &Line::vertical_through(0.0),
            &edge,
            &s1,
            &s2
        ));
        // A parallel line never crosses.
        assert!(!ray_crosses_line(
            &Line::horizontal_through(5.0),
            &edge,
            &s1,
            &s2
        ));
    }
}
