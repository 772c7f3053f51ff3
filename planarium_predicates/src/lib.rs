// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planarium Predicates: topologically exact sign evaluation.
//!
//! Every comparison made by the arrangement and hierarchy crates routes
//! through this crate. Each predicate is a three-tier cascade:
//!
//! 1. evaluate in `f64` and accept when the result clears a per-expression
//!    error bound (a small multiple of machine epsilon times the magnitude
//!    of the intermediate terms);
//! 2. otherwise re-evaluate in outward-rounded [`Interval`] arithmetic and
//!    accept when the enclosure excludes zero;
//! 3. otherwise evaluate in arbitrary-precision rationals, which is exact
//!    because every `f64` coefficient converts losslessly to a
//!    [`num_rational::BigRational`].
//!
//! The cascade therefore always terminates with a definite [`Sign`]; `Zero`
//! is a real answer, not a failure. Inputs are expected to be finite.
//!
//! The building blocks are [`sign_det2`] and [`sign_det3`]. On top of them
//! sit the line-level predicates ([`line_point_sign`], [`line_side_of_point`],
//! [`ray_crosses_line`], [`segment_crosses_line`]), the [`turn`] predicate on
//! points defined as line intersections, the [`x_diff`] coordinate
//! comparison, and the triangle containment/intersection tests used by the
//! point-location hierarchy.

mod det;
mod interval;
mod predicates;
mod triangle;
mod turn;

pub use det::{sign_det2, sign_det3};
pub use interval::Interval;
pub use predicates::{
    line_point_sign, line_side_of_point, ray_crosses_line, segment_crosses_line,
};
pub use triangle::{
    triangle_contains_convex_point, triangle_contains_point, triangle_contains_star_point,
    triangles_intersect,
};
pub use turn::{point_segment_orientation, turn, x_diff};

/// Sign of an exactly evaluated expression.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Sign {
    /// Strictly negative.
    Negative,
    /// Exactly zero.
    Zero,
    /// Strictly positive.
    Positive,
}

impl Sign {
    /// The sign as `-1`, `0`, or `1`.
    #[inline]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Negative => -1,
            Self::Zero => 0,
            Self::Positive => 1,
        }
    }

    /// The sign of an `i32`.
    #[inline]
    pub const fn of_i32(v: i32) -> Self {
        if v > 0 {
            Self::Positive
        } else if v < 0 {
            Self::Negative
        } else {
            Self::Zero
        }
    }
}

impl core::ops::Mul for Sign {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::of_i32(self.as_i32() * rhs.as_i32())
    }
}

impl core::ops::Neg for Sign {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::of_i32(-self.as_i32())
    }
}

/// Orientation of a directed point triple.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Orientation {
    /// Clockwise; the third point lies right of the directed first two.
    Right,
    /// All three points on one line.
    Collinear,
    /// Counterclockwise; the third point lies left of the directed first two.
    Left,
}
