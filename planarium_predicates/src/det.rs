// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Determinant sign cascades: the 2×2 and 3×3 building blocks.

use core::cmp::Ordering;

use num_rational::BigRational;
use num_traits::Zero;

use crate::{Interval, Sign};

/// Lossless conversion of a finite `f64` into a big rational.
pub(crate) fn big(v: f64) -> BigRational {
    BigRational::from_float(v).expect("finite coefficient")
}

pub(crate) fn big_sign(r: &BigRational) -> Sign {
    match r.cmp(&BigRational::zero()) {
        Ordering::Greater => Sign::Positive,
        Ordering::Less => Sign::Negative,
        Ordering::Equal => Sign::Zero,
    }
}

/// Sign of the 2×2 determinant
///
/// ```text
/// | a  b |
/// | c  d |
/// ```
///
/// i.e. of `a·d - b·c`. Filter constant 4: the bound for one subtraction of
/// two products.
pub fn sign_det2(a: f64, b: f64, c: f64, d: f64) -> Sign {
    let l = a * d;
    let r = b * c;
    let diff = l - r;
    let eps = (l.abs() + r.abs()) * 4.0 * f64::EPSILON;

    if diff > eps {
        return Sign::Positive;
    }
    if diff < -eps {
        return Sign::Negative;
    }

    let iv = Interval::exact(a) * Interval::exact(d) - Interval::exact(b) * Interval::exact(c);
    if iv.lo() > 0.0 {
        return Sign::Positive;
    }
    if iv.hi() < 0.0 {
        return Sign::Negative;
    }

    let exact = big(a) * big(d) - big(b) * big(c);
    big_sign(&exact)
}

/// Sign of the 3×3 determinant of three row vectors, expanded along `a`.
///
/// Filter constant 16 bounds the three-product-two-addition expansion.
pub fn sign_det3(a: [f64; 3], b: [f64; 3], p: [f64; 3]) -> Sign {
    let l = a[0] * (b[1] * p[2] - b[2] * p[1]);
    let m = a[1] * (b[2] * p[0] - b[0] * p[2]);
    let r = a[2] * (b[0] * p[1] - b[1] * p[0]);
    let sum = l + m + r;
    let eps = (l.abs() + r.abs() + m.abs()) * 16.0 * f64::EPSILON;

    if sum > eps {
        return Sign::Positive;
    }
    if sum < -eps {
        return Sign::Negative;
    }

    let i = |v: f64| Interval::exact(v);
    let iv = i(a[0]) * (i(b[1]) * i(p[2]) - i(b[2]) * i(p[1]))
        + i(a[1]) * (i(b[2]) * i(p[0]) - i(b[0]) * i(p[2]))
        + i(a[2]) * (i(b[0]) * i(p[1]) - i(b[1]) * i(p[0]));
    if iv.lo() > 0.0 {
        return Sign::Positive;
    }
    if iv.hi() < 0.0 {
        return Sign::Negative;
    }

    let exact = big(a[0]) * (big(b[1]) * big(p[2]) - big(b[2]) * big(p[1]))
        + big(a[1]) * (big(b[2]) * big(p[0]) - big(b[0]) * big(p[2]))
        + big(a[2]) * (big(b[0]) * big(p[1]) - big(b[1]) * big(p[0]));
    big_sign(&exact)
}
