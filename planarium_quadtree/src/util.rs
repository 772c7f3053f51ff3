// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box helpers with explicit open/closed conventions.
//!
//! Quadrant membership is half-open (`[lo, hi)`) so that every point of the
//! domain belongs to exactly one quadrant, while query rectangles are closed
//! so that boundary points are reported. Keeping both conventions in one
//! place avoids relying on any particular `kurbo::Rect` behaviour.

use kurbo::{Point, Rect};

/// Quadrant numbering within a box: `0` low-x/low-y, `1` high-x/low-y,
/// `2` low-x/high-y, `3` high-x/high-y.
pub(crate) fn quadrant(rect: Rect, id: u8) -> Rect {
    let mx = (rect.x0 + rect.x1) / 2.0;
    let my = (rect.y0 + rect.y1) / 2.0;
    match id {
        0 => Rect::new(rect.x0, rect.y0, mx, my),
        1 => Rect::new(mx, rect.y0, rect.x1, my),
        2 => Rect::new(rect.x0, my, mx, rect.y1),
        _ => Rect::new(mx, my, rect.x1, rect.y1),
    }
}

/// Half-open containment: `[x0, x1) × [y0, y1)`.
pub(crate) fn contains_half_open(rect: &Rect, p: Point) -> bool {
    rect.x0 <= p.x && p.x < rect.x1 && rect.y0 <= p.y && p.y < rect.y1
}

/// Closed containment: boundary points count.
pub(crate) fn contains_closed(rect: &Rect, p: Point) -> bool {
    rect.x0 <= p.x && p.x <= rect.x1 && rect.y0 <= p.y && p.y <= rect.y1
}

/// The quadrant of `rect` containing `p`, if any.
pub(crate) fn quadrant_of(rect: &Rect, p: Point) -> Option<u8> {
    (0..4).find(|&i| contains_half_open(&quadrant(*rect, i), p))
}

/// `rect` grown by `eps` on every side.
pub(crate) fn inflate(rect: &Rect, eps: f64) -> Rect {
    Rect::new(rect.x0 - eps, rect.y0 - eps, rect.x1 + eps, rect.y1 + eps)
}

/// Component-wise intersection; inverted when the boxes are disjoint.
pub(crate) fn intersect(a: &Rect, b: &Rect) -> Rect {
    Rect::new(
        a.x0.max(b.x0),
        a.y0.max(b.y0),
        a.x1.min(b.x1),
        a.y1.min(b.y1),
    )
}

/// Whether a closed box is empty (inverted on either axis).
pub(crate) fn is_void(rect: &Rect) -> bool {
    rect.x1 < rect.x0 || rect.y1 < rect.y0
}
