// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform sampling utility.
//!
//! One small RNG wrapper serves both duties the trees have for randomness:
//! the skip structure's level coin and uniform test/demo point generation.
//! Entropy-seeded by default; fixed seeds give reproducible structures in
//! tests.

use kurbo::{Point, Rect};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform real and point sampler over a small, cheap RNG.
#[derive(Clone, Debug)]
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    /// A sampler seeded from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// A deterministically seeded sampler.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// A uniform real in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.random_range(0.0..1.0)
    }

    /// A uniform real in `[lo, hi)`.
    pub fn real_in(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.random_range(lo..hi)
    }

    /// A uniform point in the half-open box.
    pub fn point_in(&mut self, rect: Rect) -> Point {
        Point::new(
            self.real_in(rect.x0, rect.x1),
            self.real_in(rect.y0, rect.y1),
        )
    }

    /// `count` uniform points in the half-open box.
    pub fn points_in(&mut self, rect: Rect, count: usize) -> Vec<Point> {
        (0..count).map(|_| self.point_in(rect)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_samplers_are_reproducible() {
        let r = Rect::new(-200.0, -200.0, 200.0, 200.0);
        let a = Sampler::with_seed(7).points_in(r, 32);
        let b = Sampler::with_seed(7).points_in(r, 32);
        assert_eq!(a, b);
    }

    #[test]
    fn samples_stay_in_the_box() {
        let r = Rect::new(-200.0, -200.0, 200.0, 200.0);
        let mut s = Sampler::with_seed(42);
        for p in s.points_in(r, 1000) {
            assert!(r.x0 <= p.x && p.x < r.x1);
            assert!(r.y0 <= p.y && p.y < r.y1);
        }
        for _ in 0..1000 {
            let u = s.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
