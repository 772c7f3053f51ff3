// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill a point index with uniform points and run an approximate rectangle
//! query.

use planarium::{PointIndex, Rect, Sampler};

fn main() {
    let bounds = Rect::new(-200.0, -200.0, 200.0, 200.0);
    let mut index = PointIndex::new(bounds);
    let mut sampler = Sampler::from_entropy();

    for p in sampler.points_in(bounds, 10_000) {
        index.insert(p).expect("sampled inside the bounds");
    }

    println!(
        "index: {} points across {} levels",
        index.points().len(),
        index.skip_tree().level_count()
    );

    let query = Rect::new(-150.0, -150.0, 150.0, 150.0);
    let hits = index.range(query, 10.0);
    println!("range {query:?} (eps 10): {} points", hits.len());
}
