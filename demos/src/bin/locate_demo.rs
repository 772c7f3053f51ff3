// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small line arrangement and locate a few points both naively and
//! through the hierarchy.

use planarium::{Arrangement, Line, Point};

fn main() {
    let mut arr = Arrangement::new(
        Line::new(0.0, -1.0, 0.0), // y = 0
        Line::new(1.0, 0.0, 0.0),  // x = 0
    )
    .expect("seed lines cross");

    for line in [Line::new(1.0, -1.0, 50.0), Line::new(1.0, 1.0, 30.0)] {
        arr.add_line(line).expect("general position");
    }

    println!(
        "arrangement: {} lines, {} vertices, {} half-edges",
        arr.lines().len(),
        arr.dcel().vertex_count(),
        arr.dcel().edge_count()
    );

    arr.build_hierarchy();
    println!("hierarchy: {} levels", arr.level_count());

    for p in [
        Point::new(1.0, 1.0),
        Point::new(-100.0, 3.0),
        Point::new(10.0, -90.0),
    ] {
        let naive = arr.locate_naive(p);
        let fast = arr.locate_fast(p);
        println!("{p:?}: naive={naive:?} fast={fast:?}");
    }
}
