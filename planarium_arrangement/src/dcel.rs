// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Doubly-connected edge list over a line arrangement.
//!
//! Vertices and half-edges live in flat arenas and reference each other by
//! [`VertexId`] / [`EdgeId`], so the cyclic `twin`/`next`/`prev` structure is
//! plain data and a deep copy is a `Clone` of the arenas. A DCEL is either
//! *unbounded* (every ray ends at the single infinite vertex, the anchor) or
//! *hull-clipped* (the arrangement restricted to a bounding triangle whose
//! edges carry [`EdgeFlags::HULL`]; the anchor is a hull corner).
//!
//! Vertices never store coordinates: a finite vertex is the crossing of its
//! two defining lines, and every geometric decision is delegated to the
//! exact predicates in `planarium_predicates`.

use std::collections::VecDeque;

use kurbo::Point;
use planarium_predicates::{
    Orientation, Sign, line_side_of_point, point_segment_orientation, ray_crosses_line,
    segment_crosses_line, sign_det2,
};
use planarium_primitives::{Line, LineCross};

use crate::types::{EdgeFlags, EdgeId, NO_EDGE, NO_VERTEX, TriId, VertexId};

/// A vertex record: the defining line pair (`None` for the infinite vertex)
/// and one outgoing half-edge.
#[derive(Clone, Debug)]
pub(crate) struct Vertex {
    pub(crate) lines: Option<(Line, Line)>,
    pub(crate) edge: EdgeId,
}

/// A half-edge record.
#[derive(Clone, Debug)]
pub(crate) struct HalfEdge {
    pub(crate) origin: VertexId,
    pub(crate) twin: EdgeId,
    pub(crate) prev: EdgeId,
    pub(crate) next: EdgeId,
    pub(crate) line: Line,
    pub(crate) triangle: Option<TriId>,
    pub(crate) flags: EdgeFlags,
}

/// Arena-backed DCEL of a line arrangement.
#[derive(Clone, Debug)]
pub struct Dcel {
    vertices: Vec<Vertex>,
    edges: Vec<HalfEdge>,
    anchor: VertexId,
    lines: Vec<Line>,
}

impl Dcel {
    /// Build the arrangement of two non-parallel seed lines.
    ///
    /// Creates the infinite vertex, one interior vertex at the crossing, and
    /// four rays (eight half-edges). The seed pair is normalised so that the
    /// cross product of their direction vectors is positive.
    pub fn from_seed_pair(line1: Line, line2: Line) -> Self {
        let (l1, l2) = {
            let d1 = line1.direction();
            let d2 = line2.direction();
            if sign_det2(d1.x, d1.y, d2.x, d2.y) == Sign::Negative {
                (line2, line1)
            } else {
                (line1, line2)
            }
        };

        let mut dcel = Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            anchor: VertexId(0),
            lines: Vec::new(),
        };

        let inf = dcel.push_vertex(None);
        let inner = dcel.push_vertex(Some((l1, l2)));

        let edges: Vec<EdgeId> = (0..8).map(|_| dcel.push_edge()).collect();
        for i in (0..8).step_by(2) {
            let out = edges[i];
            let back = edges[i + 1];
            let line = match (i % 4 == 0, i >= 4) {
                (true, false) => l1,
                (false, false) => l2,
                (true, true) => l1.inverted(),
                (false, true) => l2.inverted(),
            };

            let e = dcel.edge_mut(out);
            e.origin = inf;
            e.twin = back;
            e.next = edges[(i + 7) % 8];
            e.prev = edges[(i + 7) % 8];
            e.line = line;

            let e = dcel.edge_mut(back);
            e.origin = inner;
            e.twin = out;
            e.next = edges[(i + 2) % 8];
            e.prev = edges[(i + 2) % 8];
            e.line = line;
        }

        dcel.vertex_mut(inf).edge = edges[0];
        dcel.vertex_mut(inner).edge = edges[1];
        dcel.anchor = inf;
        dcel.lines.push(l1);
        dcel.lines.push(l2);
        dcel
    }

    /// Build the hull-clipped arrangement of `lines`.
    ///
    /// A bounding triangle is grown outward until every pairwise crossing of
    /// `lines` lies strictly inside it, then each line is inserted clipped to
    /// the triangle. All three bounding edges carry [`EdgeFlags::HULL`].
    pub fn hulled(lines: &[Line]) -> Self {
        let mut border = [
            Line::new(1.0, 0.0, 0.0),
            Line::new(0.0, 1.0, 0.0),
            Line::new(1.0, 1.0, 0.0),
        ];

        let mut probe: Vec<Line> = lines.to_vec();
        find_border_line(&mut border[0], 200.0, 1, &probe);
        probe.push(border[0]);
        find_border_line(&mut border[1], 200.0, 1, &probe);
        probe.push(border[1]);
        find_border_line(&mut border[2], -200.0, -1, &probe);

        let mut dcel = Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            anchor: VertexId(0),
            lines: Vec::new(),
        };

        let v = [
            dcel.push_vertex(Some((border[0], border[2]))),
            dcel.push_vertex(Some((border[0], border[1]))),
            dcel.push_vertex(Some((border[1], border[2]))),
        ];
        let edges: Vec<EdgeId> = (0..6).map(|_| dcel.push_edge()).collect();

        for i in (0..6).step_by(2) {
            let out = edges[i];
            let back = edges[i + 1];
            dcel.vertex_mut(v[i / 2]).edge = edges[(i + 4) % 6];

            let e = dcel.edge_mut(out);
            e.origin = v[((i + 2) / 2) % 3];
            e.twin = back;
            e.line = border[i / 2];
            e.next = edges[(i + 4) % 6];
            e.prev = edges[(i + 2) % 6];
            e.flags = EdgeFlags::HULL;

            let e = dcel.edge_mut(back);
            e.origin = v[i / 2];
            e.twin = out;
            e.line = border[i / 2];
            e.next = edges[(i + 3) % 6];
            e.prev = edges[(i + 5) % 6];
        }

        dcel.anchor = v[0];

        for l in lines {
            dcel.add_line_in_triangle(*l);
        }
        dcel
    }

    // --- arena plumbing ---

    fn push_vertex(&mut self, lines: Option<(Line, Line)>) -> VertexId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Arena ids are 32-bit by design."
        )]
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            lines,
            edge: NO_EDGE,
        });
        id
    }

    pub(crate) fn push_edge(&mut self) -> EdgeId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Arena ids are 32-bit by design."
        )]
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(HalfEdge {
            origin: NO_VERTEX,
            twin: NO_EDGE,
            prev: NO_EDGE,
            next: NO_EDGE,
            line: Line::new(0.0, 0.0, 0.0),
            triangle: None,
            flags: EdgeFlags::empty(),
        });
        id
    }

    pub(crate) fn edge(&self, id: EdgeId) -> &HalfEdge {
        &self.edges[id.idx()]
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> &mut HalfEdge {
        &mut self.edges[id.idx()]
    }

    pub(crate) fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.idx()]
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.idx()]
    }

    // --- public read surface ---

    /// Number of vertices ever created in this DCEL.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges ever created in this DCEL.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The anchor vertex: the infinite vertex of an unbounded DCEL, or the
    /// first hull corner of a hull-clipped one.
    pub fn anchor(&self) -> VertexId {
        self.anchor
    }

    /// The lines inserted so far, in insertion order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Origin vertex of a half-edge.
    pub fn origin(&self, e: EdgeId) -> VertexId {
        self.edge(e).origin
    }

    /// Twin half-edge.
    pub fn twin(&self, e: EdgeId) -> EdgeId {
        self.edge(e).twin
    }

    /// Successor around the left face.
    pub fn next(&self, e: EdgeId) -> EdgeId {
        self.edge(e).next
    }

    /// Predecessor around the left face.
    pub fn prev(&self, e: EdgeId) -> EdgeId {
        self.edge(e).prev
    }

    /// Supporting line of a half-edge.
    pub fn line_of(&self, e: EdgeId) -> Line {
        self.edge(e).line
    }

    /// Flags of a half-edge.
    pub fn flags_of(&self, e: EdgeId) -> EdgeFlags {
        self.edge(e).flags
    }

    /// One outgoing half-edge of a vertex.
    pub fn outgoing(&self, v: VertexId) -> EdgeId {
        self.vertex(v).edge
    }

    /// The defining line pair of a finite vertex, `None` for the infinite one.
    pub fn vertex_lines(&self, v: VertexId) -> Option<(Line, Line)> {
        self.vertex(v).lines
    }

    /// The crossing defining a finite vertex.
    pub fn vertex_cross(&self, v: VertexId) -> Option<LineCross> {
        self.vertex(v).lines.map(|(l1, l2)| LineCross::new(l1, l2))
    }

    /// Whether `v` is the infinite vertex.
    pub fn is_infinite(&self, v: VertexId) -> bool {
        self.vertex(v).lines.is_none()
    }

    /// Number of outgoing half-edges of a vertex.
    pub fn vertex_degree(&self, v: VertexId) -> usize {
        let start = self.vertex(v).edge;
        let mut e = start;
        let mut degree = 0;
        loop {
            degree += 1;
            e = self.edge(self.edge(e).twin).next;
            if e == start {
                return degree;
            }
        }
    }

    /// Whether a half-edge is a ray (one endpoint at the infinite vertex).
    pub fn is_ray(&self, e: EdgeId) -> bool {
        self.vertex(self.edge(e).origin).lines.is_none()
            || self
                .vertex(self.edge(self.edge(e).next).origin)
                .lines
                .is_none()
    }

    fn finite_end(&self, e: EdgeId) -> VertexId {
        let o = self.edge(e).origin;
        if self.vertex(o).lines.is_some() {
            o
        } else {
            self.edge(self.edge(e).next).origin
        }
    }

    /// Whether the line `l` crosses the (ray or segment) edge `e`.
    pub fn edge_crossed_by(&self, l: &Line, e: EdgeId) -> bool {
        if self.is_ray(e) {
            let v = self.finite_end(e);
            let (vl1, vl2) = self.vertex(v).lines.expect("finite end has lines");
            ray_crosses_line(l, &self.edge(e).line, &vl1, &vl2)
        } else {
            let (sl1, sl2) = self
                .vertex(self.edge(e).origin)
                .lines
                .expect("segment origin has lines");
            let (dl1, dl2) = self
                .vertex(self.edge(self.edge(e).next).origin)
                .lines
                .expect("segment end has lines");
            segment_crosses_line(l, &sl1, &sl2, &dl1, &dl2)
        }
    }

    // --- incremental insertion, unbounded ---

    /// Insert a line into the unbounded arrangement.
    ///
    /// Walks face to face from the first infinite-face edge the line exits,
    /// splitting each crossed edge at the new crossing vertex and threading
    /// two new half-edges along the line through every traversed face. Both
    /// unbounded ends terminate at the infinite vertex. Each splice is O(1);
    /// the whole call is linear in the number of crossed edges.
    ///
    /// The caller is responsible for `new_line` being non-parallel to every
    /// line already present (see `Arrangement::add_line` for the checked
    /// entry point).
    pub fn add_line(&mut self, new_line: Line) {
        let l = new_line;
        self.lines.push(l);

        // Find the infinite-face edge the new line exits first: walk the fan
        // of rays at the infinite vertex until the direction of `l` is
        // bracketed.
        let mut e = self.vertex(self.anchor).edge;
        let dir_sign = |line: &Line| {
            let d = line.direction();
            let ld = l.direction();
            sign_det2(d.x, d.y, ld.x, ld.y)
        };

        let first_bracket = dir_sign(&self.edge(e).line) == Sign::Negative;
        let inf_face_edge = if first_bracket {
            e
        } else {
            let mut f = self.edge(self.edge(e).twin).next;
            while dir_sign(&self.edge(e).line) == dir_sign(&self.edge(f).line) {
                e = f;
                f = self.edge(self.edge(f).twin).next;
            }
            f
        };

        let mut crossed = inf_face_edge;
        while !self.edge_crossed_by(&l, crossed) {
            crossed = self.edge(crossed).next;
        }

        // First splice: split `crossed`, thread the line's first unbounded
        // segment, and open the walk into the adjacent face.
        let new_v = self.push_vertex(Some((self.edge(crossed).line, l)));

        let line_edge1 = self.push_edge();
        let line_edge2 = self.push_edge();
        let mut part_edge1 = self.push_edge();
        let mut part_edge2 = self.push_edge();

        self.vertex_mut(new_v).edge = part_edge1;

        let ce_twin = self.edge(crossed).twin;
        let ce_next = self.edge(crossed).next;
        let ce_line = self.edge(crossed).line;
        let ce_twin_next = self.edge(ce_twin).next;
        let next_origin_infinite = self
            .vertex(self.edge(ce_next).origin)
            .lines
            .is_none();
        let ife_prev = self.edge(inf_face_edge).prev;

        {
            let pe1 = self.edge_mut(part_edge1);
            pe1.origin = new_v;
            pe1.twin = ce_twin;
            pe1.next = if next_origin_infinite { line_edge2 } else { ce_next };
            pe1.prev = line_edge2;
            pe1.line = ce_line;
        }
        {
            let pe2 = self.edge_mut(part_edge2);
            pe2.origin = new_v;
            pe2.twin = crossed;
            pe2.next = ce_twin_next;
            pe2.line = ce_line;
            // prev is threaded by the face walk below.
        }
        {
            let le1 = self.edge_mut(line_edge1);
            le1.origin = new_v;
            le1.twin = line_edge2;
            le1.next = inf_face_edge;
            le1.prev = crossed;
            le1.line = l;
        }
        {
            let anchor = self.anchor;
            let le2 = self.edge_mut(line_edge2);
            le2.origin = anchor;
            le2.twin = line_edge1;
            le2.next = part_edge1;
            le2.prev = if next_origin_infinite { part_edge1 } else { ife_prev };
            le2.line = l;
        }

        if first_bracket {
            self.vertex_mut(self.anchor).edge = line_edge2;
        }

        let mut face_edge = ce_twin_next;
        if !next_origin_infinite {
            self.edge_mut(ce_next).prev = part_edge1;
            self.edge_mut(ife_prev).next = line_edge2;
        }
        self.edge_mut(inf_face_edge).prev = line_edge1;

        self.edge_mut(crossed).next = line_edge1;
        self.edge_mut(ce_twin).twin = part_edge1;
        self.edge_mut(crossed).twin = part_edge2;

        let mut new_v = new_v;

        // Face-to-face walk: each iteration either splits the next crossed
        // edge or closes the insertion with the second unbounded segment.
        loop {
            let line_edge1 = self.push_edge();
            let line_edge2 = self.push_edge();

            let pe1_twin = self.edge(part_edge1).twin;
            {
                let le1 = self.edge_mut(line_edge1);
                le1.twin = line_edge2;
                le1.next = part_edge2;
                le1.line = l;
            }
            {
                let le2 = self.edge_mut(line_edge2);
                le2.origin = new_v;
                le2.twin = line_edge1;
                le2.prev = pe1_twin;
                le2.line = l;
            }

            while face_edge != pe1_twin && !self.edge_crossed_by(&l, face_edge) {
                face_edge = self.edge(face_edge).next;
            }

            if face_edge == pe1_twin {
                // The walk ended in the last half-plane; close with the
                // second unbounded segment, supported by the inverted line.
                self.edge_mut(pe1_twin).next = part_edge2;
                while self
                    .vertex(self.edge(face_edge).origin)
                    .lines
                    .is_some()
                {
                    face_edge = self.edge(face_edge).next;
                }
                let exit_edge = face_edge;

                self.edge_mut(pe1_twin).next = line_edge2;
                self.edge_mut(part_edge2).prev = line_edge1;

                let rev = l.inverted();
                let exit_prev = self.edge(exit_edge).prev;
                {
                    let anchor = self.anchor;
                    let le1 = self.edge_mut(line_edge1);
                    le1.line = rev;
                    le1.origin = anchor;
                    le1.prev = exit_prev;
                }
                {
                    let le2 = self.edge_mut(line_edge2);
                    le2.line = rev;
                    le2.next = exit_edge;
                }

                self.edge_mut(exit_prev).next = line_edge1;
                self.edge_mut(exit_edge).prev = line_edge2;
                break;
            }

            self.edge_mut(pe1_twin).next = line_edge2;
            self.edge_mut(part_edge2).prev = line_edge1;
            let pe2_next = self.edge(part_edge2).next;
            self.edge_mut(pe2_next).prev = part_edge2;

            let fe_line = self.edge(face_edge).line;
            let next_v = self.push_vertex(Some((fe_line, l)));

            let new_part_edge1 = self.push_edge();
            let new_part_edge2 = self.push_edge();

            self.edge_mut(line_edge1).prev = face_edge;
            self.edge_mut(line_edge2).next = new_part_edge1;
            self.edge_mut(line_edge1).origin = next_v;

            self.vertex_mut(next_v).edge = new_part_edge2;

            let fe_twin = self.edge(face_edge).twin;
            let fe_next = self.edge(face_edge).next;
            let fe_twin_next = self.edge(fe_twin).next;

            {
                let np1 = self.edge_mut(new_part_edge1);
                np1.origin = next_v;
                np1.twin = fe_twin;
                np1.next = fe_next;
                np1.prev = line_edge2;
                np1.line = fe_line;
            }
            {
                let np2 = self.edge_mut(new_part_edge2);
                np2.origin = next_v;
                np2.twin = face_edge;
                np2.next = fe_twin_next;
                np2.line = fe_line;
                // prev is threaded on the next iteration.
            }

            self.edge_mut(fe_next).prev = new_part_edge1;
            self.edge_mut(fe_twin_next).prev = new_part_edge2;
            self.edge_mut(face_edge).next = line_edge1;
            self.edge_mut(fe_twin).twin = new_part_edge1;
            self.edge_mut(face_edge).twin = new_part_edge2;

            face_edge = fe_twin_next;
            new_v = next_v;
            part_edge1 = new_part_edge1;
            part_edge2 = new_part_edge2;
        }
    }

    // --- incremental insertion, hull-clipped ---

    /// Insert a line into a hull-clipped DCEL.
    ///
    /// Same face-to-face walk as [`Dcel::add_line`], but both terminating
    /// splits land on hull edges instead of at the infinite vertex.
    pub fn add_line_in_triangle(&mut self, new_line: Line) {
        let l = new_line;
        self.lines.push(l);

        let mut crossed = self.vertex(self.anchor).edge;
        while !self.edge_crossed_by(&l, crossed) {
            crossed = self.edge(crossed).next;
        }

        let mut new_v = self.push_vertex(Some((self.edge(crossed).line, l)));

        let mut part_edge1 = self.push_edge();
        let mut part_edge2 = self.push_edge();

        self.vertex_mut(new_v).edge = part_edge1;

        let ce_twin = self.edge(crossed).twin;
        let ce_next = self.edge(crossed).next;
        let ce_line = self.edge(crossed).line;
        let ce_twin_next = self.edge(ce_twin).next;

        {
            let pe1 = self.edge_mut(part_edge1);
            pe1.origin = new_v;
            pe1.twin = ce_twin;
            pe1.next = ce_next;
            pe1.prev = crossed;
            pe1.line = ce_line;
            pe1.flags = EdgeFlags::HULL;
        }
        {
            let pe2 = self.edge_mut(part_edge2);
            pe2.origin = new_v;
            pe2.twin = crossed;
            pe2.next = ce_twin_next;
            pe2.line = ce_line;
            // prev is threaded by the walk below.
        }

        let mut face_edge = ce_twin_next;
        self.edge_mut(ce_next).prev = part_edge1;
        self.edge_mut(crossed).next = part_edge1;
        self.edge_mut(ce_twin_next).prev = part_edge2;
        self.edge_mut(ce_twin).twin = part_edge1;
        self.edge_mut(crossed).twin = part_edge2;

        loop {
            let line_edge1 = self.push_edge();
            let line_edge2 = self.push_edge();

            let pe1_twin = self.edge(part_edge1).twin;
            self.edge_mut(pe1_twin).next = line_edge2;
            self.edge_mut(part_edge2).prev = line_edge1;

            {
                let le1 = self.edge_mut(line_edge1);
                le1.twin = line_edge2;
                le1.next = part_edge2;
                le1.line = l;
            }
            {
                let le2 = self.edge_mut(line_edge2);
                le2.origin = new_v;
                le2.twin = line_edge1;
                le2.prev = pe1_twin;
                le2.line = l;
            }

            while face_edge != pe1_twin && !self.edge_crossed_by(&l, face_edge) {
                face_edge = self.edge(face_edge).next;
            }

            let fe_line = self.edge(face_edge).line;
            let next_v = self.push_vertex(Some((fe_line, l)));

            let new_part_edge1 = self.push_edge();
            let new_part_edge2 = self.push_edge();

            self.edge_mut(line_edge1).origin = next_v;
            self.edge_mut(line_edge1).prev = face_edge;
            self.edge_mut(line_edge2).next = new_part_edge1;

            self.vertex_mut(next_v).edge = new_part_edge2;

            let fe_twin = self.edge(face_edge).twin;
            let fe_next = self.edge(face_edge).next;
            let fe_twin_next = self.edge(fe_twin).next;
            let fe_twin_hull = self.edge(fe_twin).flags.contains(EdgeFlags::HULL);

            {
                let np1 = self.edge_mut(new_part_edge1);
                np1.origin = next_v;
                np1.twin = fe_twin;
                np1.next = fe_next;
                np1.prev = line_edge2;
                np1.line = fe_line;
            }
            {
                let np2 = self.edge_mut(new_part_edge2);
                np2.origin = next_v;
                np2.twin = face_edge;
                np2.next = fe_twin_next;
                np2.prev = fe_twin;
                np2.line = fe_line;
            }

            self.edge_mut(fe_next).prev = new_part_edge1;
            self.edge_mut(fe_twin_next).prev = new_part_edge2;
            self.edge_mut(face_edge).next = line_edge1;
            self.edge_mut(fe_twin).next = new_part_edge2;
            self.edge_mut(fe_twin).twin = new_part_edge1;
            self.edge_mut(face_edge).twin = new_part_edge2;

            if fe_twin_hull {
                // Exited through the bounding triangle: the new split edge
                // on the hull side is itself a hull edge.
                self.edge_mut(new_part_edge2).flags |= EdgeFlags::HULL;
                break;
            }

            face_edge = fe_twin_next;
            new_v = next_v;
            part_edge1 = new_part_edge1;
            part_edge2 = new_part_edge2;
        }
    }

    // --- queries ---

    /// Every half-edge crossed by `line`, in traversal order, without
    /// mutating the DCEL. The final entry is the twin of the first.
    pub fn intersected_edges(&self, line: &Line) -> Vec<EdgeId> {
        let l = *line;
        let mut out = Vec::new();

        let dir_sign = |el: &Line| {
            let d = el.direction();
            let ld = l.direction();
            sign_det2(d.x, d.y, ld.x, ld.y)
        };

        let mut e = self.vertex(self.anchor).edge;
        let inf_face_edge = if dir_sign(&self.edge(e).line) != Sign::Positive {
            e
        } else {
            let mut f = self.edge(self.edge(e).twin).next;
            loop {
                let e_or = dir_sign(&self.edge(e).line);
                let f_or = dir_sign(&self.edge(f).line);
                if e_or == Sign::Zero || (e_or != f_or && f_or != Sign::Zero) {
                    break;
                }
                e = f;
                f = self.edge(self.edge(f).twin).next;
            }
            f
        };

        let mut crossed = inf_face_edge;
        while !self.edge_crossed_by(&l, crossed) {
            crossed = self.edge(crossed).next;
        }
        out.push(crossed);

        let stop = self.edge(crossed).twin;
        let mut face_edge = self.edge(stop).next;
        loop {
            while face_edge != stop && !self.edge_crossed_by(&l, face_edge) {
                face_edge = self.edge(face_edge).next;
            }
            out.push(face_edge);
            if face_edge == stop {
                break;
            }
            face_edge = self.edge(self.edge(face_edge).twin).next;
        }
        out
    }

    /// Orientation of the point `c` against the directed edge `e`.
    ///
    /// For rays this reduces to a side-of-line test combined with the ray
    /// direction; for bounded segments it is the exact turn predicate on the
    /// two endpoints.
    pub fn edge_orientation(&self, e: EdgeId, c: Point) -> Orientation {
        if self.is_ray(e) {
            let res = line_side_of_point(&self.edge(e).line, c);
            let origin_infinite = self.vertex(self.edge(e).origin).lines.is_none();
            let right = self.edge(e).line.is_right_directed();
            let left_side = res == Sign::Positive;
            return match (left_side, origin_infinite, right) {
                (true, true, true) | (true, false, false) => Orientation::Right,
                (true, true, false) | (true, false, true) => Orientation::Left,
                (false, true, true) | (false, false, false) => Orientation::Left,
                (false, true, false) | (false, false, true) => Orientation::Right,
            };
        }

        let (sl1, sl2) = self
            .vertex(self.edge(e).origin)
            .lines
            .expect("segment origin has lines");
        let (dl1, dl2) = self
            .vertex(self.edge(self.edge(e).next).origin)
            .lines
            .expect("segment end has lines");
        point_segment_orientation(&sl1, &sl2, &dl1, &dl2, c)
    }

    /// Naive point location: breadth-first search over faces from the
    /// anchor. A face contains `c` when `c` is not strictly right of any of
    /// its bounding half-edges, so boundary points report the first face
    /// reached. O(edges); the reference against which the fast locator is
    /// tested.
    pub fn face_by_point(&self, c: Point) -> Option<EdgeId> {
        let start = self.vertex(self.anchor).edge;
        let mut visited = vec![0u8; self.edges.len()];
        let mut queue = VecDeque::new();
        visited[start.idx()] = 1;
        queue.push_back(start);

        while let Some(e) = queue.pop_front() {
            if visited[e.idx()] == 2 {
                continue;
            }
            visited[e.idx()] = 2;

            let mut en = e;
            let mut all_inside = true;
            loop {
                visited[en.idx()] = 2;
                all_inside &= self.edge_orientation(en, c) != Orientation::Right;
                let tw = self.edge(en).twin;
                if visited[tw.idx()] == 0 {
                    visited[tw.idx()] = 1;
                    queue.push_back(tw);
                }
                en = self.edge(en).next;
                if en == e {
                    break;
                }
            }

            if all_inside {
                return Some(e);
            }
        }
        None
    }

    /// One representative half-edge per face cycle.
    pub fn face_representatives(&self) -> Vec<EdgeId> {
        let mut seen = vec![false; self.edges.len()];
        let mut reps = Vec::new();
        for i in 0..self.edges.len() {
            if seen[i] {
                continue;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Arena ids are 32-bit by design."
            )]
            let rep = EdgeId(i as u32);
            reps.push(rep);
            let mut e = rep;
            loop {
                seen[e.idx()] = true;
                e = self.edge(e).next;
                if e == rep {
                    break;
                }
            }
        }
        reps
    }

    /// Length of the face cycle through `e`.
    pub fn face_len(&self, e: EdgeId) -> usize {
        let mut n = 0;
        let mut f = e;
        loop {
            n += 1;
            f = self.edge(f).next;
            if f == e {
                return n;
            }
        }
    }

    /// Whether the face cycle through `e` touches the infinite vertex.
    pub fn face_is_unbounded(&self, e: EdgeId) -> bool {
        let mut f = e;
        loop {
            if self.is_infinite(self.edge(f).origin) {
                return true;
            }
            f = self.edge(f).next;
            if f == e {
                return false;
            }
        }
    }

    /// Check the half-edge invariants: `twin` involution, `next`/`prev`
    /// inversion, and face cycles that close within the edge count.
    pub fn well_formed(&self) -> bool {
        let n = self.edges.len();
        for i in 0..n {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Arena ids are 32-bit by design."
            )]
            let e = EdgeId(i as u32);
            let twin = self.edge(e).twin;
            let next = self.edge(e).next;
            let prev = self.edge(e).prev;
            if twin.idx() >= n || next.idx() >= n || prev.idx() >= n {
                return false;
            }
            if self.edge(twin).twin != e || self.edge(next).prev != e || self.edge(prev).next != e {
                return false;
            }
            if self.edge(e).origin.idx() >= self.vertices.len() {
                return false;
            }
            // The face cycle must close without revisiting more edges than
            // exist.
            let mut f = e;
            let mut steps = 0;
            loop {
                f = self.edge(f).next;
                steps += 1;
                if f == e {
                    break;
                }
                if steps > n {
                    return false;
                }
            }
        }
        true
    }
}

/// Shift `l` by `d` until every pairwise crossing of `lines` lies strictly
/// on the `sign` side of it.
fn find_border_line(l: &mut Line, d: f64, sign: i32, lines: &[Line]) {
    use planarium_predicates::line_point_sign;

    loop {
        let mut all_one_side = true;
        'pairs: for i in 0..lines.len().saturating_sub(1) {
            for j in (i + 1)..lines.len() {
                if sign_det2(lines[i].a, lines[i].b, lines[j].a, lines[j].b) == Sign::Zero {
                    continue;
                }
                let s = line_point_sign(l, &lines[i], &lines[j]);
                if s.as_i32() * sign <= 0 {
                    all_one_side = false;
                    break 'pairs;
                }
            }
        }
        if all_one_side {
            return;
        }
        l.c += d;
    }
}
