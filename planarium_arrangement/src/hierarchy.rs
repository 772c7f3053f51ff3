// Copyright 2026 the Planarium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kirkpatrick point-location hierarchy.
//!
//! Level 0 is the hull-clipped arrangement with every face fan-triangulated.
//! Each following level removes an independent set of low-degree interior
//! vertices, retriangulates the opened star-shaped faces by ear clipping,
//! and links every new triangle to the previous-level triangles it overlaps.
//! The triangle nodes form a DAG (children may be shared between parents)
//! held in one arena; a query descends from the root triangle through
//! containing children to a level-0 leaf in expected logarithmic time.

use std::collections::VecDeque;

use kurbo::Point;
use planarium_predicates::{
    Orientation, triangle_contains_convex_point, triangle_contains_star_point,
    triangles_intersect, turn,
};
use planarium_primitives::{Line, LineCross, LineTriangle};

use crate::dcel::Dcel;
use crate::types::{EdgeFlags, EdgeId, TriId, VertexId};
use crate::LocateError;

/// A node of the triangle DAG.
#[derive(Clone, Debug)]
pub(crate) struct TriNode {
    pub(crate) tri: LineTriangle,
    pub(crate) node_edge: EdgeId,
    pub(crate) children: Vec<TriId>,
    pub(crate) leaf: bool,
    pub(crate) depth: u32,
}

/// One triangulation level: a DCEL snapshot plus its adjacency graph.
#[derive(Clone, Debug)]
pub(crate) struct Level {
    pub(crate) dcel: Dcel,
    /// Neighbour lists indexed by vertex id; empty for absent vertices.
    graph: Vec<Vec<VertexId>>,
    /// Which vertex ids are reachable in this level's structure.
    present: Vec<bool>,
}

/// The built hierarchy: levels, the shared triangle arena, and the root.
#[derive(Clone, Debug)]
pub(crate) struct Hierarchy {
    /// The hull-clipped arrangement before triangulation.
    pub(crate) hulled: Dcel,
    pub(crate) levels: Vec<Level>,
    pub(crate) nodes: Vec<TriNode>,
    pub(crate) root: Option<TriId>,
    pub(crate) deleted: Vec<Vec<VertexId>>,
}

impl Hierarchy {
    /// Build the full hierarchy for the given arrangement lines.
    pub(crate) fn build(lines: &[Line]) -> Self {
        let hulled = Dcel::hulled(lines);

        let mut nodes = Vec::new();
        let mut levels = vec![Level::with_fan(hulled.clone(), &mut nodes)];
        let mut deleted = vec![Vec::new()];
        let mut root = None;
        let mut max_depth = 0;

        while not_trivial(&levels.last().expect("level 0 exists").dcel) {
            max_depth += 1;
            let prev = levels.last().expect("previous level exists");
            let last_deleted = deleted.last_mut().expect("deleted list exists");
            let next = compress_level(prev, max_depth, &mut nodes, &mut root, last_deleted);
            levels.push(next);
            deleted.push(Vec::new());
        }

        Self {
            hulled,
            levels,
            nodes,
            root,
            deleted,
        }
    }

    /// Descend the DAG to the level-0 leaf triangle containing `p`.
    ///
    /// Returns the leaf's witness half-edge in the level-0 DCEL.
    pub(crate) fn locate(&self, p: Point) -> Result<EdgeId, LocateError> {
        let root = self.root.ok_or(LocateError::StaleHierarchy)?;
        let l1 = Line::vertical_through(p.x);
        let l2 = Line::horizontal_through(p.y);

        if !triangle_contains_convex_point(&self.nodes[root.idx()].tri, &l1, &l2) {
            return Err(LocateError::OutsideHull);
        }

        let mut node = root;
        while !self.nodes[node.idx()].leaf {
            let mut advanced = false;
            for &child in &self.nodes[node.idx()].children {
                if triangle_contains_convex_point(&self.nodes[child.idx()].tri, &l1, &l2) {
                    node = child;
                    advanced = true;
                    break;
                }
            }
            if !advanced {
                return Err(LocateError::Degenerate);
            }
        }
        Ok(self.nodes[node.idx()].node_edge)
    }

    /// The level-0 (fan-triangulated, hull-clipped) DCEL.
    pub(crate) fn base_dcel(&self) -> &Dcel {
        &self.levels[0].dcel
    }
}

/// Whether the reachable part of `dcel` still has more than three vertices.
fn not_trivial(dcel: &Dcel) -> bool {
    let mut visited = vec![false; dcel.vertex_count()];
    let mut queue = VecDeque::new();
    visited[dcel.anchor().idx()] = true;
    queue.push_back(dcel.anchor());
    let mut size = 1usize;

    while let Some(v) = queue.pop_front() {
        let start = dcel.outgoing(v);
        let mut e = start;
        loop {
            let u = dcel.origin(dcel.next(e));
            if !visited[u.idx()] {
                visited[u.idx()] = true;
                queue.push_back(u);
                size += 1;
            }
            if size > 3 {
                return true;
            }
            e = dcel.next(dcel.twin(e));
            if e == start {
                break;
            }
        }
    }
    size > 3
}

fn cross_of(dcel: &Dcel, v: VertexId) -> LineCross {
    dcel.vertex_cross(v).expect("hulled vertices are finite")
}

fn push_node(nodes: &mut Vec<TriNode>, node: TriNode) -> TriId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Arena ids are 32-bit by design."
    )]
    let id = TriId(nodes.len() as u32);
    nodes.push(node);
    id
}

/// Steal the triangle link reachable from `e` within three steps, if any.
fn take_triangle(dcel: &mut Dcel, e: EdgeId) -> Option<TriId> {
    let mut f = e;
    for _ in 0..3 {
        if let Some(t) = dcel.edge(f).triangle {
            dcel.edge_mut(f).triangle = None;
            return Some(t);
        }
        f = dcel.next(f);
    }
    None
}

/// Whether the face through `e` is a triangle (three edges or fewer).
fn is_triangle_face(dcel: &Dcel, e: EdgeId) -> bool {
    let mut f = e;
    let mut len = 0;
    loop {
        len += 1;
        if len > 3 {
            return false;
        }
        f = dcel.next(f);
        if f == e {
            return true;
        }
    }
}

/// Merge two consecutive collinear edges into one, dropping their shared
/// degree-2 vertex from both face cycles.
fn merge_edges(dcel: &mut Dcel, in1: EdgeId, in2: EdgeId) {
    let in2_next = dcel.next(in2);
    dcel.edge_mut(in2_next).prev = in1;
    dcel.edge_mut(in1).next = in2_next;

    let in1_twin = dcel.twin(in1);
    let in1_twin_next = dcel.next(in1_twin);
    let in2_twin = dcel.twin(in2);
    dcel.edge_mut(in1_twin_next).prev = in2_twin;
    dcel.edge_mut(in2_twin).next = in1_twin_next;

    dcel.edge_mut(in1).twin = in2_twin;
    dcel.edge_mut(in2_twin).twin = in1;
}

impl Level {
    /// Wrap a DCEL and fan-triangulate every face, wrapping each triangle in
    /// a leaf node of the arena.
    fn with_fan(dcel: Dcel, nodes: &mut Vec<TriNode>) -> Self {
        let mut level = Self {
            dcel,
            graph: Vec::new(),
            present: Vec::new(),
        };
        level.fan_triangulate(nodes);
        level
    }

    /// Snapshot a DCEL without triangulating (used when compressing).
    fn plain(dcel: Dcel) -> Self {
        Self {
            dcel,
            graph: Vec::new(),
            present: Vec::new(),
        }
    }

    /// Fan-triangulate every non-triangular face: from one face vertex,
    /// connect to every other non-adjacent vertex with a diagonal flagged
    /// [`EdgeFlags::TRIANGLE`], and wrap each resulting triangle in a
    /// depth-0 leaf node witnessed by its middle boundary edge.
    fn fan_triangulate(&mut self, nodes: &mut Vec<TriNode>) {
        let dcel = &mut self.dcel;
        // New diagonals are TRIANGLE-flagged and skipped by flag, so the
        // marker only ever indexes pre-existing edges.
        let mut bound = vec![false; dcel.edge_count()];
        let mut visited = vec![false; dcel.vertex_count()];
        let mut queue = VecDeque::new();
        visited[dcel.anchor().idx()] = true;
        queue.push_back(dcel.anchor());

        while let Some(v) = queue.pop_front() {
            let v_start = dcel.outgoing(v);
            let mut e = v_start;
            loop {
                let flags = dcel.flags_of(e);
                if flags.intersects(EdgeFlags::HULL | EdgeFlags::TRIANGLE) || bound[e.idx()] {
                    e = dcel.next(dcel.twin(e));
                    if e == v_start {
                        break;
                    }
                    continue;
                }
                bound[e.idx()] = true;

                let mut last_edge = e;
                let mut f = dcel.next(e);
                loop {
                    bound[f.idx()] = true;
                    let fo = dcel.origin(f);
                    if !visited[fo.idx()] {
                        visited[fo.idx()] = true;
                        queue.push_back(fo);
                    }

                    let tri = LineTriangle::new(
                        cross_of(dcel, v),
                        cross_of(dcel, fo),
                        cross_of(dcel, dcel.origin(dcel.next(f))),
                    );
                    let node = push_node(
                        nodes,
                        TriNode {
                            tri,
                            node_edge: f,
                            children: Vec::new(),
                            leaf: true,
                            depth: 0,
                        },
                    );
                    dcel.edge_mut(f).triangle = Some(node);

                    let next_f = dcel.next(f);
                    if dcel.origin(dcel.next(next_f)) == v {
                        f = next_f;
                        break;
                    }

                    // Cut the remaining polygon with a diagonal from v.
                    let tedge1 = dcel.push_edge();
                    let tedge2 = dcel.push_edge();
                    let last_prev = dcel.prev(last_edge);
                    let next_f_origin = dcel.origin(next_f);

                    {
                        let t1 = dcel.edge_mut(tedge1);
                        t1.origin = v;
                        t1.twin = tedge2;
                        t1.next = next_f;
                        t1.prev = last_prev;
                        t1.flags = EdgeFlags::TRIANGLE;
                    }
                    {
                        let t2 = dcel.edge_mut(tedge2);
                        t2.origin = next_f_origin;
                        t2.twin = tedge1;
                        t2.next = last_edge;
                        t2.prev = f;
                        t2.flags = EdgeFlags::TRIANGLE;
                    }

                    dcel.edge_mut(last_prev).next = tedge1;
                    dcel.edge_mut(last_edge).prev = tedge2;
                    dcel.edge_mut(f).next = tedge2;
                    dcel.edge_mut(next_f).prev = tedge1;

                    last_edge = tedge1;
                    f = next_f;
                    if dcel.origin(dcel.next(f)) == v {
                        break;
                    }
                }

                bound[f.idx()] = true;
                let fo = dcel.origin(f);
                if !visited[fo.idx()] {
                    visited[fo.idx()] = true;
                    queue.push_back(fo);
                }

                e = dcel.next(dcel.twin(e));
                if e == v_start {
                    break;
                }
            }
        }
    }

    /// Rebuild the adjacency lists and presence map by breadth-first search
    /// from the anchor.
    fn create_graph(&mut self) {
        let dcel = &self.dcel;
        let n = dcel.vertex_count();
        self.graph = vec![Vec::new(); n];
        self.present = vec![false; n];

        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();
        visited[dcel.anchor().idx()] = true;
        self.present[dcel.anchor().idx()] = true;
        queue.push_back(dcel.anchor());

        while let Some(v) = queue.pop_front() {
            let start = dcel.outgoing(v);
            let mut e = start;
            loop {
                let u = dcel.origin(dcel.next(e));
                if u != v && !self.graph[v.idx()].contains(&u) {
                    self.graph[v.idx()].push(u);
                }
                if !visited[u.idx()] {
                    visited[u.idx()] = true;
                    self.present[u.idx()] = true;
                    queue.push_back(u);
                }
                e = dcel.next(dcel.twin(e));
                if e == start {
                    break;
                }
            }
        }
    }
}

/// Remove an independent set of low-degree vertices from a copy of the
/// previous level and retriangulate the openings, producing the next level.
fn compress_level(
    prev: &Level,
    depth: u32,
    nodes: &mut Vec<TriNode>,
    root: &mut Option<TriId>,
    deleted: &mut Vec<VertexId>,
) -> Level {
    let mut level = Level::plain(prev.dcel.clone());
    level.create_graph();

    let mut marked = vec![false; level.dcel.vertex_count()];

    // Ids 0..3 are the bounding-triangle corners (or seed structure) and are
    // never removed.
    for i in 3..level.graph.len() {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Arena ids are 32-bit by design."
        )]
        let del_v = VertexId(i as u32);
        if level.present[i] && level.graph[i].len() < 12 && !marked[i] {
            deleted.push(del_v);
            remove_and_retriangulate(&mut level.dcel, del_v, depth, nodes, root);
            for u in &level.graph[i] {
                marked[u.idx()] = true;
            }
        }
        marked[i] = true;
    }

    level
}

/// Splice `del_v` out of the DCEL, merging collinear leftovers, then
/// ear-clip the opened star-shaped face and attach the previous-level
/// triangles as children of each new triangle.
fn remove_and_retriangulate(
    dcel: &mut Dcel,
    del_v: VertexId,
    depth: u32,
    nodes: &mut Vec<TriNode>,
    root: &mut Option<TriId>,
) {
    let anchor = dcel.anchor();
    let mut face_edge: Option<EdgeId> = None;
    let mut old_triangles: Vec<TriId> = Vec::new();

    let del_start = dcel.outgoing(del_v);
    let mut e = del_start;
    loop {
        let e_twin = dcel.twin(e);
        if dcel.flags_of(e).contains(EdgeFlags::HULL)
            || dcel.flags_of(e_twin).contains(EdgeFlags::HULL)
        {
            e = dcel.next(e_twin);
            if e == del_start {
                break;
            }
            continue;
        }

        let in_edge1 = dcel.prev(e_twin);
        let in_edge2 = dcel.next(e);
        if face_edge.is_none() {
            face_edge = Some(in_edge2);
        }

        if let Some(t) = take_triangle(dcel, in_edge1) {
            old_triangles.push(t);
        }
        if let Some(t) = take_triangle(dcel, in_edge2) {
            old_triangles.push(t);
        }

        dcel.edge_mut(in_edge2).prev = in_edge1;
        dcel.edge_mut(in_edge1).next = in_edge2;
        let in2_origin = dcel.origin(in_edge2);
        if dcel.outgoing(in2_origin) == e_twin {
            dcel.vertex_mut(in2_origin).edge = in_edge2;
        }

        // Merge the two edges if removing del_v left their shared vertex as
        // a collinear degree-2 pseudo-vertex.
        let v = dcel.origin(in_edge1);
        let u = dcel.origin(in_edge2);
        let t = dcel.origin(dcel.next(in_edge2));
        let (vl1, vl2) = dcel.vertex_lines(v).expect("finite vertex");
        let (ul1, ul2) = dcel.vertex_lines(u).expect("finite vertex");
        let (tl1, tl2) = dcel.vertex_lines(t).expect("finite vertex");
        if turn(&vl1, &vl2, &ul1, &ul2, &tl1, &tl2) == Orientation::Collinear
            && dcel.vertex_degree(u) <= 2
            && u != anchor
            && in_edge1 != dcel.twin(in_edge2)
        {
            if face_edge == Some(in_edge2) {
                face_edge = Some(in_edge1);
            }
            merge_edges(dcel, in_edge1, in_edge2);
        }

        e = dcel.next(dcel.twin(e));
        if e == del_start {
            break;
        }
    }

    // Hull vertices keep their two hull edges: reconnect them around the
    // removed spokes and collapse the pair when nothing else remains.
    if dcel.flags_of(e).contains(EdgeFlags::HULL) {
        let e_twin = dcel.twin(e);
        let e_prev_twin = dcel.twin(dcel.prev(e));
        dcel.edge_mut(e_twin).next = e_prev_twin;
        dcel.edge_mut(e_prev_twin).prev = e_twin;

        if dcel.vertex_degree(del_v) == 2 {
            if face_edge == Some(e_prev_twin) {
                face_edge = Some(e_twin);
            }
            let e_prev = dcel.prev(e);
            merge_edges(dcel, e_prev, e);
        }
    }

    let mut face_edge = face_edge.expect("removed vertex had interior edges");

    // Ear-clip the opened face.
    loop {
        let v = dcel.origin(face_edge);
        let u = dcel.origin(dcel.next(face_edge));
        let s = dcel.origin(dcel.next(dcel.next(face_edge)));
        let tri = LineTriangle::new(cross_of(dcel, v), cross_of(dcel, u), cross_of(dcel, s));

        if is_triangle_face(dcel, face_edge) {
            let node = push_node(
                nodes,
                TriNode {
                    tri,
                    node_edge: face_edge,
                    children: Vec::new(),
                    leaf: false,
                    depth,
                },
            );
            attach_children(nodes, node, &old_triangles);
            dcel.edge_mut(face_edge).triangle = Some(node);

            if !not_trivial(dcel) {
                *root = Some(node);
            }
            break;
        }

        let (vl1, vl2) = dcel.vertex_lines(v).expect("finite vertex");
        let (ul1, ul2) = dcel.vertex_lines(u).expect("finite vertex");
        let (sl1, sl2) = dcel.vertex_lines(s).expect("finite vertex");
        let mut is_ear = turn(&vl1, &vl2, &ul1, &ul2, &sl1, &sl2) == Orientation::Left;
        if is_ear {
            let mut w = face_edge;
            loop {
                let t = dcel.origin(w);
                if t != v && t != u && t != s {
                    let (tl1, tl2) = dcel.vertex_lines(t).expect("finite vertex");
                    is_ear = !triangle_contains_convex_point(&tri, &tl1, &tl2);
                }
                w = dcel.next(w);
                if !is_ear || w == face_edge {
                    break;
                }
            }
        }

        let (dl1, dl2) = dcel.vertex_lines(del_v).expect("finite vertex");
        if is_ear && !triangle_contains_star_point(&tri, &dl1, &dl2) {
            let tedge1 = dcel.push_edge();
            let tedge2 = dcel.push_edge();

            let fe_next = dcel.next(face_edge);
            let fe_nn = dcel.next(fe_next);
            let fe_prev = dcel.prev(face_edge);

            let node = push_node(
                nodes,
                TriNode {
                    tri,
                    node_edge: face_edge,
                    children: Vec::new(),
                    leaf: false,
                    depth,
                },
            );
            attach_children(nodes, node, &old_triangles);

            {
                let t1 = dcel.edge_mut(tedge1);
                t1.origin = v;
                t1.twin = tedge2;
                t1.next = fe_nn;
                t1.prev = fe_prev;
                t1.flags = EdgeFlags::TRIANGLE;
            }
            {
                let t2 = dcel.edge_mut(tedge2);
                t2.origin = s;
                t2.twin = tedge1;
                t2.next = face_edge;
                t2.prev = fe_next;
                t2.flags = EdgeFlags::TRIANGLE;
                t2.triangle = Some(node);
            }

            dcel.edge_mut(fe_prev).next = tedge1;
            dcel.edge_mut(face_edge).prev = tedge2;
            dcel.edge_mut(fe_nn).prev = tedge1;
            dcel.edge_mut(fe_next).next = tedge2;

            face_edge = tedge1;
        } else {
            face_edge = dcel.next(face_edge);
        }
    }
}

fn attach_children(nodes: &mut Vec<TriNode>, parent: TriId, candidates: &[TriId]) {
    let tri = nodes[parent.idx()].tri;
    for &old in candidates {
        if triangles_intersect(&tri, &nodes[old.idx()].tri) {
            nodes[parent.idx()].children.push(old);
        }
    }
}
