//! A spanning forest stored as Euler tours, one treap per tree.
//!
//! Each vertex has exactly one vertex occurrence in its tour. Each tree edge
//! contributes two arc occurrences, one per direction. A tour is cyclic, so it
//! can be rotated to start anywhere, which is how trees are rerooted.

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use crate::error::{check_pair, Error, Result};
use crate::treap::{Cursor, Idx, Treaps};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourItem {
    Vertex(usize),
    /// Crossing a tree edge from the first vertex to the second.
    Arc(usize, usize),
}

#[derive(Debug)]
pub struct EulerTourForest {
    n: usize,
    tours: Treaps<TourItem>,
    /// Vertex occurrence of each vertex. Never changes, arena slots are stable.
    home: Vec<Idx>,
    /// (min, max) -> [arc min->max, arc max->min]
    edges: BTreeMap<(usize, usize), [Idx; 2]>,
}

fn key(u: usize, v: usize) -> (usize, usize) {
    (u.min(v), u.max(v))
}

impl EulerTourForest {
    /// Forest of n isolated vertices.
    pub fn new(n: usize) -> Self {
        Self::from_treaps(n, Treaps::new(3 * n))
    }

    pub fn with_rng(n: usize, rng: StdRng) -> Self {
        Self::from_treaps(n, Treaps::with_rng(3 * n, rng))
    }

    fn from_treaps(n: usize, mut tours: Treaps<TourItem>) -> Self {
        let home = (0..n)
            .map(|v| {
                let u = tours.create(TourItem::Vertex(v));
                tours.set_is_vertex(u, true);
                u
            })
            .collect();
        Self {
            n,
            tours,
            home,
            edges: BTreeMap::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Number of tree edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn tours(&self) -> &Treaps<TourItem> {
        &self.tours
    }

    /// Node of the vertex occurrence of v.
    ///
    /// # Panics
    ///
    /// If v >= n.
    pub fn home(&self, v: usize) -> Idx {
        self.home[v]
    }

    /// Root of the tour containing v. Two vertices are connected iff their roots are equal.
    ///
    /// # Panics
    ///
    /// If v >= n.
    pub fn tree_root(&self, v: usize) -> Idx {
        self.tours.root(self.home[v])
    }

    /// Number of vertices in the tree containing v.
    ///
    /// # Panics
    ///
    /// If v >= n.
    pub fn component_size(&self, v: usize) -> usize {
        self.tours.size(self.home[v])
    }

    /// Is (u, v) a tree edge, in either orientation.
    pub fn contains_edge(&self, u: usize, v: usize) -> bool {
        self.edges.contains_key(&key(u, v))
    }

    /// Marks whether v has edges at the owning level.
    ///
    /// # Panics
    ///
    /// If v >= n.
    pub fn set_has_level_edges(&mut self, v: usize, has_level_edges: bool) {
        self.tours.set_has_level_edges(self.home[v], has_level_edges);
    }

    /// Vertex of a vertex occurrence.
    pub fn vertex_at(&self, node: Idx) -> Result<usize> {
        match self.tours.value(node) {
            TourItem::Vertex(v) => Ok(*v),
            TourItem::Arc(..) => Err(Error::InvariantViolation(
                "expected a vertex occurrence, found an arc",
            )),
        }
    }

    /// The tour of the tree containing v.
    ///
    /// # Panics
    ///
    /// If v >= n.
    pub fn tour(&self, v: usize) -> Vec<TourItem> {
        self.tours
            .iter(self.home[v])
            .map(|u| *self.tours.value(u))
            .collect()
    }

    pub fn is_connected(&self, u: usize, v: usize) -> Result<bool> {
        check_pair(u, v, self.n)?;
        Ok(self.tree_root(u) == self.tree_root(v))
    }

    /// Rotates the tour of v to start at v. Returns the root.
    fn reroot(&mut self, v: usize) -> Result<Idx> {
        let (before, from_v) = self.tours.split(Cursor::at(self.home[v]))?;
        Ok(self.tours.concat(from_v, before))
    }

    /// Links the trees of u and v with the tree edge (u, v).
    pub fn add_new_edge(&mut self, u: usize, v: usize) -> Result<()> {
        check_pair(u, v, self.n)?;
        if self.contains_edge(u, v) {
            return Err(Error::EdgeAlreadyExists(u, v));
        }
        if self.tree_root(u) == self.tree_root(v) {
            return Err(Error::InvariantViolation(
                "linking two vertices of the same tree",
            ));
        }
        let tour_u = self.reroot(u)?;
        let tour_v = self.reroot(v)?;
        let down = self.tours.create(TourItem::Arc(u, v));
        let back = self.tours.create(TourItem::Arc(v, u));
        self.tours.concat_all([tour_u, down, tour_v, back]);
        let arcs = if u < v { [down, back] } else { [back, down] };
        self.edges.insert(key(u, v), arcs);
        log::trace!("link ({u}, {v}) with arcs {down} {back}");
        Ok(())
    }

    /// Cuts the tree edge (u, v). Returns the roots of the trees of u and of v.
    pub fn erase_existing_edge(&mut self, u: usize, v: usize) -> Result<(Idx, Idx)> {
        check_pair(u, v, self.n)?;
        let arcs = self
            .edges
            .remove(&key(u, v))
            .ok_or(Error::EdgeNotFound(u, v))?;
        let [down, back] = if u < v { arcs } else { [arcs[1], arcs[0]] };
        // Starting the tour at u -> v puts v's side between the two arcs.
        let (before, from_down) = self.tours.split(Cursor::at(down))?;
        self.tours.concat(from_down, before);
        let (with_down, from_back) = self.tours.split(Cursor::at(back))?;
        let (_, v_side) = self.tours.pop_front(with_down)?;
        let (_, u_side) = self.tours.pop_front(from_back)?;
        self.tours.remove(down)?;
        self.tours.remove(back)?;
        log::trace!("cut ({u}, {v}) into {u_side} and {v_side}");
        Ok((u_side, v_side))
    }
}
