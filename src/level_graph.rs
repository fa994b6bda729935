//! One level of the decomposition: a spanning forest plus the edges assigned to this level.
//!
//! The forest of level k spans the tree edges of level at most k, so each level's forest is
//! contained in the forest of the level above it. Every tree of the level-k forest has at most
//! 2^k vertices.

use std::collections::BTreeSet;

use rand::rngs::StdRng;

use crate::error::{check_pair, Error, Result};
use crate::euler_tour_forest::EulerTourForest;

/// Result of removing an edge from a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseOutcome {
    /// The edge was not a tree edge. No forest changed.
    NonTreeEdge,
    /// The cut tree edge was replaced by (u, v), now a tree edge of this level.
    Replaced { u: usize, v: usize },
    /// No edge of this level reconnects the two sides. The search continues one level up.
    NoReplacement,
}

#[derive(Debug)]
pub struct LevelGraph {
    level: usize,
    forest: EulerTourForest,
    /// Neighbors through edges whose level is exactly this one, tree edges included.
    edges_at_level: Vec<BTreeSet<usize>>,
}

impl LevelGraph {
    pub fn new(level: usize, n: usize) -> Self {
        Self::from_forest(level, EulerTourForest::new(n))
    }

    pub fn with_rng(level: usize, n: usize, rng: StdRng) -> Self {
        Self::from_forest(level, EulerTourForest::with_rng(n, rng))
    }

    fn from_forest(level: usize, forest: EulerTourForest) -> Self {
        Self {
            level,
            edges_at_level: vec![BTreeSet::new(); forest.num_vertices()],
            forest,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn forest(&self) -> &EulerTourForest {
        &self.forest
    }

    /// Is (u, v) assigned to this level.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.edges_at_level
            .get(u)
            .map_or(false, |adj| adj.contains(&v))
    }

    /// Neighbors of v through edges of this level.
    ///
    /// # Panics
    ///
    /// If v is not a vertex of this level.
    pub fn level_edges(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges_at_level[v].iter().copied()
    }

    pub fn num_level_edges(&self) -> usize {
        self.edges_at_level.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn is_connected(&self, u: usize, v: usize) -> Result<bool> {
        self.forest.is_connected(u, v)
    }

    fn add_adjacent(&mut self, u: usize, v: usize) {
        let adj = &mut self.edges_at_level[u];
        if adj.insert(v) && adj.len() == 1 {
            self.forest.set_has_level_edges(u, true);
        }
    }

    fn remove_adjacent(&mut self, u: usize, v: usize) {
        let adj = &mut self.edges_at_level[u];
        if adj.remove(&v) && adj.is_empty() {
            self.forest.set_has_level_edges(u, false);
        }
    }

    /// Assigns (u, v) to this level. It becomes a tree edge if u and v were not connected here.
    pub fn insert_to_level(&mut self, u: usize, v: usize) -> Result<()> {
        check_pair(u, v, self.forest.num_vertices())?;
        if self.has_edge(u, v) {
            return Err(Error::EdgeAlreadyExists(u, v));
        }
        self.add_adjacent(u, v);
        self.add_adjacent(v, u);
        if !self.forest.is_connected(u, v)? {
            self.forest.add_new_edge(u, v)?;
        }
        Ok(())
    }

    /// Removes (u, v), which must be assigned to this level.
    ///
    /// If it was a tree edge, looks for a replacement among this level's edges, demoting
    /// edges to `lower` on the way.
    pub fn erase_from_level(
        &mut self,
        u: usize,
        v: usize,
        lower: Option<&mut LevelGraph>,
    ) -> Result<EraseOutcome> {
        check_pair(u, v, self.forest.num_vertices())?;
        if !self.has_edge(u, v) {
            return Err(Error::EdgeNotFound(u, v));
        }
        self.remove_adjacent(u, v);
        self.remove_adjacent(v, u);
        if !self.forest.contains_edge(u, v) {
            return Ok(EraseOutcome::NonTreeEdge);
        }
        self.search_replacement(u, v, lower)
    }

    /// Cuts the tree edge (u, v) from this forest and searches this level's edges for one that
    /// reconnects the two sides.
    ///
    /// Only the vertices of the smaller side that have level edges are visited. Level edges
    /// inside the smaller side are demoted to `lower`, tree edges first so that the side is
    /// already connected there when its non-tree edges arrive.
    pub fn search_replacement(
        &mut self,
        u: usize,
        v: usize,
        mut lower: Option<&mut LevelGraph>,
    ) -> Result<EraseOutcome> {
        let (u_side, v_side) = self.forest.erase_existing_edge(u, v)?;
        let tours = self.forest.tours();
        let small = if tours.size(v_side) < tours.size(u_side) {
            v_side
        } else {
            u_side
        };
        log::debug!(
            "level {}: cut ({u}, {v}), scanning {} of {} vertices",
            self.level,
            tours.size(small),
            tours.size(u_side) + tours.size(v_side)
        );

        let mut c = self.forest.tours().begin_with_level_edges(small);
        while !c.is_end() {
            let x = self.forest.vertex_at(c.node())?;
            let tree_neighbors: Vec<usize> = self.edges_at_level[x]
                .iter()
                .copied()
                .filter(|&y| self.forest.contains_edge(x, y))
                .collect();
            for y in tree_neighbors {
                self.demote(x, y, lower.as_deref_mut())?;
            }
            c = self.forest.tours().next_with_level_edges(c)?;
        }

        let mut c = self.forest.tours().begin_with_level_edges(small);
        while !c.is_end() {
            let x = self.forest.vertex_at(c.node())?;
            let neighbors: Vec<usize> = self.level_edges(x).collect();
            for y in neighbors {
                if self.forest.tree_root(y) != small {
                    self.forest.add_new_edge(x, y)?;
                    log::debug!("level {}: ({x}, {y}) replaces ({u}, {v})", self.level);
                    return Ok(EraseOutcome::Replaced { u: x, v: y });
                }
                self.demote(x, y, lower.as_deref_mut())?;
            }
            c = self.forest.tours().next_with_level_edges(c)?;
        }
        Ok(EraseOutcome::NoReplacement)
    }

    /// Moves (x, y) from this level to the one below.
    fn demote(&mut self, x: usize, y: usize, lower: Option<&mut LevelGraph>) -> Result<()> {
        let lower = lower.ok_or(Error::InvariantViolation(
            "edge demoted below the bottom level",
        ))?;
        self.remove_adjacent(x, y);
        self.remove_adjacent(y, x);
        lower.insert_to_level(x, y)?;
        log::trace!("level {}: demoted ({x}, {y})", self.level);
        Ok(())
    }

    /// Replaces the tree edge (u, v) of this forest with (x, y), found at a lower level.
    pub fn relink(&mut self, u: usize, v: usize, x: usize, y: usize) -> Result<()> {
        self.forest.erase_existing_edge(u, v)?;
        self.forest.add_new_edge(x, y)
    }
}
