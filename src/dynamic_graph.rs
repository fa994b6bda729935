use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{check_pair, check_vertex, Error, Result};
use crate::level_graph::{EraseOutcome, LevelGraph};
use crate::treap::DEFAULT_SEED;

/// Fully dynamic connectivity of an undirected graph on vertices 0..n.
///
/// Edges are inserted at the top level and only ever move down. Amortized
/// O(log² n) per update, O(log n) per query.
#[derive(Debug)]
pub struct DynamicGraph {
    n: usize,
    /// levels[0] is the bottom. The forest of the last level spans the whole graph.
    levels: Vec<LevelGraph>,
}

impl DynamicGraph {
    /// Empty graph on n vertices.
    pub fn new(n: usize) -> Self {
        Self::with_seed(n, DEFAULT_SEED)
    }

    pub fn with_seed(n: usize, seed: u64) -> Self {
        Self::with_rng(n, &mut StdRng::seed_from_u64(seed))
    }

    /// Empty graph on n vertices, each level's treap priorities seeded from `rng`.
    pub fn with_rng(n: usize, rng: &mut impl Rng) -> Self {
        let num_levels = (n.next_power_of_two().trailing_zeros() as usize) + 1;
        let levels = (0..num_levels)
            .map(|level| LevelGraph::with_rng(level, n, StdRng::seed_from_u64(rng.gen())))
            .collect();
        Self { n, levels }
    }

    pub fn num_vertices(&self) -> usize {
        self.n
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.levels.iter().map(LevelGraph::num_level_edges).sum()
    }

    /// Level `level`, 0 being the bottom.
    ///
    /// # Panics
    ///
    /// If `level >= self.num_levels()`.
    pub fn level(&self, level: usize) -> &LevelGraph {
        &self.levels[level]
    }

    fn top(&self) -> &LevelGraph {
        &self.levels[self.levels.len() - 1]
    }

    /// Level currently holding (u, v), if the edge exists.
    pub fn edge_level(&self, u: usize, v: usize) -> Option<usize> {
        self.levels.iter().rposition(|l| l.has_edge(u, v))
    }

    pub fn contains_edge(&self, u: usize, v: usize) -> bool {
        self.edge_level(u, v).is_some()
    }

    pub fn insert(&mut self, u: usize, v: usize) -> Result<()> {
        check_pair(u, v, self.n)?;
        if self.contains_edge(u, v) {
            return Err(Error::EdgeAlreadyExists(u, v));
        }
        log::trace!("insert ({u}, {v})");
        let top = self.levels.len() - 1;
        self.levels[top].insert_to_level(u, v)
    }

    pub fn erase(&mut self, u: usize, v: usize) -> Result<()> {
        check_pair(u, v, self.n)?;
        let level = self.edge_level(u, v).ok_or(Error::EdgeNotFound(u, v))?;
        log::trace!("erase ({u}, {v}) from level {level}");
        let (below, rest) = self.levels.split_at_mut(level);
        let mut outcome = rest[0].erase_from_level(u, v, below.last_mut())?;
        let mut k = level;
        // Every forest from the edge's level up contains it; each searches its own level edges.
        while outcome == EraseOutcome::NoReplacement && k + 1 < self.levels.len() {
            k += 1;
            let (below, rest) = self.levels.split_at_mut(k);
            outcome = rest[0].search_replacement(u, v, below.last_mut())?;
        }
        match outcome {
            EraseOutcome::NonTreeEdge => {}
            EraseOutcome::NoReplacement => log::debug!("({u}, {v}) was a bridge"),
            EraseOutcome::Replaced { u: x, v: y } => {
                log::debug!("({x}, {y}) replaces ({u}, {v}) from level {k} up");
                for above in &mut self.levels[k + 1..] {
                    above.relink(u, v, x, y)?;
                }
            }
        }
        Ok(())
    }

    pub fn is_connected(&self, u: usize, v: usize) -> Result<bool> {
        check_pair(u, v, self.n)?;
        self.top().is_connected(u, v)
    }

    /// Number of vertices in the component of v.
    pub fn component_size(&self, v: usize) -> Result<usize> {
        check_vertex(v, self.n)?;
        Ok(self.top().forest().component_size(v))
    }
}
