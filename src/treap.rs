//! Treaps used as positional sequences, many of them sharing one arena.
//!
//! A tree is named by any node it contains, its canonical name being its root.
//! Nodes never move between slots, so an index returned by [`Treaps::create`]
//! stays valid across [`Treaps::concat`] and [`Treaps::split`] until it is
//! [removed](Treaps::remove).
//!
//! Every node carries two flags, `is_vertex` and `has_level_edges`, and the
//! number of set flags of each kind in its subtree.

use std::fmt::{Debug, Display, Formatter};

use debug_tree::{add_branch_to, AsTree, TreeBuilder};
use derivative::Derivative;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{Error, Result};

mod cursor;
pub use cursor::{Cursor, Iter};

pub type Idx = usize;
/// Index of no node. Names the empty tree, a missing child or a missing parent.
pub const EMPTY: Idx = usize::MAX;
pub const DEFAULT_SEED: u64 = 2012;

fn node_fmt(u: &Idx, f: &mut Formatter) -> std::fmt::Result {
    if *u == EMPTY {
        write!(f, "∅")
    } else {
        write!(f, "{u}")
    }
}
fn node2_fmt([u, v]: &[Idx; 2], f: &mut Formatter) -> std::fmt::Result {
    write!(f, "[")?;
    node_fmt(u, f)?;
    write!(f, ", ")?;
    node_fmt(v, f)?;
    write!(f, "]")
}

/// Used to pretty print a Idx, outputting ∅ if it is EMPTY.
pub struct PrettyIdx(pub Idx);

impl Display for PrettyIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        node_fmt(&self.0, f)
    }
}

impl Debug for PrettyIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

use PrettyIdx as I;

#[derive(Derivative)]
#[derivative(Debug)]
struct Node<T> {
    #[derivative(Debug(format_with = "node_fmt"))]
    parent: Idx,
    /// Left and right child
    #[derivative(Debug(format_with = "node2_fmt"))]
    child: [Idx; 2],
    value: T,
    is_vertex: bool,
    has_level_edges: bool,
    /// Nodes with `is_vertex` in this subtree
    vertex_count: usize,
    /// Nodes with `has_level_edges` in this subtree
    level_edge_count: usize,
    /// First and last node of this subtree
    #[derivative(Debug = "ignore")]
    bounds: [Idx; 2],
    #[derivative(Debug = "ignore")]
    priority: u32,
    /// Slot is on the free list.
    #[derivative(Debug = "ignore")]
    removed: bool,
}

impl<T> Node<T> {
    fn new(idx: Idx, value: T, priority: u32) -> Self {
        Self {
            parent: EMPTY,
            child: [EMPTY; 2],
            value,
            is_vertex: false,
            has_level_edges: false,
            vertex_count: 0,
            level_edge_count: 0,
            bounds: [idx, idx],
            priority,
            removed: false,
        }
    }
}

pub struct Treaps<T> {
    nodes: Vec<Node<T>>,
    /// Removed slots, reused by `create`.
    free: Vec<Idx>,
    rng: StdRng,
}

impl<T: Debug> Debug for Treaps<T> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let builder = TreeBuilder::new();
        let _b = builder.add_branch("Treaps");
        for u in 0..self.nodes.len() {
            if self.nodes[u].parent == EMPTY && !self.nodes[u].removed {
                self.tree_inorder_dbg(u, &builder);
            }
        }
        writeln!(f, "{}", builder.string())
    }
}

impl<T: Debug> Treaps<T> {
    fn tree_inorder_dbg<A: AsTree>(&self, u: Idx, tree: &A) {
        let nu = &self.nodes[u];
        if nu.child[0] != EMPTY {
            add_branch_to!(*tree, "left child of {u}");
            self.tree_inorder_dbg(nu.child[0], tree);
        }
        add_branch_to!(*tree, "[{u}] {nu:?}");
        if nu.child[1] != EMPTY {
            self.tree_inorder_dbg(nu.child[1], tree);
        }
    }
}

impl<T> Treaps<T> {
    /// New arena with the default seed.
    pub fn new(capacity: usize) -> Self {
        Self::with_seed(capacity, DEFAULT_SEED)
    }
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }
    /// New arena drawing priorities from `rng`. The same generator state gives the same tree shapes.
    pub fn with_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            rng,
        }
    }

    /// Creates a single-node tree. Its priority is drawn now and never changes.
    pub fn create(&mut self, value: T) -> Idx {
        let priority = self.rng.gen();
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = Node::new(idx, value, priority);
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Node::new(idx, value, priority));
            idx
        }
    }

    /// Creates one tree holding `values` in order. Returns its root.
    pub fn create_list(&mut self, values: impl IntoIterator<Item = T>) -> Idx {
        let mut root = EMPTY;
        for value in values {
            let u = self.create(value);
            root = self.concat(root, u);
        }
        root
    }

    /// Frees the slot of a single-node tree.
    pub fn remove(&mut self, u: Idx) -> Result<()> {
        let n = &self.nodes[u];
        if n.removed {
            return Err(Error::InvariantViolation("slot already removed"));
        }
        if n.parent != EMPTY || n.child != [EMPTY; 2] {
            return Err(Error::InvariantViolation(
                "only single-node trees can be removed",
            ));
        }
        self.nodes[u].removed = true;
        self.free.push(u);
        Ok(())
    }

    /// Number of live nodes in all trees.
    pub fn total_size(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn n(&self, u: Idx) -> Option<&Node<T>> {
        if u == EMPTY {
            None
        } else {
            Some(&self.nodes[u])
        }
    }

    pub fn value(&self, u: Idx) -> &T {
        &self.nodes[u].value
    }

    pub fn is_vertex(&self, u: Idx) -> bool {
        self.n(u).map_or(false, |n| n.is_vertex)
    }

    pub fn has_level_edges(&self, u: Idx) -> bool {
        self.n(u).map_or(false, |n| n.has_level_edges)
    }

    /// Vertex markers in the subtree of u (not the whole tree).
    pub fn vertex_count(&self, u: Idx) -> usize {
        self.n(u).map_or(0, |n| n.vertex_count)
    }

    /// Level-edge markers in the subtree of u (not the whole tree).
    pub fn level_edge_count(&self, u: Idx) -> usize {
        self.n(u).map_or(0, |n| n.level_edge_count)
    }

    fn parent(&self, u: Idx) -> Idx {
        self.n(u).map_or(EMPTY, |n| n.parent)
    }

    /// Returns the root of the tree containing u. All nodes in the tree have the same root.
    pub fn root(&self, mut u: Idx) -> Idx {
        while self.parent(u) != EMPTY {
            u = self.nodes[u].parent;
        }
        u
    }

    pub fn on_same_tree(&self, u: Idx, v: Idx) -> bool {
        self.root(u) == self.root(v)
    }

    /// Number of vertex markers in the whole tree containing u.
    pub fn size(&self, u: Idx) -> usize {
        self.vertex_count(self.root(u))
    }

    pub fn is_empty(&self, u: Idx) -> bool {
        u == EMPTY
    }

    pub fn set_is_vertex(&mut self, u: Idx, is_vertex: bool) {
        if self.nodes[u].is_vertex != is_vertex {
            self.nodes[u].is_vertex = is_vertex;
            self.recalc_path(u);
        }
    }

    pub fn set_has_level_edges(&mut self, u: Idx, has_level_edges: bool) {
        if self.nodes[u].has_level_edges != has_level_edges {
            self.nodes[u].has_level_edges = has_level_edges;
            self.recalc_path(u);
        }
    }

    fn recalc_path(&mut self, mut u: Idx) {
        while u != EMPTY {
            self.recalc(u);
            u = self.nodes[u].parent;
        }
    }

    // Call when children or flags of u change.
    fn recalc(&mut self, u: Idx) {
        let [l, r] = self.nodes[u].child;
        let (ln, rn) = (self.n(l), self.n(r));
        let vertex_count = ln.map_or(0, |n| n.vertex_count)
            + rn.map_or(0, |n| n.vertex_count)
            + usize::from(self.nodes[u].is_vertex);
        let level_edge_count = ln.map_or(0, |n| n.level_edge_count)
            + rn.map_or(0, |n| n.level_edge_count)
            + usize::from(self.nodes[u].has_level_edges);
        let bounds = [ln.map_or(u, |n| n.bounds[0]), rn.map_or(u, |n| n.bounds[1])];
        let n = &mut self.nodes[u];
        n.vertex_count = vertex_count;
        n.level_edge_count = level_edge_count;
        n.bounds = bounds;
    }

    fn set_child(&mut self, u: Idx, side: usize, c: Idx) {
        self.nodes[u].child[side] = c;
        if c != EMPTY {
            self.nodes[c].parent = u;
        }
        self.recalc(u);
    }

    /// Concats the trees containing u and v, in this order. Returns the new root.
    pub fn concat(&mut self, u: Idx, v: Idx) -> Idx {
        let (u, v) = (self.root(u), self.root(v));
        debug_assert!(u == EMPTY || u != v, "concat of tree {u} with itself");
        let r = self.concat_inner(u, v);
        log::trace!("concat({}, {}) = {}", I(u), I(v), I(r));
        r
    }

    /// Concats all given trees. Returns the new root.
    pub fn concat_all(&mut self, all: impl IntoIterator<Item = Idx>) -> Idx {
        let mut u = EMPTY;
        for v in all {
            u = self.concat(u, v);
        }
        u
    }

    // u and v are roots. Ties in priority keep u on top.
    fn concat_inner(&mut self, u: Idx, v: Idx) -> Idx {
        if u == EMPTY {
            return v;
        } else if v == EMPTY {
            return u;
        }
        if self.nodes[u].priority >= self.nodes[v].priority {
            let old_r = self.nodes[u].child[1];
            let new_r = self.concat_inner(old_r, v);
            self.set_child(u, 1, new_r);
            u
        } else {
            let old_l = self.nodes[v].child[0];
            let new_l = self.concat_inner(u, old_l);
            self.set_child(v, 0, new_l);
            v
        }
    }

    /// Splits the tree at `at`. Returns (everything before `at`, `at` and everything after it).
    ///
    /// Walks from the node to the root, hanging each ancestor on the part it belongs to.
    pub fn split(&mut self, at: Cursor) -> Result<(Idx, Idx)> {
        if at.is_end() {
            return Err(Error::InvariantViolation("split at an end position"));
        }
        let u = at.node();
        let mut left = self.nodes[u].child[0];
        if left != EMPTY {
            self.nodes[left].parent = EMPTY;
        }
        self.set_child(u, 0, EMPTY);
        let mut right = u;
        let (mut cur, mut p) = (u, self.nodes[u].parent);
        while p != EMPTY {
            let next_p = self.nodes[p].parent;
            if self.nodes[p].child[1] == cur {
                self.set_child(p, 1, left);
                left = p;
            } else {
                self.set_child(p, 0, right);
                right = p;
            }
            cur = p;
            p = next_p;
        }
        for t in [left, right] {
            if t != EMPTY {
                self.nodes[t].parent = EMPTY;
            }
        }
        log::trace!("split at {u} = ({}, {})", I(left), I(right));
        Ok((left, right))
    }

    /// Detaches the first node of the tree containing u. Returns (first, rest).
    pub fn pop_front(&mut self, u: Idx) -> Result<(Idx, Idx)> {
        let first = self.begin(u);
        if first.is_end() {
            return Ok((EMPTY, EMPTY));
        }
        let second = self.next(first)?;
        if second.is_end() {
            Ok((first.node(), EMPTY))
        } else {
            self.split(second)
        }
    }

    /// Recounts (vertex markers, level-edge markers) of the subtree of u from scratch.
    pub fn recount(&self, u: Idx) -> (usize, usize) {
        match self.n(u) {
            None => (0, 0),
            Some(n) => {
                let (lv, ll) = self.recount(n.child[0]);
                let (rv, rl) = self.recount(n.child[1]);
                (
                    lv + rv + usize::from(n.is_vertex),
                    ll + rl + usize::from(n.has_level_edges),
                )
            }
        }
    }
}
