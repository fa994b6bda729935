use super::{Idx, Treaps, EMPTY};
use crate::error::{Error, Result};

/// A position in a tree: one of its nodes, or the end position just past its last node.
///
/// Two cursors are equal iff they point to the same node with the same end flag.
/// The end cursor of a non-empty tree points to its last node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    node: Idx,
    at_end: bool,
}

impl Cursor {
    /// Cursor at node u. `Cursor::at(EMPTY)` is the end of the empty tree.
    pub fn at(node: Idx) -> Self {
        Self {
            node,
            at_end: node == EMPTY,
        }
    }
    fn end_after(last: Idx) -> Self {
        Self {
            node: last,
            at_end: true,
        }
    }
    pub fn node(&self) -> Idx {
        self.node
    }
    pub fn is_end(&self) -> bool {
        self.at_end
    }
}

impl<T> Treaps<T> {
    pub fn begin(&self, u: Idx) -> Cursor {
        match self.n(self.root(u)) {
            None => Cursor::at(EMPTY),
            Some(n) => Cursor::at(n.bounds[0]),
        }
    }

    /// First node of the tree containing u that has level edges, or the end.
    pub fn begin_with_level_edges(&self, u: Idx) -> Cursor {
        let r = self.root(u);
        if self.level_edge_count(r) == 0 {
            self.end(r)
        } else {
            Cursor::at(self.first_with_level_edges(r))
        }
    }

    pub fn end(&self, u: Idx) -> Cursor {
        match self.n(self.root(u)) {
            None => Cursor::at(EMPTY),
            Some(n) => Cursor::end_after(n.bounds[1]),
        }
    }

    /// Root of the tree the cursor points into.
    pub fn find_root(&self, c: Cursor) -> Idx {
        self.root(c.node)
    }

    // Subtree of u must have some node with level edges.
    fn first_with_level_edges(&self, mut u: Idx) -> Idx {
        loop {
            let [l, r] = self.nodes[u].child;
            if self.level_edge_count(l) > 0 {
                u = l;
            } else if self.nodes[u].has_level_edges {
                return u;
            } else {
                debug_assert!(self.level_edge_count(r) > 0);
                u = r;
            }
        }
    }

    /// In-order successor. Past the last node this is the end cursor.
    pub fn next(&self, c: Cursor) -> Result<Cursor> {
        if c.at_end {
            return Err(Error::InvariantViolation("increment past the end position"));
        }
        Ok(self.successor(c.node))
    }

    // u is a node, never the end.
    fn successor(&self, u: Idx) -> Cursor {
        let r = self.nodes[u].child[1];
        if r != EMPTY {
            return Cursor::at(self.nodes[r].bounds[0]);
        }
        let mut cur = u;
        loop {
            let p = self.nodes[cur].parent;
            if p == EMPTY {
                return Cursor::end_after(u);
            }
            if self.nodes[p].child[0] == cur {
                return Cursor::at(p);
            }
            cur = p;
        }
    }

    /// In-order predecessor. From the end cursor this is the last node.
    pub fn prev(&self, c: Cursor) -> Result<Cursor> {
        if c.at_end {
            return if c.node == EMPTY {
                Err(Error::InvariantViolation("decrement in an empty tree"))
            } else {
                Ok(Cursor::at(c.node))
            };
        }
        let l = self.nodes[c.node].child[0];
        if l != EMPTY {
            return Ok(Cursor::at(self.nodes[l].bounds[1]));
        }
        let mut u = c.node;
        loop {
            let p = self.nodes[u].parent;
            if p == EMPTY {
                return Err(Error::InvariantViolation(
                    "decrement before the first position",
                ));
            }
            if self.nodes[p].child[1] == u {
                return Ok(Cursor::at(p));
            }
            u = p;
        }
    }

    /// Next node after `c` that has level edges, or the end.
    ///
    /// Only enters subtrees whose level-edge counter is non-zero.
    pub fn next_with_level_edges(&self, c: Cursor) -> Result<Cursor> {
        if c.at_end {
            return Err(Error::InvariantViolation("increment past the end position"));
        }
        let r = self.nodes[c.node].child[1];
        if self.level_edge_count(r) > 0 {
            return Ok(Cursor::at(self.first_with_level_edges(r)));
        }
        let mut u = c.node;
        loop {
            let p = self.nodes[u].parent;
            if p == EMPTY {
                return Ok(Cursor::end_after(self.nodes[u].bounds[1]));
            }
            if self.nodes[p].child[0] == u {
                if self.nodes[p].has_level_edges {
                    return Ok(Cursor::at(p));
                }
                let pr = self.nodes[p].child[1];
                if self.level_edge_count(pr) > 0 {
                    return Ok(Cursor::at(self.first_with_level_edges(pr)));
                }
            }
            u = p;
        }
    }

    /// Nodes of the tree containing u, in order.
    pub fn iter(&self, u: Idx) -> Iter<'_, T> {
        Iter {
            treaps: self,
            cur: self.begin(u),
        }
    }
}

pub struct Iter<'a, T> {
    treaps: &'a Treaps<T>,
    cur: Cursor,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = Idx;

    fn next(&mut self) -> Option<Idx> {
        if self.cur.is_end() {
            return None;
        }
        let u = self.cur.node;
        self.cur = self.treaps.successor(u);
        Some(u)
    }
}
