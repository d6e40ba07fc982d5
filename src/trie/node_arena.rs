//! An index arena for trie nodes.
//!
//! Nodes are addressed by [`NodeId`] rather than by reference, so a DAG with
//! many parents per node needs no shared ownership: two edges point at the
//! same node exactly when they carry the same id.

use std::ops::{Index, IndexMut};

use super::node::TrieNode;

/// Position of a node inside a [`NodeArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena slot this id refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Append-only storage for [`TrieNode`]s.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<TrieNode>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Stores a node and returns its id.
    pub fn alloc(&mut self, node: TrieNode) -> NodeId {
        let id = u32::try_from(self.nodes.len()).expect("node arena exceeds u32::MAX nodes");
        self.nodes.push(node);
        NodeId(id)
    }

    /// Drops `id` if it is the most recently allocated node.
    ///
    /// Decoders allocate a placeholder for every character and then discover
    /// that it is a reference or a plain word end; discarding it here keeps the
    /// arena free of unreachable slots. Returns `false` and leaves the arena
    /// untouched if `id` is not the last node.
    pub(crate) fn discard_last(&mut self, id: NodeId) -> bool {
        if id.index() + 1 == self.nodes.len() {
            self.nodes.pop();
            true
        } else {
            false
        }
    }

    /// Returns the node for `id`, or `None` if it is out of range.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&TrieNode> {
        self.nodes.get(id.index())
    }

    /// Returns the number of allocated slots, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing has been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every slot in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &TrieNode> + '_ {
        self.nodes.iter()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = TrieNode;

    #[inline]
    fn index(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut TrieNode {
        &mut self.nodes[id.index()]
    }
}
