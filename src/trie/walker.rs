use super::node::ChildIter;
use super::node_arena::{NodeArena, NodeId};

/// A lazy, depth-first iterator over the words below a node, in character order.
///
/// The walk keeps an explicit stack, so very long words cannot exhaust the call
/// stack. Cloning the iterator snapshots its position.
#[derive(Clone, Debug)]
pub struct Words<'t> {
    arena: &'t NodeArena,
    start: Option<NodeId>,
    stack: Vec<ChildIter<'t>>,
    prefix: String,
}

impl<'t> Words<'t> {
    pub(crate) fn new(arena: &'t NodeArena, start: NodeId, prefix: String) -> Self {
        Words {
            arena,
            start: Some(start),
            stack: Vec::new(),
            prefix,
        }
    }

    /// An iterator that yields nothing.
    pub(crate) fn empty(arena: &'t NodeArena) -> Self {
        Words {
            arena,
            start: None,
            stack: Vec::new(),
            prefix: String::new(),
        }
    }
}

impl Iterator for Words<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(start) = self.start.take() {
            let node = &self.arena[start];
            self.stack.push(node.children());
            if node.is_word() {
                return Some(self.prefix.clone());
            }
        }
        loop {
            let frame = self.stack.last_mut()?;
            match frame.next() {
                Some((ch, child)) => {
                    let node = &self.arena[child];
                    self.prefix.push(ch);
                    self.stack.push(node.children());
                    if node.is_word() {
                        return Some(self.prefix.clone());
                    }
                }
                None => {
                    self.stack.pop();
                    // The bottom frame belongs to the start node, which added no character.
                    if !self.stack.is_empty() {
                        self.prefix.pop();
                    }
                }
            }
        }
    }
}
