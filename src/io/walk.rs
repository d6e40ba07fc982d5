//! The depth-first walk shared by the V3 and V4 encoders.
//!
//! A node with children is numbered the first time the walk reaches it, in
//! the order the decoder will create it; every later visit becomes a
//! reference to that number. Childless nodes are never numbered and are
//! always written out again, since a bare end-of-word costs less than any
//! reference.

use std::collections::VecDeque;

use crate::trie::{ChildIter, NodeId, TrieRoot};

/// Pop one level.
pub(crate) const BACK: char = '<';
/// End of word; also pops one level.
pub(crate) const EOW: char = '$';
/// Absolute reference.
pub(crate) const REF: char = '#';
/// Reference through the V4 index.
pub(crate) const REF_INDEX: char = '@';
/// Terminates a reference.
pub(crate) const EOR: char = ';';
/// Line break, ignored by the decoder.
pub(crate) const EOL: char = '\n';
/// Starts and ends an inline comment.
pub(crate) const COMMENT: char = '/';

/// One event of the walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// A node with children is about to be walked for the first time.
    Open { number: u32, depth: usize },
    /// The edge `ch` leaving a node at `depth` is followed.
    Char { ch: char, depth: usize },
    /// The node just entered was walked before.
    Ref { number: u32 },
    /// The node just entered ends a word.
    Eow,
    /// The node at `depth` is done, unless it was a reference.
    Close { depth: usize },
    /// Returned to the node at `depth`.
    Back { depth: usize },
}

struct Frame<'t> {
    depth: usize,
    node: NodeId,
    children: ChildIter<'t>,
}

/// Lazily produces the [`Step`]s of a walk over a trie.
pub(crate) struct Walk<'t> {
    trie: &'t TrieRoot,
    numbers: Vec<Option<u32>>,
    count: u32,
    optimize_simple_references: bool,
    start: bool,
    stack: Vec<Frame<'t>>,
    queue: VecDeque<Step>,
}

impl<'t> Walk<'t> {
    pub(crate) fn new(trie: &'t TrieRoot, optimize_simple_references: bool) -> Self {
        Walk {
            trie,
            numbers: vec![None; trie.arena().len()],
            count: 0,
            optimize_simple_references,
            start: true,
            stack: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// True if the node has exactly one child and that child is a plain word end.
    ///
    /// Writing such a node out again costs about as much as a reference and
    /// keeps the file free of references to trivial suffixes.
    fn is_simple(&self, id: NodeId) -> bool {
        let node = self.trie.node(id);
        if node.child_count() != 1 {
            return false;
        }
        node.children().all(|(_, child)| {
            let child = self.trie.node(child);
            child.is_word() && !child.has_children()
        })
    }

    fn visit(&mut self, id: NodeId, depth: usize) {
        if let Some(number) = self.numbers[id.index()] {
            if !(self.optimize_simple_references && self.is_simple(id)) {
                self.queue.push_back(Step::Ref { number });
                self.queue.push_back(Step::Back { depth: depth - 1 });
                return;
            }
        }
        let trie = self.trie;
        let node = trie.node(id);
        if node.has_children() {
            let number = self.count;
            self.count += 1;
            self.numbers[id.index()] = Some(number);
            self.queue.push_back(Step::Open { number, depth });
            self.stack.push(Frame {
                depth,
                node: id,
                children: node.children(),
            });
        } else {
            self.leave(id, depth);
        }
    }

    fn leave(&mut self, id: NodeId, depth: usize) {
        if self.trie.node(id).is_word() {
            self.queue.push_back(Step::Eow);
        }
        self.queue.push_back(Step::Close { depth });
        if depth > 0 {
            self.queue.push_back(Step::Back { depth: depth - 1 });
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            if let Some(step) = self.queue.pop_front() {
                return Some(step);
            }
            if self.start {
                self.start = false;
                self.visit(self.trie.root(), 0);
                continue;
            }
            let frame = self.stack.last_mut()?;
            match frame.children.next() {
                Some((ch, child)) => {
                    let depth = frame.depth;
                    self.queue.push_back(Step::Char { ch, depth });
                    self.visit(child, depth + 1);
                }
                None => {
                    let Frame { depth, node, .. } = self.stack.pop()?;
                    self.leave(node, depth);
                }
            }
        }
    }
}

/// Run-length buffer for `BACK` tokens.
///
/// An `EOW` is held back until the first `BACK` after it so the two can be
/// written together: `$` alone already means "end of word, then pop", and a
/// trailing digit 2-9 stands for that many pops in total.
#[derive(Clone, Debug)]
pub(crate) struct BackRuns {
    last: char,
    count: usize,
}

impl BackRuns {
    pub(crate) fn new() -> Self {
        BackRuns {
            last: BACK,
            count: 0,
        }
    }

    /// Writes any buffered pops.
    pub(crate) fn flush(&mut self, out: &mut String) {
        while self.count > 0 {
            let n = self.count.min(9);
            out.push(self.last);
            if n > 1 {
                out.push(char::from(b'0' + n as u8));
            }
            self.last = BACK;
            self.count -= n;
        }
    }

    /// Flushes, then holds an end of word for the next pop.
    pub(crate) fn end_of_word(&mut self, out: &mut String) {
        self.flush(out);
        self.last = EOW;
    }

    pub(crate) fn back(&mut self) {
        self.count += 1;
    }
}
