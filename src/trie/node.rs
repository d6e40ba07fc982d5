use super::node_arena::NodeId;

/// A compact representation of the children of a [`TrieNode`] that doesn't allocate until
/// there are at least three children.
///
/// Edges are always kept sorted by character, and a set of edges has exactly one
/// representation, so two nodes with the same edges compare and hash equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Children {
    /// No children.
    #[default]
    None,
    /// Exactly one child (letter, node).
    One((char, NodeId)),
    /// Exactly two children (letter1, node1, letter2, node2), `letter1 < letter2`.
    Two((char, NodeId, char, NodeId)),
    /// Three or more children stored in a vector.
    Many(Vec<(char, NodeId)>),
}

impl Children {
    /// Gets the child at the specified index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<(char, NodeId)> {
        match self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((c1, n1, c2, n2)) => match index {
                0 => Some((*c1, *n1)),
                1 => Some((*c2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    /// Returns the node that `letter`'s edge leads to.
    #[inline]
    pub fn find(&self, letter: char) -> Option<NodeId> {
        match self {
            Children::None => None,
            Children::One((ch, node)) => (*ch == letter).then_some(*node),
            Children::Two((c1, n1, c2, n2)) => {
                if letter == *c1 {
                    Some(*n1)
                } else if letter == *c2 {
                    Some(*n2)
                } else {
                    None
                }
            }
            Children::Many(children) => {
                // Unrolling by 2 exposes load-level parallelism and beats a binary
                // search on the short edge lists natural language produces.
                let chunks = children.chunks_exact(2);
                let remainder = chunks.remainder();
                for chunk in chunks {
                    if chunk[0].0 == letter {
                        return Some(chunk[0].1);
                    }
                    if chunk[1].0 == letter {
                        return Some(chunk[1].1);
                    }
                }
                for &(ch, node) in remainder {
                    if ch == letter {
                        return Some(node);
                    }
                }
                None
            }
        }
    }

    /// Returns the number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }

    /// True if there are no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Children::None)
    }

    /// Points the edge labeled `letter` at `child`, adding the edge in sorted
    /// position if it does not exist yet.
    pub(crate) fn set(&mut self, letter: char, child: NodeId) {
        match self {
            Children::None => *self = Children::One((letter, child)),
            Children::One((c1, n1)) => {
                if *c1 == letter {
                    *n1 = child;
                } else if letter < *c1 {
                    *self = Children::Two((letter, child, *c1, *n1));
                } else {
                    *self = Children::Two((*c1, *n1, letter, child));
                }
            }
            Children::Two((c1, n1, c2, n2)) => {
                if *c1 == letter {
                    *n1 = child;
                } else if *c2 == letter {
                    *n2 = child;
                } else {
                    let mut v = vec![(*c1, *n1), (*c2, *n2), (letter, child)];
                    v.sort_by_key(|&(c, _)| c);
                    *self = Children::Many(v);
                }
            }
            Children::Many(children) => {
                match children.binary_search_by_key(&letter, |&(c, _)| c) {
                    Ok(pos) => children[pos].1 = child,
                    Err(pos) => children.insert(pos, (letter, child)),
                }
            }
        }
    }

    /// Returns new `Children` with every target id passed through `f`.
    pub(crate) fn map_ids(&self, mut f: impl FnMut(NodeId) -> NodeId) -> Children {
        match self {
            Children::None => Children::None,
            Children::One((c, n)) => Children::One((*c, f(*n))),
            Children::Two((c1, n1, c2, n2)) => Children::Two((*c1, f(*n1), *c2, f(*n2))),
            Children::Many(children) => {
                Children::Many(children.iter().map(|&(c, n)| (c, f(n))).collect())
            }
        }
    }
}

/// An iterator over the children of a TrieNode, in character order.
#[derive(Clone, Debug)]
pub struct ChildIter<'t> {
    node: &'t TrieNode,
    index: Option<usize>,
}

impl Iterator for ChildIter<'_> {
    type Item = (char, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index?;
        let next_child = self.node.children.get(index);
        self.index = if next_child.is_some() {
            index.checked_add(1)
        } else {
            None
        };
        next_child
    }

    /// Since we know the exact size, we can do better than the default implementation.
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.index {
            Some(i) => self.node.child_count().saturating_sub(i),
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChildIter<'_> {}

/// A node in the trie: outgoing edges plus the end-of-word flag.
///
/// Because child edges hold [`NodeId`]s, equality and hashing only look one
/// level deep. Once every child is canonical, that shallow comparison is the
/// structural signature the consolidator needs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrieNode {
    children: Children,
    word: bool,
}

impl TrieNode {
    /// Creates a node without children.
    ///
    /// # Arguments
    ///
    /// * `word` - Whether this node represents the end of a valid word
    pub fn new(word: bool) -> Self {
        TrieNode {
            children: Children::None,
            word,
        }
    }

    /// Creates a node with the given word flag and children.
    pub(crate) fn with_children(word: bool, children: Children) -> Self {
        TrieNode { children, word }
    }

    /// Returns the node that letter's edge leads to, or None if no such edge exists.
    #[inline]
    pub fn get(&self, letter: char) -> Option<NodeId> {
        self.children.find(letter)
    }

    /// True if this node corresponds to the end of a word.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.word
    }

    pub(crate) fn set_word(&mut self, word: bool) {
        self.word = word;
    }

    /// True if at least one edge leaves this node.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns an iterator over all children of this node.
    #[inline]
    pub fn children(&self) -> ChildIter<'_> {
        ChildIter {
            node: self,
            index: Some(0),
        }
    }

    /// Returns a reference to the children of this node.
    pub fn children_ref(&self) -> &Children {
        &self.children
    }

    /// Adds or redirects the edge labeled `letter`.
    pub(crate) fn set_child(&mut self, letter: char, child: NodeId) {
        self.children.set(letter, child);
    }

    /// Returns a copy of this node with the edge labeled `letter` pointing at `child`.
    pub(crate) fn with_child(&self, letter: char, child: NodeId) -> TrieNode {
        let mut children = self.children.clone();
        children.set(letter, child);
        TrieNode::with_children(self.word, children)
    }

    /// Returns a copy of this node with every child id passed through `f`.
    pub(crate) fn map_children(&self, f: impl FnMut(NodeId) -> NodeId) -> TrieNode {
        TrieNode::with_children(self.word, self.children.map_ids(f))
    }
}
