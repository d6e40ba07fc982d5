use smallvec::SmallVec;

use super::builder::IntoWord;
use super::node::TrieNode;
use super::node_arena::{NodeArena, NodeId};
use super::options::TrieOptions;
use super::walker::Words;

/// A trie (or, once consolidated or decoded, a DAWG) plus its options.
///
/// The root-to-terminal paths spell exactly the stored words. When the graph
/// may contain shared nodes ([`is_shared`](TrieRoot::is_shared)), insertion
/// copies the path it changes instead of adding edges to nodes that other
/// words also pass through.
///
/// # Examples
///
/// ```
/// use dictrie::{TrieOptions, TrieRoot};
///
/// let mut trie = TrieRoot::new(TrieOptions::default());
/// assert!(trie.insert("cat"));
/// assert!(trie.insert("car"));
/// assert!(!trie.insert("cat"));
/// assert!(trie.has("car"));
/// assert!(!trie.has("ca"));
/// assert_eq!(trie.words().collect::<Vec<_>>(), ["car", "cat"]);
/// ```
#[derive(Clone, Debug)]
pub struct TrieRoot {
    arena: NodeArena,
    root: NodeId,
    options: TrieOptions,
    shared: bool,
}

impl TrieRoot {
    /// Creates an empty trie.
    pub fn new(options: TrieOptions) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(TrieNode::new(false));
        TrieRoot {
            arena,
            root,
            options,
            shared: false,
        }
    }

    /// Builds a plain trie from `words`. Empty words are skipped.
    pub fn from_words<W: IntoWord>(
        words: impl IntoIterator<Item = W>,
        options: TrieOptions,
    ) -> Self {
        let mut trie = TrieRoot::new(options);
        for word in words {
            trie.insert(word);
        }
        trie
    }

    pub(crate) fn from_parts(
        arena: NodeArena,
        root: NodeId,
        options: TrieOptions,
        shared: bool,
    ) -> Self {
        TrieRoot {
            arena,
            root,
            options,
            shared,
        }
    }

    pub(crate) fn into_parts(self) -> (NodeArena, NodeId, TrieOptions) {
        (self.arena, self.root, self.options)
    }

    /// Returns the trie-wide options.
    pub fn options(&self) -> &TrieOptions {
        &self.options
    }

    /// Replaces the trie-wide options.
    pub fn set_options(&mut self, options: TrieOptions) {
        self.options = options;
    }

    /// Returns the id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this trie.
    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.arena[id]
    }

    pub(crate) fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// True if some nodes may be reachable through more than one parent edge.
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Adds a word.
    ///
    /// Returns `true` if the word was added, `false` if it was empty or already present.
    pub fn insert(&mut self, word: impl IntoWord) -> bool {
        let word = word.collect_word();
        if word.is_empty() {
            return false;
        }
        if self.shared {
            return self.insert_copying_path(&word);
        }

        let mut node = self.root;
        for &ch in word.iter() {
            node = match self.arena[node].get(ch) {
                Some(child) => child,
                None => {
                    let child = self.arena.alloc(TrieNode::new(false));
                    self.arena[node].set_child(ch, child);
                    child
                }
            };
        }
        let terminal = &mut self.arena[node];
        if terminal.is_word() {
            return false;
        }
        terminal.set_word(true);
        true
    }

    /// Inserts into a graph with shared nodes by rebuilding the changed path
    /// bottom-up; untouched subgraphs keep their ids and their other parents.
    fn insert_copying_path(&mut self, word: &[char]) -> bool {
        // Phase 1: path_nodes[i] is the node reached after word[..i].
        let mut path_nodes: SmallVec<[NodeId; 32]> = SmallVec::new();
        path_nodes.push(self.root);
        let mut current = self.root;
        for &ch in word.iter() {
            match self.arena[current].get(ch) {
                Some(child) => {
                    path_nodes.push(child);
                    current = child;
                }
                None => break,
            }
        }
        let prefix_len = path_nodes.len() - 1;
        if prefix_len == word.len() && self.arena[current].is_word() {
            return false;
        }

        // Phase 2: the new bottom of the path.
        let mut updated_child = if prefix_len == word.len() {
            let terminal = &self.arena[current];
            let node = TrieNode::with_children(true, terminal.children_ref().clone());
            self.arena.alloc(node)
        } else {
            let mut child = self.arena.alloc(TrieNode::new(true));
            for i in (prefix_len + 1..word.len()).rev() {
                let node = TrieNode::new(false).with_child(word[i], child);
                child = self.arena.alloc(node);
            }
            child
        };

        // Phase 3: copy each ancestor with its edge redirected.
        let start_level = if prefix_len < word.len() {
            prefix_len
        } else {
            prefix_len - 1
        };
        for level in (0..=start_level).rev() {
            let node = self.arena[path_nodes[level]].with_child(word[level], updated_child);
            updated_child = self.arena.alloc(node);
        }

        self.root = updated_child;
        true
    }

    /// Returns `true` if `word` is in the trie. No case folding is applied.
    pub fn has(&self, word: &str) -> bool {
        self.find_node(word)
            .is_some_and(|id| self.arena[id].is_word())
    }

    /// Returns the node reached by following `prefix` from the root.
    pub fn find_node(&self, prefix: &str) -> Option<NodeId> {
        self.find_node_from(self.root, prefix)
    }

    /// Returns the node reached by following `prefix` from `start`.
    pub fn find_node_from(&self, start: NodeId, prefix: &str) -> Option<NodeId> {
        prefix
            .chars()
            .try_fold(start, |id, ch| self.arena[id].get(ch))
    }

    /// Iterates over all words in character order.
    pub fn words(&self) -> Words<'_> {
        Words::new(&self.arena, self.root, String::new())
    }

    /// Iterates over the words starting with `prefix`, in character order.
    pub fn words_with_prefix(&self, prefix: &str) -> Words<'_> {
        match self.find_node(prefix) {
            Some(id) => Words::new(&self.arena, id, prefix.to_string()),
            None => Words::empty(&self.arena),
        }
    }

    /// True if the trie holds no words.
    pub fn is_empty(&self) -> bool {
        let root = &self.arena[self.root];
        !root.has_children() && !root.is_word()
    }

    /// Counts the distinct nodes reachable from the root.
    pub fn count_nodes(&self) -> usize {
        let mut seen = vec![false; self.arena.len()];
        let mut stack = vec![self.root];
        let mut count = 0;
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            count += 1;
            stack.extend(self.arena[id].children().map(|(_, child)| child));
        }
        count
    }

    /// Counts the stored words without enumerating them.
    ///
    /// Each node's count is computed once, so shared subgraphs are cheap.
    pub fn count_words(&self) -> usize {
        let mut counts: Vec<Option<usize>> = vec![None; self.arena.len()];
        let mut stack = vec![(self.root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if counts[id.index()].is_some() {
                continue;
            }
            let node = &self.arena[id];
            if expanded {
                let below: usize = node
                    .children()
                    .map(|(_, child)| counts[child.index()].unwrap_or(0))
                    .sum();
                counts[id.index()] = Some(below + usize::from(node.is_word()));
            } else {
                stack.push((id, true));
                stack.extend(
                    node.children()
                        .filter(|(_, child)| counts[child.index()].is_none())
                        .map(|(_, child)| (child, false)),
                );
            }
        }
        counts[self.root.index()].unwrap_or(0)
    }
}

impl Default for TrieRoot {
    fn default() -> Self {
        TrieRoot::new(TrieOptions::default())
    }
}
