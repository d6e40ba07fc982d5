//! Read access to a dictionary, independent of how it is stored.

use std::sync::OnceLock;

use crate::trie::{consolidate, IntoWord, NodeId, TrieOptions, TrieRoot, Words};

/// What a spell checker needs from a dictionary.
///
/// # Examples
///
/// ```
/// use dictrie::{Trie, TrieData, TrieOptions};
///
/// let trie = Trie::create(["walk", "!walkz"], TrieOptions::default());
/// assert!(trie.has("walk"));
/// assert!(trie.is_forbidden_word("walkz"));
/// assert!(!trie.is_forbidden_word("walk"));
/// ```
pub trait TrieData {
    /// The trie-wide option characters.
    fn options(&self) -> &TrieOptions;

    /// Every stored word, forbidden and normalized forms included.
    fn words(&self) -> Words<'_>;

    /// True if `word` is stored exactly as given.
    fn has(&self, word: &str) -> bool;

    /// True if `word` is stored under the forbidden word prefix.
    fn is_forbidden_word(&self, word: &str) -> bool {
        let mut forbidden = String::with_capacity(word.len() + 1);
        forbidden.push(self.options().forbidden_word_prefix);
        forbidden.push_str(word);
        self.has(&forbidden)
    }

    /// The underlying graph.
    fn root(&self) -> &TrieRoot;
}

impl TrieData for TrieRoot {
    fn options(&self) -> &TrieOptions {
        TrieRoot::options(self)
    }

    fn words(&self) -> Words<'_> {
        TrieRoot::words(self)
    }

    fn has(&self, word: &str) -> bool {
        TrieRoot::has(self, word)
    }

    fn root(&self) -> &TrieRoot {
        self
    }
}

/// A dictionary backed by a [`TrieRoot`], with a cached word count.
#[derive(Clone, Debug, Default)]
pub struct Trie {
    root: TrieRoot,
    size: OnceLock<usize>,
}

impl Trie {
    /// Wraps an existing graph.
    pub fn new(root: TrieRoot) -> Self {
        Trie {
            root,
            size: OnceLock::new(),
        }
    }

    /// Builds a consolidated dictionary from `words`.
    pub fn create<W: IntoWord>(words: impl IntoIterator<Item = W>, options: TrieOptions) -> Self {
        Trie::new(consolidate(TrieRoot::from_words(words, options)))
    }

    /// Number of stored words. Counted once, then cached until the next insert.
    pub fn size(&self) -> usize {
        *self.size.get_or_init(|| self.root.count_words())
    }

    /// Words that start with `prefix`, `prefix` itself included when it is a
    /// word. Word parts that only exist to be joined into compounds (those
    /// ending in the compound character) are left out.
    ///
    /// ```
    /// use dictrie::{Trie, TrieOptions};
    ///
    /// let trie = Trie::create(["walk", "walker", "walk+", "talk"], TrieOptions::default());
    /// assert_eq!(trie.complete_word("walk").collect::<Vec<_>>(), ["walk", "walker"]);
    /// ```
    pub fn complete_word<'t>(&'t self, prefix: &str) -> impl Iterator<Item = String> + 't {
        let compound = self.root.options().compound_character;
        self.root
            .words_with_prefix(prefix)
            .filter(move |word| !word.ends_with(compound))
    }

    /// The node reached by following `prefix` from the root.
    pub fn find(&self, prefix: &str) -> Option<NodeId> {
        self.root.find_node(prefix)
    }

    /// Adds a word. Works on consolidated graphs too, by copying the path it changes.
    pub fn insert(&mut self, word: impl IntoWord) -> &mut Self {
        if self.root.insert(word) {
            self.size.take();
        }
        self
    }

    /// Gives back the underlying graph.
    pub fn into_root(self) -> TrieRoot {
        self.root
    }
}

impl TrieData for Trie {
    fn options(&self) -> &TrieOptions {
        self.root.options()
    }

    fn words(&self) -> Words<'_> {
        self.root.words()
    }

    fn has(&self, word: &str) -> bool {
        self.root.has(word)
    }

    fn root(&self) -> &TrieRoot {
        &self.root
    }
}

impl From<TrieRoot> for Trie {
    fn from(root: TrieRoot) -> Self {
        Trie::new(root)
    }
}
