use std::io::BufRead;

use smallvec::SmallVec;

use super::consolidate::consolidate;
use super::options::TrieOptions;
use super::root::TrieRoot;
use crate::error::Result;

/// Trait for types that can be used as a word when building a trie.
///
/// Implemented for common string types so that [`TrieRoot::insert`] and
/// [`TrieBuilder::add_word`] accept them directly without manual conversion.
pub trait IntoWord {
    /// Collects this word into a character buffer.
    fn collect_word(self) -> SmallVec<[char; 32]>;
}

impl IntoWord for &str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord for &&str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord for String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord for &String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord for &[char] {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.iter().copied().collect()
    }
}

/// Collects words into a trie, optionally consolidating it on [`build`](TrieBuilder::build).
///
/// Unlike a sorted-input DAWG builder, words may arrive in any order and may
/// repeat; suffix sharing happens in one pass at the end.
///
/// # Examples
///
/// ```
/// use dictrie::{TrieBuilder, TrieOptions};
///
/// let mut builder = TrieBuilder::new(TrieOptions::default());
/// for word in ["walk", "talk", "walked", "talked"] {
///     builder.add_word(word);
/// }
/// let trie = builder.build(true);
/// assert!(trie.has("talked"));
/// assert_eq!(trie.count_words(), 4);
/// ```
#[derive(Debug)]
pub struct TrieBuilder {
    root: TrieRoot,
    added: usize,
}

impl TrieBuilder {
    /// Creates a builder for an empty trie.
    pub fn new(options: TrieOptions) -> Self {
        TrieBuilder {
            root: TrieRoot::new(options),
            added: 0,
        }
    }

    /// Adds a word. Returns `false` if it was empty or already added.
    pub fn add_word(&mut self, word: impl IntoWord) -> bool {
        let added = self.root.insert(word);
        self.added += usize::from(added);
        added
    }

    /// Adds every word of `words`.
    pub fn add_words<W: IntoWord>(&mut self, words: impl IntoIterator<Item = W>) -> &mut Self {
        for word in words {
            self.add_word(word);
        }
        self
    }

    /// Reads a word list, one word per line.
    ///
    /// Lines starting with `#` are treated as comments and ignored, as are
    /// empty lines. Returns the number of new words.
    pub fn add_lines<R: BufRead>(&mut self, mut reader: R) -> Result<usize> {
        let before = self.added;
        // Reuse one buffer instead of allocating a string per line.
        let mut buf = String::with_capacity(80);
        loop {
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            let word = buf.trim_end();
            if !word.is_empty() && !is_comment(word) {
                self.add_word(word);
            }
            buf.clear();
        }
        Ok(self.added - before)
    }

    /// Number of distinct words added so far.
    pub fn len(&self) -> usize {
        self.added
    }

    /// True if no word has been added.
    pub fn is_empty(&self) -> bool {
        self.added == 0
    }

    /// Finishes the trie, merging shared suffixes when `consolidate_suffixes` is set.
    pub fn build(self, consolidate_suffixes: bool) -> TrieRoot {
        if consolidate_suffixes {
            consolidate(self.root)
        } else {
            self.root
        }
    }
}

impl Default for TrieBuilder {
    fn default() -> Self {
        TrieBuilder::new(TrieOptions::default())
    }
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn comment_that_starts_with_pound() {
        assert!(is_comment("# This is a comment"));
    }

    #[test]
    fn comment_with_whitespace_before_pound() {
        assert!(is_comment("        # This is a comment with whitespace"));
    }

    #[test]
    fn non_comment() {
        assert!(!is_comment("REVERBERATE"));
        assert!(!is_comment(" REVERBERATE"));
    }

    #[test]
    fn unsorted_and_repeated_input_is_accepted() {
        let mut builder = TrieBuilder::default();
        builder.add_words(["GOLF", "ALFA", "GOLF", "DELTA", "ALFA"]);
        assert_eq!(builder.len(), 3);
        let trie = builder.build(false);
        let words: Vec<_> = trie.words().collect();
        assert_eq!(words, ["ALFA", "DELTA", "GOLF"]);
    }

    #[test]
    fn add_lines_skips_comments_and_blanks() {
        let text = "# header\nwalk\n\n  # indented comment\ntalk\r\nwalk\n";
        let mut builder = TrieBuilder::default();
        let added = builder.add_lines(text.as_bytes()).unwrap();
        assert_eq!(added, 2);
        let trie = builder.build(true);
        assert!(trie.has("walk"));
        assert!(trie.has("talk"));
        assert!(!trie.has("# header"));
    }

    #[test]
    fn build_with_consolidation_shares_nodes() {
        let words = ["walk", "talk"];
        let mut plain = TrieBuilder::default();
        plain.add_words(words);
        let mut shared = TrieBuilder::default();
        shared.add_words(words);

        let plain = plain.build(false);
        let shared = shared.build(true);
        assert!(shared.count_nodes() < plain.count_nodes());
        assert!(shared.is_shared());
        assert!(!plain.is_shared());
    }
}
