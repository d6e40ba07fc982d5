//! # dictrie
//!
//! Dictionary tries for spell checking, with suffix sharing and a versioned,
//! diff-friendly text format.
//!
//! A word list is stored as a trie of `char` edges. [`consolidate`] merges
//! identical subtrees, turning the trie into a
//! [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! that holds the same words in far fewer nodes. The [`io`] module writes
//! either form as `TrieXv1` to `TrieXv4` text and reads it back.
//!
//! ## Features
//!
//! - **Index arena**: nodes are addressed by [`NodeId`], so shared nodes need
//!   no reference counting and a graph is `Send + Sync` once built
//! - **Mutable after sharing**: [`TrieRoot::insert`] copies the path it changes
//!   in a consolidated graph instead of corrupting other words
//! - **Lazy codecs**: encoders borrow the trie and yield text in pieces
//!
//! ## Quick Start
//!
//! ```
//! use dictrie::{consolidate, TrieOptions, TrieRoot};
//!
//! let trie = TrieRoot::from_words(["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"], TrieOptions::default());
//! let nodes = trie.count_nodes();
//! let dawg = consolidate(trie);
//!
//! assert!(dawg.has("CAKE"));
//! assert!(!dawg.has("AKE"));
//! assert!(dawg.count_nodes() < nodes);
//! ```
//!
//! ## Reading and Writing
//!
//! ```
//! use dictrie::io::{decode, encode_to_string, ExportOptions};
//! use dictrie::{Trie, TrieData, TrieOptions};
//!
//! let trie = Trie::create(["walk", "walked", "talk", "talked"], TrieOptions::default());
//! let options = ExportOptions { base: 32, ..Default::default() };
//! let text = encode_to_string(trie.root(), &options).unwrap();
//! assert!(text.starts_with("#!/usr/bin/env cspell-trie reader\nTrieXv4\nbase=32\n"));
//!
//! let decoded = decode(&text).unwrap();
//! assert_eq!(decoded.size(), 4);
//! assert!(decoded.has("talked"));
//! ```

#![warn(missing_docs)]

/// Error type shared by every fallible operation.
pub mod error;
/// The `TrieXv<N>` text formats.
pub mod io;
/// Trie nodes, construction and consolidation.
pub mod trie;
/// The dictionary query interface.
pub mod trie_data;

pub use error::{Result, TrieError};
pub use trie::{
    consolidate, IntoWord, NodeId, PartialTrieOptions, TrieBuilder, TrieNode, TrieOptions,
    TrieRoot, Words,
};
pub use trie_data::{Trie, TrieData};
