/// Word collection and the [`IntoWord`] conversion trait.
pub mod builder;
/// Suffix sharing.
pub mod consolidate;
/// Trie nodes and their sorted child lists.
pub mod node;
/// Index arena holding the nodes of one trie.
pub mod node_arena;
/// Trie-wide option characters.
pub mod options;
/// The trie root and its queries.
pub mod root;
/// Lazy word enumeration.
pub mod walker;

pub use builder::{IntoWord, TrieBuilder};
pub use consolidate::consolidate;
pub use node::{ChildIter, Children, TrieNode};
pub use node_arena::{NodeArena, NodeId};
pub use options::{
    PartialTrieOptions, TrieOptions, CASE_INSENSITIVE_PREFIX, COMPOUND_FIX, FORBID_PREFIX,
};
pub use root::TrieRoot;
pub use walker::Words;
