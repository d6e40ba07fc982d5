//! Suffix sharing: turns a trie into a DAWG.
//!
//! Nodes are canonicalized bottom-up. Once all children of a node are
//! canonical, the node's own signature is just its word flag plus its
//! `(char, child id)` edges, so [`TrieNode`]'s shallow `Eq`/`Hash` can key the
//! registry directly without recursing to the leaves.

use hashbrown::HashMap;
use tracing::debug;

use super::node::TrieNode;
use super::node_arena::{NodeArena, NodeId};
use super::root::TrieRoot;

/// Merges structurally identical subtrees.
///
/// The input is consumed. The result stores the same words in at most as many
/// nodes, in a fresh arena holding only reachable canonical nodes (children
/// before parents). Consolidating twice gives the same graph as consolidating
/// once.
///
/// # Examples
///
/// ```
/// use dictrie::{consolidate, TrieOptions, TrieRoot};
///
/// let trie = TrieRoot::from_words(["walk", "talk"], TrieOptions::default());
/// let before = trie.count_nodes();
/// let dawg = consolidate(trie);
/// assert!(dawg.count_nodes() < before);
/// assert!(dawg.has("walk") && dawg.has("talk"));
/// ```
pub fn consolidate(trie: TrieRoot) -> TrieRoot {
    let nodes_before = trie.count_nodes();
    let (arena, root, options) = trie.into_parts();

    // Old id -> id in the compacted arena.
    let mut canonical: Vec<Option<NodeId>> = vec![None; arena.len()];
    let mut registry: HashMap<TrieNode, NodeId> = HashMap::new();
    let mut out = NodeArena::with_capacity(nodes_before.min(arena.len()));

    // (node, index of the next child to look at)
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
    while let Some(frame) = stack.last_mut() {
        let (id, cursor) = *frame;
        if let Some((_, child)) = arena[id].children_ref().get(cursor) {
            frame.1 += 1;
            if canonical[child.index()].is_none() {
                stack.push((child, 0));
            }
            continue;
        }
        stack.pop();
        if canonical[id.index()].is_some() {
            continue;
        }

        let node = arena[id].map_children(|child| {
            canonical[child.index()].expect("children are canonicalized before their parent")
        });
        let canonical_id = match registry.get(&node) {
            Some(&existing) => existing,
            None => {
                let new_id = out.alloc(node.clone());
                registry.insert(node, new_id);
                new_id
            }
        };
        canonical[id.index()] = Some(canonical_id);
    }

    let root = canonical[root.index()].expect("root is canonicalized last");
    let result = TrieRoot::from_parts(out, root, options, true);
    debug!(
        nodes_before,
        nodes_after = result.count_nodes(),
        "consolidated trie"
    );
    result
}
