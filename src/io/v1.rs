//! Version 1: one line per distinct node.
//!
//! Lines are written children first, so every line only refers to lines
//! above it, and the root comes last. A line is an optional `*` for a word
//! end followed by comma separated edges: the escaped letter and the line
//! number of the child in the header radix, where line 0 is written as an
//! empty number. Identical nodes share a line.

use hashbrown::HashMap;

use super::escape::{push_escaped_v1, ESCAPE};
use super::header::write_header;
use super::number::push_number;
use super::{ExportOptions, Version};
use crate::error::{Result, TrieError};
use crate::trie::{ChildIter, NodeArena, NodeId, TrieNode, TrieOptions, TrieRoot};

const WORD: char = '*';

struct Frame<'t> {
    node: NodeId,
    /// Letter of the edge that led here.
    ch: char,
    children: ChildIter<'t>,
    line: String,
}

/// Lazy V1 encoder, yielding the header and then one line at a time.
pub struct Encoder<'t> {
    trie: &'t TrieRoot,
    header: Option<String>,
    radix: u32,
    stack: Vec<Frame<'t>>,
    /// Line number of every node written so far.
    lines: Vec<Option<u32>>,
    signatures: HashMap<String, u32>,
}

impl<'t> Encoder<'t> {
    pub(crate) fn new(trie: &'t TrieRoot, options: &ExportOptions) -> Self {
        let radix = options.radix();
        let mut encoder = Encoder {
            trie,
            header: Some(write_header(Version::V1, radix, &options.comment)),
            radix,
            stack: Vec::new(),
            lines: vec![None; trie.arena().len()],
            signatures: HashMap::new(),
        };
        encoder.open(trie.root(), '\0');
        encoder
    }

    fn open(&mut self, node: NodeId, ch: char) {
        let trie = self.trie;
        let node_ref = trie.node(node);
        let line = if node_ref.is_word() {
            WORD.to_string()
        } else {
            String::new()
        };
        self.stack.push(Frame {
            node,
            ch,
            children: node_ref.children(),
            line,
        });
    }

    /// Adds an edge to the line of the node on top of the stack.
    fn push_edge(&mut self, ch: char, line_number: u32) {
        let radix = self.radix;
        if let Some(parent) = self.stack.last_mut() {
            let line = &mut parent.line;
            if !line.is_empty() && line != "*" {
                line.push(',');
            }
            push_escaped_v1(line, ch);
            if line_number != 0 {
                push_number(line, line_number, radix);
            }
        }
    }
}

impl Iterator for Encoder<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(header) = self.header.take() {
            return Some(header);
        }
        loop {
            let frame = self.stack.last_mut()?;
            if let Some((ch, child)) = frame.children.next() {
                let written = self.lines[child.index()];
                match written {
                    Some(number) => self.push_edge(ch, number),
                    None => self.open(child, ch),
                }
                continue;
            }

            let Frame { node, ch, line, .. } = self.stack.pop()?;
            if self.stack.is_empty() {
                // The root is always written, and always last.
                return Some(line + "\n");
            }
            let next_number = self.signatures.len() as u32;
            let (number, is_new) = match self.signatures.get(&line) {
                Some(&number) => (number, false),
                None => (next_number, true),
            };
            self.lines[node.index()] = Some(number);
            self.push_edge(ch, number);
            if is_new {
                self.signatures.insert(line.clone(), number);
                return Some(line + "\n");
            }
        }
    }
}

fn unescape_v1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Splits a line at commas that are not escaped.
fn split_entries(line: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE {
            escaped = true;
        } else if ch == ',' {
            entries.push(&line[start..i]);
            start = i + 1;
        }
    }
    entries.push(&line[start..]);
    entries
}

/// Decodes V1 lines. The last line is the root.
pub(crate) fn decode<I: Iterator<Item = String>>(radix: u32, lines: I) -> Result<TrieRoot> {
    let mut arena = NodeArena::new();
    let mut nodes: Vec<NodeId> = Vec::new();
    let mut last_line = 0;
    for (line_number, line) in lines.enumerate() {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            continue;
        }
        let error = |message: String| TrieError::syntax(line_number, message);
        // Only the root, which comes last, may be an empty node.
        if let Some(&previous) = nodes.last() {
            if is_dead_end(&arena[previous]) {
                return Err(TrieError::syntax(last_line, "node leads nowhere"));
            }
        }
        last_line = line_number;
        let (word, edges) = match line.strip_prefix(WORD) {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let mut node = TrieNode::new(word);
        for entry in split_entries(edges).into_iter().filter(|e| !e.is_empty()) {
            let entry = unescape_v1(entry);
            let mut chars = entry.chars();
            let ch = chars
                .next()
                .ok_or_else(|| error(format!("empty edge in {line:?}")))?;
            let digits = chars.as_str();
            let child = if digits.is_empty() {
                0
            } else {
                usize::from_str_radix(digits, radix)
                    .map_err(|e| error(format!("invalid reference {digits:?}: {e}")))?
            };
            let child = nodes
                .get(child)
                .copied()
                .ok_or_else(|| error(format!("reference to unknown line {child}")))?;
            node.set_child(ch, child);
        }
        nodes.push(arena.alloc(node));
    }

    let root = match nodes.last() {
        Some(&root) if arena[root].is_word() => {
            return Err(TrieError::syntax(last_line, "the root cannot end a word"));
        }
        Some(&root) => root,
        None => arena.alloc(TrieNode::new(false)),
    };
    Ok(TrieRoot::from_parts(arena, root, TrieOptions::default(), true))
}

/// A node that neither ends a word nor leads to one.
fn is_dead_end(node: &TrieNode) -> bool {
    !node.is_word() && !node.has_children()
}
