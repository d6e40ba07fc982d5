//! Character-level decoder for the V3 and V4 bodies.
//!
//! The parser is a small state machine fed one character at a time. It
//! builds the graph directly in a [`NodeArena`]: every inserted character
//! allocates a node, references wire an existing node into the parent, and
//! childless word ends are folded into one shared leaf.

use tracing::trace;

use super::escape::{unescape_pair, ESCAPE};
use super::walk::{BACK, COMMENT, EOR, EOW, REF, REF_INDEX};
use crate::error::{Result, TrieError};
use crate::trie::{NodeArena, NodeId, TrieNode, TrieOptions, TrieRoot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Before the body; a V4 reference index may follow.
    IndexStart,
    Index,
    Main,
    Escape,
    EscapePair,
    Reference { indexed: bool, value: u64, digits: usize },
    Comment,
    BackRun,
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    node: NodeId,
    ch: char,
    /// The frame holds a resolved reference; the node belongs to someone else.
    sealed: bool,
}

/// Streaming decoder for a V3 or V4 body.
pub(crate) struct StreamParser {
    arena: NodeArena,
    root: NodeId,
    /// Nodes with children in creation order; the root is number 0.
    nodes: Vec<NodeId>,
    stack: Vec<Frame>,
    state: State,
    radix: u32,
    index: Vec<u32>,
    index_text: String,
    eow: Option<NodeId>,
    position: usize,
}

impl StreamParser {
    /// Creates a parser. `with_index` allows a V4 reference index before the body.
    pub(crate) fn new(radix: u32, with_index: bool) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(TrieNode::new(false));
        StreamParser {
            arena,
            root,
            nodes: vec![root],
            stack: vec![Frame {
                node: root,
                ch: '\0',
                sealed: false,
            }],
            state: if with_index {
                State::IndexStart
            } else {
                State::Main
            },
            radix,
            index: Vec::new(),
            index_text: String::new(),
            eow: None,
            position: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> TrieError {
        TrieError::syntax(self.position, message)
    }

    /// Feeds a piece of the body.
    pub(crate) fn feed(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            self.position += 1;
            self.push(ch)?;
        }
        Ok(())
    }

    fn push(&mut self, ch: char) -> Result<()> {
        match self.state {
            State::IndexStart => {
                if ch == '[' {
                    self.state = State::Index;
                } else if !ch.is_whitespace() {
                    self.state = State::Main;
                    self.main(ch)?;
                }
            }
            State::Index => {
                if ch == ']' {
                    self.parse_index()?;
                    self.state = State::Main;
                } else {
                    self.index_text.push(ch);
                }
            }
            State::Main => self.main(ch)?,
            State::Escape => {
                if ch == ESCAPE {
                    self.state = State::EscapePair;
                } else {
                    self.state = State::Main;
                    self.insert(ch)?;
                }
            }
            State::EscapePair => {
                self.state = State::Main;
                self.insert(unescape_pair(ch))?;
            }
            State::Reference {
                indexed,
                value,
                digits,
            } => {
                if ch == EOR {
                    self.state = State::Main;
                    self.resolve(indexed, value, digits)?;
                } else if self.radix == 10 && !ch.is_ascii_digit() {
                    self.state = State::Main;
                    self.resolve(indexed, value, digits)?;
                    self.main(ch)?;
                } else {
                    let digit = ch
                        .to_digit(self.radix)
                        .ok_or_else(|| self.error(format!("invalid digit {ch:?} in reference")))?;
                    let value = value
                        .checked_mul(u64::from(self.radix))
                        .and_then(|v| v.checked_add(u64::from(digit)))
                        .filter(|&v| v <= u64::from(u32::MAX))
                        .ok_or_else(|| self.error("reference out of range"))?;
                    self.state = State::Reference {
                        indexed,
                        value,
                        digits: digits + 1,
                    };
                }
            }
            State::Comment => {
                if ch == COMMENT {
                    self.state = State::Main;
                }
            }
            State::BackRun => match ch {
                BACK => self.pop(1)?,
                '2'..='9' => self.pop(ch as usize - '0' as usize - 1)?,
                _ => {
                    self.state = State::Main;
                    self.main(ch)?;
                }
            },
        }
        Ok(())
    }

    fn main(&mut self, ch: char) -> Result<()> {
        match ch {
            EOW => {
                self.end_of_word()?;
                self.state = State::BackRun;
            }
            BACK => {
                self.pop(1)?;
                self.state = State::BackRun;
            }
            REF => self.begin_reference(false)?,
            REF_INDEX => self.begin_reference(true)?,
            ESCAPE => self.state = State::Escape,
            '\n' | '\r' => {}
            COMMENT => self.state = State::Comment,
            _ => self.insert(ch)?,
        }
        Ok(())
    }

    fn top(&self) -> Frame {
        // The root frame is never popped.
        self.stack[self.stack.len() - 1]
    }

    fn parent(&self) -> NodeId {
        self.stack[self.stack.len() - 2].node
    }

    fn insert(&mut self, ch: char) -> Result<()> {
        let top = self.top();
        if top.sealed {
            return Err(self.error(format!("cannot add {ch:?} to a referenced node")));
        }
        let node = self.arena.alloc(TrieNode::new(false));
        self.arena[top.node].set_child(ch, node);
        self.nodes.push(node);
        self.stack.push(Frame {
            node,
            ch,
            sealed: false,
        });
        Ok(())
    }

    fn end_of_word(&mut self) -> Result<()> {
        let top = self.top();
        if self.stack.len() == 1 {
            return Err(self.error("end of word at the root"));
        }
        if top.sealed {
            return Err(self.error("end of word on a referenced node"));
        }
        if self.arena[top.node].has_children() {
            self.arena[top.node].set_word(true);
        } else {
            // A childless node is always the newest one.
            self.nodes.pop();
            match self.eow {
                None => {
                    self.arena[top.node].set_word(true);
                    self.eow = Some(top.node);
                }
                Some(eow) => {
                    self.arena.discard_last(top.node);
                    let parent = self.parent();
                    self.arena[parent].set_child(top.ch, eow);
                }
            }
        }
        self.stack.pop();
        Ok(())
    }

    fn pop(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            if self.stack.len() <= 1 {
                return Err(self.error("moved back past the root"));
            }
            let top = self.top();
            let node = &self.arena[top.node];
            if !top.sealed && !node.has_children() && !node.is_word() {
                return Err(self.error(format!("{:?} leads nowhere", top.ch)));
            }
            self.stack.pop();
        }
        Ok(())
    }

    fn begin_reference(&mut self, indexed: bool) -> Result<()> {
        let top = self.top();
        if self.stack.len() == 1 {
            return Err(self.error("reference at the root"));
        }
        let node = &self.arena[top.node];
        if top.sealed || node.has_children() || node.is_word() {
            return Err(self.error("reference must directly follow a character"));
        }
        // The placeholder made by the character is replaced by the target.
        self.nodes.pop();
        self.arena.discard_last(top.node);
        self.state = State::Reference {
            indexed,
            value: 0,
            digits: 0,
        };
        Ok(())
    }

    fn resolve(&mut self, indexed: bool, value: u64, digits: usize) -> Result<()> {
        if digits == 0 {
            return Err(self.error("empty reference"));
        }
        let number = if indexed {
            let entry = usize::try_from(value)
                .ok()
                .and_then(|i| self.index.get(i).copied())
                .ok_or_else(|| self.error(format!("unknown reference index {value}")))?;
            u64::from(entry)
        } else {
            value
        };
        let target = usize::try_from(number)
            .ok()
            .and_then(|n| self.nodes.get(n).copied())
            .ok_or_else(|| self.error(format!("reference to unknown node {number}")))?;
        if self.stack.iter().any(|frame| frame.node == target) {
            return Err(self.error(format!("reference to node {number} would create a cycle")));
        }
        let parent = self.parent();
        let len = self.stack.len();
        let top = &mut self.stack[len - 1];
        top.node = target;
        top.sealed = true;
        let ch = top.ch;
        self.arena[parent].set_child(ch, target);
        Ok(())
    }

    fn parse_index(&mut self) -> Result<()> {
        let radix = self.radix;
        let index = self
            .index_text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| u32::from_str_radix(s, radix))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| self.error(format!("invalid reference index: {e}")))?;
        trace!(entries = index.len(), "read reference index");
        self.index = index;
        self.index_text = String::new();
        Ok(())
    }

    /// Checks that the body ended cleanly and returns the trie.
    pub(crate) fn finish(mut self) -> Result<TrieRoot> {
        match self.state {
            State::IndexStart | State::Main | State::BackRun => {}
            State::Reference {
                indexed,
                value,
                digits,
            } if self.radix == 10 => {
                self.state = State::Main;
                self.resolve(indexed, value, digits)?;
            }
            State::Reference { .. } => return Err(self.error("unterminated reference")),
            State::Escape | State::EscapePair => return Err(self.error("unterminated escape")),
            State::Comment => return Err(self.error("unterminated comment")),
            State::Index => return Err(self.error("unterminated reference index")),
        }
        if self.stack.len() > 1 {
            let open = self.stack.len() - 1;
            return Err(self.error(format!("data ends with {open} unclosed nodes")));
        }
        Ok(TrieRoot::from_parts(
            self.arena,
            self.root,
            TrieOptions::default(),
            true,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(radix: u32, with_index: bool, body: &str) -> Result<TrieRoot> {
        let mut parser = StreamParser::new(radix, with_index);
        parser.feed(body)?;
        parser.finish()
    }

    fn words(trie: &TrieRoot) -> Vec<String> {
        trie.words().collect()
    }

    #[test]
    fn plain_words() {
        let trie = parse(10, false, "ca\nr$ts$$3\n").unwrap();
        assert_eq!(words(&trie), ["car", "cat", "cats"]);
    }

    #[test]
    fn word_leaves_are_shared() {
        let trie = parse(10, false, "ab$c$2").unwrap();
        assert_eq!(words(&trie), ["ab", "ac"]);
        let a = trie.find_node("a").unwrap();
        let b = trie.node(a).get('b');
        assert_eq!(b, trie.node(a).get('c'));
        // root, a, and one leaf
        assert_eq!(trie.arena().len(), 3);
    }

    #[test]
    fn absolute_reference() {
        // 'w' refers to node 1, the one reached by 't'.
        let trie = parse(10, false, "ta\nlk$4w#1;<").unwrap();
        assert_eq!(words(&trie), ["talk", "walk"]);
        assert_eq!(trie.find_node("t"), trie.find_node("w"));
    }

    #[test]
    fn radix_ten_reference_ends_on_any_non_digit() {
        let trie = parse(10, true, "talk$4w#1<").unwrap();
        assert_eq!(words(&trie), ["talk", "walk"]);
    }

    #[test]
    fn radix_ten_reference_is_resolved_at_end_of_data() {
        // The reference resolves, so only the missing back is reported.
        let err = parse(10, true, "talk$4w#1").unwrap_err();
        assert!(err.to_string().contains("1 unclosed"), "{err}");
        let err = parse(16, true, "talk$4w#1").unwrap_err();
        assert!(err.to_string().contains("unterminated reference"), "{err}");
    }

    #[test]
    fn indexed_reference() {
        let trie = parse(16, true, "[\n1\n]\ntalk$4w@0;<").unwrap();
        assert_eq!(words(&trie), ["talk", "walk"]);
    }

    #[test]
    fn escapes() {
        let trie = parse(10, false, "\\$\\\\n\\\\\\$3").unwrap();
        assert_eq!(words(&trie), ["$\n\\"]);
    }

    #[test]
    fn comments_are_skipped() {
        let trie = parse(10, true, "\n/* ab */\nab$2").unwrap();
        assert_eq!(words(&trie), ["ab"]);
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let err = parse(10, false, "ab$<c#7;<").unwrap_err();
        assert!(err.to_string().contains("unknown node 7"), "{err}");
    }

    #[test]
    fn unknown_index_is_an_error() {
        let err = parse(10, true, "[1]ab$<c@3;<").unwrap_err();
        assert!(err.to_string().contains("unknown reference index 3"), "{err}");
    }

    #[test]
    fn reference_to_ancestor_is_an_error() {
        let err = parse(16, false, "ab#1;").unwrap_err();
        assert!(err.to_string().contains("cycle"), "{err}");
    }

    #[test]
    fn unterminated_states_are_errors() {
        assert!(parse(10, false, "ab\\").unwrap_err().to_string().contains("escape"));
        assert!(parse(10, true, "/* ab").unwrap_err().to_string().contains("comment"));
        assert!(parse(16, false, "ab$<c#1").unwrap_err().to_string().contains("reference"));
        assert!(parse(10, true, "[1,2").unwrap_err().to_string().contains("index"));
    }

    #[test]
    fn back_past_root_is_an_error() {
        let err = parse(10, false, "a$<").unwrap_err();
        assert!(err.to_string().contains("past the root"), "{err}");
    }

    #[test]
    fn dangling_character_is_an_error() {
        let err = parse(10, false, "ab<$").unwrap_err();
        assert!(err.to_string().contains("leads nowhere"), "{err}");
    }

    #[test]
    fn empty_body_is_an_empty_trie() {
        let trie = parse(10, true, "").unwrap();
        assert!(trie.is_empty());
    }

    #[test]
    fn error_position_counts_characters() {
        match parse(10, false, "ab$<c#9;").unwrap_err() {
            TrieError::StreamSyntax { position, .. } => assert_eq!(position, 8),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
