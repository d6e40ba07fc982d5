//! Version 2: one line per distinct (letter, node) pair.
//!
//! A line starts with the letter of the edge leading to the node, then `*`
//! if the node ends a word, then the comma separated line numbers of its
//! children in the header radix. Lines only refer to lines above them; the
//! root is the last line and uses `^` as its letter.

use hashbrown::HashMap;

use super::escape::{push_escaped_v2, unescape_pair, ESCAPE};
use super::header::write_header;
use super::number::push_number;
use super::{ExportOptions, Version};
use crate::error::{Result, TrieError};
use crate::trie::{ChildIter, NodeArena, NodeId, TrieNode, TrieOptions, TrieRoot};

const WORD: char = '*';
const ROOT_LETTER: char = '^';

struct Frame<'t> {
    node: NodeId,
    ch: char,
    children: ChildIter<'t>,
    refs: Vec<u32>,
}

/// Lazy V2 encoder, yielding the header and then one line at a time.
pub struct Encoder<'t> {
    trie: &'t TrieRoot,
    header: Option<String>,
    radix: u32,
    stack: Vec<Frame<'t>>,
    written: HashMap<(NodeId, char), u32>,
    signatures: HashMap<String, u32>,
}

impl<'t> Encoder<'t> {
    pub(crate) fn new(trie: &'t TrieRoot, options: &ExportOptions) -> Self {
        let radix = options.radix();
        let mut encoder = Encoder {
            trie,
            header: Some(write_header(Version::V2, radix, &options.comment)),
            radix,
            stack: Vec::new(),
            written: HashMap::new(),
            signatures: HashMap::new(),
        };
        encoder.open(trie.root(), ROOT_LETTER);
        encoder
    }

    fn open(&mut self, node: NodeId, ch: char) {
        let trie = self.trie;
        self.stack.push(Frame {
            node,
            ch,
            children: trie.node(node).children(),
            refs: Vec::new(),
        });
    }

    fn line(&self, frame: &Frame<'_>) -> String {
        let mut line = String::new();
        push_escaped_v2(&mut line, frame.ch);
        if self.trie.node(frame.node).is_word() {
            line.push(WORD);
        }
        let mut refs = frame.refs.clone();
        refs.sort_unstable();
        for (i, &r) in refs.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            push_number(&mut line, r, self.radix);
        }
        line
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
                let written = self.written.get(&(child, ch)).copied();
                match written {
                    Some(number) => frame.refs.push(number),
                    None => self.open(child, ch),
                }
                continue;
            }

            let frame = self.stack.pop()?;
            let line = self.line(&frame);
            if self.stack.is_empty() {
                return Some(line + "\n");
            }
            let next_number = self.signatures.len() as u32;
            let (number, is_new) = match self.signatures.get(&line) {
                Some(&number) => (number, false),
                None => (next_number, true),
            };
            self.written.insert((frame.node, frame.ch), number);
            if let Some(parent) = self.stack.last_mut() {
                parent.refs.push(number);
            }
            if is_new {
                self.signatures.insert(line.clone(), number);
                return Some(line + "\n");
            }
        }
    }
}

/// Splits a line into its letter, word flag and child line numbers.
fn parse_line(line: &str, radix: u32) -> std::result::Result<(char, bool, Vec<usize>), String> {
    let mut chars = line.chars();
    let letter = match chars.next() {
        Some(ESCAPE) => unescape_pair(chars.next().ok_or("dangling escape")?),
        Some(ch) => ch,
        None => return Err("empty line".into()),
    };
    let rest = chars.as_str();
    let (word, refs) = match rest.strip_prefix(WORD) {
        Some(refs) => (true, refs),
        None => (false, rest),
    };
    let refs = refs
        .split(',')
        .filter(|r| !r.is_empty())
        .map(|r| usize::from_str_radix(r, radix).map_err(|e| format!("invalid reference {r:?}: {e}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((letter, word, refs))
}

/// Decodes V2 lines. The last line is the root.
pub(crate) fn decode<I: Iterator<Item = String>>(radix: u32, lines: I) -> Result<TrieRoot> {
    let mut arena = NodeArena::new();
    // (letter, node) for every line read so far.
    let mut nodes: Vec<(char, NodeId)> = Vec::new();
    let mut last_line = 0;
    for (line_number, line) in lines.enumerate() {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            continue;
        }
        let error = |message: String| TrieError::syntax(line_number, message);
        // Every line but the last (the root) must end a word or lead to one.
        if let Some(&(letter, previous)) = nodes.last() {
            let node = &arena[previous];
            if !node.is_word() && !node.has_children() {
                return Err(TrieError::syntax(last_line, format!("{letter:?} leads nowhere")));
            }
        }
        last_line = line_number;
        let (letter, word, refs) = parse_line(line, radix).map_err(error)?;
        let mut node = TrieNode::new(word);
        for r in refs {
            let &(ch, child) = nodes
                .get(r)
                .ok_or_else(|| error(format!("reference to unknown line {r}")))?;
            node.set_child(ch, child);
        }
        nodes.push((letter, arena.alloc(node)));
    }

    let root = match nodes.last() {
        Some(&(_, root)) if arena[root].is_word() => {
            return Err(TrieError::syntax(last_line, "the root cannot end a word"));
        }
        Some(&(_, root)) => root,
        None => arena.alloc(TrieNode::new(false)),
    };
    Ok(TrieRoot::from_parts(arena, root, TrieOptions::default(), true))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::lines::SplitLines;

    fn encode(trie: &TrieRoot, base: u32) -> Vec<String> {
        let options = ExportOptions {
            version: 2,
            base,
            ..Default::default()
        };
        Encoder::new(trie, &options).skip(1).collect()
    }

    #[test]
    fn letters_lead_each_line() {
        let trie = TrieRoot::from_words(["cat", "cats", "car"], TrieOptions::default());
        assert_eq!(encode(&trie, 10), ["r*\n", "s*\n", "t*1\n", "a0,2\n", "c3\n", "^4\n"]);
    }

    #[test]
    fn identical_lines_are_written_once() {
        let trie = TrieRoot::from_words(["xa", "ya", "za"], TrieOptions::default());
        let lines = encode(&trie, 10);
        assert_eq!(lines, ["a*\n", "x0\n", "y0\n", "z0\n", "^1,2,3\n"]);
    }

    #[test]
    fn round_trip() {
        let words = ["^", "a*b", "1,2", "new\nline", "back\\slash", "walk", "talk"];
        let trie = TrieRoot::from_words(words, TrieOptions::default());
        for base in [10, 16, 36] {
            let lines = encode(&trie, base);
            let decoded = decode(base, SplitLines::new(lines.iter())).unwrap();
            let mut expected: Vec<_> = words.iter().map(|w| w.to_string()).collect();
            expected.sort();
            assert_eq!(decoded.words().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn line_without_word_or_children_is_an_error() {
        let lines = ["a*".to_string(), "x".to_string(), "^0,1".to_string()];
        let err = decode(10, lines.into_iter()).unwrap_err();
        assert!(matches!(err, TrieError::StreamSyntax { position: 1, .. }), "{err}");
        assert!(err.to_string().contains("'x' leads nowhere"), "{err}");
    }

    #[test]
    fn root_cannot_end_a_word() {
        let lines = ["a*".to_string(), "^*0".to_string()];
        let err = decode(10, lines.into_iter()).unwrap_err();
        assert!(err.to_string().contains("root cannot end a word"), "{err}");
    }

    #[test]
    fn empty_root_is_an_empty_trie() {
        let lines = ["^".to_string()];
        assert!(decode(10, lines.into_iter()).unwrap().is_empty());
    }

    #[test]
    fn unknown_line_is_an_error() {
        let lines = ["a*".to_string(), "b3".to_string()];
        let err = decode(10, lines.into_iter()).unwrap_err();
        assert!(err.to_string().contains("unknown line 3"), "{err}");
    }
}
