//! Version 4: the V3 token stream tuned for line-based diffs.
//!
//! Absolute references change whenever a word is added near the top of the
//! file, which rewrites most lines of a V3 file. V4 adds a reference index
//! after the header, sorted by how often each node is reused, and `@<i>`
//! references into it. Lines break at every two-letter prefix, marked with a
//! comment such as `/* ab */`, and after about fifty words.
//!
//! In radix 10 a reference ends at the first non-digit, so the `;`
//! terminator is only written for other radixes.

use hashbrown::HashMap;
use tracing::debug;

use super::escape::push_escaped;
use super::header::write_header;
use super::lines::ChunkBuffer;
use super::number::{digits, push_number};
use super::parser::StreamParser;
use super::walk::{BackRuns, Step, Walk, COMMENT, EOL, EOR, REF, REF_INDEX};
use super::{ExportOptions, Version};
use crate::error::Result;
use crate::trie::TrieRoot;

const WORDS_PER_LINE: usize = 50;
const CHUNK_SIZE: usize = 1000;
/// The reference index wraps after a comma once a line is this long.
const INDEX_LINE_WIDTH: usize = 110;

/// Lazy V4 encoder, yielding the header, the reference index and then chunks
/// of the body.
pub struct Encoder<'t> {
    preamble: Option<String>,
    walk: Walk<'t>,
    radix: u32,
    /// Node number -> position in the reference index.
    index: HashMap<u32, u32>,
    backs: BackRuns,
    words: usize,
    word_chars: Vec<char>,
    chunks: ChunkBuffer,
    done: bool,
}

impl<'t> Encoder<'t> {
    pub(crate) fn new(trie: &'t TrieRoot, options: &ExportOptions) -> Self {
        let radix = options.radix();
        let optimize = options.optimize_simple_references;
        let reference_index = build_reference_index(trie, optimize, radix);

        let mut preamble = write_header(Version::V4, radix, &options.comment);
        write_reference_index(&mut preamble, &reference_index, radix);

        Encoder {
            preamble: Some(preamble),
            walk: Walk::new(trie, optimize),
            radix,
            index: reference_index
                .iter()
                .enumerate()
                .map(|(position, &number)| (number, position as u32))
                .collect(),
            backs: BackRuns::new(),
            words: 0,
            word_chars: Vec::new(),
            chunks: ChunkBuffer::new(CHUNK_SIZE),
            done: false,
        }
    }

    /// Flushes pending backs ahead of any other token, breaking long lines.
    fn before_token(&mut self) {
        let out = self.chunks.buf();
        self.backs.flush(out);
        if self.words >= WORDS_PER_LINE {
            self.words = 0;
            out.push(EOL);
        }
    }

    fn end_line(&mut self) {
        self.before_token();
        self.chunks.buf().push(EOL);
    }

    fn step(&mut self, step: Step) {
        match step {
            Step::Open { depth, .. } => {
                if (1..=2).contains(&depth) {
                    self.before_token();
                    let out = self.chunks.buf();
                    out.push(EOL);
                    out.push(COMMENT);
                    out.push_str("* ");
                    for &ch in &self.word_chars[..depth] {
                        push_comment_char(out, ch);
                    }
                    out.push_str(" *");
                    out.push(COMMENT);
                    out.push(EOL);
                    self.words = 0;
                }
            }
            Step::Char { ch, depth } => {
                self.word_chars.truncate(depth);
                self.word_chars.push(ch);
                self.before_token();
                push_escaped(self.chunks.buf(), ch);
            }
            Step::Ref { number, .. } => {
                self.before_token();
                let out = self.chunks.buf();
                match self.index.get(&number) {
                    Some(&position) => {
                        out.push(REF_INDEX);
                        push_number(out, position, self.radix);
                    }
                    None => {
                        out.push(REF);
                        push_number(out, number, self.radix);
                    }
                }
                if self.radix != 10 {
                    out.push(EOR);
                }
            }
            Step::Eow => {
                self.backs.end_of_word(self.chunks.buf());
                self.words += 1;
            }
            Step::Close { depth } => {
                if depth == 2 {
                    self.end_line();
                    self.words = 0;
                }
            }
            Step::Back { depth } => {
                self.backs.back();
                self.words += 1;
                if depth == 0 {
                    self.end_line();
                }
            }
        }
    }
}

impl Iterator for Encoder<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(preamble) = self.preamble.take() {
            return Some(preamble);
        }
        if self.done {
            return None;
        }
        loop {
            match self.walk.next() {
                Some(step) => {
                    self.step(step);
                    if let Some(chunk) = self.chunks.take_full() {
                        return Some(chunk);
                    }
                }
                None => {
                    self.backs.flush(self.chunks.buf());
                    self.done = true;
                    return self.chunks.take_rest();
                }
            }
        }
    }
}

/// Writes a prefix character inside a comment.
///
/// The comment ends at the first `/`, which therefore never appears inside.
fn push_comment_char(out: &mut String, ch: char) {
    match ch {
        COMMENT => out.push('?'),
        ch => push_escaped(out, ch),
    }
}

/// Decides whether a node referenced `count` times in total (its own
/// definition included) earns a slot at `position` of the index.
///
/// Each reference saves the digits `position` has fewer than `number`; the
/// entry itself costs the digits of `number` plus a comma.
fn worth_indexing(number: u32, count: u32, position: u32, radix: u32) -> bool {
    let direct = digits(number, radix);
    let indexed = digits(position, radix);
    let saved = (count as usize - 1) * direct.saturating_sub(indexed);
    saved > direct + 1
}

/// Picks index entries from `(number, count)` candidates.
///
/// Candidates are ranked by count, most used first, ties in creation order.
/// Positions are handed out only to kept entries.
fn select_index_entries(mut candidates: Vec<(u32, u32)>, radix: u32) -> Vec<u32> {
    candidates.retain(|&(_, count)| count >= 2);
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut kept = Vec::new();
    for (number, count) in candidates {
        if worth_indexing(number, count, kept.len() as u32, radix) {
            kept.push(number);
        }
    }
    kept
}

/// Counts how often the walk reaches each numbered node and returns the node
/// numbers that go into the index, in index order.
fn build_reference_index(trie: &TrieRoot, optimize_simple_references: bool, radix: u32) -> Vec<u32> {
    let mut counts: Vec<u32> = Vec::new();
    for step in Walk::new(trie, optimize_simple_references) {
        match step {
            Step::Open { number, .. } => {
                debug_assert_eq!(number as usize, counts.len());
                counts.push(1);
            }
            Step::Ref { number, .. } => counts[number as usize] += 1,
            _ => {}
        }
    }
    let candidates: Vec<(u32, u32)> = counts
        .iter()
        .enumerate()
        .map(|(number, &count)| (number as u32, count))
        .collect();
    let index = select_index_entries(candidates, radix);
    debug!(nodes = counts.len(), entries = index.len(), "built reference index");
    index
}

fn write_reference_index(out: &mut String, index: &[u32], radix: u32) {
    out.push_str("[\n");
    let mut line_start = out.len();
    for (i, &number) in index.iter().enumerate() {
        if i > 0 {
            out.push(',');
            if out.len() - line_start >= INDEX_LINE_WIDTH {
                out.push('\n');
                line_start = out.len();
            }
        }
        push_number(out, number, radix);
    }
    out.push_str("\n]\n");
}

/// Decodes a V4 body, reference index included.
pub(crate) fn decode<I: Iterator<Item = String>>(radix: u32, lines: I) -> Result<TrieRoot> {
    let mut parser = StreamParser::new(radix, true);
    for line in lines {
        parser.feed(&line)?;
    }
    parser.finish()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::lines::SplitLines;
    use crate::trie::{consolidate, TrieOptions};

    fn options(base: u32) -> ExportOptions {
        ExportOptions {
            base,
            ..Default::default()
        }
    }

    /// Everything after `__DATA__`, reference index included.
    fn body(text: &str) -> &str {
        let start = text.find("__DATA__\n").map_or(0, |i| i + "__DATA__\n".len());
        &text[start..]
    }

    fn round_trip(trie: &TrieRoot, base: u32) -> Vec<String> {
        let text: String = Encoder::new(trie, &options(base)).collect();
        let decoded = decode(base, SplitLines::new(body(&text).lines())).unwrap();
        decoded.words().collect()
    }

    #[test]
    fn selection_prefers_heavily_used_long_numbers() {
        let candidates = vec![(5, 40), (1234, 2), (5678, 30), (99, 10), (100, 1)];
        let index = select_index_entries(candidates, 10);
        // 5 has nothing to gain from an index slot; 1234 is used only once more.
        assert_eq!(index, [5678, 99]);
    }

    #[test]
    fn positions_only_advance_for_kept_entries() {
        // Ten short numbers that are all dropped leave position 0 for 1000.
        let mut candidates: Vec<_> = (0..10).map(|n| (n, 50)).collect();
        candidates.push((1000, 3));
        assert_eq!(select_index_entries(candidates, 10), [1000]);
    }

    #[test]
    fn ties_keep_creation_order() {
        let candidates = vec![(300, 9), (200, 9), (100, 9)];
        assert_eq!(select_index_entries(candidates, 10), [100, 200, 300]);
    }

    #[test]
    fn comments_mark_two_letter_prefixes() {
        let trie = consolidate(TrieRoot::from_words(["walk", "talk"], TrieOptions::default()));
        let text: String = Encoder::new(&trie, &options(10)).collect();
        assert_eq!(
            body(&text),
            "[\n\n]\nt\n/* t */\na\n/* ta */\nlk$2\n<2\nw#1<\n"
        );
        assert_eq!(round_trip(&trie, 10), ["talk", "walk"]);
    }

    #[test]
    fn references_are_terminated_outside_radix_ten() {
        let trie = consolidate(TrieRoot::from_words(["walk", "talk"], TrieOptions::default()));
        let text: String = Encoder::new(&trie, &options(16)).collect();
        assert!(body(&text).contains("w#1;<"));
    }

    #[test]
    fn slash_in_prefix_does_not_end_the_comment() {
        let trie = TrieRoot::from_words(["a/b", "//"], TrieOptions::default());
        assert_eq!(round_trip(&trie, 10), ["//", "a/b"]);
    }

    #[test]
    fn index_is_used_for_popular_nodes() {
        let mut words = vec!["a".repeat(12)];
        for stem in ["b", "c", "d", "f", "g", "h", "j", "k", "l", "m", "n", "p"] {
            for end in ["asting", "astings", "asted"] {
                words.push(format!("{stem}{end}"));
            }
        }
        let trie = consolidate(TrieRoot::from_words(&words, TrieOptions::default()));
        let text: String = Encoder::new(&trie, &options(10)).collect();
        let body = body(&text);
        assert!(!body.starts_with("[\n\n]"), "{body}");
        assert!(body.contains('@'));

        words.sort();
        for base in [10, 16, 36] {
            assert_eq!(round_trip(&trie, base), words);
        }
    }

    #[test]
    fn long_index_wraps() {
        let index: Vec<u32> = (1000..1100).collect();
        let mut out = String::new();
        write_reference_index(&mut out, &index, 10);
        assert!(out.starts_with("[\n1000,1001,"));
        assert!(out.ends_with("1099\n]\n"));
        assert!(out.lines().all(|line| line.len() <= INDEX_LINE_WIDTH + 5));
        assert!(out.lines().count() > 3);
    }
}
