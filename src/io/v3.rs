//! Version 3: a depth-first token stream with absolute references.
//!
//! ```text
//! #!/usr/bin/env cspell-trie reader
//! TrieXv3
//! base=10
//! # Data:
//! __DATA__
//! talk$4
//! w#1;<
//! ```
//!
//! Every node with children gets a number in the order it is first written;
//! `#<n>;` points back at such a node instead of writing it again.

use super::escape::push_escaped;
use super::header::write_header;
use super::lines::ChunkBuffer;
use super::number::push_number;
use super::parser::StreamParser;
use super::walk::{BackRuns, Step, Walk, EOL, EOR, REF};
use super::{ExportOptions, Version};
use crate::error::Result;
use crate::trie::{TrieOptions, TrieRoot};

/// A line break is forced after this many words and references.
const WORDS_PER_LINE: usize = 20;
const CHUNK_SIZE: usize = 1200;

/// Lazy V3 encoder, yielding the header and then chunks of the body.
pub struct Encoder<'t> {
    header: Option<String>,
    walk: Walk<'t>,
    radix: u32,
    add_breaks: bool,
    backs: BackRuns,
    words: usize,
    eol: bool,
    /// First character of the current word; forbidden and normalized
    /// branches get an extra level of line breaks.
    first: Option<char>,
    special_prefixes: [char; 2],
    chunks: ChunkBuffer,
    done: bool,
}

impl<'t> Encoder<'t> {
    pub(crate) fn new(trie: &'t TrieRoot, options: &ExportOptions) -> Self {
        let radix = options.radix();
        let TrieOptions {
            strip_case_and_accents_prefix,
            forbidden_word_prefix,
            ..
        } = *trie.options();
        Encoder {
            header: Some(write_header(Version::V3, radix, &options.comment)),
            walk: Walk::new(trie, options.optimize_simple_references),
            radix,
            add_breaks: options.add_line_breaks_to_improve_diffs,
            backs: BackRuns::new(),
            words: 0,
            eol: false,
            first: None,
            special_prefixes: [strip_case_and_accents_prefix, forbidden_word_prefix],
            chunks: ChunkBuffer::new(CHUNK_SIZE),
            done: false,
        }
    }

    fn flush(&mut self) {
        let out = self.chunks.buf();
        self.backs.flush(out);
        if self.eol {
            out.push(EOL);
            self.eol = false;
            self.words = 0;
        }
    }

    /// Prepares for a token that is neither a back nor an end of word.
    fn before_token(&mut self) {
        if self.words >= WORDS_PER_LINE {
            self.eol = true;
        }
        self.flush();
    }

    fn step(&mut self, step: Step) {
        match step {
            Step::Open { depth, .. } => {
                if self.add_breaks && (1..=2).contains(&depth) {
                    self.eol = true;
                }
            }
            Step::Char { ch, depth } => {
                if depth == 0 {
                    self.first = Some(ch);
                }
                self.before_token();
                push_escaped(self.chunks.buf(), ch);
            }
            Step::Ref { number, .. } => {
                self.before_token();
                self.words += 1;
                let out = self.chunks.buf();
                out.push(REF);
                push_number(out, number, self.radix);
                out.push(EOR);
            }
            Step::Eow => {
                self.flush();
                self.backs.end_of_word(self.chunks.buf());
                self.words += 1;
            }
            Step::Close { depth } => {
                let special = self
                    .first
                    .is_some_and(|ch| self.special_prefixes.contains(&ch));
                if self.add_breaks && (depth == 2 || (depth == 3 && special)) {
                    self.eol = true;
                }
            }
            Step::Back { depth } => {
                self.backs.back();
                if depth == 0 {
                    self.eol = true;
                }
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
                    self.flush();
                    self.done = true;
                    return self.chunks.take_rest();
                }
            }
        }
    }
}

/// Decodes a V3 body.
pub(crate) fn decode<I: Iterator<Item = String>>(radix: u32, lines: I) -> Result<TrieRoot> {
    let mut parser = StreamParser::new(radix, false);
    for line in lines {
        parser.feed(&line)?;
    }
    parser.finish()
}
