//! Reading and writing the `TrieXv<N>` text formats.
//!
//! Every file starts with a small header naming the format version and the
//! radix used for numbers in the body:
//!
//! ```text
//! #!/usr/bin/env cspell-trie reader
//! TrieXv4
//! base=10
//! # Data:
//! __DATA__
//! ```
//!
//! [`decode`] reads the header and hands the body to the matching version.
//! [`encode`] writes version 4 unless [`ExportOptions::version`] asks for an
//! older one. Encoders are lazy: they borrow the trie and yield the output in
//! pieces, so a large dictionary never has to exist as one string.
//!
//! # Examples
//!
//! ```
//! use dictrie::io::{decode, encode_to_string, ExportOptions};
//! use dictrie::{consolidate, TrieData, TrieOptions, TrieRoot};
//!
//! let trie = consolidate(TrieRoot::from_words(["walk", "talk"], TrieOptions::default()));
//! let text = encode_to_string(&trie, &ExportOptions::default()).unwrap();
//! let decoded = decode(&text).unwrap();
//! assert!(decoded.has("talk"));
//! assert_eq!(decoded.words().collect::<Vec<_>>(), ["talk", "walk"]);
//! ```

mod escape;
mod header;
mod lines;
mod number;
mod parser;
mod walk;

pub mod v1;
pub mod v2;
pub mod v3;
pub mod v4;

use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrieError};
use crate::trie::TrieRoot;
use crate::trie_data::Trie;
use header::read_header;
use lines::SplitLines;

/// The format versions this crate reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    /// One line per node, edges written as letter plus line number.
    V1,
    /// One line per node, led by the letter of its incoming edge.
    V2,
    /// Depth-first token stream with absolute references.
    V3,
    /// V3 plus a reference index and diff-friendly line breaks.
    V4,
}

impl Version {
    /// The newest version, written by default.
    pub const LATEST: Version = Version::V4;

    /// The number used in the `TrieXv<N>` signature.
    pub fn number(self) -> u32 {
        match self {
            Version::V1 => 1,
            Version::V2 => 2,
            Version::V3 => 3,
            Version::V4 => 4,
        }
    }

    /// Looks up a version by number.
    pub fn from_number(number: u32) -> Result<Version> {
        match number {
            1 => Ok(Version::V1),
            2 => Ok(Version::V2),
            3 => Ok(Version::V3),
            4 => Ok(Version::V4),
            n => Err(TrieError::Version(n)),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrieXv{}", self.number())
    }
}

/// Settings for [`encode`].
///
/// Unset fields take their defaults when deserialized, so a configuration
/// file only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Format version, 1 to 4.
    pub version: u32,
    /// Radix for numbers in the body. Values below 10 are raised to 10.
    pub base: u32,
    /// Written into the header, one `# ` line per line.
    pub comment: String,
    /// Write a node whose only child is a bare word end again instead of
    /// referring to it. Applies to V3 and V4.
    pub optimize_simple_references: bool,
    /// Break V3 lines at the first three levels of the trie so that adding a
    /// word touches few lines.
    pub add_line_breaks_to_improve_diffs: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            version: Version::LATEST.number(),
            base: 10,
            comment: String::new(),
            optimize_simple_references: false,
            add_line_breaks_to_improve_diffs: true,
        }
    }
}

impl ExportOptions {
    /// The radix actually written, `base` clamped to `10..=36`.
    pub fn radix(&self) -> u32 {
        self.base.clamp(10, 36)
    }

    fn validate(&self) -> Result<Version> {
        if !(2..=36).contains(&self.base) {
            return Err(TrieError::invalid_option(format!(
                "base must be between 2 and 36, got {}",
                self.base
            )));
        }
        Version::from_number(self.version)
    }
}

/// A lazy encoder for any supported version.
///
/// Yields the header first, then the body in pieces. Concatenating every
/// piece gives the complete file.
pub enum Encoder<'t> {
    /// See [`v1`].
    V1(v1::Encoder<'t>),
    /// See [`v2`].
    V2(v2::Encoder<'t>),
    /// See [`v3`].
    V3(v3::Encoder<'t>),
    /// See [`v4`].
    V4(v4::Encoder<'t>),
}

impl Iterator for Encoder<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self {
            Encoder::V1(e) => e.next(),
            Encoder::V2(e) => e.next(),
            Encoder::V3(e) => e.next(),
            Encoder::V4(e) => e.next(),
        }
    }
}

/// Starts encoding `trie` with `options`.
///
/// Options are checked before anything is written: an unknown version gives
/// [`TrieError::Version`] and an unusable base [`TrieError::InvalidOption`].
pub fn encode<'t>(trie: &'t TrieRoot, options: &ExportOptions) -> Result<Encoder<'t>> {
    let version = options.validate()?;
    debug!(%version, radix = options.radix(), "encoding trie");
    Ok(match version {
        Version::V1 => Encoder::V1(v1::Encoder::new(trie, options)),
        Version::V2 => Encoder::V2(v2::Encoder::new(trie, options)),
        Version::V3 => Encoder::V3(v3::Encoder::new(trie, options)),
        Version::V4 => Encoder::V4(v4::Encoder::new(trie, options)),
    })
}

/// Encodes `trie` into a single string.
pub fn encode_to_string(trie: &TrieRoot, options: &ExportOptions) -> Result<String> {
    Ok(encode(trie, options)?.collect())
}

/// Encodes `trie` piece by piece into `writer`.
pub fn serialize_to_writer<W: Write>(
    trie: &TrieRoot,
    options: &ExportOptions,
    mut writer: W,
) -> Result<()> {
    for piece in encode(trie, options)? {
        writer.write_all(piece.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Decodes a complete file.
pub fn decode(text: &str) -> Result<Trie> {
    decode_lines(std::iter::once(text))
}

/// Decodes a file given as lines or chunks.
///
/// Pieces may be whole lines with or without their `\n`, or larger chunks;
/// each is split on line breaks independently.
pub fn decode_lines<I, S>(lines: I) -> Result<Trie>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    decode_trie_root(lines).map(Trie::new)
}

/// Decodes a file from a reader, one line at a time.
///
/// The file is never held in memory as a whole. A read error ends the input
/// and is returned in place of whatever the decoder made of the lines before it.
pub fn decode_reader<R: Read>(reader: R) -> Result<Trie> {
    let mut read_error = None;
    let lines = BufReader::new(reader)
        .lines()
        .map_while(|line| line.map_err(|e| read_error = Some(e)).ok());
    let decoded = decode_lines(lines);
    match read_error {
        Some(e) => Err(e.into()),
        None => decoded,
    }
}

/// Decodes a file given as lines or chunks into a bare [`TrieRoot`].
pub fn decode_trie_root<I, S>(lines: I) -> Result<TrieRoot>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = SplitLines::new(lines.into_iter());
    let header = read_header(&mut lines)?;
    debug!(version = %header.version, radix = header.radix, "decoding trie");
    let radix = header.radix;
    match header.version {
        Version::V1 => v1::decode(radix, header.first_data_line.into_iter().chain(lines)),
        Version::V2 => v2::decode(radix, lines),
        Version::V3 => v3::decode(radix, lines),
        Version::V4 => v4::decode(radix, lines),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trie::{consolidate, TrieOptions};
    use crate::trie_data::TrieData;

    fn sample() -> TrieRoot {
        consolidate(TrieRoot::from_words(
            ["cat", "cats", "car", "walk", "talk", "walked", "talked"],
            TrieOptions::default(),
        ))
    }

    fn with_version(version: u32) -> ExportOptions {
        ExportOptions {
            version,
            ..Default::default()
        }
    }

    #[test]
    fn version_numbers() {
        for n in 1..=4 {
            assert_eq!(Version::from_number(n).unwrap().number(), n);
        }
        assert!(matches!(Version::from_number(5), Err(TrieError::Version(5))));
        assert_eq!(Version::V3.to_string(), "TrieXv3");
    }

    #[test]
    fn default_export_is_latest_version() {
        let text = encode_to_string(&sample(), &ExportOptions::default()).unwrap();
        assert_eq!(text.lines().nth(1), Some("TrieXv4"));
    }

    #[test]
    fn every_version_round_trips() {
        let trie = sample();
        let expected: Vec<String> = trie.words().collect();
        for version in 1..=4 {
            let text = encode_to_string(&trie, &with_version(version)).unwrap();
            let decoded = decode(&text).unwrap();
            assert_eq!(decoded.words().collect::<Vec<_>>(), expected, "v{version}");
        }
    }

    #[test]
    fn encoder_pieces_decode_as_lines() {
        let trie = sample();
        for version in 1..=4 {
            let pieces: Vec<String> = encode(&trie, &with_version(version)).unwrap().collect();
            let decoded = decode_lines(&pieces).unwrap();
            assert!(decoded.has("talked"), "v{version}");
        }
    }

    #[test]
    fn stripped_lines_decode() {
        let text = encode_to_string(&sample(), &with_version(2)).unwrap();
        let decoded = decode_lines(text.lines()).unwrap();
        assert_eq!(decoded.size(), 7);
    }

    #[test]
    fn unknown_version_is_rejected_before_output() {
        let err = encode(&sample(), &with_version(7)).err().unwrap();
        assert_eq!(err.to_string(), "Unsupported version: 7");
    }

    #[test]
    fn unusable_base_is_rejected() {
        let options = ExportOptions {
            base: 40,
            ..Default::default()
        };
        assert!(matches!(
            encode(&sample(), &options),
            Err(TrieError::InvalidOption(_))
        ));
    }

    #[test]
    fn small_bases_are_raised_to_ten() {
        let options = ExportOptions {
            base: 2,
            ..Default::default()
        };
        assert_eq!(options.radix(), 10);
        let text = encode_to_string(&sample(), &options).unwrap();
        assert!(text.contains("\nbase=10\n"));
    }

    #[test]
    fn unknown_format() {
        let err = decode("One\nTwo").unwrap_err();
        assert!(matches!(err, TrieError::Format));
        assert_eq!(err.to_string(), "Unknown file format");
    }

    #[test]
    fn writer_receives_the_whole_file() {
        let trie = sample();
        let mut out = Vec::new();
        serialize_to_writer(&trie, &ExportOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, encode_to_string(&trie, &ExportOptions::default()).unwrap());
    }

    #[test]
    fn reader_decodes_every_version() {
        let trie = sample();
        for version in 1..=4 {
            let text = encode_to_string(&trie, &with_version(version)).unwrap();
            let decoded = decode_reader(text.as_bytes()).unwrap();
            assert_eq!(decoded.size(), 7, "v{version}");
            assert!(decoded.has("walked"), "v{version}");
        }
    }

    #[test]
    fn reader_accepts_crlf_line_ends() {
        let text = encode_to_string(&sample(), &with_version(4)).unwrap();
        let text = text.replace('\n', "\r\n");
        assert!(decode_reader(text.as_bytes()).unwrap().has("talked"));
    }

    /// Hands out `good` and then fails.
    struct BrokenReader<'a> {
        good: &'a [u8],
    }

    impl Read for BrokenReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.good.is_empty() {
                return Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "gone"));
            }
            let n = self.good.len().min(buf.len());
            buf[..n].copy_from_slice(&self.good[..n]);
            self.good = &self.good[n..];
            Ok(n)
        }
    }

    #[test]
    fn read_errors_are_reported() {
        let text = encode_to_string(&sample(), &with_version(3)).unwrap();
        let cut = text.len() / 2;
        let err = decode_reader(BrokenReader {
            good: &text.as_bytes()[..cut],
        })
        .unwrap_err();
        assert!(matches!(err, TrieError::Io(_)), "{err}");
    }

    #[test]
    fn options_from_json() {
        let options: ExportOptions =
            serde_json::from_str(r#"{ "version": 3, "base": 32, "optimizeSimpleReferences": true }"#)
                .unwrap();
        assert_eq!(options.version, 3);
        assert_eq!(options.radix(), 32);
        assert!(options.optimize_simple_references);
        assert!(options.add_line_breaks_to_improve_diffs);
    }
}
