//! The plain-text header shared by every version.

use super::Version;
use crate::error::{Result, TrieError};

pub(crate) const SHEBANG: &str = "#!/usr/bin/env cspell-trie reader";
pub(crate) const DATA: &str = "__DATA__";
const SIGNATURE: &str = "TrieXv";
const BASE: &str = "base=";

/// What the header of a file says about its body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) version: Version,
    pub(crate) radix: u32,
    /// V1 has no `__DATA__` marker, so the first body line is read with the header.
    pub(crate) first_data_line: Option<String>,
}

/// Writes the header of `version`, one `# ` line per line of `comment`.
pub(crate) fn write_header(version: Version, radix: u32, comment: &str) -> String {
    let mut out = format!("{SHEBANG}\n{SIGNATURE}{}\n{BASE}{radix}\n", version.number());
    if !comment.is_empty() {
        for line in comment.lines() {
            out.push_str("# ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out.push_str("# Data:\n");
    if version != Version::V1 {
        out.push_str(DATA);
        out.push('\n');
    }
    out
}

fn is_skipped(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Reads header lines up to `__DATA__`, skipping blanks and comments.
///
/// Two significant lines are expected: the version signature and the radix.
/// A third one is the first body line of a V1 file and an unknown format for
/// any other version. An unknown version number is reported only once the
/// signature and radix themselves are well formed.
pub(crate) fn read_header<I: Iterator<Item = String>>(lines: &mut I) -> Result<Header> {
    let mut rows: Vec<String> = Vec::with_capacity(2);
    let mut first_data_line = None;
    for line in lines.by_ref() {
        let line = line.trim();
        if is_skipped(line) {
            continue;
        }
        if line == DATA {
            break;
        }
        if rows.len() == 2 {
            first_data_line = Some(line.to_string());
            break;
        }
        rows.push(line.to_string());
    }
    if rows.len() != 2 {
        return Err(TrieError::Format);
    }

    let number = parse_decimal(&rows[0], SIGNATURE).ok_or(TrieError::Format)?;
    let radix = parse_decimal(&rows[1], BASE)
        .filter(|radix| (2..=36).contains(radix))
        .ok_or(TrieError::Format)?;
    let version = Version::from_number(number)?;
    // Only V1 starts its body without a `__DATA__` line.
    if first_data_line.is_some() && version != Version::V1 {
        return Err(TrieError::Format);
    }
    Ok(Header {
        version,
        radix,
        first_data_line,
    })
}

fn parse_decimal(row: &str, prefix: &str) -> Option<u32> {
    let digits = row.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    fn read(text: &str) -> Result<Header> {
        let mut lines = text.lines().map(str::to_string);
        read_header(&mut lines)
    }

    #[test]
    fn reads_version_and_radix() {
        let header = read(&write_header(Version::V3, 16, "")).unwrap();
        assert_eq!(header.version, Version::V3);
        assert_eq!(header.radix, 16);
        assert_eq!(header.first_data_line, None);
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        let text = "\n  # leading\n  TrieXv4  \n# between\n\tbase=36\n\n# Data:\n__DATA__\nbody";
        let mut lines = text.lines().map(str::to_string);
        let header = read_header(&mut lines).unwrap();
        assert_eq!(header.version, Version::V4);
        assert_eq!(header.radix, 36);
        assert_eq!(lines.next().as_deref(), Some("body"));
    }

    #[test]
    fn v1_header_stops_at_first_data_line() {
        let mut text = write_header(Version::V1, 10, "note");
        text.push_str("*\na,b\n");
        let mut lines = text.lines().map(str::to_string);
        let header = read_header(&mut lines).unwrap();
        assert_eq!(header.version, Version::V1);
        assert_eq!(header.first_data_line.as_deref(), Some("*"));
        assert_eq!(lines.next().as_deref(), Some("a,b"));
    }

    #[test]
    fn unknown_format() {
        assert!(matches!(read("One\nTwo"), Err(TrieError::Format)));
        assert!(matches!(read(""), Err(TrieError::Format)));
        assert!(matches!(read("TrieXv3\n__DATA__"), Err(TrieError::Format)));
        assert!(matches!(read("TrieXv3\nbase=16\nextra\n__DATA__"), Err(TrieError::Format)));
        assert!(matches!(read("TrieXv3\nbase=99\n__DATA__"), Err(TrieError::Format)));
        assert!(matches!(read("TrieXvx\nbase=10\n__DATA__"), Err(TrieError::Format)));
    }

    #[test]
    fn unknown_version() {
        let err = read("TrieXv9\nbase=10\n__DATA__").unwrap_err();
        assert!(matches!(err, TrieError::Version(9)));
        assert_eq!(err.to_string(), "Unsupported version: 9");

        // A header without `__DATA__` still reports the version first.
        let err = read("TrieXv9\nbase=10\n# Data:\n*\n").unwrap_err();
        assert!(matches!(err, TrieError::Version(9)));
    }

    #[test]
    fn header_text() {
        assert_eq!(
            write_header(Version::V4, 10, "line one  \nline two"),
            "#!/usr/bin/env cspell-trie reader\nTrieXv4\nbase=10\n# line one\n# line two\n# Data:\n__DATA__\n"
        );
        assert!(!write_header(Version::V1, 10, "").contains(DATA));
    }
}
