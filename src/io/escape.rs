//! Character escaping for the text formats.

/// Introduces an escaped character.
pub(crate) const ESCAPE: char = '\\';

/// Characters with a meaning of their own in the V3/V4 token stream, plus
/// everything that might gain one later.
const SPECIAL: &str = "$<\n\r#@;\\[]/0123456789`~!@#$%^&*()_-+=[]{};:'\"<>,./?|";

/// True if `ch` must be escaped in a V3/V4 body.
#[inline]
pub(crate) fn is_special(ch: char) -> bool {
    ch.is_ascii() && SPECIAL.contains(ch)
}

/// Appends `ch` to `out`, escaped if it collides with a stream token.
///
/// Line breaks and the escape character itself are written as two-character
/// sequences after the escape, so an encoded body never contains a raw `\n`
/// that belongs to a word.
pub(crate) fn push_escaped(out: &mut String, ch: char) {
    if !is_special(ch) {
        out.push(ch);
        return;
    }
    out.push(ESCAPE);
    match ch {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\\' => out.push_str("\\\\"),
        _ => out.push(ch),
    }
}

/// Maps the character after a doubled escape back to its literal.
#[inline]
pub(crate) fn unescape_pair(ch: char) -> char {
    match ch {
        'n' => '\n',
        'r' => '\r',
        other => other,
    }
}

/// Characters escaped in a V1 line, which uses them as separators.
const LINE_SPECIAL_V1: &str = "[]\\,:{}*";

/// Appends `ch` escaped for a V1 line.
pub(crate) fn push_escaped_v1(out: &mut String, ch: char) {
    match ch {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        c if LINE_SPECIAL_V1.contains(c) => {
            out.push(ESCAPE);
            out.push(c);
        }
        c => out.push(c),
    }
}

/// Appends the letter of a V2 line.
///
/// Only line breaks and the escape need protecting: the letter is always the
/// first character of its line.
pub(crate) fn push_escaped_v2(out: &mut String, ch: char) {
    match ch {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\\' => out.push_str("\\\\"),
        c => out.push(c),
    }
}
