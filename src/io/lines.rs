//! Line splitting on input and chunk buffering on output.

/// Splits each incoming piece of text into lines, keeping the `\n`.
///
/// Pieces are split independently and never joined, so callers may pass
/// whole files, arbitrary chunks that end on line breaks, or lines with the
/// terminator already stripped.
pub(crate) struct SplitLines<I> {
    inner: I,
    pending: std::vec::IntoIter<String>,
}

impl<I, S> SplitLines<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub(crate) fn new(inner: I) -> Self {
        SplitLines {
            inner,
            pending: Vec::new().into_iter(),
        }
    }
}

impl<I, S> Iterator for SplitLines<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.pending.next() {
                return Some(line);
            }
            let piece = self.inner.next()?;
            let piece = piece.as_ref();
            if !piece.contains('\n') || piece.find('\n') == Some(piece.len() - 1) {
                return Some(piece.to_string());
            }
            self.pending = piece
                .split_inclusive('\n')
                .map(str::to_string)
                .collect::<Vec<_>>()
                .into_iter();
        }
    }
}

/// Collects small tokens into output chunks of roughly `size` characters.
#[derive(Clone, Debug)]
pub(crate) struct ChunkBuffer {
    buf: String,
    size: usize,
}

impl ChunkBuffer {
    pub(crate) fn new(size: usize) -> Self {
        ChunkBuffer {
            buf: String::with_capacity(size + 64),
            size,
        }
    }

    pub(crate) fn buf(&mut self) -> &mut String {
        &mut self.buf
    }

    /// Hands out the buffer once it has reached the chunk size.
    pub(crate) fn take_full(&mut self) -> Option<String> {
        (self.buf.len() >= self.size).then(|| self.take())
    }

    /// Hands out whatever is left, if anything.
    pub(crate) fn take_rest(&mut self) -> Option<String> {
        (!self.buf.is_empty()).then(|| self.take())
    }

    fn take(&mut self) -> String {
        std::mem::replace(&mut self.buf, String::with_capacity(self.size + 64))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_pieces_into_lines() {
        let lines: Vec<_> = SplitLines::new(["a\nb\n", "c\nd"].into_iter()).collect();
        assert_eq!(lines, ["a\n", "b\n", "c\n", "d"]);
    }

    #[test]
    fn lines_without_terminators_stay_separate() {
        let lines: Vec<_> = SplitLines::new(["TrieXv3", "base=10"].into_iter()).collect();
        assert_eq!(lines, ["TrieXv3", "base=10"]);
    }

    #[test]
    fn single_terminated_line_is_passed_through() {
        let lines: Vec<_> = SplitLines::new(["one\n".to_string()].into_iter()).collect();
        assert_eq!(lines, ["one\n"]);
    }

    #[test]
    fn chunk_buffer_waits_for_size() {
        let mut chunks = ChunkBuffer::new(4);
        chunks.buf().push_str("ab");
        assert_eq!(chunks.take_full(), None);
        chunks.buf().push_str("cde");
        assert_eq!(chunks.take_full().as_deref(), Some("abcde"));
        assert_eq!(chunks.take_rest(), None);
        chunks.buf().push('f');
        assert_eq!(chunks.take_rest().as_deref(), Some("f"));
    }
}
