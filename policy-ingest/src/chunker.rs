//! Fixed-width character chunking.
//!
//! Windows are measured in `char`s, so a multi-byte character is never split
//! and every chunk is a valid `&str` slice of the input. The iterator borrows
//! the text, allocates nothing, and can be cloned to restart from the
//! current position.

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Lazy iterator over consecutive `chunk_size`-character windows of a string.
#[derive(Debug, Clone)]
pub struct TextChunks<'a> {
    rest: &'a str,
    chunk_size: usize,
    remaining_chars: usize,
}

/// Splits `text` into windows of `chunk_size` characters.
///
/// The final window is shorter when the character count is not a multiple
/// of `chunk_size`. An empty `text` yields nothing. A `chunk_size` of zero
/// is treated as one.
///
/// ```
/// use policy_ingest::chunk_text;
///
/// let parts: Vec<&str> = chunk_text("abcdefg", 3).collect();
/// assert_eq!(parts, ["abc", "def", "g"]);
/// ```
pub fn chunk_text(text: &str, chunk_size: usize) -> TextChunks<'_> {
    TextChunks {
        rest: text,
        chunk_size: chunk_size.max(1),
        remaining_chars: text.chars().count(),
    }
}

/// [`chunk_text`] with [`DEFAULT_CHUNK_SIZE`].
pub fn chunk_text_default(text: &str) -> TextChunks<'_> {
    chunk_text(text, DEFAULT_CHUNK_SIZE)
}

impl<'a> Iterator for TextChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let split_at = self
            .rest
            .char_indices()
            .nth(self.chunk_size)
            .map_or(self.rest.len(), |(idx, _)| idx);

        let (head, tail) = self.rest.split_at(split_at);
        self.rest = tail;
        self.remaining_chars = self.remaining_chars.saturating_sub(self.chunk_size);
        Some(head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining_chars.div_ceil(self.chunk_size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for TextChunks<'_> {}

impl std::iter::FusedIterator for TextChunks<'_> {}
