//! Byte cursor for traversing source text.

use kli_util::{ColumnIndex, LineIndex};

/// A cursor over raw source bytes with line/column tracking.
///
/// Lines and columns are one-based; a newline byte bumps the line and
/// resets the column. The cursor never decodes: the language is 8-bit,
/// so every byte advances the column by exactly one.
///
/// # Example
///
/// ```
/// use kli_lex::Cursor;
///
/// let mut cursor = Cursor::new(b"on\nclicked");
/// assert_eq!(cursor.current(), Some(b'o'));
/// cursor.advance();
/// cursor.advance();
/// cursor.advance();
/// assert_eq!((cursor.line(), cursor.column()), (2, 1));
/// ```
pub struct Cursor<'a> {
    source: &'a [u8],
    position: usize,
    line: LineIndex,
    column: ColumnIndex,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `source`.
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Byte at the cursor, or `None` at end of input.
    #[inline]
    pub fn current(&self) -> Option<u8> {
        self.source.get(self.position).copied()
    }

    /// Byte `offset` positions ahead of the cursor.
    #[inline]
    pub fn peek(&self, offset: usize) -> Option<u8> {
        self.source.get(self.position + offset).copied()
    }

    /// Advances past the current byte, updating line/column tracking.
    #[inline]
    pub fn advance(&mut self) {
        let Some(byte) = self.current() else { return };
        self.position += 1;
        if byte == b'\n' {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
    }

    /// Consumes and returns the current byte.
    #[inline]
    pub fn bump(&mut self) -> Option<u8> {
        let byte = self.current()?;
        self.advance();
        Some(byte)
    }

    /// Consumes the current byte if it equals `expected`.
    pub fn match_byte(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Current one-based line.
    pub fn line(&self) -> LineIndex {
        self.line
    }

    /// Current one-based column.
    pub fn column(&self) -> ColumnIndex {
        self.column
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Source bytes from `start` up to the cursor.
    ///
    /// The returned slice borrows the source, not the cursor, so callers
    /// can keep it while continuing to advance.
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.source[start..self.position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor() {
        let cursor = Cursor::new(b"on clicked");
        assert_eq!(cursor.current(), Some(b'o'));
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.line(), 1);
        assert_eq!(cursor.column(), 1);
    }

    #[test]
    fn test_advance_and_peek() {
        let mut cursor = Cursor::new(b"abc");
        assert_eq!(cursor.peek(0), Some(b'a'));
        assert_eq!(cursor.peek(2), Some(b'c'));
        assert_eq!(cursor.peek(3), None);
        cursor.advance();
        assert_eq!(cursor.current(), Some(b'b'));
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_line_column_tracking() {
        let mut cursor = Cursor::new(b"ab\ncd");
        cursor.advance();
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (1, 3));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 2));
    }

    #[test]
    fn test_match_byte() {
        let mut cursor = Cursor::new(b"+=");
        assert!(cursor.match_byte(b'+'));
        assert!(!cursor.match_byte(b'+'));
        assert!(cursor.match_byte(b'='));
        assert!(!cursor.match_byte(b'='));
    }

    #[test]
    fn test_slice_from_outlives_advances() {
        let mut cursor = Cursor::new(b"value = 1");
        let start = cursor.position();
        for _ in 0..5 {
            cursor.advance();
        }
        let slice = cursor.slice_from(start);
        cursor.advance();
        assert_eq!(slice, b"value");
    }

    #[test]
    fn test_empty_source() {
        let mut cursor = Cursor::new(b"");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.bump(), None);
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
    }
}
