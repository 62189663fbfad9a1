//! Core lexer: dispatch loop and name handling.

mod number;
mod operator;
mod string;

use kli_util::{ColumnIndex, FileIndex, LineIndex, Token, TokenStack};

use crate::cursor::Cursor;
use crate::error::LexError;

/// Streaming lexer over one file's raw bytes.
///
/// `Lexer::new(file, bytes, context).run()` consumes the whole input and
/// returns the packed [`TokenStack`], or the first [`LexError`]. The
/// `context` label is threaded into every diagnostic.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    stack: TokenStack,
    /// Reusable buffer for cooked string literals.
    scratch: Vec<u8>,
    file: FileIndex,
    context: &'a str,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer for `source`, tagging every token with `file`.
    pub fn new(file: FileIndex, source: &'a [u8], context: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            stack: TokenStack::new(),
            scratch: Vec::new(),
            file,
            context,
        }
    }

    /// Consumes the whole input, producing the token stack.
    ///
    /// Whitespace is skipped (newlines feed line tracking), comments are
    /// dropped, and every other byte must start a name, a number, a
    /// string or character literal, or an operator.
    pub fn run(mut self) -> Result<TokenStack, LexError> {
        if self.cursor.is_at_end() {
            return Err(LexError::Empty {
                context: self.context.to_string(),
            });
        }
        while let Some(byte) = self.cursor.current() {
            match byte {
                b if is_space(b) => self.cursor.advance(),
                b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.lex_name()?,
                b'0'..=b'9' => self.lex_number()?,
                b'"' => self.lex_string()?,
                b'\'' => self.lex_character()?,
                _ => self.lex_special(byte)?,
            }
        }
        Ok(self.stack)
    }

    /// Lexes `[A-Za-z_][A-Za-z0-9_]*`.
    fn lex_name(&mut self) -> Result<(), LexError> {
        let (start, line, column) = self.mark();
        while matches!(self.cursor.current(), Some(b) if is_name_continue(b)) {
            self.cursor.advance();
        }
        let literal = self.cursor.slice_from(start);
        self.emit(line, column, literal)
    }

    /// Snapshot of the cursor used to anchor the token being captured.
    pub(crate) fn mark(&self) -> (usize, LineIndex, ColumnIndex) {
        (self.cursor.position(), self.cursor.line(), self.cursor.column())
    }

    /// Appends one record to the stack.
    ///
    /// The cursor already points at the byte following the lexeme.
    pub(crate) fn emit(
        &mut self,
        line: LineIndex,
        column: ColumnIndex,
        literal: &[u8],
    ) -> Result<(), LexError> {
        let length = u16::try_from(literal.len()).map_err(|_| LexError::Overlong {
            line,
            column,
            context: self.context.to_string(),
        })?;
        self.stack.push(
            Token {
                file: self.file,
                line,
                column,
                length,
            },
            literal,
        );
        Ok(())
    }
}

#[inline]
fn is_space(byte: u8) -> bool {
    // ASCII whitespace plus vertical tab.
    byte.is_ascii_whitespace() || byte == 0x0b
}

#[inline]
fn is_name_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use kli_util::Lexeme;

    pub(crate) fn lex(source: &str) -> TokenStack {
        Lexer::new(0, source.as_bytes(), "Root").run().unwrap()
    }

    pub(crate) fn lex_err(source: &str) -> LexError {
        Lexer::new(0, source.as_bytes(), "Root").run().unwrap_err()
    }

    pub(crate) fn assert_token(lexeme: Lexeme<'_>, line: u16, column: u16, literal: &[u8]) {
        assert_eq!(lexeme.token.line, line, "line of {:?}", lexeme.literal_lossy());
        assert_eq!(lexeme.token.column, column, "column of {:?}", lexeme.literal_lossy());
        assert_eq!(lexeme.token.length as usize, literal.len());
        assert_eq!(lexeme.literal, literal);
    }

    #[test]
    fn test_basics() {
        let stack = lex("Hello\t\n\tworld()");
        let mut it = stack.iter();
        assert_token(it.bump().unwrap(), 1, 1, b"Hello");
        assert_token(it.bump().unwrap(), 2, 2, b"world");
        assert_token(it.bump().unwrap(), 2, 7, b"(");
        assert_token(it.bump().unwrap(), 2, 8, b")");
        assert!(it.bump().is_none());
    }

    #[test]
    fn test_compact_class_body() {
        let stack = lex("Item:item{x:100;y_01:0.5}");
        let literals: Vec<Vec<u8>> = stack.iter().map(|l| l.literal.to_vec()).collect();
        let expected: Vec<&[u8]> = vec![
            b"Item", b":", b"item", b"{", b"x", b":", b"100", b";", b"y_01", b":", b"0.5", b"}",
        ];
        assert_eq!(literals, expected);
    }

    #[test]
    fn test_file_index_is_tagged() {
        let stack = Lexer::new(42, b"x", "Root").run().unwrap();
        assert_eq!(stack.iter().next().unwrap().token.file, 42);
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(lex_err(""), LexError::Empty { .. }));
    }

    #[test]
    fn test_whitespace_only_file_lexes_to_nothing() {
        // Not empty on disk, just no significant bytes.
        let stack = lex("  \t\n ");
        assert_eq!(stack.count(), 0);
    }

    #[test]
    fn test_unrecognized_byte() {
        match lex_err("x @") {
            LexError::Unrecognized {
                byte,
                line,
                column,
                ..
            } => {
                assert_eq!(byte, b'@');
                assert_eq!((line, column), (1, 3));
            }
            other => panic!("expected Unrecognized, got {other:?}"),
        }
    }

    #[test]
    fn test_underscore_starts_a_name() {
        let stack = lex("_private _0");
        let mut it = stack.iter();
        assert_token(it.bump().unwrap(), 1, 1, b"_private");
        assert_token(it.bump().unwrap(), 1, 10, b"_0");
    }
}
