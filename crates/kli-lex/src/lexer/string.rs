//! String and character literal lexing.

use kli_util::{ColumnIndex, LineIndex};

use crate::error::LexError;
use crate::lexer::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a `"`-enclosed string literal.
    ///
    /// Escapes are cooked in place; the stored literal keeps the two
    /// quotes as its first and last bytes so downstream can tell a
    /// literal from an identifier by its leading byte. An unknown escape
    /// stores the backslash and the following byte verbatim. Raw
    /// embedded newlines are accepted.
    pub(crate) fn lex_string(&mut self) -> Result<(), LexError> {
        let (_, line, column) = self.mark();
        self.cursor.advance();

        let mut cooked = std::mem::take(&mut self.scratch);
        cooked.clear();
        cooked.push(b'"');
        loop {
            match self.cursor.bump() {
                None => return Err(self.unterminated("string literal", line, column)),
                Some(b'"') => break,
                Some(b'\\') => match self.cursor.bump() {
                    None => return Err(self.unterminated("string literal", line, column)),
                    Some(escape) => match cook_escape(escape) {
                        Some(byte) => cooked.push(byte),
                        None => {
                            cooked.push(b'\\');
                            cooked.push(escape);
                        }
                    },
                },
                Some(byte) => cooked.push(byte),
            }
        }
        cooked.push(b'"');

        self.emit(line, column, &cooked)?;
        self.scratch = cooked;
        Ok(())
    }

    /// Lexes a `'`-enclosed character literal.
    ///
    /// Either one raw byte or one escape, then the closing quote. The
    /// emitted token is the single cooked byte, located at the content.
    pub(crate) fn lex_character(&mut self) -> Result<(), LexError> {
        let (_, opener_line, opener_column) = self.mark();
        self.cursor.advance();

        let (_, line, column) = self.mark();
        let byte = match self.cursor.bump() {
            None => return Err(self.unterminated("character literal", opener_line, opener_column)),
            Some(b'\\') => match self.cursor.bump() {
                None => {
                    return Err(self.unterminated("character literal", opener_line, opener_column))
                }
                Some(escape) => cook_escape(escape).unwrap_or(escape),
            },
            Some(byte) => byte,
        };
        if !self.cursor.match_byte(b'\'') {
            return Err(self.unterminated("character literal", opener_line, opener_column));
        }
        self.emit(line, column, &[byte])
    }

    pub(crate) fn unterminated(
        &self,
        what: &'static str,
        line: LineIndex,
        column: ColumnIndex,
    ) -> LexError {
        LexError::Unterminated {
            what,
            line,
            column,
            context: self.context.to_string(),
        }
    }
}

/// Cooked byte for a known escape character, `None` otherwise.
fn cook_escape(escape: u8) -> Option<u8> {
    match escape {
        b'\\' => Some(b'\\'),
        b'"' => Some(b'"'),
        b'\'' => Some(b'\''),
        b't' => Some(b'\t'),
        b'n' => Some(b'\n'),
        b'v' => Some(0x0b),
        b'f' => Some(0x0c),
        b'r' => Some(b'\r'),
        b'0' => Some(0),
        _ => None,
    }
}
