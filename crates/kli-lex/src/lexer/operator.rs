//! Operator, punctuation and comment handling.

use crate::error::LexError;
use crate::lexer::Lexer;

impl<'a> Lexer<'a> {
    /// Dispatches a byte that starts neither a name, number nor literal.
    pub(crate) fn lex_special(&mut self, byte: u8) -> Result<(), LexError> {
        match byte {
            // Single-character punctuation.
            b'(' | b')' | b'{' | b'}' | b'[' | b']' | b'?' | b':' | b',' | b';' | b'.'
            | b'~' => self.lex_single(),
            // Optionally composed with '='.
            b'=' | b'<' | b'>' | b'!' | b'*' | b'%' | b'^' => self.lex_composed_eq(),
            // Doubled, or composed with '='.
            b'|' | b'&' | b'+' | b'-' => self.lex_doubled_or_eq(byte),
            b'/' => self.lex_slash(),
            _ => Err(LexError::Unrecognized {
                byte,
                line: self.cursor.line(),
                column: self.cursor.column(),
                context: self.context.to_string(),
            }),
        }
    }

    fn lex_single(&mut self) -> Result<(), LexError> {
        let (start, line, column) = self.mark();
        self.cursor.advance();
        let literal = self.cursor.slice_from(start);
        self.emit(line, column, literal)
    }

    /// `=`, `<`, `>`, `!`, `*`, `%`, `^` and their `=`-composed forms.
    fn lex_composed_eq(&mut self) -> Result<(), LexError> {
        let (start, line, column) = self.mark();
        self.cursor.advance();
        self.cursor.match_byte(b'=');
        let literal = self.cursor.slice_from(start);
        self.emit(line, column, literal)
    }

    /// `|`/`&`/`+`/`-` and their doubled or `=`-composed forms.
    fn lex_doubled_or_eq(&mut self, byte: u8) -> Result<(), LexError> {
        let (start, line, column) = self.mark();
        self.cursor.advance();
        if !self.cursor.match_byte(byte) {
            self.cursor.match_byte(b'=');
        }
        let literal = self.cursor.slice_from(start);
        self.emit(line, column, literal)
    }

    /// `/` is division, division-assign, or the start of a comment.
    fn lex_slash(&mut self) -> Result<(), LexError> {
        match self.cursor.peek(1) {
            Some(b'/') => {
                self.skip_line_comment();
                Ok(())
            }
            Some(b'*') => self.skip_block_comment(),
            _ => self.lex_composed_eq(),
        }
    }

    /// Skips through the next newline, which stays for line tracking.
    fn skip_line_comment(&mut self) {
        while let Some(byte) = self.cursor.current() {
            if byte == b'\n' {
                break;
            }
            self.cursor.advance();
        }
    }

    /// Skips a `/* */` comment. The first `*/` closes: nesting is not
    /// supported.
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let (_, line, column) = self.mark();
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.current() {
                None => return Err(self.unterminated("block comment", line, column)),
                Some(b'*') if self.cursor.peek(1) == Some(b'/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    return Ok(());
                }
                Some(_) => self.cursor.advance(),
            }
        }
    }
}
