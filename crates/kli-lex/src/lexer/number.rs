//! Numeric literal lexing.

use crate::error::LexError;
use crate::lexer::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a numeric literal.
    ///
    /// One or more digits with at most one embedded `.`; a second dot is
    /// not part of the token. The character right after the digits
    /// decides the suffix: `s` or `d` alone, `ul`, `ll` or `ld` as a
    /// pair. Anything else is left for the next token.
    pub(crate) fn lex_number(&mut self) -> Result<(), LexError> {
        let (start, line, column) = self.mark();

        self.eat_digits();
        if self.cursor.current() == Some(b'.') {
            self.cursor.advance();
            self.eat_digits();
        }

        match self.cursor.current() {
            Some(b's') | Some(b'd') => self.cursor.advance(),
            Some(b'u') if self.cursor.peek(1) == Some(b'l') => {
                self.cursor.advance();
                self.cursor.advance();
            }
            Some(b'l') if matches!(self.cursor.peek(1), Some(b'l') | Some(b'd')) => {
                self.cursor.advance();
                self.cursor.advance();
            }
            _ => {}
        }

        let literal = self.cursor.slice_from(start);
        self.emit(line, column, literal)
    }

    fn eat_digits(&mut self) {
        while matches!(self.cursor.current(), Some(b) if b.is_ascii_digit()) {
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tests::{assert_token, lex};

    #[test]
    fn test_integers_and_floats() {
        let stack = lex("100 0.5 42.24");
        let mut it = stack.iter();
        assert_token(it.bump().unwrap(), 1, 1, b"100");
        assert_token(it.bump().unwrap(), 1, 5, b"0.5");
        assert_token(it.bump().unwrap(), 1, 9, b"42.24");
    }

    #[test]
    fn test_one_char_suffixes() {
        let stack = lex("1s 2d 3.5d");
        let literals: Vec<Vec<u8>> = stack.iter().map(|l| l.literal.to_vec()).collect();
        let expected: Vec<&[u8]> = vec![b"1s", b"2d", b"3.5d"];
        assert_eq!(literals, expected);
    }

    #[test]
    fn test_two_char_suffixes() {
        let stack = lex("1ul 2ll 3ld");
        let literals: Vec<Vec<u8>> = stack.iter().map(|l| l.literal.to_vec()).collect();
        let expected: Vec<&[u8]> = vec![b"1ul", b"2ll", b"3ld"];
        assert_eq!(literals, expected);
    }

    #[test]
    fn test_non_suffix_follow_up_starts_a_name() {
        // 'u' not followed by 'l' is not a suffix.
        let stack = lex("1up");
        let mut it = stack.iter();
        assert_token(it.bump().unwrap(), 1, 1, b"1");
        assert_token(it.bump().unwrap(), 1, 2, b"up");
    }

    #[test]
    fn test_second_dot_ends_the_token() {
        let stack = lex("1.2.3");
        let mut it = stack.iter();
        assert_token(it.bump().unwrap(), 1, 1, b"1.2");
        assert_token(it.bump().unwrap(), 1, 4, b".");
        assert_token(it.bump().unwrap(), 1, 5, b"3");
    }

    #[test]
    fn test_trailing_dot_is_kept() {
        let stack = lex("1. ");
        assert_token(stack.iter().next().unwrap(), 1, 1, b"1.");
    }
}
