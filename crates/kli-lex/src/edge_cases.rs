//! Edge case tests for kli-lex.

use proptest::prelude::*;

use crate::{LexError, Lexer};

fn literals(source: &str) -> Vec<Vec<u8>> {
    Lexer::new(0, source.as_bytes(), "edge")
        .run()
        .unwrap()
        .iter()
        .map(|l| l.literal.to_vec())
        .collect()
}

#[test]
fn test_long_identifier() {
    let name = "a".repeat(10_000);
    assert_eq!(literals(&name), vec![name.into_bytes()]);
}

#[test]
fn test_overlong_string_literal_is_rejected() {
    let source = format!("\"{}\"", "x".repeat(70_000));
    let err = Lexer::new(0, source.as_bytes(), "edge").run().unwrap_err();
    assert!(matches!(err, LexError::Overlong { .. }));
}

#[test]
fn test_crlf_sources_track_lines() {
    let stack = Lexer::new(0, b"a\r\nb", "edge").run().unwrap();
    let mut it = stack.iter();
    assert_eq!(it.bump().unwrap().token.line, 1);
    assert_eq!(it.bump().unwrap().token.line, 2);
}

#[test]
fn test_token_at_the_very_last_byte() {
    let stack = Lexer::new(0, b"x:1", "edge").run().unwrap();
    assert_eq!(stack.count(), 3);
}

proptest! {
    /// Concatenating the emitted literals reconstitutes every
    /// significant byte of the input, in order.
    #[test]
    fn prop_significant_bytes_reconstitute(
        atoms in proptest::collection::vec(
            "[a-z_][a-z0-9_]{0,8}|[0-9]{1,5}|[(){};,~]",
            1..40,
        )
    ) {
        let source = atoms.join(" ");
        let stack = Lexer::new(0, source.as_bytes(), "prop").run().unwrap();
        let mut rebuilt = Vec::new();
        for lexeme in stack.iter() {
            rebuilt.extend_from_slice(lexeme.literal);
        }
        let significant: Vec<u8> =
            source.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
        prop_assert_eq!(rebuilt, significant);
    }

    /// Every token's (line, column) points at the first byte of its
    /// literal in the source.
    #[test]
    fn prop_locations_point_at_first_literal_byte(
        atoms in proptest::collection::vec(
            "[a-z_][a-z0-9_]{0,8}|[0-9]{1,5}|[(){};,~]",
            1..40,
        ),
        newline_every in 1usize..6,
    ) {
        let source: String = atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| {
                let sep = if i == 0 {
                    ""
                } else if i % newline_every == 0 {
                    "\n"
                } else {
                    " "
                };
                format!("{sep}{atom}")
            })
            .collect();
        let lines: Vec<&str> = source.split('\n').collect();
        let stack = Lexer::new(0, source.as_bytes(), "prop").run().unwrap();
        for lexeme in stack.iter() {
            let line = lines[lexeme.token.line as usize - 1].as_bytes();
            let byte = line[lexeme.token.column as usize - 1];
            prop_assert_eq!(byte, lexeme.literal[0]);
        }
    }
}
