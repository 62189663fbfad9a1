//! kli-lex - Lexical analyzer for `.kl` sources.
//!
//! The lexer is a single forward pass over raw bytes. For every peeked
//! byte it dispatches to a regular handler (names, numbers) or a special
//! handler (strings, characters, operators, comments) and appends the
//! captured lexeme to a packed [`TokenStack`](kli_util::TokenStack) with
//! its one-based line/column location. Whitespace and comments produce no
//! tokens; everything else either becomes a record or aborts the file
//! with a [`LexError`].
//!
//! Source text is treated as 8-bit bytes throughout; there is no decoding
//! step, which keeps multi-byte UTF-8 content flowing through string
//! literals untouched.

pub mod cursor;
#[cfg(test)]
mod edge_cases;
pub mod error;
mod lexer;

pub use cursor::Cursor;
pub use error::LexError;
pub use lexer::Lexer;
