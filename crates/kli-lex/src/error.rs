//! Lexical error type.

use kli_util::{ColumnIndex, LineIndex};
use thiserror::Error;

/// Fatal error raised while lexing one file.
///
/// Every variant carries the file's context name and, where a location
/// exists, the one-based line/column of the offending or opening byte.
/// A lex error discards the partial token stack for that file.
#[derive(Debug, Error)]
pub enum LexError {
    /// The file had zero bytes.
    #[error("file '{context}' is empty")]
    Empty {
        /// Human-readable file label.
        context: String,
    },

    /// No lexical rule matched the byte.
    #[error("unrecognized character 0x{byte:02x} (line {line} column {column}) in file '{context}'")]
    Unrecognized {
        /// The offending raw byte.
        byte: u8,
        line: LineIndex,
        column: ColumnIndex,
        context: String,
    },

    /// A string literal, character literal or block comment reached end
    /// of input before its closer. The location is the opener's.
    #[error("unterminated {what} (line {line} column {column}) in file '{context}'")]
    Unterminated {
        /// What was left open: `"string literal"`, `"character literal"`
        /// or `"block comment"`.
        what: &'static str,
        line: LineIndex,
        column: ColumnIndex,
        context: String,
    },

    /// A literal exceeded the packed 16-bit length field.
    #[error("literal longer than 65535 bytes (line {line} column {column}) in file '{context}'")]
    Overlong {
        line: LineIndex,
        column: ColumnIndex,
        context: String,
    },
}
