//! Parse error type.

use kli_util::{ColumnIndex, Lexeme, LineIndex};
use thiserror::Error;

/// Fatal error raised while parsing one file's token stack.
///
/// Diagnostics carry the production being parsed, the offending (or
/// anchoring) symbol and its location rendered as
/// `At symbol '<literal>' from <context>:l<line>:c<column>`.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The stack ran out inside a production. The location is the
    /// production's anchoring token.
    #[error("unexpected end of file in {production}\nAt symbol '{symbol}' from {context}:l{line}:c{column}")]
    UnexpectedEndOfFile {
        production: &'static str,
        symbol: String,
        context: String,
        line: LineIndex,
        column: ColumnIndex,
    },

    /// A token that no alternative of the production accepts.
    #[error("unexpected token in {production}\nAt symbol '{symbol}' from {context}:l{line}:c{column}")]
    UnexpectedToken {
        production: &'static str,
        symbol: String,
        context: String,
        line: LineIndex,
        column: ColumnIndex,
    },

    /// A `)` without a matching `(`, or an operation that ended with
    /// parentheses still open.
    #[error("unbalanced parentheses in operation\nAt symbol '{symbol}' from {context}:l{line}:c{column}")]
    UnbalancedParens {
        symbol: String,
        context: String,
        line: LineIndex,
        column: ColumnIndex,
    },

    /// An operator with no operand to bind. The location is the last
    /// operator seen.
    #[error("missing operand in operation\nAt symbol '{symbol}' from {context}:l{line}:c{column}")]
    MissingOperand {
        symbol: String,
        context: String,
        line: LineIndex,
        column: ColumnIndex,
    },

    /// The file held imports at most, but no class declaration.
    #[error("no class declaration in file '{context}'")]
    MissingClass { context: String },
}

impl ParseError {
    pub(crate) fn unexpected_eof(
        production: &'static str,
        context: &str,
        at: Lexeme<'_>,
    ) -> Self {
        Self::UnexpectedEndOfFile {
            production,
            symbol: at.literal_lossy().into_owned(),
            context: context.to_string(),
            line: at.token.line,
            column: at.token.column,
        }
    }

    pub(crate) fn unexpected_token(
        production: &'static str,
        context: &str,
        at: Lexeme<'_>,
    ) -> Self {
        Self::UnexpectedToken {
            production,
            symbol: at.literal_lossy().into_owned(),
            context: context.to_string(),
            line: at.token.line,
            column: at.token.column,
        }
    }

    pub(crate) fn unbalanced(context: &str, at: Lexeme<'_>) -> Self {
        Self::UnbalancedParens {
            symbol: at.literal_lossy().into_owned(),
            context: context.to_string(),
            line: at.token.line,
            column: at.token.column,
        }
    }

    pub(crate) fn missing_operand(context: &str, at: Lexeme<'_>) -> Self {
        Self::MissingOperand {
            symbol: at.literal_lossy().into_owned(),
            context: context.to_string(),
            line: at.token.line,
            column: at.token.column,
        }
    }
}
