//! kli-par - Parser for kube token stacks.
//!
//! The parser is literal-driven recursive descent: the packed stack
//! carries no token kinds, so productions dispatch on the literal bytes
//! themselves (`import`, `function`, `{`, ...). Declarations build the
//! tagged [`Node`](ast::Node) tree directly; operations inside
//! statements are first scanned into a flat atom list and then folded by
//! precedence climbing in the expression module.
//!
//! `Parser::new(&stack, context).run()` yields the file's single root
//! class plus its import literals, or the first [`ParseError`].

pub mod ast;
pub mod error;
mod expr;
mod items;
mod stmt;

pub use ast::{
    precedence, visit, Associativity, ConstantKind, Node, NodeData, NodeKind, OperatorKind,
    StatementKind,
};
pub use error::ParseError;

use kli_util::{Lexeme, TokenCursor, TokenStack};

/// Result of parsing one file.
#[derive(Debug)]
pub struct ParseOutcome {
    /// The root class declaration.
    pub root: Node,

    /// Import directive paths, unquoted, in declaration order.
    pub imports: Vec<String>,
}

/// Recursive-descent parser over one read-only token stack.
pub struct Parser<'a> {
    it: TokenCursor<'a>,
    context: &'a str,
    imports: Vec<String>,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `stack`; `context` labels diagnostics.
    pub fn new(stack: &'a TokenStack, context: &'a str) -> Self {
        Self {
            it: stack.iter(),
            context,
            imports: Vec::new(),
        }
    }

    /// Parses the file: imports first, then exactly one class.
    pub fn run(mut self) -> Result<ParseOutcome, ParseError> {
        let mut root: Option<Node> = None;
        while let Some(lexeme) = self.it.peek() {
            if root.is_none() && lexeme.literal == b"import" {
                self.parse_import()?;
            } else if root.is_none() && is_name(lexeme.literal) {
                root = Some(self.parse_class()?);
            } else {
                return Err(ParseError::unexpected_token(
                    "file scope",
                    self.context,
                    lexeme,
                ));
            }
        }
        match root {
            Some(root) => Ok(ParseOutcome {
                root,
                imports: self.imports,
            }),
            None => Err(ParseError::MissingClass {
                context: self.context.to_string(),
            }),
        }
    }

    /// Next lexeme, or `UnexpectedEndOfFile` anchored at `anchor`.
    pub(crate) fn peek_or_eof(
        &self,
        production: &'static str,
        anchor: Lexeme<'_>,
    ) -> Result<Lexeme<'a>, ParseError> {
        self.it
            .peek()
            .ok_or_else(|| ParseError::unexpected_eof(production, self.context, anchor))
    }

    /// Consumes the next lexeme, which must be exactly `expected`.
    pub(crate) fn expect(
        &mut self,
        production: &'static str,
        anchor: Lexeme<'_>,
        expected: &[u8],
    ) -> Result<(), ParseError> {
        let lexeme = self.peek_or_eof(production, anchor)?;
        if lexeme.literal != expected {
            return Err(ParseError::unexpected_token(
                production,
                self.context,
                lexeme,
            ));
        }
        self.it.bump();
        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_name(bytes: &[u8]) -> bool {
    let Some(first) = bytes.first() else {
        return false;
    };
    (first.is_ascii_alphabetic() || *first == b'_')
        && bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}

/// A quote-delimited literal, as stored by the lexer.
pub(crate) fn is_string_literal(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes.first() == Some(&b'"') && bytes.last() == Some(&b'"')
}
