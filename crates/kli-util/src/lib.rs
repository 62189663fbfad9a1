//! kli-util - Source model shared by the kube interpreter pipeline.
//!
//! This crate holds the types every phase of the pipeline speaks:
//!
//! - Index aliases ([`FileIndex`], [`DirectoryIndex`], [`LineIndex`],
//!   [`ColumnIndex`]) used as stable handles by the registry and as packed
//!   header fields by the token stream.
//! - [`Token`], the fixed 8-byte record locating a lexeme in its source
//!   file.
//! - [`TokenStack`], the packed append-only sequence of
//!   `(header, literal bytes)` records produced by the lexer and consumed
//!   by the parser, together with its [`TokenCursor`] iterator.
//!
//! The stack is write-only while a file is being lexed and read-only
//! afterwards; literal bytes live inline right after their header so a
//! whole file's token stream is one contiguous buffer.

pub mod index;
pub mod stack;
pub mod token;

pub use index::{ColumnIndex, DirectoryIndex, FileIndex, LineIndex};
pub use stack::{Lexeme, TokenCursor, TokenStack};
pub use token::Token;
