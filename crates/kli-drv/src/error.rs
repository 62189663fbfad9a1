//! Pipeline error type.

use kli_flow::FlowError;
use kli_lex::LexError;
use kli_par::ParseError;
use kli_reg::RegistryError;
use thiserror::Error;

/// Fatal pipeline failure.
///
/// Any task failure is captured in its notification and converted into
/// one of these on the orchestrator thread, aborting the run. Partial
/// results are discarded.
#[derive(Debug, Error)]
pub enum InterpreterError {
    /// A file enqueued for lexing could not be opened.
    #[error("cannot load file '{path}': {source}")]
    CannotOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A file's bytes could not be read on the worker.
    #[error("cannot read file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Flow(#[from] FlowError),
}
