//! Registry error type.

use thiserror::Error;

/// Error raised while discovering directories or files.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A file lookup found no matching `.kl` entry.
    #[error("file not discoverable '{0}'")]
    NotFound(String),

    /// A path expected to name a directory does not.
    #[error("directory not found '{0}'")]
    NotADirectory(String),

    /// The directory could not be enumerated.
    #[error("cannot read directory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The 32-bit directory handle space is exhausted.
    #[error("too many directories registered")]
    TooManyDirectories,

    /// The 16-bit file handle space is exhausted.
    #[error("too many files registered")]
    TooManyFiles,
}
