//! Errors raised by site tooling.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for site tooling.
pub type SiteResult<T> = Result<T, SiteError>;

/// Failures while writing manifests.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The manifest file could not be written.
    #[error("failed to write manifest {}: {source}", path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
