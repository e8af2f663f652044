//! Error types for the embed pipeline.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::slicer::SliceError;

/// Result type alias for embed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while embedding framework bundles.
#[derive(Error, Debug)]
pub enum Error {
    /// A bundle path does not carry the `.framework` extension.
    #[error("file doesn't have a .framework extension: {}", path.display())]
    InvalidExtension { path: PathBuf },

    /// An input bundle is missing on disk.
    #[error("file not found at path: {}", path.display())]
    NotFound { path: PathBuf },

    /// Slice inspection or stripping failed.
    #[error(transparent)]
    Slice(#[from] SliceError),

    /// A filesystem operation failed.
    #[error("{message}: {}: {source}", path.display())]
    Fs {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Attaches the offending path to raw IO errors.
pub trait ErrorExt<T> {
    fn fs_context(self, message: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for io::Result<T> {
    fn fs_context(self, message: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            message: message.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}
