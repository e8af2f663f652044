//! Framework embedding for Xcode script build phases.
//!
//! Copies precompiled `.framework` bundles into the build product, strips
//! the copied Mach-O binaries down to the valid architecture set, and keeps
//! the `.dSYM` and `.bcsymbolmap` sidecars in sync.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod embedder;
pub mod error;

// Re-export commonly used types
pub use embedder::{BuildAction, BuildContext, Bundle, BundlePair, Embedder};
pub use error::{CliError, Result, XcembedError};
