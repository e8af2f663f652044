//! The embed pipeline: bundle validation, architecture inspection and
//! stripping, and sidecar synchronization.

mod bundle;
mod context;
mod error;
mod fs;
mod orchestrator;
pub mod slicer;

#[cfg(test)]
pub(crate) mod testutil;

pub use bundle::Bundle;
pub use context::{BuildAction, BuildContext, BundlePair, EnvError};
pub use error::{Error, ErrorExt, Result};
pub use orchestrator::Embedder;
pub use slicer::SliceError;
