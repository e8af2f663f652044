//! Command line interface for xcembed.
//!
//! Resolves the build context from the script environment and hands it to
//! the embed pipeline.

mod args;

pub use args::Args;

use crate::embedder::{BuildContext, Embedder};
use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let context = BuildContext::from_env()?;
    Embedder::new(args.all_configs, args.configs, context)
        .execute()
        .await?;
    Ok(0)
}
