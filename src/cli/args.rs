//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with proper
//! validation and error handling.

use clap::Parser;

/// Xcode build-phase framework embedder
#[derive(Parser, Debug)]
#[command(
    name = "xcembed",
    version,
    about = "Embeds framework bundles into the build product, stripped to the valid architectures",
    long_about = "Copies each framework listed in the build phase's input files to its output \
file location, strips the copied binary (and its .dSYM companion) down to the architectures \
in VALID_ARCHS, and collects .bcsymbolmap files into BUILT_PRODUCTS_DIR on install actions.

Reads the script environment Xcode provides: CONFIGURATION, ACTION, VALID_ARCHS,
BUILT_PRODUCTS_DIR and the SCRIPT_INPUT_FILE_* / SCRIPT_OUTPUT_FILE_* lists.

Usage:
  xcembed
  xcembed --configs Debug,Release,Staging
  xcembed --all-configs"
)]
pub struct Args {
    /// Embed frameworks for every build configuration
    #[arg(long, env = "XCEMBED_ALL_CONFIGS")]
    pub all_configs: bool,

    /// Configurations that embed frameworks; other configurations warn
    #[arg(
        short,
        long,
        value_name = "NAME",
        value_delimiter = ',',
        default_values = ["Debug", "Release"]
    )]
    pub configs: Vec<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.configs.is_empty() && !self.all_configs {
            return Err(
                "At least one configuration is required unless --all-configs is set".to_string(),
            );
        }
        Ok(())
    }
}
