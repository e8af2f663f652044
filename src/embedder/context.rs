//! Build context discovered from the Xcode script environment.
//!
//! Script build phases receive their inputs as environment variables:
//! `CONFIGURATION`, `ACTION`, `VALID_ARCHS`, `BUILT_PRODUCTS_DIR`, and the
//! indexed `SCRIPT_INPUT_FILE_*` / `SCRIPT_OUTPUT_FILE_*` lists. The context
//! is materialized once per invocation and never mutated afterwards.

use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// One framework to embed: where the build phase says it is and where the
/// product expects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundlePair {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Build action the build system is performing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildAction {
    /// Archive/install builds, which also collect bitcode symbol maps.
    Install,
    /// Any other action (`build`, `clean`, ...).
    Other,
}

impl BuildAction {
    pub fn from_name(name: &str) -> Self {
        if name == "install" {
            Self::Install
        } else {
            Self::Other
        }
    }
}

/// Errors raised while reading the script environment.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("missing environment variable: {name}")]
    Missing { name: String },

    #[error("invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

/// Immutable inputs for one embed invocation.
#[derive(Clone, Debug)]
pub struct BuildContext {
    pub configuration: String,
    pub action: BuildAction,
    pub valid_architectures: BTreeSet<String>,
    pub built_products_dir: PathBuf,
    pub bundle_pairs: Vec<BundlePair>,
}

impl BuildContext {
    /// Reads the context from the process environment.
    pub fn from_env() -> Result<Self, EnvError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the context from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EnvError> {
        let configuration = required(&lookup, "CONFIGURATION")?;
        let action = BuildAction::from_name(&required(&lookup, "ACTION")?);
        let valid_architectures = required(&lookup, "VALID_ARCHS")?
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        let built_products_dir = PathBuf::from(required(&lookup, "BUILT_PRODUCTS_DIR")?);

        let raw_count = required(&lookup, "SCRIPT_INPUT_FILE_COUNT")?;
        let count: usize = raw_count.parse().map_err(|_| EnvError::Invalid {
            name: "SCRIPT_INPUT_FILE_COUNT".into(),
            value: raw_count.clone(),
        })?;

        let mut bundle_pairs = Vec::with_capacity(count);
        for index in 0..count {
            let input = required(&lookup, &format!("SCRIPT_INPUT_FILE_{index}"))?;
            let output = required(&lookup, &format!("SCRIPT_OUTPUT_FILE_{index}"))?;
            bundle_pairs.push(BundlePair {
                input: input.into(),
                output: output.into(),
            });
        }

        Ok(Self {
            configuration,
            action,
            valid_architectures,
            built_products_dir,
            bundle_pairs,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, EnvError> {
    lookup(name).ok_or_else(|| EnvError::Missing {
        name: name.to_string(),
    })
}
