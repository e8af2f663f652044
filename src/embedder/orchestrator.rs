//! Embed workflow for framework bundle pairs.
//!
//! Drives the copy/strip/sidecar pipeline: validate each pair, copy the
//! framework into the build product, strip the copy to the valid
//! architecture set, mirror the operation onto the `.dSYM` companion, and
//! collect bitcode symbol maps on install actions.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::Bundle;
use super::context::{BuildAction, BuildContext, BundlePair};
use super::error::{Error, Result};
use super::fs;

/// Embeds every bundle pair of a build context into the build product.
pub struct Embedder {
    all_configurations: bool,
    configurations: Vec<String>,
    context: BuildContext,
}

impl Embedder {
    /// Creates an embedder for `context`.
    ///
    /// `configurations` lists the build configurations that embed
    /// frameworks; `all_configurations` bypasses the list entirely.
    pub fn new(all_configurations: bool, configurations: Vec<String>, context: BuildContext) -> Self {
        Self {
            all_configurations,
            configurations,
            context,
        }
    }

    /// Embeds every bundle pair in order. The first failure aborts the run;
    /// no partially processed pair is retried.
    pub async fn execute(&self) -> Result<()> {
        if !self.configurations.contains(&self.context.configuration) && !self.all_configurations {
            // Warns without skipping: unknown configurations still embed.
            log::warn!(
                "not embedding frameworks because the {} configuration is being built",
                self.context.configuration
            );
        }
        for pair in &self.context.bundle_pairs {
            self.embed(pair).await?;
        }
        Ok(())
    }

    async fn embed(&self, pair: &BundlePair) -> Result<()> {
        validate_extension(&pair.input)?;
        validate_extension(&pair.output)?;
        if !pair.input.exists() {
            return Err(Error::NotFound {
                path: pair.input.clone(),
            });
        }

        let input = Bundle::new(&pair.input);
        let architectures = input.architectures()?;
        if architectures.is_disjoint(&self.context.valid_architectures) {
            log::warn!(
                "ignoring {} because it does not support the current architectures",
                display_name(&pair.input)
            );
        }

        self.embed_bundle(&pair.input, &pair.output).await?;

        let input_dsym = dsym_companion(&pair.input);
        let output_dsym = sibling_path(&pair.output, &input_dsym)?;
        self.embed_bundle(&input_dsym, &output_dsym).await?;

        if self.context.action == BuildAction::Install {
            self.embed_symbol_maps(&input).await?;
        }
        Ok(())
    }

    /// Ensure-parent, delete-if-present, copy, then strip to the valid set.
    async fn embed_bundle(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::remove_item(to).await?;
        fs::copy_dir(from, to).await?;
        Bundle::new(to).strip(&self.context.valid_architectures)?;
        Ok(())
    }

    /// Copies each discovered symbol map flat into the build products
    /// directory; symbol maps are plain text and are never stripped.
    async fn embed_symbol_maps(&self, input: &Bundle) -> Result<()> {
        for map in input.bc_symbol_maps()? {
            let Some(name) = map.file_name() else { continue };
            let destination = self.context.built_products_dir.join(name);
            fs::copy_file(&map, &destination).await?;
        }
        Ok(())
    }
}

fn validate_extension(path: &Path) -> Result<()> {
    if path.extension().is_some_and(|ext| ext == "framework") {
        Ok(())
    } else {
        Err(Error::InvalidExtension {
            path: path.to_path_buf(),
        })
    }
}

/// `Foo.framework` -> `Foo.framework.dSYM`, appended to the path's string
/// form.
fn dsym_companion(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".dSYM");
    PathBuf::from(name)
}

/// Relocates `sidecar`'s file name next to `bundle_output`.
fn sibling_path(bundle_output: &Path, sidecar: &Path) -> Result<PathBuf> {
    let name = sidecar.file_name().ok_or_else(|| Error::NotFound {
        path: sidecar.to_path_buf(),
    })?;
    let parent = bundle_output.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(name))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
