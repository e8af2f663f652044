//! Framework and debug-symbol bundle model.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::slicer::{self, Result, SliceError};

/// A directory-based bundle (`.framework` or `.framework.dSYM`) holding a
/// primary Mach-O executable.
#[derive(Clone, Debug)]
pub struct Bundle {
    path: PathBuf,
}

impl Bundle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the bundle's primary executable.
    ///
    /// `Foo.framework` keeps its binary at `Foo.framework/Foo`; a dSYM keeps
    /// the DWARF companion at `Contents/Resources/DWARF/Foo`.
    pub fn binary_path(&self) -> Result<PathBuf> {
        let stem = self.path.file_stem().ok_or_else(|| SliceError::Inspection {
            path: self.path.clone(),
            reason: "bundle path has no name".into(),
        })?;
        if self.path.extension().is_some_and(|ext| ext == "dSYM") {
            let name = Path::new(stem).file_stem().unwrap_or(stem);
            Ok(self.path.join("Contents/Resources/DWARF").join(name))
        } else {
            Ok(self.path.join(stem))
        }
    }

    /// Architectures carried by the bundle's executable.
    pub fn architectures(&self) -> Result<BTreeSet<String>> {
        slicer::architectures(&self.binary_path()?)
    }

    /// Strips the bundle's executable in place, keeping only `keep`.
    pub fn strip(&self, keep: &BTreeSet<String>) -> Result<()> {
        slicer::strip(&self.binary_path()?, keep)
    }

    /// Bitcode symbol maps associated with this bundle.
    ///
    /// Each slice's `LC_UUID` names an `<UUID>.bcsymbolmap` companion file
    /// next to the bundle; only maps that exist on disk are returned.
    pub fn bc_symbol_maps(&self) -> Result<Vec<PathBuf>> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut maps = Vec::new();
        for uuid in slicer::uuids(&self.binary_path()?)? {
            let candidate = dir.join(format!("{}.bcsymbolmap", hyphenated_upper(&uuid)));
            if candidate.exists() {
                maps.push(candidate);
            }
        }
        Ok(maps)
    }
}

fn hyphenated_upper(uuid: &Uuid) -> String {
    uuid.hyphenated().to_string().to_uppercase()
}
