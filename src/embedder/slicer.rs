//! Mach-O architecture slice inspection and stripping.
//!
//! A framework's executable is either a thin Mach-O or a fat container
//! holding one slice per CPU architecture. This module reports the
//! architectures a binary carries and rewrites fat containers down to a
//! requested subset in place, so embedding never ships slices the build
//! target cannot use.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use goblin::Object;
use goblin::mach::load_command::CommandVariant;
use goblin::mach::{Mach, MachO, SingleArch, fat};
use goblin::mach::constants::cputype;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced while inspecting or rewriting a binary container.
#[derive(Error, Debug)]
pub enum SliceError {
    /// The file could not be read or is not a recognizable Mach-O binary.
    #[error("cannot inspect binary at {}: {reason}", path.display())]
    Inspection { path: PathBuf, reason: String },

    /// None of the requested architectures exist in the binary.
    #[error("binary at {} contains no slice for [{}]", path.display(), requested.join(", "))]
    NoMatchingSlices { path: PathBuf, requested: Vec<String> },

    /// The trimmed container could not be written back.
    #[error("failed to rewrite binary at {}: {reason}", path.display())]
    Rewrite { path: PathBuf, reason: String },
}

/// Result type alias for slice operations.
pub type Result<T> = std::result::Result<T, SliceError>;

fn inspection(path: &Path, reason: impl ToString) -> SliceError {
    SliceError::Inspection {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn no_matching_slices(path: &Path, requested: &BTreeSet<String>) -> SliceError {
    SliceError::NoMatchingSlices {
        path: path.to_path_buf(),
        requested: requested.iter().cloned().collect(),
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| inspection(path, e))
}

/// Symbolic name for a (cputype, cpusubtype) pair, e.g. `arm64` or `x86_64`.
fn arch_name(cputype_: u32, cpusubtype: u32) -> String {
    let subtype = cpusubtype & !cputype::CPU_SUBTYPE_MASK;
    cputype::get_arch_name_from_types(cputype_, subtype)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("unknown({cputype_},{subtype})"))
}

/// Returns the set of architectures contained in the binary at `path`.
///
/// Thin binaries report a single-element set; fat containers report one
/// entry per slice.
pub fn architectures(path: &Path) -> Result<BTreeSet<String>> {
    let buffer = read(path)?;
    match Object::parse(&buffer).map_err(|e| inspection(path, e))? {
        Object::Mach(Mach::Binary(macho)) => Ok(BTreeSet::from([arch_name(
            macho.header.cputype(),
            macho.header.cpusubtype(),
        )])),
        Object::Mach(Mach::Fat(multi)) => {
            let mut archs = BTreeSet::new();
            for arch in multi.iter_arches() {
                let arch = arch.map_err(|e| inspection(path, e))?;
                archs.insert(arch_name(arch.cputype, arch.cpusubtype));
            }
            Ok(archs)
        }
        _ => Err(inspection(path, "not a Mach-O binary")),
    }
}

/// Returns the `LC_UUID` of every Mach-O slice in the binary at `path`.
///
/// Slices without a UUID load command are skipped, as are non-Mach-O fat
/// members (static archives).
pub fn uuids(path: &Path) -> Result<Vec<Uuid>> {
    let buffer = read(path)?;
    match Object::parse(&buffer).map_err(|e| inspection(path, e))? {
        Object::Mach(Mach::Binary(macho)) => Ok(slice_uuid(&macho).into_iter().collect()),
        Object::Mach(Mach::Fat(multi)) => {
            let mut found = Vec::new();
            for index in 0..multi.narches {
                if let SingleArch::MachO(macho) =
                    multi.get(index).map_err(|e| inspection(path, e))?
                {
                    found.extend(slice_uuid(&macho));
                }
            }
            Ok(found)
        }
        _ => Err(inspection(path, "not a Mach-O binary")),
    }
}

fn slice_uuid(macho: &MachO<'_>) -> Option<Uuid> {
    macho.load_commands.iter().find_map(|lc| {
        if let CommandVariant::Uuid(ref cmd) = lc.command {
            Some(Uuid::from_bytes(cmd.uuid))
        } else {
            None
        }
    })
}

/// Rewrites the binary at `path` in place so only slices whose architecture
/// is in `keep` remain.
///
/// Binaries that already contain nothing but kept architectures are left
/// untouched. Fails when `keep` has no overlap with the actual slices.
pub fn strip(path: &Path, keep: &BTreeSet<String>) -> Result<()> {
    let buffer = read(path)?;
    let arches = match Object::parse(&buffer).map_err(|e| inspection(path, e))? {
        Object::Mach(Mach::Binary(macho)) => {
            let name = arch_name(macho.header.cputype(), macho.header.cpusubtype());
            if keep.contains(&name) {
                return Ok(());
            }
            return Err(no_matching_slices(path, keep));
        }
        Object::Mach(Mach::Fat(multi)) => {
            let mut arches = Vec::with_capacity(multi.narches);
            for arch in multi.iter_arches() {
                arches.push(arch.map_err(|e| inspection(path, e))?);
            }
            arches
        }
        _ => return Err(inspection(path, "not a Mach-O binary")),
    };

    let kept: Vec<&fat::FatArch> = arches
        .iter()
        .filter(|arch| keep.contains(&arch_name(arch.cputype, arch.cpusubtype)))
        .collect();
    if kept.is_empty() {
        return Err(no_matching_slices(path, keep));
    }
    if kept.len() == arches.len() {
        return Ok(());
    }

    let trimmed = build_fat(path, &buffer, &kept)?;
    std::fs::write(path, trimmed).map_err(|e| SliceError::Rewrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Assembles a fat container holding the `kept` slices copied verbatim out
/// of `buffer`, each at its original alignment.
fn build_fat(path: &Path, buffer: &[u8], kept: &[&fat::FatArch]) -> Result<Vec<u8>> {
    let header_len = fat::SIZEOF_FAT_HEADER + kept.len() * fat::SIZEOF_FAT_ARCH;
    let mut offsets = Vec::with_capacity(kept.len());
    let mut cursor = header_len as u64;
    for arch in kept {
        let align = 1u64 << arch.align.min(31);
        cursor = cursor.next_multiple_of(align);
        offsets.push(cursor);
        cursor += u64::from(arch.size);
    }
    if cursor > u64::from(u32::MAX) {
        return Err(SliceError::Rewrite {
            path: path.to_path_buf(),
            reason: "container exceeds 32-bit fat offsets".into(),
        });
    }

    let mut out = Vec::with_capacity(cursor as usize);
    out.extend_from_slice(&fat::FAT_MAGIC.to_be_bytes());
    out.extend_from_slice(&(kept.len() as u32).to_be_bytes());
    for (arch, offset) in kept.iter().zip(&offsets) {
        for word in [arch.cputype, arch.cpusubtype, *offset as u32, arch.size, arch.align] {
            out.extend_from_slice(&word.to_be_bytes());
        }
    }
    for (arch, offset) in kept.iter().zip(&offsets) {
        let start = arch.offset as usize;
        let end = start + arch.size as usize;
        let slice = buffer
            .get(start..end)
            .ok_or_else(|| inspection(path, "slice range outside container"))?;
        out.resize(*offset as usize, 0);
        out.extend_from_slice(slice);
    }
    Ok(out)
}
