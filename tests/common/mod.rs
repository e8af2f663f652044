//! Shared fixtures: synthetic framework bundles wrapping minimal Mach-O
//! fat binaries, so the pipeline can run on any host.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use xcembed::embedder::{BuildAction, BuildContext, BundlePair};

/// (cputype, cpusubtype) for an arm64 slice.
pub const ARM64: (u32, u32) = (0x0100_000c, 0);
/// (cputype, cpusubtype) for an x86_64 slice.
pub const X86_64: (u32, u32) = (0x0100_0007, 3);

const MH_MAGIC_64: u32 = 0xfeed_facf;
const MH_DYLIB: u32 = 6;
const LC_UUID: u32 = 0x1b;

/// Minimal 64-bit Mach-O: a bare header plus an optional LC_UUID command.
pub fn thin_macho(cputype: u32, cpusubtype: u32, uuid: Option<[u8; 16]>) -> Vec<u8> {
    let (ncmds, sizeofcmds) = if uuid.is_some() { (1, 24) } else { (0, 0) };
    let mut bytes = Vec::new();
    for word in [MH_MAGIC_64, cputype, cpusubtype, MH_DYLIB, ncmds, sizeofcmds, 0, 0] {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    if let Some(uuid) = uuid {
        bytes.extend_from_slice(&LC_UUID.to_le_bytes());
        bytes.extend_from_slice(&24u32.to_le_bytes());
        bytes.extend_from_slice(&uuid);
    }
    bytes
}

/// Fat container wrapping the given (cputype, cpusubtype, slice) triples.
pub fn fat_macho(slices: &[(u32, u32, Vec<u8>)]) -> Vec<u8> {
    let align_exp = 4u32;
    let header_len = (8 + 20 * slices.len()) as u32;
    let mut offsets = Vec::with_capacity(slices.len());
    let mut cursor = header_len;
    for (_, _, body) in slices {
        cursor = cursor.next_multiple_of(1 << align_exp);
        offsets.push(cursor);
        cursor += body.len() as u32;
    }

    let mut out = Vec::new();
    out.extend_from_slice(&0xcafe_babe_u32.to_be_bytes());
    out.extend_from_slice(&(slices.len() as u32).to_be_bytes());
    for ((cputype, cpusubtype, body), offset) in slices.iter().zip(&offsets) {
        for word in [*cputype, *cpusubtype, *offset, body.len() as u32, align_exp] {
            out.extend_from_slice(&word.to_be_bytes());
        }
    }
    for ((_, _, body), offset) in slices.iter().zip(&offsets) {
        out.resize(*offset as usize, 0);
        out.extend_from_slice(body);
    }
    out
}

/// Writes `bytes` to `path`, creating parent directories.
pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

/// Fat binary holding one bare slice per architecture.
pub fn binary_for(archs: &[(u32, u32)]) -> Vec<u8> {
    let slices: Vec<_> = archs
        .iter()
        .map(|&(cputype, cpusubtype)| (cputype, cpusubtype, thin_macho(cputype, cpusubtype, None)))
        .collect();
    fat_macho(&slices)
}

/// `<dir>/<name>.framework` with a fat binary and a resource file.
pub fn make_framework(dir: &Path, name: &str, archs: &[(u32, u32)]) -> PathBuf {
    let bundle = dir.join(format!("{name}.framework"));
    write_file(&bundle.join(name), &binary_for(archs));
    write_file(&bundle.join("Info.plist"), b"plist");
    bundle
}

/// `<dir>/<name>.framework.dSYM` with a DWARF companion binary.
pub fn make_dsym(dir: &Path, name: &str, archs: &[(u32, u32)]) -> PathBuf {
    let bundle = dir.join(format!("{name}.framework.dSYM"));
    write_file(
        &bundle.join("Contents/Resources/DWARF").join(name),
        &binary_for(archs),
    );
    bundle
}

pub fn arch_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Context for one embed run over explicit pairs.
pub fn context(
    configuration: &str,
    valid: &[&str],
    built_products_dir: &Path,
    pairs: Vec<(PathBuf, PathBuf)>,
    action: BuildAction,
) -> BuildContext {
    BuildContext {
        configuration: configuration.to_string(),
        action,
        valid_architectures: arch_set(valid),
        built_products_dir: built_products_dir.to_path_buf(),
        bundle_pairs: pairs
            .into_iter()
            .map(|(input, output)| BundlePair { input, output })
            .collect(),
    }
}
