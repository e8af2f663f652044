//! Filesystem operations for the embed pipeline.
//!
//! Framework bundles are directories that may contain symlinks
//! (`Versions/Current` on macOS), so copies walk the tree and preserve
//! links instead of following them.

use std::io;
use std::path::Path;

use tokio::fs;

use super::error::{Error, ErrorExt, Result};

/// Creates the directory and all of its parents. Existing directories are
/// left alone.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("failed to create directory", path)
}

/// Removes whatever sits at `path`, file or directory. Missing paths are
/// not an error.
pub async fn remove_item(path: &Path) -> Result<()> {
    let result = match fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("failed to remove", path),
    }
}

/// Copies a regular file, creating any parent directories of the
/// destination.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("failed to create directory", parent)?;
    }
    fs::copy(from, to)
        .await
        .fs_context("failed to copy file", from)?;
    Ok(())
}

/// Recursively copies a directory, creating any parent directories of the
/// destination and preserving symlinks.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(from).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::NotFound {
                path: from.to_path_buf(),
            });
        }
        Err(e) => return Err(e).fs_context("failed to read", from),
    };
    if !meta.is_dir() {
        return Err(Error::Fs {
            message: "not a directory".into(),
            path: from.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "expected a bundle directory"),
        });
    }

    let from_owned = from.to_path_buf();
    let to_owned = to.to_path_buf();

    // Blocking tree walk runs on the dedicated thread pool.
    tokio::task::spawn_blocking(move || copy_dir_blocking(&from_owned, &to_owned))
        .await
        .map_err(|e| Error::Fs {
            message: "directory copy task panicked".into(),
            path: from.to_path_buf(),
            source: io::Error::other(e),
        })?
}

fn copy_dir_blocking(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).fs_context("failed to create directory", parent)?;
    }
    for entry in walkdir::WalkDir::new(from) {
        let entry = entry.map_err(|e| Error::Fs {
            message: "failed to walk bundle".into(),
            path: from.to_path_buf(),
            source: io::Error::from(e),
        })?;
        let rel_path = entry.path().strip_prefix(from).map_err(|e| Error::Fs {
            message: "failed to relativize path".into(),
            path: entry.path().to_path_buf(),
            source: io::Error::other(e),
        })?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target =
                std::fs::read_link(entry.path()).fs_context("failed to read symlink", entry.path())?;
            if entry.path().is_dir() {
                symlink_dir(&target, &dest_path)
            } else {
                symlink_file(&target, &dest_path)
            }
            .fs_context("failed to create symlink", &dest_path)?;
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path).fs_context("failed to create directory", &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path).fs_context("failed to copy file", entry.path())?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}
