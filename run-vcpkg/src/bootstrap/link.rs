//! Symlink replacement
//!
//! Exposes the per-triple install tree next to the manifest. Whatever
//! occupies the destination is removed first; remove-then-create is not
//! atomic.

use crate::error::{CreateLinkSnafu, RemoveExistingSnafu, Result, SourceInsideDestinationSnafu};
use snafu::{ResultExt, ensure};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Point `destination` at the directory `source`, replacing whatever is there
///
/// Refuses when `source` is `destination` or lies below it, since clearing the
/// destination would delete the tree the link is meant to expose.
pub fn replace_link(source: &Path, destination: &Path) -> Result<()> {
    ensure!(
        !source.starts_with(destination),
        SourceInsideDestinationSnafu {
            source_dir: source,
            destination,
        }
    );

    remove_existing(destination).context(RemoveExistingSnafu { path: destination })?;

    create_dir_link(source, destination).context(CreateLinkSnafu {
        source_dir: source,
        destination,
    })?;

    debug!(
        "Linked {} -> {}",
        destination.display(),
        source.display()
    );
    Ok(())
}

/// Remove a file, directory or symlink (dangling ones included) at `path`
fn remove_existing(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    info!("Replacing existing {}", path.display());

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        remove_symlink(path)
    } else if file_type.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
fn remove_symlink(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

#[cfg(windows)]
fn remove_symlink(path: &Path) -> io::Result<()> {
    // Directory symlinks and junctions need remove_dir on Windows
    fs::remove_dir(path).or_else(|_| fs::remove_file(path))
}

#[cfg(unix)]
fn create_dir_link(source: &Path, destination: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, destination)
}

#[cfg(windows)]
fn create_dir_link(source: &Path, destination: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(source, destination)
}
