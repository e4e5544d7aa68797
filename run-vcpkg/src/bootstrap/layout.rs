//! Paths derived from the invocation parameters
//!
//! Everything is computed once, up front, so that later steps never have
//! to guess at the working directory.

use crate::bootstrap::platform::Platform;
use crate::error::{ResolvePathSnafu, Result};
use snafu::ResultExt;
use std::path::{Path, PathBuf};

/// Name of the link created next to the manifest
pub const LINK_NAME: &str = "vcpkg";

/// The six parameters a run is driven by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub vcpkg_root: PathBuf,
    pub c_compiler: PathBuf,
    pub cxx_compiler: PathBuf,
    pub out_dir: PathBuf,
    pub triple: String,
    pub manifest: PathBuf,
}

/// Derived paths for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcpkgLayout {
    pub platform: Platform,
    pub vcpkg_root: PathBuf,
    pub executable: PathBuf,
    pub bootstrap_script: PathBuf,
    pub manifest_root: PathBuf,
    pub link_source: PathBuf,
    pub link_destination: PathBuf,
}

impl VcpkgLayout {
    pub fn resolve(request: &InstallRequest, platform: Platform) -> Result<Self> {
        let vcpkg_root = resolve_path(&request.vcpkg_root)?;

        let manifest_parent = match request.manifest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let manifest_root = resolve_path(manifest_parent)?;

        let link_source = resolve_path(&request.out_dir.join(&request.triple))?;
        let link_destination = manifest_root.join(LINK_NAME);

        Ok(Self {
            platform,
            executable: platform.executable_in(&vcpkg_root),
            bootstrap_script: platform.bootstrap_script_in(&vcpkg_root),
            vcpkg_root,
            manifest_root,
            link_source,
            link_destination,
        })
    }
}

/// Canonicalize when the path exists, otherwise make it absolute against the
/// working directory without touching the filesystem.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(canonical) => Ok(canonical),
        Err(_) => std::path::absolute(path).context(ResolvePathSnafu { path }),
    }
}
