//! Platform detection for the vcpkg checkout
//!
//! The only things that differ between platforms are the file names inside
//! the vcpkg root and the shell used to launch the install command.

use std::path::{Path, PathBuf};

/// Platform family, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Detect the platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Name of the bootstrap script shipped in the vcpkg git checkout
    pub fn bootstrap_script(self) -> &'static str {
        match self {
            Platform::Windows => "bootstrap-vcpkg.bat",
            Platform::Unix => "bootstrap-vcpkg.sh",
        }
    }

    /// Name of the executable the bootstrap script produces
    pub fn executable_name(self) -> &'static str {
        match self {
            Platform::Windows => "vcpkg.exe",
            Platform::Unix => "vcpkg",
        }
    }

    /// Shell program and the flag that makes it run a command line
    pub fn shell(self) -> (&'static str, &'static str) {
        match self {
            Platform::Windows => ("cmd", "/C"),
            Platform::Unix => ("sh", "-c"),
        }
    }

    pub fn bootstrap_script_in(self, root: &Path) -> PathBuf {
        root.join(self.bootstrap_script())
    }

    pub fn executable_in(self, root: &Path) -> PathBuf {
        root.join(self.executable_name())
    }
}
