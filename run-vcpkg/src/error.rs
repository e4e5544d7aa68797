//! Error type for the bootstrap / install / link sequence
//!
//! Every failure point maps to its own process exit status, see
//! [`Error::exit_code`].

use crate::bootstrap::runner::ExitReport;
use snafu::Snafu;
use std::path::PathBuf;

/// Exit status when the bootstrap script could not build vcpkg
pub const EXIT_BOOTSTRAP_FAILED: u8 = 1;
/// Exit status when `vcpkg install` failed
pub const EXIT_INSTALL_FAILED: u8 = 2;
/// Exit status for filesystem failures (path resolution, link replacement)
pub const EXIT_FILESYSTEM_FAILED: u8 = 3;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to execute bootstrap script {}", script.display()))]
    BootstrapSpawn {
        script: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Bootstrap script {} failed ({status})", script.display()))]
    BootstrapFailed { script: PathBuf, status: ExitReport },

    #[snafu(display("Failed to execute vcpkg install via {shell}"))]
    InstallSpawn {
        shell: String,
        source: std::io::Error,
    },

    #[snafu(display("vcpkg install failed ({status}): {command_line}"))]
    InstallFailed {
        command_line: String,
        status: ExitReport,
    },

    #[snafu(display("Failed to resolve path {}", path.display()))]
    ResolvePath {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display(
        "Refusing to replace {} because the install tree {} lies inside it",
        destination.display(),
        source_dir.display()
    ))]
    SourceInsideDestination {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    #[snafu(display("Failed to remove existing {}", path.display()))]
    RemoveExisting {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to link {} -> {}", destination.display(), source_dir.display()))]
    CreateLink {
        source_dir: PathBuf,
        destination: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::BootstrapSpawn { .. } | Error::BootstrapFailed { .. } => EXIT_BOOTSTRAP_FAILED,
            Error::InstallSpawn { .. } | Error::InstallFailed { .. } => EXIT_INSTALL_FAILED,
            Error::ResolvePath { .. }
            | Error::SourceInsideDestination { .. }
            | Error::RemoveExisting { .. }
            | Error::CreateLink { .. } => EXIT_FILESYSTEM_FAILED,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
