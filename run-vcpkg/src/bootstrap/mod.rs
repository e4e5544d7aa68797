//! Bootstrap module for driving a vcpkg checkout
//!
//! - Platform detection (script and executable names, shell)
//! - Derived paths for a run
//! - Process launching behind a runner trait
//! - Bootstrap + install sequence
//! - Install tree symlink

pub mod installer;
pub mod layout;
pub mod link;
pub mod platform;
pub mod runner;

pub use installer::{BootstrapOutcome, InstallSummary, Installer};
pub use layout::{InstallRequest, VcpkgLayout};
pub use link::replace_link;
pub use platform::Platform;
pub use runner::{CommandRunner, DuctRunner, ExitReport, Invocation};
