//! Bootstraps a vcpkg checkout and installs the packages of a manifest
//!
//! The run is strictly sequential:
//! 1. build `vcpkg` with the checkout's bootstrap script if it is missing
//! 2. `vcpkg install` the manifest for a triple into an output directory
//! 3. link `<manifest dir>/vcpkg` to `<out dir>/<triple>`
//!
//! Each failing step has its own exit status, see [`error::Error::exit_code`].

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
