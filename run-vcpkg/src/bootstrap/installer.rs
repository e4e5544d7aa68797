//! Bootstrap vcpkg, install a manifest, link the install tree
//!
//! The three steps run strictly in order and the first failure stops the
//! run. Nothing is retried or rolled back: a bootstrapped executable stays
//! in place even when the install afterwards fails.

use crate::bootstrap::layout::{InstallRequest, VcpkgLayout};
use crate::bootstrap::link::replace_link;
use crate::bootstrap::runner::{CommandRunner, Invocation, merged_environment, shell_command_line};
use crate::error::{
    BootstrapFailedSnafu, BootstrapSpawnSnafu, InstallFailedSnafu, InstallSpawnSnafu, Result,
};
use snafu::{ResultExt, ensure};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use tracing::info;

/// Flag passed to the bootstrap script to turn off telemetry
pub const DISABLE_METRICS_FLAG: &str = "-disableMetrics";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyPresent,
    Bootstrapped,
}

/// Result of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSummary {
    pub bootstrap: BootstrapOutcome,
    pub link_source: PathBuf,
    pub link_destination: PathBuf,
}

pub struct Installer<'a, R: CommandRunner> {
    request: &'a InstallRequest,
    layout: &'a VcpkgLayout,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Installer<'a, R> {
    pub fn new(request: &'a InstallRequest, layout: &'a VcpkgLayout, runner: &'a R) -> Self {
        Self {
            request,
            layout,
            runner,
        }
    }

    /// Run bootstrap (when needed), install and link
    pub fn run(&self) -> Result<InstallSummary> {
        let bootstrap = self.ensure_vcpkg()?;
        self.install_manifest()?;
        self.link_install_tree()?;

        Ok(InstallSummary {
            bootstrap,
            link_source: self.layout.link_source.clone(),
            link_destination: self.layout.link_destination.clone(),
        })
    }

    /// Build the vcpkg executable unless it is already there
    pub fn ensure_vcpkg(&self) -> Result<BootstrapOutcome> {
        if self.layout.executable.is_file() {
            info!("Found {}", self.layout.executable.display());
            return Ok(BootstrapOutcome::AlreadyPresent);
        }

        let script = &self.layout.bootstrap_script;
        info!(
            "{} missing, bootstrapping with {}",
            self.layout.executable.display(),
            script.display()
        );

        let invocation = Invocation::new(script.as_os_str()).arg(DISABLE_METRICS_FLAG);
        let status = self
            .runner
            .run(&invocation)
            .context(BootstrapSpawnSnafu { script })?;
        ensure!(status.success(), BootstrapFailedSnafu { script, status });

        Ok(BootstrapOutcome::Bootstrapped)
    }

    /// The `vcpkg install` command line handed to the shell
    pub fn install_command_line(&self) -> OsString {
        let layout = self.layout;
        shell_command_line(layout.platform, [
            layout.executable.as_os_str().to_os_string(),
            OsString::from("install"),
            flag("--vcpkg-root=", layout.vcpkg_root.as_os_str()),
            flag("--triplet=", OsStr::new(&self.request.triple)),
            flag("--x-install-root=", self.request.out_dir.as_os_str()),
            flag("--x-manifest-root=", layout.manifest_root.as_os_str()),
        ])
    }

    /// Run `vcpkg install` through the platform shell with CC/CXX overridden
    pub fn install_manifest(&self) -> Result<()> {
        let command_line = self.install_command_line();
        let (shell, shell_flag) = self.layout.platform.shell();

        let env = merged_environment(
            std::env::vars_os(),
            &[
                ("CC", self.request.c_compiler.as_os_str()),
                ("CXX", self.request.cxx_compiler.as_os_str()),
            ],
        );

        info!(
            "Installing packages for {} into {}",
            self.request.triple,
            self.request.out_dir.display()
        );

        let invocation = Invocation::new(shell)
            .arg(shell_flag)
            .arg(command_line.clone())
            .env(env)
            .verbatim_args();
        let status = self
            .runner
            .run(&invocation)
            .context(InstallSpawnSnafu { shell })?;
        ensure!(
            status.success(),
            InstallFailedSnafu {
                command_line: command_line.to_string_lossy(),
                status,
            }
        );

        Ok(())
    }

    /// Replace `<manifest_root>/vcpkg` with a link to `<out_dir>/<triple>`
    pub fn link_install_tree(&self) -> Result<()> {
        info!(
            "Linking {} -> {}",
            self.layout.link_destination.display(),
            self.layout.link_source.display()
        );
        replace_link(&self.layout.link_source, &self.layout.link_destination)
    }
}

fn flag(name: &str, value: &OsStr) -> OsString {
    let mut flag = OsString::from(name);
    flag.push(value);
    flag
}
