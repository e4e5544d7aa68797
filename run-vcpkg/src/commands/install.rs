//! The one command this tool has: bootstrap, install, link
//!
//! Prints the values it works with to stdout before running, so build logs
//! show what was used.

use crate::bootstrap::{
    BootstrapOutcome, CommandRunner, InstallRequest, InstallSummary, Installer, Platform,
    VcpkgLayout,
};
use crate::error::Result;

/// Resolve paths for `request` and run the whole sequence with `runner`
pub fn handle_install<R: CommandRunner>(
    request: &InstallRequest,
    runner: &R,
) -> Result<InstallSummary> {
    let layout = VcpkgLayout::resolve(request, Platform::current())?;
    println!("{}", layout.vcpkg_root.display());
    println!("{}", layout.executable.display());
    println!("{}", request.triple);
    println!("{}", request.out_dir.display());
    println!("{}", layout.manifest_root.display());

    let summary = Installer::new(request, &layout, runner).run()?;

    if summary.bootstrap == BootstrapOutcome::Bootstrapped {
        println!("🔧 Bootstrapped {}", layout.executable.display());
    }
    println!(
        "✅ {} -> {}",
        summary.link_destination.display(),
        summary.link_source.display()
    );

    Ok(summary)
}
