use clap::Parser;
use run_vcpkg::bootstrap::{DuctRunner, InstallRequest};
use run_vcpkg::cli::Args;
use run_vcpkg::commands::handle_install;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    run_vcpkg::logging::init(args.verbose);

    let request = InstallRequest::from(args);
    match handle_install(&request, &DuctRunner) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.exit_code();
            eprintln!("❌ {:?}", anyhow::Error::new(e));
            ExitCode::from(code)
        }
    }
}
