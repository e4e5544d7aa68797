//! Command line arguments

use crate::bootstrap::InstallRequest;
use clap::{ArgAction, Parser};
use std::convert::Infallible;
use std::path::PathBuf;

/// Bootstraps a vcpkg git repository and uses the generated vcpkg executable
/// to install all packages in the given manifest file.
#[derive(Debug, Parser, Clone)]
#[clap(name = "run-vcpkg", version, long_about = None)]
pub struct Args {
    /// The path to the vcpkg root, the cloned git repository.
    #[clap(short = 'd', long = "dir", value_name = "VCPKG_ROOT", value_parser = expand_path)]
    pub vcpkg_root: PathBuf,

    /// The path to the C compiler to use.
    #[clap(short = 'c', long = "c-compiler", value_name = "CC", value_parser = expand_path)]
    pub c_compiler: PathBuf,

    /// The path to the C++ compiler to use.
    #[clap(short = 'x', long = "cxx-compiler", value_name = "CXX", value_parser = expand_path)]
    pub cxx_compiler: PathBuf,

    /// The path to directory to install the packages in.
    #[clap(short = 'o', long = "out_dir", alias = "out-dir", value_name = "OUT_DIR", value_parser = expand_path)]
    pub out_dir: PathBuf,

    /// The triple describing the CPU architecture, OS and release or debug builds.
    #[clap(short = 't', long = "triple")]
    pub triple: String,

    /// The path to the manifest.
    #[clap(value_name = "MANIFEST", value_parser = expand_path)]
    pub manifest: PathBuf,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl From<Args> for InstallRequest {
    fn from(args: Args) -> Self {
        InstallRequest {
            vcpkg_root: args.vcpkg_root,
            c_compiler: args.c_compiler,
            cxx_compiler: args.cxx_compiler,
            out_dir: args.out_dir,
            triple: args.triple,
            manifest: args.manifest,
        }
    }
}

/// Expand a leading `~` so quoted paths behave like unquoted ones
fn expand_path(raw: &str) -> Result<PathBuf, Infallible> {
    Ok(PathBuf::from(shellexpand::tilde(raw).as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const FULL: [&str; 12] = [
        "run-vcpkg",
        "-d",
        "/v",
        "-c",
        "/usr/bin/gcc",
        "-x",
        "/usr/bin/g++",
        "-o",
        "/out",
        "-t",
        "x64-linux",
        "/proj/vcpkg.json",
    ];

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from(FULL).unwrap();
        let request = InstallRequest::from(args);

        assert_eq!(request.vcpkg_root, PathBuf::from("/v"));
        assert_eq!(request.c_compiler, PathBuf::from("/usr/bin/gcc"));
        assert_eq!(request.cxx_compiler, PathBuf::from("/usr/bin/g++"));
        assert_eq!(request.out_dir, PathBuf::from("/out"));
        assert_eq!(request.triple, "x64-linux");
        assert_eq!(request.manifest, PathBuf::from("/proj/vcpkg.json"));
    }

    #[test]
    fn test_long_flags() {
        let args = Args::try_parse_from([
            "run-vcpkg",
            "--dir=/v",
            "--c-compiler=/usr/bin/clang",
            "--cxx-compiler=/usr/bin/clang++",
            "--out_dir=/out",
            "--triple=arm64-osx",
            "-vv",
            "vcpkg.json",
        ])
        .unwrap();

        assert_eq!(args.out_dir, PathBuf::from("/out"));
        assert_eq!(args.triple, "arm64-osx");
        assert_eq!(args.verbose, 2);
        assert_eq!(args.manifest, PathBuf::from("vcpkg.json"));
    }

    #[test]
    fn test_out_dir_alias() {
        let mut argv = FULL.to_vec();
        argv[7] = "--out-dir";
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("/out"));
    }

    #[test]
    fn test_manifest_is_required() {
        let result = Args::try_parse_from(&FULL[..11]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        let expanded = expand_path("~/vcpkg").unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("vcpkg"));

        assert_eq!(expand_path("/abs/vcpkg").unwrap(), PathBuf::from("/abs/vcpkg"));
    }
}
