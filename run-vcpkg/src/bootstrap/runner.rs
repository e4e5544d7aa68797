//! Process launching
//!
//! [`CommandRunner`] is the seam between the install sequence and the
//! operating system; [`DuctRunner`] is the real implementation, tests swap
//! in a recording fake.

use crate::bootstrap::platform::Platform;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use tracing::debug;

/// A fully described child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Complete environment for the child. `None` inherits ours.
    pub env: Option<BTreeMap<OsString, OsString>>,
    /// Hand `args` to the child exactly as written instead of letting std
    /// quote them. Only Windows quotes arguments, so only Windows cares.
    pub verbatim_args: bool,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: None,
            verbatim_args: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, env: BTreeMap<OsString, OsString>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn verbatim_args(mut self) -> Self {
        self.verbatim_args = true;
        self
    }
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
}

impl ExitReport {
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs a child process to completion
pub trait CommandRunner {
    /// Block until the child exits. A non-zero exit is not an `Err`; only a
    /// failure to launch the child is.
    fn run(&self, invocation: &Invocation) -> std::io::Result<ExitReport>;
}

/// Runner backed by `duct`, with stdio inherited from this process
#[derive(Debug, Default, Clone, Copy)]
pub struct DuctRunner;

impl CommandRunner for DuctRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<ExitReport> {
        debug!(
            program = %invocation.program.to_string_lossy(),
            args = ?invocation.args,
            "spawning"
        );

        let verbatim = cfg!(windows) && invocation.verbatim_args;
        let args = if verbatim {
            Vec::new()
        } else {
            invocation.args.clone()
        };

        let mut expression = duct::cmd(invocation.program.clone(), args);
        if verbatim {
            expression = with_raw_args(&expression, invocation.args.clone());
        }
        if let Some(env) = &invocation.env {
            expression = expression.full_env(env.clone());
        }

        let output = expression.unchecked().run()?;
        Ok(ExitReport {
            code: output.status.code(),
        })
    }
}

/// `cmd /C` does its own parsing and does not understand the `\"` escapes
/// std would add, so the arguments go through untouched.
#[cfg(windows)]
fn with_raw_args(expression: &duct::Expression, args: Vec<OsString>) -> duct::Expression {
    use std::os::windows::process::CommandExt;

    expression.before_spawn(move |command| {
        for arg in &args {
            command.raw_arg(arg);
        }
        Ok(())
    })
}

#[cfg(not(windows))]
fn with_raw_args(expression: &duct::Expression, _args: Vec<OsString>) -> duct::Expression {
    expression.clone()
}

/// Copy `base` and let `overrides` win on conflicting keys
pub fn merged_environment<B, K, V>(
    base: B,
    overrides: &[(&str, &OsStr)],
) -> BTreeMap<OsString, OsString>
where
    B: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let mut env: BTreeMap<OsString, OsString> = base
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect();
    for (key, value) in overrides {
        env.insert(OsString::from(key), value.to_os_string());
    }
    env
}

/// Join parts into a single line for `platform`'s shell to interpret
///
/// Each part is quoted so the shell hands it on as one literal word.
pub fn shell_command_line<I, S>(platform: Platform, parts: I) -> OsString
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = OsString::new();
    for (index, part) in parts.into_iter().enumerate() {
        if index > 0 {
            line.push(" ");
        }
        match platform {
            Platform::Unix => push_sh_word(&mut line, part.as_ref()),
            Platform::Windows => push_cmd_word(&mut line, part.as_ref()),
        }
    }
    line
}

fn is_sh_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"_./=:,+@%-".contains(&byte)
}

/// Single quotes stop every `sh` expansion; an embedded `'` becomes `'\''`
fn push_sh_word(line: &mut OsString, part: &OsStr) {
    let bytes = part.as_encoded_bytes();
    if !bytes.is_empty() && bytes.iter().copied().all(is_sh_safe) {
        line.push(part);
        return;
    }

    line.push("'");
    for (index, piece) in split_at_byte(part, b'\'').iter().enumerate() {
        if index > 0 {
            line.push("'\\''");
        }
        line.push(piece);
    }
    line.push("'");
}

/// Double quotes neutralise `cmd` operators; an embedded `"` is doubled.
/// `%VAR%` still expands, `cmd` has no quoting against it.
fn push_cmd_word(line: &mut OsString, part: &OsStr) {
    let bytes = part.as_encoded_bytes();
    let needs_quotes = bytes.is_empty()
        || bytes
            .iter()
            .any(|byte| byte.is_ascii_whitespace() || b"&|<>^()!\"".contains(byte));
    if !needs_quotes {
        line.push(part);
        return;
    }

    line.push("\"");
    for (index, piece) in split_at_byte(part, b'"').iter().enumerate() {
        if index > 0 {
            line.push("\"\"");
        }
        line.push(piece);
    }
    line.push("\"");
}

/// Split on an ASCII byte without re-encoding the pieces
#[cfg(unix)]
fn split_at_byte(part: &OsStr, separator: u8) -> Vec<OsString> {
    use std::os::unix::ffi::OsStrExt;

    part.as_bytes()
        .split(|byte| *byte == separator)
        .map(|piece| OsStr::from_bytes(piece).to_os_string())
        .collect()
}

#[cfg(not(unix))]
fn split_at_byte(part: &OsStr, separator: u8) -> Vec<OsString> {
    if !part.as_encoded_bytes().contains(&separator) {
        return vec![part.to_os_string()];
    }
    // Only reached for parts holding the separator, which are valid Unicode in practice
    part.to_string_lossy()
        .split(char::from(separator))
        .map(OsString::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_report() {
        assert!(ExitReport { code: Some(0) }.success());
        assert!(!ExitReport { code: Some(2) }.success());
        assert!(!ExitReport { code: None }.success());
        assert_eq!(ExitReport { code: Some(2) }.to_string(), "exit code 2");
        assert_eq!(ExitReport { code: None }.to_string(), "terminated by signal");
    }

    #[test]
    fn test_merged_environment_overrides_win() {
        let base = vec![
            ("PATH", "/usr/bin"),
            ("CC", "gcc"),
            ("HOME", "/home/builder"),
        ];
        let env = merged_environment(
            base,
            &[
                ("CC", OsStr::new("/opt/clang/bin/clang")),
                ("CXX", OsStr::new("/opt/clang/bin/clang++")),
            ],
        );

        assert_eq!(env.len(), 4);
        assert_eq!(env[OsStr::new("PATH")], "/usr/bin");
        assert_eq!(env[OsStr::new("CC")], "/opt/clang/bin/clang");
        assert_eq!(env[OsStr::new("CXX")], "/opt/clang/bin/clang++");
    }

    #[test]
    fn test_shell_command_line_plain() {
        let parts = ["/v/vcpkg", "install", "--triplet=x64-linux"];
        assert_eq!(
            shell_command_line(Platform::Unix, parts),
            "/v/vcpkg install --triplet=x64-linux"
        );
        assert_eq!(
            shell_command_line(Platform::Windows, parts),
            "/v/vcpkg install --triplet=x64-linux"
        );
    }

    #[test]
    fn test_sh_quoting() {
        let line = shell_command_line(
            Platform::Unix,
            [
                "/my tools/vcpkg",
                "",
                "--x-install-root=/out/$HOME;`id`&(x)",
                "--x-manifest-root=/it's",
            ],
        );
        assert_eq!(
            line,
            "'/my tools/vcpkg' '' '--x-install-root=/out/$HOME;`id`&(x)' '--x-manifest-root=/it'\\''s'"
        );
    }

    #[test]
    fn test_cmd_quoting() {
        let line = shell_command_line(
            Platform::Windows,
            [
                "C:\\my tools\\vcpkg.exe",
                "",
                "--x-install-root=C:\\a&b",
                "--triplet=x\"64",
            ],
        );
        assert_eq!(
            line,
            "\"C:\\my tools\\vcpkg.exe\" \"\" \"--x-install-root=C:\\a&b\" \"--triplet=x\"\"64\""
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_sh_quoting_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let part = OsStr::from_bytes(b"/out/caf\xe9");
        let line = shell_command_line(Platform::Unix, [part]);
        assert_eq!(line.into_vec(), b"'/out/caf\xe9'".to_vec());
    }

    #[cfg(unix)]
    #[test]
    fn test_sh_runs_quoted_words_literally() {
        let words = ["a b", "$HOME", "x;exit 9", "it's", "`false`"];
        let mut parts = vec!["printf", "%s|"];
        parts.extend(words);
        let line = shell_command_line(Platform::Unix, parts);

        let output = duct::cmd("sh", [OsString::from("-c"), line])
            .stdout_capture()
            .run()
            .unwrap();
        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "a b|$HOME|x;exit 9|it's|`false`|"
        );
    }

    #[test]
    fn test_verbatim_args_flag() {
        let invocation = Invocation::new("cmd").arg("/C").arg("x").verbatim_args();
        assert!(invocation.verbatim_args);
        assert!(!Invocation::new("sh").verbatim_args);
    }

    #[cfg(unix)]
    #[test]
    fn test_duct_runner_reports_exit_code() {
        let runner = DuctRunner;

        let ok = runner
            .run(&Invocation::new("sh").arg("-c").arg("exit 0"))
            .unwrap();
        assert!(ok.success());

        let failed = runner
            .run(&Invocation::new("sh").arg("-c").arg("exit 3"))
            .unwrap();
        assert_eq!(failed.code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_duct_runner_uses_full_env() {
        let env = merged_environment(
            std::env::vars_os(),
            &[("RUN_VCPKG_MARKER", OsStr::new("expected"))],
        );
        let report = DuctRunner
            .run(
                &Invocation::new("sh")
                    .arg("-c")
                    .arg("test \"$RUN_VCPKG_MARKER\" = expected")
                    .env(env),
            )
            .unwrap();
        assert!(report.success());
    }

    #[test]
    fn test_duct_runner_spawn_error() {
        let result = DuctRunner.run(&Invocation::new("/definitely/not/a/program"));
        assert!(result.is_err());
    }
}
