use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Captured result of one shell command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stdout followed by stderr, for diagnostics.
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }
}

/// Something that runs a command line and captures its output.
///
/// The harness calls `run` from several worker threads at once.
pub trait Shell: Send + Sync {
    fn run(&self, command: &str) -> std::io::Result<CommandOutput>;
}

/// Runs commands through `<shell> -c`.
#[derive(Clone, Debug)]
pub struct SystemShell {
    executable: PathBuf,
}

impl SystemShell {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        SystemShell {
            executable: executable.into(),
        }
    }
}

impl Shell for SystemShell {
    fn run(&self, command: &str) -> std::io::Result<CommandOutput> {
        let output = Command::new(&self.executable)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Check if `binary` can be spawned from `PATH`.
///
/// Only the spawn counts, not the exit status: some toolchains reject
/// `--version` (`go` wants `go version`) and still are installed.
pub fn is_available(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Single-quote `text` for a POSIX shell.
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("/tmp/a b/Model.c"), "'/tmp/a b/Model.c'");
        assert_eq!(quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_combined_output() {
        let out = CommandOutput {
            success: false,
            stdout: "partial\n".to_string(),
            stderr: "boom\n".to_string(),
        };
        assert_eq!(out.combined(), "partial\nboom");
        let quiet = CommandOutput {
            stderr: "boom".to_string(),
            ..CommandOutput::default()
        };
        assert_eq!(quiet.combined(), "boom");
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        assert!(!is_available("porter-no-such-binary-7f3a"));
    }

    #[test]
    fn test_failing_version_flag_still_counts_as_available() {
        if !Path::new("/bin/false").exists() && !Path::new("/usr/bin/false").exists() {
            return;
        }
        // `false --version` exits 1.
        assert!(is_available("false"));
    }

    #[test]
    fn test_system_shell_captures_output() {
        if !Path::new("/bin/sh").exists() {
            return;
        }
        let shell = SystemShell::new("/bin/sh");
        let out = shell.run("echo hello; echo oops >&2; exit 3").unwrap();
        assert!(!out.success);
        assert_eq!(out.stdout, "hello\n");
        assert_eq!(out.stderr, "oops\n");
    }
}
