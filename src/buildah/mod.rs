//! buildah process integration.
//!
//! Every step talks to buildah through the [`ToolRunner`] trait: a program,
//! its argument list and optional stdin bytes in, an exit status out. The
//! steps build [`Invocation`]s and never spawn processes themselves.
//!
//! # Module Structure
//!
//! - `dry_run` - Runner that prints command lines instead of executing them
//! - `platform` - Host architecture detection
//! - `process` - Runner backed by `tokio::process`

mod dry_run;
mod platform;
mod process;


pub use dry_run::DryRunRunner;
pub use platform::{native_arch, needs_emulation};
pub use process::ProcessRunner;

use crate::error::PluginError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single buildah command line
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to run
    pub program: PathBuf,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Bytes written to the child's stdin, then closed
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Create an invocation without stdin
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            stdin: None,
        }
    }

    /// Attach bytes to stream on stdin
    pub fn with_stdin(mut self, stdin: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    /// Check if an argument is present
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

/// Renders as a shell-style command line. Stdin is never rendered.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("stdin", &self.stdin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Exit status of a finished buildah process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    code: Option<i32>,
}

impl ToolStatus {
    /// Status for a process that exited with `code`
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status for a process terminated by a signal
    pub fn terminated() -> Self {
        Self { code: None }
    }

    /// Successful exit
    pub fn success() -> Self {
        Self::from_code(0)
    }

    /// Check if the process exited with status 0
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code, if the process was not killed by a signal
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<std::process::ExitStatus> for ToolStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Runs external tool invocations.
///
/// Implementations block the step until the process has finished.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Run `invocation` to completion
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ToolStatus>;
}

/// Run an invocation and flatten spawn errors and non-zero exits into a reason string
pub(crate) async fn run_checked<R: ToolRunner>(
    runner: &R,
    invocation: &Invocation,
) -> std::result::Result<(), String> {
    match runner.run(invocation).await {
        Ok(status) if status.is_success() => Ok(()),
        Ok(status) => Err(status.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Resolve the buildah executable before any step runs
pub fn locate(path: &Path) -> Result<PathBuf, PluginError> {
    which::which(path).map_err(|e| PluginError::ToolNotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
