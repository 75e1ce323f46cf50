//! Runner that prints command lines instead of executing them.

use super::{Invocation, ToolRunner, ToolStatus};
use crate::cli::OutputManager;

/// Prints every invocation and reports success
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner {
    output: OutputManager,
}

impl DryRunRunner {
    /// Create a dry-run runner printing to stdout
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToolRunner for DryRunRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ToolStatus> {
        self.output.command(&invocation.to_string())?;
        if invocation.stdin.is_some() {
            self.output.indent("(stdin redacted)")?;
        }
        Ok(ToolStatus::success())
    }
}
