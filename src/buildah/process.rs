//! Runner that executes buildah as a child process.

use super::{Invocation, ToolRunner, ToolStatus};
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Spawns each invocation with inherited stdout/stderr and waits for it
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a process runner
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ToolStatus> {
        log::debug!("running {}", invocation);

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if invocation.stdin.is_some() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }

        let mut child = command.spawn()?;

        if let Some(input) = &invocation.stdin
            && let Some(mut stdin) = child.stdin.take()
        {
            let written = match stdin.write_all(input).await {
                Ok(()) => stdin.shutdown().await,
                Err(e) => Err(e),
            };
            // Dropping the handle closes the pipe so buildah sees EOF
            drop(stdin);

            match written {
                Ok(()) => {}
                // buildah exited without reading stdin; its exit status says why
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    log::debug!("buildah closed stdin early: {}", e);
                }
                Err(e) => {
                    let _ = child.kill().await;
                    return Err(e);
                }
            }
        }

        let status = child.wait().await?;
        Ok(ToolStatus::from(status))
    }
}
