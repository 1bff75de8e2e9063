//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::ffi::OsString;
use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::application::ports::CommandRunner;

/// Production `CommandRunner` using tokio for async process execution.
///
/// Every child gets `kill_on_drop`, and the timed variant kills the child
/// explicitly via `tokio::select!` so a timed-out process is never left
/// running. Variables added with [`TokioCommandRunner::with_env`] are layered
/// over the inherited environment of every child.
#[derive(Debug, Clone, Default)]
pub struct TokioCommandRunner {
    env: Vec<(OsString, OsString)>,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key=value` for every process this runner spawns.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    fn command(&self, program: &str, args: &[&str]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .kill_on_drop(true);
        cmd
    }

    fn spawn_captured(&self, program: &str, args: &[&str], stdin: Stdio) -> Result<Child> {
        // Argument values can carry registry secrets or token URLs.
        tracing::trace!(program, argc = args.len(), "spawning");
        self.command(program, args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))
    }
}

/// Wait for `child` while draining both pipes concurrently.
async fn wait_output(child: &mut Child, program: &str) -> Result<Output> {
    let mut stdout_handle = child.stdout.take();
    let mut stderr_handle = child.stderr.take();
    let (status, stdout, stderr) = tokio::join!(
        child.wait(),
        async {
            let mut buf = Vec::new();
            if let Some(ref mut h) = stdout_handle {
                let _ = h.read_to_end(&mut buf).await;
            }
            buf
        },
        async {
            let mut buf = Vec::new();
            if let Some(ref mut h) = stderr_handle {
                let _ = h.read_to_end(&mut buf).await;
            }
            buf
        },
    );
    Ok(Output {
        status: status.with_context(|| format!("waiting for {program}"))?,
        stdout,
        stderr,
    })
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut child = self.spawn_captured(program, args, Stdio::null())?;
        wait_output(&mut child, program).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let mut child = self.spawn_captured(program, args, Stdio::null())?;

        tokio::select! {
            result = wait_output(&mut child, program) => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output> {
        let mut child = self.spawn_captured(program, args, Stdio::piped())?;

        let stdin_handle = child.stdin.take();
        let input_owned = input.to_vec();
        let stdin_task = tokio::spawn(async move {
            if let Some(mut stdin) = stdin_handle {
                let _ = stdin.write_all(&input_owned).await;
            }
        });

        let output = wait_output(&mut child, program).await;
        let _ = stdin_task.await;
        output
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        tracing::trace!(program, argc = args.len(), "spawning with inherited stdio");
        let mut child = self
            .command(program, args)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
