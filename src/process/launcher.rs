//! Process launching behind a mockable trait.

use std::fs::File;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CaptureError, InvokeError, ServiceError};

use super::capture::{CapturedOutput, read_captured};
use super::command::CommandLine;
use super::interrupt::InterruptWatch;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Normal exit with a status code.
    Exited(i32),
    /// Killed by a signal, or otherwise ended without a status code.
    Signaled(Option<i32>),
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitOutcome::Exited(code),
            None => ExitOutcome::Signaled(signal_of(status)),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitOutcome::Exited(0))
    }
}

#[cfg(unix)]
fn signal_of(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: ExitStatus) -> Option<i32> {
    None
}

/// Trait for launching the external commands the pipeline depends on.
///
/// This abstraction allows substituting fake processes in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Run `command` and capture its whole standard output.
    async fn capture(&self, command: &CommandLine) -> Result<CapturedOutput, CaptureError>;

    /// Run `command` with `input` as stdin, sharing this process's stdout and
    /// stderr, and wait for it to finish.
    async fn run_with_input(
        &self,
        command: &CommandLine,
        input: &Path,
    ) -> Result<ExitOutcome, InvokeError>;

    /// Start `command` in the background without waiting for it.
    fn spawn_detached(&self, command: &CommandLine) -> Result<(), ServiceError>;

    /// Run `command` with all output discarded and wait for it.
    async fn run_quiet(&self, command: &CommandLine) -> Result<ExitOutcome, ServiceError>;
}

/// Launcher that spawns real processes.
///
/// While a capture or invocation child runs, a Ctrl-C recorded by
/// `interrupt` makes the call wait for the child and then fail with an
/// `Interrupted` error instead of returning the child's own result.
#[derive(Debug, Default, Clone)]
pub struct SystemLauncher {
    interrupt: InterruptWatch,
}

impl SystemLauncher {
    pub fn new(interrupt: InterruptWatch) -> Self {
        Self { interrupt }
    }
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn capture(&self, command: &CommandLine) -> Result<CapturedOutput, CaptureError> {
        let program = command.program().to_string();

        if self.interrupt.is_interrupted() {
            return Err(CaptureError::Interrupted { program });
        }

        let mut child = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| CaptureError::SpawnFailed {
                program: program.clone(),
                source,
            })?;

        let captured = match child.stdout.take() {
            Some(stdout) => {
                tokio::select! {
                    captured = read_captured(stdout) => captured,
                    () = self.interrupt.interrupted() => {
                        debug!("interrupted while capturing `{}`", command);
                        Err(CaptureError::Interrupted { program: program.clone() })
                    }
                }
            }
            None => Err(CaptureError::ReadFailed(std::io::Error::other(
                "child stdout was not piped",
            ))),
        };

        let captured = match captured {
            Ok(output) => output,
            Err(e) => {
                // Reap the child before reporting; it may still be blocked writing.
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(e);
            }
        };

        let status = child
            .wait()
            .await
            .map_err(|source| CaptureError::WaitFailed {
                program: program.clone(),
                source,
            })?;

        if self.interrupt.is_interrupted() {
            return Err(CaptureError::Interrupted { program });
        }

        match ExitOutcome::from_status(status) {
            ExitOutcome::Exited(0) => {
                debug!(bytes = captured.len(), "captured output of `{}`", command);
                Ok(captured)
            }
            ExitOutcome::Exited(code) => Err(CaptureError::NonZeroExit { program, code }),
            ExitOutcome::Signaled(signal) => Err(CaptureError::Terminated { program, signal }),
        }
    }

    async fn run_with_input(
        &self,
        command: &CommandLine,
        input: &Path,
    ) -> Result<ExitOutcome, InvokeError> {
        let program = command.program().to_string();

        if self.interrupt.is_interrupted() {
            return Err(InvokeError::Interrupted { program });
        }

        let stdin = File::open(input).map_err(|source| InvokeError::OpenInputFailed {
            path: input.to_path_buf(),
            source,
        })?;

        let mut child = command
            .to_command()
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| spawn_error(&program, source))?;

        let waited = tokio::select! {
            status = child.wait() => Some(status),
            () = self.interrupt.interrupted() => None,
        };

        let status = match waited {
            Some(status) => status,
            None => {
                // The child got the same SIGINT; let it finish on its own terms.
                debug!("interrupted, waiting for `{}` to exit", program);
                child.wait().await
            }
        }
        .map_err(|source| InvokeError::WaitFailed {
            program: program.clone(),
            source,
        })?;

        if self.interrupt.is_interrupted() {
            return Err(InvokeError::Interrupted { program });
        }

        Ok(ExitOutcome::from_status(status))
    }

    fn spawn_detached(&self, command: &CommandLine) -> Result<(), ServiceError> {
        command
            .to_std_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ServiceError::StartFailed {
                program: command.program().to_string(),
                source,
            })?;

        debug!("started `{}` in the background", command);
        Ok(())
    }

    async fn run_quiet(&self, command: &CommandLine) -> Result<ExitOutcome, ServiceError> {
        let status = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| ServiceError::StopFailed {
                program: command.program().to_string(),
                source,
            })?;

        Ok(ExitOutcome::from_status(status))
    }
}

/// Map a spawn failure, naming a program missing from `PATH` as not installed.
fn spawn_error(program: &str, source: io::Error) -> InvokeError {
    if source.kind() == io::ErrorKind::NotFound && which::which(program).is_err() {
        InvokeError::NotInstalled {
            program: program.to_string(),
            source,
        }
    } else {
        InvokeError::SpawnFailed {
            program: program.to_string(),
            source,
        }
    }
}
