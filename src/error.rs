//! Error types for commitline modules using thiserror.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Render how a child process ended when it did not exit normally.
fn describe_termination(signal: &Option<i32>) -> String {
    match signal {
        Some(sig) => format!("was terminated by signal {sig}"),
        None => "terminated abnormally".to_string(),
    }
}

/// Errors from parsing a configured command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandLineError {
    #[error("command line is empty")]
    Empty,

    #[error("unbalanced quotes in command line: {0}")]
    UnbalancedQuotes(String),
}

/// Errors from capturing a command's standard output.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to spawn `{program}`: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("out of memory growing capture buffer to {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("failed to read command output: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("failed to reap `{program}`: {source}")]
    WaitFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with status {code}")]
    NonZeroExit { program: String, code: i32 },

    #[error("`{program}` {}", describe_termination(.signal))]
    Terminated { program: String, signal: Option<i32> },

    #[error("interrupted while `{program}` was running")]
    Interrupted { program: String },
}

/// Errors from writing the prompt file.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("failed to create temp file in {}: {source}", .dir.display())]
    CreateFailed {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write prompt: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("failed to remove prompt file: {0}")]
    RemoveFailed(#[source] io::Error),
}

/// Errors from running the inference command.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("`{program}` not found ({source}). Install it or pass --infer-command")]
    NotInstalled {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open prompt file {}: {source}", .path.display())]
    OpenInputFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn `{program}`: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{program}`: {source}")]
    WaitFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` {}", describe_termination(.signal))]
    Terminated { program: String, signal: Option<i32> },

    #[error("interrupted while `{program}` was running")]
    Interrupted { program: String },
}

/// Errors from starting or stopping the background model server.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("failed to start `{program}`: {source}")]
    StartFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to run `{program}`: {source}")]
    StopFailed {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// A failure that aborts the run.
///
/// Each variant renders as a single `<stage>: <reason>` line for stderr.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("diff capture: {0}")]
    Capture(#[from] CaptureError),

    #[error("diff capture: no staged changes. Stage files first (git add ...)")]
    NoStagedChanges,

    #[error("prompt file: {0}")]
    Prompt(#[from] PromptError),

    #[error("model invocation: {0}")]
    Invoke(#[from] InvokeError),

    #[error("model server: {0}")]
    Service(#[from] ServiceError),
}

impl PipelineError {
    /// Process exit code reported for this failure.
    ///
    /// Every local failure maps to 1; only the inference command's own
    /// exit status is ever passed through.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
