//! commitline - Generate a one-line Git commit message from the staged diff.
//!
//! # Overview
//!
//! commitline reads the staged diff, writes it behind a fixed instruction
//! block into a private temporary file, and feeds that file to a local model
//! (`ollama run llama3` by default). The model's reply streams straight to
//! stdout and its exit status becomes commitline's own.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod prompt;

// Re-export commonly used types
pub use config::{Config, ServerLifecycle};
pub use error::{
    CaptureError, CommandLineError, InvokeError, PipelineError, PromptError, ServiceError,
};
pub use pipeline::run;
pub use process::{
    CapturedOutput, CommandLine, ExitOutcome, InterruptWatch, Launcher, SystemLauncher,
};
pub use prompt::{FIXED_TEMPLATE, PromptFile};
