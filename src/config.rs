//! Run configuration: which commands to drive and where the prompt file goes.

use std::path::PathBuf;

use crate::process::CommandLine;

/// Command that prints the staged diff.
pub const DEFAULT_DIFF_COMMAND: &str = "git diff --staged --no-color";

/// Model passed to `ollama run` when no inference command is given.
pub const DEFAULT_MODEL: &str = "llama3";

/// Command that starts the model server in the background.
pub const DEFAULT_SERVE_COMMAND: &str = "ollama serve";

/// Command that stops the model server.
pub const DEFAULT_STOP_COMMAND: &str = "pkill -f ollama";

/// Inference command for a model served by ollama.
pub fn ollama_run(model: &str) -> CommandLine {
    CommandLine::new("ollama").arg("run").arg(model)
}

/// Start and stop commands for a model server the run manages itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLifecycle {
    pub start: CommandLine,
    pub stop: CommandLine,
}

impl Default for ServerLifecycle {
    fn default() -> Self {
        Self {
            start: CommandLine::new("ollama").arg("serve"),
            stop: CommandLine::new("pkill").args(["-f", "ollama"]),
        }
    }
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub diff_command: CommandLine,
    pub infer_command: CommandLine,
    /// When set, the server is started before the diff is read and stopped
    /// once the run ends. When `None` the server is assumed to be running.
    pub server: Option<ServerLifecycle>,
    /// Directory the prompt file is created in.
    pub temp_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diff_command: CommandLine::new("git").args(["diff", "--staged", "--no-color"]),
            infer_command: ollama_run(DEFAULT_MODEL),
            server: None,
            temp_dir: std::env::temp_dir(),
        }
    }
}
