//! commitline - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use commitline::config::{
    DEFAULT_DIFF_COMMAND, DEFAULT_MODEL, DEFAULT_SERVE_COMMAND, DEFAULT_STOP_COMMAND, ollama_run,
};
use tracing::warn;

use commitline::{CommandLine, Config, InterruptWatch, ServerLifecycle, SystemLauncher};

/// Generate a one-line commit message for the staged changes using a local model.
#[derive(Parser, Debug)]
#[command(name = "commitline")]
#[command(about = "Generate a one-line commit message for the staged changes using a local model")]
#[command(version)]
struct Cli {
    /// Command that prints the staged diff
    #[arg(long, default_value = DEFAULT_DIFF_COMMAND)]
    diff_command: CommandLine,

    /// Model to run with `ollama run`
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Inference command reading the prompt on stdin (replaces `ollama run <model>`)
    #[arg(long, conflicts_with = "model")]
    infer_command: Option<CommandLine>,

    /// Start the model server before running and stop it afterwards
    #[arg(long)]
    manage_server: bool,

    /// Command that starts the model server (with --manage-server)
    #[arg(long, default_value = DEFAULT_SERVE_COMMAND)]
    serve_command: CommandLine,

    /// Command that stops the model server (with --manage-server)
    #[arg(long, default_value = DEFAULT_STOP_COMMAND)]
    stop_command: CommandLine,

    /// Directory for the temporary prompt file (defaults to the system temp dir)
    #[arg(long)]
    tmp_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Config {
        let server = self.manage_server.then(|| ServerLifecycle {
            start: self.serve_command,
            stop: self.stop_command,
        });

        Config {
            diff_command: self.diff_command,
            infer_command: self
                .infer_command
                .unwrap_or_else(|| ollama_run(&self.model)),
            server,
            temp_dir: self.tmp_dir.unwrap_or_else(std::env::temp_dir),
        }
    }
}

/// Initialize tracing for diagnostics.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Output goes to stderr so stdout
/// carries nothing but the model's reply.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.into_config();

    // Installed before any child exists so Ctrl-C never skips cleanup
    let interrupt = InterruptWatch::install().unwrap_or_else(|e| {
        warn!("cannot handle Ctrl-C: {}", e);
        InterruptWatch::never()
    });
    let launcher = SystemLauncher::new(interrupt);

    match commitline::run(&config, &launcher).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
