//! End-to-end run: staged diff -> prompt file -> model -> exit code.

use tracing::{debug, warn};

use crate::config::{Config, ServerLifecycle};
use crate::error::{InvokeError, PipelineError};
use crate::process::{ExitOutcome, Launcher};
use crate::prompt::PromptFile;

/// Generate a commit message for the staged diff.
///
/// The model's output goes straight to this process's stdout. Returns the
/// inference command's exit code; every local failure is an error instead.
/// When `config.server` is set, the server is started first and stopped on
/// every path after a successful start.
pub async fn run<L>(config: &Config, launcher: &L) -> Result<u8, PipelineError>
where
    L: Launcher + ?Sized,
{
    let Some(server) = &config.server else {
        return generate(config, launcher).await;
    };

    launcher.spawn_detached(&server.start)?;
    let result = generate(config, launcher).await;
    stop_server(server, launcher).await;
    result
}

async fn generate<L>(config: &Config, launcher: &L) -> Result<u8, PipelineError>
where
    L: Launcher + ?Sized,
{
    debug!("reading staged diff with `{}`", config.diff_command);
    let diff = launcher.capture(&config.diff_command).await?;
    if diff.is_empty() {
        return Err(PipelineError::NoStagedChanges);
    }

    let prompt = PromptFile::create(&config.temp_dir, diff.as_bytes())?;
    drop(diff);

    debug!(prompt = %prompt.path().display(), "running `{}`", config.infer_command);
    let outcome = launcher
        .run_with_input(&config.infer_command, prompt.path())
        .await;

    if let Err(e) = prompt.remove() {
        warn!("Could not remove prompt file: {}", e);
    }

    match outcome? {
        ExitOutcome::Exited(code) => Ok(exit_code(code)),
        ExitOutcome::Signaled(signal) => Err(InvokeError::Terminated {
            program: config.infer_command.program().to_string(),
            signal,
        }
        .into()),
    }
}

/// Map a child's exit status to ours, falling back to 1 when it does not fit.
fn exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or_else(|_| {
        debug!(code, "exit status out of range, reporting 1");
        1
    })
}

async fn stop_server<L>(server: &ServerLifecycle, launcher: &L)
where
    L: Launcher + ?Sized,
{
    match launcher.run_quiet(&server.stop).await {
        Ok(outcome) if outcome.success() => debug!("stopped model server"),
        Ok(outcome) => debug!(?outcome, "`{}` did not report success", server.stop),
        Err(e) => warn!("Could not stop model server: {}", e),
    }
}
