//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use commitline::{CommandLine, Config};

/// The diff used by the end-to-end scenarios.
pub const SAMPLE_DIFF: &str = "diff --git a/x b/x\n+hello\n";

/// Create a temporary directory for prompt files.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write `content` to a fixture file inside `dir` and return its path.
pub fn write_fixture(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// A diff command that prints exactly the bytes of `path`.
pub fn cat_command(path: &Path) -> CommandLine {
    CommandLine::new("cat").arg(path.display().to_string())
}

/// Config whose prompt files land in `dir`.
pub fn config_with(dir: &Path, diff_command: CommandLine, infer_command: &str) -> Config {
    Config {
        diff_command,
        infer_command: infer_command.parse().expect("valid inference command"),
        server: None,
        temp_dir: dir.to_path_buf(),
    }
}

/// Whether `dir` has no entries left.
pub fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir)
        .expect("Failed to read temp directory")
        .next()
        .is_none()
}

/// Command for the compiled commitline binary.
pub fn commitline_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_commitline"))
}

/// Run the binary with prompt files in `dir` and the given extra arguments.
pub fn run_commitline(dir: &Path, args: &[&str]) -> Output {
    commitline_bin()
        .arg("--tmp-dir")
        .arg(dir)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run commitline binary")
}
