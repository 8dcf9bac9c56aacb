//! Parsed command lines for the external tools commitline drives.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use tokio::process::Command;

use crate::error::CommandLineError;

/// A program plus its arguments.
///
/// Parsed with POSIX shell quoting rules but executed directly, without a
/// shell, so redirections and pipes in the string are passed as literal
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Build a tokio command for this line. Stdio is left to the caller.
    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Same as [`to_command`](Self::to_command) for blocking, detached spawns.
    pub(crate) fn to_std_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl FromStr for CommandLine {
    type Err = CommandLineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts =
            shlex::split(s).ok_or_else(|| CommandLineError::UnbalancedQuotes(s.to_string()))?;
        let (program, args) = parts.split_first().ok_or(CommandLineError::Empty)?;
        Ok(Self::new(program.clone()).args(args.iter().cloned()))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| shlex::try_quote(part).unwrap_or(Cow::Borrowed(part.as_str())))
            .collect::<Vec<_>>();
        f.write_str(&quoted.join(" "))
    }
}
