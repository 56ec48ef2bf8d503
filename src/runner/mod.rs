//! Execution of external commands
//!
//! Everything the migration does to a repository goes through the
//! [`CommandRunner`] trait. [`ProcessCommandRunner`] spawns real processes;
//! [`MockCommandRunner`] records invocations and returns scripted output so
//! the reconciliation logic can be tested without `git` installed.

use crate::core::CommandInfo;
use crate::error::Result;

pub mod interactive;
pub mod mock_runner;
pub mod real_runner;

pub use interactive::{
    ChannelStream, ChunkedStream, InteractiveSession, PromptStream, SecretInput, SecretSource,
    SessionState, TerminalSecretSource,
};
pub use mock_runner::{MockCommandRunner, RecordedCall};
pub use real_runner::ProcessCommandRunner;

/// Exit code and captured text of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output followed by standard error.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }
}

/// Runs external programs on behalf of the migration.
pub trait CommandRunner {
    /// Runs a command to completion and captures its output.
    ///
    /// A non-zero exit code is not an error here; callers decide which
    /// commands are checked. Failing to launch the program is an error.
    fn run(&self, command: &CommandInfo) -> Result<CommandOutput>;

    /// Runs a command that may prompt on its error stream and answers the
    /// prompts, returning the exit code.
    ///
    /// `password` answers password prompts; when absent the operator is
    /// asked instead.
    fn run_interactive(&self, command: &CommandInfo, password: Option<&str>) -> Result<i32>;
}
