use std::collections::{HashMap, HashSet};
use std::env;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{CommandOutput, CommandRunner};
use crate::constants::ENV_COMMITTER_DATE;
use crate::core::CommandInfo;
use crate::error::{MigrateError, Result};

/// One invocation seen by [`MockCommandRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: CommandInfo,
    /// Value of the committer-date override when the call was made
    pub committer_date: Option<String>,
    pub interactive: bool,
    pub password: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<CommandInfo, CommandOutput>,
    missing_programs: HashSet<String>,
    default_exit_code: i32,
    calls: Vec<RecordedCall>,
}

/// Mock implementation of CommandRunner for testing
///
/// Commands without a scripted response succeed with empty output. Clones
/// share the same state, so a test can keep one handle for assertions
/// while the code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MockCommandRunner {
    state: Arc<Mutex<MockState>>,
}

impl MockCommandRunner {
    /// Create a new mock where every command succeeds silently
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Script the full result of a `git` invocation
    pub fn respond(&self, arguments: &str, output: CommandOutput) -> &Self {
        self.respond_to(CommandInfo::git(arguments), output)
    }

    /// Script the full result of any invocation
    pub fn respond_to(&self, command: CommandInfo, output: CommandOutput) -> &Self {
        self.state().responses.insert(command, output);
        self
    }

    /// Script a successful `git` invocation printing `stdout`
    pub fn respond_stdout(&self, arguments: &str, stdout: &str) -> &Self {
        self.respond(arguments, CommandOutput::new(0, stdout, ""))
    }

    /// Script a `git` invocation printing `stderr` with the given exit code
    pub fn respond_stderr(&self, arguments: &str, exit_code: i32, stderr: &str) -> &Self {
        self.respond(arguments, CommandOutput::new(exit_code, "", stderr))
    }

    /// Exit code for commands without a scripted response
    pub fn set_default_exit_code(&self, exit_code: i32) -> &Self {
        self.state().default_exit_code = exit_code;
        self
    }

    /// Make every invocation of `program` fail to launch
    pub fn set_missing_program(&self, program: &str) -> &Self {
        self.state().missing_programs.insert(program.to_string());
        self
    }

    /// Every invocation so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Argument strings of every invocation so far, in order
    pub fn arguments(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .map(|c| c.command.arguments.clone())
            .collect()
    }

    /// Number of invocations with exactly these arguments
    pub fn count(&self, arguments: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.command.arguments == arguments)
            .count()
    }

    pub fn was_called(&self, arguments: &str) -> bool {
        self.count(arguments) > 0
    }

    /// Recorded call with exactly these arguments, first match
    pub fn find(&self, arguments: &str) -> Option<RecordedCall> {
        self.state()
            .calls
            .iter()
            .find(|c| c.command.arguments == arguments)
            .cloned()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    fn record(
        &self,
        command: &CommandInfo,
        interactive: bool,
        password: Option<&str>,
    ) -> Result<CommandOutput> {
        let mut state = self.state();
        if state.missing_programs.contains(&command.command) {
            return Err(MigrateError::CommandNotFound {
                program: command.command.clone(),
            });
        }

        state.calls.push(RecordedCall {
            command: command.clone(),
            committer_date: env::var(ENV_COMMITTER_DATE).ok(),
            interactive,
            password: password.map(str::to_string),
        });

        let default_exit_code = state.default_exit_code;
        Ok(state
            .responses
            .get(command)
            .cloned()
            .unwrap_or_else(|| CommandOutput::new(default_exit_code, "", "")))
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command: &CommandInfo) -> Result<CommandOutput> {
        self.record(command, false, None)
    }

    fn run_interactive(&self, command: &CommandInfo, password: Option<&str>) -> Result<i32> {
        self.record(command, true, password).map(|o| o.exit_code)
    }
}
