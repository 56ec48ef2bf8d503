//! Git identity handling for tag reconstruction
//!
//! Recreating a tag borrows the author of the tagged commit: `user.name`,
//! `user.email` and `GIT_COMMITTER_DATE` are overridden while the tag is
//! written. Both overrides are held by guards that put the previous values
//! back when dropped, so an early return cannot leak them.

use std::env;
use std::ffi::OsString;

use tracing::{debug, warn};

use crate::constants::*;
use crate::core::{quote_argument, remove_from_two_ends, CommandInfo};
use crate::error::Result;
use crate::runner::CommandRunner;

/// Invocation form of `git config` supported by the installed git.
///
/// Older releases reject `--local`; they are driven with plain `config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitConfigCommand {
    arguments: &'static str,
}

impl Default for GitConfigCommand {
    fn default() -> Self {
        Self::local()
    }
}

impl GitConfigCommand {
    pub fn local() -> Self {
        Self {
            arguments: GIT_CONFIG_LOCAL_ARGS,
        }
    }

    pub fn plain() -> Self {
        Self {
            arguments: GIT_CONFIG_ARGS,
        }
    }

    /// Probes the installed git once and picks the supported form.
    pub fn detect<R: CommandRunner + ?Sized>(runner: &R) -> Result<Self> {
        let probe = CommandInfo::git(format!(
            "{GIT_CONFIG_LOCAL_ARGS} --get {GIT_USER_NAME_KEY}"
        ));
        let output = runner.run(&probe)?;
        let form = if output.combined().contains(CONFIG_UNKNOWN_OPTION) {
            Self::plain()
        } else {
            Self::local()
        };
        debug!("Using git config form: {}", form.arguments);
        Ok(form)
    }

    pub fn arguments(&self) -> &'static str {
        self.arguments
    }

    /// `git {config} --get {key}`
    pub fn get(&self, key: &str) -> CommandInfo {
        CommandInfo::git(format!("{} --get {key}", self.arguments))
    }

    /// `git {config} {key} "{value}"`, where `value` is already escaped
    pub fn set(&self, key: &str, value: &str) -> CommandInfo {
        CommandInfo::git(format!("{} {key} \"{value}\"", self.arguments))
    }

    /// Sets `key` so that it reads back exactly as `value`.
    pub fn set_verbatim(&self, key: &str, value: &str) -> CommandInfo {
        CommandInfo::git(format!("{} {key} {}", self.arguments, quote_argument(value)))
    }

    /// `git {config} --unset {key}`
    pub fn unset(&self, key: &str) -> CommandInfo {
        CommandInfo::git(format!("{} --unset {key}", self.arguments))
    }

    /// `git {config} svn.authorsfile {path}`
    pub fn authors_file(&self, path: &str) -> CommandInfo {
        CommandInfo::git(format!("{} {GIT_AUTHORS_FILE_KEY} {path}", self.arguments))
    }

    /// Reads a key, treating an empty answer as unset.
    pub fn read<R: CommandRunner + ?Sized>(&self, runner: &R, key: &str) -> Result<Option<String>> {
        let output = runner.run(&self.get(key))?;
        let value = output.stdout.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }
}

/// Saved `user.name` / `user.email`, restored when dropped.
pub struct IdentityGuard<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    config: GitConfigCommand,
    saved_name: Option<String>,
    saved_email: Option<String>,
    restore_on_drop: bool,
}

impl<'a, R: CommandRunner + ?Sized> IdentityGuard<'a, R> {
    /// Remembers the current identity.
    ///
    /// With `restore_on_drop` false the guard only records; nothing is
    /// written back when it goes out of scope.
    pub fn acquire(runner: &'a R, config: GitConfigCommand, restore_on_drop: bool) -> Result<Self> {
        let saved_name = config.read(runner, GIT_USER_NAME_KEY)?;
        let saved_email = config.read(runner, GIT_USER_EMAIL_KEY)?;
        debug!(?saved_name, ?saved_email, "Saved git identity");
        Ok(Self {
            runner,
            config,
            saved_name,
            saved_email,
            restore_on_drop,
        })
    }

    pub fn saved_name(&self) -> Option<&str> {
        self.saved_name.as_deref()
    }

    pub fn saved_email(&self) -> Option<&str> {
        self.saved_email.as_deref()
    }

    /// Overrides the identity. Both values must already be escaped.
    pub fn apply(&self, name: &str, email: &str) -> Result<()> {
        self.runner.run(&self.config.set(GIT_USER_NAME_KEY, name))?;
        self.runner.run(&self.config.set(GIT_USER_EMAIL_KEY, email))?;
        Ok(())
    }

    fn restore_key(&self, key: &str, saved: Option<&str>) {
        let command = match saved {
            Some(value) => self.config.set_verbatim(key, value),
            None => self.config.unset(key),
        };
        if let Err(e) = self.runner.run(&command) {
            warn!("Failed to restore {key}: {e}");
        }
    }
}

impl<R: CommandRunner + ?Sized> Drop for IdentityGuard<'_, R> {
    fn drop(&mut self) {
        if !self.restore_on_drop {
            return;
        }
        self.restore_key(GIT_USER_NAME_KEY, self.saved_name.as_deref());
        self.restore_key(GIT_USER_EMAIL_KEY, self.saved_email.as_deref());
        debug!("Restored git identity");
    }
}

/// Process-wide `GIT_COMMITTER_DATE` override, reverted when dropped.
///
/// The variable is put back to its previous value, or removed if it was
/// not set before.
pub struct CommitterDateGuard {
    previous: Option<OsString>,
}

impl CommitterDateGuard {
    pub fn set(value: &str) -> Self {
        let previous = env::var_os(ENV_COMMITTER_DATE);
        env::set_var(ENV_COMMITTER_DATE, value);
        Self { previous }
    }
}

impl Drop for CommitterDateGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => env::set_var(ENV_COMMITTER_DATE, value),
            None => env::remove_var(ENV_COMMITTER_DATE),
        }
    }
}

/// Metadata of the commit a tag points at, as printed by `git log`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitIdentity {
    pub subject: String,
    pub date: String,
    pub author_name: String,
    pub author_email: String,
}

impl CommitIdentity {
    /// Queries the newest commit of `reference` one field at a time.
    ///
    /// `reference` must already be quote-escaped. Exit codes are ignored;
    /// a failed query yields an empty field.
    pub fn query<R: CommandRunner + ?Sized>(runner: &R, reference: &str) -> Result<Self> {
        let field = |format: &str| -> Result<String> {
            let output = runner.run(&CommandInfo::log_format(format, reference))?;
            Ok(remove_from_two_ends(output.stdout.trim(), '\'').to_string())
        };

        Ok(Self {
            subject: field("%s")?,
            date: field("%ci")?,
            author_name: field("%an")?,
            author_email: field("%ae")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, MockCommandRunner};
    use serial_test::serial;

    #[test]
    fn test_detect_local_form() {
        let mock = MockCommandRunner::new();
        let config = GitConfigCommand::detect(&mock).unwrap();
        assert_eq!(config, GitConfigCommand::local());
        assert!(mock.was_called("config --local --get user.name"));
    }

    #[test]
    fn test_detect_plain_form_on_unknown_option() {
        let mock = MockCommandRunner::new();
        mock.respond_stderr(
            "config --local --get user.name",
            129,
            "error: unknown option `local'",
        );
        let config = GitConfigCommand::detect(&mock).unwrap();
        assert_eq!(config.arguments(), "config");
        assert_eq!(config.unset("user.email").arguments, "config --unset user.email");
    }

    #[test]
    fn test_config_command_shapes() {
        let config = GitConfigCommand::local();
        assert_eq!(config.set("user.name", "Bob").arguments, "config --local user.name \"Bob\"");
        assert_eq!(config.get("user.email").arguments, "config --local --get user.email");
        assert_eq!(
            config.authors_file("/home/u/.svn2git/authors").arguments,
            "config --local svn.authorsfile /home/u/.svn2git/authors"
        );
    }

    #[test]
    fn test_guard_restores_saved_and_unsets_missing() {
        let mock = MockCommandRunner::new();
        mock.respond_stdout("config --local --get user.name", "Alice\n");
        {
            let guard = IdentityGuard::acquire(&mock, GitConfigCommand::local(), true).unwrap();
            assert_eq!(guard.saved_name(), Some("Alice"));
            assert_eq!(guard.saved_email(), None);
            guard.apply("Bob", "Bob").unwrap();
        }
        let args = mock.arguments();
        assert_eq!(
            &args[args.len() - 2..],
            &[
                "config --local user.name \"Alice\"".to_string(),
                "config --local --unset user.email".to_string(),
            ]
        );
    }

    #[test]
    fn test_guard_without_restore_writes_nothing_on_drop() {
        let mock = MockCommandRunner::new();
        {
            let _guard = IdentityGuard::acquire(&mock, GitConfigCommand::local(), false).unwrap();
        }
        assert_eq!(mock.calls().len(), 2);
    }

    #[test]
    #[serial]
    fn test_committer_date_guard_restores_unset() {
        env::remove_var(ENV_COMMITTER_DATE);
        {
            let _guard = CommitterDateGuard::set("2010-01-01 10:00:00 +0000");
            assert_eq!(
                env::var(ENV_COMMITTER_DATE).unwrap(),
                "2010-01-01 10:00:00 +0000"
            );
        }
        assert!(env::var_os(ENV_COMMITTER_DATE).is_none());
    }

    #[test]
    #[serial]
    fn test_committer_date_guard_restores_previous() {
        env::set_var(ENV_COMMITTER_DATE, "before");
        {
            let _guard = CommitterDateGuard::set("during");
        }
        assert_eq!(env::var(ENV_COMMITTER_DATE).unwrap(), "before");
        env::remove_var(ENV_COMMITTER_DATE);
    }

    #[test]
    fn test_commit_identity_strips_quotes() {
        let mock = MockCommandRunner::new();
        mock.respond(
            "log -1 --pretty=format:'%s' \"svn/tags/v1\"",
            CommandOutput::new(0, "'Release v1'", ""),
        );
        mock.respond_stdout("log -1 --pretty=format:'%an' \"svn/tags/v1\"", "'Carol'");
        let identity = CommitIdentity::query(&mock, "svn/tags/v1").unwrap();
        assert_eq!(identity.subject, "Release v1");
        assert_eq!(identity.author_name, "Carol");
        assert_eq!(identity.date, "");
        assert_eq!(mock.calls().len(), 4);
    }
}
