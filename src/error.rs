//! Error types for the migration
//!
//! Every failure that aborts a run is a [`MigrateError`]. Sub-commands that
//! the reconciliation steps run best-effort never produce one of these; only
//! their output text is inspected.
//!
//! # Example
//!
//! ```
//! use svn2git::error::MigrateError;
//!
//! let err = MigrateError::CommandExecutionFailed {
//!     command: "git svn fetch".to_string(),
//! };
//! assert_eq!(err.to_string(), "Fail to execute command 'git svn fetch'");
//! ```

use thiserror::Error;

/// Errors raised while migrating a repository.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The external program could not be launched.
    #[error("Command {program} does not exist. Did you install it or add it to the Environment path?")]
    CommandNotFound { program: String },

    /// A command whose exit code is checked returned non-zero.
    #[error("Fail to execute command '{command}'")]
    CommandExecutionFailed { command: String },

    /// More than one local branch matched the rebase target.
    #[error("Too many matching local branches found.")]
    TooManyMatchingLocalBranches,

    /// More than two remote branches matched the rebase target.
    #[error("Too many matching remote branches found.")]
    TooManyMatchingRemoteBranches,

    /// No local branch matched the rebase target.
    #[error("No local branch named '{branch}' found.")]
    NoLocalBranchFound { branch: String },

    /// No remote branch matched the rebase target.
    #[error("No remote branch named '{branch}' found.")]
    NoRemoteBranchFound { branch: String },

    #[error("Too many arguments.")]
    TooManyArguments,

    #[error("Missing SVN_URL parameter.")]
    MissingSvnUrl,

    #[error("You have local pending changes. The working tree must be clean in order to continue.")]
    WorkingTreeNotClean,

    /// The `--revision` value is not `START` or `START:END`.
    #[error("Invalid revision range '{revision}'. Expected START_REV[:END_REV].")]
    InvalidRevision { revision: String },

    /// A defaults file exists but cannot be parsed.
    #[error("Invalid configuration file {path}: {message}")]
    Config { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MigrateError {
    /// True for the errors that mean "rebase target lookup was ambiguous".
    pub fn is_ambiguous_branch_match(&self) -> bool {
        matches!(
            self,
            MigrateError::TooManyMatchingLocalBranches | MigrateError::TooManyMatchingRemoteBranches
        )
    }

    /// True for the errors that mean "rebase target lookup found nothing".
    pub fn is_no_matching_branch(&self) -> bool {
        matches!(
            self,
            MigrateError::NoLocalBranchFound { .. } | MigrateError::NoRemoteBranchFound { .. }
        )
    }
}

/// Result alias used by every fallible operation in the library.
pub type Result<T> = std::result::Result<T, MigrateError>;
