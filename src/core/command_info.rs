//! Descriptions of external invocations
//!
//! A [`CommandInfo`] is a (program, argument string) pair describing one
//! command to run. The reconciliation steps build these and hand them to a
//! [`CommandRunner`](crate::runner::CommandRunner), so the decisions they
//! make can be checked without spawning any process.

use std::fmt;

use crate::constants::*;

/// One external invocation: program name plus its argument string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandInfo {
    pub command: String,
    pub arguments: String,
}

impl CommandInfo {
    pub fn new(command: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            arguments: arguments.into(),
        }
    }

    /// A `git` invocation with the given argument string.
    pub fn git(arguments: impl Into<String>) -> Self {
        Self::new(GIT_CMD, arguments)
    }

    /// `git svn fetch`
    pub fn svn_fetch() -> Self {
        Self::git(GIT_SVN_FETCH_ARGS)
    }

    /// `git branch --track "{branch}" "remotes/svn/{branch}"`
    pub fn branch_track(branch: &str) -> Self {
        Self::git(format!(
            "branch --track \"{branch}\" \"{SVN_REMOTES_PREFIX}{branch}\""
        ))
    }

    /// `git checkout -b "{branch}" "remotes/svn/{branch}"`
    pub fn checkout_svn_remote_branch(branch: &str) -> Self {
        Self::git(format!(
            "checkout -b \"{branch}\" \"{SVN_REMOTES_PREFIX}{branch}\""
        ))
    }

    /// `git checkout "{branch}"`
    pub fn checkout_local_branch(branch: &str) -> Self {
        Self::git(format!("checkout \"{branch}\""))
    }

    /// `git checkout -f "{branch}"`
    pub fn force_checkout_local_branch(branch: &str) -> Self {
        Self::git(format!("checkout -f \"{branch}\""))
    }

    /// `git rebase "remotes/svn/{branch}"`
    pub fn rebase_remote_svn_branch(branch: &str) -> Self {
        Self::git(format!("rebase \"{SVN_REMOTES_PREFIX}{branch}\""))
    }

    /// `git branch -l --no-color` or `git branch -r --no-color`
    pub fn list_branches(local: bool) -> Self {
        if local {
            Self::git(GIT_LIST_LOCAL_BRANCHES_ARGS)
        } else {
            Self::git(GIT_LIST_REMOTE_BRANCHES_ARGS)
        }
    }

    /// `git log -1 --pretty=format:'{format}' "{reference}"`
    ///
    /// `reference` must already be quote-escaped.
    pub fn log_format(format: &str, reference: &str) -> Self {
        Self::git(format!(
            "log -1 --pretty=format:'{format}' \"{reference}\""
        ))
    }

    /// `git tag -a -m "{message}" "{name}" "{target}"`
    ///
    /// All three values must already be quote-escaped.
    pub fn annotated_tag(message: &str, name: &str, target: &str) -> Self {
        Self::git(format!(
            "tag -a -m \"{message}\" \"{name}\" \"{target}\""
        ))
    }

    /// `git branch -d -r "{reference}"`
    pub fn delete_remote_branch(reference: &str) -> Self {
        Self::git(format!("branch -d -r \"{reference}\""))
    }

    /// `git status --porcelain --untracked-files=no`
    pub fn status_porcelain() -> Self {
        Self::git(GIT_STATUS_PORCELAIN_ARGS)
    }

    /// `git gc`
    pub fn gc() -> Self {
        Self::git(GIT_GC_ARGS)
    }
}

impl fmt::Display for CommandInfo {
    /// Renders the full command line, e.g. `git checkout -f "master"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.command, self.arguments)
    }
}
