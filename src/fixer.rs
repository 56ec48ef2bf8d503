//! Post-processing of the refs created by `git svn`
//!
//! `git svn` leaves every SVN branch and tag as a remote-tracking ref under
//! `svn/`. The [`Fixer`] turns them into what a Git user expects:
//!
//! - local branches for the SVN branches ([`Fixer::fix_branches`])
//! - annotated tags carrying the original author and date ([`Fixer::fix_tags`])
//! - `master` pointing at the SVN trunk ([`Fixer::fix_trunk`])
//!
//! Apart from the rebase-mode fetch, the git commands run here are best
//! effort: exit codes are not checked and only the text of the tracking
//! attempt is inspected.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::Options;
use crate::constants::*;
use crate::core::{escape_quotes, strip_svn_prefix, strip_svn_tags_prefix, CommandInfo, MetaInfo};
use crate::display::MessageDisplayer;
use crate::error::{MigrateError, Result};
use crate::identity::{CommitIdentity, CommitterDateGuard, GitConfigCommand, IdentityGuard};
use crate::runner::CommandRunner;

/// Whether the installed git can create branches tracking SVN remotes.
///
/// Moves from `Unknown` to `Unsupported` at most once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingSupport {
    #[default]
    Unknown,
    Unsupported,
}

/// Whether the tracked-branch deprecation banner was already shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeprecationNotice {
    #[default]
    Pending,
    Shown,
}

/// State carried from one branch to the next during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileState {
    pub tracking: TrackingSupport,
    pub notice: DeprecationNotice,
}

impl ReconcileState {
    fn mark_tracking_unsupported(&mut self) {
        self.tracking = TrackingSupport::Unsupported;
    }

    /// True exactly once: the first time it is called.
    fn take_notice(&mut self) -> bool {
        match self.notice {
            DeprecationNotice::Pending => {
                self.notice = DeprecationNotice::Shown;
                true
            }
            DeprecationNotice::Shown => false,
        }
    }
}

/// How one remote SVN branch relates to the local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchClass {
    /// The trunk, or a branch that already exists locally.
    ///
    /// `local` is the branch to check out for a rebase: `master` for the
    /// trunk, the bare name otherwise.
    Existing { local: String },
    /// No local counterpart yet
    New,
}

pub struct Fixer<'a, R: CommandRunner + ?Sized> {
    meta_info: &'a MetaInfo,
    options: &'a Options,
    runner: &'a R,
    config: GitConfigCommand,
    displayer: &'a dyn MessageDisplayer,
}

impl<'a, R: CommandRunner + ?Sized> Fixer<'a, R> {
    pub fn new(
        meta_info: &'a MetaInfo,
        options: &'a Options,
        runner: &'a R,
        config: GitConfigCommand,
        displayer: &'a dyn MessageDisplayer,
    ) -> Self {
        Self {
            meta_info,
            options,
            runner,
            config,
            displayer,
        }
    }

    fn run(&self, command: CommandInfo) -> Result<()> {
        self.runner.run(&command)?;
        Ok(())
    }

    /// Classifies a remote SVN branch against the local branch set.
    pub fn classify(&self, remote: &str, local_branches: &HashSet<&str>) -> BranchClass {
        let prefixed = remote.trim();
        let bare = strip_svn_prefix(prefixed);

        if bare == TRUNK_BRANCH {
            return BranchClass::Existing {
                local: MASTER_BRANCH.to_string(),
            };
        }

        if self
            .options
            .local_branch_match
            .matches(prefixed, bare, |name| local_branches.contains(name))
        {
            BranchClass::Existing {
                local: bare.to_string(),
            }
        } else {
            BranchClass::New
        }
    }

    /// Creates or rebases local branches for the remote SVN branches.
    ///
    /// Returns the final reconciliation state.
    pub fn fix_branches(&self) -> Result<ReconcileState> {
        let svn_branches = self.meta_info.svn_branches();
        let rebase = self.options.is_rebase();

        if rebase {
            let fetch = CommandInfo::svn_fetch();
            if !self.runner.run(&fetch)?.success() {
                return Err(MigrateError::CommandExecutionFailed {
                    command: fetch.to_string(),
                });
            }
        }

        let local_branches: HashSet<&str> = self
            .meta_info
            .local_branches
            .iter()
            .map(|b| b.trim())
            .collect();

        let mut state = ReconcileState::default();
        for remote in &svn_branches {
            let branch = strip_svn_prefix(remote);

            match self.classify(remote, &local_branches) {
                BranchClass::Existing { local } => {
                    if rebase {
                        debug!("Rebasing {local} onto {remote}");
                        self.run(CommandInfo::force_checkout_local_branch(&local))?;
                        self.run(CommandInfo::rebase_remote_svn_branch(branch))?;
                    }
                }
                BranchClass::New => self.create_branch(branch, &mut state)?,
            }
        }

        Ok(state)
    }

    fn create_branch(&self, branch: &str, state: &mut ReconcileState) -> Result<()> {
        if state.tracking == TrackingSupport::Unsupported {
            return self.run(CommandInfo::checkout_svn_remote_branch(branch));
        }

        let output = self.runner.run(&CommandInfo::branch_track(branch))?;
        if output.combined().contains(TRACKING_SETUP_FAILURE) {
            info!("Git cannot track SVN branches; creating untracked branches from now on");
            state.mark_tracking_unsupported();
            return self.run(CommandInfo::checkout_svn_remote_branch(branch));
        }

        if state.take_notice() {
            self.displayer.warn(&tracking_deprecated_banner());
        }
        self.run(CommandInfo::checkout_local_branch(branch))
    }

    /// Recreates every SVN tag as an annotated tag and removes its remote ref.
    ///
    /// `user.name` and `user.email` are set from the tagged commit while
    /// each tag is written and restored afterwards, also on error.
    pub fn fix_tags(&self) -> Result<()> {
        let Some(tags) = &self.meta_info.tags else {
            return Ok(());
        };

        let identity = IdentityGuard::acquire(self.runner, self.config, !tags.is_empty())?;

        for tag in tags {
            let tag = tag.trim();
            let id = strip_svn_tags_prefix(tag);
            let escaped_tag = escape_quotes(tag);

            let commit = CommitIdentity::query(self.runner, &escaped_tag)?;
            let author = escape_quotes(&commit.author_name);
            // Both fields take the author name
            identity.apply(&author, &author)?;

            {
                let _date = CommitterDateGuard::set(&escape_quotes(&commit.date));
                self.run(CommandInfo::annotated_tag(
                    &escape_quotes(&commit.subject),
                    &escape_quotes(id),
                    &escaped_tag,
                ))?;
            }

            self.run(CommandInfo::delete_remote_branch(&escaped_tag))?;
            debug!("Created tag {id}");
        }

        Ok(())
    }

    /// Points `master` at the SVN trunk, or just checks it out when
    /// rebasing or when there is no trunk.
    pub fn fix_trunk(&self) -> Result<()> {
        if self.meta_info.has_remote_trunk() && !self.options.is_rebase() {
            self.run(CommandInfo::git(format!("checkout {SVN_TRUNK_BRANCH}")))?;
            self.run(CommandInfo::git(format!("branch -D {MASTER_BRANCH}")))?;
            return self.run(CommandInfo::git(format!("checkout -f -b {MASTER_BRANCH}")));
        }

        self.run(CommandInfo::git(format!("checkout -f {MASTER_BRANCH}")))
    }

    pub fn optimize_repos(&self) -> Result<()> {
        self.run(CommandInfo::gc())
    }
}
