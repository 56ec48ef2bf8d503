//! Cloning and ref discovery
//!
//! The [`Grabber`] runs `git svn init` and `git svn fetch` for a new
//! migration, and produces the [`MetaInfo`] snapshot the later steps work
//! on. In rebase-branch mode it narrows the snapshot to a single branch.

use tracing::debug;

use crate::config::Options;
use crate::constants::*;
use crate::core::{parse_branch_list, svn_tags, CommandInfo, MetaInfo};
use crate::display::MessageDisplayer;
use crate::error::{MigrateError, Result};
use crate::identity::GitConfigCommand;
use crate::runner::CommandRunner;

pub struct Grabber<'a, R: CommandRunner + ?Sized> {
    svn_url: String,
    options: &'a Options,
    runner: &'a R,
    config: GitConfigCommand,
    displayer: &'a dyn MessageDisplayer,
    meta_info: MetaInfo,
}

impl<'a, R: CommandRunner + ?Sized> Grabber<'a, R> {
    pub fn new(
        svn_url: impl Into<String>,
        options: &'a Options,
        runner: &'a R,
        config: GitConfigCommand,
        displayer: &'a dyn MessageDisplayer,
    ) -> Self {
        Self {
            svn_url: svn_url.into(),
            options,
            runner,
            config,
            displayer,
            meta_info: MetaInfo {
                tags: Some(Vec::new()),
                ..MetaInfo::default()
            },
        }
    }

    pub fn meta_info(&self) -> &MetaInfo {
        &self.meta_info
    }

    pub fn into_meta_info(self) -> MetaInfo {
        self.meta_info
    }

    /// Tag subpaths passed to `git svn init`; `tags` unless overridden
    fn tag_paths(&self) -> Option<Vec<String>> {
        self.options.tags.as_ref().map(|tags| {
            if tags.is_empty() {
                vec![DEFAULT_TAGS_PATH.to_string()]
            } else {
                tags.clone()
            }
        })
    }

    /// Branch subpaths passed to `git svn init`; `branches` unless overridden
    fn branch_paths(&self) -> Option<Vec<String>> {
        self.options.branches.as_ref().map(|branches| {
            if branches.is_empty() {
                vec![DEFAULT_BRANCHES_PATH.to_string()]
            } else {
                branches.clone()
            }
        })
    }

    /// Arguments of `git svn init` for the configured layout
    pub fn init_command(&self) -> CommandInfo {
        let mut arguments = format!("{GIT_SVN_INIT_ARGS} ");

        if let Some(username) = self.options.username.as_deref().filter(|u| !u.trim().is_empty()) {
            arguments.push_str(&format!("--username=\"{username}\" "));
        }
        if !self.options.metadata {
            arguments.push_str("--no-metadata ");
        }
        if self.options.no_minimize_url {
            arguments.push_str("--no-minimize-url ");
        }

        if self.options.root_is_trunk {
            // The repository root is the trunk; there are no tags or branches
            arguments.push_str(&format!("--trunk=\"{}\"", self.svn_url));
        } else {
            if let Some(trunk) = &self.options.trunk {
                arguments.push_str(&format!("--trunk=\"{trunk}\" "));
            }
            for tag in self.tag_paths().unwrap_or_default() {
                arguments.push_str(&format!("--tags=\"{tag}\" "));
            }
            for branch in self.branch_paths().unwrap_or_default() {
                arguments.push_str(&format!("--branches=\"{branch}\" "));
            }
            arguments.push_str(&self.svn_url);
        }

        CommandInfo::git(arguments)
    }

    /// Arguments of `git svn fetch`, with the revision range and path
    /// exclusions applied
    pub fn fetch_command(&self) -> CommandInfo {
        let mut arguments = format!("{GIT_SVN_FETCH_ARGS} ");

        if let Some(range) = &self.options.revision {
            arguments.push_str(&format!("-r {}:{} ", range.start, range.end));
        }

        if !self.options.exclude.is_empty() {
            let mut layout = Vec::new();
            if !self.options.root_is_trunk {
                if let Some(trunk) = &self.options.trunk {
                    layout.push(format!(r"{trunk}[\/]"));
                }
                for tag in self.tag_paths().unwrap_or_default() {
                    layout.push(format!(r"{tag}[\/][^\/]+[\/]"));
                }
                for branch in self.branch_paths().unwrap_or_default() {
                    layout.push(format!(r"{branch}[\/][^\/]+[\/]"));
                }
            }
            let regex = format!(
                "^(?:{})(?:{})",
                layout.join("|"),
                self.options.exclude.join("|")
            );
            arguments.push_str(&format!("--ignore-paths=\"{regex}\" "));
        }

        CommandInfo::git(arguments.trim_end())
    }

    /// Initializes the git-svn repository, fetches the history and reads
    /// the resulting refs.
    pub fn clone_repository(&mut self) -> Result<()> {
        debug!("{MSG_START_CLONE}");

        let init = self.init_command();
        let exit_code = self
            .runner
            .run_interactive(&init, self.options.password.as_deref())?;
        if exit_code != 0 {
            return Err(MigrateError::CommandExecutionFailed {
                command: init.to_string(),
            });
        }

        if let Some(authors) = self.options.authors.as_deref().filter(|a| !a.trim().is_empty()) {
            self.runner.run(&self.config.authors_file(authors))?;
        }

        let fetch = self.fetch_command();
        if !self.runner.run(&fetch)?.success() {
            return Err(MigrateError::CommandExecutionFailed {
                command: fetch.to_string(),
            });
        }

        self.fetch_branches()?;
        debug!("{MSG_END_CLONE}");
        Ok(())
    }

    fn list_branches(&self, local: bool) -> Result<Vec<String>> {
        let output = self.runner.run(&CommandInfo::list_branches(local))?;
        let branches = parse_branch_list(&output.stdout);
        debug!(
            count = branches.len(),
            local,
            "Fetched branches: {}",
            branches.join(", ")
        );
        Ok(branches)
    }

    /// Reads local and remote branches; tags are the remotes under `svn/tags/`.
    pub fn fetch_branches(&mut self) -> Result<()> {
        let local_branches = self.list_branches(true)?;
        let remote_branches = self.list_branches(false)?;
        let tags = svn_tags(&remote_branches);
        debug!("We have {} tags: {}", tags.len(), tags.join(", "));

        self.meta_info = MetaInfo {
            local_branches,
            remote_branches,
            tags: Some(tags),
        };
        Ok(())
    }

    /// Narrows the snapshot to the branch being rebased.
    ///
    /// Exactly one local branch must match. Up to two remote refs may
    /// match: the SVN branch itself and a pushed copy of it. Tags and
    /// nested SVN paths ending in the same name never match.
    pub fn fetch_rebase_branches(&mut self, target: &str) -> Result<()> {
        self.fetch_branches()?;

        let local: Vec<String> = self
            .meta_info
            .local_branches
            .iter()
            .filter(|b| b.as_str() == target)
            .cloned()
            .collect();
        let remote: Vec<String> = self
            .meta_info
            .remote_branches
            .iter()
            .filter(|b| is_remote_copy_of(b, target))
            .cloned()
            .collect();

        if local.is_empty() {
            return Err(MigrateError::NoLocalBranchFound {
                branch: target.to_string(),
            });
        }
        if local.len() > 1 {
            return Err(MigrateError::TooManyMatchingLocalBranches);
        }
        if remote.len() > 2 {
            return Err(MigrateError::TooManyMatchingRemoteBranches);
        }
        if remote.is_empty() {
            return Err(MigrateError::NoRemoteBranchFound {
                branch: target.to_string(),
            });
        }

        self.displayer
            .show(&format!("Local branches \"{}\" found", local[0]));
        self.displayer
            .show(&format!("Remote branches \"{}\" found", remote.join(" ")));

        // Only the requested branch is rebased; its tags are left alone
        self.meta_info = MetaInfo {
            local_branches: local,
            remote_branches: remote,
            tags: Some(Vec::new()),
        };
        Ok(())
    }
}

/// True for `target` itself or `<remote>/<target>` with a single-level
/// remote namespace such as `svn` or `origin`.
fn is_remote_copy_of(remote: &str, target: &str) -> bool {
    if remote == target {
        return true;
    }
    remote
        .strip_suffix(target)
        .and_then(|rest| rest.strip_suffix('/'))
        .is_some_and(|namespace| !namespace.is_empty() && !namespace.contains('/'))
}
