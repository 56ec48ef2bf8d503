//! Configuration management for svn2git
//!
//! The effective [`Options`] of a run combine three sources, highest
//! priority first:
//!
//! 1. Command-line flags ([`CliArgs`])
//! 2. A defaults file: `.svn2git.toml` in the current directory, otherwise
//!    `~/.svn2git/config.toml`
//! 3. Built-in defaults (`trunk`, `branches`, `tags`)
//!
//! # File Format
//!
//! ```toml
//! [defaults]
//! authors = "~/.svn2git/authors"
//! username = "alice"
//! trunk = "trunk"
//! branches = ["branches", "feature-branches"]
//! tags = ["tags"]
//! exclude = ["docs"]
//! verbose = false
//! local_branch_match = "either"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::constants::*;
use crate::core::CommandInfo;
use crate::error::{MigrateError, Result};
use crate::runner::CommandRunner;

/// How a remote SVN branch is matched against existing local branches.
///
/// Different releases of the classic tool compared either the `svn/`
/// prefixed remote name or the bare branch name. `Either` accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalBranchMatch {
    Prefixed,
    Bare,
    #[default]
    Either,
}

impl LocalBranchMatch {
    /// True when the remote branch `prefixed` (bare name `bare`) already has
    /// a local counterpart according to `contains`.
    pub fn matches(self, prefixed: &str, bare: &str, contains: impl Fn(&str) -> bool) -> bool {
        match self {
            LocalBranchMatch::Prefixed => contains(prefixed),
            LocalBranchMatch::Bare => contains(bare),
            LocalBranchMatch::Either => contains(prefixed) || contains(bare),
        }
    }
}

/// What the run does with the repository.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MigrationMode {
    /// Initialize and fetch a new git-svn repository
    #[default]
    Clone,
    /// Fetch new SVN revisions into an existing migration and rebase all branches
    Rebase,
    /// Like `Rebase`, but only for one branch
    RebaseBranch(String),
}

/// `--revision START[:END]`, with END defaulting to `HEAD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    pub start: String,
    pub end: String,
}

impl RevisionRange {
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || MigrateError::InvalidRevision {
            revision: value.to_string(),
        };

        let mut parts = value.split(':');
        let start = parts.next().map(str::trim).unwrap_or_default();
        let end = parts.next().map(str::trim).unwrap_or_default();
        if start.is_empty() || parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            start: start.to_string(),
            end: if end.is_empty() {
                GIT_REVISION_HEAD.to_string()
            } else {
                end.to_string()
            },
        })
    }
}

/// Validated settings of one migration run.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub verbose: bool,
    pub metadata: bool,
    pub no_minimize_url: bool,
    pub root_is_trunk: bool,
    /// Trunk subpath; `None` with `--notrunk`
    pub trunk: Option<String>,
    /// Branch subpaths; `None` with `--nobranches`, empty means the default
    pub branches: Option<Vec<String>>,
    /// Tag subpaths; `None` with `--notags`, empty means the default
    pub tags: Option<Vec<String>>,
    pub exclude: Vec<String>,
    pub revision: Option<RevisionRange>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub authors: Option<String>,
    pub mode: MigrationMode,
    pub local_branch_match: LocalBranchMatch,
}

impl Options {
    /// True for both rebase modes
    pub fn is_rebase(&self) -> bool {
        self.mode != MigrationMode::Clone
    }

    /// Merges command-line flags over the defaults file.
    pub fn resolve(cli: &CliArgs, config: &Config) -> Result<Self> {
        let defaults = &config.defaults;

        let trunk = if cli.no_trunk {
            None
        } else {
            cli.trunk
                .clone()
                .or_else(|| defaults.trunk.clone())
                .or_else(|| Some(DEFAULT_TRUNK_PATH.to_string()))
                .filter(|t| !t.trim().is_empty())
        };

        let branches = (!cli.no_branches).then(|| {
            if cli.branches.is_empty() {
                defaults.branches.clone()
            } else {
                cli.branches.clone()
            }
        });

        let tags = (!cli.no_tags).then(|| {
            if cli.tags.is_empty() {
                defaults.tags.clone()
            } else {
                cli.tags.clone()
            }
        });

        let exclude = if cli.exclude.is_empty() {
            defaults.exclude.clone()
        } else {
            cli.exclude.clone()
        };

        let revision = cli
            .revision
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(RevisionRange::parse)
            .transpose()?;

        let authors = cli
            .authors
            .clone()
            .or_else(|| defaults.authors.as_deref().map(expand_home))
            .filter(|a| !a.trim().is_empty())
            .or_else(default_authors_file);

        let mode = match (&cli.rebase_branch, cli.rebase) {
            (Some(branch), _) => MigrationMode::RebaseBranch(branch.clone()),
            (None, true) => MigrationMode::Rebase,
            (None, false) => MigrationMode::Clone,
        };

        Ok(Self {
            verbose: cli.verbose || defaults.verbose,
            metadata: cli.metadata,
            no_minimize_url: cli.no_minimize_url,
            root_is_trunk: cli.root_is_trunk,
            trunk,
            branches,
            tags,
            exclude,
            revision,
            username: cli.username.clone().or_else(|| defaults.username.clone()),
            password: cli.password.clone(),
            authors,
            mode,
            local_branch_match: defaults.local_branch_match,
        })
    }

    /// Checks the positional arguments and, in rebase modes, that the
    /// working tree is clean.
    pub fn validate<R: CommandRunner + ?Sized>(&self, args: &[String], runner: &R) -> Result<()> {
        if self.is_rebase() {
            if args.len() > 1 {
                return Err(MigrateError::TooManyArguments);
            }
            return verify_working_tree_is_clean(runner);
        }

        match args.len() {
            0 => Err(MigrateError::MissingSvnUrl),
            1 => Ok(()),
            _ => Err(MigrateError::TooManyArguments),
        }
    }
}

fn verify_working_tree_is_clean<R: CommandRunner + ?Sized>(runner: &R) -> Result<()> {
    let command = CommandInfo::status_porcelain();
    let output = runner.run(&command)?;
    if !output.success() {
        return Err(MigrateError::CommandExecutionFailed {
            command: command.to_string(),
        });
    }
    if !output.stdout.trim().is_empty() || !output.stderr.trim().is_empty() {
        return Err(MigrateError::WorkingTreeNotClean);
    }
    Ok(())
}

/// Contents of a defaults file
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

/// The `[defaults]` table
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Defaults {
    pub authors: Option<String>,
    pub username: Option<String>,
    pub trunk: Option<String>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub local_branch_match: LocalBranchMatch,
}

impl Config {
    /// Loads the first defaults file found, or the built-in defaults.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from_dirs(&cwd, dirs::home_dir().as_deref())
    }

    /// Lookup against explicit directories: `{cwd}/.svn2git.toml`, then
    /// `{home}/.svn2git/config.toml`.
    pub fn load_from_dirs(cwd: &Path, home: Option<&Path>) -> Result<Self> {
        let local = cwd.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::load_from_file(&local);
        }

        if let Some(home) = home {
            let global = home.join(HOME_CONFIG_DIR).join(HOME_CONFIG_FILE_NAME);
            if global.is_file() {
                return Self::load_from_file(&global);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MigrateError::Config {
            path: path.display().to_string(),
            message: e.message().to_string(),
        })
    }
}

/// `~/.svn2git/authors` when that file exists
pub fn default_authors_file() -> Option<String> {
    let path: PathBuf = dirs::home_dir()?
        .join(HOME_CONFIG_DIR)
        .join(DEFAULT_AUTHORS_FILE_NAME);
    path.is_file().then(|| path.display().to_string())
}

/// Expands a leading `~/` to the home directory
fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).display().to_string(),
        _ => path.to_string(),
    }
}
