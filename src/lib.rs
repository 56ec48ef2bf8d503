//! svn2git - Subversion to Git migration
//!
//! svn2git drives `git svn` to import a Subversion repository and then
//! rewrites the imported refs into conventional Git form: local branches
//! for SVN branches, annotated tags for SVN tags and `master` for trunk.
//!
//! # Features
//!
//! - **Interactive Import**: Answers password and certificate prompts of
//!   `git svn` while it runs
//! - **Branch Reconciliation**: Creates or rebases local branches, falling
//!   back to untracked branches on git versions that refuse tracking
//! - **Tag Reconstruction**: Annotated tags keep the original author and
//!   date; the git identity is restored afterwards
//! - **Rebase Mode**: Pull new SVN revisions into an earlier migration
//!
//! # Architecture
//!
//! - [`core`] - Command descriptions, ref snapshot, prompt recognition and
//!   text helpers (no process spawning)
//! - [`runner`] - Command execution, real and recorded
//! - [`grabber`] - `git svn init` / `fetch` and ref discovery
//! - [`fixer`] - Branch, tag and trunk reconciliation
//! - [`identity`] - Scoped overrides of the git identity and committer date
//! - [`migrator`] - The full migration sequence
//! - [`config`] / [`cli`] - Options from flags and defaults files
//!
//! # Usage Example
//!
//! ```no_run
//! use svn2git::config::Options;
//! use svn2git::display::ConsoleDisplayer;
//! use svn2git::migrator::Migrator;
//! use svn2git::runner::ProcessCommandRunner;
//!
//! let options = Options {
//!     trunk: Some("trunk".to_string()),
//!     branches: Some(Vec::new()),
//!     tags: Some(Vec::new()),
//!     ..Options::default()
//! };
//! let args = vec!["svn://svn.example.com/project".to_string()];
//! let runner = ProcessCommandRunner::new();
//!
//! Migrator::new(&options, &args, &runner, &ConsoleDisplayer)
//!     .run()
//!     .expect("migration failed");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod display;
pub mod error;
pub mod fixer;
pub mod grabber;
pub mod identity;
pub mod logging;
pub mod migrator;
pub mod runner;
pub mod utils;

pub use error::{MigrateError, Result};
