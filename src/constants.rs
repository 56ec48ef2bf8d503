//! Constants used throughout the application
//!
//! This module centralizes the hardcoded values the migration depends on.
//! Most of them are part of the contract with external tools: the ref
//! namespace `git svn` is told to use, the exact argument shapes handed to
//! `git`, and the phrases recognized in its output. Changing any of these
//! changes observable behavior against the real binaries.
//!
//! # Organization
//!
//! - **Ref Layout**: SVN namespace prefixes and well-known branch names
//! - **Git Commands**: Program name and fixed argument strings
//! - **Recognized Output**: Phrases matched in child process output
//! - **Prompt Responses**: Answers written back to interactive prompts
//! - **UI Messages**: User-facing messages and banners
//! - **Configuration**: File names and environment variables

// Ref Layout
pub const SVN_PREFIX: &str = "svn/";
pub const SVN_TAGS_PREFIX: &str = "svn/tags/";
pub const SVN_REMOTES_PREFIX: &str = "remotes/svn/";
pub const TRUNK_BRANCH: &str = "trunk";
pub const SVN_TRUNK_BRANCH: &str = "svn/trunk";
pub const MASTER_BRANCH: &str = "master";
pub const DEFAULT_TRUNK_PATH: &str = "trunk";
pub const DEFAULT_TAGS_PATH: &str = "tags";
pub const DEFAULT_BRANCHES_PATH: &str = "branches";

// Git Commands
pub const GIT_CMD: &str = "git";
pub const GIT_SVN_FETCH_ARGS: &str = "svn fetch";
pub const GIT_SVN_INIT_ARGS: &str = "svn init --prefix=svn/";
pub const GIT_LIST_LOCAL_BRANCHES_ARGS: &str = "branch -l --no-color";
pub const GIT_LIST_REMOTE_BRANCHES_ARGS: &str = "branch -r --no-color";
pub const GIT_STATUS_PORCELAIN_ARGS: &str = "status --porcelain --untracked-files=no";
pub const GIT_GC_ARGS: &str = "gc";
pub const GIT_CONFIG_ARGS: &str = "config";
pub const GIT_CONFIG_LOCAL_ARGS: &str = "config --local";
pub const GIT_USER_NAME_KEY: &str = "user.name";
pub const GIT_USER_EMAIL_KEY: &str = "user.email";
pub const GIT_AUTHORS_FILE_KEY: &str = "svn.authorsfile";
pub const GIT_REVISION_HEAD: &str = "HEAD";

// Recognized Output
pub const CURRENT_BRANCH_MARKER: char = '*';
pub const BRANCH_FALLBACK_SEPARATOR: &str = "  ";
pub const PROMPT_PASSWORD: &str = "Password for";
pub const PROMPT_CERTIFICATE_FULL: &str = "(R)eject, accept (t)emporarily or accept (p)ermanently?";
pub const PROMPT_CERTIFICATE_LIMITED: &str = "(R)eject or accept (t)emporarily?";
pub const TRACKING_SETUP_FAILURE: &str = "Cannot setup tracking information";
pub const CONFIG_UNKNOWN_OPTION: &str = "unknown option";

// Prompt Responses
pub const RESPONSE_ACCEPT_PERMANENTLY: &str = "p";
pub const RESPONSE_ACCEPT_TEMPORARILY: &str = "t";

// UI Messages
pub const MSG_START_CLONE: &str = "Start cloning...";
pub const MSG_END_CLONE: &str = "End clone.";
pub const MSG_MIGRATION_COMPLETE: &str = "Migration completed successfully!";
pub const BANNER_WIDTH: usize = 68;
pub const WARNING_TRACKING_DEPRECATED: &[&str] = &[
    "svn2git warning: Tracking remote SVN branches is deprecated.",
    "In a future release local branches will be created without tracking.",
    "If you must resync your branches, run: svn2git --rebase",
];

/// Builds the asterisk-framed deprecation banner shown the first time a
/// tracked branch is created for a remote SVN branch.
pub fn tracking_deprecated_banner() -> String {
    let frame = "*".repeat(BANNER_WIDTH);
    let mut message = String::with_capacity(frame.len() * 2 + 256);
    message.push_str(&frame);
    message.push('\n');
    for line in WARNING_TRACKING_DEPRECATED {
        message.push_str(line);
        message.push('\n');
    }
    message.push_str(&frame);
    message
}

// Configuration
pub const CONFIG_FILE_NAME: &str = ".svn2git.toml";
pub const HOME_CONFIG_DIR: &str = ".svn2git";
pub const HOME_CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_AUTHORS_FILE_NAME: &str = "authors";
pub const ENV_COMMITTER_DATE: &str = "GIT_COMMITTER_DATE";
pub const ENV_LOG_FILTER: &str = "SVN2GIT_LOG";
pub const LOG_FILTER_VERBOSE: &str = "svn2git=debug";
pub const LOG_FILTER_DEFAULT: &str = "warn";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_is_framed() {
        let banner = tracking_deprecated_banner();
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), WARNING_TRACKING_DEPRECATED.len() + 2);
        assert_eq!(lines[0].len(), BANNER_WIDTH);
        assert!(lines[0].chars().all(|c| c == '*'));
        assert_eq!(lines.last(), lines.first());
        assert!(banner.contains("svn2git --rebase"));
    }

    #[test]
    fn test_tags_prefix_is_under_svn_prefix() {
        assert!(SVN_TAGS_PREFIX.starts_with(SVN_PREFIX));
        assert_eq!(SVN_TRUNK_BRANCH, format!("{SVN_PREFIX}{TRUNK_BRANCH}"));
    }
}
