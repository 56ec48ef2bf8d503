//! Command-line arguments
//!
//! Flag names follow the classic `svn2git` tool so existing scripts keep
//! working. Values left unset here may still come from the defaults file,
//! see [`crate::config`].

use clap::Parser;

/// Command-line arguments for svn2git
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "svn2git", version)]
#[command(about = "Migrate a Subversion repository to Git with proper branches and tags")]
pub struct CliArgs {
    /// Be verbose in logging -- useful for debugging issues
    #[arg(short, long)]
    pub verbose: bool,

    /// Include metadata in git logs (git-svn-id)
    #[arg(short, long)]
    pub metadata: bool,

    /// Accept URLs as-is without attempting to connect to a higher level directory
    #[arg(long = "no-minimize-url")]
    pub no_minimize_url: bool,

    /// Use this if the root level of the repo is equivalent to the trunk and
    /// there are no tags or branches
    #[arg(long = "rootistrunk")]
    pub root_is_trunk: bool,

    /// Subpath to trunk from repository URL (default: trunk)
    #[arg(long, value_name = "TRUNK_PATH")]
    pub trunk: Option<String>,

    /// Do not import anything from trunk
    #[arg(long = "notrunk")]
    pub no_trunk: bool,

    /// Subpath to branches from repository URL (default: branches); can be used multiple times
    #[arg(long, value_name = "BRANCHES_PATH")]
    pub branches: Vec<String>,

    /// Do not try to import any branches
    #[arg(long = "nobranches")]
    pub no_branches: bool,

    /// Subpath to tags from repository URL (default: tags); can be used multiple times
    #[arg(long, value_name = "TAGS_PATH")]
    pub tags: Vec<String>,

    /// Do not try to import any tags
    #[arg(long = "notags")]
    pub no_tags: bool,

    /// Perl regular expression to filter paths when fetching; can be used multiple times
    #[arg(long, value_name = "REGEX")]
    pub exclude: Vec<String>,

    /// Start importing from SVN revision START_REV; optionally end at END_REV
    #[arg(short, long, value_name = "START_REV[:END_REV]")]
    pub revision: Option<String>,

    /// Username for transports that need it (http(s), svn)
    #[arg(long)]
    pub username: Option<String>,

    /// Password for transports that need it (http(s), svn)
    #[arg(long)]
    pub password: Option<String>,

    /// Instead of cloning a new project, rebase an existing one against SVN
    #[arg(long, conflicts_with = "rebase_branch")]
    pub rebase: bool,

    /// Rebase the specified branch only
    #[arg(long = "rebasebranch", value_name = "BRANCH")]
    pub rebase_branch: Option<String>,

    /// Path to file containing svn-to-git authors mapping
    #[arg(long, value_name = "AUTHORS_FILE")]
    pub authors: Option<String>,

    /// URL of the Subversion repository
    #[arg(value_name = "SVN_URL")]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_repeatable_flags() {
        let cli = CliArgs::try_parse_from([
            "svn2git",
            "--branches",
            "b1",
            "--branches",
            "b2",
            "--exclude",
            "doc",
            "-v",
            "svn://example.com/repo",
        ])
        .unwrap();
        assert_eq!(cli.branches, vec!["b1", "b2"]);
        assert_eq!(cli.exclude, vec!["doc"]);
        assert!(cli.verbose);
        assert_eq!(cli.args, vec!["svn://example.com/repo"]);
    }

    #[test]
    fn test_rebase_conflicts_with_rebasebranch() {
        let result =
            CliArgs::try_parse_from(["svn2git", "--rebase", "--rebasebranch", "dev"]);
        assert!(result.is_err());
    }
}
