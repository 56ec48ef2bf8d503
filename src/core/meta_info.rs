//! Snapshot of repository refs
//!
//! [`MetaInfo`] records the local branches, remote branches and SVN tags
//! observed once per run. It is produced by the fetch step and only read by
//! the reconciliation steps afterwards.

use std::collections::HashSet;

use crate::constants::*;

/// Ref names observed at one point in time.
///
/// `tags` distinguishes two states: `None` means tags are not processed at
/// all, `Some(vec![])` means tags were computed and there are none. Every
/// tag is also present in `remote_branches`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaInfo {
    pub local_branches: Vec<String>,
    pub remote_branches: Vec<String>,
    pub tags: Option<Vec<String>>,
}

impl MetaInfo {
    /// Builds a snapshot from parsed branch lists, deriving tags from the
    /// remote names under `svn/tags/`.
    pub fn from_branches(local_branches: Vec<String>, remote_branches: Vec<String>) -> Self {
        let tags = svn_tags(&remote_branches);
        Self {
            local_branches,
            remote_branches,
            tags: Some(tags),
        }
    }

    /// Remote branches that are SVN-origin branches and not tags.
    ///
    /// Duplicates are collapsed, first occurrence wins.
    pub fn svn_branches(&self) -> Vec<String> {
        let tags: HashSet<&str> = self
            .tags
            .iter()
            .flatten()
            .map(|t| t.as_str())
            .collect();

        let mut seen = HashSet::new();
        self.remote_branches
            .iter()
            .filter(|b| !tags.contains(b.as_str()))
            .filter(|b| b.trim().starts_with(SVN_PREFIX))
            .filter(|b| seen.insert(b.as_str()))
            .cloned()
            .collect()
    }

    /// True when the remote list contains the SVN trunk.
    pub fn has_remote_trunk(&self) -> bool {
        self.remote_branches.iter().any(|b| {
            let b = b.trim();
            b == TRUNK_BRANCH || b == SVN_TRUNK_BRANCH
        })
    }
}

/// Remote names that live under the SVN tags namespace.
pub fn svn_tags(remote_branches: &[String]) -> Vec<String> {
    remote_branches
        .iter()
        .filter(|r| r.trim().starts_with(SVN_TAGS_PREFIX))
        .cloned()
        .collect()
}

/// Normalizes one line of `git branch` output.
///
/// Surrounding whitespace is trimmed and a single leading `*` (the
/// current-branch marker) is removed.
///
/// # Examples
///
/// ```rust
/// use svn2git::core::parse_branch_name;
///
/// assert_eq!(parse_branch_name("*master"), "master");
/// assert_eq!(parse_branch_name("* master"), "master");
/// assert_eq!(parse_branch_name("  dev  "), "dev");
/// ```
pub fn parse_branch_name(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix(CURRENT_BRANCH_MARKER)
        .unwrap_or(trimmed)
        .trim()
}

/// Parses the output of `git branch -l/-r --no-color` into branch names.
///
/// Names are one per line. Output without any newline is split on runs of
/// two spaces instead, which is how a listing looks after its line breaks
/// were lost.
pub fn parse_branch_list(output: &str) -> Vec<String> {
    if output.trim().is_empty() {
        return Vec::new();
    }

    let names: Box<dyn Iterator<Item = &str>> = if output.contains('\n') {
        Box::new(output.lines())
    } else {
        Box::new(output.split(BRANCH_FALLBACK_SEPARATOR))
    };

    names
        .map(parse_branch_name)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strips the `svn/` namespace from a remote ref name.
pub fn strip_svn_prefix(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed.strip_prefix(SVN_PREFIX).unwrap_or(trimmed).trim()
}

/// Strips the `svn/tags/` namespace from a tag ref name.
pub fn strip_svn_tags_prefix(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed.strip_prefix(SVN_TAGS_PREFIX).unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_branch_name_strips_exactly_one_marker() {
        assert_eq!(parse_branch_name("*master"), "master");
        assert_eq!(parse_branch_name("  dev  "), "dev");
        assert_eq!(parse_branch_name("**odd"), "*odd");
        assert_eq!(parse_branch_name("feature*x"), "feature*x");
    }

    #[test]
    fn test_parse_branch_list_lines() {
        let output = "* master\n  dev\n  test\n";
        assert_eq!(parse_branch_list(output), strings(&["master", "dev", "test"]));
    }

    #[test]
    fn test_parse_branch_list_crlf() {
        let output = "*master\r\ndev\r\ntest";
        assert_eq!(parse_branch_list(output), strings(&["master", "dev", "test"]));
    }

    #[test]
    fn test_parse_branch_list_single_entry() {
        assert_eq!(parse_branch_list("origin/master"), strings(&["origin/master"]));
    }

    #[test]
    fn test_parse_branch_list_without_newlines() {
        assert_eq!(
            parse_branch_list("  dev  master"),
            strings(&["dev", "master"])
        );
    }

    #[test]
    fn test_parse_branch_list_empty() {
        assert!(parse_branch_list("").is_empty());
        assert!(parse_branch_list("   \n ").is_empty());
    }

    #[test]
    fn test_from_branches_derives_tags() {
        let meta = MetaInfo::from_branches(
            strings(&["master"]),
            strings(&["svn/trunk", "svn/tags/v1", "svn/dev", "origin/tags/x"]),
        );
        assert_eq!(meta.tags, Some(strings(&["svn/tags/v1"])));
    }

    #[test]
    fn test_svn_branches_excludes_tags_and_foreign_remotes() {
        let meta = MetaInfo {
            local_branches: Vec::new(),
            remote_branches: strings(&[
                "svn/trunk",
                "svn/tags/v1",
                "origin/master",
                "svn/dev",
                "svn/dev",
            ]),
            tags: Some(strings(&["svn/tags/v1"])),
        };
        assert_eq!(meta.svn_branches(), strings(&["svn/trunk", "svn/dev"]));
    }

    #[test]
    fn test_svn_branches_without_tags_keeps_everything_under_prefix() {
        let meta = MetaInfo {
            local_branches: Vec::new(),
            remote_branches: strings(&["svn/trunk", "svn/tags/v1"]),
            tags: None,
        };
        assert_eq!(meta.svn_branches(), strings(&["svn/trunk", "svn/tags/v1"]));
    }

    #[test]
    fn test_strip_prefixes() {
        assert_eq!(strip_svn_prefix("svn/dev"), "dev");
        assert_eq!(strip_svn_prefix("dev"), "dev");
        assert_eq!(strip_svn_tags_prefix("svn/tags/1.0"), "1.0");
    }

    #[test]
    fn test_has_remote_trunk() {
        let mut meta = MetaInfo::default();
        assert!(!meta.has_remote_trunk());
        meta.remote_branches = strings(&["dev", "trunk"]);
        assert!(meta.has_remote_trunk());
        meta.remote_branches = strings(&["svn/trunk"]);
        assert!(meta.has_remote_trunk());
    }
}
