//! Top-level migration sequence
//!
//! A run validates its arguments, obtains a ref snapshot (by cloning, by
//! re-reading the refs of an existing migration, or by narrowing them to a
//! single branch) and then hands the snapshot to the [`Fixer`] steps in a
//! fixed order.

use tracing::{debug, info};

use crate::config::{MigrationMode, Options};
use crate::core::MetaInfo;
use crate::display::MessageDisplayer;
use crate::error::Result;
use crate::fixer::{Fixer, ReconcileState};
use crate::grabber::Grabber;
use crate::identity::GitConfigCommand;
use crate::runner::CommandRunner;

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub meta_info: MetaInfo,
    pub reconcile: ReconcileState,
}

pub struct Migrator<'a, R: CommandRunner + ?Sized> {
    options: &'a Options,
    args: &'a [String],
    runner: &'a R,
    displayer: &'a dyn MessageDisplayer,
}

impl<'a, R: CommandRunner + ?Sized> Migrator<'a, R> {
    pub fn new(
        options: &'a Options,
        args: &'a [String],
        runner: &'a R,
        displayer: &'a dyn MessageDisplayer,
    ) -> Self {
        Self {
            options,
            args,
            runner,
            displayer,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.options.validate(self.args, self.runner)
    }

    /// Runs the whole migration.
    pub fn run(&self) -> Result<MigrationReport> {
        self.validate()?;

        let config = GitConfigCommand::detect(self.runner)?;
        let meta_info = self.grab(config)?;
        debug!(
            local = meta_info.local_branches.len(),
            remote = meta_info.remote_branches.len(),
            "Ref snapshot ready"
        );

        let fixer = Fixer::new(&meta_info, self.options, self.runner, config, self.displayer);
        info!("Fixing branches");
        let reconcile = fixer.fix_branches()?;
        info!("Fixing tags");
        fixer.fix_tags()?;
        fixer.fix_trunk()?;
        fixer.optimize_repos()?;

        Ok(MigrationReport {
            meta_info,
            reconcile,
        })
    }

    fn grab(&self, config: GitConfigCommand) -> Result<MetaInfo> {
        let svn_url = self.args.first().cloned().unwrap_or_default();
        let mut grabber = Grabber::new(svn_url, self.options, self.runner, config, self.displayer);

        match &self.options.mode {
            MigrationMode::Clone => grabber.clone_repository()?,
            MigrationMode::Rebase => grabber.fetch_branches()?,
            MigrationMode::RebaseBranch(branch) => grabber.fetch_rebase_branches(branch)?,
        }

        Ok(grabber.into_meta_info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingDisplayer;
    use crate::error::MigrateError;
    use crate::runner::MockCommandRunner;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_url_runs_nothing() {
        let options = Options::default();
        let mock = MockCommandRunner::new();
        let displayer = RecordingDisplayer::new();
        let argv = args(&[]);

        let err = Migrator::new(&options, &argv, &mock, &displayer)
            .run()
            .unwrap_err();
        assert!(matches!(err, MigrateError::MissingSvnUrl));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_rebase_sequence() {
        let options = Options {
            mode: MigrationMode::Rebase,
            ..Options::default()
        };
        let mock = MockCommandRunner::new();
        mock.respond_stdout("branch -l --no-color", "* master\n  dev");
        mock.respond_stdout("branch -r --no-color", "  svn/trunk\n  svn/dev");
        let displayer = RecordingDisplayer::new();
        let argv = args(&[]);

        let report = Migrator::new(&options, &argv, &mock, &displayer)
            .run()
            .unwrap();

        assert_eq!(report.meta_info.tags, Some(vec![]));
        assert_eq!(
            mock.arguments(),
            vec![
                "status --porcelain --untracked-files=no",
                "config --local --get user.name",
                "branch -l --no-color",
                "branch -r --no-color",
                "svn fetch",
                "checkout -f \"master\"",
                "rebase \"remotes/svn/trunk\"",
                "checkout -f \"dev\"",
                "rebase \"remotes/svn/dev\"",
                "config --local --get user.name",
                "config --local --get user.email",
                "checkout -f master",
                "gc",
            ]
        );
    }
}
