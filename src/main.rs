//! svn2git - Subversion to Git migration
//!
//! This is the main entry point for the svn2git CLI application.

use anyhow::Result;
use clap::Parser;
use std::process;

use svn2git::cli::CliArgs;
use svn2git::config::{Config, Options};
use svn2git::constants::MSG_MIGRATION_COMPLETE;
use svn2git::display::ConsoleDisplayer;
use svn2git::logging;
use svn2git::migrator::Migrator;
use svn2git::runner::ProcessCommandRunner;
use svn2git::utils::{print_error, print_success};

fn run(cli: &CliArgs) -> Result<()> {
    let config = Config::load()?;
    let options = Options::resolve(cli, &config)?;
    logging::init(options.verbose);

    let runner = ProcessCommandRunner::new().with_echo(options.verbose);
    Migrator::new(&options, &cli.args, &runner, &ConsoleDisplayer).run()?;
    Ok(())
}

fn main() {
    let cli = CliArgs::parse();

    match run(&cli) {
        Ok(()) => print_success(MSG_MIGRATION_COMPLETE),
        Err(e) => {
            print_error(&format!("Error: {e}"));
            process::exit(1);
        }
    }
}
