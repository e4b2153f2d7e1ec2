//! Command line interface for finding and fixing inconsistently cased text
//! encoding identifiers.

use anyhow::Result;
use std::path::PathBuf;
use structopt::StructOpt;

mod check;
mod cli_reporter;

use check::{cli_check, cli_fix, CheckArgs};

#[derive(Debug, StructOpt)]
#[structopt(name = "enc-check")]
struct Cli {
    /// Script files to check.
    #[structopt(parse(from_os_str), required = true)]
    files: Vec<PathBuf>,
    /// Apply safe fixes to the files.
    #[structopt(long = "fix")]
    fix: bool,
    /// Also apply unsafe fixes. Implies --fix.
    #[structopt(long = "fix-unsafe")]
    fix_unsafe: bool,
    /// Show the fixes that would be applied without changing any files.
    #[structopt(long = "dry-run")]
    dry_run: bool,
}

fn run(file: PathBuf, cli: &Cli) -> Result<()> {
    let args = CheckArgs {
        file,
        dry_run: cli.dry_run,
        fix_unsafe: cli.fix_unsafe,
    };

    if cli.fix || cli.fix_unsafe {
        cli_fix(args)
    } else {
        cli_check(args)
    }
}

fn main() {
    let cli = Cli::from_args();

    let mut failed = false;
    for file in cli.files.clone() {
        if let Err(err) = run(file, &cli) {
            eprintln!("{}", err);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}
