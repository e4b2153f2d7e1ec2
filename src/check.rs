use crate::cli_reporter::report as cli_report;
use anyhow::{bail, Result};
use enc_check::{AutoFixReplacement, EncCheck, ScriptFile};
use multisplice::Multisplice;
use std::fs::{remove_file, write};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct CheckArgs {
    /// Path to the script file.
    pub file: PathBuf,
    /// Do not actually apply fixes.
    pub dry_run: bool,
    /// Also apply unsafe fixes.
    pub fix_unsafe: bool,
}

pub fn cli_check(args: CheckArgs) -> Result<()> {
    let script = ScriptFile::from_path(&args.file)?;
    let result = EncCheck::default().check(script);
    let has_warnings = result.has_warnings();

    cli_report(&result);

    if has_warnings {
        bail!("There were warnings");
    }
    Ok(())
}

pub fn cli_fix(args: CheckArgs) -> Result<()> {
    let script = ScriptFile::from_path(&args.file)?;
    let result = EncCheck::default().check(script);

    if !result.has_warnings() {
        // All good!
        return Ok(());
    }

    let mut splicer = Multisplice::new(result.script().source());

    for warning in result.iter() {
        for suggestion in warning.suggestions() {
            let applied = match suggestion.replacement() {
                AutoFixReplacement::Safe(new_value) => Some(("autofix", new_value)),
                AutoFixReplacement::Unsafe(new_value) if args.fix_unsafe => {
                    Some(("UNSAFE autofix", new_value))
                }
                _ => None,
            };
            if let Some((label, new_value)) = applied {
                let location = suggestion.location();
                let (start_line, start_col) = result.script().line_col(location.start());
                let (end_line, end_col) = result.script().line_col(location.end());
                eprintln!(
                    "{} {}:{} → {}:{} to {}",
                    label,
                    start_line + 1,
                    start_col + 1,
                    end_line + 1,
                    end_col + 1,
                    new_value
                );
                splicer.splice(
                    location.start().to_usize(),
                    location.end().to_usize(),
                    new_value.as_str(),
                );
            }
        }
    }

    if args.dry_run {
        let temp = format!("{}.tmp", args.file.to_string_lossy());
        write(&temp, &splicer.to_string())?;
        let check_result = cli_check(CheckArgs {
            file: temp.clone().into(),
            ..args
        });
        remove_file(&temp)?;
        check_result
    } else {
        let backup = format!("{}.bak", args.file.to_string_lossy());
        write(&backup, result.script().source())?;
        write(&args.file, &splicer.to_string())?;
        remove_file(&backup)?;
        cli_check(args)
    }
}
