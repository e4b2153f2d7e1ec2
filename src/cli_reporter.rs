use ansi_term::Colour::{Cyan, Red, Yellow};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config};
use enc_check::{EncCheckResult, Severity, Suggestion, Warning};

fn suggestion_notes(suggestion: &Suggestion) -> String {
    let mut note = format!("suggestion: {}", suggestion.message());
    let replacement = suggestion.replacement();
    if replacement.is_fixable() || replacement.is_fixable_unsafe() {
        if let Some(new_text) = replacement.value() {
            note.push('\n');
            note.push_str(new_text);
        }
    }
    note
}

fn to_diagnostic(file_id: usize, warning: &Warning) -> Diagnostic<usize> {
    let diagnostic = match warning.severity() {
        Severity::Error => Diagnostic::error(),
        Severity::Warning => Diagnostic::warning(),
    };
    let diagnostic = match warning.code() {
        Some(code) => diagnostic.with_code(code),
        None => diagnostic,
    };
    diagnostic
        .with_message(warning.message())
        .with_labels(vec![Label::primary(
            file_id,
            warning.location().to_range(),
        )])
        .with_notes(warning.suggestions().iter().map(suggestion_notes).collect())
}

/// Print the check result to standard error, followed by a summary of how
/// many problems were found and how many of those are fixable.
pub fn report(result: &EncCheckResult<'_>) {
    let mut files = SimpleFiles::new();
    let file_id = files.add(result.script().name(), result.script().source());

    let stream = StandardStream::stderr(ColorChoice::Auto);
    let mut stream = stream.lock();
    let config = Config::default();

    let mut num_warnings = 0;
    let mut num_errors = 0;
    let mut num_fixable = 0;
    let mut num_fixable_unsafe = 0;

    for warning in result.iter() {
        match warning.severity() {
            Severity::Error => num_errors += 1,
            Severity::Warning => num_warnings += 1,
        }
        let replacements = warning.suggestions().iter().map(Suggestion::replacement);
        if replacements.clone().any(|r| r.is_fixable()) {
            num_fixable += 1;
        } else if replacements.clone().any(|r| r.is_fixable_unsafe()) {
            num_fixable_unsafe += 1;
        }

        let diagnostic = to_diagnostic(file_id, warning);
        // Ignore output errors, the summary below still goes through.
        let _ = term::emit(&mut stream, &config, &files, &diagnostic);
    }

    eprintln!();
    eprintln!(
        "{} errors, {} warnings found.",
        Red.paint(num_errors.to_string()),
        Yellow.paint(num_warnings.to_string())
    );
    if num_fixable > 0 {
        eprintln!(
            "{} problems fixable using --fix",
            Cyan.paint(num_fixable.to_string())
        );
    }
    if num_fixable_unsafe > 0 {
        eprintln!(
            "{} more problems fixable using --fix-unsafe",
            Cyan.paint(num_fixable_unsafe.to_string())
        );
    }
}
