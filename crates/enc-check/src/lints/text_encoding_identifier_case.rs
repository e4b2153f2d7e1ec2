use crate::checker::{Lint, Suggestion, Warning};
use crate::parser::{Argument, Expr, StringLiteral};
use cow_utils::CowUtils;

/// Canonical spelling for a recognized text encoding identifier. The table is
/// a closed set; anything else is left alone.
fn replacement_for(encoding: &str) -> Option<&'static str> {
    match encoding.cow_to_ascii_lowercase().as_ref() {
        "utf8" | "utf-8" => Some("utf8"),
        "ascii" => Some("ascii"),
        _ => None,
    }
}

/// `fs.readFile()` and `fs.readFileSync()` take an encoding as their second
/// argument, so a literal in that position can be rewritten without review.
/// The check is purely syntactic (method name and argument position); with no
/// type information a stricter test is not possible.
fn is_fs_read_file_encoding(literal: &StringLiteral<'_>, parent: Option<&Expr<'_>>) -> bool {
    let call = match parent {
        Some(Expr::Call(call)) => call,
        _ => return false,
    };
    if call.optional {
        return false;
    }

    let is_second_argument = match call.arguments.get(1) {
        Some(Argument::Expr(Expr::String(second))) => second.location == literal.location,
        _ => false,
    };
    if !is_second_argument {
        return false;
    }
    // a spread in front means the literal's position is unknowable
    match call.arguments.first() {
        Some(Argument::Expr(_)) => (),
        _ => return false,
    }

    match call.callee.as_ref() {
        Expr::Member(member) if !member.optional => matches!(
            member.property_name(),
            Some("readFile") | Some("readFileSync")
        ),
        _ => false,
    }
}

/// Enforces consistent case for text encoding identifiers: `utf8` and
/// `ascii` over any other spelling of the same name.
#[derive(Default)]
pub struct TextEncodingIdentifierCaseLint {}

impl TextEncodingIdentifierCaseLint {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Lint for TextEncodingIdentifierCaseLint {
    fn name(&self) -> &'static str {
        "text-encoding-identifier-case"
    }

    fn lint_expr(&mut self, expr: &Expr<'_>, parent: Option<&Expr<'_>>) -> Vec<Warning> {
        let literal = match expr {
            Expr::String(literal) => literal,
            _ => return Default::default(),
        };

        // compare the raw source text so the original casing survives into
        // the message, no matter how escapes would decode
        let value = literal.value();
        let replacement = match replacement_for(value) {
            Some(replacement) if replacement != value => replacement,
            _ => return Default::default(),
        };

        let suggestion = Suggestion::from(
            expr,
            format!("Replace `{}` with `{}`.", value, replacement),
        );
        // the fix replaces the whole literal, quotes included
        let quoted = format!("\"{}\"", replacement);
        let suggestion = if is_fs_read_file_encoding(literal, parent) {
            suggestion.replace(quoted)
        } else {
            suggestion.replace_unsafe(quoted)
        };

        vec![expr
            .error(format!("Prefer `{}` over `{}`.", replacement, value))
            .suggest(suggestion)]
    }
}

#[cfg(test)]
mod tests {
    use super::TextEncodingIdentifierCaseLint;
    use crate::{AutoFixReplacement, EncCheck, ScriptFile, Severity, Warning};

    fn check(source: &str) -> Vec<Warning> {
        let script = ScriptFile::from_string("test.js", source);
        EncCheck::default().check(script).into_iter().collect()
    }

    fn replacement(warning: &Warning) -> &AutoFixReplacement {
        warning.suggestions()[0].replacement()
    }

    #[test]
    fn recognized_spellings() {
        for &(spelling, canonical) in &[
            ("UTF8", "utf8"),
            ("Utf8", "utf8"),
            ("uTf8", "utf8"),
            ("utf-8", "utf8"),
            ("UTF-8", "utf8"),
            ("Utf-8", "utf8"),
            ("ASCII", "ascii"),
            ("Ascii", "ascii"),
        ] {
            let warnings = check(&format!("const encoding = \"{}\";", spelling));
            assert_eq!(warnings.len(), 1, "expected one warning for {:?}", spelling);
            assert_eq!(
                warnings[0].message(),
                format!("Prefer `{}` over `{}`.", canonical, spelling)
            );
            assert_eq!(warnings[0].code(), Some("text-encoding-identifier-case"));
            assert_eq!(warnings[0].severity(), Severity::Error);
            assert_eq!(
                warnings[0].suggestions()[0].message(),
                format!("Replace `{}` with `{}`.", spelling, canonical)
            );
            match replacement(&warnings[0]) {
                AutoFixReplacement::Unsafe(value) => {
                    assert_eq!(value, &format!("\"{}\"", canonical));
                }
                other => panic!("expected an unsafe fix for {:?}, got {:?}", spelling, other),
            }
        }
    }

    #[test]
    fn canonical_spellings_are_left_alone() {
        assert!(check("const encoding = \"utf8\";").is_empty());
        assert!(check("const encoding = \"ascii\";").is_empty());
        assert!(check("fs.readFile(file, \"utf8\", callback)").is_empty());
    }

    #[test]
    fn unrecognized_text_is_ignored() {
        for source in &[
            "const encoding = \"binary\";",
            "const encoding = \"base64\";",
            "const encoding = \"utf-16\";",
            "const encoding = \"latin1\";",
            "const encoding = \"utf88\";",
            "const encoding = \"\";",
        ] {
            assert!(check(source).is_empty(), "expected no warning for {:?}", source);
        }
    }

    #[test]
    fn non_string_literals_are_ignored() {
        assert!(check("fs.readFile(file, 8)").is_empty());
        assert!(check("const encoding = `utf-8`;").is_empty());
    }

    #[test]
    fn safe_fix_inside_fs_read_calls() {
        for source in &[
            "fs.readFileSync(file, \"UTF-8\")",
            "fs.readFile(file, \"utf-8\", callback)",
            "promises.readFile(file, 'Utf8')",
        ] {
            let warnings = check(source);
            assert_eq!(warnings.len(), 1, "expected one warning for {:?}", source);
            match replacement(&warnings[0]) {
                AutoFixReplacement::Safe(value) => {
                    assert!(value.starts_with('"') && value.ends_with('"'));
                }
                other => panic!("expected a safe fix for {:?}, got {:?}", source, other),
            }
        }
    }

    #[test]
    fn suggestion_only_outside_the_fs_read_shape() {
        for source in &[
            // not an argument at all
            "const label = \"UTF-8\";",
            // optional call syntax
            "fs.readFile?.(file, \"UTF-8\")",
            // optional member access
            "fs?.readFile(file, \"UTF-8\")",
            // computed member access
            "fs[\"readFile\"](file, \"UTF-8\")",
            // wrong argument position
            "fs.readFile(\"UTF-8\")",
            "fs.readFile(file, options, \"UTF-8\")",
            // the first argument's position is unknowable
            "thing.readFile(...spreadArgs, \"UTF-8\")",
            // different method
            "fs.writeFile(file, \"UTF-8\")",
            // bare function call
            "readFile(file, \"UTF-8\")",
        ] {
            let warnings = check(source);
            assert_eq!(warnings.len(), 1, "expected one warning for {:?}", source);
            match replacement(&warnings[0]) {
                AutoFixReplacement::Unsafe(value) => assert_eq!(value, "\"utf8\""),
                other => panic!("expected an unsafe fix for {:?}, got {:?}", source, other),
            }
        }
    }

    #[test]
    fn replacement_is_always_double_quoted() {
        let warnings = check("fs.readFileSync(file, 'utf-8')");
        match replacement(&warnings[0]) {
            AutoFixReplacement::Safe(value) => assert_eq!(value, "\"utf8\""),
            other => panic!("expected a safe fix, got {:?}", other),
        }
    }

    #[test]
    fn suggestion_span_covers_the_quotes() {
        let source = "fs.readFileSync(file, \"utf-8\")";
        let warnings = check(source);
        let suggestion = &warnings[0].suggestions()[0];
        assert_eq!(&source[suggestion.location().to_range()], "\"utf-8\"");
    }

    #[test]
    fn applying_the_fix_is_idempotent() {
        for source in &[
            "fs.readFileSync(file, \"utf-8\")",
            "const label = 'UTF-8';",
            "fs.readFile(file, \"ASCII\", callback)",
        ] {
            let warnings = check(source);
            assert_eq!(warnings.len(), 1);
            let suggestion = &warnings[0].suggestions()[0];
            let new_value = match suggestion.replacement() {
                AutoFixReplacement::Safe(value) => value,
                AutoFixReplacement::Unsafe(value) => value,
                AutoFixReplacement::None => panic!("expected a replacement"),
            };
            let range = suggestion.location().to_range();
            let fixed = format!("{}{}{}", &source[..range.start], new_value, &source[range.end..]);
            assert!(
                check(&fixed).is_empty(),
                "expected no warnings after fixing {:?} into {:?}",
                source,
                fixed
            );
        }
    }

    #[test]
    fn one_warning_per_literal() {
        let warnings = check("fs.readFileSync('UTF-8', 'UTF-8')");
        assert_eq!(warnings.len(), 2);
        // first argument cannot be verified, second one can
        assert!(!replacement(&warnings[0]).is_fixable());
        assert!(replacement(&warnings[1]).is_fixable());
    }

    #[test]
    fn fixture_file() {
        let script = ScriptFile::from_path("./tests/js/encodings.js").unwrap();
        let result = EncCheck::new()
            .with_lint(Box::new(TextEncodingIdentifierCaseLint::new()))
            .check(script);

        let mut warnings = result.iter();
        let first = warnings.next().unwrap();
        let second = warnings.next().unwrap();
        assert!(warnings.next().is_none());

        assert_eq!(first.message(), "Prefer `utf8` over `UTF-8`.");
        assert!(first.suggestions()[0].replacement().is_fixable());
        assert_eq!(second.message(), "Prefer `utf8` over `utf-8`.");
        assert!(!second.suggestions()[0].replacement().is_fixable());
    }
}
