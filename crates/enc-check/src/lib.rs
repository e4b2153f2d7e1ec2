//! Entry point for finding inconsistently cased text encoding identifiers in
//! JavaScript-style sources.

#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]
#![warn(unused)]

mod checker;
mod diagnostic;
mod lints;
mod parser;
mod tokenizer;

pub use crate::checker::{
    AutoFixReplacement, Checker, CheckerBuilder, Lint, Suggestion, Warning,
};
pub use crate::diagnostic::{ByteIndex, Severity, SourceLocation};
pub use crate::lints::TextEncodingIdentifierCaseLint;
pub use crate::parser::{
    Argument, CallExpr, Expr, Identifier, MemberExpr, MemberProperty, NumberLiteral, ParseError,
    ParseErrorKind, Parser, Stmt, StringLiteral, TemplateLiteral, VarDecl,
};
pub use crate::tokenizer::{Punct, Token, TokenKind, Tokenizer};

use encoding_rs::Encoding;
use std::borrow::Cow;
use std::io;
use std::path::Path;

/// Decode a script that may use any on-disk encoding. Valid UTF-8 passes
/// through unchanged; everything else goes through charset detection.
fn decode_source(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| {
        let bytes = err.as_bytes();
        let (label, _, _) = chardet::detect(bytes);
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => encoding.decode(bytes).0.to_string(),
            None => String::from_utf8_lossy(bytes).to_string(),
        }
    })
}

/// A named source unit to be checked.
#[derive(Debug, Clone)]
pub struct ScriptFile<'source> {
    name: String,
    source: Cow<'source, str>,
}

impl<'source> ScriptFile<'source> {
    /// Create a ScriptFile from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self {
            name: path.as_ref().to_string_lossy().into_owned(),
            source: Cow::Owned(decode_source(bytes)),
        })
    }

    /// Create a ScriptFile from a source string.
    pub fn from_string(name: impl AsRef<str>, source: impl Into<Cow<'source, str>>) -> Self {
        Self {
            name: name.as_ref().to_string(),
            source: source.into(),
        }
    }

    /// Get the name of this script.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the source code of this script.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolve a byte index to a 0-based line/column pair.
    pub fn line_col(&self, index: ByteIndex) -> (usize, usize) {
        let index = index.to_usize().min(self.source.len());
        let before = &self.source[..index];
        let line_start = before.rfind('\n').map(|pos| pos + 1).unwrap_or(0);
        let line = before.matches('\n').count();
        let column = before[line_start..].chars().count();
        (line, column)
    }
}

/// The result of a lint run.
pub struct EncCheckResult<'source> {
    script: ScriptFile<'source>,
    warnings: Vec<Warning>,
}

impl<'source> EncCheckResult<'source> {
    /// The script that was checked.
    pub fn script(&self) -> &ScriptFile<'source> {
        &self.script
    }

    /// Were there any warnings?
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Iterate over the warnings.
    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }
}

impl IntoIterator for EncCheckResult<'_> {
    type Item = Warning;
    type IntoIter = std::vec::IntoIter<Self::Item>;
    /// Iterate over the warnings.
    fn into_iter(self) -> Self::IntoIter {
        self.warnings.into_iter()
    }
}

/// Entry point for checking a script.
pub struct EncCheck {
    checker: CheckerBuilder,
}

impl Default for EncCheck {
    fn default() -> EncCheck {
        EncCheck::new().with_lint(Box::new(lints::TextEncodingIdentifierCaseLint::new()))
    }
}

impl EncCheck {
    /// Initialize a checker with no lints registered.
    pub fn new() -> Self {
        EncCheck {
            checker: Checker::builder(),
        }
    }

    /// Add a lint rule.
    pub fn with_lint(self, lint: Box<dyn Lint>) -> Self {
        Self {
            checker: self.checker.with_lint(lint),
        }
    }

    /// Run the lints and get the result.
    pub fn check(self, script: ScriptFile<'_>) -> EncCheckResult<'_> {
        let mut checker = self.checker.build();

        let mut warnings = vec![];
        for (stmt, parse_errors) in Parser::new(script.source()) {
            warnings.extend(checker.write_stmt(&stmt));
            for error in parse_errors {
                warnings.push(Warning::error(error.location, error.kind.to_string()).lint("parse"));
            }
        }

        EncCheckResult { script, warnings }
    }
}
