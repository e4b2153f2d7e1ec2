//! The lint driver, and the warning/suggestion records lints produce.

use crate::diagnostic::{Severity, SourceLocation};
use crate::parser::{Expr, MemberProperty, Stmt};

/// A replacement string attached to a suggestion.
///
/// `Safe` replacements are applied automatically in fix mode: the literal's
/// position has been structurally verified. `Unsafe` replacements are only
/// offered to the user, because the flagged text might not play the role the
/// lint assumed.
#[derive(Debug, Clone)]
pub enum AutoFixReplacement {
    None,
    Safe(String),
    Unsafe(String),
}

impl AutoFixReplacement {
    /// Whether this replacement can be applied without user review.
    #[inline]
    pub fn is_fixable(&self) -> bool {
        matches!(self, AutoFixReplacement::Safe(_))
    }
    /// Whether this replacement can be applied at all, including with manual
    /// review.
    #[inline]
    pub fn is_fixable_unsafe(&self) -> bool {
        !matches!(self, AutoFixReplacement::None)
    }
    /// Get the replacement text, if any.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        match self {
            AutoFixReplacement::Safe(text) | AutoFixReplacement::Unsafe(text) => Some(text),
            AutoFixReplacement::None => None,
        }
    }
}

/// A suggestion that may fix a warning.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The piece of source code that this suggestion would replace.
    location: SourceLocation,
    /// Human-readable suggestion message.
    message: String,
    /// A replacement string that could fix the problem.
    replacement: AutoFixReplacement,
}

impl Suggestion {
    /// Get the span this suggestion applies to.
    #[inline]
    pub const fn location(&self) -> SourceLocation {
        self.location
    }
    /// Get the suggestion message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
    /// Get the replacement string that could fix the problem.
    #[inline]
    pub const fn replacement(&self) -> &AutoFixReplacement {
        &self.replacement
    }

    /// Create a suggestion.
    #[inline]
    pub fn new(location: SourceLocation, message: impl ToString) -> Self {
        Suggestion {
            location,
            message: message.to_string(),
            replacement: AutoFixReplacement::None,
        }
    }
    /// Create a suggestion applying to a specific node.
    #[inline]
    pub fn from(expr: &Expr<'_>, message: impl ToString) -> Self {
        Self::new(expr.location(), message)
    }
    /// Specify a fix for the problem that is always correct to apply.
    #[inline]
    pub fn replace(mut self, replacement: impl ToString) -> Self {
        self.replacement = AutoFixReplacement::Safe(replacement.to_string());
        self
    }
    /// Specify a possible fix for the problem, but one that may not be
    /// correct and requires some manual intervention.
    #[inline]
    pub fn replace_unsafe(mut self, replacement: impl ToString) -> Self {
        self.replacement = AutoFixReplacement::Unsafe(replacement.to_string());
        self
    }
}

/// A warning.
#[derive(Debug, Clone)]
pub struct Warning {
    severity: Severity,
    location: SourceLocation,
    message: String,
    /// The name of the lint that emitted this warning.
    code: Option<String>,
    suggestions: Vec<Suggestion>,
}

impl Warning {
    /// Get the severity of this warning.
    #[inline]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
    /// Get the span of source code this warning applies to.
    #[inline]
    pub const fn location(&self) -> SourceLocation {
        self.location
    }
    /// Get the human-readable warning message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
    /// Get the name of the lint that emitted this warning.
    #[inline]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
    /// Check whether any suggestions could be made.
    #[inline]
    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
    /// Get any suggestions that may help to fix the problem.
    #[inline]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Create a new warning with severity "Warning".
    #[must_use]
    pub fn warning(location: SourceLocation, message: impl Into<String>) -> Self {
        Warning {
            severity: Severity::Warning,
            location,
            message: message.into(),
            code: None,
            suggestions: vec![],
        }
    }

    /// Create a new warning with severity "Error".
    #[must_use]
    pub fn error(location: SourceLocation, message: impl Into<String>) -> Self {
        Warning {
            severity: Severity::Error,
            location,
            message: message.into(),
            code: None,
            suggestions: vec![],
        }
    }

    /// Define a replacement suggestion for this warning.
    pub fn suggest(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Set the lint that emitted this warning.
    pub(crate) fn lint(mut self, lint: &str) -> Self {
        self.code = Some(lint.to_string());
        self
    }
}

impl Expr<'_> {
    /// Create a warning applying to this node.
    #[must_use]
    pub fn warning(&self, message: impl Into<String>) -> Warning {
        Warning::warning(self.location(), message)
    }
    /// Create an error applying to this node.
    #[must_use]
    pub fn error(&self, message: impl Into<String>) -> Warning {
        Warning::error(self.location(), message)
    }
}

/// A lint rule. The checker hands every expression node to every registered
/// lint, together with the node's parent when it has one. Invocations are
/// independent; a lint must not rely on visit order.
pub trait Lint {
    /// The lint's name, used as the warning code.
    fn name(&self) -> &'static str;
    /// Called once for every expression node.
    fn lint_expr(&mut self, _expr: &Expr<'_>, _parent: Option<&Expr<'_>>) -> Vec<Warning> {
        Default::default()
    }
}

/// Builder for a `Checker`.
#[derive(Default)]
pub struct CheckerBuilder {
    lints: Vec<Box<dyn Lint>>,
}

impl CheckerBuilder {
    pub fn build(self) -> Checker {
        Checker { lints: self.lints }
    }

    pub fn with_lint(mut self, lint: Box<dyn Lint>) -> Self {
        self.lints.push(lint);
        self
    }
}

/// Walks parsed statements and runs lints over every expression node.
pub struct Checker {
    lints: Vec<Box<dyn Lint>>,
}

impl Checker {
    pub fn builder() -> CheckerBuilder {
        CheckerBuilder::default()
    }

    /// Run all lints over one statement, depth-first.
    pub fn write_stmt(&mut self, stmt: &Stmt<'_>) -> Vec<Warning> {
        let mut warnings = vec![];
        match stmt {
            Stmt::VarDecl(decl) => {
                if let Some(init) = &decl.init {
                    self.write_expr(init, None, &mut warnings);
                }
            }
            Stmt::Expr { expr } => self.write_expr(expr, None, &mut warnings),
            Stmt::Other { .. } => (),
        }
        warnings
    }

    fn write_expr(&mut self, expr: &Expr<'_>, parent: Option<&Expr<'_>>, warnings: &mut Vec<Warning>) {
        for lint in self.lints.iter_mut() {
            warnings.extend(
                lint.lint_expr(expr, parent)
                    .into_iter()
                    .map(move |warning| warning.lint(lint.name())),
            );
        }

        match expr {
            Expr::Member(member) => {
                self.write_expr(&member.object, Some(expr), warnings);
                if let MemberProperty::Computed(property) = &member.property {
                    self.write_expr(property, Some(expr), warnings);
                }
            }
            Expr::Call(call) => {
                self.write_expr(&call.callee, Some(expr), warnings);
                for argument in &call.arguments {
                    self.write_expr(argument.expr(), Some(expr), warnings);
                }
            }
            Expr::String(_) | Expr::Number(_) | Expr::Template(_) | Expr::Identifier(_) => (),
        }
    }
}
