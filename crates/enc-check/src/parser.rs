//! Forgiving parser, turning a token stream into a stream of statements over
//! a small expression tree.
//!
//! The tree is deliberately narrow: string/number/template literals,
//! identifiers, member accesses and calls are the only shapes lints inspect.
//! Everything else surfaces as a parse error plus an `Other` statement, and
//! parsing keeps going.

use crate::diagnostic::SourceLocation;
use crate::tokenizer::{Punct, Token, TokenKind, Tokenizer};
use itertools::MultiPeek;
use std::fmt::{self, Display};

/// The kind of error that generated a parse warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token appeared somewhere no rule allows it.
    UnexpectedToken,
    /// The input ended in the middle of an expression.
    UnexpectedEof,
    /// A `.` or `?.` access was not followed by a property name.
    ExpectedPropertyName,
    /// A string literal was not closed before the end of its line.
    UnterminatedString,
    /// A `const`/`let`/`var` keyword without a name to declare.
    MissingDeclarationName,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::UnexpectedToken => "Unexpected token",
            ParseErrorKind::UnexpectedEof => "Unexpected end of input",
            ParseErrorKind::ExpectedPropertyName => "Expected a property name",
            ParseErrorKind::UnterminatedString => "Unterminated string literal",
            ParseErrorKind::MissingDeclarationName => "Missing declaration name",
        })
    }
}

/// An error that can occur during parsing. The Parser will keep going after
/// encountering parse errors.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: SourceLocation,
}

impl ParseError {
    const fn new(location: SourceLocation, kind: ParseErrorKind) -> Self {
        ParseError { kind, location }
    }
}

/// An identifier node.
#[derive(Debug, Clone, Copy)]
pub struct Identifier<'a> {
    pub name: &'a str,
    pub location: SourceLocation,
}

/// A quoted string literal.
#[derive(Debug, Clone, Copy)]
pub struct StringLiteral<'a> {
    /// The exact source slice, quote characters included.
    pub raw: &'a str,
    pub location: SourceLocation,
}

impl<'a> StringLiteral<'a> {
    /// The literal's text without the surrounding quote characters. Escape
    /// sequences are not decoded; lints compare and replace the raw source
    /// text so the rewrite span always matches what was written.
    pub fn value(&self) -> &'a str {
        let quote = &self.raw[..1];
        let rest = &self.raw[1..];
        if rest.ends_with(quote) {
            &rest[..rest.len() - quote.len()]
        } else {
            // unterminated literal; there is no closing quote to strip
            rest
        }
    }
}

/// A numeric literal. Lints that only care about strings skip these.
#[derive(Debug, Clone, Copy)]
pub struct NumberLiteral<'a> {
    pub raw: &'a str,
    pub location: SourceLocation,
}

/// A backtick template literal.
#[derive(Debug, Clone, Copy)]
pub struct TemplateLiteral<'a> {
    pub raw: &'a str,
    pub location: SourceLocation,
}

/// The property side of a member access. A computed access (`obj[expr]`)
/// carries a full expression instead of a name.
#[derive(Debug, Clone)]
pub enum MemberProperty<'a> {
    Identifier(Identifier<'a>),
    Computed(Box<Expr<'a>>),
}

/// A member access, `obj.prop`, `obj?.prop` or `obj[expr]`.
#[derive(Debug, Clone)]
pub struct MemberExpr<'a> {
    pub object: Box<Expr<'a>>,
    pub property: MemberProperty<'a>,
    /// Whether the access used `?.`.
    pub optional: bool,
    pub location: SourceLocation,
}

impl<'a> MemberExpr<'a> {
    /// The accessed property name, unless the access is computed.
    pub fn property_name(&self) -> Option<&'a str> {
        match &self.property {
            MemberProperty::Identifier(property) => Some(property.name),
            MemberProperty::Computed(_) => None,
        }
    }
}

/// A call argument, positional or spread.
#[derive(Debug, Clone)]
pub enum Argument<'a> {
    Expr(Expr<'a>),
    Spread {
        expr: Expr<'a>,
        location: SourceLocation,
    },
}

impl<'a> Argument<'a> {
    /// The argument's expression, spread or not.
    pub fn expr(&self) -> &Expr<'a> {
        match self {
            Argument::Expr(expr) => expr,
            Argument::Spread { expr, .. } => expr,
        }
    }
}

/// A call, `callee(args)` or `callee?.(args)`.
#[derive(Debug, Clone)]
pub struct CallExpr<'a> {
    pub callee: Box<Expr<'a>>,
    pub arguments: Vec<Argument<'a>>,
    /// Whether the call used the `?.(` syntax.
    pub optional: bool,
    pub location: SourceLocation,
}

/// An expression node.
#[derive(Debug, Clone)]
pub enum Expr<'a> {
    String(StringLiteral<'a>),
    Number(NumberLiteral<'a>),
    Template(TemplateLiteral<'a>),
    Identifier(Identifier<'a>),
    Member(MemberExpr<'a>),
    Call(CallExpr<'a>),
}

impl Expr<'_> {
    /// The source code location this expression was parsed from.
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::String(literal) => literal.location,
            Expr::Number(literal) => literal.location,
            Expr::Template(literal) => literal.location,
            Expr::Identifier(identifier) => identifier.location,
            Expr::Member(member) => member.location,
            Expr::Call(call) => call.location,
        }
    }
}

/// A `const`/`let`/`var` declaration.
#[derive(Debug, Clone)]
pub struct VarDecl<'a> {
    pub keyword: Identifier<'a>,
    pub name: Identifier<'a>,
    pub init: Option<Expr<'a>>,
    pub location: SourceLocation,
}

/// A parsed statement.
#[derive(Debug, Clone)]
pub enum Stmt<'a> {
    VarDecl(VarDecl<'a>),
    Expr { expr: Expr<'a> },
    /// A token that did not start any recognised statement.
    Other { token: Token<'a> },
}

/// A forgiving parser, turning a source string into a stream of statements.
#[derive(Debug)]
pub struct Parser<'a> {
    iter: MultiPeek<Tokenizer<'a>>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        Parser {
            iter: itertools::multipeek(Tokenizer::new(source)),
            errors: vec![],
        }
    }

    fn error(&mut self, location: SourceLocation, kind: ParseErrorKind) {
        self.errors.push(ParseError::new(location, kind));
    }

    /// Look at the next token without consuming it.
    fn peek(&mut self) -> Option<Token<'a>> {
        let token = self.iter.peek().copied();
        self.iter.reset_peek();
        token
    }

    /// Consume the next token if it is the given punctuation.
    fn eat_punct(&mut self, punct: Punct) -> bool {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Punct(punct) => {
                self.iter.next();
                true
            }
            _ => false,
        }
    }

    /// Take the next token, recording an error at `location` if the input
    /// ends instead.
    fn next_or_eof(&mut self, location: SourceLocation) -> Option<Token<'a>> {
        match self.iter.next() {
            Some(token) => Some(token),
            None => {
                self.error(location, ParseErrorKind::UnexpectedEof);
                None
            }
        }
    }

    /// Parse a full expression starting at `first`: a primary followed by
    /// any chain of member accesses and calls.
    fn parse_expression(&mut self, first: Token<'a>) -> Option<Expr<'a>> {
        let mut expr = self.parse_primary(first)?;
        loop {
            let next = match self.peek() {
                Some(token) => token,
                None => break,
            };
            match next.kind {
                TokenKind::Punct(Punct::Dot) => {
                    self.iter.next();
                    expr = self.parse_member(expr, false)?;
                }
                TokenKind::Punct(Punct::OptionalChain) => {
                    self.iter.next();
                    // `?.` starts an optional call, a computed access, or a
                    // plain property access depending on what follows
                    expr = match self.peek().map(|token| token.kind) {
                        Some(TokenKind::Punct(Punct::OpenParen)) => {
                            self.iter.next();
                            self.parse_call(expr, true)?
                        }
                        Some(TokenKind::Punct(Punct::OpenBracket)) => {
                            self.iter.next();
                            self.parse_computed(expr, true)?
                        }
                        _ => self.parse_member(expr, true)?,
                    };
                }
                TokenKind::Punct(Punct::OpenParen) => {
                    self.iter.next();
                    expr = self.parse_call(expr, false)?;
                }
                TokenKind::Punct(Punct::OpenBracket) => {
                    self.iter.next();
                    expr = self.parse_computed(expr, false)?;
                }
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_primary(&mut self, token: Token<'a>) -> Option<Expr<'a>> {
        match token.kind {
            TokenKind::Str { terminated } => {
                if !terminated {
                    self.error(token.location, ParseErrorKind::UnterminatedString);
                }
                Some(Expr::String(StringLiteral {
                    raw: token.raw,
                    location: token.location,
                }))
            }
            TokenKind::Template { terminated } => {
                if !terminated {
                    self.error(token.location, ParseErrorKind::UnterminatedString);
                }
                Some(Expr::Template(TemplateLiteral {
                    raw: token.raw,
                    location: token.location,
                }))
            }
            TokenKind::Number => Some(Expr::Number(NumberLiteral {
                raw: token.raw,
                location: token.location,
            })),
            TokenKind::Identifier => Some(Expr::Identifier(Identifier {
                name: token.raw,
                location: token.location,
            })),
            TokenKind::Punct(Punct::OpenParen) => {
                let first = self.next_or_eof(token.location)?;
                let expr = self.parse_expression(first)?;
                match self.iter.next() {
                    Some(close) if close.kind == TokenKind::Punct(Punct::CloseParen) => (),
                    Some(close) => self.error(close.location, ParseErrorKind::UnexpectedToken),
                    None => self.error(expr.location(), ParseErrorKind::UnexpectedEof),
                }
                Some(expr)
            }
            TokenKind::Punct(_) => {
                self.error(token.location, ParseErrorKind::UnexpectedToken);
                None
            }
        }
    }

    /// Parse the property name after a `.` or `?.`.
    fn parse_member(&mut self, object: Expr<'a>, optional: bool) -> Option<Expr<'a>> {
        match self.iter.next() {
            Some(token) if token.kind == TokenKind::Identifier => {
                let location = SourceLocation::new(object.location().start()..token.end());
                Some(Expr::Member(MemberExpr {
                    object: Box::new(object),
                    property: MemberProperty::Identifier(Identifier {
                        name: token.raw,
                        location: token.location,
                    }),
                    optional,
                    location,
                }))
            }
            Some(token) => {
                self.error(token.location, ParseErrorKind::ExpectedPropertyName);
                None
            }
            None => {
                self.error(object.location(), ParseErrorKind::UnexpectedEof);
                None
            }
        }
    }

    /// Parse a computed member access; the `[` is already consumed.
    fn parse_computed(&mut self, object: Expr<'a>, optional: bool) -> Option<Expr<'a>> {
        let first = self.next_or_eof(object.location())?;
        let property = self.parse_expression(first)?;
        let end = match self.iter.next() {
            Some(close) if close.kind == TokenKind::Punct(Punct::CloseBracket) => close.end(),
            Some(close) => {
                self.error(close.location, ParseErrorKind::UnexpectedToken);
                close.end()
            }
            None => {
                self.error(property.location(), ParseErrorKind::UnexpectedEof);
                property.location().end()
            }
        };
        let location = SourceLocation::new(object.location().start()..end);
        Some(Expr::Member(MemberExpr {
            object: Box::new(object),
            property: MemberProperty::Computed(Box::new(property)),
            optional,
            location,
        }))
    }

    /// Parse a call's argument list; the `(` is already consumed.
    fn parse_call(&mut self, callee: Expr<'a>, optional: bool) -> Option<Expr<'a>> {
        let mut arguments = vec![];
        let end;
        loop {
            let token = self.next_or_eof(callee.location())?;
            match token.kind {
                TokenKind::Punct(Punct::CloseParen) => {
                    end = token.end();
                    break;
                }
                TokenKind::Punct(Punct::Comma) => continue,
                TokenKind::Punct(Punct::Ellipsis) => {
                    let first = self.next_or_eof(token.location)?;
                    let expr = self.parse_expression(first)?;
                    let location = SourceLocation::new(token.start()..expr.location().end());
                    arguments.push(Argument::Spread { expr, location });
                }
                _ => {
                    let expr = self.parse_expression(token)?;
                    arguments.push(Argument::Expr(expr));
                }
            }
        }
        let location = SourceLocation::new(callee.location().start()..end);
        Some(Expr::Call(CallExpr {
            callee: Box::new(callee),
            arguments,
            optional,
            location,
        }))
    }

    /// Read a `const`/`let`/`var` declaration.
    fn read_var_decl(&mut self, keyword: Token<'a>) -> Stmt<'a> {
        let name = match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier => {
                self.iter.next();
                Identifier {
                    name: token.raw,
                    location: token.location,
                }
            }
            _ => {
                self.error(keyword.location, ParseErrorKind::MissingDeclarationName);
                return Stmt::Other { token: keyword };
            }
        };

        let mut init = None;
        let mut end = name.location.end();
        if self.eat_punct(Punct::Equals) {
            if let Some(first) = self.next_or_eof(name.location) {
                if let Some(expr) = self.parse_expression(first) {
                    end = expr.location().end();
                    init = Some(expr);
                }
            }
        }
        self.eat_punct(Punct::Semicolon);

        Stmt::VarDecl(VarDecl {
            keyword: Identifier {
                name: keyword.raw,
                location: keyword.location,
            },
            name,
            init,
            location: SourceLocation::new(keyword.start()..end),
        })
    }

    fn read_expr_stmt(&mut self, first: Token<'a>) -> Stmt<'a> {
        match self.parse_expression(first) {
            Some(expr) => {
                self.eat_punct(Punct::Semicolon);
                Stmt::Expr { expr }
            }
            None => Stmt::Other { token: first },
        }
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = (Stmt<'a>, Vec<ParseError>);

    fn next(&mut self) -> Option<Self::Item> {
        let token = loop {
            let token = self.iter.next()?;
            // empty statements are fine
            if token.kind != TokenKind::Punct(Punct::Semicolon) {
                break token;
            }
        };

        let stmt = match token.kind {
            TokenKind::Identifier if matches!(token.raw, "const" | "let" | "var") => {
                self.read_var_decl(token)
            }
            _ => self.read_expr_stmt(token),
        };

        Some((stmt, std::mem::take(&mut self.errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<(Stmt<'_>, Vec<ParseError>)> {
        Parser::new(source).collect()
    }

    #[test]
    fn read_file_call() {
        let stmts = parse("fs.readFileSync(file, 'utf-8')");
        assert_eq!(stmts.len(), 1);
        let (stmt, errors) = &stmts[0];
        assert!(errors.is_empty());
        let call = match stmt {
            Stmt::Expr {
                expr: Expr::Call(call),
            } => call,
            other => panic!("expected a call statement, got {:?}", other),
        };
        assert!(!call.optional);
        assert_eq!(call.arguments.len(), 2);

        let callee = match call.callee.as_ref() {
            Expr::Member(member) => member,
            other => panic!("expected a member callee, got {:?}", other),
        };
        assert!(!callee.optional);
        assert_eq!(callee.property_name(), Some("readFileSync"));
        match callee.object.as_ref() {
            Expr::Identifier(object) => assert_eq!(object.name, "fs"),
            other => panic!("expected an identifier object, got {:?}", other),
        }

        match &call.arguments[1] {
            Argument::Expr(Expr::String(literal)) => {
                assert_eq!(literal.raw, "'utf-8'");
                assert_eq!(literal.value(), "utf-8");
            }
            other => panic!("expected a string argument, got {:?}", other),
        }
    }

    #[test]
    fn var_decl() {
        let stmts = parse("const label = \"UTF-8\";");
        assert_eq!(stmts.len(), 1);
        let (stmt, errors) = &stmts[0];
        assert!(errors.is_empty());
        let decl = match stmt {
            Stmt::VarDecl(decl) => decl,
            other => panic!("expected a declaration, got {:?}", other),
        };
        assert_eq!(decl.keyword.name, "const");
        assert_eq!(decl.name.name, "label");
        match &decl.init {
            Some(Expr::String(literal)) => assert_eq!(literal.value(), "UTF-8"),
            other => panic!("expected a string initializer, got {:?}", other),
        }
    }

    #[test]
    fn optional_call() {
        let stmts = parse("fs.readFile?.(file, 'utf-8')");
        let call = match &stmts[0].0 {
            Stmt::Expr {
                expr: Expr::Call(call),
            } => call,
            other => panic!("expected a call statement, got {:?}", other),
        };
        assert!(call.optional);
        match call.callee.as_ref() {
            Expr::Member(member) => assert!(!member.optional),
            other => panic!("expected a member callee, got {:?}", other),
        }
    }

    #[test]
    fn optional_member() {
        let stmts = parse("fs?.readFile(file, 'utf-8')");
        let call = match &stmts[0].0 {
            Stmt::Expr {
                expr: Expr::Call(call),
            } => call,
            other => panic!("expected a call statement, got {:?}", other),
        };
        assert!(!call.optional);
        match call.callee.as_ref() {
            Expr::Member(member) => {
                assert!(member.optional);
                assert_eq!(member.property_name(), Some("readFile"));
            }
            other => panic!("expected a member callee, got {:?}", other),
        }
    }

    #[test]
    fn computed_member() {
        let stmts = parse("fs[\"readFile\"](file)");
        let call = match &stmts[0].0 {
            Stmt::Expr {
                expr: Expr::Call(call),
            } => call,
            other => panic!("expected a call statement, got {:?}", other),
        };
        match call.callee.as_ref() {
            Expr::Member(member) => {
                assert_eq!(member.property_name(), None);
                match &member.property {
                    MemberProperty::Computed(property) => match property.as_ref() {
                        Expr::String(literal) => assert_eq!(literal.value(), "readFile"),
                        other => panic!("expected a string property, got {:?}", other),
                    },
                    other => panic!("expected a computed property, got {:?}", other),
                }
            }
            other => panic!("expected a member callee, got {:?}", other),
        }
    }

    #[test]
    fn spread_argument() {
        let stmts = parse("thing.readFile(...names, 'utf-8')");
        let call = match &stmts[0].0 {
            Stmt::Expr {
                expr: Expr::Call(call),
            } => call,
            other => panic!("expected a call statement, got {:?}", other),
        };
        assert_eq!(call.arguments.len(), 2);
        assert!(matches!(call.arguments[0], Argument::Spread { .. }));
        assert!(matches!(call.arguments[1], Argument::Expr(_)));
    }

    #[test]
    fn missing_declaration_name() {
        let stmts = parse("const = 1;");
        let (stmt, errors) = &stmts[0];
        assert!(matches!(stmt, Stmt::Other { .. }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::MissingDeclarationName);
    }

    #[test]
    fn unexpected_token_keeps_going() {
        let stmts = parse(") fs.readFile(file)");
        assert_eq!(stmts.len(), 2);
        let (stmt, errors) = &stmts[0];
        assert!(matches!(stmt, Stmt::Other { .. }));
        assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedToken);
        assert!(stmts[1].1.is_empty());
        assert!(matches!(
            stmts[1].0,
            Stmt::Expr {
                expr: Expr::Call(_)
            }
        ));
    }

    #[test]
    fn unterminated_string_is_reported() {
        let stmts = parse("'utf-8");
        let (stmt, errors) = &stmts[0];
        assert!(matches!(
            stmt,
            Stmt::Expr {
                expr: Expr::String(_)
            }
        ));
        assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedString);
    }
}
