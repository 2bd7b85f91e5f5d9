//! Parsed templates and call-site expansion

use crate::lexer::{Lexer, Token};
use ferry_symbols::Span;
use std::fmt;
use thiserror::Error;

/// A target-language expression, as text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(pub String);

impl Expr {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Problems found while parsing a pattern against a member signature
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct TemplateError {
    pub reason: String,
    pub span: Span,
}

impl TemplateError {
    fn new(reason: impl Into<String>, span: Span) -> Self {
        Self { reason: reason.into(), span }
    }
}

/// Problems found while substituting at a call site
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("template uses `{{this}}` but the call site has no receiver")]
    MissingReceiver,
    #[error("template needs argument {index} but the call site passes {supplied}")]
    MissingArgument { index: usize, supplied: usize },
}

/// What the member looks like to the template
#[derive(Debug, Clone, Default)]
pub struct TemplateContext<'a> {
    pub parameter_names: Vec<&'a str>,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Text(String),
    /// `{this}`
    Receiver,
    /// `{@}`
    ResolvedName,
    /// `{N}` or `{paramName}`
    Argument(usize),
}

/// A validated pattern, ready to expand at any number of call sites
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    pattern: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(pattern: &str, ctx: &TemplateContext<'_>) -> Result<Self, TemplateError> {
        let tokens = Lexer::tokenize(pattern).map_err(|e| TemplateError::new(e.message, e.span))?;
        let mut segments: Vec<Segment> = Vec::new();

        for spanned in tokens {
            let segment = match spanned.token {
                Token::Eof => break,
                Token::Text(text) => Segment::Text(text),
                Token::EscapedOpen => Segment::Text("{".to_string()),
                Token::EscapedClose => Segment::Text("}".to_string()),
                Token::Placeholder(inner) => classify(&inner, spanned.span, ctx)?,
            };
            // Adjacent text pieces are merged so expansion is a plain concatenation
            if let Segment::Text(next) = &segment {
                if let Some(Segment::Text(prev)) = segments.last_mut() {
                    prev.push_str(next);
                    continue;
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of argument slots the template consumes: highest index used plus one
    pub fn arity(&self) -> usize {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Argument(i) => Some(i + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    pub fn uses_receiver(&self) -> bool {
        self.segments.contains(&Segment::Receiver)
    }

    pub fn uses_resolved_name(&self) -> bool {
        self.segments.contains(&Segment::ResolvedName)
    }

    /// Substitute receiver, arguments and the member's resolved name
    pub fn expand(
        &self,
        receiver: Option<&Expr>,
        args: &[Expr],
        resolved_name: &str,
    ) -> Result<Expr, ExpandError> {
        let mut out = String::with_capacity(self.pattern.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Receiver => {
                    out.push_str(receiver.ok_or(ExpandError::MissingReceiver)?.as_str())
                }
                Segment::ResolvedName => out.push_str(resolved_name),
                Segment::Argument(index) => {
                    let arg = args.get(*index).ok_or(ExpandError::MissingArgument {
                        index: *index,
                        supplied: args.len(),
                    })?;
                    out.push_str(arg.as_str());
                }
            }
        }
        Ok(Expr(out))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn classify(inner: &str, span: Span, ctx: &TemplateContext<'_>) -> Result<Segment, TemplateError> {
    let arity = ctx.parameter_names.len();
    match inner {
        "this" if ctx.is_static => Err(TemplateError::new(
            "`{this}` is not available on a static member",
            span,
        )),
        "this" => Ok(Segment::Receiver),
        "@" => Ok(Segment::ResolvedName),
        "" => Err(TemplateError::new("empty placeholder `{}`", span)),
        digits if digits.bytes().all(|b| b.is_ascii_digit()) => {
            let index: usize = digits.parse().map_err(|_| {
                TemplateError::new(format!("argument index `{}` is too large", digits), span)
            })?;
            if index >= arity {
                return Err(TemplateError::new(
                    format!("argument index {} is out of range for {} parameter(s)", index, arity),
                    span,
                ));
            }
            Ok(Segment::Argument(index))
        }
        name => match ctx.parameter_names.iter().position(|p| *p == name) {
            Some(index) => Ok(Segment::Argument(index)),
            None => Err(TemplateError::new(
                format!("unrecognized placeholder `{{{}}}`", name),
                span,
            )),
        },
    }
}
