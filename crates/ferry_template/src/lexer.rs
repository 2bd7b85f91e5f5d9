//! Tokens of a template pattern

use ferry_symbols::Span;
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal target-language text
    #[regex(r"[^{}]+", |lex| lex.slice().to_string())]
    Text(String),

    /// `{...}` with the inner text
    #[regex(r"\{[^{}]*\}", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Placeholder(String),

    #[token("{{")]
    EscapedOpen,
    #[token("}}")]
    EscapedClose,

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(s) => write!(f, "{}", s),
            Token::Placeholder(s) => write!(f, "{{{}}}", s),
            Token::EscapedOpen => write!(f, "{{{{"),
            Token::EscapedClose => write!(f, "}}}}"),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for LexError {}

/// Lexer wrapper that produces SpannedTokens
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, Token>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: Token::lexer(source),
            finished: false,
        }
    }

    /// Tokenize a whole pattern, ending with [`Token::Eof`]
    pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();

        loop {
            let spanned = lexer.next_token()?;
            let is_eof = spanned.token == Token::Eof;
            tokens.push(spanned);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    pub fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        if self.finished {
            let len = self.inner.source().len();
            return Ok(SpannedToken {
                token: Token::Eof,
                span: Span::new(len, len),
            });
        }

        match self.inner.next() {
            Some(Ok(token)) => {
                let span = self.inner.span();
                Ok(SpannedToken {
                    token,
                    span: Span::new(span.start, span.end),
                })
            }
            Some(Err(())) => {
                let span = self.inner.span();
                let slice = self.inner.slice();
                let message = if slice.starts_with('{') {
                    "unclosed `{`".to_string()
                } else if slice.starts_with('}') {
                    "unmatched `}`".to_string()
                } else {
                    format!("unexpected input: '{}'", slice)
                };
                Err(LexError {
                    message,
                    span: Span::new(span.start, span.end),
                })
            }
            None => {
                self.finished = true;
                let len = self.inner.source().len();
                Ok(SpannedToken {
                    token: Token::Eof,
                    span: Span::new(len, len),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokens() {
        let tokens = Lexer::tokenize("{this}.bar({0})").unwrap();

        assert!(matches!(tokens[0].token, Token::Placeholder(ref s) if s == "this"));
        assert!(matches!(tokens[1].token, Token::Text(ref s) if s == ".bar("));
        assert!(matches!(tokens[2].token, Token::Placeholder(ref s) if s == "0"));
        assert!(matches!(tokens[3].token, Token::Text(ref s) if s == ")"));
        assert!(matches!(tokens[4].token, Token::Eof));
        assert_eq!(tokens[2].span, Span::new(11, 14));
    }

    #[test]
    fn test_escaped_braces() {
        let tokens = Lexer::tokenize("{{ a: {0} }}").unwrap();
        assert_eq!(tokens[0].token, Token::EscapedOpen);
        assert_eq!(tokens[1].token, Token::Text(" a: ".into()));
        assert_eq!(tokens[2].token, Token::Placeholder("0".into()));
        assert_eq!(tokens[3].token, Token::Text(" ".into()));
        assert_eq!(tokens[4].token, Token::EscapedClose);
    }

    #[test]
    fn test_unclosed_brace() {
        let err = Lexer::tokenize("foo({0)").unwrap_err();
        assert_eq!(err.message, "unclosed `{`");
        assert_eq!(err.span.start, 4);
    }
}
