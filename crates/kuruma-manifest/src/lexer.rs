//! Lexer for the manifest dialect.
//!
//! Built on logos. Comments are recognised by the lexer and dropped before
//! the token stream reaches the parser; everything else maps one-to-one onto
//! [`Token`].

use crate::token::{Span, Token};
use logos::Logos;
use std::fmt;

/// Logos-based token enum for lexing.
///
/// Converted to the public [`Token`] enum after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Whitespace (skip), including a leading byte-order mark
    #[regex(r"[ \t\r\n\f\u{FEFF}]+", logos::skip)]
    Whitespace,

    // Line and block comments; dropped by `Lexer::tokenize`
    #[token("--", lex_comment)]
    Comment,

    #[token("local")]
    Local,

    #[token("nil")]
    Nil,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[token("not")]
    Not,

    #[token("function", keyword)]
    #[token("if", keyword)]
    #[token("then", keyword)]
    #[token("else", keyword)]
    #[token("elseif", keyword)]
    #[token("end", keyword)]
    #[token("for", keyword)]
    #[token("in", keyword)]
    #[token("while", keyword)]
    #[token("do", keyword)]
    #[token("repeat", keyword)]
    #[token("until", keyword)]
    #[token("return", keyword)]
    #[token("break", keyword)]
    #[token("goto", keyword)]
    Reserved(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[regex(r"0[xX][0-9a-fA-F]+", |lex| lex.slice().to_string())]
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    #[regex(r#""([^"\\\n]|\\(.|\n))*""#, parse_string)]
    #[regex(r"'([^'\\\n]|\\(.|\n))*'", parse_string)]
    StringLiteral(String),

    #[regex(r"\[=*\[", lex_long_string)]
    LongString(String),

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    #[token("..")]
    DotDot,

    #[token("...")]
    Ellipsis,

    #[token("=")]
    Equal,

    #[token("==")]
    EqualEqual,

    #[token("~=")]
    TildeEqual,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEqual,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEqual,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("//")]
    SlashSlash,

    #[token("%")]
    Percent,

    #[token("^")]
    Caret,

    #[token("#")]
    Hash,
}

fn keyword(lex: &mut logos::Lexer<LogosToken>) -> String {
    lex.slice().to_string()
}

/// Length of the `=` run in a long bracket opener such as `[==[`, if the
/// text starts with one.
fn long_bracket_level(text: &str) -> Option<usize> {
    let rest = text.strip_prefix('[')?;
    let level = rest.bytes().take_while(|&b| b == b'=').count();
    (rest.as_bytes().get(level) == Some(&b'[')).then_some(level)
}

fn closing_bracket(level: usize) -> String {
    format!("]{}]", "=".repeat(level))
}

// `--` has been consumed. A long bracket right after it opens a block
// comment; anything else runs to the end of the line.
fn lex_comment(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let remainder = lex.remainder();

    if let Some(level) = long_bracket_level(remainder) {
        let opener = level + 2;
        let close = closing_bracket(level);
        return match remainder[opener..].find(&close) {
            Some(end) => {
                lex.bump(opener + end + close.len());
                true
            }
            None => false,
        };
    }

    lex.bump(remainder.find('\n').unwrap_or(remainder.len()));
    true
}

fn lex_long_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let level = lex.slice().len() - 2;
    let close = closing_bracket(level);
    let remainder = lex.remainder();
    let end = remainder.find(&close)?;
    lex.bump(end + close.len());

    // A newline directly after the opener is not part of the string
    let body = &remainder[..end];
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);
    Some(body.to_string())
}

fn parse_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let s = lex.slice();
    let inner = &s[1..s.len() - 1]; // Remove quotes
    unescape_string(inner)
}

/// Decode Lua escape sequences. Returns `None` on a malformed escape.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.next()? {
            'n' | '\n' => result.push('\n'),
            'r' => result.push('\r'),
            't' => result.push('\t'),
            'a' => result.push('\u{07}'),
            'b' => result.push('\u{08}'),
            'f' => result.push('\u{0C}'),
            'v' => result.push('\u{0B}'),
            '\\' => result.push('\\'),
            '"' => result.push('"'),
            '\'' => result.push('\''),
            'z' => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            'x' => {
                let hi = chars.next()?.to_digit(16)?;
                let lo = chars.next()?.to_digit(16)?;
                result.push(char::from_u32(hi * 16 + lo)?);
            }
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let mut code = 0u32;
                let mut digits = 0;
                loop {
                    let c = chars.next()?;
                    if c == '}' {
                        break;
                    }
                    code = code.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
                    digits += 1;
                }
                if digits == 0 {
                    return None;
                }
                result.push(char::from_u32(code)?);
            }
            d if d.is_ascii_digit() => {
                let mut code = d.to_digit(10)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(10)) {
                        Some(next) => {
                            code = code * 10 + next;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if code > 255 {
                    return None;
                }
                result.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }

    Some(result)
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    errors: Vec<LexError>,
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { char: char, span: Span },
    UnterminatedString { span: Span },
    UnterminatedComment { span: Span },
    InvalidEscape { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidEscape { span, .. } => *span,
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, Vec<LexError>> {
        let mut logos_lexer = LogosToken::lexer(self.source);
        let mut line = 1u32;
        let mut column = 1u32;
        let mut last_end = 0;

        while let Some(token_result) = logos_lexer.next() {
            let range = logos_lexer.span();

            // Update line and column based on skipped text
            advance_position(&self.source[last_end..range.start], &mut line, &mut column);

            let span = Span::new(range.start, range.end, line, column);

            match token_result {
                Ok(logos_token) => {
                    if let Some(token) = convert_token(logos_token) {
                        self.tokens.push((token, span));
                    }
                }
                Err(()) => {
                    let error = self.classify_error(span);
                    self.errors.push(error);
                }
            }

            advance_position(&self.source[range.start..range.end], &mut line, &mut column);
            last_end = range.end;
        }

        advance_position(&self.source[last_end..], &mut line, &mut column);
        let eof_span = Span::new(self.source.len(), self.source.len(), line, column);
        self.tokens.push((Token::Eof, eof_span));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn classify_error(&self, span: Span) -> LexError {
        let text = &self.source[span.start..];
        let slice = span.slice(self.source);

        if text.starts_with("--") {
            return LexError::UnterminatedComment { span };
        }
        if long_bracket_level(text).is_some() {
            return LexError::UnterminatedString { span };
        }

        match text.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                // A full quoted literal that failed to decode has a bad escape
                if slice.len() >= 2 && slice.ends_with(quote) {
                    LexError::InvalidEscape {
                        text: slice.to_string(),
                        span,
                    }
                } else {
                    LexError::UnterminatedString { span }
                }
            }
            Some(char) => LexError::UnexpectedCharacter { char, span },
            None => LexError::UnexpectedCharacter { char: '\0', span },
        }
    }
}

fn advance_position(text: &str, line: &mut u32, column: &mut u32) {
    for c in text.chars() {
        if c == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}

/// Map a logos token onto the public token type; trivia maps to `None`.
fn convert_token(logos_token: LogosToken) -> Option<Token> {
    let token = match logos_token {
        LogosToken::Whitespace | LogosToken::Comment => return None,
        LogosToken::Local => Token::Local,
        LogosToken::Nil => Token::Nil,
        LogosToken::True => Token::True,
        LogosToken::False => Token::False,
        LogosToken::And => Token::And,
        LogosToken::Or => Token::Or,
        LogosToken::Not => Token::Not,
        LogosToken::Reserved(kw) => Token::Reserved(kw),
        LogosToken::Identifier(name) => Token::Identifier(name),
        LogosToken::Number(n) => Token::Number(n),
        LogosToken::StringLiteral(s) | LogosToken::LongString(s) => Token::StringLiteral(s),
        LogosToken::LeftBrace => Token::LeftBrace,
        LogosToken::RightBrace => Token::RightBrace,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::LeftBracket => Token::LeftBracket,
        LogosToken::RightBracket => Token::RightBracket,
        LogosToken::Comma => Token::Comma,
        LogosToken::Semicolon => Token::Semicolon,
        LogosToken::Colon => Token::Colon,
        LogosToken::Dot => Token::Dot,
        LogosToken::DotDot => Token::DotDot,
        LogosToken::Ellipsis => Token::Ellipsis,
        LogosToken::Equal => Token::Equal,
        LogosToken::EqualEqual => Token::EqualEqual,
        LogosToken::TildeEqual => Token::TildeEqual,
        LogosToken::Less => Token::Less,
        LogosToken::LessEqual => Token::LessEqual,
        LogosToken::Greater => Token::Greater,
        LogosToken::GreaterEqual => Token::GreaterEqual,
        LogosToken::Plus => Token::Plus,
        LogosToken::Minus => Token::Minus,
        LogosToken::Star => Token::Star,
        LogosToken::Slash => Token::Slash,
        LogosToken::SlashSlash => Token::SlashSlash,
        LogosToken::Percent => Token::Percent,
        LogosToken::Caret => Token::Caret,
        LogosToken::Hash => Token::Hash,
    };
    Some(token)
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter { char, span } => {
                write!(f, "Unexpected character '{}' at {}:{}", char, span.line, span.column)
            }
            LexError::UnterminatedString { span } => {
                write!(f, "Unterminated string at {}:{}", span.line, span.column)
            }
            LexError::UnterminatedComment { span } => {
                write!(f, "Unterminated block comment at {}:{}", span.line, span.column)
            }
            LexError::InvalidEscape { text, span } => {
                write!(f, "Invalid escape sequence in {} at {}:{}", text, span.line, span.column)
            }
        }
    }
}

impl std::error::Error for LexError {}
