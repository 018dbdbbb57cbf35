//! Manifest error types

use crate::lexer::LexError;
use crate::token::Span;
use thiserror::Error;

/// Errors that make a manifest unreadable as a whole.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManifestError {
    /// The text is not valid under the manifest grammar
    #[error("Manifest syntax error at {line}:{column}: {message}")]
    Syntax {
        message: String,
        line: u32,
        column: u32,
        /// The complete manifest text that failed to parse
        source_text: String,
    },
}

impl ManifestError {
    pub fn syntax(message: impl Into<String>, span: Span, source: &str) -> Self {
        ManifestError::Syntax {
            message: message.into(),
            line: span.line,
            column: span.column,
            source_text: source.to_string(),
        }
    }

    pub(crate) fn from_lex(error: &LexError, source: &str) -> Self {
        let message = match error {
            LexError::UnexpectedCharacter { char, .. } => {
                format!("unexpected character `{}`", char.escape_debug())
            }
            LexError::UnterminatedString { .. } => "unterminated string".to_string(),
            LexError::UnterminatedComment { .. } => "unterminated block comment".to_string(),
            LexError::InvalidEscape { text, .. } => {
                format!("invalid escape sequence in {}", text)
            }
        };
        Self::syntax(message, error.span(), source)
    }

    /// The manifest text the error was raised for.
    pub fn source_text(&self) -> &str {
        match self {
            ManifestError::Syntax { source_text, .. } => source_text,
        }
    }
}
