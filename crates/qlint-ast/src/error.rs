//! Error types for the script front end.

use thiserror::Error;

/// Errors that can occur while parsing a script.
///
/// A parse error means the whole file is unanalyzable: no partial trees
/// are ever produced.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (unrecognized input).
    #[error("lexer error at line {line}: unrecognized token '{token}'")]
    Lexer { line: u32, token: String },

    /// Unexpected token.
    #[error("unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: u32,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input: expected {0}")]
    UnexpectedEof(String),
}

impl ParseError {
    /// The 1-based source line the error points at, when known.
    pub fn line(&self) -> Option<u32> {
        match self {
            ParseError::Lexer { line, .. } | ParseError::UnexpectedToken { line, .. } => {
                Some(*line)
            }
            ParseError::UnexpectedEof(_) => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
