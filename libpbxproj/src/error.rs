//! Error types for pbxproj parsing.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::token::Token;

/// Result type for pbxproj parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Build a location from a 1-based line and a 0-based offset within that line.
    pub fn locate(&self, line: usize, pos: usize) -> Location {
        Location {
            line,
            column: pos + 1,
            filename: self.filename.clone(),
        }
    }

    /// Location of the first character of a token.
    pub fn locate_token(&self, token: &Token) -> Location {
        self.locate(token.line, token.pos)
    }
}

/// A 1-based line and column in the source, optionally qualified by filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub filename: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(f, "{}:{}:{}", name, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// Error type for pbxproj parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A `/*` comment with no closing `*/` before end of input.
    #[error("Unterminated comment at {0}")]
    UnterminatedComment(Location),

    /// A quoted string with no closing quote before end of input.
    #[error("Unterminated string at {0}")]
    UnterminatedString(Location),

    /// A character outside the format's alphabet.
    #[error("Illegal character {:?} at {location}", .token.literal)]
    IllegalCharacter { token: Token, location: Location },

    /// The input is not valid UTF-8.
    #[error("Invalid UTF-8 on line {line}")]
    InvalidUtf8 { line: usize },

    /// The document does not start with the `// !$*UTF8*$!` header.
    #[error("Expected header but got {found} at {location}")]
    MissingHeader { found: Token, location: Location },

    /// A token that does not fit the grammar at this position.
    #[error("Expected {expected} but got {found} at {location}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        location: Location,
    },

    /// Containers nested deeper than the configured maximum.
    #[error("Too deeply nested (maximum depth {max_depth}) at {location}")]
    TooDeeplyNested { max_depth: usize, location: Location },

    /// A key that appears twice in one mapping, when duplicates are rejected.
    #[error("Duplicate key {key:?} at {location}")]
    DuplicateKey { key: String, location: Location },

    /// Failure reading the underlying source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Where the error happened, when it is tied to a source position.
    pub fn location(&self) -> Option<&Location> {
        match self {
            ParseError::UnterminatedComment(location)
            | ParseError::UnterminatedString(location)
            | ParseError::IllegalCharacter { location, .. }
            | ParseError::MissingHeader { location, .. }
            | ParseError::UnexpectedToken { location, .. }
            | ParseError::TooDeeplyNested { location, .. }
            | ParseError::DuplicateKey { location, .. } => Some(location),
            ParseError::InvalidUtf8 { .. } | ParseError::Io(_) => None,
        }
    }

    /// Returns `true` for errors raised while splitting the input into tokens.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            ParseError::UnterminatedComment(_)
                | ParseError::UnterminatedString(_)
                | ParseError::IllegalCharacter { .. }
                | ParseError::InvalidUtf8 { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_location_display() {
        let ctx = ParseContext::new(None);
        assert_eq!(ctx.locate(3, 0).to_string(), "3:1");

        let ctx = ParseContext::new(Some("project.pbxproj"));
        assert_eq!(ctx.locate(12, 4).to_string(), "project.pbxproj:12:5");
    }

    #[test]
    fn test_unexpected_token_message() {
        let ctx = ParseContext::new(None);
        let found = Token::new(TokenKind::Identifier, "\"Bar\"", 2, 7);
        let err = ParseError::UnexpectedToken {
            expected: "Comma",
            location: ctx.locate_token(&found),
            found,
        };
        assert_eq!(
            err.to_string(),
            "Expected Comma but got Identifier(\"\\\"Bar\\\"\") at 2:8"
        );
        assert!(!err.is_lexical());
        assert_eq!(err.location().map(|l| (l.line, l.column)), Some((2, 8)));
    }

    #[test]
    fn test_errors_without_location() {
        let err = ParseError::InvalidUtf8 { line: 4 };
        assert!(err.location().is_none());
        assert!(err.is_lexical());

        let err = ParseError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.location().is_none());
        assert!(!err.is_lexical());
    }
}
