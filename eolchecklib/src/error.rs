//! Error types for eolchecklib

use std::fmt;

use thiserror::Error;

/// Errors that can occur while discovering or classifying files
#[derive(Error, Debug)]
pub enum EolcheckError {
    /// Failed to read a source while scanning it
    #[error("failed to read '{name}': {source}")]
    Read {
        name: String,
        source: std::io::Error,
    },

    /// A source could not be opened for reading
    #[error("failed to open '{name}': {message}")]
    Open { name: String, message: String },

    /// The diff report did not follow the raw record format
    #[error("malformed diff report: {0}")]
    Format(#[from] FormatError),

    /// Git operation error
    #[error("git error: {0}")]
    GitError(String),
}

/// A positioned violation of the raw diff record grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at position {position}")]
pub struct FormatError {
    /// Byte offset into the diff report where parsing stopped
    pub position: usize,
    /// What was wrong at that offset
    pub kind: FormatErrorKind,
}

impl FormatError {
    pub(crate) fn new(position: usize, kind: FormatErrorKind) -> Self {
        Self { position, kind }
    }
}

/// The specific grammar violation inside a [`FormatError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// A marker or delimiter byte was expected but another byte was found
    Missing(u8),
    /// The input ended while searching for a delimiter
    UnexpectedEof(u8),
    /// The input ended where a status letter was expected
    MissingStatus,
    /// The similarity score contained something other than digits
    InvalidScore(String),
    /// The status byte is not part of the status alphabet
    UnknownStatus(u8),
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorKind::Missing(b) => write!(f, "missing {}", ByteName(*b)),
            FormatErrorKind::UnexpectedEof(b) => {
                write!(f, "unexpected end of input, expected {}", ByteName(*b))
            }
            FormatErrorKind::MissingStatus => {
                f.write_str("unexpected end of input, expected status")
            }
            FormatErrorKind::InvalidScore(s) => write!(f, "invalid similarity score {:?}", s),
            FormatErrorKind::UnknownStatus(b) => write!(f, "unknown status {}", ByteName(*b)),
        }
    }
}

/// Human-readable name of a delimiter byte
struct ByteName(u8);

impl fmt::Display for ByteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("NUL"),
            b'\t' => f.write_str("TAB"),
            b'\n' => f.write_str("LF"),
            b' ' => f.write_str("SPACE"),
            b if b < 0x20 || b >= 0x7f => write!(f, "'\\x{:02x}'", b),
            b => write!(f, "'{}'", b as char),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_names_delimiters() {
        let err = FormatError::new(12, FormatErrorKind::Missing(b'\t'));
        assert_eq!(err.to_string(), "missing TAB at position 12");

        let err = FormatError::new(0, FormatErrorKind::Missing(b':'));
        assert_eq!(err.to_string(), "missing ':' at position 0");

        let err = FormatError::new(7, FormatErrorKind::UnexpectedEof(0));
        assert_eq!(
            err.to_string(),
            "unexpected end of input, expected NUL at position 7"
        );
    }

    #[test]
    fn test_format_error_converts_into_library_error() {
        let err: EolcheckError = FormatError::new(3, FormatErrorKind::UnknownStatus(0x01)).into();
        assert!(matches!(err, EolcheckError::Format(_)));
        assert_eq!(
            err.to_string(),
            "malformed diff report: unknown status '\\x01' at position 3"
        );
    }
}
