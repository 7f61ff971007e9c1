//! Error types for repair, match, and edit operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the repair/match/edit engine
#[derive(Debug, Error)]
pub enum KintsuError {
    /// Source text that does not parse into the required shape
    #[error("Parse error: {message}")]
    ParseError { message: String, offset: usize },

    /// A malformed pattern expression
    #[error("Pattern error: {message}")]
    PatternError { message: String },

    /// A structural edit whose pattern resolved to no target
    #[error("No match for pattern `{pattern}`")]
    PatternNoMatch { pattern: String },

    /// A structural edit that could not be applied
    #[error("Edit error: {message}")]
    EditError { message: String },

    /// The external evaluator reported a transport-level failure
    #[error("Evaluation error: {message}")]
    EvalError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Pattern,
    NoMatch,
    Edit,
    Eval,
    Io,
    Internal,
}

impl KintsuError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            KintsuError::ParseError { .. } => ErrorKind::Parse,
            KintsuError::PatternError { .. } => ErrorKind::Pattern,
            KintsuError::PatternNoMatch { .. } => ErrorKind::NoMatch,
            KintsuError::EditError { .. } => ErrorKind::Edit,
            KintsuError::EvalError { .. } => ErrorKind::Eval,
            KintsuError::IoError { .. } => ErrorKind::Io,
            KintsuError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    pub fn parse_error(message: impl Into<String>, offset: usize) -> Self {
        Self::ParseError {
            message: message.into(),
            offset,
        }
    }

    pub fn pattern_error(message: impl Into<String>) -> Self {
        Self::PatternError {
            message: message.into(),
        }
    }

    pub fn no_match(pattern: impl Into<String>) -> Self {
        Self::PatternNoMatch {
            pattern: pattern.into(),
        }
    }

    pub fn edit_error(message: impl Into<String>) -> Self {
        Self::EditError {
            message: message.into(),
        }
    }

    pub fn eval_error(message: impl Into<String>) -> Self {
        Self::EvalError {
            message: message.into(),
        }
    }

    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for KintsuError {
    fn from(err: serde_json::Error) -> Self {
        Self::InternalError {
            message: format!("JSON serialization failed: {err}"),
        }
    }
}

impl From<std::io::Error> for KintsuError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        let err = KintsuError::no_match("(defn ? *)");
        assert_eq!(err.kind(), ErrorKind::NoMatch);

        let err = KintsuError::internal_error("boom");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn display_includes_pattern() {
        let err = KintsuError::no_match("(foo ?)");
        assert_eq!(err.to_string(), "No match for pattern `(foo ?)`");
    }
}
