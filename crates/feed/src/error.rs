// ABOUTME: Error types for loading, validating and rendering podcast feeds.
// ABOUTME: Provides FeedError with Malformed, Validation, and Xml variants.

use std::fmt;
use thiserror::Error;

use crate::report::ValidationReport;

/// Errors that stop feed generation.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The input document could not be parsed at all.
    #[error("malformed input{}: {message}", position(*line, *column))]
    Malformed {
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    /// The document parsed but one or more fields are missing or invalid.
    #[error("configuration is invalid ({} error(s))", .0.len())]
    Validation(ValidationReport),

    /// The element tree could not be serialized.
    #[error("failed to write XML: {0}")]
    Xml(String),
}

impl FeedError {
    /// Creates a Malformed error without position information.
    pub fn malformed(msg: impl Into<String>) -> Self {
        FeedError::Malformed {
            line: None,
            column: None,
            message: msg.into(),
        }
    }

    /// Creates an Xml error from a writer error.
    pub fn xml(err: impl fmt::Display) -> Self {
        FeedError::Xml(err.to_string())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, FeedError::Malformed { .. })
    }

    /// The validation report, when this is a validation failure.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            FeedError::Validation(r) => Some(r),
            _ => None,
        }
    }
}

fn position(line: Option<usize>, column: Option<usize>) -> String {
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {} column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        _ => String::new(),
    }
}
