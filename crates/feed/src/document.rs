// ABOUTME: Config loader: turns raw YAML (or JSON) text into a generic document tree.
// ABOUTME: Syntax errors become FeedError::Malformed with line and column when known.

use serde_yaml::Value;

use crate::error::FeedError;

/// Parsed but unvalidated configuration.
pub type Document = Value;

/// Parses configuration text into a [`Document`].
///
/// Knows nothing about the podcast schema; an empty input yields `Null`,
/// which the validator reports as missing sections.
pub fn parse_document(text: &str) -> Result<Document, FeedError> {
    serde_yaml::from_str(text).map_err(|e| {
        let location = e.location();
        FeedError::Malformed {
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: e.to_string(),
        }
    })
}
