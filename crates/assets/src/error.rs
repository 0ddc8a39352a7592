// ABOUTME: Error types for asset inspection including ErrorCode enum and AssetError struct.
// ABOUTME: Collaborator failures (transport, probe) are wrapped here and never surfaced raw.

use std::fmt;

/// Error codes representing the categories of asset inspection failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Unreachable,
    UnsupportedMediaType,
    Timeout,
    Probe,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Unreachable => "asset unreachable",
            ErrorCode::UnsupportedMediaType => "unsupported media type",
            ErrorCode::Timeout => "timed out",
            ErrorCode::Probe => "media probe failed",
        };
        write!(f, "{}", s)
    }
}

/// The error type for a single asset inspection.
#[derive(Debug, thiserror::Error)]
pub struct AssetError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl AssetError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create an Unreachable error.
    pub fn unreachable(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Unreachable, url, op, source)
    }

    /// Create an UnsupportedMediaType error.
    pub fn unsupported_media_type(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::UnsupportedMediaType, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create a Probe error.
    pub fn probe(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Probe, url, op, source)
    }

    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    pub fn is_unreachable(&self) -> bool {
        self.code == ErrorCode::Unreachable
    }

    pub fn is_unsupported_media_type(&self) -> bool {
        self.code == ErrorCode::UnsupportedMediaType
    }

    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    pub fn is_probe(&self) -> bool {
        self.code == ErrorCode::Probe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_code_and_source() {
        let err = AssetError::unreachable(
            "https://cdn.example.com/ep1.mp3",
            "HEAD",
            Some(anyhow::anyhow!("HTTP status 404")),
        );
        assert_eq!(
            err.to_string(),
            "HEAD https://cdn.example.com/ep1.mp3: asset unreachable: HTTP status 404"
        );
        assert!(err.is_unreachable());
        assert!(!err.is_timeout());
    }

    #[test]
    fn display_without_source() {
        let err = AssetError::timeout("https://cdn.example.com/ep1.mp3", "probe", None);
        assert_eq!(err.to_string(), "probe https://cdn.example.com/ep1.mp3: timed out");
        assert!(err.is_timeout());
    }
}
