// ABOUTME: Content-hash candidates extracted from asset response headers.
// ABOUTME: Priority is checksum header, then cloud-storage composite MD5, then ETag.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Header carrying a base64 SHA-256 of the object (S3 and compatible stores).
pub const SHA256_HEADER: &str = "x-amz-checksum-sha256";
/// Composite hash header, e.g. `crc32c=AAAAAA==,md5=1B2M2Y8AsgTpgAmY7PhCfg==`.
pub const GOOG_HASH_HEADER: &str = "x-goog-hash";
pub const ETAG_HEADER: &str = "etag";

static GOOG_MD5_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"md5=([^,]+)").unwrap());

/// Which hash family a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashSource {
    Sha256,
    Md5,
    ETag,
}

impl HashSource {
    /// Tag prefix used when the hash becomes an episode GUID.
    pub fn tag(&self) -> &'static str {
        match self {
            HashSource::Sha256 => "sha256",
            HashSource::Md5 => "md5",
            HashSource::ETag => "etag",
        }
    }

    /// Response header the candidate is read from.
    pub fn header(&self) -> &'static str {
        match self {
            HashSource::Sha256 => SHA256_HEADER,
            HashSource::Md5 => GOOG_HASH_HEADER,
            HashSource::ETag => ETAG_HEADER,
        }
    }
}

/// A hash or entity-tag value usable as a stable identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash {
    pub source: HashSource,
    pub value: String,
}

impl ContentHash {
    pub fn new(source: HashSource, value: impl Into<String>) -> Self {
        Self {
            source,
            value: value.into(),
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source.tag(), self.value)
    }
}

/// Collects every hash candidate present in `headers`, in priority order.
///
/// Header names are expected lowercased.
pub fn hash_candidates(headers: &HashMap<String, String>) -> Vec<ContentHash> {
    let mut out = Vec::new();

    if let Some(sha) = non_empty(headers.get(SHA256_HEADER)) {
        out.push(ContentHash::new(HashSource::Sha256, sha));
    }

    if let Some(goog) = non_empty(headers.get(GOOG_HASH_HEADER)) {
        if let Some(m) = GOOG_MD5_RE.captures(goog).and_then(|c| c.get(1)) {
            let md5 = m.as_str().trim();
            if !md5.is_empty() {
                out.push(ContentHash::new(HashSource::Md5, md5));
            }
        }
    }

    if let Some(etag) = non_empty(headers.get(ETAG_HEADER)) {
        if let Some(value) = normalize_etag(etag) {
            out.push(ContentHash::new(HashSource::ETag, value));
        }
    }

    out
}

/// Picks the highest-priority candidate, if any.
pub fn best_hash(headers: &HashMap<String, String>) -> Option<ContentHash> {
    hash_candidates(headers).into_iter().next()
}

/// Removes surrounding quotes from an ETag, keeping a weak `W/` marker and any
/// multipart suffix.
fn normalize_etag(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let (weak, body) = match raw.strip_prefix("W/") {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let body = body.trim().trim_matches('"').trim();
    if body.is_empty() {
        return None;
    }
    Some(if weak {
        format!("W/{}", body)
    } else {
        body.to_string()
    })
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}
