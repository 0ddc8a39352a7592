// ABOUTME: Typed field access over a YAML mapping with legacy-key aliases and located errors.
// ABOUTME: FieldReader records every defect in the ValidationReport and keeps going.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use url::Url;

use crate::report::ValidationReport;

/// Legacy show-level keys and the canonical key each one stands for.
pub const SHOW_ALIASES: &[(&str, &str)] = &[
    ("itunes_email", "email"),
    ("itunes_author", "author"),
    ("itunes_category", "category"),
    ("itunes_explicit", "explicit"),
    ("itunes_image", "image"),
];

/// Legacy episode-level keys.
pub const EPISODE_ALIASES: &[(&str, &str)] = &[
    ("itunes_explicit", "explicit"),
    ("itunes_image", "image"),
];

pub const MISSING: &str = "missing required field";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid uuid regex")
});

/// Looks up `key`, falling back to any legacy alias of it. The canonical key wins.
/// YAML nulls count as absent.
pub fn lookup<'a>(map: &'a Mapping, key: &str, aliases: &[(&str, &str)]) -> Option<&'a Value> {
    let present = move |k: &str| map.get(k).filter(|v| !v.is_null());
    present(key).or_else(|| {
        aliases
            .iter()
            .filter(|(_, canonical)| *canonical == key)
            .find_map(|(legacy, _)| present(*legacy))
    })
}

/// Absolute http(s) URL with a host.
pub fn is_valid_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Canonical 8-4-4-4-12 hex form.
pub fn is_uuid_shaped(s: &str) -> bool {
    UUID_RE.is_match(s)
}

/// Reads a boolean: YAML `true`/`false`, or the strings `true`/`false`/`yes`/`no`
/// in any case. Numbers are rejected.
pub fn parse_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Reads a non-negative integer from a YAML integer or a string of digits.
pub fn parse_count(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Renders a scalar as text. Sequences and mappings are not text.
pub fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whether `c` may appear in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn describe(v: &Value) -> String {
    scalar_text(v).unwrap_or_else(|| match v {
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        _ => "an unsupported value".to_string(),
    })
}

/// Reads fields from one mapping, pushing located errors into a shared report.
pub struct FieldReader<'a, 'r> {
    map: &'a Mapping,
    prefix: String,
    aliases: &'static [(&'static str, &'static str)],
    report: &'r mut ValidationReport,
}

impl<'a, 'r> FieldReader<'a, 'r> {
    pub fn new(
        map: &'a Mapping,
        prefix: impl Into<String>,
        aliases: &'static [(&'static str, &'static str)],
        report: &'r mut ValidationReport,
    ) -> Self {
        Self {
            map,
            prefix: prefix.into(),
            aliases,
            report,
        }
    }

    /// Dotted location of `key` under this reader's prefix.
    pub fn location(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        lookup(self.map, key, self.aliases)
    }

    pub fn error(&mut self, key: &str, message: impl Into<String>) {
        let location = self.location(key);
        self.report.push(location, message);
    }

    /// Optional text field; empty strings count as absent.
    pub fn optional_str(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        match scalar_text(value) {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => match s.chars().find(|c| !is_xml_char(*c)) {
                Some(bad) => {
                    self.error(
                        key,
                        format!("contains a character not allowed in XML: U+{:04X}", bad as u32),
                    );
                    None
                }
                None => Some(s),
            },
            None => {
                self.error(key, format!("expected text, found {}", describe(value)));
                None
            }
        }
    }

    pub fn required_str(&mut self, key: &str) -> Option<String> {
        if self.get(key).is_none() {
            self.error(key, MISSING);
            return None;
        }
        let value = self.optional_str(key);
        let blank = self
            .get(key)
            .and_then(scalar_text)
            .is_some_and(|s| s.trim().is_empty());
        if value.is_none() && blank {
            self.error(key, MISSING);
        }
        value
    }

    pub fn optional_url(&mut self, key: &str) -> Option<String> {
        let s = self.optional_str(key)?;
        self.check_url(key, s)
    }

    pub fn required_url(&mut self, key: &str) -> Option<String> {
        let s = self.required_str(key)?;
        self.check_url(key, s)
    }

    fn check_url(&mut self, key: &str, s: String) -> Option<String> {
        let trimmed = s.trim();
        if is_valid_url(trimmed) {
            Some(trimmed.to_string())
        } else {
            self.error(
                key,
                format!("invalid URL: {} (must be an absolute http or https URL)", s),
            );
            None
        }
    }

    pub fn required_email(&mut self, key: &str) -> Option<String> {
        let s = self.required_str(key)?;
        let trimmed = s.trim();
        if is_valid_email(trimmed) {
            Some(trimmed.to_string())
        } else {
            self.error(key, format!("invalid email format: {}", s));
            None
        }
    }

    pub fn optional_bool(&mut self, key: &str) -> Option<bool> {
        let value = self.get(key)?;
        let parsed = parse_bool(value);
        if parsed.is_none() {
            self.error(
                key,
                format!("invalid boolean: {} (expected true/false or yes/no)", describe(value)),
            );
        }
        parsed
    }

    pub fn optional_count(&mut self, key: &str) -> Option<u32> {
        let value = self.get(key)?;
        let parsed = parse_count(value);
        if parsed.is_none() {
            self.error(
                key,
                format!("invalid number: {} (expected a non-negative integer)", describe(value)),
            );
        }
        parsed
    }
}
