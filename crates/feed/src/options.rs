// ABOUTME: Run options shared by validation and generation: clock, concurrency, generator string.
// ABOUTME: AssetVerification selects whether the asset Inspector runs at all.

use chrono::{DateTime, Utc};
use podgen_assets::Inspector;

pub const DEFAULT_GENERATOR: &str = concat!("podgen ", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Options for a single validate/generate run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Reference time for future-date exclusion.
    pub now: DateTime<Utc>,
    /// Maximum asset inspections in flight.
    pub concurrency: usize,
    /// Text of the channel `generator` element.
    pub generator: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            concurrency: DEFAULT_CONCURRENCY,
            generator: DEFAULT_GENERATOR.to_string(),
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the run clock, for reproducible output.
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }
}

/// Whether episode assets are inspected during validation.
#[derive(Debug, Clone, Copy)]
pub enum AssetVerification<'a> {
    /// Never touch the network; enclosure data comes from the URL alone.
    Skip,
    Verify(&'a Inspector),
}

impl AssetVerification<'_> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, AssetVerification::Skip)
    }
}
