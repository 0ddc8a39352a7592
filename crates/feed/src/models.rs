// ABOUTME: Strongly typed podcast model produced by the validator and consumed by the feed builder.
// ABOUTME: ShowMetadata, Episode, Transcript, EpisodeType and the EnrichedModel wrapper.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use podgen_assets::ContentHash;

pub const DEFAULT_LANGUAGE: &str = "en-us";

/// Channel-level metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowMetadata {
    pub title: String,
    /// Markdown source.
    pub description: String,
    pub link: String,
    pub rss_feed_url: String,
    pub language: String,
    pub email: String,
    pub author: String,
    pub category: Option<String>,
    pub image: String,
    pub explicit: bool,
    pub podcast_locked: bool,
    /// Explicit value from the config, replaced by the derived one once identifiers run.
    pub podcast_guid: Option<String>,
    pub copyright: Option<String>,
    pub use_asset_hash_as_guid: bool,
}

/// iTunes episode type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EpisodeType {
    #[default]
    Full,
    Trailer,
    Bonus,
}

impl EpisodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeType::Full => "full",
            EpisodeType::Trailer => "trailer",
            EpisodeType::Bonus => "bonus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full" => Some(EpisodeType::Full),
            "trailer" => Some(EpisodeType::Trailer),
            "bonus" => Some(EpisodeType::Bonus),
            _ => None,
        }
    }
}

impl fmt::Display for EpisodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `podcast:transcript` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub url: String,
    pub mime_type: String,
    pub language: Option<String>,
    pub rel: Option<String>,
}

/// One episode after validation, with inherited values already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub title: String,
    /// Markdown source.
    pub description: String,
    pub publication_date: DateTime<FixedOffset>,
    pub asset_url: String,
    /// Episode link, or the show link when absent.
    pub link: String,
    /// Episode artwork, or the show image when absent.
    pub image: String,
    pub episode: Option<u32>,
    pub season: Option<u32>,
    pub episode_type: EpisodeType,
    /// Episode override, or the show flag when absent.
    pub explicit: bool,
    pub transcripts: Vec<Transcript>,
    /// Set when the publication date is after the run clock; such episodes are not emitted.
    pub excluded: bool,

    // Filled by asset inspection and identifier derivation.
    pub guid: Option<String>,
    pub duration_seconds: Option<u64>,
    pub mime_type: Option<String>,
    pub byte_length: Option<u64>,
    pub content_hash: Option<ContentHash>,
}

impl Episode {
    pub fn is_published(&self) -> bool {
        !self.excluded
    }
}

/// Validated show plus episodes in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedModel {
    pub show: ShowMetadata,
    pub episodes: Vec<Episode>,
}

impl EnrichedModel {
    /// Episodes that will appear in the feed, in source order.
    pub fn published_episodes(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter().filter(|e| e.is_published())
    }
}
