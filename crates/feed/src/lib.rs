// ABOUTME: Podcast feed generation library: YAML config in, RSS 2.0 + iTunes + podcast namespace out.
// ABOUTME: Provides loading, validation, identifier derivation, feed building and serialization.

pub mod builder;
pub mod document;
pub mod duration;
pub mod error;
pub mod fields;
pub mod guid;
pub mod markup;
pub mod models;
pub mod options;
pub mod pipeline;
pub mod report;
pub mod time_parse;
pub mod validate;
pub mod xml;

pub use builder::build_feed;
pub use document::{parse_document, Document};
pub use duration::{format_duration, parse_duration_seconds};
pub use error::FeedError;
pub use guid::{assign_guids, derive_show_guid, episode_guid};
pub use models::{EnrichedModel, Episode, EpisodeType, ShowMetadata, Transcript};
pub use options::{AssetVerification, GenerateOptions};
pub use pipeline::{generate_feed, generate_from_str, render_feed};
pub use report::{ValidationError, ValidationReport};
pub use time_parse::{format_rfc2822, parse_iso8601};
pub use validate::validate;
