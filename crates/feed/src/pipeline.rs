// ABOUTME: End-to-end generation: parse, validate, derive identifiers, build and serialize.
// ABOUTME: Any validation error aborts the run; no partial feed is produced.

use tracing::info;

use crate::builder::build_feed;
use crate::document::{parse_document, Document};
use crate::error::FeedError;
use crate::guid::assign_guids;
use crate::models::EnrichedModel;
use crate::options::{AssetVerification, GenerateOptions};
use crate::validate::validate;
use crate::xml::to_bytes;

/// Validates `doc` and renders the feed document.
pub async fn generate_feed(
    doc: &Document,
    opts: &GenerateOptions,
    verification: AssetVerification<'_>,
) -> Result<Vec<u8>, FeedError> {
    let mut model = validate(doc, opts, verification)
        .await
        .map_err(FeedError::Validation)?;
    assign_guids(&mut model);
    let bytes = render_feed(&model, &opts.generator)?;
    info!(
        "Generated feed with {} of {} episode(s), {} bytes",
        model.published_episodes().count(),
        model.episodes.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Parses configuration text, then runs [`generate_feed`].
pub async fn generate_from_str(
    text: &str,
    opts: &GenerateOptions,
    verification: AssetVerification<'_>,
) -> Result<Vec<u8>, FeedError> {
    let doc = parse_document(text)?;
    generate_feed(&doc, opts, verification).await
}

/// Serializes an already validated model.
pub fn render_feed(model: &EnrichedModel, generator: &str) -> Result<Vec<u8>, FeedError> {
    to_bytes(&build_feed(model, generator))
}
