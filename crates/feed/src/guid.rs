// ABOUTME: Identifier derivation for the show (UUIDv5 over the feed URL) and each episode.
// ABOUTME: Episode GUIDs are the asset URL, or the tagged content hash when the show opts in.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{EnrichedModel, Episode};

/// Deterministic show GUID: UUIDv5 in the URL namespace over the feed URL bytes.
pub fn derive_show_guid(rss_feed_url: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, rss_feed_url.as_bytes()).to_string()
}

/// GUID for one episode.
///
/// With `use_asset_hash` set, a content-hash candidate (`sha256:…`, `md5:…`,
/// `etag:…`) replaces the URL. Re-encoding the asset then changes the GUID.
pub fn episode_guid(episode: &Episode, use_asset_hash: bool) -> String {
    if use_asset_hash {
        if let Some(hash) = &episode.content_hash {
            return hash.to_string();
        }
    }
    episode.asset_url.clone()
}

/// Fills the show GUID and every episode GUID in place.
pub fn assign_guids(model: &mut EnrichedModel) {
    if model.show.podcast_guid.is_none() {
        let derived = derive_show_guid(&model.show.rss_feed_url);
        warn!(
            "podcast_guid not set; derived {} from rss_feed_url. Setting it explicitly is recommended",
            derived
        );
        model.show.podcast_guid = Some(derived);
    }

    let use_hash = model.show.use_asset_hash_as_guid;
    for episode in &mut model.episodes {
        let guid = episode_guid(episode, use_hash);
        debug!(
            "GUID for {:?}: {} ({})",
            episode.title,
            guid,
            if guid == episode.asset_url { "asset URL" } else { "content hash" }
        );
        episode.guid = Some(guid);
    }
}
