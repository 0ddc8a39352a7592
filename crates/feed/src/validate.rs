// ABOUTME: Validator: walks the parsed document into an EnrichedModel, collecting every defect.
// ABOUTME: Applies aliases and inherited defaults, flags future episodes, and runs asset inspection.

use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use podgen_assets::mime::{guess_from_url, FALLBACK_MIME};
use podgen_assets::AssetInfo;

use crate::document::Document;
use crate::duration::parse_duration_seconds;
use crate::fields::{
    is_uuid_shaped, lookup, scalar_text, FieldReader, EPISODE_ALIASES, MISSING, SHOW_ALIASES,
};
use crate::models::{EnrichedModel, Episode, EpisodeType, ShowMetadata, Transcript, DEFAULT_LANGUAGE};
use crate::options::{AssetVerification, GenerateOptions};
use crate::report::ValidationReport;
use crate::time_parse::{is_future, parse_iso8601};

/// MIME types accepted for `podcast:transcript`.
pub const TRANSCRIPT_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/html",
    "text/vtt",
    "application/json",
    "application/x-subrip",
    "application/srt",
];

/// Validates `doc` and builds the enriched model.
///
/// Every defect is collected; the model is only returned when there are none.
/// With [`AssetVerification::Verify`], each included episode's asset is
/// inspected (up to `opts.concurrency` at once) and failures are reported at
/// `episodes[i].asset_url`.
pub async fn validate(
    doc: &Document,
    opts: &GenerateOptions,
    verification: AssetVerification<'_>,
) -> Result<EnrichedModel, ValidationReport> {
    let mut report = ValidationReport::new();

    let root = match doc {
        Value::Mapping(m) => Some(m),
        Value::Null => None,
        _ => {
            report.push("document", "expected a mapping with metadata and episodes");
            return Err(report);
        }
    };

    let show = match root.and_then(|r| section(r, "metadata")) {
        None => {
            report.push("metadata", MISSING);
            None
        }
        Some(Value::Mapping(m)) => read_show(m, &mut report),
        Some(_) => {
            report.push("metadata", "expected a mapping");
            None
        }
    };

    let mut episodes: Vec<Option<Episode>> = Vec::new();
    match root.and_then(|r| section(r, "episodes")) {
        None => report.push("episodes", MISSING),
        Some(Value::Sequence(items)) => {
            let defaults = show.clone().unwrap_or_default();
            for (i, item) in items.iter().enumerate() {
                let prefix = format!("episodes[{}]", i);
                match item {
                    Value::Mapping(m) => {
                        episodes.push(read_episode(m, &prefix, &defaults, opts, &mut report))
                    }
                    _ => {
                        report.push(prefix, "expected a mapping");
                        episodes.push(None);
                    }
                }
            }
        }
        Some(_) => report.push("episodes", "expected a list"),
    }

    match verification {
        AssetVerification::Skip => {
            for episode in episodes.iter_mut().flatten() {
                apply_unverified(episode);
            }
        }
        AssetVerification::Verify(inspector) => {
            let targets: Vec<usize> = episodes
                .iter()
                .enumerate()
                .filter_map(|(i, e)| e.as_ref().filter(|e| e.is_published()).map(|_| i))
                .collect();
            let urls: Vec<String> = targets
                .iter()
                .filter_map(|&i| episodes[i].as_ref().map(|e| e.asset_url.clone()))
                .collect();

            debug!("Inspecting {} asset(s), concurrency {}", urls.len(), opts.concurrency);
            let results = inspector.inspect_all(&urls, opts.concurrency).await;

            for (i, result) in targets.into_iter().zip(results) {
                let Some(episode) = episodes[i].as_mut() else {
                    continue;
                };
                match result {
                    Ok(info) => apply_inspection(episode, info),
                    Err(e) => report.push(format!("episodes[{}].asset_url", i), e.to_string()),
                }
            }
        }
    }

    match show {
        Some(show) if report.is_valid() => Ok(EnrichedModel {
            show,
            episodes: episodes.into_iter().flatten().collect(),
        }),
        _ => Err(report),
    }
}

fn section<'a>(root: &'a Mapping, key: &str) -> Option<&'a Value> {
    root.get(key).filter(|v| !v.is_null())
}

fn read_show(map: &Mapping, report: &mut ValidationReport) -> Option<ShowMetadata> {
    let mut r = FieldReader::new(map, "metadata", SHOW_ALIASES, report);

    let title = r.required_str("title");
    let description = r.required_str("description");
    let link = r.required_url("link");
    let rss_feed_url = r.required_url("rss_feed_url");
    let language = r
        .optional_str("language")
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let email = r.required_email("email");
    let author = r.required_str("author");
    let category = r.optional_str("category");
    let image = r.required_url("image");
    let explicit = r.optional_bool("explicit").unwrap_or(false);
    let podcast_locked = r.optional_bool("podcast_locked").unwrap_or(false);
    let copyright = r.optional_str("copyright");
    let use_asset_hash_as_guid = r.optional_bool("use_asset_hash_as_guid").unwrap_or(false);

    let podcast_guid = r.optional_str("podcast_guid").and_then(|g| {
        let g = g.trim().to_string();
        if is_uuid_shaped(&g) {
            Some(g)
        } else {
            r.error("podcast_guid", format!("invalid podcast_guid: {} (expected a UUID)", g));
            None
        }
    });

    Some(ShowMetadata {
        title: title?,
        description: description?,
        link: link?,
        rss_feed_url: rss_feed_url?,
        language,
        email: email?,
        author: author?,
        category,
        image: image?,
        explicit,
        podcast_locked,
        podcast_guid,
        copyright,
        use_asset_hash_as_guid,
    })
}

fn read_episode(
    map: &Mapping,
    prefix: &str,
    show: &ShowMetadata,
    opts: &GenerateOptions,
    report: &mut ValidationReport,
) -> Option<Episode> {
    let mut r = FieldReader::new(map, prefix, EPISODE_ALIASES, report);

    let title = r.required_str("title");
    let description = r.required_str("description");

    let publication_date = r.required_str("publication_date").and_then(|raw| {
        let parsed = parse_iso8601(&raw);
        if parsed.is_none() {
            r.error(
                "publication_date",
                format!("invalid date: {} (expected ISO-8601, e.g. 2023-01-15T10:00:00Z)", raw),
            );
        }
        parsed
    });

    let asset_url = r.required_url("asset_url");
    let link = r.optional_url("link").unwrap_or_else(|| show.link.clone());
    let image = r.optional_url("image").unwrap_or_else(|| show.image.clone());
    let episode = r.optional_count("episode");
    let season = r.optional_count("season");
    let explicit = r.optional_bool("explicit").unwrap_or(show.explicit);

    let episode_type = match r.optional_str("episode_type") {
        None => EpisodeType::default(),
        Some(raw) => EpisodeType::parse(raw.trim()).unwrap_or_else(|| {
            r.error(
                "episode_type",
                format!("invalid episode_type: {} (expected full, trailer or bonus)", raw),
            );
            EpisodeType::default()
        }),
    };

    let duration_seconds = r.get("duration").and_then(|v| {
        let parsed = match v {
            Value::Number(n) => n.as_u64(),
            _ => scalar_text(v).and_then(|s| parse_duration_seconds(&s)),
        };
        if parsed.is_none() {
            let shown = scalar_text(v).unwrap_or_else(|| "a non-scalar value".to_string());
            r.error(
                "duration",
                format!("invalid duration: {} (expected seconds, MM:SS or HH:MM:SS)", shown),
            );
        }
        parsed
    });

    let transcripts = read_transcripts(map, prefix, report);

    let (title, description, publication_date, asset_url) =
        (title?, description?, publication_date?, asset_url?);

    let excluded = is_future(&publication_date, &opts.now);
    if excluded {
        info!(
            "Skipping {:?}: not released until {}",
            title,
            publication_date.to_rfc3339()
        );
    }

    Some(Episode {
        title,
        description,
        publication_date,
        asset_url,
        link,
        image,
        episode,
        season,
        episode_type,
        explicit,
        transcripts,
        excluded,
        guid: None,
        duration_seconds,
        mime_type: None,
        byte_length: None,
        content_hash: None,
    })
}

fn read_transcripts(map: &Mapping, prefix: &str, report: &mut ValidationReport) -> Vec<Transcript> {
    let Some(value) = lookup(map, "transcripts", &[]) else {
        return Vec::new();
    };
    let Value::Sequence(items) = value else {
        report.push(format!("{}.transcripts", prefix), "expected a list");
        return Vec::new();
    };

    let mut transcripts = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let location = format!("{}.transcripts[{}]", prefix, i);
        let Value::Mapping(m) = item else {
            report.push(location, "expected a mapping with url and type");
            continue;
        };
        let mut r = FieldReader::new(m, location, &[], report);
        let url = r.required_url("url");
        let mime_type = r.required_str("type").and_then(|t| {
            let t = t.trim().to_ascii_lowercase();
            if TRANSCRIPT_MIME_TYPES.contains(&t.as_str()) {
                Some(t)
            } else {
                r.error(
                    "type",
                    format!(
                        "unsupported transcript type: {} (expected one of {})",
                        t,
                        TRANSCRIPT_MIME_TYPES.join(", ")
                    ),
                );
                None
            }
        });
        let language = r.optional_str("language");
        let rel = r.optional_str("rel");

        if let (Some(url), Some(mime_type)) = (url, mime_type) {
            transcripts.push(Transcript {
                url,
                mime_type,
                language,
                rel,
            });
        }
    }
    transcripts
}

fn apply_inspection(episode: &mut Episode, info: AssetInfo) {
    debug!(
        "Asset for {:?}: type={:?} length={:?} duration={:?}",
        episode.title, info.mime_type, info.byte_length, info.duration_seconds
    );
    episode.content_hash = info.content_hash().cloned();
    episode.mime_type = info.mime_type;
    episode.byte_length = info.byte_length;
    if info.duration_seconds.is_some() {
        episode.duration_seconds = info.duration_seconds;
    }
}

fn apply_unverified(episode: &mut Episode) {
    let mime = guess_from_url(&episode.asset_url).unwrap_or(FALLBACK_MIME);
    episode.mime_type = Some(mime.to_string());
}
