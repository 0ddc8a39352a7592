// ABOUTME: MIME helpers for podcast media: family checks, extension guesses, probe format mapping.
// ABOUTME: Only audio/* and video/* are acceptable enclosure types.

use url::Url;

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Extension to MIME table used when nothing remote told us the type.
const EXTENSION_MIME: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("m4b", "audio/mp4"),
    ("aac", "audio/aac"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/opus"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
];

/// Strips parameters and lowercases a Content-Type value.
///
/// `"Audio/MPEG; charset=binary"` becomes `"audio/mpeg"`.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// True for audio/* and video/* types.
pub fn is_media_type(mime: &str) -> bool {
    let e = essence(mime);
    e.starts_with("audio/") || e.starts_with("video/")
}

/// Catch-all types object stores serve for uploads with no declared type.
/// They say nothing about the content.
pub fn is_generic_binary(mime: &str) -> bool {
    matches!(
        essence(mime).as_str(),
        "application/octet-stream" | "binary/octet-stream" | "application/binary"
    )
}

/// Guesses a MIME type from the path extension of `url`.
pub fn guess_from_url(url: &str) -> Option<&'static str> {
    let path = match Url::parse(url) {
        Ok(u) => u.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or("").to_string(),
    };
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    EXTENSION_MIME
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Maps an ffprobe `format_name` (comma separated demuxer list) to a MIME type.
pub fn from_probe_format(format_name: &str, has_video: bool) -> Option<&'static str> {
    let names: Vec<&str> = format_name.split(',').map(str::trim).collect();
    let has = |n: &str| names.iter().any(|x| *x == n);

    if has("mp3") {
        return Some("audio/mpeg");
    }
    if has("mov") || has("mp4") || has("m4a") {
        return Some(if has_video { "video/mp4" } else { "audio/mp4" });
    }
    if has("webm") || has("matroska") {
        return Some(if has_video { "video/webm" } else { "audio/webm" });
    }
    if has("ogg") {
        return Some(if has_video { "video/ogg" } else { "audio/ogg" });
    }
    if has("wav") {
        return Some("audio/wav");
    }
    if has("flac") {
        return Some("audio/flac");
    }
    if has("aac") {
        return Some("audio/aac");
    }
    None
}
