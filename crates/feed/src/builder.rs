// ABOUTME: Feed builder: maps an EnrichedModel onto the RSS 2.0 element tree with iTunes and podcast tags.
// ABOUTME: Only published episodes become items; source order is kept.

use podgen_assets::mime::FALLBACK_MIME;

use crate::duration::format_duration;
use crate::guid::{derive_show_guid, episode_guid};
use crate::markup::render_description;
use crate::models::{EnrichedModel, Episode, ShowMetadata};
use crate::time_parse::format_rfc2822;
use crate::xml::Element;

pub const ITUNES_NS: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const PODCAST_NS: &str = "https://podcastindex.org/namespace/1.0";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Builds the `<rss>` root for `model`.
pub fn build_feed(model: &EnrichedModel, generator: &str) -> Element {
    let mut channel = build_channel(&model.show, generator);
    for episode in model.published_episodes() {
        channel.push(build_item(episode, model.show.use_asset_hash_as_guid));
    }

    Element::new("rss")
        .attr("version", "2.0")
        .attr("xmlns:itunes", ITUNES_NS)
        .attr("xmlns:atom", ATOM_NS)
        .attr("xmlns:podcast", PODCAST_NS)
        .child(channel)
}

fn build_channel(show: &ShowMetadata, generator: &str) -> Element {
    let mut channel = Element::new("channel")
        .child(Element::text("title", show.title.as_str()))
        .child(Element::new("description").with_cdata(render_description(&show.description)))
        .child(Element::text("language", show.language.as_str()))
        .child(Element::text("link", show.link.as_str()))
        .child(Element::text("generator", generator))
        .child(
            Element::new("atom:link")
                .attr("href", show.rss_feed_url.as_str())
                .attr("rel", "self")
                .attr("type", "application/rss+xml"),
        );

    if let Some(copyright) = &show.copyright {
        channel.push(Element::text("copyright", copyright.as_str()));
    }

    channel.push(
        Element::new("image")
            .child(Element::text("url", show.image.as_str()))
            .child(Element::text("title", show.title.as_str()))
            .child(Element::text("link", show.link.as_str())),
    );
    channel.push(Element::text("itunes:explicit", yes_no(show.explicit)));
    channel.push(
        Element::new("itunes:owner")
            .child(Element::text("itunes:name", show.author.as_str()))
            .child(Element::text("itunes:email", show.email.as_str())),
    );
    channel.push(Element::text("itunes:author", show.author.as_str()));
    channel.push(Element::text("itunes:summary", show.description.as_str()));
    if let Some(category) = &show.category {
        channel.push(Element::new("itunes:category").attr("text", category.as_str()));
    }
    channel.push(Element::new("itunes:image").attr("href", show.image.as_str()));
    channel.push(
        Element::text("podcast:locked", yes_no(show.podcast_locked))
            .attr("owner", show.email.as_str()),
    );

    let guid = show
        .podcast_guid
        .clone()
        .unwrap_or_else(|| derive_show_guid(&show.rss_feed_url));
    channel.push(Element::text("podcast:guid", guid));

    channel
}

fn build_item(episode: &Episode, use_asset_hash: bool) -> Element {
    let guid = episode
        .guid
        .clone()
        .unwrap_or_else(|| episode_guid(episode, use_asset_hash));
    let mime = episode.mime_type.as_deref().unwrap_or(FALLBACK_MIME);
    let length = episode.byte_length.unwrap_or(0);

    let mut item = Element::new("item")
        .child(Element::text("title", episode.title.as_str()))
        .child(Element::new("description").with_cdata(render_description(&episode.description)))
        .child(Element::text("pubDate", format_rfc2822(&episode.publication_date)))
        .child(Element::text("link", episode.link.as_str()))
        .child(Element::text("guid", guid).attr("isPermaLink", "false"))
        .child(
            Element::new("enclosure")
                .attr("url", episode.asset_url.as_str())
                .attr("type", mime)
                .attr("length", length.to_string()),
        );

    if let Some(secs) = episode.duration_seconds {
        item.push(Element::text("itunes:duration", format_duration(secs)));
    }
    item.push(Element::text("itunes:explicit", yes_no(episode.explicit)));
    if let Some(n) = episode.episode {
        item.push(Element::text("itunes:episode", n.to_string()));
    }
    if let Some(n) = episode.season {
        item.push(Element::text("itunes:season", n.to_string()));
    }
    item.push(Element::text("itunes:episodeType", episode.episode_type.as_str()));
    item.push(Element::new("itunes:image").attr("href", episode.image.as_str()));

    for transcript in &episode.transcripts {
        let mut el = Element::new("podcast:transcript")
            .attr("url", transcript.url.as_str())
            .attr("type", transcript.mime_type.as_str());
        if let Some(language) = &transcript.language {
            el = el.attr("language", language.as_str());
        }
        if let Some(rel) = &transcript.rel {
            el = el.attr("rel", rel.as_str());
        }
        item.push(el);
    }

    item
}
