// ABOUTME: Description rendering: Markdown to HTML, byte-limited truncation, CDATA section splitting.
// ABOUTME: Truncation never cuts inside a tag, an entity, or a multi-byte character.

use pulldown_cmark::{html, Options, Parser};

/// Upper bound for a rendered description, CDATA wrapper included.
pub const DESCRIPTION_BYTE_LIMIT: usize = 4000;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Converts Markdown to an HTML fragment without a trailing newline.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out.truncate(out.trim_end().len());
    out
}

/// Shortens `html` to at most `limit` bytes.
///
/// The cut lands on a char boundary and is moved back before any tag or
/// character reference it would otherwise split.
pub fn truncate_html(html: &str, limit: usize) -> &str {
    if html.len() <= limit {
        return html;
    }
    let mut cut = limit;
    while !html.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut head = &html[..cut];

    if let Some(open) = head.rfind('<') {
        if !head[open..].contains('>') {
            head = &head[..open];
        }
    }
    if let Some(amp) = head.rfind('&') {
        let tail = &head[amp..];
        if !tail.contains(';') && !tail.contains(char::is_whitespace) {
            head = &head[..amp];
        }
    }
    head
}

/// Renders a Markdown description into HTML that fits the description limit
/// once wrapped in a single CDATA section.
pub fn render_description(markdown: &str) -> String {
    let html = markdown_to_html(markdown);
    let budget = DESCRIPTION_BYTE_LIMIT - CDATA_OPEN.len() - CDATA_CLOSE.len();
    truncate_html(&html, budget).to_string()
}

/// Splits text into pieces that can each be written as one CDATA section.
///
/// A literal `]]>` is broken between two sections (`]]` ends one, `>` starts
/// the next), so the concatenated character data is unchanged.
pub fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(CDATA_CLOSE) {
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        assert_eq!(
            markdown_to_html("Hello **world**"),
            "<p>Hello <strong>world</strong></p>"
        );
        assert_eq!(
            markdown_to_html("[site](https://example.com)"),
            r#"<p><a href="https://example.com">site</a></p>"#
        );
    }

    #[test]
    fn short_html_untouched() {
        assert_eq!(truncate_html("<p>hi</p>", 100), "<p>hi</p>");
    }

    #[test]
    fn truncation_drops_half_open_tag() {
        let html = "<p>one</p><p>two</p>";
        // Limit falls inside the second "<p>".
        assert_eq!(truncate_html(html, 12), "<p>one</p>");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let html = "héllo";
        // 'é' occupies bytes 1..3.
        assert_eq!(truncate_html(html, 2), "h");
    }

    #[test]
    fn truncation_drops_partial_entity() {
        assert_eq!(truncate_html("a &amp; b", 5), "a ");
    }

    #[test]
    fn long_description_fits_limit() {
        let md = "word ".repeat(2000);
        let rendered = render_description(&md);
        assert!(rendered.len() + CDATA_OPEN.len() + CDATA_CLOSE.len() <= DESCRIPTION_BYTE_LIMIT);
        assert!(rendered.starts_with("<p>word"));
        assert!(!rendered.ends_with('<'));
    }

    #[test]
    fn cdata_split_on_terminator() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections("]]>]]>"), vec!["]]", ">]]", ">"]);
        assert_eq!(cdata_sections("a]]>b").concat(), "a]]>b");
    }
}
