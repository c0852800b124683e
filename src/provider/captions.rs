//! Parsing of the timedtext XML that YouTube serves for a caption track.
//!
//! The payload looks like
//! `<transcript><text start="0.5" dur="1.2">Hello &amp;amp; welcome</text>...</transcript>`.
//! Text content is entity-encoded twice (once by XML, once by the HTML it originally was),
//! and may carry inline markup that is stripped unless formatting is preserved.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::TranscriptSnippet;
use crate::TranscriptError;

/// Inline tags kept when formatting is preserved
const FORMATTING_TAGS: &[&str] = &[
    "strong", "em", "b", "i", "mark", "small", "del", "ins", "sub", "sup",
];

fn text_element_regex() -> &'static Regex {
    static TEXT_ELEMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    TEXT_ELEMENT_REGEX.get_or_init(|| {
        Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)")
            .expect("Failed to compile timedtext element regex")
    })
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][A-Za-z0-9_:.-]*)\s*=\s*"([^"]*)""#)
            .expect("Failed to compile attribute regex")
    })
}

fn html_tag_regex() -> &'static Regex {
    static HTML_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    HTML_TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("Failed to compile HTML tag regex")
    })
}

/// Parse a timedtext document into snippets.
///
/// Elements without text are skipped. A document with no `<transcript>` root is
/// rejected so that an HTML error page is not mistaken for an empty transcript.
pub fn parse_timedtext(
    xml: &str,
    preserve_formatting: bool,
) -> Result<Vec<TranscriptSnippet>, TranscriptError> {
    if !xml.contains("<transcript") {
        return Err(TranscriptError::Unexpected(
            "Caption track did not contain a transcript document".to_string(),
        ));
    }

    let mut snippets = Vec::new();

    for element in text_element_regex().captures_iter(xml) {
        let Some(raw_text) = element.get(2).map(|m| m.as_str()) else {
            continue;
        };
        if raw_text.is_empty() {
            continue;
        }

        let attributes = element.get(1).map(|m| m.as_str()).unwrap_or_default();
        let start = parse_seconds(attributes, "start")?.unwrap_or(0.0);
        let duration = parse_seconds(attributes, "dur")?.unwrap_or(0.0);

        snippets.push(TranscriptSnippet {
            text: clean_text(raw_text, preserve_formatting),
            start,
            duration,
        });
    }

    tracing::debug!("Parsed {} caption snippets", snippets.len());

    Ok(snippets)
}

fn parse_seconds(attributes: &str, name: &str) -> Result<Option<f64>, TranscriptError> {
    for attribute in attribute_regex().captures_iter(attributes) {
        if &attribute[1] == name {
            let value = &attribute[2];
            return value.parse::<f64>().map(Some).map_err(|_| {
                TranscriptError::Unexpected(format!(
                    "Invalid {} attribute in caption track: {}",
                    name, value
                ))
            });
        }
    }
    Ok(None)
}

/// Decode entities and strip markup from a single caption line
pub fn clean_text(raw: &str, preserve_formatting: bool) -> String {
    // XML layer first, then the HTML the caption was authored in
    let decoded = unescape_entities(raw);
    let stripped = strip_tags(&decoded, preserve_formatting);
    unescape_entities(&stripped)
}

/// Remove HTML tags, optionally keeping basic formatting tags
pub fn strip_tags(text: &str, preserve_formatting: bool) -> String {
    html_tag_regex()
        .replace_all(text, |caps: &Captures| {
            let tag = caps[1].to_ascii_lowercase();
            if preserve_formatting && FORMATTING_TAGS.contains(&tag.as_str()) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Decode named and numeric character references against the full HTML5 entity table
pub fn unescape_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.21" dur="1.5">Hey there &amp;amp; welcome</text><text start="1.71" dur="2.04">it&amp;#39;s <b>bold</b> and <font color="#E5E5E5">grey</font></text><text start="3.75" dur="0.5"></text><text start="4.25" dur="1"/><text start="5.0" dur="1.25">multi
line</text></transcript>"##;

    #[test]
    fn test_parse_timedtext_strips_markup() {
        let snippets = parse_timedtext(SAMPLE, false).unwrap();

        assert_eq!(snippets.len(), 3);
        assert_eq!(snippets[0].text, "Hey there & welcome");
        assert_eq!(snippets[0].start, 0.21);
        assert_eq!(snippets[0].duration, 1.5);
        assert_eq!(snippets[1].text, "it's bold and grey");
        assert_eq!(snippets[2].text, "multi\nline");
        assert_eq!(snippets[2].duration, 1.25);
    }

    #[test]
    fn test_parse_timedtext_preserves_formatting_tags() {
        let snippets = parse_timedtext(SAMPLE, true).unwrap();

        assert_eq!(snippets[1].text, "it's <b>bold</b> and grey");
    }

    #[test]
    fn test_parse_timedtext_rejects_non_transcript_documents() {
        assert!(parse_timedtext("<html><body>Oops</body></html>", false).is_err());
    }

    #[test]
    fn test_parse_timedtext_rejects_bad_timestamps() {
        let xml = r#"<transcript><text start="abc" dur="1">x</text></transcript>"#;
        assert!(parse_timedtext(xml, false).is_err());
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("a &lt;b&gt; &quot;c&quot;"), "a <b> \"c\"");
        assert_eq!(unescape_entities("&#39;&#x41;"), "'A");
        assert_eq!(unescape_entities("&eacute; &euro; &frac12; &hellip;"), "é € ½ …");
        assert_eq!(unescape_entities("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_parse_timedtext_decodes_html5_entities() {
        let xml = r#"<transcript><text start="0" dur="1">caf&amp;eacute; &amp;euro;5 &amp;frac12;</text></transcript>"#;
        let snippets = parse_timedtext(xml, false).unwrap();

        assert_eq!(snippets[0].text, "café €5 ½");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<i>x</i> <span>y</span>", false), "x y");
        assert_eq!(strip_tags("<i>x</i> <span>y</span>", true), "<i>x</i> y");
        assert_eq!(strip_tags("<EM>x</EM>", true), "<EM>x</EM>");
    }
}
