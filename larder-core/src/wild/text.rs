//! Cleanup for strings pulled out of structured data.
//!
//! Sites routinely put markup and entities inside JSON-LD strings
//! (`"Mix &amp; bake<br>"`), so every value is run through here.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

static HTML_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));

/// Tags that end a visual line.
static LINE_BREAK_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</p\s*>|</li\s*>|</h[1-6]\s*>").expect("Invalid line break regex")
});

static INLINE_SPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("Invalid whitespace regex"));

/// Single-line value: tags stripped, entities decoded, whitespace collapsed.
pub fn clean_inline(raw: &str) -> String {
    let stripped = HTML_TAG_REGEX.replace_all(raw, " ");
    let decoded = decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Multi-line block: like [`clean_inline`] but line structure survives, with
/// block-ending tags turned into line breaks.
pub fn clean_block(raw: &str) -> String {
    let with_breaks = LINE_BREAK_TAG_REGEX.replace_all(raw, "\n");
    let stripped = HTML_TAG_REGEX.replace_all(&with_breaks, "");
    let decoded = decode_html_entities(&stripped).replace("\r\n", "\n");

    decoded
        .split('\n')
        .map(|line| INLINE_SPACE_REGEX.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
