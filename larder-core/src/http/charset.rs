//! Turning fetched page bytes into a UTF-8 string.
//!
//! Plenty of older recipe blogs still serve latin-1 or windows-1252, so the
//! declared charset is honoured before falling back to lossy UTF-8.

use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::bytes::Regex;

/// `<meta charset=...>` or `<meta http-equiv=... content="...; charset=...">`
static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([A-Za-z0-9_\-:.]+)"#)
        .expect("Invalid meta charset regex")
});

/// How far into the document a meta charset declaration is looked for.
const META_SCAN_LIMIT: usize = 1024;

/// Decode page bytes. The Content-Type header wins over a meta declaration;
/// with neither, bytes are taken as UTF-8 and invalid sequences replaced.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_meta(bytes));

    if let Some(encoding) = declared {
        if encoding != encoding_rs::UTF_8 {
            let (decoded, _, _) = encoding.decode(bytes);
            return decoded.into_owned();
        }
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "page is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let lower = content_type.to_ascii_lowercase();
    let label = lower
        .split("charset=")
        .nth(1)?
        .trim_start_matches(['"', '\''])
        .split(['"', '\'', ';', ',', ' '])
        .next()?
        .trim();

    if label.is_empty() {
        return None;
    }
    Encoding::for_label(label.as_bytes())
}

fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SCAN_LIMIT)];
    let label = META_CHARSET_REGEX.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_is_used() {
        let enc = charset_from_content_type("text/html; charset=ISO-8859-1").unwrap();
        // encoding_rs treats latin-1 as windows-1252
        assert_eq!(enc.name(), "windows-1252");
    }

    #[test]
    fn header_without_charset() {
        assert!(charset_from_content_type("text/html").is_none());
        assert!(charset_from_content_type("text/html; charset=").is_none());
    }

    #[test]
    fn meta_charset_forms() {
        let html5 = b"<html><head><meta charset=\"iso-8859-1\"></head>";
        assert_eq!(charset_from_meta(html5).unwrap().name(), "windows-1252");

        let legacy = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\">";
        assert_eq!(charset_from_meta(legacy).unwrap().name(), "windows-1252");

        let none = b"<meta name=\"viewport\" content=\"width=device-width\">";
        assert!(charset_from_meta(none).is_none());
    }

    #[test]
    fn decodes_latin1_page() {
        let bytes = b"<html><head><meta charset='iso-8859-1'></head><body>cr\xe8me br\xfbl\xe9e</body>";
        let page = decode_page(bytes, None);
        assert!(page.contains("crème brûlée"));
    }

    #[test]
    fn header_beats_meta() {
        let bytes = b"<meta charset=\"utf-8\">caf\xe9";
        let page = decode_page(bytes, Some("text/html; charset=windows-1252"));
        assert!(page.ends_with("café"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(decode_page(b"pie \xff crust", None), "pie \u{FFFD} crust");
    }
}
