//! Locating a schema.org `Recipe` inside `application/ld+json` blocks.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Script tags carrying JSON-LD. A regex is enough here and spares a DOM parse
/// for the common case.
static JSONLD_SCRIPT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("Invalid JSON-LD regex")
});

/// First Recipe node found across all JSON-LD blocks of the page.
pub fn find_recipe(html: &str) -> Option<Value> {
    JSONLD_SCRIPT_REGEX
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .filter_map(|m| parse_block(m.as_str()))
        .find_map(|json| find_recipe_node(&json).cloned())
}

fn parse_block(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    // Some CMSes wrap the payload in a CDATA section
    let raw = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(raw);

    match serde_json::from_str(&escape_raw_control_chars(raw)) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, "skipping unparseable JSON-LD block");
            None
        }
    }
}

/// Literal newlines and tabs inside JSON strings are invalid JSON but common
/// in hand-edited markup. Escape them; drop any other control characters.
fn escape_raw_control_chars(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

fn is_recipe_type(value: &Value) -> bool {
    let matches = |s: &str| s == "Recipe" || s.ends_with("schema.org/Recipe");
    match value {
        Value::String(s) => matches(s),
        Value::Array(types) => types.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

/// Depth-first search through objects, arrays and `@graph`.
fn find_recipe_node(json: &Value) -> Option<&Value> {
    match json {
        Value::Object(obj) => {
            if obj.get("@type").is_some_and(is_recipe_type) {
                return Some(json);
            }
            if let Some(recipe) = obj.get("@graph").and_then(find_recipe_node) {
                return Some(recipe);
            }
            obj.iter()
                .filter(|(key, _)| key.as_str() != "@graph")
                .find_map(|(_, v)| find_recipe_node(v))
        }
        Value::Array(items) => items.iter().find_map(find_recipe_node),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_recipe_in_graph() {
        let html = r#"<script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [
                {"@type": "WebPage", "name": "Blog"},
                {"@type": ["Recipe", "NewsArticle"], "name": "Pie"}
            ]}
        </script>"#;
        let recipe = find_recipe(html).unwrap();
        assert_eq!(recipe["name"], "Pie");
    }

    #[test]
    fn skips_broken_blocks() {
        let html = r#"
            <script type="application/ld+json">{ not json</script>
            <script type='application/ld+json'>[{"@type": "Recipe", "name": "Soup"}]</script>
        "#;
        assert_eq!(find_recipe(html).unwrap()["name"], "Soup");
    }

    #[test]
    fn tolerates_raw_newlines_in_strings() {
        let html = "<script type=\"application/ld+json\">{\"@type\": \"Recipe\", \"description\": \"line one\nline two\"}</script>";
        let recipe = find_recipe(html).unwrap();
        assert_eq!(recipe["description"], "line one\nline two");
    }

    #[test]
    fn escaped_quotes_do_not_confuse_sanitizer() {
        let raw = "{\"a\": \"say \\\"hi\\\"\tnow\"}";
        let parsed: Value = serde_json::from_str(&escape_raw_control_chars(raw)).unwrap();
        assert_eq!(parsed, json!({"a": "say \"hi\"\tnow"}));
    }

    #[test]
    fn no_recipe_type() {
        let html = r#"<script type="application/ld+json">{"@type": "Article"}</script>"#;
        assert!(find_recipe(html).is_none());
    }
}
