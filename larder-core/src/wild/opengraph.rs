use std::sync::LazyLock;

use regex::Regex;

use super::text::clean_inline;

static META_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("Invalid meta tag regex"));

static ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z:_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid attribute regex")
});

/// Page-level Open Graph values used when the recipe schema lacks them.
#[derive(Debug, Default, Clone)]
pub struct OpenGraph {
    pub title: Option<String>,
    pub image: Option<String>,
}

impl OpenGraph {
    pub fn from_html(html: &str) -> Self {
        let mut og = OpenGraph::default();

        for tag in META_TAG_REGEX.find_iter(html) {
            let mut property = None;
            let mut content = None;
            for cap in ATTR_REGEX.captures_iter(tag.as_str()) {
                let value = cap.get(2).or_else(|| cap.get(3)).map(|m| m.as_str());
                match cap.get(1).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
                    Some("property") | Some("name") => property = value,
                    Some("content") => content = value,
                    _ => {}
                }
            }

            let Some(content) = content.map(clean_inline).filter(|c| !c.is_empty()) else {
                continue;
            };
            match property {
                Some("og:title") if og.title.is_none() => og.title = Some(content),
                Some("og:image") if og.image.is_none() => og.image = Some(content),
                _ => {}
            }
        }

        og
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_either_attribute_order() {
        let html = r#"
            <meta content="https://example.com/pie.jpg" property="og:image" />
            <meta property='og:title' content='Apple Pie &amp; Custard'>
        "#;
        let og = OpenGraph::from_html(html);
        assert_eq!(og.image.as_deref(), Some("https://example.com/pie.jpg"));
        assert_eq!(og.title.as_deref(), Some("Apple Pie & Custard"));
    }

    #[test]
    fn first_value_wins() {
        let html = r#"<meta property="og:image" content="a.jpg"><meta property="og:image" content="b.jpg">"#;
        assert_eq!(OpenGraph::from_html(html).image.as_deref(), Some("a.jpg"));
    }
}
