//! Best-effort ("wild mode") schema.org recipe scraper.
//!
//! Works on any site that publishes a schema.org `Recipe`, with no per-site
//! profile. Parsing never fails: a page without a usable schema simply yields
//! [`FieldError::NoSchema`] from every schema-backed accessor. Each accessor
//! is independent, so a broken field never hides the others.

mod duration;
mod jsonld;
mod microdata;
mod opengraph;
pub mod text;

use scraper::Html;
use serde_json::Value;
use url::Url;

use crate::error::FieldError;
pub use duration::iso_duration_minutes;
use opengraph::OpenGraph;
use text::{clean_block, clean_inline};

/// Where the recipe node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSource {
    JsonLd,
    Microdata,
}

/// `recipeInstructions` as the page expressed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instructions {
    /// One block of text, line structure preserved.
    Text(String),
    /// Already separated steps (`HowToStep` / `HowToSection` lists).
    Steps(Vec<String>),
}

/// A loosely typed scalar. Durations and yields are integers only when the
/// page states them in a machine-readable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Image {
    Single(String),
    Many(Vec<String>),
}

pub struct WildScraper {
    url: String,
    /// Base for resolving relative image links
    base: Option<Url>,
    recipe: Option<Value>,
    source: Option<SchemaSource>,
    og: OpenGraph,
}

impl WildScraper {
    /// Parse a fetched page. JSON-LD is looked for with a cheap scan first;
    /// the DOM is only built when microdata has to be tried.
    pub fn parse(html: &str, url: &str) -> Self {
        let og = OpenGraph::from_html(html);

        let (recipe, source) = match jsonld::find_recipe(html) {
            Some(node) => (Some(node), Some(SchemaSource::JsonLd)),
            None => {
                let document = Html::parse_document(html);
                match microdata::find_recipe(&document) {
                    Some(node) => (Some(node), Some(SchemaSource::Microdata)),
                    None => (None, None),
                }
            }
        };

        tracing::debug!(url, ?source, "parsed recipe page");

        Self {
            url: url.to_string(),
            base: Url::parse(url).ok(),
            recipe,
            source,
            og,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn schema_source(&self) -> Option<SchemaSource> {
        self.source
    }

    fn node(&self) -> Result<&Value, FieldError> {
        self.recipe.as_ref().ok_or(FieldError::NoSchema)
    }

    /// First present, non-null property among `names`.
    fn property(&self, names: &[&'static str]) -> Result<&Value, FieldError> {
        let node = self.node()?;
        names
            .iter()
            .find_map(|name| node.get(*name).filter(|v| !v.is_null()))
            .ok_or(FieldError::Missing(names[0]))
    }

    fn text_property(&self, name: &'static str) -> Result<String, FieldError> {
        match self.property(&[name])? {
            Value::String(s) => Ok(clean_inline(s)),
            Value::Array(items) => items
                .iter()
                .find_map(Value::as_str)
                .map(clean_inline)
                .ok_or_else(|| malformed(name, "array without strings")),
            other => Err(malformed(name, kind(other))),
        }
    }

    pub fn title(&self) -> Result<String, FieldError> {
        match self.text_property("name") {
            Ok(title) if !title.is_empty() => Ok(title),
            from_schema => match &self.og.title {
                Some(og_title) => Ok(og_title.clone()),
                None => from_schema,
            },
        }
    }

    pub fn description(&self) -> Result<String, FieldError> {
        self.text_property("description")
    }

    pub fn ingredients(&self) -> Result<Vec<String>, FieldError> {
        let field = "recipeIngredient";
        let lines: Vec<String> = match self.property(&[field, "ingredients"])? {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(clean_inline(s)),
                    // Occasionally given as objects with a name
                    Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(clean_inline),
                    _ => None,
                })
                .collect(),
            Value::String(s) => clean_block(s).lines().map(str::to_string).collect(),
            other => return Err(malformed(field, kind(other))),
        };

        Ok(lines.into_iter().filter(|l| !l.is_empty()).collect())
    }

    pub fn instructions(&self) -> Result<Instructions, FieldError> {
        let field = "recipeInstructions";
        match self.property(&[field])? {
            Value::String(s) => Ok(Instructions::Text(clean_block(s))),
            value @ (Value::Array(_) | Value::Object(_)) => {
                let mut steps = Vec::new();
                collect_steps(value, &mut steps);
                Ok(Instructions::Steps(steps))
            }
            other => Err(malformed(field, kind(other))),
        }
    }

    pub fn prep_time(&self) -> Result<Scalar, FieldError> {
        self.duration("prepTime")
    }

    pub fn cook_time(&self) -> Result<Scalar, FieldError> {
        self.duration("cookTime")
    }

    fn duration(&self, field: &'static str) -> Result<Scalar, FieldError> {
        match self.property(&[field])? {
            Value::String(s) => Ok(match iso_duration_minutes(s) {
                Some(minutes) => Scalar::Int(minutes),
                None => Scalar::Text(s.trim().to_string()),
            }),
            Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .ok_or_else(|| malformed(field, "non-integer number")),
            other => Err(malformed(field, kind(other))),
        }
    }

    /// `recipeYield`; the first entry when the page lists several forms.
    pub fn yields(&self) -> Result<Scalar, FieldError> {
        let field = "recipeYield";
        let value = match self.property(&[field, "yield"])? {
            Value::Array(items) => items.first().ok_or(FieldError::Missing(field))?,
            other => other,
        };

        match value {
            Value::String(s) => Ok(Scalar::Text(clean_inline(s))),
            Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .ok_or_else(|| malformed(field, "non-integer number")),
            other => Err(malformed(field, kind(other))),
        }
    }

    pub fn image(&self) -> Result<Image, FieldError> {
        let from_schema = self.property(&["image"]).and_then(|value| match value {
            Value::String(s) => Ok(Image::Single(s.trim().to_string())),
            Value::Object(_) => image_url(value)
                .map(Image::Single)
                .ok_or_else(|| malformed("image", "object without url")),
            Value::Array(items) => Ok(Image::Many(items.iter().filter_map(image_url).collect())),
            other => Err(malformed("image", kind(other))),
        });

        let usable = match &from_schema {
            Ok(Image::Single(url)) => !url.is_empty(),
            Ok(Image::Many(urls)) => !urls.is_empty(),
            Err(_) => false,
        };

        let image = match (&self.og.image, usable) {
            (Some(og_image), false) => Ok(Image::Single(og_image.clone())),
            _ => from_schema,
        }?;

        Ok(match image {
            Image::Single(link) => Image::Single(self.absolute(link)),
            Image::Many(links) => {
                Image::Many(links.into_iter().map(|link| self.absolute(link)).collect())
            }
        })
    }

    /// Resolve `link` against the page URL. Left alone when either side won't parse.
    fn absolute(&self, link: String) -> String {
        if link.is_empty() {
            return link;
        }
        match self.base.as_ref().map(|base| base.join(&link)) {
            Some(Ok(resolved)) => resolved.to_string(),
            _ => link,
        }
    }

    pub fn category(&self) -> Result<String, FieldError> {
        self.joined_property("recipeCategory")
    }

    pub fn cuisine(&self) -> Result<String, FieldError> {
        self.joined_property("recipeCuisine")
    }

    fn joined_property(&self, field: &'static str) -> Result<String, FieldError> {
        match self.property(&[field])? {
            Value::String(s) => Ok(clean_inline(s)),
            Value::Array(items) => Ok(items
                .iter()
                .filter_map(Value::as_str)
                .map(clean_inline)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ")),
            other => Err(malformed(field, kind(other))),
        }
    }
}

/// Flatten `HowToStep`s, nested `HowToSection`s and bare strings into steps.
fn collect_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            let step = clean_inline(s);
            if !step.is_empty() {
                steps.push(step);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_steps(item, steps)),
        Value::Object(obj) => {
            if let Some(children) = obj.get("itemListElement") {
                collect_steps(children, steps);
                return;
            }
            let text = ["text", "name", "description"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str));
            if let Some(text) = text {
                collect_steps(&Value::String(text.to_string()), steps);
            }
        }
        _ => {}
    }
}

fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(obj) => obj
            .get("url")
            .or_else(|| obj.get("contentUrl"))
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string()),
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

fn malformed(field: &'static str, reason: &str) -> FieldError {
    FieldError::Malformed {
        field,
        reason: reason.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
