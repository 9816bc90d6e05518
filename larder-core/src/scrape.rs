//! URL in, validated recipe attributes out.
//!
//! The page is fetched and handed to the wild-mode scraper, then every
//! attribute is read through its own accessor. A failing accessor only costs
//! that one attribute: each has an explicit default below, and extraction
//! carries on with the rest. Only the final minimum-validity check can reject
//! the page as a whole.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{FieldError, ScrapeError};
use crate::http::{HttpClient, WebClient};
use crate::types::ScrapedRecipe;
use crate::wild::{Image, Instructions, Scalar, WildScraper};

/// `http(s)://` + domain, `localhost` or dotted IPv4, optional port, optional path.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?",
        r"|localhost",
        r"|[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})",
        r"(?::[0-9]+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("Invalid URL regex")
});

static FIRST_INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid integer regex"));

pub const INVALID_URL_MESSAGE: &str = "Invalid URL format";
pub const MISSING_TITLE_MESSAGE: &str = "Recipe must have a title";
pub const MISSING_CONTENT_MESSAGE: &str = "Recipe must have ingredients or instructions";

pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// The extraction adapter. Cheap to share; holds only the HTTP client.
#[derive(Clone)]
pub struct RecipeScraper {
    client: Arc<dyn HttpClient>,
}

impl RecipeScraper {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Scraper over a real network client with default timeout and user agent.
    pub fn with_web_client() -> Result<Self, ScrapeError> {
        let client = WebClient::new().map_err(|e| {
            ScrapeError::ExtractionFailure(format!("could not build HTTP client: {}", e))
        })?;
        Ok(Self::new(Arc::new(client)))
    }

    pub async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError> {
        if !is_valid_url(url) {
            return Err(ScrapeError::InvalidInput(INVALID_URL_MESSAGE.to_string()));
        }

        let html = self.client.fetch_html(url).await.map_err(|e| {
            tracing::warn!(url, error = %e, "failed to fetch recipe page");
            ScrapeError::InvalidInput(format!("Failed to scrape recipe: {}", e))
        })?;

        let page = WildScraper::parse(&html, url);
        extract_fields(&page).into_recipe()
    }
}

/// Attributes read from a page before the minimum-validity check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFields {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
}

impl RecipeFields {
    pub fn into_recipe(self) -> Result<ScrapedRecipe, ScrapeError> {
        let Some(title) = self.title else {
            return Err(ScrapeError::InvalidInput(MISSING_TITLE_MESSAGE.to_string()));
        };
        if self.ingredients.is_empty() && self.instructions.is_empty() {
            return Err(ScrapeError::InvalidInput(MISSING_CONTENT_MESSAGE.to_string()));
        }

        Ok(ScrapedRecipe {
            url: self.url,
            title,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            servings: self.servings,
            images: self.images,
            tags: self.tags,
        })
    }
}

/// Read every attribute independently.
pub fn extract_fields(page: &WildScraper) -> RecipeFields {
    RecipeFields {
        url: page.url().to_string(),
        title: text_or_none("title", page.title()),
        description: text_or_none("description", page.description()),
        ingredients: ingredients_or_empty(page.ingredients()),
        instructions: instructions_or_empty(page.instructions()),
        prep_time: minutes_or_none("prep_time", page.prep_time()),
        cook_time: minutes_or_none("cook_time", page.cook_time()),
        servings: servings_or_none(page.yields()),
        images: images_or_empty(page.image()),
        tags: tags_from_metadata(page),
    }
}

fn skipped(field: &'static str, error: &FieldError) {
    tracing::debug!(field, error = %error, "field unavailable, using default");
}

/// Default: None. Empty strings count as absent.
fn text_or_none(field: &'static str, result: Result<String, FieldError>) -> Option<String> {
    match result {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            skipped(field, &e);
            None
        }
    }
}

/// Default: empty list.
fn ingredients_or_empty(result: Result<Vec<String>, FieldError>) -> Vec<String> {
    result.unwrap_or_else(|e| {
        skipped("ingredients", &e);
        Vec::new()
    })
}

/// Default: empty list. A text block is split into trimmed, non-empty lines;
/// ready-made steps are kept as they are.
fn instructions_or_empty(result: Result<Instructions, FieldError>) -> Vec<String> {
    match result {
        Ok(Instructions::Text(block)) => block
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Ok(Instructions::Steps(steps)) => steps,
        Err(e) => {
            skipped("instructions", &e);
            Vec::new()
        }
    }
}

/// Default: None. Only an integer minute count is accepted; text (even
/// numeric text) is not interpreted.
fn minutes_or_none(field: &'static str, result: Result<Scalar, FieldError>) -> Option<i32> {
    match result {
        Ok(Scalar::Int(minutes)) => non_negative(minutes),
        Ok(Scalar::Text(_)) => None,
        Err(e) => {
            skipped(field, &e);
            None
        }
    }
}

/// Default: None. Integers are kept; for text the first run of digits is
/// used ("Serves 4-6" gives 4).
fn servings_or_none(result: Result<Scalar, FieldError>) -> Option<i32> {
    match result {
        Ok(Scalar::Int(servings)) => non_negative(servings),
        Ok(Scalar::Text(text)) => FIRST_INTEGER_REGEX
            .find(&text)
            .and_then(|m| m.as_str().parse().ok()),
        Err(e) => {
            skipped("servings", &e);
            None
        }
    }
}

/// Default: empty list. A single image becomes a one-element list.
fn images_or_empty(result: Result<Image, FieldError>) -> Vec<String> {
    match result {
        Ok(Image::Single(url)) if !url.is_empty() => vec![url],
        Ok(Image::Single(_)) => Vec::new(),
        Ok(Image::Many(urls)) => urls,
        Err(e) => {
            skipped("images", &e);
            Vec::new()
        }
    }
}

/// Category then cuisine, each only when present and non-empty. No dedup.
fn tags_from_metadata(page: &WildScraper) -> Vec<String> {
    [
        text_or_none("category", page.category()),
        text_or_none("cuisine", page.cuisine()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn non_negative(value: i64) -> Option<i32> {
    i32::try_from(value).ok().filter(|v| *v >= 0)
}
