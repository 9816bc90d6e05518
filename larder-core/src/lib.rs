pub mod error;
pub mod http;
pub mod scrape;
pub mod types;
pub mod wild;

pub use error::{FetchError, FieldError, ScrapeError};
pub use http::{HttpClient, MockClient, MockResponse, WebClient, WebClientBuilder};
pub use scrape::{extract_fields, is_valid_url, RecipeFields, RecipeScraper};
pub use types::ScrapedRecipe;
pub use wild::{Image, Instructions, Scalar, SchemaSource, WildScraper};
