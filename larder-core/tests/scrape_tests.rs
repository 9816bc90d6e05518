use larder_core::scrape::{INVALID_URL_MESSAGE, MISSING_TITLE_MESSAGE};
use larder_core::{MockClient, RecipeScraper, ScrapeError};
use std::sync::Arc;

const PIE_PAGE: &str = r#"<html><head><script type="application/ld+json">
{"@type": "Recipe", "name": "Pie", "recipeIngredient": ["flour", "sugar"]}
</script></head></html>"#;

#[tokio::test]
async fn test_pie_with_ingredients_only() {
    let client = MockClient::new().with_html("https://example.com/pie", PIE_PAGE);
    let scraper = RecipeScraper::new(Arc::new(client));

    let recipe = scraper.scrape("https://example.com/pie").await.unwrap();
    assert_eq!(recipe.title, "Pie");
    assert_eq!(recipe.ingredients, vec!["flour", "sugar"]);
    assert!(recipe.instructions.is_empty());
    assert!(recipe.tags.is_empty());
    assert_eq!(recipe.url, "https://example.com/pie");
}

#[tokio::test]
async fn test_malformed_url_never_fetches() {
    let client = Arc::new(MockClient::new());
    let scraper = RecipeScraper::new(client.clone());

    let err = scraper.scrape("not-a-url").await.unwrap_err();
    assert!(matches!(err, ScrapeError::InvalidInput(_)));
    assert_eq!(err.to_string(), INVALID_URL_MESSAGE);
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_is_invalid_input() {
    let client = MockClient::new().with_error("https://example.com/gone", "HTTP 404");
    let scraper = RecipeScraper::new(Arc::new(client));

    let err = scraper.scrape("https://example.com/gone").await.unwrap_err();
    assert!(err.is_invalid_input());
    assert!(err.to_string().starts_with("Failed to scrape recipe:"));
    assert!(err.to_string().contains("HTTP 404"));
}

#[tokio::test]
async fn test_recipe_without_title_is_rejected() {
    let page = r#"<script type="application/ld+json">
        {"@type": "Recipe", "recipeIngredient": ["1 egg"], "recipeInstructions": "Boil."}
    </script>"#;
    let client = MockClient::new().with_html("https://example.com/egg", page);
    let scraper = RecipeScraper::new(Arc::new(client));

    let err = scraper.scrape("https://example.com/egg").await.unwrap_err();
    assert_eq!(err.to_string(), MISSING_TITLE_MESSAGE);
}

#[tokio::test]
async fn test_one_broken_field_does_not_spoil_the_rest() {
    // image, yield and times are all the wrong shape
    let page = r#"<script type="application/ld+json">
        {"@type": "Recipe", "name": "Rice", "image": 17, "recipeYield": {"value": 2},
         "prepTime": false, "cookTime": "PT18M", "recipeInstructions": "Rinse.\nSimmer."}
    </script>"#;
    let client = MockClient::new().with_html("https://example.com/rice", page);
    let scraper = RecipeScraper::new(Arc::new(client));

    let recipe = scraper.scrape("https://example.com/rice").await.unwrap();
    assert_eq!(recipe.title, "Rice");
    assert!(recipe.images.is_empty());
    assert_eq!(recipe.servings, None);
    assert_eq!(recipe.prep_time, None);
    assert_eq!(recipe.cook_time, Some(18));
    assert_eq!(recipe.instructions, vec!["Rinse.", "Simmer."]);
}
