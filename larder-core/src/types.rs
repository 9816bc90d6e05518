use serde::{Deserialize, Serialize};

/// Recipe attributes pulled from a page, ready to be stored.
///
/// Only produced once the minimum bar is met: a non-empty title, and at
/// least one of ingredients or instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRecipe {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Minutes
    pub prep_time: Option<i32>,
    /// Minutes
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub images: Vec<String>,
    /// Category then cuisine, as published by the page.
    pub tags: Vec<String>,
}
