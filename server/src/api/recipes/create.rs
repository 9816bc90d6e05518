use crate::api::{ApiError, ErrorResponse};
use crate::models::Recipe;
use crate::store;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    /// Address of the recipe page to import
    pub url: String,
}

/// Import a recipe from a web page.
///
/// Known URLs are rejected before any network work; nothing is stored unless
/// extraction succeeds.
#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe imported", body = Recipe),
        (status = 400, description = "Invalid URL or no usable recipe on the page", body = ErrorResponse),
        (status = 409, description = "Recipe with this URL already exists", body = ErrorResponse),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Extraction or storage failure", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    request: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let Json(request) = request?;

    if store::find_by_url(&state.pool, &request.url)?.is_some() {
        return Err(store::StoreError::Conflict.into());
    }

    let scraped = state.scraper.scrape(&request.url).await?;
    let recipe = store::insert_recipe(&state.pool, &scraped)?;

    Ok((StatusCode::CREATED, Json(recipe)))
}
