use crate::api::{ApiError, ErrorResponse};
use crate::models::Recipe;
use crate::store;
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = Recipe),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Path(id) = id?;
    // No stored recipe has an id outside the column range
    let Ok(id) = i32::try_from(id) else {
        return Err(ApiError::not_found());
    };

    store::find_by_id(&state.pool, id)?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}
