use crate::api::{ApiError, ErrorResponse};
use crate::models::Recipe;
use crate::store::{self, RecipeFilter, MAX_PAGE_SIZE};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecipesParams {
    /// Case-insensitive text to find in the title or ingredients
    pub search: Option<String>,
    /// Case-insensitive text to find in the tags
    pub tag: Option<String>,
    /// Number of recipes to skip (default: 0)
    pub skip: Option<i64>,
    /// Number of recipes to return (default: 100, max: 500)
    pub limit: Option<i64>,
}

impl ListRecipesParams {
    fn into_filter(self) -> Result<RecipeFilter, ApiError> {
        let offset = self.skip.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::unprocessable("skip must be greater than or equal to 0"));
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ApiError::unprocessable(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        Ok(RecipeFilter {
            search: self.search.filter(|s| !s.is_empty()),
            tag: self.tag.filter(|t| !t.is_empty()),
            offset,
            limit,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<Recipe>,
    /// Number of matching recipes before pagination
    pub total: i64,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Matching recipes, newest first", body = ListRecipesResponse),
        (status = 422, description = "Invalid pagination parameters", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    params: Result<Query<ListRecipesParams>, QueryRejection>,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter()?;

    let (recipes, total) = store::list_recipes(&state.pool, &filter)?;

    Ok(Json(ListRecipesResponse { recipes, total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_defaults() {
        let filter = ListRecipesParams::default().into_filter().unwrap();
        assert_eq!(filter, RecipeFilter::default());
        assert_eq!(filter.limit, 100);
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let filter = ListRecipesParams {
            search: Some(String::new()),
            tag: Some(String::new()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.tag, None);
    }

    #[test]
    fn test_pagination_bounds() {
        for (skip, limit) in [(Some(-1), None), (None, Some(0)), (None, Some(501))] {
            let err = ListRecipesParams {
                skip,
                limit,
                ..Default::default()
            }
            .into_filter()
            .unwrap_err();
            assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        }

        let edge = ListRecipesParams {
            skip: Some(0),
            limit: Some(500),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(edge.limit, 500);
    }
}
