pub mod health;
pub mod pages;
pub mod recipes;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use larder_core::ScrapeError;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::models::Recipe;
use crate::store::StoreError;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// An error on its way out as `{"detail": ...}` with a fixed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Recipe not found")
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => Self::new(StatusCode::CONFLICT, e.to_string()),
            other => {
                tracing::error!(error = %other, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        }
    }
}

impl From<ScrapeError> for ApiError {
    fn from(e: ScrapeError) -> Self {
        match e {
            ScrapeError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            ScrapeError::ExtractionFailure(_) => {
                tracing::error!(error = %e, "recipe extraction failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

// Malformed request parts are reported as 422 with the extractor's own message.
impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::unprocessable(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::unprocessable(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::unprocessable(e.body_text())
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Larder", description = "Self-hosted recipe manager"),
        components(schemas(ErrorResponse, Recipe))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> =
        vec![health::ApiDoc::openapi(), recipes::ApiDoc::openapi()];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = openapi();
        for path in ["/health", "/api/recipes", "/api/recipes/{id}"] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
        let schemas = &spec.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("Recipe"));
        assert!(schemas.contains_key("ListRecipesResponse"));
    }

    #[test]
    fn test_error_mapping() {
        let conflict: ApiError = StoreError::Conflict.into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.detail, "Recipe with this URL already exists");

        let invalid: ApiError = ScrapeError::InvalidInput("Invalid URL format".to_string()).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.detail, "Invalid URL format");

        let failed: ApiError = ScrapeError::ExtractionFailure("boom".to_string()).into();
        assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.detail, "Failed to scrape recipe: boom");
    }
}
