//! HTML shell pages. They carry no data themselves; the scripts under
//! `/static` fill them in from the JSON API.

use crate::AppState;
use axum::extract::Path;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

const INDEX_PAGE: &str = include_str!("../../templates/index.html");
const RECIPE_PAGE: &str = include_str!("../../templates/recipe.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/recipes/{id}", get(recipe_detail))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn recipe_detail(Path(id): Path<i32>) -> Html<String> {
    Html(render_recipe_page(id))
}

fn render_recipe_page(id: i32) -> String {
    RECIPE_PAGE.replace("{{ recipe_id }}", &id.to_string())
}
