//! Recipe storage on top of the SQLite pool.
//!
//! The unique index on `url` is the authoritative duplicate guard; callers may
//! pre-check with [`find_by_url`], but a losing concurrent insert still comes
//! back as [`StoreError::Conflict`].

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::sqlite::Sqlite;
use larder_core::ScrapedRecipe;
use thiserror::Error;

use crate::db::DbPool;
use crate::models::{NewRecipe, Recipe, RecipeRow};
use crate::schema::recipes;

pub const MAX_PAGE_SIZE: i64 = 500;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Recipe with this URL already exists")]
    Conflict,

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Database error: {0}")]
    Query(diesel::result::Error),

    #[error("Failed to encode {column}: {source}")]
    Encode {
        column: &'static str,
        source: serde_json::Error,
    },
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::Conflict
            }
            other => StoreError::Query(other),
        }
    }
}

/// Filters and page window for [`list_recipes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Substring of the title or of the serialized ingredients
    pub search: Option<String>,
    /// Substring of the serialized tags
    pub tag: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl Default for RecipeFilter {
    fn default() -> Self {
        Self {
            search: None,
            tag: None,
            offset: 0,
            limit: 100,
        }
    }
}

fn encode(column: &'static str, values: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(values).map_err(|source| StoreError::Encode { column, source })
}

/// Store a freshly scraped recipe. `created_at` and `updated_at` are both now.
pub fn insert_recipe(pool: &DbPool, scraped: &ScrapedRecipe) -> Result<Recipe, StoreError> {
    let now = Utc::now().naive_utc();
    let new_recipe = NewRecipe {
        url: &scraped.url,
        title: &scraped.title,
        description: scraped.description.as_deref(),
        ingredients: encode("ingredients", &scraped.ingredients)?,
        instructions: encode("instructions", &scraped.instructions)?,
        prep_time: scraped.prep_time,
        cook_time: scraped.cook_time,
        servings: scraped.servings,
        images: encode("images", &scraped.images)?,
        tags: encode("tags", &scraped.tags)?,
        created_at: now,
        updated_at: now,
    };

    let mut conn = pool.get()?;
    let row = conn.immediate_transaction(|conn| {
        diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .execute(conn)?;

        recipes::table
            .filter(recipes::url.eq(new_recipe.url))
            .select(RecipeRow::as_select())
            .first(conn)
    })?;

    tracing::info!(id = row.id, url = %row.url, "stored recipe");
    Ok(row.into())
}

pub fn find_by_url(pool: &DbPool, url: &str) -> Result<Option<Recipe>, StoreError> {
    let mut conn = pool.get()?;
    let row = recipes::table
        .filter(recipes::url.eq(url))
        .select(RecipeRow::as_select())
        .first(&mut conn)
        .optional()?;
    Ok(row.map(Recipe::from))
}

pub fn find_by_id(pool: &DbPool, id: i32) -> Result<Option<Recipe>, StoreError> {
    let mut conn = pool.get()?;
    let row = recipes::table
        .find(id)
        .select(RecipeRow::as_select())
        .first(&mut conn)
        .optional()?;
    Ok(row.map(Recipe::from))
}

/// Wrap user text for `LIKE ... ESCAPE '\'` as a contains-match.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn filtered<'a>(
    search: Option<&'a str>,
    tag: Option<&'a str>,
) -> recipes::BoxedQuery<'a, Sqlite> {
    let mut query = recipes::table.into_boxed();

    if let Some(pattern) = search {
        query = query.filter(
            recipes::title
                .like(pattern)
                .escape('\\')
                .or(recipes::ingredients.like(pattern).escape('\\')),
        );
    }
    if let Some(pattern) = tag {
        query = query.filter(recipes::tags.like(pattern).escape('\\'));
    }

    query
}

/// One page of matching recipes, newest first, plus the unpaginated match count.
pub fn list_recipes(
    pool: &DbPool,
    filter: &RecipeFilter,
) -> Result<(Vec<Recipe>, i64), StoreError> {
    let search = filter
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(contains_pattern);
    let tag = filter
        .tag
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(contains_pattern);

    let mut conn = pool.get()?;
    let (rows, total) = conn.transaction(|conn| {
        let total: i64 = filtered(search.as_deref(), tag.as_deref())
            .count()
            .get_result(conn)?;

        let rows: Vec<RecipeRow> = filtered(search.as_deref(), tag.as_deref())
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .offset(filter.offset)
            .limit(filter.limit)
            .select(RecipeRow::as_select())
            .load(conn)?;

        Ok::<_, diesel::result::Error>((rows, total))
    })?;

    Ok((rows.into_iter().map(Recipe::from).collect(), total))
}

/// Returns whether a recipe with this id existed.
pub fn delete_recipe(pool: &DbPool, id: i32) -> Result<bool, StoreError> {
    let mut conn = pool.get()?;
    let deleted = diesel::delete(recipes::table.find(id)).execute(&mut conn)?;
    if deleted > 0 {
        tracing::info!(id, "deleted recipe");
    }
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    fn scraped(url: &str, title: &str) -> ScrapedRecipe {
        ScrapedRecipe {
            url: url.to_string(),
            title: title.to_string(),
            description: None,
            ingredients: vec!["flour".to_string(), "sugar".to_string()],
            instructions: vec![],
            prep_time: Some(10),
            cook_time: None,
            servings: Some(4),
            images: vec![],
            tags: vec!["Dessert".to_string()],
        }
    }

    fn test_pool() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(&dir.path().join("data/recipes.db")).unwrap();
        (dir, pool)
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("pie"), "%pie%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn test_insert_and_find() {
        let (_dir, pool) = test_pool();
        let stored = insert_recipe(&pool, &scraped("https://example.com/pie", "Pie")).unwrap();

        assert_eq!(stored.title, "Pie");
        assert_eq!(stored.ingredients, vec!["flour", "sugar"]);
        assert_eq!(stored.created_at, stored.updated_at);

        let by_id = find_by_id(&pool, stored.id).unwrap().unwrap();
        assert_eq!(by_id, stored);
        let by_url = find_by_url(&pool, "https://example.com/pie").unwrap().unwrap();
        assert_eq!(by_url.id, stored.id);
        assert!(find_by_id(&pool, stored.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_url_is_conflict() {
        let (_dir, pool) = test_pool();
        insert_recipe(&pool, &scraped("https://example.com/pie", "Pie")).unwrap();
        let err = insert_recipe(&pool, &scraped("https://example.com/pie", "Other")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        let (all, total) = list_recipes(&pool, &RecipeFilter::default()).unwrap();
        assert_eq!(total, 1);
        assert_eq!(all[0].title, "Pie");
    }

    #[test]
    fn test_list_filters_and_total() {
        let (_dir, pool) = test_pool();
        insert_recipe(&pool, &scraped("https://example.com/a", "Apple Pie")).unwrap();
        insert_recipe(&pool, &scraped("https://example.com/b", "Banana Bread")).unwrap();
        insert_recipe(&pool, &scraped("https://example.com/c", "100% Rye")).unwrap();

        let filter = RecipeFilter {
            search: Some("PIE".to_string()),
            ..Default::default()
        };
        let (found, total) = list_recipes(&pool, &filter).unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].title, "Apple Pie");

        // Matches ingredients too
        let filter = RecipeFilter {
            search: Some("Sugar".to_string()),
            ..Default::default()
        };
        assert_eq!(list_recipes(&pool, &filter).unwrap().1, 3);

        // A literal percent sign is not a wildcard
        let filter = RecipeFilter {
            search: Some("0%".to_string()),
            ..Default::default()
        };
        let (found, total) = list_recipes(&pool, &filter).unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].title, "100% Rye");

        let filter = RecipeFilter {
            tag: Some("dessert".to_string()),
            offset: 1,
            limit: 1,
            ..Default::default()
        };
        let (page, total) = list_recipes(&pool, &filter).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_list_newest_first() {
        let (_dir, pool) = test_pool();
        let first = insert_recipe(&pool, &scraped("https://example.com/1", "One")).unwrap();
        let second = insert_recipe(&pool, &scraped("https://example.com/2", "Two")).unwrap();

        let (all, _) = list_recipes(&pool, &RecipeFilter::default()).unwrap();
        let ids: Vec<i32> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_delete() {
        let (_dir, pool) = test_pool();
        let stored = insert_recipe(&pool, &scraped("https://example.com/pie", "Pie")).unwrap();

        assert!(delete_recipe(&pool, stored.id).unwrap());
        assert!(!delete_recipe(&pool, stored.id).unwrap());
        assert!(find_by_id(&pool, stored.id).unwrap().is_none());
    }
}
