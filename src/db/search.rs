use sqlx::SqlitePool;

use crate::error::RecipeError;
use crate::models::SearchHit;

/// Case-insensitive substring search over recipe names, ingredient names and
/// direction steps of both variants.
///
/// Reads the same schema as [`crate::db::RecipeRepository`] but shares no
/// state with it.
#[derive(Clone)]
pub struct SearchIndex {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct HitRow {
    recipe_type: String,
    id: i64,
    name: String,
}

// UNION (not UNION ALL) collapses repeated (recipe_type, id) matches.
const SEARCH_SQL: &str = r#"
SELECT 'drink' AS recipe_type, d.id AS id, d.name AS name
    FROM drink_combos d WHERE d.name LIKE ? ESCAPE '\'
UNION
SELECT 'drink', d.id, d.name
    FROM drink_combos d JOIN ingredients i ON i.drink_id = d.id
    WHERE i.ingredient LIKE ? ESCAPE '\'
UNION
SELECT 'drink', d.id, d.name
    FROM drink_combos d JOIN directions s ON s.drink_id = d.id
    WHERE s.step LIKE ? ESCAPE '\'
UNION
SELECT 'food', f.id, f.name
    FROM food_recipes f WHERE f.name LIKE ? ESCAPE '\'
UNION
SELECT 'food', f.id, f.name
    FROM food_recipes f JOIN ingredients i ON i.food_id = f.id
    WHERE i.ingredient LIKE ? ESCAPE '\'
UNION
SELECT 'food', f.id, f.name
    FROM food_recipes f JOIN directions s ON s.food_id = f.id
    WHERE s.step LIKE ? ESCAPE '\'
ORDER BY recipe_type, id
"#;

/// Number of `?` placeholders in [`SEARCH_SQL`].
const SEARCH_BINDS: usize = 6;

impl SearchIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns every recipe where `term` occurs, surrounding whitespace
    /// included. A blank term matches nothing.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchHit>, RecipeError> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }

        let pattern = like_pattern(term);
        let mut query = sqlx::query_as::<_, HitRow>(SEARCH_SQL);
        for _ in 0..SEARCH_BINDS {
            query = query.bind(pattern.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;

        tracing::debug!("Search for {:?} matched {} recipe(s)", term, rows.len());

        rows.into_iter()
            .map(|row| -> Result<SearchHit, RecipeError> {
                Ok(SearchHit {
                    variant: row.recipe_type.parse()?,
                    id: row.id,
                    name: row.name,
                })
            })
            .collect()
    }
}

/// `%term%` with LIKE wildcards in `term` matched literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
