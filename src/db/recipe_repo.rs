use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::css::SanitizedCss;
use crate::error::RecipeError;
use crate::models::{
    Direction, Ingredient, ParentRef, Recipe, RecipeDetail, RecipeInput, RecipeSummary,
    RecipeType, Unit,
};

/// Reads and writes recipes together with their ingredients and directions.
///
/// Every multi-row write runs in a single transaction: a recipe is never
/// visible with a partial set of children.
#[derive(Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    name: String,
    description: String,
    comments: Option<String>,
    custom_css: Option<String>,
    last_edited_ip: Option<String>,
}

#[derive(sqlx::FromRow)]
struct IngredientRow {
    recipe_type: String,
    drink_id: Option<i64>,
    food_id: Option<i64>,
    ingredient: String,
    quantity: String,
    unit: Option<String>,
}

#[derive(sqlx::FromRow)]
struct DirectionRow {
    recipe_type: String,
    drink_id: Option<i64>,
    food_id: Option<i64>,
    step: String,
}

impl RecipeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a recipe and its non-blank children, returning the new id.
    pub async fn create(
        &self,
        variant: RecipeType,
        input: &RecipeInput,
    ) -> Result<i64, RecipeError> {
        input.validate()?;
        let ingredients = input.kept_ingredients();
        let directions = input.kept_directions();

        let mut tx = self.pool.begin().await?;

        match insert_recipe(&mut *tx, variant, input, &ingredients, &directions).await {
            Ok(id) => {
                tx.commit().await?;
                tracing::info!(
                    "Created {} #{} with {} ingredient(s) and {} direction(s)",
                    variant,
                    id,
                    ingredients.len(),
                    directions.len()
                );
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("Rolling back create of {}: {}", variant, e);
                rollback(tx).await;
                Err(e.into())
            }
        }
    }

    /// Loads a recipe with its ingredients and its directions in insertion order.
    pub async fn fetch(&self, variant: RecipeType, id: i64) -> Result<RecipeDetail, RecipeError> {
        // One read transaction so a concurrent update is seen entirely or not at all
        let mut tx = self.pool.begin().await?;

        let row: Option<RecipeRow> = sqlx::query_as(&format!(
            "SELECT id, name, description, comments, custom_css, last_edited_ip FROM {} WHERE id = ?",
            variant.table()
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = row.ok_or(RecipeError::NotFound { variant, id })?;
        let parent = ParentRef::new(variant, id);

        let ingredient_rows: Vec<IngredientRow> = sqlx::query_as(&format!(
            "SELECT recipe_type, drink_id, food_id, ingredient, quantity, unit FROM ingredients WHERE recipe_type = ? AND {} = ? ORDER BY id ASC",
            variant.parent_column()
        ))
        .bind(variant.as_str())
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let direction_rows: Vec<DirectionRow> = sqlx::query_as(&format!(
            "SELECT recipe_type, drink_id, food_id, step FROM directions WHERE recipe_type = ? AND {} = ? ORDER BY id ASC",
            variant.parent_column()
        ))
        .bind(variant.as_str())
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let ingredients = ingredient_rows
            .into_iter()
            .map(|row| hydrate_ingredient(row, parent))
            .collect::<Result<Vec<_>, _>>()?;
        let directions = direction_rows
            .into_iter()
            .map(|row| hydrate_direction(row, parent))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecipeDetail {
            recipe: hydrate_recipe(row, variant),
            ingredients,
            directions,
        })
    }

    /// Overwrites a recipe and replaces all of its children.
    ///
    /// The row update, the child delete and the reinsert commit together or
    /// not at all.
    pub async fn update(
        &self,
        variant: RecipeType,
        id: i64,
        input: &RecipeInput,
        editor_ip: &str,
    ) -> Result<(), RecipeError> {
        input.validate()?;
        let ingredients = input.kept_ingredients();
        let directions = input.kept_directions();
        let parent = ParentRef::new(variant, id);

        let mut tx = self.pool.begin().await?;

        match replace_recipe(&mut *tx, parent, input, editor_ip, &ingredients, &directions).await {
            Ok(true) => {
                tx.commit().await?;
                tracing::info!(
                    "Updated {} #{} ({} ingredient(s), {} direction(s)) from {}",
                    variant,
                    id,
                    ingredients.len(),
                    directions.len(),
                    crate::ip::anonymize(editor_ip)
                );
                Ok(())
            }
            Ok(false) => {
                rollback(tx).await;
                Err(RecipeError::NotFound { variant, id })
            }
            Err(e) => {
                tracing::warn!("Rolling back update of {} #{}: {}", variant, id, e);
                rollback(tx).await;
                Err(e.into())
            }
        }
    }

    /// Hard-deletes a recipe; its children go with it.
    pub async fn delete(&self, variant: RecipeType, id: i64) -> Result<(), RecipeError> {
        // CASCADE will handle ingredients and directions
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", variant.table()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RecipeError::NotFound { variant, id });
        }
        tracing::info!("Deleted {} #{}", variant, id);
        Ok(())
    }

    pub async fn list(&self, variant: RecipeType) -> Result<Vec<RecipeSummary>, RecipeError> {
        let rows: Vec<RecipeSummary> = sqlx::query_as(&format!(
            "SELECT id, name FROM {} ORDER BY id",
            variant.table()
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Summaries of both variants, drinks first.
    pub async fn list_all(
        &self,
    ) -> Result<(Vec<RecipeSummary>, Vec<RecipeSummary>), RecipeError> {
        let drinks = self.list(RecipeType::Drink).await?;
        let foods = self.list(RecipeType::Food).await?;
        Ok((drinks, foods))
    }
}

/// Rolls back after a failed write. A rollback failure is only logged so the
/// caller still sees the error that caused it; dropping the transaction
/// discards the changes either way.
async fn rollback(tx: Transaction<'_, Sqlite>) {
    if let Err(e) = tx.rollback().await {
        tracing::error!("Rollback failed: {}", e);
    }
}

async fn insert_recipe(
    conn: &mut SqliteConnection,
    variant: RecipeType,
    input: &RecipeInput,
    ingredients: &[Ingredient],
    directions: &[Direction],
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query(&format!(
        "INSERT INTO {} (name, description, comments, custom_css) VALUES (?, ?, ?, ?)",
        variant.table()
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(&input.comments)
    .bind(input.custom_css.as_ref().map(SanitizedCss::as_str))
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    insert_children(conn, ParentRef::new(variant, id), ingredients, directions).await?;
    Ok(id)
}

/// Returns `false` when no recipe row matched.
async fn replace_recipe(
    conn: &mut SqliteConnection,
    parent: ParentRef,
    input: &RecipeInput,
    editor_ip: &str,
    ingredients: &[Ingredient],
    directions: &[Direction],
) -> Result<bool, sqlx::Error> {
    let variant = parent.variant();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {}
        SET name = ?, description = ?, comments = ?, custom_css = ?, last_edited_ip = ?
        WHERE id = ?
        "#,
        variant.table()
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(&input.comments)
    .bind(input.custom_css.as_ref().map(SanitizedCss::as_str))
    .bind(editor_ip)
    .bind(parent.id())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    // Replace children
    for table in ["ingredients", "directions"] {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE recipe_type = ? AND {} = ?",
            table,
            variant.parent_column()
        ))
        .bind(variant.as_str())
        .bind(parent.id())
        .execute(&mut *conn)
        .await?;
    }

    insert_children(conn, parent, ingredients, directions).await?;
    Ok(true)
}

async fn insert_children(
    conn: &mut SqliteConnection,
    parent: ParentRef,
    ingredients: &[Ingredient],
    directions: &[Direction],
) -> Result<(), sqlx::Error> {
    let recipe_type = parent.variant().as_str();
    let (drink_id, food_id) = parent.columns();

    for ingredient in ingredients {
        sqlx::query(
            "INSERT INTO ingredients (recipe_type, drink_id, food_id, ingredient, quantity, unit) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(recipe_type)
        .bind(drink_id)
        .bind(food_id)
        .bind(&ingredient.name)
        .bind(&ingredient.quantity)
        .bind(ingredient.unit.map(|u| u.as_str()))
        .execute(&mut *conn)
        .await?;
    }

    for direction in directions {
        sqlx::query("INSERT INTO directions (recipe_type, drink_id, food_id, step) VALUES (?, ?, ?, ?)")
            .bind(recipe_type)
            .bind(drink_id)
            .bind(food_id)
            .bind(&direction.step)
            .execute(&mut *conn)
            .await?;
    }

    tracing::debug!(
        "Inserted {} ingredient(s) and {} direction(s) for {:?}",
        ingredients.len(),
        directions.len(),
        parent
    );
    Ok(())
}

fn hydrate_recipe(row: RecipeRow, variant: RecipeType) -> Recipe {
    Recipe {
        id: row.id,
        variant,
        name: row.name,
        description: row.description,
        comments: row.comments,
        custom_css: row.custom_css.map(SanitizedCss::from_stored),
        last_edited_ip: row.last_edited_ip,
    }
}

fn check_parent(
    expected: ParentRef,
    recipe_type: &str,
    drink_id: Option<i64>,
    food_id: Option<i64>,
) -> Result<(), RecipeError> {
    let parent = ParentRef::from_columns(recipe_type, drink_id, food_id)?;
    if parent != expected {
        return Err(corrupt(format!(
            "child row belongs to {:?}, expected {:?}",
            parent, expected
        )));
    }
    Ok(())
}

fn hydrate_ingredient(row: IngredientRow, parent: ParentRef) -> Result<Ingredient, RecipeError> {
    check_parent(parent, &row.recipe_type, row.drink_id, row.food_id)?;
    let unit = Unit::parse_optional(row.unit.as_deref().unwrap_or(""))
        .map_err(|e| corrupt(e.to_string()))?;
    Ok(Ingredient::new(row.ingredient, row.quantity, unit))
}

fn hydrate_direction(row: DirectionRow, parent: ParentRef) -> Result<Direction, RecipeError> {
    check_parent(parent, &row.recipe_type, row.drink_id, row.food_id)?;
    Ok(Direction::new(row.step))
}

fn corrupt(message: String) -> RecipeError {
    RecipeError::Storage(sqlx::Error::Decode(message.into()))
}
