use serde::{Deserialize, Serialize};
use std::fmt;

use super::ingredient::{Direction, Ingredient};
use super::recipe_type::RecipeType;
use crate::css::SanitizedCss;
use crate::error::RecipeError;
use crate::ip;

/// A stored drink or food recipe, without its children.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub variant: RecipeType,
    pub name: String,
    pub description: String,
    pub comments: Option<String>,
    pub custom_css: Option<SanitizedCss>,
    /// Raw address of the last editor. Display through [`Recipe::editor_ip_display`].
    #[serde(skip)]
    pub last_edited_ip: Option<String>,
}

impl Recipe {
    /// Last editor's address with all but the two low-order segments masked.
    pub fn editor_ip_display(&self) -> String {
        ip::anonymize(self.last_edited_ip.as_deref().unwrap_or(""))
    }
}

/// Recipe with its ingredients and directions, directions in insertion order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
    pub directions: Vec<Direction>,
}

impl fmt::Display for RecipeDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipe = &self.recipe;
        writeln!(f, "{} ({} #{})", recipe.name, recipe.variant, recipe.id)?;
        writeln!(f, "{}", "=".repeat(recipe.name.chars().count()))?;
        writeln!(f, "{}", recipe.description)?;

        if let Some(comments) = recipe.comments.as_deref().filter(|c| !c.is_empty()) {
            writeln!(f, "\nComments: {}", comments)?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "  - {}", ingredient)?;
            }
        }

        if !self.directions.is_empty() {
            writeln!(f, "\nDirections:")?;
            for (i, direction) in self.directions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, direction)?;
            }
        }

        writeln!(f, "\nLast edited by: {}", recipe.editor_ip_display())
    }
}

/// Index row for browse pages.
#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
}

/// A recipe matched by the search index.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchHit {
    pub variant: RecipeType,
    pub id: i64,
    pub name: String,
}

/// Fields written on create and update.
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub name: String,
    pub description: String,
    pub comments: Option<String>,
    pub custom_css: Option<SanitizedCss>,
    pub ingredients: Vec<Ingredient>,
    pub directions: Vec<Direction>,
}

impl RecipeInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Sanitizes `raw` and attaches it.
    pub fn with_custom_css(mut self, raw: &str) -> Self {
        self.custom_css = Some(SanitizedCss::new(raw));
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_directions(mut self, directions: Vec<Direction>) -> Self {
        self.directions = directions;
        self
    }

    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::validation("Recipe name cannot be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(RecipeError::validation("Description cannot be empty"));
        }
        Ok(())
    }

    /// Ingredients with blank name or quantity dropped, the rest trimmed.
    pub fn kept_ingredients(&self) -> Vec<Ingredient> {
        self.ingredients.iter().filter_map(Ingredient::normalized).collect()
    }

    /// Directions with blank steps dropped, the rest trimmed.
    pub fn kept_directions(&self) -> Vec<Direction> {
        self.directions.iter().filter_map(Direction::normalized).collect()
    }
}

/// Recipe fields as submitted by a client, custom CSS still raw.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeForm {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub custom_css: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Each entry is a bare string or `{"step": ...}`.
    #[serde(default)]
    pub directions: Vec<Direction>,
}

impl From<RecipeForm> for RecipeInput {
    fn from(form: RecipeForm) -> Self {
        let mut input = RecipeInput::new(form.name, form.description)
            .with_ingredients(form.ingredients)
            .with_directions(form.directions);
        input.comments = form.comments;
        if let Some(raw) = form.custom_css {
            input = input.with_custom_css(&raw);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    fn sample_recipe(ip: Option<&str>) -> Recipe {
        Recipe {
            id: 7,
            variant: RecipeType::Drink,
            name: "Gin Fizz".to_string(),
            description: "Fizzy.".to_string(),
            comments: None,
            custom_css: None,
            last_edited_ip: ip.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_requires_name_and_description() {
        assert!(RecipeInput::new("Gin Fizz", "Fizzy").validate().is_ok());
        assert!(matches!(
            RecipeInput::new("  ", "Fizzy").validate(),
            Err(RecipeError::Validation(_))
        ));
        assert!(matches!(
            RecipeInput::new("Gin Fizz", "").validate(),
            Err(RecipeError::Validation(_))
        ));
    }

    #[test]
    fn test_kept_children_filter_blanks() {
        let input = RecipeInput::new("Soup", "Warm")
            .with_ingredients(vec![
                Ingredient::new("water", "1", Some(Unit::Cups)),
                Ingredient::new("", "2", None),
                Ingredient::new("salt", " ", None),
            ])
            .with_directions(vec![
                Direction::new("Boil."),
                Direction::new("   "),
                Direction::new(" Serve. "),
            ]);

        assert_eq!(
            input.kept_ingredients(),
            vec![Ingredient::new("water", "1", Some(Unit::Cups))]
        );
        assert_eq!(
            input.kept_directions(),
            vec![Direction::new("Boil."), Direction::new("Serve.")]
        );
    }

    #[test]
    fn test_with_custom_css_sanitizes() {
        let input = RecipeInput::new("a", "b").with_custom_css("h1{background:url(x)}");
        assert_eq!(input.custom_css.unwrap().as_str(), "h1{background:x)}");
    }

    #[test]
    fn test_editor_ip_display() {
        assert_eq!(sample_recipe(Some("192.168.1.25")).editor_ip_display(), "xxx.xxx.1.25");
        assert_eq!(sample_recipe(None).editor_ip_display(), "Unknown IP");
    }

    #[test]
    fn test_recipe_json_omits_raw_ip() {
        let json = serde_json::to_string(&sample_recipe(Some("10.0.0.1"))).unwrap();
        assert!(!json.contains("10.0.0.1"));
        assert!(json.contains("\"variant\":\"drink\""));
    }

    #[test]
    fn test_form_into_input() {
        let form: RecipeForm = serde_json::from_str(
            r#"{"name":"Toast","description":"Crisp","custom_css":"p{x:javascript:y}",
                "ingredients":[{"name":"bread","quantity":"2","unit":"pcs"}],
                "directions":["Toast it."]}"#,
        )
        .unwrap();
        let input = RecipeInput::from(form);
        assert_eq!(input.custom_css.unwrap().as_str(), "p{x:y}");
        assert_eq!(input.ingredients[0].unit, Some(Unit::Pcs));
        assert_eq!(input.directions, vec![Direction::new("Toast it.")]);
    }

    #[test]
    fn test_form_accepts_fetched_direction_shape() {
        let form: RecipeForm = serde_json::from_str(
            r#"{"name":"Toast","description":"Crisp",
                "directions":[{"step":"Slice."},"Toast it."]}"#,
        )
        .unwrap();
        assert_eq!(
            form.directions,
            vec![Direction::new("Slice."), Direction::new("Toast it.")]
        );
    }

    #[test]
    fn test_detail_display_underline_counts_chars() {
        let mut recipe = sample_recipe(None);
        recipe.name = "Crème brûlée".to_string();
        let detail = RecipeDetail {
            recipe,
            ingredients: vec![],
            directions: vec![],
        };
        let output = format!("{}", detail);
        assert_eq!(output.lines().nth(1), Some("=".repeat(12).as_str()));
    }

    #[test]
    fn test_detail_display() {
        let detail = RecipeDetail {
            recipe: sample_recipe(Some("10.0.45.198")),
            ingredients: vec![Ingredient::new("gin", "50", Some(Unit::Ml))],
            directions: vec![Direction::new("Shake."), Direction::new("Strain.")],
        };
        let output = format!("{}", detail);
        assert!(output.contains("Gin Fizz (drink #7)"));
        assert!(output.contains("  - gin: 50 ml"));
        assert!(output.contains("  2. Strain."));
        assert!(output.contains("xxx.xxx.45.198"));
    }
}
