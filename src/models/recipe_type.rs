use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecipeError;

/// Which of the two parallel recipe kinds a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeType {
    Drink,
    Food,
}

impl RecipeType {
    pub const ALL: [RecipeType; 2] = [RecipeType::Drink, RecipeType::Food];

    /// Tag stored in the `recipe_type` column of child rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::Drink => "drink",
            RecipeType::Food => "food",
        }
    }

    /// Table holding recipe rows of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            RecipeType::Drink => "drink_combos",
            RecipeType::Food => "food_recipes",
        }
    }

    /// Parent-reference column on `ingredients` and `directions`.
    pub fn parent_column(&self) -> &'static str {
        match self {
            RecipeType::Drink => "drink_id",
            RecipeType::Food => "food_id",
        }
    }
}

impl fmt::Display for RecipeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecipeType {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drink" => Ok(RecipeType::Drink),
            "food" => Ok(RecipeType::Food),
            _ => Err(RecipeError::InvalidVariant(s.to_string())),
        }
    }
}

/// Owning recipe of an ingredient or direction row.
///
/// Stored as two nullable columns (`drink_id`, `food_id`) plus the `recipe_type`
/// tag; exactly one column is ever populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ParentRef {
    Drink(i64),
    Food(i64),
}

impl ParentRef {
    pub fn new(variant: RecipeType, id: i64) -> Self {
        match variant {
            RecipeType::Drink => ParentRef::Drink(id),
            RecipeType::Food => ParentRef::Food(id),
        }
    }

    pub fn variant(&self) -> RecipeType {
        match self {
            ParentRef::Drink(_) => RecipeType::Drink,
            ParentRef::Food(_) => RecipeType::Food,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            ParentRef::Drink(id) | ParentRef::Food(id) => *id,
        }
    }

    /// Column values as `(drink_id, food_id)`.
    pub fn columns(&self) -> (Option<i64>, Option<i64>) {
        match self {
            ParentRef::Drink(id) => (Some(*id), None),
            ParentRef::Food(id) => (None, Some(*id)),
        }
    }

    /// Rebuilds a parent reference from a stored row, rejecting rows that break
    /// the one-parent rule.
    pub fn from_columns(
        recipe_type: &str,
        drink_id: Option<i64>,
        food_id: Option<i64>,
    ) -> Result<Self, RecipeError> {
        match (recipe_type.parse::<RecipeType>()?, drink_id, food_id) {
            (RecipeType::Drink, Some(id), None) => Ok(ParentRef::Drink(id)),
            (RecipeType::Food, None, Some(id)) => Ok(ParentRef::Food(id)),
            (variant, drink_id, food_id) => Err(RecipeError::Storage(sqlx::Error::Decode(
                format!(
                    "inconsistent parent reference: recipe_type={} drink_id={:?} food_id={:?}",
                    variant, drink_id, food_id
                )
                .into(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_type_display() {
        assert_eq!(format!("{}", RecipeType::Drink), "drink");
        assert_eq!(format!("{}", RecipeType::Food), "food");
    }

    #[test]
    fn test_recipe_type_from_str() {
        assert_eq!(RecipeType::from_str("drink").unwrap(), RecipeType::Drink);
        assert_eq!(RecipeType::from_str("food").unwrap(), RecipeType::Food);
    }

    #[test]
    fn test_recipe_type_from_str_is_exact() {
        for tag in ["DRINK", "Food", " drink", "food "] {
            assert!(matches!(
                RecipeType::from_str(tag),
                Err(RecipeError::InvalidVariant(ref s)) if s == tag
            ));
        }
    }

    #[test]
    fn test_recipe_type_from_str_invalid() {
        let err = RecipeType::from_str("dessert").unwrap_err();
        assert!(matches!(err, RecipeError::InvalidVariant(ref s) if s == "dessert"));
        assert!(RecipeType::from_str("").is_err());
    }

    #[test]
    fn test_tables_and_columns() {
        assert_eq!(RecipeType::Drink.table(), "drink_combos");
        assert_eq!(RecipeType::Food.table(), "food_recipes");
        assert_eq!(RecipeType::Drink.parent_column(), "drink_id");
        assert_eq!(RecipeType::Food.parent_column(), "food_id");
    }

    #[test]
    fn test_parent_ref_columns() {
        assert_eq!(ParentRef::Drink(3).columns(), (Some(3), None));
        assert_eq!(ParentRef::Food(9).columns(), (None, Some(9)));
        assert_eq!(ParentRef::new(RecipeType::Food, 9), ParentRef::Food(9));
        assert_eq!(ParentRef::Food(9).variant(), RecipeType::Food);
    }

    #[test]
    fn test_parent_ref_from_columns() {
        assert_eq!(
            ParentRef::from_columns("drink", Some(1), None).unwrap(),
            ParentRef::Drink(1)
        );
        assert_eq!(
            ParentRef::from_columns("food", None, Some(2)).unwrap(),
            ParentRef::Food(2)
        );
    }

    #[test]
    fn test_parent_ref_from_inconsistent_columns() {
        assert!(ParentRef::from_columns("drink", Some(1), Some(2)).is_err());
        assert!(ParentRef::from_columns("drink", None, None).is_err());
        assert!(ParentRef::from_columns("food", Some(1), None).is_err());
        assert!(matches!(
            ParentRef::from_columns("snack", Some(1), None),
            Err(RecipeError::InvalidVariant(_))
        ));
    }

    #[test]
    fn test_recipe_type_json() {
        let json = serde_json::to_string(&RecipeType::Drink).unwrap();
        assert_eq!(json, "\"drink\"");
        let parsed: RecipeType = serde_json::from_str("\"food\"").unwrap();
        assert_eq!(parsed, RecipeType::Food);
    }
}
