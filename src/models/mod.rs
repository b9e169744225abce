mod ingredient;
mod recipe;
mod recipe_type;

pub use ingredient::{Direction, Ingredient, Unit};
pub use recipe::{Recipe, RecipeDetail, RecipeForm, RecipeInput, RecipeSummary, SearchHit};
pub use recipe_type::{ParentRef, RecipeType};
