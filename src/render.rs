//! HTML pages for browsing and viewing recipes.
//!
//! All recipe text is escaped by maud. The stored custom CSS is the one
//! exception: it was sanitized on write and is emitted verbatim inside a
//! `<style>` block, so any response carrying it must also send
//! [`CONTENT_SECURITY_POLICY`].

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::models::{RecipeDetail, RecipeSummary, RecipeType};

/// Policy sent with every page that inlines custom CSS.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'";

/// Text with newlines turned into `<br>`.
fn multiline(text: &str) -> Markup {
    html! {
        @for (i, line) in text.lines().enumerate() {
            @if i > 0 { br; }
            (line)
        }
    }
}

pub fn page_path(variant: RecipeType, id: i64) -> String {
    format!("/recipes/{}/{}/page", variant, id)
}

/// Public page for a single recipe.
pub fn recipe_page(detail: &RecipeDetail) -> String {
    let recipe = &detail.recipe;
    let custom_css = recipe.custom_css.as_ref().filter(|css| !css.is_empty());

    html! {
        (DOCTYPE)
        html {
            head {
                title { (recipe.name) }
                @if let Some(css) = custom_css {
                    style { (PreEscaped(css.as_str())) }
                }
            }
            body {
                h1 { (recipe.name) }
                p { strong { "Description:" } " " (multiline(&recipe.description)) }

                @if let Some(comments) = recipe.comments.as_deref().filter(|c| !c.is_empty()) {
                    p { strong { "Comments:" } " " (multiline(comments)) }
                }

                h2 { "Ingredients" }
                ul {
                    @for ingredient in &detail.ingredients {
                        li {
                            (ingredient.name) ": " (ingredient.quantity)
                            @if let Some(unit) = ingredient.unit {
                                " " (unit.as_str())
                            }
                        }
                    }
                }

                h2 { "Directions" }
                ol {
                    @for direction in &detail.directions {
                        li { (multiline(&direction.step)) }
                    }
                }

                p class="last-edited" { "Last edited by: " (recipe.editor_ip_display()) }
                a href="/" { "Back to Home" }
            }
        }
    }
    .into_string()
}

fn recipe_list(variant: RecipeType, recipes: &[RecipeSummary]) -> Markup {
    html! {
        ul {
            @for summary in recipes {
                li {
                    (summary.name) " - "
                    a href=(page_path(variant, summary.id)) { "View" }
                }
            }
        }
    }
}

/// Index page listing both variants.
pub fn index_page(drinks: &[RecipeSummary], foods: &[RecipeSummary]) -> String {
    html! {
        (DOCTYPE)
        html {
            head { title { "Recipes" } }
            body {
                h1 { "Drink Combos" }
                (recipe_list(RecipeType::Drink, drinks))
                h1 { "Food Recipes" }
                (recipe_list(RecipeType::Food, foods))
            }
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::SanitizedCss;
    use crate::models::{Direction, Ingredient, Recipe, Unit};

    fn detail(css: Option<&str>) -> RecipeDetail {
        RecipeDetail {
            recipe: Recipe {
                id: 3,
                variant: RecipeType::Food,
                name: "Mac & <Cheese>".to_string(),
                description: "Creamy.\nCheesy.".to_string(),
                comments: Some("Kids love it".to_string()),
                custom_css: css.map(SanitizedCss::new),
                last_edited_ip: Some("2001:db8::1".to_string()),
            },
            ingredients: vec![
                Ingredient::new("macaroni", "200", Some(Unit::G)),
                Ingredient::new("salt", "a pinch", None),
            ],
            directions: vec![Direction::new("Boil."), Direction::new("Stir in <cheese>.")],
        }
    }

    #[test]
    fn test_recipe_page_escapes_text() {
        let page = recipe_page(&detail(None));
        assert!(page.contains("<title>Mac &amp; &lt;Cheese&gt;</title>"));
        assert!(page.contains("Stir in &lt;cheese&gt;."));
        assert!(page.contains("Creamy.<br>Cheesy."));
        assert!(page.contains("<li>macaroni: 200 g</li>"));
        assert!(page.contains("<li>salt: a pinch</li>"));
    }

    #[test]
    fn test_recipe_page_shows_anonymized_ip() {
        let page = recipe_page(&detail(None));
        assert!(page.contains("xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:0:1"));
        assert!(!page.contains("2001:db8"));
    }

    #[test]
    fn test_recipe_page_inlines_sanitized_css() {
        let page = recipe_page(&detail(Some("h1 > span { color: red; background: url(x) }")));
        assert!(page.contains("<style>h1 > span { color: red; background: x) }</style>"));
    }

    #[test]
    fn test_recipe_page_omits_empty_css() {
        let page = recipe_page(&detail(Some("<style>a{}</style>")));
        assert!(!page.contains("<style>"));
        let page = recipe_page(&detail(None));
        assert!(!page.contains("<style>"));
    }

    #[test]
    fn test_index_page_links_by_variant() {
        let drinks = vec![RecipeSummary {
            id: 1,
            name: "Gin Fizz".to_string(),
        }];
        let foods = vec![RecipeSummary {
            id: 1,
            name: "Toast".to_string(),
        }];
        let page = index_page(&drinks, &foods);
        assert!(page.contains("href=\"/recipes/drink/1/page\""));
        assert!(page.contains("href=\"/recipes/food/1/page\""));
    }
}
