use clap::{Args, Subcommand};
use std::io::{self, Write};

use recipebox::db::RecipeRepository;
use recipebox::{Direction, Ingredient, RecipeError, RecipeInput, RecipeType, SanitizedCss, Unit};

use super::OutputFormat;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// Add a new recipe
    Add {
        /// Recipe type: drink or food
        recipe_type: String,

        /// Name of the recipe
        name: String,

        /// Description
        #[arg(long)]
        description: String,

        /// Free-text comments
        #[arg(long)]
        comments: Option<String>,

        /// Custom CSS for the recipe page (sanitized before storage)
        #[arg(long)]
        css: Option<String>,

        /// Ingredient as "name|quantity|unit" (can be repeated)
        #[arg(long = "ingredient", value_name = "NAME|QTY|UNIT")]
        ingredients: Vec<String>,

        /// Preparation step (can be repeated, kept in order)
        #[arg(long = "step", value_name = "STEP")]
        steps: Vec<String>,
    },

    /// List recipes of one type, or both
    List {
        /// Recipe type: drink or food
        recipe_type: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Recipe type: drink or food
        recipe_type: String,

        /// Recipe id
        id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Edit a recipe; given ingredients or steps replace the existing ones
    Edit {
        /// Recipe type: drink or food
        recipe_type: String,

        /// Recipe id
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New comments
        #[arg(long)]
        comments: Option<String>,

        /// New custom CSS (sanitized before storage)
        #[arg(long)]
        css: Option<String>,

        /// Replacement ingredient as "name|quantity|unit" (can be repeated)
        #[arg(long = "ingredient", value_name = "NAME|QTY|UNIT")]
        ingredients: Vec<String>,

        /// Replacement step (can be repeated)
        #[arg(long = "step", value_name = "STEP")]
        steps: Vec<String>,

        /// Address recorded as the editor's origin
        #[arg(long, default_value = "127.0.0.1")]
        editor_ip: String,
    },

    /// Delete a recipe
    Delete {
        /// Recipe type: drink or food
        recipe_type: String,

        /// Recipe id
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Parses `name|quantity|unit`; the unit part may be omitted or empty.
pub fn parse_ingredient(raw: &str) -> Result<Ingredient, RecipeError> {
    let mut parts = raw.splitn(3, '|');
    let name = parts.next().unwrap_or("");
    let quantity = parts.next().ok_or_else(|| {
        RecipeError::validation(format!(
            "Ingredient '{}' must be written as name|quantity|unit",
            raw
        ))
    })?;
    let unit = Unit::parse_optional(parts.next().unwrap_or(""))?;
    Ok(Ingredient::new(name, quantity, unit))
}

fn parse_ingredients(raw: &[String]) -> Result<Vec<Ingredient>, RecipeError> {
    raw.iter().map(|s| parse_ingredient(s)).collect()
}

fn to_directions(steps: &[String]) -> Vec<Direction> {
    steps.iter().map(Direction::new).collect()
}

impl RecipeCommand {
    pub async fn run(&self, repo: &RecipeRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::Add {
                recipe_type,
                name,
                description,
                comments,
                css,
                ingredients,
                steps,
            } => {
                let variant: RecipeType = recipe_type.parse()?;

                let mut input = RecipeInput::new(name.as_str(), description.as_str())
                    .with_ingredients(parse_ingredients(ingredients)?)
                    .with_directions(to_directions(steps));
                if let Some(comments) = comments {
                    input = input.with_comments(comments.as_str());
                }
                if let Some(css) = css {
                    input = input.with_custom_css(css);
                }

                let id = repo.create(variant, &input).await?;
                println!("Created {} #{}:", variant, id);
                println!("{}", repo.fetch(variant, id).await?);
                Ok(())
            }

            RecipeSubcommand::List {
                recipe_type,
                format,
            } => {
                let variants = match recipe_type {
                    Some(t) => vec![t.parse::<RecipeType>()?],
                    None => RecipeType::ALL.to_vec(),
                };

                let mut rows = Vec::new();
                for variant in variants {
                    for summary in repo.list(variant).await? {
                        rows.push((variant, summary));
                    }
                }

                if rows.is_empty() {
                    println!("No recipes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        let json: Vec<_> = rows
                            .iter()
                            .map(|(variant, summary)| {
                                serde_json::json!({
                                    "type": variant,
                                    "id": summary.id,
                                    "name": summary.name,
                                })
                            })
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&json)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<6}  {:<6}  NAME", "TYPE", "ID");
                        println!("{}", "-".repeat(50));
                        for (variant, summary) in &rows {
                            println!("{:<6}  {:<6}  {}", variant, summary.id, summary.name);
                        }
                        println!("\nTotal: {} recipe(s)", rows.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show {
                recipe_type,
                id,
                format,
            } => {
                let detail = repo.fetch(recipe_type.parse()?, *id).await?;
                match format {
                    OutputFormat::Json => {
                        let mut json = serde_json::to_value(&detail)?;
                        json["last_edited_by"] = detail.recipe.editor_ip_display().into();
                        println!("{}", serde_json::to_string_pretty(&json)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", detail);
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Edit {
                recipe_type,
                id,
                name,
                description,
                comments,
                css,
                ingredients,
                steps,
                editor_ip,
            } => {
                let variant: RecipeType = recipe_type.parse()?;
                let current = repo.fetch(variant, *id).await?;
                let recipe = current.recipe;

                let input = RecipeInput {
                    name: name.clone().unwrap_or(recipe.name),
                    description: description.clone().unwrap_or(recipe.description),
                    comments: comments.clone().or(recipe.comments),
                    custom_css: match css {
                        Some(raw) => Some(SanitizedCss::new(raw)),
                        None => recipe.custom_css,
                    },
                    ingredients: if ingredients.is_empty() {
                        current.ingredients
                    } else {
                        parse_ingredients(ingredients)?
                    },
                    directions: if steps.is_empty() {
                        current.directions
                    } else {
                        to_directions(steps)
                    },
                };

                repo.update(variant, *id, &input, editor_ip).await?;
                println!("Updated {} #{}:", variant, id);
                println!("{}", repo.fetch(variant, *id).await?);
                Ok(())
            }

            RecipeSubcommand::Delete {
                recipe_type,
                id,
                force,
            } => {
                let variant: RecipeType = recipe_type.parse()?;
                let detail = repo.fetch(variant, *id).await?;

                // Confirm deletion unless --force is used
                if !force {
                    print!("Delete {} '{}'? [y/N] ", variant, detail.recipe.name);
                    io::stdout().flush()?;

                    let mut answer = String::new();
                    io::stdin().read_line(&mut answer)?;

                    if !answer.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                repo.delete(variant, *id).await?;
                println!("Deleted {}: {}", variant, detail.recipe.name);
                Ok(())
            }
        }
    }
}
