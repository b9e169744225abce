use clap::ValueEnum;

mod config_cmd;
mod recipe;
mod search;

pub use config_cmd::ConfigCommand;
pub use recipe::RecipeCommand;
pub use search::SearchCommand;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
