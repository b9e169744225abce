use clap::{Args, Subcommand};

use recipebox::config::Config;

use super::OutputFormat;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective settings and where each one came from
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show {
                format: OutputFormat::Json,
            } => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            ConfigSubcommand::Show {
                format: OutputFormat::Text,
            } => {
                match &config.config_file {
                    Some(path) => println!("# {}", path.display()),
                    None => println!(
                        "# {} (not found, using defaults)",
                        Config::default_config_path().display()
                    ),
                }
                for (key, value, source) in config.entries() {
                    println!("{:<14} {:<40} ({})", key, value, source);
                }
            }
        }
        Ok(())
    }
}
