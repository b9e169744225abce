use clap::Args;

use recipebox::db::SearchIndex;

use super::OutputFormat;

#[derive(Args)]
pub struct SearchCommand {
    /// Text to look for in names, ingredients and steps
    pub query: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SearchCommand {
    pub async fn run(&self, index: &SearchIndex) -> Result<(), Box<dyn std::error::Error>> {
        let hits = index.search(&self.query).await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            }
            OutputFormat::Text => {
                if hits.is_empty() {
                    println!("No recipes match '{}'", self.query.trim());
                    return Ok(());
                }
                println!("{:<6}  {:<6}  NAME", "TYPE", "ID");
                println!("{}", "-".repeat(50));
                for hit in &hits {
                    println!("{:<6}  {:<6}  {}", hit.variant, hit.id, hit.name);
                }
                println!("\nTotal: {} match(es)", hits.len());
            }
        }
        Ok(())
    }
}
