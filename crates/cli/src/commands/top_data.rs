use clap::{Args, Subcommand};
use vitrine_client::VitrineClient;
use vitrine_core::TopDataInput;

use crate::OutputFormat;
use crate::commands::{print_ack, print_json, yes_no};

#[derive(Args, Debug)]
pub struct TopDataArgs {
    #[command(subcommand)]
    pub command: TopDataCommand,
}

#[derive(Subcommand, Debug)]
pub enum TopDataCommand {
    /// Show the current snippet.
    Show,
    /// Create a snippet.
    Create(SnippetArgs),
    /// Overwrite an existing snippet.
    Update {
        /// Snippet ID.
        id: String,
        #[command(flatten)]
        snippet: SnippetArgs,
    },
    /// Delete a snippet.
    Delete {
        /// Snippet ID.
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct SnippetArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Body text of the snippet.
    #[arg(long)]
    pub text: String,
    /// Display order.
    #[arg(long, default_value_t = 1)]
    pub order: i64,
    /// Store the snippet as inactive.
    #[arg(long)]
    pub inactive: bool,
}

impl SnippetArgs {
    fn to_input(&self) -> TopDataInput {
        TopDataInput {
            title: self.title.clone(),
            description: self.description.clone(),
            textdata: self.text.clone(),
            order: self.order,
            is_active: !self.inactive,
        }
    }
}

pub async fn run(
    client: &VitrineClient,
    args: &TopDataArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match &args.command {
        TopDataCommand::Show => {
            let snippet = client.top_data().await?;
            match format {
                OutputFormat::Json => print_json(&snippet)?,
                OutputFormat::Text => match snippet {
                    Some(snippet) => {
                        println!("{} ({})", snippet.title, snippet.id);
                        println!("  active: {}", yes_no(snippet.is_active));
                        println!("  order:  {}", snippet.order);
                        if !snippet.description.is_empty() {
                            println!("  {}", snippet.description);
                        }
                        println!("  {}", snippet.textdata);
                    }
                    None => println!("No top data configured."),
                },
            }
        }
        TopDataCommand::Create(snippet) => {
            let message = client.create_top_data(&snippet.to_input()).await?;
            print_ack(message, "Top data created.", format)?;
        }
        TopDataCommand::Update { id, snippet } => {
            let message = client.update_top_data(id, &snippet.to_input()).await?;
            print_ack(message, &format!("Top data '{id}' updated."), format)?;
        }
        TopDataCommand::Delete { id } => {
            let message = client.delete_top_data(id).await?;
            print_ack(message, &format!("Top data '{id}' deleted."), format)?;
        }
    }
    Ok(())
}
