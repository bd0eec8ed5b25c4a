use clap::{Args, Subcommand};
use vitrine_client::VitrineClient;

use crate::OutputFormat;
use crate::commands::{print_ack, print_json};

#[derive(Args, Debug)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Subcommand, Debug)]
pub enum LinksCommand {
    /// Show the Telegram link.
    Show,
    /// Set the Telegram link.
    Create {
        /// Link URL.
        url: String,
    },
    /// Delete a Telegram link.
    Delete {
        /// Link ID.
        id: String,
    },
}

pub async fn run(
    client: &VitrineClient,
    args: &LinksArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match &args.command {
        LinksCommand::Show => {
            let link = client.telegram_link().await?;
            match format {
                OutputFormat::Json => print_json(&link)?,
                OutputFormat::Text => match link {
                    Some(link) => println!("{}  {}", link.id, link.url),
                    None => println!("No Telegram link configured."),
                },
            }
        }
        LinksCommand::Create { url } => {
            let message = client.create_telegram_link(url).await?;
            print_ack(message, "Telegram link saved.", format)?;
        }
        LinksCommand::Delete { id } => {
            let message = client.delete_telegram_link(id).await?;
            print_ack(message, &format!("Telegram link '{id}' deleted."), format)?;
        }
    }
    Ok(())
}
