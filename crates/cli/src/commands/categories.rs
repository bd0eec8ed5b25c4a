use std::path::PathBuf;

use clap::{Args, Subcommand};
use vitrine_client::VitrineClient;
use vitrine_core::{NewCategory, NewSubcategory};

use crate::OutputFormat;
use crate::commands::{print_ack, print_json, read_upload, yes_no};

#[derive(Args, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    /// List main categories.
    List,
    /// Create a main category.
    Create {
        /// Category name.
        name: String,
    },
    /// Show a category and its subcategories.
    Show {
        /// Category ID.
        id: String,
    },
    /// Add a subcategory under a main category.
    AddSub {
        /// Parent category ID.
        #[arg(long)]
        parent: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        title: String,
        /// Telegram channel URL.
        #[arg(long)]
        telegram_url: String,
        /// Mark the subcategory as premium.
        #[arg(long)]
        premium: bool,
        /// Cover image file.
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

pub async fn run(
    client: &VitrineClient,
    args: &CategoriesArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match &args.command {
        CategoriesCommand::List => {
            let categories = client.list_main_categories().await?;
            match format {
                OutputFormat::Json => print_json(&categories)?,
                OutputFormat::Text => {
                    println!("{} main categories:", categories.len());
                    for category in &categories {
                        println!("  {}  {}", category.category_id, category.name);
                    }
                }
            }
        }
        CategoriesCommand::Create { name } => {
            let category = client
                .create_main_category(&NewCategory { name: name.clone() })
                .await?;
            match format {
                OutputFormat::Json => print_json(&category)?,
                OutputFormat::Text => {
                    println!("Created category '{}' ({}).", category.name, category.category_id);
                }
            }
        }
        CategoriesCommand::Show { id } => {
            let details = client.category_details(id).await?;
            match format {
                OutputFormat::Json => print_json(&details)?,
                OutputFormat::Text => {
                    println!("{} ({})", details.name, details.category_id);
                    println!("  main:    {}", yes_no(details.is_main_category));
                    println!("  premium: {}", yes_no(details.is_premium));
                    if let Some(parent) = &details.parent_category_id {
                        println!("  parent:  {parent}");
                    }
                    println!("  {} subcategories:", details.subcategories.len());
                    for sub in &details.subcategories {
                        let tier = if sub.is_premium { "PREMIUM" } else { "free   " };
                        println!(
                            "    [{tier}] {id}  {name}  {url}",
                            id = sub.category_id,
                            name = sub.name,
                            url = sub.telegram_url,
                        );
                    }
                }
            }
        }
        CategoriesCommand::AddSub {
            parent,
            name,
            title,
            telegram_url,
            premium,
            image,
        } => {
            let subcategory = NewSubcategory {
                name: name.clone(),
                title: title.clone(),
                telegram_url: telegram_url.clone(),
                is_premium: *premium,
                parent_category_id: parent.clone(),
            };
            let upload = match image {
                Some(path) => Some(read_upload(path).await?),
                None => None,
            };
            let message = client.create_subcategory(&subcategory, upload).await?;
            print_ack(message, &format!("Subcategory '{name}' created."), format)?;
        }
    }
    Ok(())
}
