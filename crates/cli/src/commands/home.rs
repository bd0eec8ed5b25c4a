use std::path::PathBuf;

use clap::{Args, Subcommand};
use vitrine_client::VitrineClient;
use vitrine_core::NewThumbnail;

use crate::OutputFormat;
use crate::commands::{print_ack, print_json, read_upload};

#[derive(Args, Debug)]
pub struct HomeArgs {
    #[command(subcommand)]
    pub command: HomeCommand,
}

#[derive(Subcommand, Debug)]
pub enum HomeCommand {
    /// Show the home screen content.
    Show,
    /// Replace the home thumbnail.
    UploadThumbnail {
        /// Where the thumbnail links to.
        #[arg(long)]
        url: String,
        /// URL opened by the search entry.
        #[arg(long)]
        searchable_url: String,
        /// Upload the thumbnail as inactive.
        #[arg(long)]
        inactive: bool,
        /// Thumbnail image file.
        #[arg(long)]
        image: PathBuf,
    },
}

pub async fn run(
    client: &VitrineClient,
    args: &HomeArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match &args.command {
        HomeCommand::Show => {
            let home = client.home_data().await?;
            match format {
                OutputFormat::Json => print_json(&home)?,
                OutputFormat::Text => {
                    match &home.thumbnail_url {
                        Some(thumb) => println!("Thumbnail: {} ({})", thumb.url, thumb.id),
                        None => println!("Thumbnail: none"),
                    }
                    println!("Searchable URL: {}", home.searchable_url);
                    println!("{} premium banners:", home.premium_banner_urls.len());
                    for banner in &home.premium_banner_urls {
                        println!("  {}  {}", banner.id, banner.url);
                    }
                }
            }
        }
        HomeCommand::UploadThumbnail {
            url,
            searchable_url,
            inactive,
            image,
        } => {
            let thumbnail = NewThumbnail {
                url: url.clone(),
                searchable_url: searchable_url.clone(),
                is_active: !inactive,
            };
            let upload = read_upload(image).await?;
            let message = client.upload_home_thumbnail(&thumbnail, upload).await?;
            print_ack(message, "Thumbnail uploaded.", format)?;
        }
    }
    Ok(())
}
