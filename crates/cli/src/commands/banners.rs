use std::path::PathBuf;

use clap::{Args, Subcommand};
use vitrine_client::VitrineClient;
use vitrine_core::NewPremiumBanner;

use crate::OutputFormat;
use crate::commands::{print_ack, print_json, read_upload};

#[derive(Args, Debug)]
pub struct BannersArgs {
    #[command(subcommand)]
    pub command: BannersCommand,
}

#[derive(Subcommand, Debug)]
pub enum BannersCommand {
    /// List premium banners.
    List,
    /// Upload a premium banner.
    Create {
        /// Banner image file.
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Where the banner links to, sent as `linkUrl`.
        #[arg(long)]
        link_url: Option<String>,
        /// Where the banner links to, sent as `url` (home screen form).
        #[arg(long)]
        url: Option<String>,
        /// Upload the banner as inactive.
        #[arg(long)]
        inactive: bool,
    },
}

pub async fn run(
    client: &VitrineClient,
    args: &BannersArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match &args.command {
        BannersCommand::List => {
            let banners = client.list_premium_banners().await?;
            match format {
                OutputFormat::Json => print_json(&banners)?,
                OutputFormat::Text => {
                    println!("{} premium banners:", banners.len());
                    for banner in &banners {
                        let status = if banner.is_active { "ON " } else { "OFF" };
                        println!(
                            "  [{status}] {id}  {title}  {image}",
                            id = banner.banner_id,
                            title = banner.title,
                            image = banner.image_url,
                        );
                    }
                }
            }
        }
        BannersCommand::Create {
            image,
            title,
            description,
            link_url,
            url,
            inactive,
        } => {
            let banner = NewPremiumBanner {
                title: title.clone(),
                description: description.clone(),
                link_url: link_url.clone(),
                url: url.clone(),
                is_active: !inactive,
            };
            let upload = read_upload(image).await?;
            let message = client.create_premium_banner(&banner, upload).await?;
            print_ack(message, "Banner uploaded.", format)?;
        }
    }
    Ok(())
}
