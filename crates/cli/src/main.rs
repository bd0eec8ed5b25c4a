//! Vitrine CLI
//!
//! An admin console for the Vitrine content backend.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
use vitrine_client::VitrineClient;

use crate::config::VitrineConfig;

/// Vitrine CLI: manage categories, banners and links on the content backend.
#[derive(Parser, Debug)]
#[command(name = "vitrine", version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend origin URL.
    #[arg(long, env = "VITRINE_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Origin of the login endpoint, when it differs from the backend.
    #[arg(long, env = "VITRINE_AUTH_URL", global = true)]
    auth_url: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session.
    Login(commands::auth::LoginArgs),
    /// Drop the persisted session.
    Logout,
    /// Show who is logged in.
    Whoami,
    /// Manage categories and subcategories.
    Categories(commands::categories::CategoriesArgs),
    /// Manage the home screen.
    Home(commands::home::HomeArgs),
    /// Manage premium banners.
    Banners(commands::banners::BannersArgs),
    /// Manage the top data snippet.
    TopData(commands::top_data::TopDataArgs),
    /// Manage the Telegram link.
    Links(commands::links::LinksArgs),
    /// Send a raw call through the gateway and print the envelope.
    Request(commands::request::RequestArgs),
}

impl Command {
    fn needs_session(&self) -> bool {
        !matches!(
            self,
            Self::Login(_) | Self::Logout | Self::Whoami | Self::Request(_)
        )
    }
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = VitrineConfig::load(cli.config.as_deref())?
        .with_overrides(cli.base_url, cli.auth_url);
    let client = config.connect()?;
    let format = &cli.format;

    if cli.command.needs_session() {
        require_session(&client)?;
    }

    match cli.command {
        Command::Login(args) => commands::auth::login(&client, &args, format).await,
        Command::Logout => commands::auth::logout(&client),
        Command::Whoami => commands::auth::whoami(&client, format),
        Command::Categories(args) => commands::categories::run(&client, &args, format).await,
        Command::Home(args) => commands::home::run(&client, &args, format).await,
        Command::Banners(args) => commands::banners::run(&client, &args, format).await,
        Command::TopData(args) => commands::top_data::run(&client, &args, format).await,
        Command::Links(args) => commands::links::run(&client, &args, format).await,
        Command::Request(args) => commands::request::run(&client, &args).await,
    }
}

fn require_session(client: &VitrineClient) -> anyhow::Result<()> {
    client
        .require_session()
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("{e}; run `vitrine login` first"))
}
