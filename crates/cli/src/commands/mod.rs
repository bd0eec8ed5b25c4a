pub mod auth;
pub mod banners;
pub mod categories;
pub mod home;
pub mod links;
pub mod request;
pub mod top_data;

use std::path::Path;

use serde::Serialize;
use vitrine_client::Upload;

use crate::OutputFormat;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report a side-effect call, preferring the backend's own message.
pub fn print_ack(
    message: Option<String>,
    fallback: &str,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "success": true,
            "message": message,
        })),
        OutputFormat::Text => {
            println!("{}", message.as_deref().unwrap_or(fallback));
            Ok(())
        }
    }
}

pub async fn read_upload(path: &Path) -> anyhow::Result<Upload> {
    Ok(Upload::from_path(path).await?)
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
