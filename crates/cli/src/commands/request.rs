use clap::Args;
use vitrine_client::{Method, RequestOptions, VitrineClient};

use crate::commands::print_json;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Path relative to the backend origin, e.g. `/categories/main`.
    pub path: String,
    /// HTTP method.
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,
    /// JSON body (string or @file path).
    #[arg(long)]
    pub json: Option<String>,
    /// Extra headers (Name=Value). An empty value removes the header.
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid NAME=VALUE: no `=` found in `{s}`"))?;
    Ok((name.trim().to_owned(), value.to_owned()))
}

/// Send one raw gateway call and print the envelope verbatim.
pub async fn run(client: &VitrineClient, args: &RequestArgs) -> anyhow::Result<()> {
    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .map_err(|_| anyhow::anyhow!("invalid HTTP method `{}`", args.method))?;
    let path = if args.path.starts_with('/') {
        args.path.clone()
    } else {
        format!("/{}", args.path)
    };

    let mut options = RequestOptions::default().method(method);
    if let Some(body) = &args.json {
        options = options.json(parse_body(body)?);
    }
    for (name, value) in &args.headers {
        options = if value.is_empty() {
            options.without_header(name)
        } else {
            options.header(name, value)
        };
    }

    let envelope = client.request(&path, options).await?;
    print_json(&envelope)
}

fn parse_body(raw: &str) -> anyhow::Result<serde_json::Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)?,
        None => raw.to_owned(),
    };
    Ok(serde_json::from_str(&text)?)
}
