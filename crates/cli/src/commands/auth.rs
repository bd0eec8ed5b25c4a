use std::io::BufRead;

use anyhow::Context;
use clap::Args;
use vitrine_client::VitrineClient;

use crate::OutputFormat;
use crate::commands::print_json;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Admin email address.
    #[arg(long)]
    pub email: String,
    /// Password. Read from the first line of stdin when not given.
    #[arg(long, env = "VITRINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn login(
    client: &VitrineClient,
    args: &LoginArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => read_password_line(std::io::stdin().lock())?,
    };

    let view = client
        .session()
        .try_login(&args.email, &password)
        .await
        .context("login failed")?;

    match format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Text => {
            println!(
                "Logged in as {name} <{email}> ({role}).",
                name = view.display_name,
                email = view.email,
                role = view.role,
            );
            if !view.is_admin() {
                println!("Note: this account is not an admin; some calls may be refused.");
            }
        }
    }
    Ok(())
}

pub fn logout(client: &VitrineClient) -> anyhow::Result<()> {
    let was_logged_in = client.session().is_authenticated();
    client.session().logout();
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(client: &VitrineClient, format: &OutputFormat) -> anyhow::Result<()> {
    let current = client.session().current();
    match format {
        OutputFormat::Json => print_json(&current)?,
        OutputFormat::Text => match current {
            Some(view) => println!(
                "{name} <{email}>\n  id:   {id}\n  role: {role}",
                name = view.display_name,
                email = view.email,
                id = view.subject_id,
                role = view.role,
            ),
            None => println!("Not logged in."),
        },
    }
    Ok(())
}

fn read_password_line(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_owned();
    anyhow::ensure!(!password.is_empty(), "no password given");
    Ok(password)
}
