use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::api::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the content API")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Change the password of the logged-in account")]
    ChangePassword {
        #[arg(long, help = "Current password (will prompt if not provided)")]
        current: Option<String>,
        #[arg(long, help = "New password (will prompt if not provided)")]
        new: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let auth = client.auth();

    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            auth.login(&username, &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {}", username),
                Some(json!({ "username": username })),
            )
        }
        AuthCommands::Logout => {
            auth.logout();
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => match auth.status()? {
            Some(claims) => {
                let who = claims.username.clone().unwrap_or_else(|| claims.subject.clone());
                let expiry = match claims.expires_at {
                    Some(exp) if claims.is_expired() => format!(", token expired {}", exp.to_rfc3339()),
                    Some(exp) => format!(", token expires {}", exp.to_rfc3339()),
                    None => String::new(),
                };
                output_success(
                    &output_format,
                    &format!("Authenticated as {}{}", who, expiry),
                    Some(json!({ "authenticated": true, "claims": claims })),
                )
            }
            None => output_success(
                &output_format,
                "Not logged in",
                Some(json!({ "authenticated": false })),
            ),
        },
        AuthCommands::ChangePassword { current, new } => {
            let current = match current {
                Some(current) => current,
                None => prompt("Current password: ")?,
            };
            let new = match new {
                Some(new) => new,
                None => prompt("New password: ")?,
            };
            auth.change_password(&current, &new).await?;
            output_success(&output_format, "Password changed", None)
        }
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
