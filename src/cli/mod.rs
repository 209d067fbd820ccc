pub mod commands;
pub mod config;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "party-console")]
#[command(about = "Party Console - manage rosters, news and media on the content API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List, edit and delete managed entities")]
    Data {
        #[command(subcommand)]
        cmd: commands::data::DataCommands,
    },

    #[command(about = "Upload a file to media storage and print its public URL")]
    Upload {
        #[arg(help = "Path of the file to upload")]
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// API client over the configured addresses and the persisted token
pub fn connect() -> anyhow::Result<ApiClient> {
    let app_config = crate::config::config();
    app_config.validate()?;

    let token_store = config::token_store()?;
    let session = Session::new(token_store).with_login_surface(|| {
        eprintln!("Session expired. Run `party-console auth login <username>` to sign in again.");
    });

    Ok(ApiClient::new(app_config, Arc::new(session)))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = connect()?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, output_format).await,
        Commands::Data { cmd } => commands::data::handle(cmd, client, output_format).await,
        Commands::Upload { path } => commands::upload::handle(path, &client, output_format).await,
    }
}
