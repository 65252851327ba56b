//! STAC upload tool.
//!
//! Publishes generated collections and items to a STAC API that implements
//! the transaction extension, or queries what is already there.

mod auth;
mod client;
mod ops;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use auth::Credentials;
use client::{http_client, StacClient};

#[derive(Parser, Debug)]
#[command(name = "stac-upload")]
#[command(about = "Add, modify or remove STAC collections and items on a STAC API")]
struct Args {
    /// Root URL of the STAC API (keep the trailing slash)
    #[arg(long, env = "STAC_API_URL")]
    url: String,

    #[arg(long, env = "STAC_BASICAUTH_USERNAME")]
    basicauth_username: Option<String>,

    #[arg(long, env = "STAC_BASICAUTH_PASSWORD", hide_env_values = true)]
    basicauth_password: Option<String>,

    /// Token endpoint for the OAuth2 client-credentials grant
    #[arg(long, env = "STAC_OAUTH2_TOKENURL")]
    oauth2_tokenurl: Option<String>,

    #[arg(long, env = "STAC_OAUTH2_CLIENTID")]
    oauth2_clientid: Option<String>,

    #[arg(long, env = "STAC_OAUTH2_CLIENTSECRET", hide_env_values = true)]
    oauth2_clientsecret: Option<String>,

    /// Collection file to POST
    #[arg(long)]
    add_collection: Option<PathBuf>,

    /// Collection file to PUT over the existing record
    #[arg(long)]
    modify_collection: Option<PathBuf>,

    /// Collection file whose id should be deleted
    #[arg(long)]
    remove_collection: Option<PathBuf>,

    /// Collection id to fetch
    #[arg(long)]
    get_collection: Option<String>,

    /// Collection id whose items should be counted
    #[arg(long)]
    get_items: Option<String>,

    /// Item files to POST, in order
    #[arg(long, num_args = 1..)]
    add_items: Vec<PathBuf>,

    /// Item files to delete, in order
    #[arg(long, num_args = 1..)]
    remove_items: Vec<PathBuf>,

    #[arg(long)]
    list_collections: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn credentials(&self) -> Result<Credentials> {
        Credentials::select(
            self.basicauth_username.as_deref(),
            self.basicauth_password.as_deref(),
            self.oauth2_tokenurl.as_deref(),
            self.oauth2_clientid.as_deref(),
            self.oauth2_clientsecret.as_deref(),
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let http = http_client()?;
    let auth = args.credentials()?.authorize(&http).await?;
    let client = StacClient::new(http, &args.url, auth)?;
    info!(url = %client.base(), "Connected");

    // A failed request is reported on stdout and in the log; the exit code
    // stays zero.
    if let Some(path) = &args.remove_collection {
        ops::remove_collection(&client, path).await?;
    }

    if let Some(path) = &args.add_collection {
        ops::add_collection(&client, path).await?;
    }

    if let Some(path) = &args.modify_collection {
        ops::modify_collection(&client, path).await?;
    }

    if let Some(id) = &args.get_collection {
        ops::get_collection(&client, id).await?;
    }

    if let Some(id) = &args.get_items {
        if let Some(count) = ops::count_items(&client, id).await? {
            println!("{}", count);
        }
    }

    if !args.remove_items.is_empty() && !ops::remove_items(&client, &args.remove_items).await? {
        println!("remove_items failed");
    }

    if !args.add_items.is_empty() && !ops::add_items(&client, &args.add_items).await? {
        println!("add_items failed");
    }

    if args.list_collections {
        ops::list_collections(&client).await?;
    }

    Ok(())
}
