//! Local catalog server.
//!
//! Serves a directory containing a generated STAC tree so it can be opened in
//! an online STAC browser, and prints the URL of every item and collection.

mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "catalog-server")]
#[command(about = "Serve a generated STAC catalog with CORS enabled")]
struct Args {
    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(long, env = "CATALOG_PORT", default_value = "9002")]
    port: u16,

    /// Directory to serve; items are listed from its stac-generated folder
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
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
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    println!(
        "Paste the following URLs into the STAC browser (https://radiantearth.github.io/stac-browser/#/):"
    );
    for url in server::catalog_urls(&args.root, &args.host, args.port) {
        println!("\t{}", url);
    }

    server::run_server(args.root, &args.host, args.port)
        .await
        .context("Catalog server failed")
}
