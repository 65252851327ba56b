//! NetCDF to STAC converter.
//!
//! Inspects each matching NetCDF4 file, writes one STAC item per file (with
//! optional kerchunk reference and thumbnail side files) and rewrites the
//! collection record with the accumulated extent.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ingestion::{ConvertOptions, Converter, ConverterConfig};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "netcdf2stac")]
#[command(about = "Generate STAC item records from NetCDF4 datasets")]
struct Args {
    /// Folder to write STAC items to
    #[arg(long, default_value = ".")]
    base_folder: PathBuf,

    /// Path(s) or glob pattern(s) of the NetCDF4 file(s)
    #[arg(long, num_args = 1.., required = true)]
    input_paths: Vec<String>,

    /// File name of the collection record, relative to the base folder
    #[arg(long, default_value = "collection.json")]
    collection_filename: String,

    /// Folder for storing items; may use {year}, {month} and {day}
    #[arg(long, default_value = "items")]
    item_subfolder: String,

    /// JSON configuration file(s), merged in order
    #[arg(long, num_args = 1.., required = true)]
    config_paths: Vec<PathBuf>,

    /// Generate a kerchunk reference file for each item
    #[arg(long)]
    include_kerchunk: bool,

    /// Inline the kerchunk references into each item as a data URI
    /// (only with --include-kerchunk)
    #[arg(long)]
    inline_kerchunk: bool,

    /// Generate a thumbnail image for each item
    #[arg(long)]
    include_thumbnails: bool,

    /// Do not add an asset pointing at the NetCDF file itself
    #[arg(long)]
    no_netcdf_assets: bool,

    /// Overwrite item/kerchunk files if they already exist
    #[arg(long)]
    overwrite_items: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            base_folder: self.base_folder.clone(),
            input_paths: self.input_paths.clone(),
            collection_filename: self.collection_filename.clone(),
            item_subfolder: self.item_subfolder.clone(),
            generate_kerchunk_assets: self.include_kerchunk,
            inline_kerchunk: self.inline_kerchunk,
            generate_netcdf_assets: !self.no_netcdf_assets,
            generate_thumbnail_assets: self.include_thumbnails,
            overwrite_items: self.overwrite_items,
        }
    }
}

fn main() -> Result<()> {
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

    if args.inline_kerchunk && !args.include_kerchunk {
        warn!("--inline-kerchunk has no effect without --include-kerchunk");
    }

    let config = ConverterConfig::from_paths(&args.config_paths).with_context(|| {
        format!("Failed to load configuration from {:?}", args.config_paths)
    })?;
    info!(
        variable = %config.variable,
        dataset_id = %config.dataset_id,
        "Loaded configuration"
    );

    let converter = Converter::new(args.options(), config).context("Failed to prepare converter")?;
    let summary = converter.run().context("Conversion failed")?;

    match &summary.collection_path {
        Some(path) => info!(
            written = summary.written.len(),
            skipped = summary.skipped.len(),
            collection = %path.display(),
            "Done"
        ),
        None => info!(
            written = summary.written.len(),
            skipped = summary.skipped.len(),
            "Done, no collection written"
        ),
    }

    Ok(())
}
