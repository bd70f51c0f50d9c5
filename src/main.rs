use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use epic_fetch::archive::ImageArchiver;
use epic_fetch::client::EpicImageClient;
use epic_fetch::config::Config;
use epic_fetch::download;
use epic_fetch::image::{ImageFormat, ImageryType};

/// Downloads images from the NASA EPIC (Earth Polychromatic Imaging Camera)
/// API into a local folder tree with one directory per capture date.
#[derive(Parser, Debug)]
#[command(name = "epic-fetch")]
struct Cli {
    /// Root folder for the downloaded images
    image_folder: PathBuf,

    /// Date (YYYY-MM-DD) to download images for; the last available day when
    /// omitted
    date: Option<NaiveDate>,

    /// Imagery type of the images
    #[arg(short = 't', long, value_enum, default_value_t = ImageryType::Natural)]
    imagery_type: ImageryType,

    /// Image format to download
    #[arg(short = 'f', long, value_enum, default_value_t = ImageFormat::Png)]
    image_format: ImageFormat,

    /// TOML file with endpoints and api key; built-in NASA defaults otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a starter config file to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Write a JSON report of the run into the image folder
    #[arg(long)]
    report: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Some(path) = cli.write_config {
        Config::default().write(&path)?;
        tracing::info!(path = %path.display(), "starter config written");
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::read(path)
            .with_context(|| format!("could not read config file {}", path.display()))?,
        None => Config::from_env(),
    };

    fs::create_dir_all(&cli.image_folder).with_context(|| {
        format!(
            "the folder '{}' for storing images could not be created",
            cli.image_folder.display()
        )
    })?;

    let client = EpicImageClient::new(&config.api_root, &config.api_key);
    let archiver = ImageArchiver::new(&config.archive_root);

    let report = download::download_day(
        &client,
        &archiver,
        &cli.image_folder,
        cli.date,
        cli.imagery_type,
        cli.image_format,
    )
    .await
    .context("the images could not be retrieved and stored")?;

    if cli.report {
        report.write(cli.image_folder.join("report.json"))?;
    }

    tracing::info!(
        found = report.found,
        stored = report.stored,
        skipped = report.skipped.len(),
        "done"
    );

    Ok(())
}
