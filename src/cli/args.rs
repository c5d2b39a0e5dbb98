//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{
    parse_key_val, validate_failure_limit, validate_tag, validate_timeout, validate_workers,
    Config,
};
use crate::download::DEFAULT_WORKERS;
use crate::error::Result;
use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Tagged image downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "imgdownloader",
    version,
    about = "Download images with a given tag from image-sharing sites",
    long_about = "Search Flickr, Instagram or Picasa for images with a tag and download them \
                  with a pool of concurrent workers.\n\n\
                  Provider credentials are read from imgdownloader.json in the current or \
                  home directory, or passed with --set key=value."
)]
pub struct Args {
    /// Image tag to search for.
    #[arg(short, long)]
    pub tag: String,

    /// Number of images to download.
    #[arg(short = 'n', long = "count", default_value_t = 10)]
    pub count: usize,

    /// Image provider (flickr, instagram or picasa).
    #[arg(short = 'f', long = "from", default_value = "flickr")]
    pub provider: String,

    /// Directory to store downloaded images in. Created if absent.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Number of workers downloading the images.
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Path to the provider configuration file (JSON or TOML).
    #[arg(short, long, env = "IMGDOWNLOADER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Provider setting overriding the configuration file.
    /// Can be given multiple times.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub settings: Vec<(String, String)>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Cancel the remaining downloads after this many failures (at least 1).
    #[arg(long)]
    pub max_failures: Option<usize>,

    /// Hide the progress bar.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Check argument values that clap cannot express.
    pub fn validate(&self) -> Result<()> {
        validate_tag(&self.tag)?;
        validate_workers(self.workers)?;
        validate_timeout(self.timeout)?;
        if let Some(limit) = self.max_failures {
            validate_failure_limit(limit)?;
        }
        Ok(())
    }

    /// Merge `--set` overrides into the settings of `provider`.
    pub fn merge_into_config(&self, config: &mut Config, provider: &str) {
        for (key, value) in &self.settings {
            config.set(provider, key, value);
        }
    }
}
