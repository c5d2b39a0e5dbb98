//! imgdownloader - download tagged images from image-sharing sites.
//!
//! This library searches a pluggable image provider for a tag and downloads
//! the results with a bounded pool of concurrent workers.
//!
//! # Features
//!
//! - Flickr, Instagram and Picasa providers behind one [`Provider`] contract
//! - Transparent upstream pagination bounded by the requested count
//! - Fixed-size download worker pool with per-item failure isolation
//! - Per-request timeouts and batch cancellation
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use imgdownloader::{build_client, Config, Downloader, Registry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = build_client(Duration::from_secs(30))?;
//!     let registry = Registry::new(client.clone());
//!
//!     let mut provider = registry.get("flickr")?;
//!     let config = Config::discover(None)?;
//!     provider.configure(&config.provider("flickr"));
//!
//!     let items = provider.request("sunset", 10).await?;
//!     let downloader = Downloader::new(client, "pictures", 4)?;
//!     for outcome in downloader.run(items).await {
//!         println!("{}", outcome);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod provider;

// Re-exports for convenience
pub use config::Config;
pub use download::{BatchStats, DownloadBatch, DownloadOutcome, Downloader};
pub use error::{Error, Result};
pub use provider::{
    build_client, Provider, ProviderConfig, ProviderItem, ProviderKind, ProviderResponse,
    Registry,
};
