//! Download module for fetching provider items to disk.
//!
//! This module provides:
//! - The bounded worker pool ([`Downloader`] / [`DownloadBatch`])
//! - Single item fetching with scoped file handling
//! - Per-item outcomes and batch statistics

pub mod fetch;
pub mod outcome;
pub mod pipeline;
pub mod state;

pub use fetch::download_item;
pub use outcome::DownloadOutcome;
pub use pipeline::{DownloadBatch, Downloader, DEFAULT_WORKERS};
pub use state::BatchStats;
