//! Image providers.
//!
//! This module provides:
//! - The [`Provider`] contract every image source implements
//! - Flickr, Instagram and Picasa implementations
//! - A name-keyed [`Registry`] resolving a provider string to an instance
//! - The shared upstream HTTP helper

pub mod flickr;
pub mod http;
pub mod instagram;
pub mod picasa;
pub mod registry;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Error, Result};

pub use flickr::Flickr;
pub use http::{build_client, UpstreamClient, DEFAULT_TIMEOUT_SECS};
pub use instagram::Instagram;
pub use picasa::Picasa;
pub use registry::{ProviderKind, Registry};

/// Flat provider settings such as `api_key` or `access_token`.
pub type ProviderConfig = HashMap<String, String>;

/// Result of a provider request, at most `n` items long.
pub type ProviderResponse = Vec<ProviderItem>;

/// A single image link together with the filename it is stored under locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderItem {
    /// Local filename, relative to the output directory.
    pub filename: String,

    /// Fully-qualified remote URL.
    pub link: String,
}

impl ProviderItem {
    pub fn new(filename: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            link: link.into(),
        }
    }
}

/// A source that can be asked for links to images tagged with a string.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Registry name of this provider.
    fn name(&self) -> &'static str;

    /// Store settings for subsequent requests. The last call wins.
    fn configure(&mut self, config: &ProviderConfig);

    /// Request up to `n` image links tagged with `tag`.
    ///
    /// Pages through the upstream API until `n` items are collected or the
    /// upstream runs out. A failure on any page fails the whole request.
    async fn request(&self, tag: &str, n: usize) -> Result<ProviderResponse>;
}

/// Look up a required setting, failing with [`Error::MissingConfig`].
pub(crate) fn require<'a>(
    config: &'a ProviderConfig,
    provider: &str,
    key: &str,
) -> Result<&'a str> {
    match config.get(key).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingConfig(format!("{}.{}", provider, key))),
    }
}

/// Reject empty search tags before any request is made.
pub(crate) fn check_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "tag".to_string(),
            message: "Tag must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present() {
        let mut config = ProviderConfig::new();
        config.insert("api_key".into(), "abc".into());
        assert_eq!(require(&config, "flickr", "api_key").unwrap(), "abc");
    }

    #[test]
    fn test_require_missing_or_blank() {
        let mut config = ProviderConfig::new();
        assert!(matches!(
            require(&config, "flickr", "api_key"),
            Err(Error::MissingConfig(key)) if key == "flickr.api_key"
        ));

        config.insert("api_key".into(), "   ".into());
        assert!(require(&config, "flickr", "api_key").is_err());
    }

    #[test]
    fn test_check_tag() {
        assert!(check_tag("sunset").is_ok());
        assert!(check_tag("").is_err());
        assert!(check_tag("  ").is_err());
    }
}
