//! Provider lookup by name.

use std::fmt;
use std::str::FromStr;

use reqwest::Client;

use crate::error::{Error, Result};
use crate::provider::{Flickr, Instagram, Picasa, Provider};

/// Every provider compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Flickr,
    Instagram,
    Picasa,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Flickr,
        ProviderKind::Instagram,
        ProviderKind::Picasa,
    ];

    /// Name used on the command line and in the configuration file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Flickr => "flickr",
            ProviderKind::Instagram => "instagram",
            ProviderKind::Picasa => "picasa",
        }
    }

    /// Construct an unconfigured provider of this kind.
    pub fn build(self, client: Client) -> Box<dyn Provider> {
        match self {
            ProviderKind::Flickr => Box::new(Flickr::new(client)),
            ProviderKind::Instagram => Box::new(Instagram::new(client)),
            ProviderKind::Picasa => Box::new(Picasa::new(client)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| Error::UnknownProvider(s.to_string()))
    }
}

/// Resolves provider names to fresh provider instances sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct Registry {
    client: Client,
}

impl Registry {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get the provider registered under `name`.
    pub fn get(&self, name: &str) -> Result<Box<dyn Provider>> {
        let kind: ProviderKind = name.parse()?;
        tracing::debug!("Resolved provider '{}'", kind);
        Ok(kind.build(self.client.clone()))
    }

    /// Names of all registered providers.
    pub fn names(&self) -> Vec<&'static str> {
        ProviderKind::ALL.iter().map(|kind| kind.as_str()).collect()
    }
}
