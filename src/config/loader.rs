//! Provider configuration file loading.
//!
//! The file is a JSON object keyed by provider name, each value a flat map of
//! string settings:
//!
//! ```json
//! { "flickr": { "api_key": "..." }, "instagram": { "access_token": "..." } }
//! ```
//!
//! A TOML file with the same shape is accepted when the path ends in `.toml`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{Error, Result};
use crate::provider::ProviderConfig;

/// File stem searched for when no explicit path is given.
pub const CONFIG_FILE_STEM: &str = "imgdownloader";

/// Settings for every provider, as read from the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    providers: HashMap<String, ProviderConfig>,
    source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a JSON or TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let mut config = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid configuration file: {}", e)))?;

        let mut providers = HashMap::with_capacity(raw.len());
        for (name, section) in raw {
            let settings: ProviderConfig = serde_json::from_value(section)
                .map_err(|e| Error::Config(format!("Invalid {} provider config: {}", name, e)))?;
            providers.insert(name, settings);
        }

        Ok(Self {
            providers,
            source: None,
        })
    }

    /// Parse a TOML configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: toml::Table = toml::from_str(content)?;

        let mut providers = HashMap::with_capacity(raw.len());
        for (name, section) in raw {
            let settings: ProviderConfig = section
                .try_into()
                .map_err(|e| Error::Config(format!("Invalid {} provider config: {}", name, e)))?;
            providers.insert(name, settings);
        }

        Ok(Self {
            providers,
            source: None,
        })
    }

    /// Load the explicit path if given, otherwise the first existing default
    /// location. Missing defaults yield an empty configuration.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        for candidate in Self::default_paths() {
            if candidate.is_file() {
                tracing::debug!("Using configuration file {}", candidate.display());
                return Self::load(&candidate);
            }
        }

        tracing::debug!("No configuration file found");
        Ok(Self::default())
    }

    /// Default search locations, in priority order.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(format!("{}.json", CONFIG_FILE_STEM)),
            PathBuf::from(format!("{}.toml", CONFIG_FILE_STEM)),
        ];
        if let Some(dirs) = BaseDirs::new() {
            paths.push(dirs.home_dir().join(format!("{}.json", CONFIG_FILE_STEM)));
        }
        paths
    }

    /// Settings for `provider`. Absent sections yield an empty map.
    pub fn provider(&self, provider: &str) -> ProviderConfig {
        self.providers.get(provider).cloned().unwrap_or_default()
    }

    /// Override a single setting.
    pub fn set(&mut self, provider: &str, key: &str, value: &str) {
        self.providers
            .entry(provider.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// File this configuration was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_json() {
        let config = Config::from_json_str(
            r#"{"flickr": {"api_key": "abc"}, "instagram": {"access_token": "tok"}}"#,
        )
        .unwrap();

        assert_eq!(config.provider("flickr").get("api_key").unwrap(), "abc");
        assert_eq!(config.provider("instagram").get("access_token").unwrap(), "tok");
        assert!(config.provider("picasa").is_empty());
    }

    #[test]
    fn test_non_string_value_names_provider() {
        let err = Config::from_json_str(r#"{"flickr": {"api_key": 42}}"#).unwrap_err();
        match err {
            Error::Config(message) => assert!(message.contains("flickr")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Config::from_json_str("{not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config = Config::from_toml_str("[flickr]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(config.provider("flickr").get("api_key").unwrap(), "abc");
    }

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("conf.json");
        let toml = dir.path().join("conf.toml");
        std::fs::write(&json, r#"{"picasa": {"access_token": "j"}}"#).unwrap();
        std::fs::write(&toml, "[picasa]\naccess_token = \"t\"\n").unwrap();

        let from_json = Config::load(&json).unwrap();
        assert_eq!(from_json.provider("picasa").get("access_token").unwrap(), "j");
        assert_eq!(from_json.source(), Some(json.as_path()));

        let from_toml = Config::load(&toml).unwrap();
        assert_eq!(from_toml.provider("picasa").get("access_token").unwrap(), "t");
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            Config::discover(Some(&missing)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_set_overrides() {
        let mut config = Config::from_json_str(r#"{"flickr": {"api_key": "old"}}"#).unwrap();
        config.set("flickr", "api_key", "new");
        config.set("instagram", "access_token", "tok");

        assert_eq!(config.provider("flickr").get("api_key").unwrap(), "new");
        assert_eq!(config.provider("instagram").get("access_token").unwrap(), "tok");
    }
}
