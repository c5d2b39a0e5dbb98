//! Picasa Web Albums community search provider.

use async_trait::async_trait;
use md5::{Digest, Md5};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::provider::http::UpstreamClient;
use crate::provider::{check_tag, Provider, ProviderConfig, ProviderItem, ProviderResponse};

/// Picasa community search feed.
const FEED_URL: &str = "https://picasaweb.google.com/data/feed/api/all";

const NAME: &str = "picasa";

/// Provider backed by the Picasa `all` feed. The feed accepts a result count
/// directly, so a single request covers the whole search.
pub struct Picasa {
    http: UpstreamClient,
    feed_url: String,
    config: ProviderConfig,
}

impl Picasa {
    pub fn new(client: Client) -> Self {
        Self {
            http: UpstreamClient::new(client, NAME),
            feed_url: FEED_URL.to_string(),
            config: ProviderConfig::new(),
        }
    }

    /// Point searches at a different feed URL.
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }

    fn search_url(&self, tag: &str, max_results: usize) -> Result<Url> {
        let mut url = Url::parse(&self.feed_url)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("q", tag)
                .append_pair("max-results", &max_results.to_string())
                .append_pair("fields", "entry(id,media:group)")
                .append_pair("alt", "json");
            if let Some(token) = self.config.get("access_token").filter(|t| !t.is_empty()) {
                query.append_pair("access_token", token);
            }
        }
        Ok(url)
    }
}

/// Filename for an entry: the hex MD5 of its stable feed id.
fn entry_filename(entry_id: &str) -> String {
    format!("{:x}.jpg", Md5::digest(entry_id.as_bytes()))
}

#[async_trait]
impl Provider for Picasa {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configure(&mut self, config: &ProviderConfig) {
        self.config = config.clone();
    }

    async fn request(&self, tag: &str, n: usize) -> Result<ProviderResponse> {
        check_tag(tag)?;

        if n == 0 {
            return Ok(Vec::new());
        }

        let url = self.search_url(tag, n)?;
        let response: PicasaResponse = self.http.get_json(url).await?;
        let feed = response
            .feed
            .ok_or_else(|| Error::upstream(NAME, "response is missing the feed element"))?;

        let items: ProviderResponse = feed
            .entry
            .iter()
            .filter_map(|entry| {
                let id = entry.id.as_ref()?;
                let content = entry.media_group.as_ref()?.content.first()?;
                Some(ProviderItem::new(entry_filename(&id.value), content.url.clone()))
            })
            .take(n)
            .collect();

        tracing::info!("Picasa returned {} photos tagged '{}'", items.len(), tag);
        Ok(items)
    }
}

#[derive(Debug, Deserialize)]
struct PicasaResponse {
    feed: Option<PicasaFeed>,
}

#[derive(Debug, Deserialize)]
struct PicasaFeed {
    #[serde(default)]
    entry: Vec<PicasaEntry>,
}

#[derive(Debug, Deserialize)]
struct PicasaEntry {
    id: Option<PicasaText>,
    #[serde(rename = "media$group")]
    media_group: Option<PicasaMediaGroup>,
}

#[derive(Debug, Deserialize)]
struct PicasaText {
    #[serde(rename = "$t")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct PicasaMediaGroup {
    #[serde(rename = "media$content", default)]
    content: Vec<PicasaMediaContent>,
}

#[derive(Debug, Deserialize)]
struct PicasaMediaContent {
    url: String,
}
