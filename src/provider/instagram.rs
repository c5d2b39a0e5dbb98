//! Instagram tag media provider.
//!
//! A search first resolves the tag to the set of matching tag names, then
//! walks each tag's recent media with the `max_tag_id` cursor until enough
//! images are collected.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::provider::http::UpstreamClient;
use crate::provider::{
    check_tag, require, Provider, ProviderConfig, ProviderItem, ProviderResponse,
};

/// Instagram API base URL.
const API_BASE: &str = "https://api.instagram.com/v1";

const NAME: &str = "instagram";

/// Provider backed by the Instagram tag endpoints.
pub struct Instagram {
    http: UpstreamClient,
    api_base: String,
    config: ProviderConfig,
}

impl Instagram {
    pub fn new(client: Client) -> Self {
        Self {
            http: UpstreamClient::new(client, NAME),
            api_base: API_BASE.to_string(),
            config: ProviderConfig::new(),
        }
    }

    /// Point requests at a different API root.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid Instagram API base: {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve `tag` to the names of matching tags.
    async fn search_tags(&self, token: &str, tag: &str) -> Result<Vec<TagInfo>> {
        let mut url = self.endpoint(&["tags", "search"])?;
        url.query_pairs_mut()
            .append_pair("q", tag)
            .append_pair("access_token", token);

        let response: Envelope<Vec<TagInfo>> = self.http.get_json(url).await?;
        response.meta.check()?;
        Ok(response.data)
    }

    /// Fetch one page of recent media for a tag.
    async fn fetch_recent(
        &self,
        token: &str,
        tag_name: &str,
        cursor: Option<&str>,
    ) -> Result<Envelope<Vec<Media>>> {
        let mut url = self.endpoint(&["tags", tag_name, "media", "recent"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("access_token", token);
            if let Some(cursor) = cursor {
                query.append_pair("max_tag_id", cursor);
            }
        }

        let response: Envelope<Vec<Media>> = self.http.get_json(url).await?;
        response.meta.check()?;
        Ok(response)
    }
}

#[async_trait]
impl Provider for Instagram {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configure(&mut self, config: &ProviderConfig) {
        self.config = config.clone();
    }

    async fn request(&self, tag: &str, n: usize) -> Result<ProviderResponse> {
        check_tag(tag)?;
        let token = require(&self.config, NAME, "access_token")?;

        if n == 0 {
            return Ok(Vec::new());
        }

        let tags = self.search_tags(token, tag).await?;
        tracing::debug!("Instagram matched {} tags for '{}'", tags.len(), tag);

        let mut items = Vec::with_capacity(n);
        let mut seen = HashSet::new();

        'tags: for matched in &tags {
            let mut cursor: Option<String> = None;

            loop {
                let page = self.fetch_recent(token, &matched.name, cursor.as_deref()).await?;
                let received = page.data.len();

                for media in page.data {
                    if media.kind != "image" || !seen.insert(media.id.clone()) {
                        continue;
                    }
                    let Some(link) = media.standard_url() else {
                        continue;
                    };
                    items.push(ProviderItem::new(format!("{}.jpg", media.id), link));
                    if items.len() >= n {
                        break 'tags;
                    }
                }

                tracing::debug!(
                    "Instagram tag '{}': {} media on page, {} collected",
                    matched.name,
                    received,
                    items.len()
                );

                let next = page.pagination.and_then(|p| p.next_max_tag_id);
                match next {
                    Some(next) if received > 0 && cursor.as_deref() != Some(next.as_str()) => {
                        cursor = Some(next);
                    }
                    _ => break,
                }
            }
        }

        tracing::info!("Instagram returned {} images tagged '{}'", items.len(), tag);
        Ok(items)
    }
}

/// Common response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    meta: Meta,
    #[serde(default)]
    pagination: Option<Pagination>,
    data: T,
}

#[derive(Debug, Deserialize)]
struct Meta {
    code: u16,
    error_type: Option<String>,
    error_message: Option<String>,
}

impl Meta {
    fn check(&self) -> Result<()> {
        if self.code == 200 {
            return Ok(());
        }
        Err(Error::upstream(
            NAME,
            format!(
                "responded with code {} ({}): {}",
                self.code,
                self.error_type.as_deref().unwrap_or("unknown"),
                self.error_message.as_deref().unwrap_or("no message")
            ),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next_max_tag_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Media {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    images: Option<Images>,
}

impl Media {
    fn standard_url(&self) -> Option<String> {
        self.images
            .as_ref()?
            .standard_resolution
            .as_ref()
            .map(|image| image.url.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Images {
    standard_resolution: Option<Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}
