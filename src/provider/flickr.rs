//! Flickr photo search provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::provider::http::UpstreamClient;
use crate::provider::{
    check_tag, require, Provider, ProviderConfig, ProviderItem, ProviderResponse,
};

/// Flickr REST API base URL.
const API_BASE: &str = "https://api.flickr.com/services/rest";

/// Largest `per_page` value Flickr accepts.
pub const MAX_PER_PAGE: usize = 500;

const NAME: &str = "flickr";

/// Provider backed by `flickr.photos.search`.
pub struct Flickr {
    http: UpstreamClient,
    api_base: String,
    static_base: Option<String>,
    config: ProviderConfig,
}

impl Flickr {
    pub fn new(client: Client) -> Self {
        Self {
            http: UpstreamClient::new(client, NAME),
            api_base: API_BASE.to_string(),
            static_base: None,
            config: ProviderConfig::new(),
        }
    }

    /// Point searches at a different REST endpoint.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Serve photo links from a fixed host instead of `farmN.staticflickr.com`.
    pub fn with_static_base(mut self, base: impl Into<String>) -> Self {
        self.static_base = Some(base.into());
        self
    }

    fn search_url(&self, api_key: &str, tag: &str, per_page: usize, page: usize) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)?;
        url.query_pairs_mut()
            .append_pair("method", "flickr.photos.search")
            .append_pair("format", "json")
            .append_pair("nojsoncallback", "1")
            .append_pair("tags", tag)
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("api_key", api_key);
        Ok(url)
    }

    async fn fetch_page(&self, url: Url) -> Result<FlickrPhotos> {
        let response: FlickrResponse = self.http.get_json(url).await?;

        if response.stat != "ok" {
            return Err(Error::upstream(
                NAME,
                format!(
                    "responded with {}, reason: {}",
                    response.stat,
                    response.message.as_deref().unwrap_or("unknown")
                ),
            ));
        }

        response
            .photos
            .ok_or_else(|| Error::upstream(NAME, "response is missing the photos element"))
    }

    fn photo_link(&self, photo: &FlickrPhoto) -> String {
        match &self.static_base {
            Some(base) => format!(
                "{}/{}/{}_{}.jpg",
                base.trim_end_matches('/'),
                photo.server,
                photo.id,
                photo.secret
            ),
            None => format!(
                "https://farm{}.staticflickr.com/{}/{}_{}.jpg",
                photo.farm, photo.server, photo.id, photo.secret
            ),
        }
    }
}

#[async_trait]
impl Provider for Flickr {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configure(&mut self, config: &ProviderConfig) {
        self.config = config.clone();
    }

    async fn request(&self, tag: &str, n: usize) -> Result<ProviderResponse> {
        check_tag(tag)?;
        let api_key = require(&self.config, NAME, "api_key")?;

        if n == 0 {
            return Ok(Vec::new());
        }

        // per_page stays fixed so page offsets line up across requests
        let per_page = n.min(MAX_PER_PAGE);
        let last_page = n.div_ceil(per_page);
        let mut items = Vec::with_capacity(n);

        for page in 1..=last_page {
            let url = self.search_url(api_key, tag, per_page, page)?;
            let photos = self.fetch_page(url).await?;
            let received = photos.photo.len();

            let remaining = n - items.len();
            items.extend(photos.photo.iter().take(remaining).map(|photo| {
                ProviderItem::new(format!("{}.jpg", photo.id), self.photo_link(photo))
            }));

            tracing::debug!(
                "Flickr page {}/{}: {} photos, {} collected",
                page,
                last_page,
                received,
                items.len()
            );

            let exhausted = received == 0 || photos.pages.is_some_and(|pages| page as u64 >= pages);
            if items.len() >= n || exhausted {
                break;
            }
        }

        tracing::info!("Flickr returned {} photos tagged '{}'", items.len(), tag);
        Ok(items)
    }
}

/// Envelope of a Flickr REST response.
#[derive(Debug, Deserialize)]
struct FlickrResponse {
    photos: Option<FlickrPhotos>,
    #[serde(default)]
    stat: String,
    message: Option<String>,
}

/// One page of search results.
#[derive(Debug, Deserialize)]
struct FlickrPhotos {
    pages: Option<u64>,
    #[serde(default)]
    photo: Vec<FlickrPhoto>,
}

#[derive(Debug, Deserialize)]
struct FlickrPhoto {
    id: String,
    #[serde(default)]
    secret: String,
    #[serde(default)]
    server: String,
    #[serde(default)]
    farm: u32,
}
