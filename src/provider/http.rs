//! Shared HTTP plumbing for provider search APIs.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of response bytes echoed into parse errors.
const ERROR_BODY_PREVIEW: usize = 500;

/// Build the HTTP client shared by providers and download workers.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("imgdownloader/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// HTTP client bound to one provider, mapping every failure to
/// [`Error::Upstream`].
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    provider: &'static str,
}

impl UpstreamClient {
    pub fn new(client: Client, provider: &'static str) -> Self {
        Self { client, provider }
    }

    /// GET `url` and decode the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(provider = self.provider, "GET {}", redact(&url));

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.error(format!("request to {} failed: {}", redact(&url), e)))?;

        let status = response.status();
        tracing::debug!(provider = self.provider, "Response status: {}", status);

        if !status.is_success() {
            return Err(self.error(format!("{} returned HTTP {}", redact(&url), status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.error(format!("failed to read response body: {}", e)))?;

        serde_json::from_str(&text).map_err(|e| {
            self.error(format!(
                "failed to parse response: {} - Response: {}",
                e,
                &text[..floor_char_boundary(&text, ERROR_BODY_PREVIEW)]
            ))
        })
    }

    fn error(&self, message: String) -> Error {
        Error::upstream(self.provider, message)
    }
}

/// Strip credentials from a URL before it is logged or surfaced in errors.
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "api_key" || k == "access_token" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    if pairs.is_empty() {
        return clean.to_string();
    }

    clean.query_pairs_mut().clear().extend_pairs(pairs);
    clean.to_string()
}

fn floor_char_boundary(text: &str, max: usize) -> usize {
    if text.len() <= max {
        return text.len();
    }
    let mut idx = max;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Payload {
        value: u32,
    }

    fn client() -> UpstreamClient {
        UpstreamClient::new(build_client(Duration::from_secs(5)).unwrap(), "test")
    }

    #[test]
    fn test_redact_hides_credentials() {
        let url = Url::parse("https://example.com/api?tags=cat&api_key=secret&access_token=tok")
            .unwrap();
        let redacted = redact(&url);
        assert!(!redacted.contains("secret"));
        assert!(!redacted.contains("=tok"));
        assert!(redacted.contains("tags=cat"));
    }

    #[test]
    fn test_floor_char_boundary() {
        assert_eq!(floor_char_boundary("abc", 10), 3);
        // 'é' is two bytes; index 2 falls inside it
        assert_eq!(floor_char_boundary("aé", 2), 1);
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"value": 7}"#))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/ok", server.uri())).unwrap();
        let payload: Payload = client().get_json(url).await.unwrap();
        assert_eq!(payload.value, 7);
    }

    #[tokio::test]
    async fn test_get_json_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/down", server.uri())).unwrap();
        let result: Result<Payload> = client().get_json(url).await;
        match result {
            Err(Error::Upstream { provider, message }) => {
                assert_eq!(provider, "test");
                assert!(message.contains("503"));
            }
            other => panic!("Expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_json_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/bad", server.uri())).unwrap();
        let result: Result<Payload> = client().get_json(url).await;
        assert!(matches!(result, Err(Error::Upstream { .. })));
    }
}
