//! End-to-end runs against stub upstreams: provider search followed by the
//! download pipeline.

use std::time::Duration;

use imgdownloader::provider::Flickr;
use imgdownloader::{build_client, Downloader, Error, Provider, ProviderConfig, Registry};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn flickr_config() -> ProviderConfig {
    let mut config = ProviderConfig::new();
    config.insert("api_key".into(), "test-key".into());
    config
}

#[tokio::test]
async fn test_sunset_scenario_downloads_three_files() {
    let api = MockServer::start().await;
    let images = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("tags", "sunset"))
        .and(query_param("per_page", "3"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "photos": {
                "page": 1,
                "pages": 1,
                "perpage": 3,
                "total": "3",
                "photo": [
                    { "id": "101", "secret": "a", "server": "s1", "farm": 1 },
                    { "id": "102", "secret": "b", "server": "s1", "farm": 1 },
                    { "id": "103", "secret": "c", "server": "s2", "farm": 1 }
                ]
            },
            "stat": "ok"
        })))
        .expect(1)
        .mount(&api)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/s[12]/10[123]_[abc]\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xFF\xD8\xFFjpeg".to_vec()))
        .expect(3)
        .mount(&images)
        .await;

    let client = build_client(Duration::from_secs(5)).unwrap();
    let mut flickr = Flickr::new(client.clone())
        .with_api_base(api.uri())
        .with_static_base(images.uri());
    flickr.configure(&flickr_config());

    let items = flickr.request("sunset", 3).await.unwrap();
    assert_eq!(items.len(), 3);

    let out = TempDir::new().unwrap();
    let downloader = Downloader::new(client, out.path(), 2).unwrap();
    let outcomes = downloader.run(items).await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.is_success()));
    for id in ["101", "102", "103"] {
        let file = out.path().join(format!("{}.jpg", id));
        assert_eq!(std::fs::read(file).unwrap(), b"\xFF\xD8\xFFjpeg");
    }
}

#[tokio::test]
async fn test_unknown_provider_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = Registry::new(build_client(Duration::from_secs(5)).unwrap());
    assert!(matches!(
        registry.get("unknown"),
        Err(Error::UnknownProvider(_))
    ));
}

#[tokio::test]
async fn test_upstream_error_returns_no_items() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&api)
        .await;

    let client = build_client(Duration::from_secs(5)).unwrap();
    let mut flickr = Flickr::new(client).with_api_base(api.uri());
    flickr.configure(&flickr_config());

    let result = flickr.request("sunset", 3).await;
    assert!(matches!(result, Err(Error::Upstream { .. })));
}

#[tokio::test]
async fn test_partial_failures_are_reported_per_item() {
    let images = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&images)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.jpg"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&images)
        .await;

    let items = vec![
        imgdownloader::ProviderItem::new("ok.jpg", format!("{}/ok.jpg", images.uri())),
        imgdownloader::ProviderItem::new("gone.jpg", format!("{}/gone.jpg", images.uri())),
    ];

    let out = TempDir::new().unwrap();
    let client = build_client(Duration::from_secs(5)).unwrap();
    let downloader = Downloader::new(client, out.path(), 2).unwrap();
    let mut batch = downloader.start(items);

    let mut successes = 0;
    let mut failures = 0;
    while let Some(outcome) = batch.next().await {
        if outcome.is_success() {
            successes += 1;
        } else {
            failures += 1;
        }
    }

    assert_eq!((successes, failures), (1, 1));
    assert!(out.path().join("ok.jpg").exists());
    assert!(!out.path().join("gone.jpg").exists());
}
