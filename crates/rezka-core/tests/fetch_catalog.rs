//! End-to-end tests against a mock CDN-lookup endpoint.

use rezka_core::client::CDN_SERIES_PATH;
use rezka_core::{ClientConfig, RezkaError, RezkaScraper};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EPISODES_HTML: &str = r##"<ul class="b-simple_episodes__list clearfix" id="simple-episodes-list-1">
    <li class="b-simple_episode__item" data-id="1" data-season_id="1" data-episode_id="2" data-cdn_url="#h1-2">Episode 2</li>
    <li class="b-simple_episode__item" data-id="1" data-season_id="1" data-episode_id="1" data-cdn_url="null">Episode 1</li>
    <li class="b-simple_episode__item" data-id="1" data-season_id="0" data-episode_id="5" data-cdn_url="#h0-5">Placeholder</li>
</ul>
<ul class="b-simple_episodes__list clearfix" id="simple-episodes-list-3">
    <li class="b-simple_episode__item" data-id="1" data-season_id="3" data-episode_id="1" data-cdn_url="">Episode 1</li>
</ul>"##;

fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        requests_per_second: 100.0,
        retry_delay_ms: 10,
        max_retries: 2,
        timeout_secs: 5,
        ..ClientConfig::with_base_url(server.uri())
    }
}

#[tokio::test]
async fn test_get_catalog_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(body_string_contains("id=646"))
        .and(body_string_contains("translator_id=56"))
        .and(body_string_contains("action=get_episodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "",
            "episodes": EPISODES_HTML,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = RezkaScraper::with_config(test_config(&server)).unwrap();
    let catalog = scraper.get_catalog("646", "56").await.unwrap();

    assert_eq!(catalog.list_seasons(), vec![1, 3]);
    assert_eq!(catalog.list_episodes(1), vec![1, 2]);
    assert!(catalog.list_episodes(0).is_empty());
    assert_eq!(catalog.stream(1, 1).unwrap().url, "");
    assert_eq!(catalog.stream(1, 2).unwrap().url, "#h1-2");
    assert_eq!(catalog.stream(3, 1).unwrap().url, "");
}

#[tokio::test]
async fn test_get_catalog_remote_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "bad id",
        })))
        .mount(&server)
        .await;

    let scraper = RezkaScraper::with_config(test_config(&server)).unwrap();
    let error = scraper.get_catalog("0", "56").await.unwrap_err();

    assert!(matches!(error, RezkaError::RemoteRejection(_)));
    assert!(error.to_string().contains("bad id"));
}

#[tokio::test]
async fn test_get_catalog_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    let scraper = RezkaScraper::with_config(test_config(&server)).unwrap();
    let error = scraper.get_catalog("646", "56").await.unwrap_err();

    assert!(matches!(error, RezkaError::Decode(_)));
    assert!(error.is_transport());
}

#[tokio::test]
async fn test_get_catalog_invalid_utf8_body() {
    let server = MockServer::start().await;

    let mut body = br##"{"success":true,"message":"","episodes":"<ul class=\"b-simple_episodes__list\"><li class=\"b-simple_episode__item\" data-season_id=\"1\" data-episode_id=\"1\" data-cdn_url=\"#h"##.to_vec();
    body.push(0xFF);
    body.extend_from_slice(br##"\"></li></ul>"}"##);

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let scraper = RezkaScraper::with_config(test_config(&server)).unwrap();
    let result = scraper.get_catalog("646", "56").await;

    assert!(matches!(result, Err(RezkaError::MalformedDocument(_))));
}

#[tokio::test]
async fn test_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "",
            "episodes": EPISODES_HTML,
        })))
        .mount(&server)
        .await;

    let scraper = RezkaScraper::with_config(test_config(&server)).unwrap();
    let catalog = scraper.get_catalog("646", "56").await.unwrap();

    assert_eq!(catalog.len(), 3);
}

#[tokio::test]
async fn test_rate_limited_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let scraper = RezkaScraper::with_config(test_config(&server)).unwrap();
    let result = scraper.get_catalog("646", "56").await;

    assert!(matches!(result, Err(RezkaError::RateLimited)));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = RezkaScraper::with_config(test_config(&server)).unwrap();
    let result = scraper.get_catalog("646", "56").await;

    assert!(matches!(result, Err(RezkaError::NotFound(_))));
}

#[tokio::test]
async fn test_forbidden_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CDN_SERIES_PATH))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = RezkaScraper::with_config(test_config(&server)).unwrap();
    let result = scraper.get_catalog("646", "56").await;

    assert!(matches!(result, Err(RezkaError::Http(_))));
}
