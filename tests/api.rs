use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use event_scrape::scraping::diagnostics::{Diagnostic, Diagnostics};
use event_scrape::scraping::fetch::{FetchError, PageFetcher, RetryPolicy};
use event_scrape::scraping::{self, batumi_fun_html};
use event_scrape::server::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

struct Quiet;

impl Diagnostics for Quiet {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Serves `pages` for the given urls and 404 for everything else.
struct Fixture {
    pages: HashMap<String, String>,
}

#[async_trait]
impl PageFetcher for Fixture {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn batumi_page(titles: &[&str]) -> String {
    let rows = titles
        .iter()
        .map(|title| {
            format!(
                r#"<div class="tribe-events-calendar-list__event-row">
                    <time class="tribe-events-calendar-list__event-datetime" datetime="2024-05-01">May 1 @ 19:30</time>
                    <h3 class="tribe-events-calendar-list__event-title"><a href="https://batumi.fun/event/{title}/">{title}</a></h3>
                </div>"#
            )
        })
        .collect::<String>();
    format!(r#"<html><body><header class="tribe-events-header"></header>{rows}</body></html>"#)
}

fn app(pages: HashMap<String, String>) -> axum::Router {
    build_router(AppState {
        fetcher: Arc::new(Fixture { pages }),
        diagnostics: Arc::new(Quiet),
        retry: RetryPolicy::none(),
        sites: Arc::new(scraping::active_sites()),
    })
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn site_endpoint_returns_success_envelope() {
    let profile = batumi_fun_html::profile();
    let mut pages = HashMap::new();
    pages.insert(profile.page_url(1).unwrap(), batumi_page(&["alpha", "beta"]));
    pages.insert(profile.page_url(2).unwrap(), batumi_page(&["gamma"]));
    pages.insert(profile.page_url(3).unwrap(), batumi_page(&[]));

    let (status, body) = get_json(app(pages), "/api/standalone/batumifun").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let data = body["data"].as_array().unwrap();
    let titles = data
        .iter()
        .map(|event| event["title"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["alpha", "beta", "gamma"]);
    assert_eq!(data[0]["type"], "parsed_v1");
    assert_eq!(data[0]["parserName"], "batumi.fun");
    assert_eq!(data[0]["occursAt"], 1_714_577_400);
    assert_eq!(data[0]["url"], "https://batumi.fun/event/alpha/");
    assert!(data[0]["id"].is_null());
    assert!(data[0]["description"].is_null());
    assert_eq!(data[0]["timezone"]["timezoneName"], "GET");
}

#[tokio::test]
async fn unreachable_site_still_succeeds_with_no_events() {
    let (status, body) = get_json(app(HashMap::new()), "/api/standalone/belgrad_consult_com").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"], Value::Array(Vec::new()));
}

#[tokio::test]
async fn lists_registered_sites() {
    let (status, body) = get_json(app(HashMap::new()), "/api/standalone").await;

    assert_eq!(status, StatusCode::OK);
    let routes = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|site| site["route"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(routes, vec!["batumifun", "belgrad_consult_com"]);
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get_json(app(HashMap::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_site_is_not_found() {
    let response = app(HashMap::new())
        .oneshot(
            Request::builder()
                .uri("/api/standalone/nowhere")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
