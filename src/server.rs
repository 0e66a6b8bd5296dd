//! Read-only JSON API, one endpoint per registered site.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::models::Envelope;
use crate::scraping::diagnostics::Diagnostics;
use crate::scraping::fetch::{PageFetcher, RetryPolicy};
use crate::scraping::pipeline::Pipeline;
use crate::scraping::profile::SiteProfile;
use crate::scraping::SiteInfo;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    pub diagnostics: Arc<dyn Diagnostics>,
    pub retry: RetryPolicy,
    pub sites: Arc<Vec<SiteProfile>>,
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/standalone", get(list_sites_handler));

    for site in state.sites.iter() {
        let path = format!("/api/standalone/{}", site.route);
        let profile = site.clone();
        router = router.route(
            &path,
            get(move |State(state): State<AppState>| {
                let profile = profile.clone();
                async move { site_events(state, profile).await }
            }),
        );
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_sites_handler(State(state): State<AppState>) -> Json<Envelope<Vec<SiteInfo>>> {
    Json(Envelope::success(
        state.sites.iter().map(SiteInfo::from).collect(),
    ))
}

/// Runs the site's pipeline to completion. Field and page failures are
/// already folded into the records, so only pipeline errors reach the caller.
async fn site_events(state: AppState, profile: SiteProfile) -> Response {
    let result = Pipeline::new(&profile, state.fetcher.as_ref(), state.diagnostics.as_ref())
        .with_retry(state.retry)
        .run()
        .await;

    match result {
        Ok(events) => {
            tracing::info!(site = profile.id, events = events.len(), "Serving events");
            (StatusCode::OK, Json(Envelope::success(events))).into_response()
        }
        Err(err) => {
            tracing::error!(site = profile.id, error = %err, "Scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope::<()>::error(err.to_string())),
            )
                .into_response()
        }
    }
}
