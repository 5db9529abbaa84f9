//! HTTP routes.
//!
//! - `GET /health` answers `{"ok": true}`
//! - `GET /events?group=&url=&tz=` runs one fetch-parse-pipeline pass and
//!   answers the upcoming events as a JSON array
//!
//! A request works against a single configuration snapshot from start to
//! finish, even when the file is reloaded concurrently.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use eventfeed_core::{OutputEvent, TimeBaseline, resolve_zone};
use eventfeed_providers::{EventParser, PageFetcher, build_output_events};

use crate::config::ConfigSource;
use crate::error::{ServerError, ServerResult};
use crate::source::resolve_source_url;

/// Source of the current instant.
pub type Clock = fn() -> DateTime<Utc>;

/// State shared by all requests.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigSource>,
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn EventParser>,
    clock: Clock,
}

impl AppState {
    /// Creates the state from its collaborators, using the system clock.
    pub fn new(
        config: ConfigSource,
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn EventParser>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            parser,
            clock: Utc::now,
        }
    }

    /// Builder: replace the clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration source.
    pub fn config(&self) -> &ConfigSource {
        &self.config
    }
}

/// Query parameters of `/events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub group: Option<String>,
    pub url: Option<String>,
    pub tz: Option<String>,
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(events))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> ServerResult<Json<Vec<OutputEvent>>> {
    let config = state.config.snapshot()?;

    let source_url = resolve_source_url(&config, query.group.as_deref(), query.url.as_deref())?;

    let tz_name = query
        .tz
        .as_deref()
        .filter(|tz| !tz.is_empty())
        .unwrap_or(config.default_tz.as_str());
    let tz = resolve_zone(tz_name)?;
    let baseline = TimeBaseline::at(&tz, (state.clock)());

    debug!(url = %source_url, tz = %tz, "Fetching event page");
    let bytes = state.fetcher.fetch(&source_url).await.map_err(|e| {
        warn!(url = %source_url, error = %e, "Fetch failed");
        ServerError::from(e)
    })?;

    let raw_events = state.parser.parse(&bytes).map_err(|e| {
        warn!(url = %source_url, error = %e, "Parse failed");
        ServerError::from(e)
    })?;

    let items = build_output_events(&raw_events, &tz, baseline, &config.event_config);
    info!(
        url = %source_url,
        tz = %tz,
        raw = raw_events.len(),
        events = items.len(),
        "Served events"
    );
    Ok(Json(items))
}
