//! HTTP service exposing upcoming Meetup events as JSON.
//!
//! This crate provides:
//! - TOML configuration with optional reload on every request
//! - Source page selection from `?group=` / `?url=`
//! - The `/events` and `/health` routes
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use eventfeed_providers::{FetchSettings, HttpFetcher, MeetupPageParser};
//! use eventfeed_server::{AppState, ConfigSource, router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigSource::load("config.toml", false)?;
//!     let fetcher = HttpFetcher::new(&FetchSettings::default())?;
//!     let state = AppState::new(config, Arc::new(fetcher), Arc::new(MeetupPageParser::new()));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, router(state)).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod source;

pub use config::{ConfigSource, DEFAULT_CONFIG_PATH, DEFAULT_TZ, FetchConfig, ServiceConfig};
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, Clock, EventsQuery, router};
pub use source::resolve_source_url;
