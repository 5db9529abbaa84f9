//! Event page fetching, parsing and the normalization pipeline.
//!
//! - [`PageFetcher`] / [`HttpFetcher`] - bounded HTTP retrieval of a page
//! - [`EventParser`] / [`MeetupPageParser`] - page bytes to [`RawEvent`]s
//! - [`normalize_event`] - a raw listing pinned to a time zone
//! - [`build_output_events`] - the full raw-to-output pipeline
//! - [`ProviderError`] - error types for fetching and parsing
//!
//! # Architecture
//!
//! ```text
//!   source URL
//!       │
//!       ▼ PageFetcher::fetch()
//!   page bytes
//!       │
//!       ▼ EventParser::parse()
//!  ┌──────────┐
//!  │ RawEvent │ ...
//!  └────┬─────┘
//!       │ build_output_events(tz, baseline, event_config)
//!       │   normalize_event() -> baseline filter -> link -> rule
//!       ▼
//!  ┌─────────────┐
//!  │ OutputEvent │ ... sorted by timeISO
//!  └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use eventfeed_core::{EventConfig, TimeBaseline};
//! use eventfeed_providers::{
//!     EventParser, FetchSettings, HttpFetcher, MeetupPageParser, PageFetcher,
//!     build_output_events,
//! };
//!
//! let tz = chrono_tz::America::Los_Angeles;
//! let fetcher = HttpFetcher::new(&FetchSettings::default())?;
//! let bytes = fetcher.fetch("https://www.meetup.com/rust-la/events/").await?;
//! let raw = MeetupPageParser::new().parse(&bytes)?;
//! let baseline = TimeBaseline::at(&tz, chrono::Utc::now());
//! let events = build_output_events(&raw, &tz, baseline, &EventConfig::new());
//! ```

pub mod error;
pub mod fetch;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod raw_event;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use fetch::{BoxFuture, FetchSettings, HttpFetcher, PageFetcher};
pub use normalize::{ParsedStart, normalize_event, parse_start_text};
pub use parser::{EventParser, MeetupPageParser};
pub use pipeline::build_output_events;
pub use raw_event::{JsonFields, RawEvent, RawStart};
