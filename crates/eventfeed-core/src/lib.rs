//! Core types: time baseline, events, override rules, links, formatting

pub mod error;
pub mod event;
pub mod format;
pub mod links;
pub mod rules;
pub mod time;
pub mod tracing;

pub use error::{CoreError, CoreResult};
pub use event::{
    DEFAULT_RULE_KEY, EventConfig, NormalizedEvent, OutputEvent, OverrideRule, RuleEntry,
};
pub use format::{format_time_disp, format_time_iso_wall, format_time_local_hm};
pub use links::{extract_first_url, resolve_link};
pub use rules::pick_rule;
pub use time::{MILLIS_PER_DAY, TimeBaseline, resolve_local, resolve_zone};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
