//! Source page selection.

use crate::config::ServiceConfig;
use crate::error::{ServerError, ServerResult};

/// Picks the page URL for a request.
///
/// An explicit `url` wins. Otherwise `group` is looked up in the configured
/// groups. With neither, a configuration holding exactly one group uses it.
/// Empty strings count as absent.
pub fn resolve_source_url(
    config: &ServiceConfig,
    group: Option<&str>,
    url: Option<&str>,
) -> ServerResult<String> {
    if let Some(url) = url.filter(|u| !u.is_empty()) {
        return Ok(url.to_string());
    }

    if let Some(group) = group.filter(|g| !g.is_empty()) {
        return config
            .meetup_groups
            .get(group)
            .filter(|u| !u.is_empty())
            .cloned()
            .ok_or_else(|| {
                ServerError::unknown_group(group, config.meetup_groups.keys().cloned())
            });
    }

    match config.meetup_groups.values().next() {
        Some(only) if config.meetup_groups.len() == 1 => Ok(only.clone()),
        _ => Err(ServerError::MissingSource),
    }
}
