//! Override rule selection.
//!
//! Rules are matched by case-insensitive substring against the event title,
//! in declaration order. The first matching key wins, even when a later key
//! would be a longer or earlier-positioned match.

use crate::event::{DEFAULT_RULE_KEY, EventConfig, OverrideRule};

/// Selects the override rule for an event title.
///
/// Starts from the `"default"` rule (or an empty rule when none is
/// configured) and replaces it with the rule of the first non-default key
/// contained in the lowercased title.
pub fn pick_rule(title: &str, config: &EventConfig) -> OverrideRule {
    let title_lc = title.to_lowercase();

    config
        .iter()
        .filter(|(key, _)| *key != DEFAULT_RULE_KEY)
        .find(|(key, _)| title_lc.contains(&key.to_lowercase()))
        .map(|(_, rule)| rule)
        .or_else(|| config.default_rule())
        .cloned()
        .unwrap_or_default()
}
