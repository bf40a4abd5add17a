//! Setting-name rules shared by both conversion directions.
use serde_json::Value;

/// A setting whose name is not derived mechanically from the other side's name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rename {
    /// The snake_case name of the setting in Grafana.
    pub grafana: &'static str,
    /// The name of the setting in a native Alertmanager.
    pub native: &'static str,
}

/// Irregular setting names. Applied in both directions.
pub const RENAMES: &[Rename] = &[Rename {
    grafana: "og_priority",
    native: "priority",
}];

/// Settings that only exist in Grafana, in both camelCase and snake_case forms.
///
/// These are dropped when converting to a native Alertmanager and never produced
/// in the other direction.
pub const GRAFANA_ONLY_SETTINGS: [&str; 4] = [
    "overridePriority",
    "override_priority",
    "sendTagsAs",
    "send_tags_as",
];

/// Returns true if the setting has no native Alertmanager equivalent.
pub fn is_grafana_only_setting(key: &str) -> bool {
    GRAFANA_ONLY_SETTINGS.contains(&key)
}

/// The native name of a snake_cased Grafana setting.
pub(crate) fn native_name(snake_key: &str) -> &str {
    RENAMES
        .iter()
        .find(|r| r.grafana == snake_key)
        .map_or(snake_key, |r| r.native)
}

/// The Grafana name of a native setting, if it is renamed.
pub(crate) fn grafana_name(native_key: &str) -> Option<&'static str> {
    RENAMES
        .iter()
        .find(|r| r.native == native_key)
        .map(|r| r.grafana)
}

/// `false` booleans are Grafana defaults and are not sent to native Alertmanagers.
pub(crate) fn is_suppressed_default(value: &Value) -> bool {
    matches!(value, Value::Bool(false))
}
