//! Conversion between embedded contact points and native receiver configs.
use heck::{ToLowerCamelCase, ToSnakeCase};
use serde_json::{Map, Value};

use super::{
    fields::{grafana_name, is_grafana_only_setting, is_suppressed_default, native_name},
    EmbeddedContactPoint, NotifierType,
};
use crate::error::{json_kind, Error, Result};

const SEND_RESOLVED: &str = "send_resolved";

/// One integration of a native Alertmanager receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeReceiverConfig {
    /// The receiver key listing integrations of this type, e.g. `opsgenie_configs`.
    pub config_key: String,
    /// The snake_case settings of the integration, including `send_resolved`.
    pub settings: Map<String, Value>,
}

/// The Grafana notifier type for a native receiver config key.
///
/// This is the inverse of [`NotifierType::native_config_key`]; keys that are not
/// known notifiers are stripped of their `_configs` suffix.
pub fn notifier_type_for_config_key(config_key: &str) -> String {
    match config_key {
        "msteams_configs" => NotifierType::Teams.as_str().to_string(),
        "wechat_configs" => NotifierType::WeCom.as_str().to_string(),
        other => other.strip_suffix("_configs").unwrap_or(other).to_string(),
    }
}

/// Convert a Grafana contact point integration into a native Alertmanager receiver
/// config entry.
///
/// # Errors
///
/// Returns [`Error::UnsupportedNotifierType`] for types with no native equivalent,
/// and [`Error::UnexpectedSettings`] if the settings are not a JSON object.
pub fn embedded_to_native(point: &EmbeddedContactPoint) -> Result<NativeReceiverConfig> {
    let notifier_type = point
        .notifier_type
        .parse::<NotifierType>()
        .ok()
        .filter(NotifierType::is_native_supported)
        .ok_or_else(|| Error::UnsupportedNotifierType {
            notifier_type: point.notifier_type.clone(),
        })?;

    let settings = point
        .settings
        .as_object()
        .ok_or_else(|| Error::UnexpectedSettings {
            found: json_kind(&point.settings),
        })?;

    let mut native = Map::new();
    for (key, value) in settings {
        if is_grafana_only_setting(key) {
            continue;
        }
        let snake_key = key.to_snake_case();
        if is_grafana_only_setting(&snake_key) || is_suppressed_default(value) {
            continue;
        }
        native.insert(native_name(&snake_key).to_string(), value.clone());
    }
    native.insert(
        SEND_RESOLVED.to_string(),
        Value::Bool(!point.disable_resolve_message),
    );

    Ok(NativeReceiverConfig {
        config_key: notifier_type.native_config_key(),
        settings: native,
    })
}

/// Convert a native Alertmanager receiver config entry into a Grafana contact point
/// integration.
///
/// `send_resolved` defaults to `true` when absent or not a boolean.
pub fn native_to_embedded(
    notifier_type: &str,
    name: &str,
    config: &Map<String, Value>,
) -> EmbeddedContactPoint {
    let send_resolved = config
        .get(SEND_RESOLVED)
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let settings = config
        .iter()
        .filter(|(key, _)| key.as_str() != SEND_RESOLVED)
        .map(|(key, value)| {
            let key = grafana_name(key).map_or_else(|| key.to_lower_camel_case(), str::to_string);
            (key, value.clone())
        })
        .collect();

    EmbeddedContactPoint::new(name, notifier_type, Value::Object(settings))
        .with_disable_resolve_message(!send_resolved)
}
