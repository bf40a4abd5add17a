/*! Alertmanager configuration documents.

An [`AlertmanagerConfig`] is the JSON object returned by Grafana's Alertmanager
configuration API (`/api/alertmanager/{uid}/config/api/v1/alerts`). It is kept
as a generic map so that fields this crate does not model, such as
`inhibit_rules` or `templates`, survive a read-modify-write cycle untouched.

Grafana-managed Alertmanagers store contact points as
`grafana_managed_receiver_configs`; native ones use per-type keys such as
`opsgenie_configs`. Use [`AlertmanagerConfig::is_grafana_managed`] to tell them
apart before converting.
*/
use serde_json::{Map, Value};

use crate::{
    contact_point::{
        embedded_to_native, native_to_embedded, notifier_type_for_config_key,
        EmbeddedContactPoint,
    },
    error::{json_kind, Error, Result},
    route::{self, Route},
};

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod client;

/// The UID of Grafana's built-in Alertmanager, which is always Grafana-managed.
pub const GRAFANA_ALERTMANAGER_UID: &str = "grafana";

const ROUTE: &str = "route";
const RECEIVERS: &str = "receivers";
const NAME: &str = "name";
const GRAFANA_MANAGED_RECEIVER_CONFIGS: &str = "grafana_managed_receiver_configs";

/// Returns true if the Alertmanager stores contact points in Grafana's format.
///
/// The built-in `grafana` Alertmanager always does. Any other Alertmanager does if
/// at least one of its receivers has a `grafana_managed_receiver_configs` key.
/// Note that an empty configuration is treated as native, since there is nothing
/// to look at.
pub fn is_grafana_managed(am_uid: &str, config: &Map<String, Value>) -> bool {
    am_uid == GRAFANA_ALERTMANAGER_UID
        || config
            .get(RECEIVERS)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .any(|r| r.contains_key(GRAFANA_MANAGED_RECEIVER_CONFIGS))
}

/// A full Alertmanager configuration document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlertmanagerConfig {
    inner: Map<String, Value>,
}

impl AlertmanagerConfig {
    /// Wrap a configuration object.
    pub fn new(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// Wrap a configuration value, which must be a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedSettings`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(inner) => Ok(Self { inner }),
            other => Err(Error::UnexpectedSettings {
                found: json_kind(&other),
            }),
        }
    }

    /// Unwrap into a JSON value, ready to be posted back.
    pub fn into_value(self) -> Value {
        Value::Object(self.inner)
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    /// See [`is_grafana_managed`].
    pub fn is_grafana_managed(&self, am_uid: &str) -> bool {
        is_grafana_managed(am_uid, &self.inner)
    }

    /// The root of the notification policy tree, if one is configured.
    ///
    /// # Errors
    ///
    /// Fails if the route is present but malformed.
    pub fn route(&self) -> Result<Option<Route>> {
        self.inner
            .get(ROUTE)
            .and_then(Value::as_object)
            .map(route::from_am_config)
            .transpose()
    }

    /// Replace the notification policy tree.
    pub fn set_route(&mut self, route: &Route) -> Result<()> {
        let generic = route::to_am_config(route)?;
        self.inner.insert(ROUTE.to_string(), Value::Object(generic));
        Ok(())
    }

    fn receivers(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.inner
            .get(RECEIVERS)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    /// Find a receiver by name.
    pub fn receiver(&self, name: &str) -> Option<&Map<String, Value>> {
        self.receivers()
            .find(|r| r.get(NAME).and_then(Value::as_str) == Some(name))
    }

    /// The names of all receivers, in configuration order.
    pub fn receiver_names(&self) -> Vec<&str> {
        self.receivers()
            .filter_map(|r| r.get(NAME).and_then(Value::as_str))
            .collect()
    }

    /// The integrations of a native receiver, converted to Grafana contact points.
    ///
    /// Returns an empty list if there is no receiver with that name. Entries that
    /// are not objects are skipped, as is `grafana_managed_receiver_configs`.
    pub fn native_contact_points(&self, name: &str) -> Vec<EmbeddedContactPoint> {
        let Some(receiver) = self.receiver(name) else {
            return Vec::new();
        };
        receiver
            .iter()
            .filter(|(key, _)| {
                key.ends_with("_configs") && key.as_str() != GRAFANA_MANAGED_RECEIVER_CONFIGS
            })
            .flat_map(|(key, entries)| {
                let notifier_type = notifier_type_for_config_key(key);
                entries
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_object)
                    .map(move |config| native_to_embedded(&notifier_type, name, config))
            })
            .collect()
    }

    /// Create or replace a native receiver holding the given integrations.
    ///
    /// Integrations of the same type are grouped under one config key, keeping the
    /// order in which they were given. An existing receiver with the same name is
    /// replaced in place; otherwise the receiver is appended.
    ///
    /// # Errors
    ///
    /// Fails if any integration cannot be converted, or if `receivers` is present
    /// but is not a list. The configuration is left unchanged on error.
    pub fn upsert_native_receiver(
        &mut self,
        name: &str,
        points: &[EmbeddedContactPoint],
    ) -> Result<()> {
        let mut receiver = Map::new();
        receiver.insert(NAME.to_string(), Value::String(name.to_string()));
        for point in points {
            let native = embedded_to_native(point)?;
            if let Value::Array(entries) = receiver
                .entry(native.config_key)
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                entries.push(Value::Object(native.settings));
            }
        }

        let receivers = self.receivers_mut(name)?;
        let existing = receivers.iter_mut().find(|r| {
            r.get(NAME).and_then(Value::as_str) == Some(name)
        });
        match existing {
            Some(slot) => *slot = Value::Object(receiver),
            None => receivers.push(Value::Object(receiver)),
        }
        Ok(())
    }

    /// Remove the receiver with the given name, returning whether one was removed.
    pub fn remove_receiver(&mut self, name: &str) -> bool {
        let Some(Value::Array(receivers)) = self.inner.get_mut(RECEIVERS) else {
            return false;
        };
        let before = receivers.len();
        receivers.retain(|r| r.get(NAME).and_then(Value::as_str) != Some(name));
        receivers.len() != before
    }

    fn receivers_mut(&mut self, name: &str) -> Result<&mut Vec<Value>> {
        match self
            .inner
            .entry(RECEIVERS)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(receivers) => Ok(receivers),
            _ => Err(Error::MalformedReceiver {
                name: name.to_string(),
                reason: "receivers is not a list",
            }),
        }
    }
}

impl From<Map<String, Value>> for AlertmanagerConfig {
    fn from(inner: Map<String, Value>) -> Self {
        Self::new(inner)
    }
}
