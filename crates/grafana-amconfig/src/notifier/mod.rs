/*! Notifier field tables for the Terraform contact point resource.

A Terraform `grafana_contact_point` resource has one nested block per notifier type
(`email`, `opsgenie`, ...), each with typed snake_case attributes. Grafana's API
uses camelCase settings whose value shapes sometimes differ: Pushover priorities
are numeric strings and email addresses are a single `;`-separated string.

Each [`NotifierSchema`] lists the [`Field`]s of one block. Its [`FieldKind`]
drives the value conversion in both directions:

- [`pack`] reads a Grafana contact point into a Terraform block;
- [`unpack`] builds a Grafana contact point from a Terraform block.

Settings that no field claims travel in the block's `settings` map, as strings.
*/
use itertools::Itertools;
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::{
    contact_point::{EmbeddedContactPoint, NotifierType},
    error::{json_kind, Error, Result},
};

mod schemas;

const UID: &str = "uid";
const DISABLE_RESOLVE_MESSAGE: &str = "disable_resolve_message";
const SETTINGS: &str = "settings";

/// The separator Grafana uses between email addresses.
pub const ADDRESS_SEPARATOR: char = ';';

/// How a field's value is converted between Grafana and Terraform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A string in both.
    String,
    /// A boolean in both.
    Bool,
    /// A Grafana number (or numeric string) and a Terraform integer.
    Integer,
    /// A Grafana numeric string and a Terraform integer.
    IntegerString,
    /// A Grafana string of addresses separated by `,`, `;` or newlines, and a
    /// Terraform list of strings.
    Addresses,
    /// Any JSON value, passed through unchanged.
    Object,
}

/// One attribute of a notifier block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// The Terraform attribute name.
    pub tf_key: &'static str,
    /// The Grafana settings key.
    pub gf_key: &'static str,
    /// How the value is converted.
    pub kind: FieldKind,
    /// Whether Terraform requires the attribute.
    pub required: bool,
}

impl Field {
    /// Create an optional field.
    pub const fn new(tf_key: &'static str, gf_key: &'static str, kind: FieldKind) -> Self {
        Self {
            tf_key,
            gf_key,
            kind,
            required: false,
        }
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::Field {
            key: self.tf_key.to_string(),
            reason: reason.into(),
        }
    }

    fn expected(&self, expected: &str, found: &Value) -> Error {
        self.invalid(format!("expected {expected}, found {}", json_kind(found)))
    }

    /// Whole floats such as `5.0` are accepted; fractions and out-of-range values are not.
    fn integer(&self, n: &Number) -> Result<i64> {
        n.as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| self.invalid(format!("{n} is not an integer")))
    }

    /// Convert a Grafana value into a Terraform value.
    fn pack(&self, value: &Value) -> Result<Value> {
        match (self.kind, value) {
            (FieldKind::String, Value::String(_)) | (FieldKind::Bool, Value::Bool(_)) => {
                Ok(value.clone())
            }
            (FieldKind::String, _) => Err(self.expected("string", value)),
            (FieldKind::Bool, _) => Err(self.expected("bool", value)),
            (FieldKind::Integer | FieldKind::IntegerString, Value::Number(n)) => {
                self.integer(n).map(Value::from)
            }
            (FieldKind::Integer | FieldKind::IntegerString, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| self.invalid(format!("{s:?} is not an integer: {e}"))),
            (FieldKind::Integer | FieldKind::IntegerString, _) => {
                Err(self.expected("integer", value))
            }
            (FieldKind::Addresses, Value::String(s)) => Ok(Value::Array(
                split_addresses(s).map(|a| Value::String(a.to_string())).collect(),
            )),
            (FieldKind::Addresses, _) => Err(self.expected("string", value)),
            (FieldKind::Object, _) => Ok(value.clone()),
        }
    }

    /// Convert a Terraform value into a Grafana value.
    fn unpack(&self, value: &Value) -> Result<Value> {
        match (self.kind, value) {
            (FieldKind::String, Value::String(_)) | (FieldKind::Bool, Value::Bool(_)) => {
                Ok(value.clone())
            }
            (FieldKind::String, _) => Err(self.expected("string", value)),
            (FieldKind::Bool, _) => Err(self.expected("bool", value)),
            (FieldKind::Integer, Value::Number(n)) => self.integer(n).map(Value::from),
            (FieldKind::IntegerString, Value::Number(n)) => {
                self.integer(n).map(|i| Value::String(i.to_string()))
            }
            (FieldKind::Integer | FieldKind::IntegerString, _) => {
                Err(self.expected("integer", value))
            }
            (FieldKind::Addresses, Value::Array(items)) => {
                let addresses = items
                    .iter()
                    .filter_map(|item| {
                        let address = item.as_str();
                        if address.is_none() {
                            warn!(
                                field = self.tf_key,
                                found = json_kind(item),
                                "Dropping non-string address"
                            );
                        }
                        address
                    })
                    .join(&ADDRESS_SEPARATOR.to_string());
                Ok(Value::String(addresses))
            }
            (FieldKind::Addresses, _) => Err(self.expected("list", value)),
            (FieldKind::Object, _) => Ok(value.clone()),
        }
    }
}


/// Split a Grafana address string on `,`, `;` and newlines, dropping empty entries.
pub fn split_addresses(s: &str) -> impl Iterator<Item = &str> {
    s.split([',', ADDRESS_SEPARATOR, '\n'])
        .filter(|a| !a.is_empty())
}

/// The field table of one notifier block.
#[derive(Debug, PartialEq, Eq)]
pub struct NotifierSchema {
    /// The name of the Terraform block, e.g. `opsgenie`.
    pub field: &'static str,
    /// The Grafana notifier type.
    pub notifier_type: NotifierType,
    /// Terraform attributes that Grafana redacts when reading, and which must
    /// therefore be restored from prior state.
    pub secure_fields: &'static [&'static str],
    /// The attributes of the block.
    pub fields: &'static [Field],
}

impl NotifierSchema {
    /// Look up a field by its Terraform attribute name.
    pub fn find_field(&self, tf_key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tf_key == tf_key)
    }

    /// Returns true if a Terraform block holds any data.
    ///
    /// Terraform represents removed set elements as blocks with every attribute
    /// zeroed. Only required attributes are checked, unless the block has none.
    pub fn has_data(&self, block: &Map<String, Value>) -> bool {
        let has_required = self.fields.iter().any(|f| f.required);
        self.fields
            .iter()
            .filter(|f| f.required || !has_required)
            .any(|f| block.get(f.tf_key).is_some_and(is_non_zero))
    }
}

fn is_non_zero(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Every notifier block with a field table.
pub fn schemas() -> &'static [NotifierSchema] {
    schemas::SCHEMAS
}

/// Find the field table for a Grafana notifier type.
///
/// # Errors
///
/// Returns [`Error::UnknownNotifier`] if the type has no table.
pub fn schema_for(notifier_type: NotifierType) -> Result<&'static NotifierSchema> {
    schemas::SCHEMAS
        .iter()
        .find(|s| s.notifier_type == notifier_type)
        .ok_or_else(|| Error::UnknownNotifier(notifier_type.to_string()))
}

/// Find the field table for a Terraform block name.
///
/// # Errors
///
/// Returns [`Error::UnknownNotifier`] if there is no block with that name.
pub fn schema_for_field(field: &str) -> Result<&'static NotifierSchema> {
    schemas::SCHEMAS
        .iter()
        .find(|s| s.field == field)
        .ok_or_else(|| Error::UnknownNotifier(field.to_string()))
}

/// Convert a Grafana contact point integration into a Terraform block.
///
/// `state` is the block previously stored for the same UID, if any; secure
/// fields are copied from it because Grafana redacts them. Settings not covered
/// by the field table are returned as strings in the `settings` attribute.
///
/// # Errors
///
/// Fails if the notifier type has no field table, the settings are not an
/// object, or a known setting holds a value of the wrong shape.
pub fn pack(
    point: &EmbeddedContactPoint,
    state: Option<&Map<String, Value>>,
) -> Result<Map<String, Value>> {
    let schema = point
        .notifier_type
        .parse::<NotifierType>()
        .and_then(schema_for)?;
    let mut settings = match &point.settings {
        Value::Object(settings) => settings.clone(),
        Value::Null => Map::new(),
        other => {
            return Err(Error::UnexpectedSettings {
                found: json_kind(other),
            })
        }
    };

    let mut block = Map::new();
    block.insert(UID.to_string(), Value::String(point.uid.clone()));
    block.insert(
        DISABLE_RESOLVE_MESSAGE.to_string(),
        Value::Bool(point.disable_resolve_message),
    );

    for field in schema.fields {
        match settings.remove(field.gf_key) {
            None | Some(Value::Null) => {}
            Some(value) => {
                block.insert(field.tf_key.to_string(), field.pack(&value)?);
            }
        }
    }

    if let Some(state) = state {
        for key in schema.secure_fields {
            match state.get(*key) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    block.insert(key.to_string(), value.clone());
                }
            }
        }
    }

    let leftover = settings
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, Value::String(v))
        })
        .collect();
    block.insert(SETTINGS.to_string(), Value::Object(leftover));
    Ok(block)
}

/// Build a Grafana contact point integration from a Terraform block.
///
/// `field` is the block name, e.g. `opsgenie`, and `name` the contact point
/// name. Entries of the `settings` attribute are copied first, so known fields
/// take precedence. Empty-string settings are dropped.
///
/// # Errors
///
/// Fails if there is no block with that name, or an attribute holds a value
/// of the wrong shape.
pub fn unpack(field: &str, block: &Map<String, Value>, name: &str) -> Result<EmbeddedContactPoint> {
    let schema = schema_for_field(field)?;

    let mut settings = block
        .get(SETTINGS)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for field in schema.fields {
        match block.get(field.tf_key) {
            None | Some(Value::Null) => {}
            Some(value) => {
                settings.insert(field.gf_key.to_string(), field.unpack(value)?);
            }
        }
    }
    settings.retain(|_, v| v.as_str() != Some(""));

    let uid = block.get(UID).and_then(Value::as_str).unwrap_or_default();
    let disable_resolve_message = block
        .get(DISABLE_RESOLVE_MESSAGE)
        .and_then(Value::as_bool)
        .unwrap_or_default();

    Ok(
        EmbeddedContactPoint::new(name, schema.notifier_type.as_str(), Value::Object(settings))
            .with_uid(uid)
            .with_disable_resolve_message(disable_resolve_message),
    )
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn block(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn every_table_is_reachable() {
        for schema in schemas() {
            assert_eq!(schema_for(schema.notifier_type).unwrap(), schema);
            assert_eq!(schema_for_field(schema.field).unwrap(), schema);
            for key in schema.secure_fields {
                assert!(schema.find_field(key).is_some(), "{}.{key}", schema.field);
            }
        }
        for t in NotifierType::ALL.into_iter().filter(NotifierType::is_native_supported) {
            assert!(schema_for(t).is_ok(), "{t}");
        }
        assert!(matches!(
            schema_for(NotifierType::Kafka),
            Err(Error::UnknownNotifier(_))
        ));
        assert!(matches!(
            schema_for_field("carrier_pigeon"),
            Err(Error::UnknownNotifier(_))
        ));
    }

    #[test]
    fn has_data_checks_required_fields() {
        let opsgenie = schema_for(NotifierType::Opsgenie).unwrap();
        assert!(opsgenie.has_data(&block(json!({"api_key": "abc"}))));
        assert!(!opsgenie.has_data(&block(json!({"url": "https://x", "auto_close": true}))));
        assert!(!opsgenie.has_data(&block(json!({"api_key": ""}))));
        assert!(!opsgenie.has_data(&Map::new()));
    }

    #[test]
    fn has_data_without_required_fields() {
        let wecom = schema_for(NotifierType::WeCom).unwrap();
        assert!(wecom.fields.iter().all(|f| !f.required));
        assert!(wecom.has_data(&block(json!({"corp_id": "c"}))));
        assert!(!wecom.has_data(&block(json!({"corp_id": "", "secret": null}))));
    }

    #[test]
    fn pack_opsgenie() {
        let point = EmbeddedContactPoint::new(
            "ops",
            "opsgenie",
            json!({
                "apiUrl": "https://api.opsgenie.com",
                "apiKey": "[REDACTED]",
                "autoClose": true,
                "sendTagsAs": "tags",
                "responders": [{"type": "team", "name": "ops"}],
                "customField": 3,
                "note": "hi"
            }),
        )
        .with_uid("abc");
        let state = block(json!({"uid": "abc", "api_key": "real-key"}));

        let packed = pack(&point, Some(&state)).unwrap();
        assert_eq!(
            Value::Object(packed),
            json!({
                "uid": "abc",
                "disable_resolve_message": false,
                "url": "https://api.opsgenie.com",
                "api_key": "real-key",
                "auto_close": true,
                "send_tags_as": "tags",
                "responders": [{"type": "team", "name": "ops"}],
                "settings": {"customField": "3", "note": "hi"}
            })
        );
    }

    #[test]
    fn pack_pushover_priorities() {
        let point = EmbeddedContactPoint::new(
            "p",
            "pushover",
            json!({"userKey": "u", "apiToken": "t", "priority": "1", "okPriority": "-1", "retry": 30}),
        );
        let packed = pack(&point, None).unwrap();
        assert_eq!(packed["priority"], json!(1));
        assert_eq!(packed["ok_priority"], json!(-1));
        assert_eq!(packed["retry"], json!(30));

        let point = EmbeddedContactPoint::new("p", "pushover", json!({"priority": "high"}));
        let err = pack(&point, None).unwrap_err();
        assert!(matches!(err, Error::Field { ref key, .. } if key == "priority"));
    }

    #[test]
    fn pack_email_addresses() {
        let point = EmbeddedContactPoint::new(
            "e",
            "email",
            json!({"addresses": "a@example.com;b@example.com,c@example.com\nd@example.com;;"}),
        );
        let packed = pack(&point, None).unwrap();
        assert_eq!(
            packed["addresses"],
            json!(["a@example.com", "b@example.com", "c@example.com", "d@example.com"])
        );
    }

    #[test]
    fn pack_webhook_max_alerts() {
        for max_alerts in [json!(5), json!(5.0), json!("5")] {
            let point = EmbeddedContactPoint::new(
                "w",
                "webhook",
                json!({"url": "https://x", "maxAlerts": max_alerts}),
            );
            assert_eq!(pack(&point, None).unwrap()["max_alerts"], json!(5));
        }
    }

    #[test]
    fn pack_rejects_fractional_and_out_of_range_integers() {
        for max_alerts in [json!(5.7), json!(1e300), json!(u64::MAX)] {
            let point = EmbeddedContactPoint::new(
                "w",
                "webhook",
                json!({"url": "https://x", "maxAlerts": max_alerts}),
            );
            assert!(matches!(
                pack(&point, None),
                Err(Error::Field { key, .. }) if key == "max_alerts"
            ));
        }
    }

    #[test]
    fn unpack_rejects_fractional_integers() {
        let result = unpack(
            "pushover",
            &block(json!({"user_key": "u", "api_token": "t", "priority": 1.5})),
            "p",
        );
        assert!(matches!(result, Err(Error::Field { key, .. }) if key == "priority"));
    }

    #[test]
    fn pack_rejects_wrong_shapes() {
        let point = EmbeddedContactPoint::new("s", "slack", json!({"url": 3}));
        assert!(matches!(pack(&point, None), Err(Error::Field { .. })));
        let point = EmbeddedContactPoint::new("s", "slack", json!("nope"));
        assert!(matches!(
            pack(&point, None),
            Err(Error::UnexpectedSettings { found: "string" })
        ));
        let point = EmbeddedContactPoint::new("k", "kafka", json!({}));
        assert!(matches!(pack(&point, None), Err(Error::UnknownNotifier(_))));
    }

    #[test]
    fn unpack_pushover() {
        let point = unpack(
            "pushover",
            &block(json!({
                "uid": "u1",
                "disable_resolve_message": true,
                "user_key": "u",
                "api_token": "t",
                "priority": 2,
                "expire": 0,
                "sound": "",
                "settings": {"extra": "x", "userKey": "overridden", "blank": ""}
            })),
            "push",
        )
        .unwrap();
        assert_eq!(point.uid, "u1");
        assert_eq!(point.name, "push");
        assert_eq!(point.notifier_type, "pushover");
        assert!(point.disable_resolve_message);
        assert_eq!(
            point.settings,
            json!({
                "userKey": "u",
                "apiToken": "t",
                "priority": "2",
                "expire": "0",
                "extra": "x"
            })
        );
    }

    #[test]
    fn unpack_email() {
        let point = unpack(
            "email",
            &block(json!({
                "addresses": ["a@example.com", "b@example.com"],
                "single_email": false
            })),
            "mail",
        )
        .unwrap();
        assert_eq!(point.uid, "");
        assert_eq!(
            point.settings,
            json!({"addresses": "a@example.com;b@example.com", "singleEmail": false})
        );
    }

    #[test]
    fn unpack_telegram_keys() {
        let point = unpack(
            "telegram",
            &block(json!({"token": "bot", "chat_id": "123", "protect_content": true})),
            "tg",
        )
        .unwrap();
        assert_eq!(
            point.settings,
            json!({"bottoken": "bot", "chatid": "123", "protect_content": true})
        );
    }

    #[test]
    fn unpack_rejects_wrong_shapes() {
        assert!(matches!(
            unpack("webhook", &block(json!({"max_alerts": "ten"})), "w"),
            Err(Error::Field { .. })
        ));
        assert!(matches!(
            unpack("carrier_pigeon", &Map::new(), "x"),
            Err(Error::UnknownNotifier(_))
        ));
    }

    #[test]
    fn pack_then_unpack() {
        let point = EmbeddedContactPoint::new(
            "teams",
            "teams",
            json!({"url": "https://teams", "sectiontitle": "Alerts", "title": ""}),
        )
        .with_uid("t1");
        let packed = pack(&point, None).unwrap();
        let unpacked = unpack("teams", &packed, "teams").unwrap();
        assert_eq!(unpacked.uid, "t1");
        assert_eq!(
            unpacked.settings,
            json!({"url": "https://teams", "sectiontitle": "Alerts"})
        );
    }

    #[test]
    fn addresses() {
        assert_eq!(
            split_addresses("a,b;c\n\nd").collect::<Vec<_>>(),
            vec!["a", "b", "c", "d"]
        );
        assert_eq!(split_addresses("").count(), 0);
    }
}
