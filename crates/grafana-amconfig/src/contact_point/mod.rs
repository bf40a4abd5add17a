/*! Contact points and their native Alertmanager equivalents.

Grafana describes each integration of a contact point as an
[`EmbeddedContactPoint`]: a notifier type tag plus a camelCase settings bag. A native
(non Grafana-managed) Alertmanager instead stores integrations inside a receiver,
under a per-type key such as `opsgenie_configs`, with snake_case settings.

[`embedded_to_native`] and [`native_to_embedded`] convert between the two. The
conversion is deliberately lossy in the Grafana → native direction:

- settings that only exist in Grafana (`overridePriority`, `sendTagsAs`) are dropped;
- boolean settings set to `false` are dropped, since Grafana fills them in as
  defaults and strict native Alertmanagers reject unknown keys.

Reading the result back with [`native_to_embedded`] therefore does not always
reproduce the original contact point.
*/
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

mod fields;
mod native;

pub use fields::{is_grafana_only_setting, Rename, GRAFANA_ONLY_SETTINGS, RENAMES};
pub use native::{
    embedded_to_native, native_to_embedded, notifier_type_for_config_key, NativeReceiverConfig,
};

/// A single integration of a Grafana contact point, as returned by the
/// provisioning API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct EmbeddedContactPoint {
    /// The stable identifier of the integration.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    /// The name of the contact point the integration belongs to.
    #[serde(default)]
    pub name: String,
    /// The Grafana notifier type, e.g. `opsgenie`.
    #[serde(rename = "type")]
    pub notifier_type: String,
    /// Whether resolve notifications are suppressed.
    #[serde(default)]
    pub disable_resolve_message: bool,
    /// The notifier-specific settings.
    ///
    /// This is expected to be a JSON object with camelCase keys; other shapes are
    /// rejected when converting.
    #[serde(default)]
    pub settings: Value,
    /// Where the contact point was provisioned from, as reported by Grafana.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

impl EmbeddedContactPoint {
    /// Create a new contact point integration with the given type and settings.
    pub fn new(name: impl Into<String>, notifier_type: impl Into<String>, settings: Value) -> Self {
        Self {
            name: name.into(),
            notifier_type: notifier_type.into(),
            settings,
            ..Default::default()
        }
    }

    /// Set the UID of the integration.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Set whether resolve notifications are suppressed.
    #[must_use]
    pub fn with_disable_resolve_message(mut self, disable: bool) -> Self {
        self.disable_resolve_message = disable;
        self
    }
}

/// The notifier types known to Grafana.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NotifierType {
    /// Forwards alerts to another Alertmanager.
    #[serde(rename = "prometheus-alertmanager")]
    Alertmanager,
    /// DingDing.
    #[serde(rename = "dingding")]
    DingDing,
    /// Discord.
    #[serde(rename = "discord")]
    Discord,
    /// Email.
    #[serde(rename = "email")]
    Email,
    /// Google Chat.
    #[serde(rename = "googlechat")]
    GoogleChat,
    /// Kafka REST proxy.
    #[serde(rename = "kafka")]
    Kafka,
    /// LINE.
    #[serde(rename = "LINE")]
    Line,
    /// MQTT.
    #[serde(rename = "mqtt")]
    Mqtt,
    /// Grafana OnCall.
    #[serde(rename = "oncall")]
    OnCall,
    /// OpsGenie.
    #[serde(rename = "opsgenie")]
    Opsgenie,
    /// PagerDuty.
    #[serde(rename = "pagerduty")]
    PagerDuty,
    /// Pushover.
    #[serde(rename = "pushover")]
    Pushover,
    /// Sensu Go.
    #[serde(rename = "sensugo")]
    SensuGo,
    /// Slack.
    #[serde(rename = "slack")]
    Slack,
    /// Amazon SNS.
    #[serde(rename = "sns")]
    Sns,
    /// Microsoft Teams.
    #[serde(rename = "teams")]
    Teams,
    /// Telegram.
    #[serde(rename = "telegram")]
    Telegram,
    /// Threema.
    #[serde(rename = "threema")]
    Threema,
    /// Splunk On-Call (VictorOps).
    #[serde(rename = "victorops")]
    VictorOps,
    /// Cisco Webex.
    #[serde(rename = "webex")]
    Webex,
    /// Generic webhook.
    #[serde(rename = "webhook")]
    Webhook,
    /// WeCom (WeChat Work).
    #[serde(rename = "wecom")]
    WeCom,
}

impl NotifierType {
    /// Every known notifier type.
    pub const ALL: [Self; 22] = [
        Self::Alertmanager,
        Self::DingDing,
        Self::Discord,
        Self::Email,
        Self::GoogleChat,
        Self::Kafka,
        Self::Line,
        Self::Mqtt,
        Self::OnCall,
        Self::Opsgenie,
        Self::PagerDuty,
        Self::Pushover,
        Self::SensuGo,
        Self::Slack,
        Self::Sns,
        Self::Teams,
        Self::Telegram,
        Self::Threema,
        Self::VictorOps,
        Self::Webex,
        Self::Webhook,
        Self::WeCom,
    ];

    /// The type tag Grafana uses for this notifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alertmanager => "prometheus-alertmanager",
            Self::DingDing => "dingding",
            Self::Discord => "discord",
            Self::Email => "email",
            Self::GoogleChat => "googlechat",
            Self::Kafka => "kafka",
            Self::Line => "LINE",
            Self::Mqtt => "mqtt",
            Self::OnCall => "oncall",
            Self::Opsgenie => "opsgenie",
            Self::PagerDuty => "pagerduty",
            Self::Pushover => "pushover",
            Self::SensuGo => "sensugo",
            Self::Slack => "slack",
            Self::Sns => "sns",
            Self::Teams => "teams",
            Self::Telegram => "telegram",
            Self::Threema => "threema",
            Self::VictorOps => "victorops",
            Self::Webex => "webex",
            Self::Webhook => "webhook",
            Self::WeCom => "wecom",
        }
    }

    /// Whether a native Alertmanager has an equivalent integration.
    pub const fn is_native_supported(&self) -> bool {
        matches!(
            self,
            Self::Email
                | Self::PagerDuty
                | Self::Pushover
                | Self::Slack
                | Self::Opsgenie
                | Self::VictorOps
                | Self::Webhook
                | Self::WeCom
                | Self::Telegram
                | Self::Sns
                | Self::Teams
                | Self::Webex
                | Self::Discord
        )
    }

    /// The key under which a native Alertmanager receiver lists integrations of
    /// this type, e.g. `opsgenie_configs`.
    pub fn native_config_key(&self) -> String {
        match self {
            Self::Teams => "msteams_configs".to_string(),
            Self::WeCom => "wechat_configs".to_string(),
            other => format!("{}_configs", other.as_str()),
        }
    }
}

impl FromStr for NotifierType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownNotifier(s.to_string()))
    }
}

impl fmt::Display for NotifierType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
