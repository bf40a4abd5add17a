//! Error types returned by the conversions in this crate.
use thiserror::Error;

/// Errors that can occur when converting between Grafana and Alertmanager shapes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The contact point's type has no native Alertmanager equivalent.
    ///
    /// Types such as `oncall` or `googlechat` only exist inside Grafana-managed
    /// Alertmanagers and are never coerced into another type.
    #[error("contact point type {notifier_type:?} is not supported by native Alertmanager")]
    UnsupportedNotifierType {
        /// The Grafana notifier type that was rejected.
        notifier_type: String,
    },

    /// A contact point's settings were not a JSON object.
    #[error("unexpected settings type {found}")]
    UnexpectedSettings {
        /// The kind of JSON value that was found instead.
        found: &'static str,
    },

    /// A route could not be encoded into its generic form.
    #[error("failed to encode route: {0}")]
    EncodeRoute(#[source] serde_json::Error),

    /// A route map contained a known field with an unexpected type.
    #[error("failed to decode route: {0}")]
    DecodeRoute(#[source] serde_json::Error),

    /// A receiver entry in an Alertmanager configuration was malformed.
    #[error("malformed receiver {name:?}: {reason}")]
    MalformedReceiver {
        /// The name of the receiver.
        name: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A notifier field could not be translated between Terraform and Grafana.
    #[error("invalid value for field {key}: {reason}")]
    Field {
        /// The Terraform attribute name of the field.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// No notifier table is registered for the given Terraform block name or type.
    #[error("unknown notifier {0:?}")]
    UnknownNotifier(String),

    /// The HTTP request to the Alertmanager configuration API failed.
    #[cfg(feature = "reqwest")]
    #[error("failed to {action} alertmanager config: {source}")]
    Http {
        /// What the client was doing, e.g. "get" or "post".
        action: &'static str,
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The requested Alertmanager does not exist.
    #[error("alertmanager {am_uid:?} not found")]
    AlertmanagerNotFound {
        /// The UID of the Alertmanager.
        am_uid: String,
    },

    /// The Alertmanager configuration API returned an unexpected status code.
    #[error("failed to {action} alertmanager config, status {status}: {body}")]
    UnexpectedStatus {
        /// What the client was doing, e.g. "get" or "post".
        action: &'static str,
        /// The HTTP status code returned.
        status: u16,
        /// The response body, verbatim.
        body: String,
    },

    /// The client configuration was incomplete.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The configured Grafana URL could not be used to build a request.
    #[error("invalid Grafana URL {url:?}: {reason}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Name the kind of a JSON value, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
