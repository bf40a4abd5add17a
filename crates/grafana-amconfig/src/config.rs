//! Connection settings for the Alertmanager configuration client.
use std::collections::HashMap;

/// The error returned when a configuration option is missing or invalid.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required key was not set.
    #[error("key {key} not found in environment")]
    Missing {
        /// The environment variable name.
        key: String,
    },
    /// A key was set to a value that could not be used.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// The environment variable name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn from_key(key: &str) -> Self {
        Self::Missing {
            key: key.to_string(),
        }
    }
}

type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// How requests to Grafana are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// No credentials.
    Anonymous,
    /// An API key or service account token, sent as a bearer token.
    Token(String),
    /// HTTP basic authentication.
    Basic {
        /// The user name.
        username: String,
        /// The password.
        password: String,
    },
}

impl Auth {
    /// Interpret an auth string the way the Terraform provider does: `anonymous`,
    /// `user:password`, or otherwise a token.
    pub fn parse(s: &str) -> Self {
        match s {
            "" | "anonymous" => Self::Anonymous,
            s => match s.split_once(':') {
                Some((username, password)) => Self::Basic {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                None => Self::Token(s.to_string()),
            },
        }
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Token(_) => f.debug_tuple("Token").finish_non_exhaustive(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// Key/value settings used to build an
/// [`AmConfigClient`][crate::amconfig::client::AmConfigClient].
#[derive(Clone)]
pub struct ClientConfig {
    config: HashMap<String, String>,
}

impl ClientConfig {
    const URL: &'static str = "GRAFANA_URL";
    const AUTH: &'static str = "GRAFANA_AUTH";
    const ORG_ID: &'static str = "GRAFANA_ORG_ID";

    /// Create a config from explicit key/value pairs.
    pub fn new(config: HashMap<String, String>) -> Self {
        Self { config }
    }

    /// Read `GRAFANA_URL`, `GRAFANA_AUTH` and `GRAFANA_ORG_ID` from the environment.
    pub fn from_env() -> Self {
        let config = [Self::URL, Self::AUTH, Self::ORG_ID]
            .into_iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self { config }
    }

    fn get(&self, key: &str) -> ConfigResult<&String> {
        self.config
            .get(key)
            .ok_or_else(|| ConfigError::from_key(key))
    }

    /// Return the root URL of the Grafana instance, without a trailing slash.
    pub fn url(&self) -> ConfigResult<&str> {
        self.get(Self::URL).map(|u| u.trim_end_matches('/'))
    }

    /// Return how to authenticate; anonymous if `GRAFANA_AUTH` is unset.
    pub fn auth(&self) -> Auth {
        self.get(Self::AUTH)
            .map_or(Auth::Anonymous, |s| Auth::parse(s))
    }

    /// Return the organization ID requests are scoped to; `0` if unset.
    pub fn org_id(&self) -> ConfigResult<i64> {
        match self.get(Self::ORG_ID) {
            Err(_) => Ok(0),
            Ok(s) => {
                let invalid = |reason: String| ConfigError::Invalid {
                    key: Self::ORG_ID.to_string(),
                    reason,
                };
                let org_id: i64 = s.trim().parse().map_err(|e: std::num::ParseIntError| {
                    invalid(e.to_string())
                })?;
                if org_id < 0 {
                    return Err(invalid("must not be negative".to_string()));
                }
                Ok(org_id)
            }
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url().ok())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> ClientConfig {
        ClientConfig::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn missing_url() {
        let err = config(&[]).url().unwrap_err();
        assert_eq!(err.to_string(), "key GRAFANA_URL not found in environment");
    }

    #[test]
    fn url_trims_trailing_slash() {
        assert_eq!(
            config(&[("GRAFANA_URL", "http://localhost:3000/")]).url().unwrap(),
            "http://localhost:3000"
        );
    }

    #[test]
    fn auth_forms() {
        assert_eq!(config(&[]).auth(), Auth::Anonymous);
        assert_eq!(config(&[("GRAFANA_AUTH", "anonymous")]).auth(), Auth::Anonymous);
        assert_eq!(
            config(&[("GRAFANA_AUTH", "admin:s3cr:et")]).auth(),
            Auth::Basic {
                username: "admin".to_string(),
                password: "s3cr:et".to_string()
            }
        );
        assert_eq!(
            config(&[("GRAFANA_AUTH", "glsa_abc")]).auth(),
            Auth::Token("glsa_abc".to_string())
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let auth = config(&[("GRAFANA_AUTH", "admin:hunter2")]).auth();
        assert!(!format!("{auth:?}").contains("hunter2"));
        let auth = Auth::Token("glsa_abc".to_string());
        assert!(!format!("{auth:?}").contains("glsa_abc"));
    }

    #[test]
    fn org_id() {
        assert_eq!(config(&[]).org_id().unwrap(), 0);
        assert_eq!(config(&[("GRAFANA_ORG_ID", "3")]).org_id().unwrap(), 3);
        assert!(matches!(
            config(&[("GRAFANA_ORG_ID", "three")]).org_id(),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            config(&[("GRAFANA_ORG_ID", "-1")]).org_id(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
