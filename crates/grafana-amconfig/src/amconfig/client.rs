//! HTTP client for Grafana's Alertmanager configuration API.
use std::sync::Arc;

use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use super::AlertmanagerConfig;
use crate::{
    config::{Auth, ClientConfig},
    error::{Error, Result},
};

const ORG_ID_HEADER: &str = "X-Grafana-Org-Id";

/// Reads and writes whole Alertmanager configuration documents.
///
/// The API only supports replacing the full document, so concurrent writers must
/// serialize their read-modify-write cycles. [`AmConfigClient::update`] does this
/// using a lock shared by every clone of the client; use
/// [`AmConfigClient::with_lock`] to share it with other code as well.
///
/// Every request takes an organization ID. Passing `0` falls back to the client's
/// default organization, set from `GRAFANA_ORG_ID` or
/// [`AmConfigClient::with_default_org_id`]; if that is also `0`, no organization
/// header is sent and Grafana uses the organization the credentials belong to.
#[derive(Clone, Debug)]
pub struct AmConfigClient {
    client: Client,
    base_url: Url,
    auth: Auth,
    default_org_id: i64,
    lock: Arc<Mutex<()>>,
}

impl AmConfigClient {
    /// Create a client for the Grafana instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, auth: Auth) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let base_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            auth,
            default_org_id: 0,
            lock: Arc::default(),
        })
    }

    /// Create a client from `GRAFANA_URL`, `GRAFANA_AUTH` and `GRAFANA_ORG_ID` settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(config.url()?, config.auth())?.with_default_org_id(config.org_id()?))
    }

    /// Use `org_id` for requests made with an organization ID of `0`.
    #[must_use]
    pub fn with_default_org_id(mut self, org_id: i64) -> Self {
        self.default_org_id = org_id;
        self
    }

    /// The organization used for requests made with an organization ID of `0`.
    pub fn default_org_id(&self) -> i64 {
        self.default_org_id
    }

    /// Use a preconfigured HTTP client, e.g. one with custom TLS settings.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Serialize [`update`][Self::update] calls using an externally owned lock.
    #[must_use]
    pub fn with_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.lock = lock;
        self
    }

    fn endpoint(&self, am_uid: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "alertmanager", am_uid, "config", "api", "v1", "alerts"]);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder, org_id: i64) -> RequestBuilder {
        let org_id = if org_id == 0 {
            self.default_org_id
        } else {
            org_id
        };
        let request = if org_id > 0 {
            request.header(ORG_ID_HEADER, org_id.to_string())
        } else {
            request
        };
        match &self.auth {
            Auth::Anonymous => request,
            Auth::Token(token) => request.bearer_auth(token),
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }

    /// Fetch the configuration of an Alertmanager.
    ///
    /// An `org_id` of `0` uses the client's default organization.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlertmanagerNotFound`] on a 404, and
    /// [`Error::UnexpectedStatus`] on any other non-200 response.
    pub async fn get(&self, org_id: i64, am_uid: &str) -> Result<AlertmanagerConfig> {
        let url = self.endpoint(am_uid)?;
        debug!(%url, org_id, "Fetching alertmanager config");
        let response = self
            .authorize(self.client.get(url), org_id)
            .send()
            .await
            .map_err(|source| Error::Http {
                action: "get",
                source,
            })?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(Error::AlertmanagerNotFound {
                    am_uid: am_uid.to_string(),
                })
            }
            status => {
                return Err(Error::UnexpectedStatus {
                    action: "get",
                    status: status.as_u16(),
                    body: response.text().await.unwrap_or_default(),
                })
            }
        }

        let config: Map<String, Value> = response.json().await.map_err(|source| Error::Http {
            action: "decode",
            source,
        })?;
        Ok(AlertmanagerConfig::new(config))
    }

    /// Replace the configuration of an Alertmanager.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedStatus`] unless the response is 200, 201 or 202.
    pub async fn post(&self, org_id: i64, am_uid: &str, config: &AlertmanagerConfig) -> Result<()> {
        let url = self.endpoint(am_uid)?;
        debug!(%url, org_id, "Posting alertmanager config");
        let response = self
            .authorize(self.client.post(url), org_id)
            .json(config.as_map())
            .send()
            .await
            .map_err(|source| Error::Http {
                action: "post",
                source,
            })?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED
        ) {
            Ok(())
        } else {
            Err(Error::UnexpectedStatus {
                action: "post",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    /// Fetch a configuration, modify it, and post it back, holding the client's
    /// lock for the whole cycle.
    ///
    /// Nothing is posted if `modify` fails. Returns the configuration as posted.
    pub async fn update<F>(&self, org_id: i64, am_uid: &str, modify: F) -> Result<AlertmanagerConfig>
    where
        F: FnOnce(&mut AlertmanagerConfig) -> Result<()>,
    {
        let _guard = self.lock.lock().await;
        let mut config = self.get(org_id, am_uid).await?;
        modify(&mut config)?;
        self.post(org_id, am_uid, &config).await?;
        debug!(am_uid, "Updated alertmanager config");
        Ok(config)
    }
}
