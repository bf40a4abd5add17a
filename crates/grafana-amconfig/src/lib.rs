/*! Conversions between Grafana alerting API shapes and Alertmanager configuration.

Grafana's provisioning API and the Alertmanager configuration API describe the
same notification policies and contact points in different shapes. This crate
converts between them, so that both Grafana-managed and native Alertmanagers can
be managed from the same resource definitions. It is divided into these modules:

- [`route`] converts notification policy trees between structured
  `object_matchers` and the string `matchers` used by the Alertmanager API.
- [`contact_point`] converts contact point integrations between Grafana's
  camelCase settings and native Alertmanager receiver configs.
- [`amconfig`] wraps a full Alertmanager configuration document and, with the
  `reqwest` feature, provides a client to read and write it.
- [`notifier`] holds the per-notifier field tables used to translate contact
  points to and from Terraform blocks.
- [`id`] parses and builds `{orgID}:{uid}` resource identifiers.
- [`config`] and [`log`] set up the client and logging from the environment.

The conversions are pure functions; they never perform I/O or log.

# Feature flags

The following feature flags enable additional functionality for this crate:

- `reqwest` (default) - adds [`amconfig::client::AmConfigClient`], an HTTP client for
  the Alertmanager configuration API
*/
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

#[doc(hidden)]
pub use serde_json;

#[cfg(feature = "reqwest")]
extern crate reqwest_lib as reqwest;

pub mod amconfig;
pub mod config;
pub mod contact_point;
pub mod error;
pub mod id;
pub mod log;
pub mod notifier;
pub mod route;

pub use error::{Error, Result};
