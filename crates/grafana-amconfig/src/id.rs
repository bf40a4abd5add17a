/*! Resource identifiers scoped to a Grafana organization.

Resources managed through the Alertmanager configuration API are identified as
`{orgID}:{amUID}/policy` (notification policies) or `{orgID}:{amUID}/{name}`
(contact points).
*/
use std::{fmt, num::ParseIntError, str::FromStr};

use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};
use thiserror::Error;

/// The separator between the organization ID and the rest of an identifier.
pub const ORG_SEPARATOR: char = ':';

/// The error returned when strictly parsing an [`OrgResourceId`].
#[serde_as]
#[derive(Debug, Error, Serialize)]
#[non_exhaustive]
pub enum Error {
    /// The identifier was empty.
    #[error("Resource ID must not be empty")]
    Empty,
    /// The identifier had no `{orgID}:` prefix.
    #[error("Missing organization ID in {0:?}")]
    MissingOrgId(String),
    /// The organization ID was not an integer.
    #[error("Invalid organization ID {org_id:?}: {source}")]
    InvalidOrgId {
        /// The organization ID as found.
        org_id: String,
        /// The integer parsing error.
        #[serde_as(as = "DisplayFromStr")]
        source: ParseIntError,
    },
    /// The organization ID was negative.
    #[error("Organization ID must not be negative, got {0}")]
    NegativeOrgId(i64),
}

/// A resource identifier qualified with an organization ID.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrgResourceId {
    /// The organization ID; `0` means the provider's default organization.
    pub org_id: i64,
    /// Everything after the organization prefix.
    pub resource: String,
}

impl OrgResourceId {
    /// Create a new identifier.
    pub fn new(org_id: i64, resource: impl Into<String>) -> Self {
        Self {
            org_id,
            resource: resource.into(),
        }
    }
}

/// Parses `{orgID}:{resource}`, rejecting identifiers without a valid prefix.
///
/// Use [`split_org_resource_id`] to accept legacy identifiers with no prefix.
impl FromStr for OrgResourceId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::Empty);
        }
        let (org_id, resource) = s
            .split_once(ORG_SEPARATOR)
            .ok_or_else(|| Error::MissingOrgId(s.to_string()))?;
        let org_id: i64 = org_id.parse().map_err(|source| Error::InvalidOrgId {
            org_id: org_id.to_string(),
            source,
        })?;
        if org_id < 0 {
            return Err(Error::NegativeOrgId(org_id));
        }
        Ok(Self::new(org_id, resource))
    }
}

impl fmt::Display for OrgResourceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.org_id, ORG_SEPARATOR, self.resource)
    }
}

/// Split an identifier into its organization ID and resource.
///
/// Identifiers without a parseable, non-negative `{orgID}:` prefix belong to
/// organization `0` and are returned whole.
pub fn split_org_resource_id(id: &str) -> (i64, &str) {
    id.split_once(ORG_SEPARATOR)
        .and_then(|(org, rest)| {
            org.parse::<i64>()
                .ok()
                .filter(|org_id| *org_id >= 0)
                .map(|org_id| (org_id, rest))
        })
        .unwrap_or((0, id))
}

/// Build a `{orgID}:{resource}` identifier.
pub fn make_org_resource_id(org_id: i64, resource: impl fmt::Display) -> String {
    format!("{org_id}{ORG_SEPARATOR}{resource}")
}

/// Parse a notification policy identifier, `{orgID}:{amUID}/policy`, into the
/// organization ID and Alertmanager UID.
pub fn parse_policy_id(id: &str) -> (i64, &str) {
    let (org_id, rest) = split_org_resource_id(id);
    let am_uid = rest.split_once('/').map_or(rest, |(uid, _)| uid);
    (org_id, am_uid)
}

/// Parse a contact point identifier, `{orgID}:{amUID}/{name}`, into the
/// organization ID, Alertmanager UID and contact point name.
///
/// The name is empty if the identifier has no `/`.
pub fn parse_contact_point_id(id: &str) -> (i64, &str, &str) {
    let (org_id, rest) = split_org_resource_id(id);
    let (am_uid, name) = rest.split_once('/').unwrap_or((rest, ""));
    (org_id, am_uid, name)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn split() {
        assert_eq!(split_org_resource_id("1:mimir"), (1, "mimir"));
        assert_eq!(split_org_resource_id("12:a:b"), (12, "a:b"));
        assert_eq!(split_org_resource_id("mimir"), (0, "mimir"));
        assert_eq!(split_org_resource_id("x:mimir"), (0, "x:mimir"));
        assert_eq!(split_org_resource_id("-1:mimir/policy"), (0, "-1:mimir/policy"));
        assert_eq!(split_org_resource_id("0:mimir"), (0, "mimir"));
    }

    #[test]
    fn policy_ids() {
        assert_eq!(parse_policy_id("1:mimir/policy"), (1, "mimir"));
        assert_eq!(parse_policy_id("3:grafana"), (3, "grafana"));
        let id = make_org_resource_id(2, "cortex/policy");
        assert_eq!(id, "2:cortex/policy");
        assert_eq!(parse_policy_id(&id), (2, "cortex"));
    }

    #[test]
    fn contact_point_ids() {
        assert_eq!(parse_contact_point_id("1:mimir/ops team"), (1, "mimir", "ops team"));
        assert_eq!(parse_contact_point_id("1:mimir/a/b"), (1, "mimir", "a/b"));
        assert_eq!(parse_contact_point_id("1:mimir"), (1, "mimir", ""));
        assert_eq!(parse_contact_point_id("-5:mimir/ops"), (0, "-5:mimir", "ops"));
    }

    #[test]
    fn strict_parse() {
        let id: OrgResourceId = "4:mimir/policy".parse().unwrap();
        assert_eq!(id, OrgResourceId::new(4, "mimir/policy"));
        assert_eq!(id.to_string(), "4:mimir/policy");

        assert!(matches!("".parse::<OrgResourceId>(), Err(Error::Empty)));
        assert!(matches!(
            "mimir".parse::<OrgResourceId>(),
            Err(Error::MissingOrgId(_))
        ));
        let err = "abc:mimir".parse::<OrgResourceId>().unwrap_err();
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"InvalidOrgId": {"org_id": "abc", "source": "invalid digit found in string"}})
        );
        assert!(matches!(
            "-1:mimir".parse::<OrgResourceId>(),
            Err(Error::NegativeOrgId(-1))
        ));
    }
}
