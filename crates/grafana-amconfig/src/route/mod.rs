/*! Notification policy trees.

Grafana's provisioning API describes notification policies as a tree of [`Route`]s
whose matchers are structured `[label, operator, value]` triples (`object_matchers`).
The Alertmanager configuration API instead expects plain maps with string matchers
(`matchers: ["severity=critical"]`) and no provenance. [`to_am_config`] and
[`from_am_config`] convert between the two.

```rust
use grafana_amconfig::route::{self, MatchType, ObjectMatcher, Route};

let mut child = Route::default();
child.receiver = Some("oncall".to_string());
child.object_matchers = vec![ObjectMatcher::new("severity", MatchType::Equal, "critical")];

let mut root = Route::default();
root.receiver = Some("default".to_string());
root.routes = vec![child];

let generic = route::to_am_config(&root).unwrap();
assert_eq!(generic["routes"][0]["matchers"][0], "severity=critical");
assert_eq!(route::from_am_config(&generic).unwrap(), root);
```

Children are always converted in order, after their parent: the first matching
route wins in Alertmanager, so reordering would change routing.
*/
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnNull};

use crate::error::{Error, Result};

mod matcher;

pub use matcher::{MatchType, ObjectMatcher};

/// A node of a notification policy tree, in Grafana's structured form.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Route {
    /// The contact point notifications matching this node are sent to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,

    /// Labels used to group alerts into notifications.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,

    /// How long to buffer alerts of a new group before notifying, e.g. `30s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,

    /// Minimum time between two notifications for the same group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,

    /// Minimum time before re-sending a notification for a firing alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,

    /// Whether matching continues with sibling nodes after this one matched.
    #[serde(rename = "continue", default, skip_serializing_if = "std::ops::Not::not")]
    pub continue_matching: bool,

    /// Structured label matchers.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_matchers: Vec<ObjectMatcher>,

    /// Names of time intervals during which notifications are muted.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<String>,

    /// Names of time intervals during which notifications are sent.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active_time_intervals: Vec<String>,

    /// Where the policy tree was provisioned from, as reported by Grafana.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,

    /// Child nodes, in priority order.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,

    /// Fields not modelled above, kept so that they survive a round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys that only exist in the structured form.
const STRUCTURED_ONLY_KEYS: [&str; 2] = ["object_matchers", "provenance"];

/// Convert a structured route tree into the generic map used by the Alertmanager
/// configuration API.
///
/// The `matchers` key is only present when the node has at least one matcher, and
/// `routes` only when it has children. `object_matchers` and `provenance` are
/// dropped.
pub fn to_am_config(route: &Route) -> Result<Map<String, Value>> {
    let mut map: Map<String, Value> = serde_json::to_value(route)
        .and_then(serde_json::from_value)
        .map_err(Error::EncodeRoute)?;

    for key in STRUCTURED_ONLY_KEYS {
        map.remove(key);
    }
    map.remove("matchers");
    map.remove("routes");

    if !route.object_matchers.is_empty() {
        let matchers = route
            .object_matchers
            .iter()
            .map(|m| Value::String(m.to_string()))
            .collect();
        map.insert("matchers".to_string(), Value::Array(matchers));
    }

    if !route.routes.is_empty() {
        let routes = route
            .routes
            .iter()
            .map(|child| to_am_config(child).map(Value::Object))
            .collect::<Result<_>>()?;
        map.insert("routes".to_string(), Value::Array(routes));
    }

    Ok(map)
}

/// Convert a generic Alertmanager configuration route map into a structured route tree.
///
/// Matcher entries that are not strings, and children that are not objects, are
/// skipped. A known field holding a value of the wrong type is an error, as is any
/// error converting a child.
pub fn from_am_config(map: &Map<String, Value>) -> Result<Route> {
    let object_matchers = map
        .get("matchers")
        .map(matchers_from_value)
        .unwrap_or_default();

    let cleaned: Map<String, Value> = map
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "matchers" | "routes"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut route: Route =
        serde_json::from_value(Value::Object(cleaned)).map_err(Error::DecodeRoute)?;
    route.object_matchers = object_matchers;

    if let Some(Value::Array(children)) = map.get("routes") {
        route.routes = children
            .iter()
            .filter_map(Value::as_object)
            .map(from_am_config)
            .collect::<Result<_>>()?;
    }

    Ok(route)
}

fn matchers_from_value(value: &Value) -> Vec<ObjectMatcher> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ObjectMatcher::parse)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn route(receiver: &str) -> Route {
        Route {
            receiver: Some(receiver.to_string()),
            ..Default::default()
        }
    }

    fn test_tree() -> Route {
        Route {
            group_by: vec![
                "cluster".to_string(),
                "region".to_string(),
                "alertname".to_string(),
            ],
            group_wait: Some("10s".to_string()),
            group_interval: Some("1m".to_string()),
            repeat_interval: Some("5m".to_string()),
            routes: vec![
                Route {
                    continue_matching: true,
                    object_matchers: vec![
                        ObjectMatcher::new("alertname", MatchType::Regexp, ".+"),
                        ObjectMatcher::new("team", MatchType::NotEqual, "infra"),
                    ],
                    mute_time_intervals: vec!["weekends".to_string()],
                    active_time_intervals: vec!["business-hours".to_string()],
                    routes: vec![Route {
                        object_matchers: vec![ObjectMatcher::new(
                            "severity",
                            MatchType::Equal,
                            "critical",
                        )],
                        ..route("pager")
                    }],
                    ..route("grafana-oncall")
                },
                route("fallback"),
            ],
            ..route("opsgenie")
        }
    }

    #[test]
    fn to_am_config_tree() {
        let generic = to_am_config(&test_tree()).unwrap();
        assert_eq!(
            Value::Object(generic),
            json!({
                "receiver": "opsgenie",
                "group_by": ["cluster", "region", "alertname"],
                "group_wait": "10s",
                "group_interval": "1m",
                "repeat_interval": "5m",
                "routes": [
                    {
                        "receiver": "grafana-oncall",
                        "continue": true,
                        "matchers": ["alertname=~.+", "team!=infra"],
                        "mute_time_intervals": ["weekends"],
                        "active_time_intervals": ["business-hours"],
                        "routes": [
                            {"receiver": "pager", "matchers": ["severity=critical"]}
                        ]
                    },
                    {"receiver": "fallback"}
                ]
            })
        );
    }

    #[test]
    fn round_trip() {
        let original = test_tree();
        let generic = to_am_config(&original).unwrap();
        let round_tripped = from_am_config(&generic).unwrap();
        assert_eq!(round_tripped, original);
        assert_eq!(to_am_config(&round_tripped).unwrap(), generic);
    }

    #[test]
    fn no_matchers_means_no_key() {
        let generic = to_am_config(&route("default")).unwrap();
        assert!(!generic.contains_key("matchers"));
        assert!(!generic.contains_key("routes"));
    }

    #[test]
    fn strips_structured_only_fields() {
        let mut r = route("default");
        r.provenance = Some("api".to_string());
        r.extra
            .insert("matchers".to_string(), json!([{"name": "a", "type": "=", "value": "b"}]));
        let generic = to_am_config(&r).unwrap();
        assert!(!generic.contains_key("provenance"));
        assert!(!generic.contains_key("object_matchers"));
        assert!(!generic.contains_key("matchers"));
    }

    #[test]
    fn decodes_grafana_policy_json() {
        let policy: Route = serde_json::from_value(json!({
            "receiver": "default",
            "group_by": ["..."],
            "provenance": "api",
            "routes": [
                {"receiver": "a", "object_matchers": [["env", "=", "prod"]], "routes": null}
            ]
        }))
        .unwrap();
        let generic = to_am_config(&policy).unwrap();
        assert_eq!(
            Value::Object(generic),
            json!({
                "receiver": "default",
                "group_by": ["..."],
                "routes": [{"receiver": "a", "matchers": ["env=prod"]}]
            })
        );
    }

    #[test]
    fn from_am_config_skips_malformed_entries() {
        let generic = json!({
            "receiver": "default",
            "matchers": ["a=b", 42, null, "c!~d"],
            "routes": ["not a route", {"receiver": "child"}, 7]
        });
        let r = from_am_config(generic.as_object().unwrap()).unwrap();
        assert_eq!(
            r.object_matchers,
            vec![
                ObjectMatcher::new("a", MatchType::Equal, "b"),
                ObjectMatcher::new("c", MatchType::NotRegexp, "d"),
            ]
        );
        assert_eq!(r.routes, vec![route("child")]);
    }

    #[test]
    fn from_am_config_rejects_bad_field_types() {
        let generic = json!({"receiver": 12});
        assert!(matches!(
            from_am_config(generic.as_object().unwrap()),
            Err(Error::DecodeRoute(_))
        ));
    }

    #[test]
    fn from_am_config_propagates_child_errors() {
        let generic = json!({
            "receiver": "default",
            "routes": [{"receiver": "ok"}, {"routes": [{"group_by": "not-a-list"}]}]
        });
        assert!(matches!(
            from_am_config(generic.as_object().unwrap()),
            Err(Error::DecodeRoute(_))
        ));
    }

    #[test]
    fn empty_children_are_dropped() {
        let generic = json!({"receiver": "a", "routes": [], "matchers": []});
        let r = from_am_config(generic.as_object().unwrap()).unwrap();
        assert!(r.routes.is_empty());
        assert_eq!(Value::Object(to_am_config(&r).unwrap()), json!({"receiver": "a"}));
    }

    #[test]
    fn typed_string_matchers() {
        let matchers = vec!["alertname=Watchdog".to_string()];
        let mut generic = Map::new();
        generic.insert("receiver".to_string(), json!("default"));
        generic.insert("matchers".to_string(), serde_json::to_value(matchers).unwrap());
        let r = from_am_config(&generic).unwrap();
        assert_eq!(
            r.object_matchers,
            vec![ObjectMatcher::new("alertname", MatchType::Equal, "Watchdog")]
        );
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let generic = json!({
            "receiver": "default",
            "match": {"severity": "page"},
            "match_re": {"service": "^(foo1|foo2)$"}
        });
        let r = from_am_config(generic.as_object().unwrap()).unwrap();
        assert_eq!(r.extra.len(), 2);
        assert_eq!(Value::Object(to_am_config(&r).unwrap()), generic);
    }
}
