//! Label matchers, in both their structured and string forms.
use std::fmt;

use serde::{Deserialize, Serialize};

/// The comparison performed by a matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    /// `=`: the label value equals the matcher value.
    #[serde(rename = "=")]
    Equal,
    /// `!=`: the label value does not equal the matcher value.
    #[serde(rename = "!=")]
    NotEqual,
    /// `=~`: the label value matches the regular expression.
    #[serde(rename = "=~")]
    Regexp,
    /// `!~`: the label value does not match the regular expression.
    #[serde(rename = "!~")]
    NotRegexp,
}

impl MatchType {
    /// Operators in the order they are searched for when parsing a matcher string.
    ///
    /// Two-character operators come first so that `=~`, `!~` and `!=` are never
    /// split as a bare `=` followed by residual text.
    pub const PARSE_ORDER: [Self; 4] = [Self::Regexp, Self::NotRegexp, Self::NotEqual, Self::Equal];

    /// The operator token, as it appears in a matcher string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Regexp => "=~",
            Self::NotRegexp => "!~",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured `(label, operator, value)` matcher.
///
/// On the wire this is the three-element array `["label", "=~", "value"]` used
/// by Grafana's `object_matchers` field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "(String, MatchType, String)",
    into = "(String, MatchType, String)"
)]
pub struct ObjectMatcher {
    /// The label name.
    pub label: String,
    /// The comparison operator.
    pub match_type: MatchType,
    /// The value (or regular expression) compared against.
    pub value: String,
}

impl ObjectMatcher {
    /// Create a new matcher.
    pub fn new(label: impl Into<String>, match_type: MatchType, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            match_type,
            value: value.into(),
        }
    }

    /// Parse a matcher string such as `severity!=critical`.
    ///
    /// Operators are tried in [`MatchType::PARSE_ORDER`], and the string is split at
    /// the first occurrence of the first operator found, so `label=value=with=equals`
    /// has the value `value=with=equals`. Nothing is unescaped, which means a label
    /// that itself contains an operator cannot be represented.
    ///
    /// A string containing no operator at all becomes a label with an `=` operator
    /// and an empty value.
    pub fn parse(s: &str) -> Self {
        MatchType::PARSE_ORDER
            .iter()
            .find_map(|op| {
                s.split_once(op.as_str())
                    .map(|(label, value)| Self::new(label, *op, value))
            })
            .unwrap_or_else(|| Self::new(s, MatchType::Equal, ""))
    }
}

impl From<&str> for ObjectMatcher {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<(String, MatchType, String)> for ObjectMatcher {
    fn from((label, match_type, value): (String, MatchType, String)) -> Self {
        Self {
            label,
            match_type,
            value,
        }
    }
}

impl From<ObjectMatcher> for (String, MatchType, String) {
    fn from(m: ObjectMatcher) -> Self {
        (m.label, m.match_type, m.value)
    }
}

/// Formats the matcher as `label` + `operator` + `value`, with no quoting.
impl fmt::Display for ObjectMatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.label, self.match_type, self.value)
    }
}
