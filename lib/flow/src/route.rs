//! Route types for flow graphs.
//!
//! Routes are the conditional edges out of a suspension block. Each route
//! pairs a match specification with the id of the block to continue at.
//! Intent options are the higher-level alternative used by intent-detection
//! blocks: a named intent with its own keyword list and target.
//!
//! Every field of a route or option may be missing from a document. A route
//! without a guard never matches, an option without a name is never offered
//! to the classifier, and a missing target means the conversation stays put.

use chatflow_core::BlockId;
use serde::{Deserialize, Deserializer, Serialize};

/// How a route recognizes the user's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchSpec {
    /// Matches when the utterance contains any of the terms (case-insensitive).
    Keyword {
        /// The terms to look for.
        #[serde(rename = "anyOf", default, deserialize_with = "null_as_default")]
        terms: Vec<String>,
    },
    /// Matches when the classifier reports one of the labels.
    Intent {
        /// The intent labels this route claims.
        #[serde(rename = "anyOf", default, deserialize_with = "null_as_default")]
        labels: Vec<String>,
    },
    /// Matches when nothing else did.
    Fallback,
}

impl MatchSpec {
    /// Creates a keyword match spec.
    #[must_use]
    pub fn keyword<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Keyword {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an intent match spec.
    #[must_use]
    pub fn intent<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Intent {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the intent labels, if this is an intent match.
    #[must_use]
    pub fn intent_labels(&self) -> Option<&[String]> {
        match self {
            Self::Intent { labels } => Some(labels),
            _ => None,
        }
    }

    /// Returns true for the fallback match.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// A conditional edge out of a suspension block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// The guard for this route.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_spec: Option<MatchSpec>,
    /// The block to continue at when the guard matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<BlockId>,
}

impl Route {
    /// Creates a new route.
    #[must_use]
    pub fn new(match_spec: MatchSpec, next: impl Into<BlockId>) -> Self {
        Self {
            match_spec: Some(match_spec),
            next: Some(next.into()),
        }
    }

    /// Returns the intent labels, if this is an intent route.
    #[must_use]
    pub fn intent_labels(&self) -> Option<&[String]> {
        self.match_spec.as_ref().and_then(MatchSpec::intent_labels)
    }

    /// Returns true for a fallback route.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.match_spec.as_ref().is_some_and(MatchSpec::is_fallback)
    }

    /// Creates a keyword route.
    #[must_use]
    pub fn keyword<I, S>(terms: I, next: impl Into<BlockId>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MatchSpec::keyword(terms), next)
    }

    /// Creates an intent route.
    #[must_use]
    pub fn intent<I, S>(labels: I, next: impl Into<BlockId>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MatchSpec::intent(labels), next)
    }

    /// Creates a fallback route.
    #[must_use]
    pub fn fallback(next: impl Into<BlockId>) -> Self {
        Self::new(MatchSpec::Fallback, next)
    }
}

/// A named intent with keywords and a target block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentOption {
    /// The intent name offered to the classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Keywords used when the classifier gives no answer.
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    /// The block to continue at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<BlockId>,
}

impl IntentOption {
    /// Creates a new intent option.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, keywords: I, next: impl Into<BlockId>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            keywords: keywords.into_iter().map(Into::into).collect(),
            next: Some(next.into()),
        }
    }
}

/// Reads an explicit `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyword_route_from_document() {
        let route: Route = serde_json::from_value(json!({
            "match": { "type": "KEYWORD", "anyOf": ["price", "cost"] },
            "next": "price"
        }))
        .expect("deserialize");

        assert_eq!(route, Route::keyword(["price", "cost"], "price"));
    }

    #[test]
    fn fallback_route_ignores_any_of() {
        let route: Route = serde_json::from_value(json!({
            "match": { "type": "FALLBACK", "anyOf": ["ignored"] },
            "next": "sorry"
        }))
        .expect("deserialize");

        assert!(route.is_fallback());
        assert_eq!(route.next.as_ref().map(BlockId::as_str), Some("sorry"));
    }

    #[test]
    fn null_any_of_reads_as_empty() {
        let spec: MatchSpec =
            serde_json::from_value(json!({ "type": "INTENT", "anyOf": null })).expect("deserialize");
        assert_eq!(spec.intent_labels(), Some(&[][..]));
    }

    #[test]
    fn unknown_match_type_is_rejected() {
        let result = serde_json::from_value::<MatchSpec>(json!({ "type": "REGEX" }));
        assert!(result.is_err());
    }

    #[test]
    fn intent_option_ignores_unknown_fields() {
        let option: IntentOption = serde_json::from_value(json!({
            "name": "hours",
            "keywords": ["open", "hours"],
            "next": "hoursBlock",
            "description": "opening hours"
        }))
        .expect("deserialize");

        assert_eq!(option, IntentOption::new("hours", ["open", "hours"], "hoursBlock"));
    }

    #[test]
    fn intent_option_without_keywords() {
        let option: IntentOption =
            serde_json::from_value(json!({ "name": "bye", "next": "end" })).expect("deserialize");
        assert!(option.keywords.is_empty());
    }

    #[test]
    fn incomplete_route_reads_as_unguarded_and_targetless() {
        let route: Route = serde_json::from_value(json!({
            "match": { "type": "KEYWORD", "anyOf": ["x"] }
        }))
        .expect("deserialize");
        assert_eq!(route.next, None);
        assert!(!route.is_fallback());

        let route: Route =
            serde_json::from_value(json!({ "match": null, "next": "m" })).expect("deserialize");
        assert_eq!(route.match_spec, None);
        assert_eq!(route.intent_labels(), None);
    }

    #[test]
    fn intent_option_without_name_or_next() {
        let option: IntentOption =
            serde_json::from_value(json!({ "keywords": ["open"] })).expect("deserialize");
        assert_eq!(option.name, None);
        assert_eq!(option.next, None);
        assert_eq!(option.keywords, vec!["open".to_string()]);
    }

    #[test]
    fn missing_fields_are_not_serialized() {
        let route: Route = serde_json::from_value(json!({})).expect("deserialize");
        assert_eq!(serde_json::to_value(&route).expect("serialize"), json!({}));
    }
}
