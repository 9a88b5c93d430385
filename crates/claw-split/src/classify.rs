//! Container role classification.
//!
//! Each container is tagged with the label of the first rule whose pattern
//! appears in its log text. Rules are checked in order, so when one line
//! matches several patterns the earliest rule wins.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};

/// A substring pattern and the label it assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Substring searched for in the decoded log text.
    pub pattern: String,
    /// Label embedded in the output filename on match.
    pub label: String,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }

    /// Checks that the rule can be applied and its label used in a filename.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::Config`] for an empty pattern or a label that is
    /// empty or contains characters other than ASCII alphanumerics, `-`, `_`
    /// and `.`.
    pub fn validate(&self) -> Result<()> {
        if self.pattern.is_empty() {
            return Err(SplitError::Config(format!(
                "rule '{}' has an empty pattern",
                self.label
            )));
        }
        if self.label.is_empty() {
            return Err(SplitError::Config(format!(
                "rule for pattern '{}' has an empty label",
                self.pattern
            )));
        }
        if !self
            .label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(SplitError::Config(format!(
                "label '{}' must contain only alphanumeric characters, '-', '_' and '.'",
                self.label
            )));
        }
        Ok(())
    }
}

/// Built-in rules in precedence order.
pub const BUILTIN_RULES: &[(&str, &str)] = &[
    ("Starting controllers on", "controllers"),
    (
        r#"msg="start registry" distribution_version="#,
        "docker-registry",
    ),
    ("Registered admission plugin", "api-server"),
    ("Starting template router", "router"),
    ("etcdserver: setting up the initial cluster", "etcd"),
];

/// Ordered rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Classifier {
    /// Creates a classifier with the built-in rules.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|(pattern, label)| Rule::new(*pattern, *label))
                .collect(),
        }
    }

    /// Creates a classifier from an explicit rule list.
    #[must_use]
    pub const fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Appends rules after the existing ones, giving them lower precedence.
    #[must_use]
    pub fn with_rules(mut self, extra: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(extra);
        self
    }

    /// Returns the rules in precedence order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the label of the first rule whose pattern occurs in `text`.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| text.contains(rule.pattern.as_str()))
            .map(|rule| rule.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("I0301 10:00:00 Starting controllers on 0.0.0.0:8444\n", "controllers" ; "controllers")]
    #[test_case("time=2018 msg=\"start registry\" distribution_version=v2.6.2+unknown\n", "docker-registry" ; "registry")]
    #[test_case("I0301 plugins.go:84] Registered admission plugin \"NamespaceLifecycle\"\n", "api-server" ; "api server")]
    #[test_case("I0301 template.go:246] Starting template router (v3.9.0)\n", "router" ; "router")]
    #[test_case("etcdserver: setting up the initial cluster version to 3.2\n", "etcd" ; "etcd")]
    fn builtin_labels(text: &str, label: &str) {
        assert_eq!(Classifier::builtin().classify(text), Some(label));
    }

    #[test]
    fn no_match_returns_none() {
        let classifier = Classifier::builtin();
        assert_eq!(classifier.classify("GET /healthz 200\n"), None);
        assert_eq!(classifier.classify(""), None);
    }

    #[test]
    fn near_miss_does_not_match() {
        let classifier = Classifier::builtin();
        assert_eq!(classifier.classify("starting template router"), None);
        assert_eq!(classifier.classify(r#"msg="start registry""#), None);
    }

    #[test]
    fn table_order_breaks_ties() {
        let classifier = Classifier::builtin();
        let text = "Starting template router after Registered admission plugin";
        assert_eq!(classifier.classify(text), Some("api-server"));

        let text = "etcdserver: setting up the initial cluster; Starting controllers on :8444";
        assert_eq!(classifier.classify(text), Some("controllers"));
    }

    #[test]
    fn extra_rules_rank_after_builtins() {
        let classifier = Classifier::builtin().with_rules([
            Rule::new("Starting template router", "haproxy"),
            Rule::new("kube-scheduler", "scheduler"),
        ]);
        assert_eq!(classifier.rules().len(), BUILTIN_RULES.len() + 2);
        assert_eq!(classifier.classify("Starting template router"), Some("router"));
        assert_eq!(classifier.classify("started kube-scheduler"), Some("scheduler"));
    }

    #[test]
    fn from_rules_replaces_table() {
        let classifier = Classifier::from_rules(vec![Rule::new("hello", "greeter")]);
        assert_eq!(classifier.classify("hello world"), Some("greeter"));
        assert_eq!(classifier.classify("Starting template router"), None);
    }

    #[test]
    fn builtin_rules_are_valid() {
        for rule in Classifier::builtin().rules() {
            rule.validate().unwrap();
        }
    }

    #[test_case("", "label" ; "empty pattern")]
    #[test_case("pattern", "" ; "empty label")]
    #[test_case("pattern", "../escape" ; "path separator in label")]
    #[test_case("pattern", "two words" ; "space in label")]
    fn invalid_rules_rejected(pattern: &str, label: &str) {
        let err = Rule::new(pattern, label).validate().unwrap_err();
        assert!(matches!(err, SplitError::Config(_)));
    }
}
