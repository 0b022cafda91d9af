//! Selection of the resource attributes exported as labels on every point.
use crate::attributes::ResourceAttributes;
use crate::error::{Error, Result};
use crate::resource::Labels;
use opentelemetry::otel_warn;
use opentelemetry_semantic_conventions::resource::{
    SERVICE_INSTANCE_ID, SERVICE_NAME, SERVICE_NAMESPACE,
};
use regex::Regex;

/// Resource attributes exported as labels when service labels are enabled.
pub const SERVICE_LABEL_KEYS: [&str; 3] = [SERVICE_NAME, SERVICE_NAMESPACE, SERVICE_INSTANCE_ID];

/// Selects attributes whose key starts with `prefix` and matches `pattern`.
///
/// The pattern is searched anywhere in the key, so it must carry its own
/// `^`/`$` anchors if it should match the whole key.
#[derive(Clone, Debug)]
pub struct FilterRule {
    prefix: String,
    pattern: String,
    // `None` for a pattern that failed to compile, which never matches
    regex: Option<Regex>,
}

impl FilterRule {
    /// Compiles a rule, failing on an invalid pattern.
    pub fn new(prefix: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let pattern = pattern.into();
        match Regex::new(&pattern) {
            Ok(regex) => Ok(FilterRule {
                prefix,
                pattern,
                regex: Some(regex),
            }),
            Err(source) => Err(Error::InvalidFilterPattern {
                prefix,
                pattern,
                source,
            }),
        }
    }

    /// Compiles a rule, turning an invalid pattern into a rule that never matches.
    pub fn lenient(prefix: impl Into<String>, pattern: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let pattern = pattern.into();
        let regex = match Regex::new(&pattern) {
            Ok(regex) => Some(regex),
            Err(error) => {
                let reason = error.to_string();
                otel_warn!(
                    name: "LabelFilter.InvalidPattern",
                    prefix = prefix.as_str(),
                    pattern = pattern.as_str(),
                    reason = reason.as_str()
                );
                None
            }
        };
        FilterRule {
            prefix,
            pattern,
            regex,
        }
    }

    /// The literal key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The regular expression source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern compiled; a rule that did not never matches.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Whether `key` is selected by this rule.
    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(self.prefix.as_str())
            && self.regex.as_ref().is_some_and(|regex| regex.is_match(key))
    }
}

/// Reduces resource attributes to the labels attached to exported points.
///
/// An attribute survives when it is a non-empty service attribute and service
/// labels are enabled, or when one of the rules selects it. Service
/// attributes are decided by the first check alone while service labels are
/// enabled.
#[derive(Clone, Debug)]
pub struct AttributeLabelFilter {
    include_service_labels: bool,
    rules: Vec<FilterRule>,
}

impl AttributeLabelFilter {
    /// Creates a filter from already compiled rules.
    pub fn new(include_service_labels: bool, rules: Vec<FilterRule>) -> Self {
        AttributeLabelFilter {
            include_service_labels,
            rules,
        }
    }

    /// Starts building a filter; service labels are enabled by default.
    pub fn builder() -> AttributeLabelFilterBuilder {
        AttributeLabelFilterBuilder::new()
    }

    /// Whether non-empty service attributes are exported.
    pub fn include_service_labels(&self) -> bool {
        self.include_service_labels
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Returns the labels to export for `attrs`.
    pub fn filter(&self, attrs: &dyn ResourceAttributes) -> Labels {
        attrs
            .string_attributes()
            .filter(|(key, value)| self.keep(key, value))
            .map(|(key, value)| (key.to_string(), value.into_owned()))
            .collect()
    }

    fn keep(&self, key: &str, value: &str) -> bool {
        if self.include_service_labels && SERVICE_LABEL_KEYS.contains(&key) {
            return !value.is_empty();
        }
        self.rules.iter().any(|rule| rule.matches(key))
    }
}

impl Default for AttributeLabelFilter {
    fn default() -> Self {
        AttributeLabelFilter::new(true, Vec::new())
    }
}

/// Builder for [`AttributeLabelFilter`].
#[derive(Debug)]
pub struct AttributeLabelFilterBuilder {
    include_service_labels: bool,
    rules: Vec<(String, String)>,
}

impl AttributeLabelFilterBuilder {
    fn new() -> Self {
        AttributeLabelFilterBuilder {
            include_service_labels: true,
            rules: Vec::new(),
        }
    }

    /// Enables or disables exporting the service attributes.
    pub fn with_service_labels(mut self, include: bool) -> Self {
        self.include_service_labels = include;
        self
    }

    /// Appends a rule; rules are evaluated in the order they are added.
    pub fn with_rule(mut self, prefix: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.rules.push((prefix.into(), pattern.into()));
        self
    }

    /// Compiles every rule, failing on the first invalid pattern.
    pub fn build(self) -> Result<AttributeLabelFilter> {
        let rules = self
            .rules
            .into_iter()
            .map(|(prefix, pattern)| FilterRule::new(prefix, pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(AttributeLabelFilter::new(self.include_service_labels, rules))
    }

    /// Compiles every rule; invalid patterns become rules that never match.
    pub fn build_lenient(self) -> AttributeLabelFilter {
        let rules = self
            .rules
            .into_iter()
            .map(|(prefix, pattern)| FilterRule::lenient(prefix, pattern))
            .collect();
        AttributeLabelFilter::new(self.include_service_labels, rules)
    }
}
