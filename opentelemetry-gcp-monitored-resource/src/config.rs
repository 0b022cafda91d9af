//! Declarative configuration of the resource mapping.
//!
//! ```yaml
//! service_resource_labels: true
//! resource_filters:
//!   - prefix: "cloud."
//!   - prefix: "k8s."
//!     regex: "name$"
//! mapping:
//!   mapping_key: "gcp.resource_type"
//!   label_prefix: "gcp."
//! ```
//!
//! Every field is optional. Filter patterns are compiled when the runtime
//! components are built, so a bad pattern is reported once, up front.
use crate::error::Result;
use crate::filter::{AttributeLabelFilter, FilterRule};
use crate::mapper::ResourceMapper;
use crate::resolver::{
    MappingConvention, ResourceIdentityResolver, DEFAULT_LABEL_PREFIX, DEFAULT_MAPPING_KEY,
};
use serde::{Deserialize, Serialize};

/// A resource filter as written in configuration.
///
/// An empty prefix or an empty regex matches every key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceFilter {
    /// Literal prefix the attribute key must start with.
    #[serde(default)]
    pub prefix: String,
    /// Regular expression the attribute key must match.
    #[serde(default)]
    pub regex: String,
}

impl ResourceFilter {
    /// Creates a filter from a prefix and a pattern.
    pub fn new(prefix: impl Into<String>, regex: impl Into<String>) -> Self {
        ResourceFilter {
            prefix: prefix.into(),
            regex: regex.into(),
        }
    }
}

/// Names of the attributes used to force a monitored resource.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MappingConfig {
    /// Attribute holding the monitored resource type.
    #[serde(default = "default_mapping_key")]
    pub mapping_key: String,
    /// Prefix of the label attributes, followed by `<type>.`.
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        MappingConfig {
            mapping_key: default_mapping_key(),
            label_prefix: default_label_prefix(),
        }
    }
}

/// Configuration for the resource identity resolver and the label filter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceLabelsConfig {
    /// Export non-empty `service.name`, `service.namespace` and
    /// `service.instance.id` as labels.
    #[serde(default = "default_true")]
    pub service_resource_labels: bool,
    /// Rules selecting further attributes to export as labels, in order.
    #[serde(default)]
    pub resource_filters: Vec<ResourceFilter>,
    /// Monitored resource override convention.
    #[serde(default)]
    pub mapping: MappingConfig,
}

impl Default for ResourceLabelsConfig {
    fn default() -> Self {
        ResourceLabelsConfig {
            service_resource_labels: true,
            resource_filters: Vec::new(),
            mapping: MappingConfig::default(),
        }
    }
}

impl ResourceLabelsConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Builds the label filter, failing on the first invalid pattern.
    pub fn label_filter(&self) -> Result<AttributeLabelFilter> {
        let rules = self
            .resource_filters
            .iter()
            .map(|filter| FilterRule::new(filter.prefix.as_str(), filter.regex.as_str()))
            .collect::<Result<Vec<_>>>()?;
        Ok(AttributeLabelFilter::new(self.service_resource_labels, rules))
    }

    /// Builds the label filter; invalid patterns become rules that never match.
    pub fn label_filter_lenient(&self) -> AttributeLabelFilter {
        let rules = self
            .resource_filters
            .iter()
            .map(|filter| FilterRule::lenient(filter.prefix.as_str(), filter.regex.as_str()))
            .collect();
        AttributeLabelFilter::new(self.service_resource_labels, rules)
    }

    /// The configured mapping convention.
    pub fn convention(&self) -> Result<MappingConvention> {
        MappingConvention::new(
            self.mapping.mapping_key.clone(),
            self.mapping.label_prefix.clone(),
        )
    }

    /// Builds a resolver backed by the default mapper.
    pub fn resolver(&self) -> Result<ResourceIdentityResolver> {
        Ok(ResourceIdentityResolver::new().with_convention(self.convention()?))
    }

    /// Builds a resolver backed by `mapper`.
    pub fn resolver_with_mapper<M: ResourceMapper>(
        &self,
        mapper: M,
    ) -> Result<ResourceIdentityResolver<M>> {
        Ok(ResourceIdentityResolver::with_mapper(mapper).with_convention(self.convention()?))
    }
}

fn default_true() -> bool {
    true
}

fn default_mapping_key() -> String {
    DEFAULT_MAPPING_KEY.to_string()
}

fn default_label_prefix() -> String {
    DEFAULT_LABEL_PREFIX.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mapper::Target;
    use crate::resource::MonitoredResource;
    use std::collections::HashMap;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ResourceLabelsConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ResourceLabelsConfig::default());
        assert!(config.service_resource_labels);
        assert_eq!(config.mapping.mapping_key, "gcp.resource_type");
        assert_eq!(config.mapping.label_prefix, "gcp.");
    }

    #[test]
    fn test_deserialize_full_config() {
        let yaml_str = r#"
          service_resource_labels: false
          resource_filters:
            - prefix: "cloud."
            - prefix: "k8s."
              regex: "name$"
            - regex: "^host\\."
          mapping:
            mapping_key: "acme.resource_type"
        "#;
        let config = ResourceLabelsConfig::from_yaml_str(yaml_str).unwrap();
        assert!(!config.service_resource_labels);
        assert_eq!(
            config.resource_filters,
            vec![
                ResourceFilter::new("cloud.", ""),
                ResourceFilter::new("k8s.", "name$"),
                ResourceFilter::new("", "^host\\."),
            ]
        );
        assert_eq!(config.mapping.mapping_key, "acme.resource_type");
        assert_eq!(config.mapping.label_prefix, "gcp.");

        let filter = config.label_filter().unwrap();
        let labels = filter.filter(&attrs(&[
            ("cloud.region", "us-east1"),
            ("k8s.pod.name", "web-1"),
            ("k8s.pod.uid", "1234"),
            ("host.id", "h-1"),
            ("service.name", "orders"),
        ]));
        assert_eq!(
            labels,
            attrs(&[
                ("cloud.region", "us-east1"),
                ("k8s.pod.name", "web-1"),
                ("host.id", "h-1"),
            ])
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = ResourceLabelsConfig::from_yaml_str("resource_filter: []").unwrap_err();
        match err {
            Error::Config(e) => assert!(e.to_string().contains("unknown field `resource_filter`")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_pattern_strict_and_lenient() {
        let yaml_str = r#"
          resource_filters:
            - prefix: "cloud."
              regex: "[unclosed"
            - prefix: "host."
        "#;
        let config = ResourceLabelsConfig::from_yaml_str(yaml_str).unwrap();
        assert!(matches!(
            config.label_filter(),
            Err(Error::InvalidFilterPattern { .. })
        ));

        let filter = config.label_filter_lenient();
        let labels = filter.filter(&attrs(&[("cloud.region", "r"), ("host.name", "box")]));
        assert_eq!(labels, attrs(&[("host.name", "box")]));
    }

    #[test]
    fn test_resolver_uses_configured_convention() {
        let yaml_str = r#"
          mapping:
            mapping_key: "acme.type"
            label_prefix: "acme."
        "#;
        let config = ResourceLabelsConfig::from_yaml_str(yaml_str).unwrap();
        let resolver = config.resolver().unwrap();
        let got = resolver.resolve(&attrs(&[("acme.type", "widget"), ("acme.widget.id", "7")]));
        assert_eq!(
            got,
            MonitoredResource::new("widget", attrs(&[("id", "7")]))
        );

        let resolver = config
            .resolver_with_mapper(|_: Target, _: &dyn crate::ResourceAttributes| {
                MonitoredResource::new("fallback", HashMap::new())
            })
            .unwrap();
        assert_eq!(
            resolver.resolve(&attrs(&[])).resource_type(),
            "fallback"
        );
    }

    #[test]
    fn test_empty_mapping_key_is_rejected() {
        let config = ResourceLabelsConfig::from_yaml_str("mapping: { mapping_key: \"\" }").unwrap();
        assert!(matches!(
            config.resolver(),
            Err(Error::InvalidConvention(_))
        ));
    }
}
