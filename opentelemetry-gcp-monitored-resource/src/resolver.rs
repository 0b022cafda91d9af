//! Resolution of the monitored resource a batch of telemetry is written against.
//!
//! A resource can force its monitored resource by carrying the mapping key
//! (`gcp.resource_type` by default) together with `gcp.<type>.<label>`
//! attributes:
//!
//! ```
//! use opentelemetry::KeyValue;
//! use opentelemetry_gcp_monitored_resource::ResourceIdentityResolver;
//! use opentelemetry_sdk::Resource;
//!
//! let resource = Resource::builder_empty()
//!     .with_attributes([
//!         KeyValue::new("gcp.resource_type", "k8s_pod"),
//!         KeyValue::new("gcp.k8s_pod.namespace", "default"),
//!         KeyValue::new("gcp.k8s_pod.pod_name", "web-1"),
//!     ])
//!     .build();
//!
//! let monitored = ResourceIdentityResolver::new().resolve(&resource);
//! assert_eq!(monitored.resource_type(), "k8s_pod");
//! assert_eq!(monitored.label("pod_name"), Some("web-1"));
//! ```
//!
//! Resources without an override are handed to a [`ResourceMapper`].
use crate::attributes::ResourceAttributes;
use crate::error::{Error, Result};
use crate::mapper::{GcpResourceMapper, ResourceMapper, Target};
use crate::resource::{Labels, MonitoredResource};
use opentelemetry::otel_debug;
use std::borrow::Cow;

/// Attribute carrying an explicit monitored resource type.
pub const DEFAULT_MAPPING_KEY: &str = "gcp.resource_type";

/// Prefix of the attributes carrying explicit monitored resource labels.
pub const DEFAULT_LABEL_PREFIX: &str = "gcp.";

/// The attribute naming convention used to force a monitored resource.
///
/// With the default convention, `gcp.resource_type = "foo"` selects type
/// `foo` and every `gcp.foo.<label>` attribute becomes label `<label>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingConvention {
    mapping_key: Cow<'static, str>,
    label_prefix: Cow<'static, str>,
}

impl MappingConvention {
    /// Creates a convention from a mapping key and a label prefix.
    ///
    /// Fails if the mapping key is empty.
    pub fn new(
        mapping_key: impl Into<Cow<'static, str>>,
        label_prefix: impl Into<Cow<'static, str>>,
    ) -> Result<Self> {
        let mapping_key = mapping_key.into();
        if mapping_key.is_empty() {
            return Err(Error::InvalidConvention(
                "mapping key cannot be empty".to_string(),
            ));
        }
        Ok(MappingConvention {
            mapping_key,
            label_prefix: label_prefix.into(),
        })
    }

    /// Attribute holding the monitored resource type.
    pub fn mapping_key(&self) -> &str {
        &self.mapping_key
    }

    /// Prefix shared by all label attributes, before the resource type.
    pub fn label_prefix(&self) -> &str {
        &self.label_prefix
    }

    /// Full prefix of the label attributes for `resource_type`.
    fn labels_prefix(&self, resource_type: &str) -> String {
        format!("{}{}.", self.label_prefix, resource_type)
    }
}

impl Default for MappingConvention {
    fn default() -> Self {
        MappingConvention {
            mapping_key: Cow::Borrowed(DEFAULT_MAPPING_KEY),
            label_prefix: Cow::Borrowed(DEFAULT_LABEL_PREFIX),
        }
    }
}

/// Picks the monitored resource for a set of resource attributes.
///
/// An explicit override always wins; otherwise the decision is delegated
/// verbatim to the configured [`ResourceMapper`].
#[derive(Clone, Debug)]
pub struct ResourceIdentityResolver<M = GcpResourceMapper> {
    convention: MappingConvention,
    mapper: M,
}

impl ResourceIdentityResolver {
    /// A resolver using the default convention and [`GcpResourceMapper`].
    pub fn new() -> Self {
        Self::with_mapper(GcpResourceMapper)
    }
}

impl Default for ResourceIdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ResourceMapper> ResourceIdentityResolver<M> {
    /// A resolver using the default convention and the given mapper.
    pub fn with_mapper(mapper: M) -> Self {
        ResourceIdentityResolver {
            convention: MappingConvention::default(),
            mapper,
        }
    }

    /// Replaces the mapping convention.
    pub fn with_convention(mut self, convention: MappingConvention) -> Self {
        otel_debug!(
            name: "MonitoredResource.Convention",
            mapping_key = convention.mapping_key(),
            label_prefix = convention.label_prefix()
        );
        self.convention = convention;
        self
    }

    /// The mapping convention in use.
    pub fn convention(&self) -> &MappingConvention {
        &self.convention
    }

    /// Resolves the monitored resource for Cloud Monitoring.
    pub fn resolve(&self, attrs: &dyn ResourceAttributes) -> MonitoredResource {
        self.resolve_for(Target::Monitoring, attrs)
    }

    /// Resolves the monitored resource for `target`.
    ///
    /// The override, when present, is the same for every target; only the
    /// mapper fallback depends on it.
    pub fn resolve_for(
        &self,
        target: Target,
        attrs: &dyn ResourceAttributes,
    ) -> MonitoredResource {
        self.custom_resource(attrs)
            .unwrap_or_else(|| self.default_resource(target, attrs))
    }

    /// Maps the attributes with the configured mapper, ignoring any override.
    pub fn default_resource(
        &self,
        target: Target,
        attrs: &dyn ResourceAttributes,
    ) -> MonitoredResource {
        let resource = self.mapper.to_monitored_resource(target, attrs);
        debug_assert!(
            !resource.resource_type().is_empty(),
            "resource mapper returned an empty monitored resource type"
        );
        resource
    }

    /// Builds the monitored resource explicitly requested by the attributes, if any.
    ///
    /// Returns `None` when the mapping key is absent or empty.
    pub fn custom_resource(&self, attrs: &dyn ResourceAttributes) -> Option<MonitoredResource> {
        let resource_type = attrs
            .get_string(self.convention.mapping_key())
            .filter(|value| !value.is_empty())?
            .into_owned();

        let prefix = self.convention.labels_prefix(&resource_type);
        let labels: Labels = attrs
            .string_attributes()
            .filter(|(key, _)| *key != self.convention.mapping_key())
            .filter_map(|(key, value)| {
                // a key equal to the prefix carries no label name
                if key.len() > prefix.len() && key.starts_with(prefix.as_str()) {
                    Some((key[prefix.len()..].to_string(), value.into_owned()))
                } else {
                    None
                }
            })
            .collect();

        Some(MonitoredResource::new(resource_type, labels))
    }
}
