//! Maps OpenTelemetry resources to Google Cloud monitored resources.
//!
//! Exporters writing to Cloud Monitoring or Cloud Logging need two things
//! from the [`Resource`] attached to a batch of telemetry:
//!
//! - the monitored resource the batch is written against, picked by
//!   [`ResourceIdentityResolver`], and
//! - the labels attached to every exported point, picked by
//!   [`AttributeLabelFilter`].
//!
//! Both are pure functions of the resource attributes and can be shared
//! freely between threads.
//!
//! ## Forcing a monitored resource
//!
//! A resource carrying `gcp.resource_type = "<type>"` is written against
//! monitored resource `<type>`, with every `gcp.<type>.<label>` attribute
//! becoming label `<label>`. Resources without it are classified by a
//! [`ResourceMapper`], [`GcpResourceMapper`] unless another one is given.
//!
//! ```rust
//! use opentelemetry::KeyValue;
//! use opentelemetry_gcp_monitored_resource::{
//!     AttributeLabelFilter, ResourceIdentityResolver, Target,
//! };
//! use opentelemetry_sdk::Resource;
//!
//! let resource = Resource::builder_empty()
//!     .with_service_name("orders")
//!     .with_attributes([
//!         KeyValue::new("service.instance.id", "orders-1"),
//!         KeyValue::new("cloud.region", "us-east1"),
//!     ])
//!     .build();
//!
//! let resolver = ResourceIdentityResolver::new();
//! let monitored = resolver.resolve_for(Target::Monitoring, &resource);
//! assert_eq!(monitored.resource_type(), "generic_task");
//! assert_eq!(monitored.label("job"), Some("orders"));
//!
//! let filter = AttributeLabelFilter::builder()
//!     .with_rule("cloud.", "region")
//!     .build()
//!     .unwrap();
//! let labels = filter.filter(&resource);
//! assert_eq!(labels.len(), 3);
//! ```
//!
//! ## Configuration
//!
//! [`ResourceLabelsConfig`] reads both components' settings from YAML; see
//! the [`config`] module.
//!
//! [`Resource`]: opentelemetry_sdk::Resource

#![warn(missing_debug_implementations, missing_docs)]

mod attributes;
pub mod config;
mod error;
mod filter;
mod mapper;
mod resolver;
mod resource;

pub use attributes::ResourceAttributes;
pub use config::{MappingConfig, ResourceFilter, ResourceLabelsConfig};
pub use error::{Error, Result};
pub use filter::{
    AttributeLabelFilter, AttributeLabelFilterBuilder, FilterRule, SERVICE_LABEL_KEYS,
};
pub use mapper::{GcpResourceMapper, ResourceMapper, Target};
pub use resolver::{
    MappingConvention, ResourceIdentityResolver, DEFAULT_LABEL_PREFIX, DEFAULT_MAPPING_KEY,
};
pub use resource::{Labels, MonitoredResource};
