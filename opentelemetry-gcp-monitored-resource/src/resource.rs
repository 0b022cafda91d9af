use serde::Serialize;
use std::collections::HashMap;

/// Labels attached to a monitored resource or to exported points.
pub type Labels = HashMap<String, String>;

/// A Google Cloud monitored resource: what a piece of telemetry is about.
///
/// The backend groups and routes data by `type` and the handful of `labels`
/// that type defines, e.g. `k8s_pod` with `location`, `cluster_name`,
/// `namespace_name` and `pod_name`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MonitoredResource {
    /// Monitored resource type, such as `gce_instance` or `generic_node`.
    pub r#type: String,
    /// Labels defined by the monitored resource type.
    pub labels: Labels,
}

impl MonitoredResource {
    /// Creates a monitored resource from its type and labels.
    pub fn new(r#type: impl Into<String>, labels: Labels) -> Self {
        MonitoredResource {
            r#type: r#type.into(),
            labels,
        }
    }

    /// The monitored resource type.
    pub fn resource_type(&self) -> &str {
        &self.r#type
    }

    /// Returns the value of a single label.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}
