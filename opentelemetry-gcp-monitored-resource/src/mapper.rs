//! Heuristic mapping from OpenTelemetry resource attributes to monitored resources.
//!
//! Cloud Monitoring and Cloud Logging recognize different monitored resource
//! vocabularies, so every mapping is asked for a specific [`Target`].
use crate::attributes::ResourceAttributes;
use crate::resource::{Labels, MonitoredResource};
use opentelemetry_semantic_conventions::resource::{
    CLOUD_ACCOUNT_ID, CLOUD_AVAILABILITY_ZONE, CLOUD_PLATFORM, CLOUD_REGION, FAAS_INSTANCE,
    FAAS_NAME, FAAS_VERSION, HOST_ID, HOST_NAME, K8S_CLUSTER_NAME, K8S_CONTAINER_NAME,
    K8S_NAMESPACE_NAME, K8S_NODE_NAME, K8S_POD_NAME, SERVICE_INSTANCE_ID, SERVICE_NAME,
    SERVICE_NAMESPACE,
};

/// The backend a monitored resource is produced for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Target {
    /// Cloud Monitoring (metrics and traces).
    #[default]
    Monitoring,
    /// Cloud Logging.
    Logging,
}

/// Infers a monitored resource from generic resource attributes.
///
/// Implementations must be total: a resource that fits no specific type is
/// mapped to a generic fallback instead of failing. The returned resource
/// must have a non-empty type; debug builds of
/// [`ResourceIdentityResolver`](crate::ResourceIdentityResolver) assert it.
pub trait ResourceMapper: Send + Sync {
    /// Maps `attrs` to a monitored resource understood by `target`.
    fn to_monitored_resource(
        &self,
        target: Target,
        attrs: &dyn ResourceAttributes,
    ) -> MonitoredResource;
}

impl<F> ResourceMapper for F
where
    F: Fn(Target, &dyn ResourceAttributes) -> MonitoredResource + Send + Sync,
{
    fn to_monitored_resource(
        &self,
        target: Target,
        attrs: &dyn ResourceAttributes,
    ) -> MonitoredResource {
        self(target, attrs)
    }
}

// cloud.platform values
const GCP_COMPUTE_ENGINE: &str = "gcp_compute_engine";
const GCP_APP_ENGINE: &str = "gcp_app_engine";
const GCP_CLOUD_RUN: &str = "gcp_cloud_run";
const GCP_CLOUD_FUNCTIONS: &str = "gcp_cloud_functions";
const AWS_EC2: &str = "aws_ec2";

const UNKNOWN_SERVICE_PREFIX: &str = "unknown_service";

/// Where a single monitored resource label takes its value from.
#[derive(Debug)]
struct LabelSource {
    label: &'static str,
    /// Attribute keys tried in order; the first non-empty one wins.
    keys: &'static [&'static str],
    fallback: &'static str,
}

const fn label(label: &'static str, keys: &'static [&'static str]) -> LabelSource {
    LabelSource {
        label,
        keys,
        fallback: "",
    }
}

const LOCATION: LabelSource = LabelSource {
    label: "location",
    keys: &[CLOUD_AVAILABILITY_ZONE, CLOUD_REGION],
    fallback: "global",
};

#[derive(Debug)]
struct ResourceType {
    name: &'static str,
    labels: &'static [LabelSource],
}

static GCE_INSTANCE: ResourceType = ResourceType {
    name: "gce_instance",
    labels: &[
        label("zone", &[CLOUD_AVAILABILITY_ZONE]),
        label("instance_id", &[HOST_ID]),
    ],
};

static GAE_INSTANCE: ResourceType = ResourceType {
    name: "gae_instance",
    labels: &[
        LOCATION,
        label("module_id", &[FAAS_NAME]),
        label("version_id", &[FAAS_VERSION]),
        label("instance_id", &[FAAS_INSTANCE]),
    ],
};

static GAE_APP: ResourceType = ResourceType {
    name: "gae_app",
    labels: &[
        label("module_id", &[FAAS_NAME]),
        label("version_id", &[FAAS_VERSION]),
        label("zone", &[CLOUD_AVAILABILITY_ZONE, CLOUD_REGION]),
    ],
};

static CLOUD_RUN_REVISION: ResourceType = ResourceType {
    name: "cloud_run_revision",
    labels: &[
        label("location", &[CLOUD_REGION]),
        label("service_name", &[FAAS_NAME]),
        label("configuration_name", &[FAAS_NAME]),
        label("revision_name", &[FAAS_VERSION]),
    ],
};

static CLOUD_FUNCTION: ResourceType = ResourceType {
    name: "cloud_function",
    labels: &[
        label("region", &[CLOUD_REGION]),
        label("function_name", &[FAAS_NAME]),
    ],
};

static AWS_EC2_INSTANCE: ResourceType = ResourceType {
    name: "aws_ec2_instance",
    labels: &[
        label("instance_id", &[HOST_ID]),
        label("region", &[CLOUD_AVAILABILITY_ZONE, CLOUD_REGION]),
        label("aws_account", &[CLOUD_ACCOUNT_ID]),
    ],
};

static K8S_CONTAINER: ResourceType = ResourceType {
    name: "k8s_container",
    labels: &[
        LOCATION,
        label("cluster_name", &[K8S_CLUSTER_NAME]),
        label("namespace_name", &[K8S_NAMESPACE_NAME]),
        label("pod_name", &[K8S_POD_NAME]),
        label("container_name", &[K8S_CONTAINER_NAME]),
    ],
};

static K8S_POD: ResourceType = ResourceType {
    name: "k8s_pod",
    labels: &[
        LOCATION,
        label("cluster_name", &[K8S_CLUSTER_NAME]),
        label("namespace_name", &[K8S_NAMESPACE_NAME]),
        label("pod_name", &[K8S_POD_NAME]),
    ],
};

static K8S_NODE: ResourceType = ResourceType {
    name: "k8s_node",
    labels: &[
        LOCATION,
        label("cluster_name", &[K8S_CLUSTER_NAME]),
        label("node_name", &[K8S_NODE_NAME]),
    ],
};

static K8S_CLUSTER: ResourceType = ResourceType {
    name: "k8s_cluster",
    labels: &[LOCATION, label("cluster_name", &[K8S_CLUSTER_NAME])],
};

static GENERIC_TASK: ResourceType = ResourceType {
    name: "generic_task",
    labels: &[
        LOCATION,
        label("namespace", &[SERVICE_NAMESPACE]),
        label("job", &[SERVICE_NAME, FAAS_NAME]),
        label("task_id", &[SERVICE_INSTANCE_ID, FAAS_INSTANCE]),
    ],
};

static GENERIC_NODE: ResourceType = ResourceType {
    name: "generic_node",
    labels: &[
        LOCATION,
        label("namespace", &[SERVICE_NAMESPACE]),
        label("node_id", &[HOST_ID, HOST_NAME]),
    ],
};

/// Maps resources to monitored resources using OpenTelemetry semantic conventions.
///
/// Well known platforms (`cloud.platform`) and Kubernetes attributes are
/// mapped to their dedicated resource types; everything else becomes a
/// `generic_task` when it identifies a job and a task, or a `generic_node`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GcpResourceMapper;

impl GcpResourceMapper {
    fn classify(&self, target: Target, attrs: &dyn ResourceAttributes) -> &'static ResourceType {
        let platform = attrs.get_string(CLOUD_PLATFORM).unwrap_or_default();
        match (&*platform, target) {
            (GCP_COMPUTE_ENGINE, _) => &GCE_INSTANCE,
            (GCP_APP_ENGINE, Target::Monitoring) => &GAE_INSTANCE,
            (GCP_APP_ENGINE, Target::Logging) => &GAE_APP,
            (GCP_CLOUD_RUN, Target::Logging) => &CLOUD_RUN_REVISION,
            (GCP_CLOUD_FUNCTIONS, Target::Logging) => &CLOUD_FUNCTION,
            (AWS_EC2, _) => &AWS_EC2_INSTANCE,
            _ if has(attrs, K8S_CLUSTER_NAME) => {
                if has(attrs, K8S_CONTAINER_NAME) {
                    &K8S_CONTAINER
                } else if has(attrs, K8S_POD_NAME) {
                    &K8S_POD
                } else if has(attrs, K8S_NODE_NAME) {
                    &K8S_NODE
                } else {
                    &K8S_CLUSTER
                }
            }
            _ if (has(attrs, SERVICE_NAME) && has(attrs, SERVICE_INSTANCE_ID))
                || (has(attrs, FAAS_NAME) && has(attrs, FAAS_INSTANCE)) =>
            {
                &GENERIC_TASK
            }
            _ => &GENERIC_NODE,
        }
    }
}

impl ResourceMapper for GcpResourceMapper {
    fn to_monitored_resource(
        &self,
        target: Target,
        attrs: &dyn ResourceAttributes,
    ) -> MonitoredResource {
        let resource_type = self.classify(target, attrs);
        let labels: Labels = resource_type
            .labels
            .iter()
            .map(|source| (source.label.to_string(), label_value(source, attrs)))
            .collect();
        MonitoredResource::new(resource_type.name, labels)
    }
}

fn has(attrs: &dyn ResourceAttributes, key: &str) -> bool {
    attrs.get_string(key).is_some()
}

fn label_value(source: &LabelSource, attrs: &dyn ResourceAttributes) -> String {
    let found = source.keys.iter().find_map(|key| {
        attrs
            .get_string(key)
            .filter(|value| !value.is_empty())
            // SDK default service names say nothing about the job, prefer the next key
            .filter(|value| *key != SERVICE_NAME || !value.starts_with(UNKNOWN_SERVICE_PREFIX))
    });
    match found {
        Some(value) => value.into_owned(),
        None if source.keys.contains(&SERVICE_NAME) => attrs
            .get_string(SERVICE_NAME)
            .filter(|value| !value.is_empty())
            .map(|value| value.into_owned())
            .unwrap_or_else(|| source.fallback.to_string()),
        None => source.fallback.to_string(),
    }
}
