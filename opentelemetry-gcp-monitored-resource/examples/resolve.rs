//! run with `$ cargo run --example resolve`
use opentelemetry::KeyValue;
use opentelemetry_gcp_monitored_resource::{ResourceLabelsConfig, Target};
use opentelemetry_sdk::Resource;

const CONFIG: &str = r#"
service_resource_labels: true
resource_filters:
  - prefix: "k8s."
    regex: "name$"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ResourceLabelsConfig::from_yaml_str(CONFIG)?;
    let resolver = config.resolver()?;
    let filter = config.label_filter()?;

    let resource = Resource::builder_empty()
        .with_service_name("checkout")
        .with_attributes([
            KeyValue::new("cloud.availability_zone", "europe-west1-b"),
            KeyValue::new("k8s.cluster.name", "prod"),
            KeyValue::new("k8s.namespace.name", "shop"),
            KeyValue::new("k8s.pod.name", "checkout-5c7b"),
            KeyValue::new("k8s.container.name", "app"),
            KeyValue::new("k8s.pod.uid", "3f0c1a"),
        ])
        .build();

    for target in [Target::Monitoring, Target::Logging] {
        let monitored = resolver.resolve_for(target, &resource);
        println!("{target:?}: {monitored:?}");
    }
    println!("labels: {:?}", filter.filter(&resource));

    let forced = Resource::builder_empty()
        .with_attributes([
            KeyValue::new("gcp.resource_type", "generic_node"),
            KeyValue::new("gcp.generic_node.location", "on-prem"),
            KeyValue::new("gcp.generic_node.namespace", "lab"),
            KeyValue::new("gcp.generic_node.node_id", "rack-3"),
        ])
        .build();
    println!("forced: {:?}", resolver.resolve(&forced));

    Ok(())
}
