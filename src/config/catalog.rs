//! Built-in default services and stacks.
//!
//! The catalog seeds `config.yml` on first run and backfills any service or
//! stack the user's file does not mention. It is built once and never mutated.

use super::model::{Service, Stack};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Default service and stack definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub services: BTreeMap<String, Service>,
    pub stacks: BTreeMap<String, Stack>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    services: default_services(),
    stacks: default_stacks(),
});

/// The process-wide default catalog.
pub fn defaults() -> &'static Catalog {
    &CATALOG
}

fn service(name: &str, image: &str, version: &str, ports: &[u16]) -> Service {
    Service {
        name: name.to_string(),
        image: image.to_string(),
        version: version.to_string(),
        exposed_ports: ports.to_vec(),
        network_alias: name.to_string(),
        ..Service::default()
    }
}

fn from_source(mut service: Service, repository: &str) -> Service {
    service.build_branch = Some("master".to_string());
    service.build_repository = Some(repository.to_string());
    service
}

fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_services() -> BTreeMap<String, Service> {
    let mut elasticsearch = from_source(
        service(
            "elasticsearch",
            "docker.elastic.co/elasticsearch/elasticsearch",
            "7.2.0",
            &[9200],
        ),
        "elastic/elasticsearch",
    );
    elasticsearch.env = env(&[
        ("bootstrap.memory_lock", "true"),
        ("discovery.type", "single-node"),
        ("ES_JAVA_OPTS", "-Xms512m -Xmx512m"),
        ("xpack.security.enabled", "true"),
    ]);

    let mut mysql = service("mysql", "mysql", "latest", &[3306]);
    mysql.env = env(&[("MYSQL_ROOT_PASSWORD", "secret")]);

    [
        service("apache", "httpd", "2.4", &[80]),
        from_source(
            service(
                "apm-server",
                "docker.elastic.co/apm/apm-server",
                "7.2.0",
                &[6060, 8200],
            ),
            "elastic/apm-server",
        ),
        elasticsearch,
        service("kafka", "wurstmeister/kafka", "latest", &[9092]),
        from_source(
            service("kibana", "docker.elastic.co/kibana/kibana", "7.2.0", &[5601]),
            "elastic/kibana",
        ),
        from_source(
            service("metricbeat", "docker.elastic.co/beats/metricbeat", "7.2.0", &[]),
            "elastic/beats",
        ),
        service("mongodb", "mongo", "latest", &[27017]),
        mysql,
        service("redis", "redis", "latest", &[6379]),
    ]
    .into_iter()
    .map(|s| (s.name.clone(), s))
    .collect()
}

fn default_stacks() -> BTreeMap<String, Stack> {
    [
        ("apm-server", "APM Server"),
        ("apm-agents", "APM Agents"),
        ("observability", "Observability"),
    ]
    .into_iter()
    .map(|(key, name)| {
        (
            key.to_string(),
            Stack {
                name: name.to_string(),
                services: BTreeMap::new(),
            },
        )
    })
    .collect()
}
