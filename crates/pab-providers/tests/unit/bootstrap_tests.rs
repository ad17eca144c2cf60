//! End-to-end bootstrap of the linked provider modules

use pab_domain::ports::providers::{BlobStorage, MessagePublisher, SecretStore};
use pab_domain::{AuthScheme, ProviderInstances, RuntimeType};
use pab_infrastructure::config::{ConfigBuilder, ConfigLoader};
use pab_infrastructure::di::{Bootstrap, list_providers};
use pab_providers::messaging::{InProcessMessagingModule, InProcessMessagingSettings};
use pab_providers::secrets::{EnvSecretsModule, EnvSecretsSettings};
use pab_providers::storage::{InMemoryStorageModule, InMemoryStorageSettings};
use std::fs;

#[test]
fn test_linked_providers_are_listed() {
    let markers: Vec<String> = list_providers()
        .into_iter()
        .map(|(marker, _, _)| marker.to_string())
        .collect();
    assert_eq!(
        markers,
        ["storage:in-memory", "messaging:in-process", "secrets:env"]
    );
}

#[tokio::test]
async fn test_bootstrap_from_builder() {
    let config = ConfigBuilder::new()
        .with_runtime_type(RuntimeType::WebApi)
        .with_provider_section(
            "storage",
            &ProviderInstances::new().with_instance("default", InMemoryStorageSettings::new("uploads")),
        )
        .unwrap()
        .with_provider_section(
            "secrets",
            &ProviderInstances::new().with_instance(
                "default",
                EnvSecretsSettings {
                    prefix: "CARGO_PKG_".to_string(),
                },
            ),
        )
        .unwrap()
        .build_loaded();

    let host = Bootstrap::new(config).init().unwrap();
    assert_eq!(
        host.registered(),
        &[InMemoryStorageModule::MARKER, EnvSecretsModule::MARKER]
    );
    assert!(
        host.registered_instances()
            .iter()
            .all(|record| record.auth_scheme == AuthScheme::Bearer)
    );

    let provider = host.build();
    let storage = provider.get::<dyn BlobStorage>().unwrap();
    storage.put("a", vec![1]).await.unwrap();
    assert_eq!(storage.list("").await.unwrap(), ["a"]);

    let secrets = provider.get::<dyn SecretStore>().unwrap();
    assert!(secrets.get_secret("name").await.unwrap().is_some());
    assert!(!provider.contains::<dyn MessagePublisher>());
}

#[tokio::test]
async fn test_bootstrap_from_toml_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("pab.toml");
    fs::write(
        &path,
        r#"
[runtime]
type = "web-app"

[providers.messaging.instances.default]
capacity = 16

[providers.messaging.instances.audit]
topic_prefix = "audit."
"#,
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("PAB_PROVIDER_TESTS_UNSET")
        .load()
        .unwrap();
    let host = Bootstrap::new(config).init().unwrap();
    assert_eq!(host.registered(), &[InProcessMessagingModule::MARKER]);
    assert_eq!(host.context().auth_scheme(), AuthScheme::Cookie);

    let provider = host.build();
    let publisher = provider.get::<dyn MessagePublisher>().unwrap();
    assert_eq!(publisher.publish("nobody", vec![]).await.unwrap(), 0);
    assert!(provider.contains_keyed::<dyn MessagePublisher>("audit"));
}

#[test]
fn test_invalid_instance_aborts_bootstrap() {
    let config = ConfigBuilder::new()
        .with_runtime_type(RuntimeType::WebApi)
        .with_provider_section(
            "messaging",
            &ProviderInstances::new().with_instance(
                "default",
                InProcessMessagingSettings {
                    capacity: 0,
                    topic_prefix: None,
                },
            ),
        )
        .unwrap()
        .build_loaded();

    let err = Bootstrap::new(config).init().err().unwrap();
    assert!(err.to_string().contains("capacity"));
}
