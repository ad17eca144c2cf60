//! In-memory blob storage tests

use pab_domain::error::Error;
use pab_domain::{InstanceSettings, ProviderInstances, RuntimeType};
use pab_infrastructure::di::{ProviderContext, ProviderRegistrationExt, ServiceCollection};
use pab_providers::storage::{
    BlobStorage, InMemoryBlobStorage, InMemoryStorageModule, InMemoryStorageSettings,
};

#[tokio::test]
async fn test_put_get_delete() {
    let storage = InMemoryBlobStorage::new("uploads");
    storage.put("a.txt", b"hello".to_vec()).await.unwrap();

    assert_eq!(storage.get("a.txt").await.unwrap(), Some(b"hello".to_vec()));
    assert!(storage.exists("a.txt").await.unwrap());
    assert!(storage.delete("a.txt").await.unwrap());
    assert!(!storage.delete("a.txt").await.unwrap());
    assert_eq!(storage.get("a.txt").await.unwrap(), None);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_put_replaces_existing_blob() {
    let storage = InMemoryBlobStorage::new("uploads");
    storage.put("k", vec![1]).await.unwrap();
    storage.put("k", vec![2, 3]).await.unwrap();

    assert_eq!(storage.get("k").await.unwrap(), Some(vec![2, 3]));
    assert_eq!(storage.len(), 1);
}

#[tokio::test]
async fn test_list_filters_by_prefix_and_sorts() {
    let storage = InMemoryBlobStorage::new("uploads");
    for name in ["img/b.png", "doc/x.pdf", "img/a.png"] {
        storage.put(name, Vec::new()).await.unwrap();
    }

    assert_eq!(storage.list("img/").await.unwrap(), ["img/a.png", "img/b.png"]);
    assert_eq!(storage.list("").await.unwrap().len(), 3);
    assert!(storage.list("video/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversize_blob_is_rejected() {
    let settings = InMemoryStorageSettings {
        container: "small".to_string(),
        max_blob_bytes: Some(4),
    };
    let storage = InMemoryBlobStorage::from_settings(&settings);

    storage.put("fits", vec![0; 4]).await.unwrap();
    let err = storage.put("too-big", vec![0; 5]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(!storage.exists("too-big").await.unwrap());
}

#[tokio::test]
async fn test_empty_blob_name_is_rejected() {
    let storage = InMemoryBlobStorage::new("uploads");
    assert!(storage.put("", vec![1]).await.is_err());
    assert!(storage.get("").await.is_err());
}

#[test]
fn test_settings_validation() {
    assert!(InMemoryStorageSettings::new("uploads").validate().is_ok());
    assert!(InMemoryStorageSettings::new("  ").validate().is_err());

    let zero = InMemoryStorageSettings {
        max_blob_bytes: Some(0),
        ..InMemoryStorageSettings::new("uploads")
    };
    assert!(zero.validate().is_err());
}

#[test]
fn test_settings_deserialize_without_limit() {
    let settings: InMemoryStorageSettings =
        serde_json::from_value(serde_json::json!({ "container": "uploads" })).unwrap();
    assert_eq!(settings, InMemoryStorageSettings::new("uploads"));
}

#[tokio::test]
async fn test_instances_are_isolated() {
    let services = ServiceCollection::new();
    let settings = ProviderInstances::new()
        .with_instance("default", InMemoryStorageSettings::new("uploads"))
        .with_instance("archive", InMemoryStorageSettings::new("archive"));
    services
        .add_provider(
            &InMemoryStorageModule,
            &ProviderContext::new(RuntimeType::WebApi),
            &settings,
        )
        .unwrap();

    let provider = services.build();
    let default = provider.get::<dyn BlobStorage>().unwrap();
    let archive = provider.get_keyed::<dyn BlobStorage>("archive").unwrap();
    assert_eq!(default.container(), "uploads");
    assert_eq!(archive.container(), "archive");
    assert_eq!(archive.provider_name(), "in-memory");

    default.put("shared", vec![1]).await.unwrap();
    assert!(!archive.exists("shared").await.unwrap());
}
