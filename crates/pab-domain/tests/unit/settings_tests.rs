//! Unit tests for provider settings contracts

use pab_domain::ports::settings::validate_instances;
use pab_domain::{Error, InstanceSettings, ProviderInstances, ProviderSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BucketSettings {
    bucket: String,
}

impl InstanceSettings for BucketSettings {
    fn validate(&self) -> Result<(), String> {
        if self.bucket.is_empty() {
            return Err("bucket cannot be empty".to_string());
        }
        Ok(())
    }
}

fn bucket(name: &str) -> BucketSettings {
    BucketSettings {
        bucket: name.to_string(),
    }
}

#[test]
fn test_instances_deserialize_from_lowercase_key() {
    let json = serde_json::json!({
        "instances": {
            "primary": { "bucket": "uploads" },
            "secondary": { "bucket": "archive" }
        }
    });
    let settings: ProviderInstances<BucketSettings> = serde_json::from_value(json).unwrap();
    assert_eq!(settings.len(), 2);
    assert_eq!(settings.instance("primary"), Some(&bucket("uploads")));
}

#[test]
fn test_instances_accept_capitalised_alias() {
    let json = serde_json::json!({ "Instances": { "Primary": { "bucket": "a" } } });
    let settings: ProviderInstances<BucketSettings> = serde_json::from_value(json).unwrap();
    assert_eq!(settings.instance("Primary"), Some(&bucket("a")));
}

#[test]
fn test_missing_instances_key_is_empty() {
    let settings: ProviderInstances<BucketSettings> =
        serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(settings.is_empty());
}

#[test]
fn test_instances_iterate_in_name_order() {
    let settings = ProviderInstances::new()
        .with_instance("zeta", bucket("z"))
        .with_instance("alpha", bucket("a"));
    let names: Vec<&str> = settings.instances().keys().map(String::as_str).collect();
    assert_eq!(names, ["alpha", "zeta"]);
}

#[test]
fn test_validate_instances_reports_first_failure_by_name() {
    let settings = ProviderInstances::new()
        .with_instance("b-broken", bucket(""))
        .with_instance("a-broken", bucket(""))
        .with_instance("ok", bucket("fine"));

    match validate_instances("storage:s3", &settings) {
        Err(Error::Validation {
            provider,
            instance,
            message,
        }) => {
            assert_eq!(provider, "storage:s3");
            assert_eq!(instance, "a-broken");
            assert_eq!(message, "bucket cannot be empty");
        }
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

#[test]
fn test_validate_instances_accepts_valid_settings() {
    let settings = ProviderInstances::new().with_instance("primary", bucket("uploads"));
    assert!(validate_instances("storage:s3", &settings).is_ok());
}
