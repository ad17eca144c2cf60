//! Unit tests for provider kinds and markers

use pab_domain::{ProviderKind, ProviderMarker};
use std::collections::HashSet;

#[test]
fn test_marker_display() {
    let marker = ProviderMarker::new(ProviderKind::Messaging, "in-process");
    assert_eq!(marker.to_string(), "messaging:in-process");
    assert_eq!(marker.kind(), ProviderKind::Messaging);
    assert_eq!(marker.name(), "in-process");
}

#[test]
fn test_marker_parse() {
    let marker: ProviderMarker = "storage:in-memory".parse().unwrap();
    assert_eq!(marker, ProviderMarker::new(ProviderKind::Storage, "in-memory"));

    assert!("storage".parse::<ProviderMarker>().is_err());
    assert!("storage:".parse::<ProviderMarker>().is_err());
    assert!("queue:rabbit".parse::<ProviderMarker>().is_err());
}

#[test]
fn test_markers_hash_as_set_members() {
    let mut set = HashSet::new();
    assert!(set.insert(ProviderMarker::new(ProviderKind::Cache, "moka")));
    assert!(!set.insert(ProviderMarker::dynamic(ProviderKind::Cache, "moka")));
    // Same name under a different kind is a different provider
    assert!(set.insert(ProviderMarker::new(ProviderKind::Database, "moka")));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_provider_kind_parse_is_case_insensitive() {
    for kind in ProviderKind::ALL {
        assert_eq!(kind.as_str().to_uppercase().parse::<ProviderKind>().unwrap(), kind);
    }
}

#[test]
fn test_marker_serde() {
    let marker = ProviderMarker::new(ProviderKind::Secrets, "env");
    let json = serde_json::to_value(&marker).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "secrets", "name": "env" }));
    let back: ProviderMarker = serde_json::from_value(json).unwrap();
    assert_eq!(back, marker);
}
