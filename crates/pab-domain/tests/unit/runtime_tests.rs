//! Unit tests for the runtime type value object

use pab_domain::{AuthScheme, RuntimeType};

#[test]
fn test_runtime_type_parses_common_spellings() {
    for input in ["web-api", "WebApi", "web_api", "WEBAPI", "api"] {
        assert_eq!(input.parse::<RuntimeType>().unwrap(), RuntimeType::WebApi);
    }
    for input in ["web-app", "WebApp", "web_app", "app"] {
        assert_eq!(input.parse::<RuntimeType>().unwrap(), RuntimeType::WebApp);
    }
}

#[test]
fn test_runtime_type_rejects_unknown_values() {
    let err = "desktop".parse::<RuntimeType>().unwrap_err();
    assert!(err.to_string().contains("desktop"));
}

#[test]
fn test_runtime_type_serde_is_kebab_case() {
    let json = serde_json::to_string(&RuntimeType::WebApi).unwrap();
    assert_eq!(json, "\"web-api\"");

    let parsed: RuntimeType = serde_json::from_str("\"web-app\"").unwrap();
    assert_eq!(parsed, RuntimeType::WebApp);

    let alias: RuntimeType = serde_json::from_str("\"WebApp\"").unwrap();
    assert_eq!(alias, RuntimeType::WebApp);
}

#[test]
fn test_auth_scheme_follows_runtime_type() {
    assert_eq!(RuntimeType::WebApi.auth_scheme(), AuthScheme::Bearer);
    assert_eq!(RuntimeType::WebApp.auth_scheme(), AuthScheme::Cookie);
    assert!(RuntimeType::WebApi.is_web_api());
    assert!(RuntimeType::WebApp.is_web_app());
}

#[test]
fn test_display_round_trips_through_from_str() {
    for runtime in RuntimeType::ALL {
        assert_eq!(runtime.to_string().parse::<RuntimeType>().unwrap(), runtime);
    }
}
