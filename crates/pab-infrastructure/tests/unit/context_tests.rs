//! Tests for the runtime type cell and provider context

use pab_domain::error::Error;
use pab_domain::{AuthScheme, RuntimeType};
use pab_infrastructure::di::{ProviderContext, RuntimeTypeCell};
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_get_before_set_fails() {
    let cell = RuntimeTypeCell::new();
    assert!(!cell.is_configured());
    assert!(matches!(
        cell.get_runtime_type(),
        Err(Error::RuntimeTypeNotConfigured)
    ));
    assert!(cell.context().is_err());
}

#[test]
fn test_set_then_get() {
    let cell = RuntimeTypeCell::new();
    cell.set_runtime_type(RuntimeType::WebApi).unwrap();

    assert!(cell.is_configured());
    assert_eq!(cell.get_runtime_type().unwrap(), RuntimeType::WebApi);
    assert_eq!(cell.context().unwrap().auth_scheme(), AuthScheme::Bearer);
}

#[test]
fn test_second_set_fails_even_with_same_value() {
    let cell = RuntimeTypeCell::new();
    cell.set_runtime_type(RuntimeType::WebApp).unwrap();

    let same = cell.set_runtime_type(RuntimeType::WebApp).unwrap_err();
    assert!(matches!(
        same,
        Error::RuntimeTypeAlreadyConfigured {
            current: RuntimeType::WebApp
        }
    ));

    let other = cell.set_runtime_type(RuntimeType::WebApi).unwrap_err();
    assert!(other.is_runtime_type_error());
    assert_eq!(cell.get_runtime_type().unwrap(), RuntimeType::WebApp);
}

#[test]
fn test_cells_are_independent() {
    let api = RuntimeTypeCell::new();
    let app = RuntimeTypeCell::new();
    api.set_runtime_type(RuntimeType::WebApi).unwrap();
    app.set_runtime_type(RuntimeType::WebApp).unwrap();

    assert_eq!(api.get_runtime_type().unwrap(), RuntimeType::WebApi);
    assert_eq!(app.get_runtime_type().unwrap(), RuntimeType::WebApp);
}

#[test]
fn test_concurrent_set_has_exactly_one_winner() {
    let cell = RuntimeTypeCell::new();
    let wins = AtomicUsize::new(0);

    std::thread::scope(|scope| {
        for i in 0..32 {
            let cell = &cell;
            let wins = &wins;
            scope.spawn(move || {
                let value = RuntimeType::ALL[i % RuntimeType::ALL.len()];
                if cell.set_runtime_type(value).is_ok() {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(wins.load(Ordering::SeqCst), 1);
    assert!(cell.get_runtime_type().is_ok());
}

#[test]
fn test_provider_context_follows_runtime_type() {
    let api = ProviderContext::new(RuntimeType::WebApi);
    let app = ProviderContext::new(RuntimeType::WebApp);

    assert_eq!(api.runtime_type(), RuntimeType::WebApi);
    assert_eq!(api.auth_scheme(), AuthScheme::Bearer);
    assert_eq!(app.auth_scheme(), AuthScheme::Cookie);
}
