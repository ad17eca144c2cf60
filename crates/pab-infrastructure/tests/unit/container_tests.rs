//! Tests for the service container

use pab_domain::Error;
use pab_infrastructure::di::{ServiceCollection, ServiceLifetime};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

#[test]
fn test_singleton_instance_resolves_same_value() {
    let services = ServiceCollection::new();
    services.add_singleton(Arc::new(String::from("hello"))).unwrap();

    let provider = services.build();
    let a = provider.get::<String>().unwrap();
    let b = provider.get::<String>().unwrap();
    assert_eq!(*a, "hello");
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_trait_objects_can_be_registered() {
    let services = ServiceCollection::new();
    services.add_singleton::<dyn Clock>(Arc::new(FixedClock(42))).unwrap();
    assert!(services.contains::<dyn Clock>());
    assert!(!services.contains::<FixedClock>());

    let provider = services.build();
    assert_eq!(provider.get::<dyn Clock>().unwrap().now(), 42);
}

#[test]
fn test_keyed_registrations_are_independent() {
    let services = ServiceCollection::new();
    services.add_keyed_singleton::<dyn Clock>("primary", Arc::new(FixedClock(1))).unwrap();
    services.add_keyed_singleton::<dyn Clock>("secondary", Arc::new(FixedClock(2))).unwrap();

    assert!(services.contains_keyed::<dyn Clock>("primary"));
    assert!(!services.contains::<dyn Clock>());

    let provider = services.build();
    assert_eq!(provider.get_keyed::<dyn Clock>("secondary").unwrap().now(), 2);

    let all = provider.get_all_keyed::<dyn Clock>().unwrap();
    let summary: Vec<(String, u64)> = all.iter().map(|(n, c)| (n.clone(), c.now())).collect();
    assert_eq!(
        summary,
        [("primary".to_string(), 1), ("secondary".to_string(), 2)]
    );
}

#[test]
fn test_add_replaces_and_try_add_keeps_existing() {
    let services = ServiceCollection::new();
    services.add_singleton(Arc::new(1_u32)).unwrap();
    services.add_singleton(Arc::new(2_u32)).unwrap();
    assert!(!services.try_add_singleton(Arc::new(3_u32)));
    assert!(services.try_add_singleton(Arc::new(4_i64)));
    assert_eq!(services.len(), 2);

    let provider = services.build();
    assert_eq!(*provider.get::<u32>().unwrap(), 2);
    assert_eq!(*provider.get::<i64>().unwrap(), 4);
}

#[test]
fn test_missing_service_is_not_found() {
    let provider = ServiceCollection::new().build();
    assert!(matches!(provider.get::<String>(), Err(Error::NotFound { .. })));
    assert!(provider.try_get::<String>().unwrap().is_none());
    assert!(provider.is_empty());
}

#[test]
fn test_singleton_factory_runs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let services = ServiceCollection::new();
    let counter = calls.clone();
    services.add_singleton_factory(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(String::from("lazy")))
    })
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let provider = services.build();
    let a = provider.get::<String>().unwrap();
    let b = provider.get::<String>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_transient_factory_runs_per_resolution() {
    let services = ServiceCollection::new();
    services.add_transient(|_| Ok(Arc::new(Vec::<u8>::new()))).unwrap();

    let provider = services.build();
    let a = provider.get::<Vec<u8>>().unwrap();
    let b = provider.get::<Vec<u8>>().unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_factories_can_resolve_dependencies() {
    let services = ServiceCollection::new();
    services.add_singleton(Arc::new(10_u64)).unwrap();
    services.add_singleton_factory::<dyn Clock, _>(|provider| {
        let base = provider.get::<u64>()?;
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(*base * 2));
        Ok(clock)
    })
    .unwrap();

    let provider = services.build();
    assert_eq!(provider.get::<dyn Clock>().unwrap().now(), 20);
}

#[test]
fn test_factory_errors_propagate() {
    let services = ServiceCollection::new();
    services.add_singleton_factory::<String, _>(|_| Err(Error::internal("boom"))).unwrap();

    let provider = services.build();
    assert!(matches!(provider.get::<String>(), Err(Error::Internal { .. })));
    assert!(provider.try_get::<String>().is_err());
}

#[test]
fn test_get_singleton_ignores_factories() {
    let services = ServiceCollection::new();
    services.add_singleton(Arc::new(5_u8)).unwrap();
    services.add_singleton_factory(|_| Ok(Arc::new(String::from("f")))).unwrap();

    assert_eq!(services.get_singleton::<u8>().as_deref(), Some(&5));
    assert!(services.get_singleton::<String>().is_none());
}

#[test]
fn test_descriptors_summarise_registrations() {
    let services = ServiceCollection::new();
    services.add_keyed_singleton("b", Arc::new(1_u16)).unwrap();
    services.add_transient(|_| Ok(Arc::new(1_u16))).unwrap();

    let infos = services.descriptors();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].name, None);
    assert_eq!(infos[0].lifetime, ServiceLifetime::Transient);
    assert!(!infos[0].instance);
    assert_eq!(infos[1].name.as_deref(), Some("b"));
    assert!(infos[1].instance);
}

#[test]
fn test_get_or_add_singleton_returns_one_instance_across_threads() {
    let services = ServiceCollection::new();
    let values: Vec<Arc<AtomicUsize>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                scope.spawn(|| {
                    services
                        .get_or_add_singleton(|| Arc::new(AtomicUsize::new(0)))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(services.len(), 1);
}

#[test]
fn test_try_add_keyed_singleton_keeps_first_value() {
    let services = ServiceCollection::new();
    assert!(services.try_add_keyed_singleton("eu", Arc::new(String::from("first"))));
    assert!(!services.try_add_keyed_singleton("eu", Arc::new(String::from("second"))));
    assert!(services.try_add_keyed_singleton("us", Arc::new(String::from("other"))));

    let provider = services.build();
    assert_eq!(*provider.get_keyed::<String>("eu").unwrap(), "first");
    assert_eq!(*provider.get_keyed::<String>("us").unwrap(), "other");
    assert!(!provider.contains::<String>());
}

#[test]
fn test_keyed_singleton_factory_runs_once_per_name() {
    let calls = Arc::new(AtomicUsize::new(0));
    let services = ServiceCollection::new();
    for (name, tick) in [("fast", 1_u64), ("slow", 60)] {
        let counter = calls.clone();
        services
            .add_keyed_singleton_factory::<dyn Clock, _>(name, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                let clock: Arc<dyn Clock> = Arc::new(FixedClock(tick));
                Ok(clock)
            })
            .unwrap();
    }

    let provider = services.build();
    let a = provider.get_keyed::<dyn Clock>("slow").unwrap();
    let b = provider.get_keyed::<dyn Clock>("slow").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.now(), 60);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(provider.get_keyed::<dyn Clock>("fast").unwrap().now(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_keyed_transient_runs_per_resolution() {
    let services = ServiceCollection::new();
    services
        .add_keyed_transient("scratch", |_| Ok(Arc::new(Vec::<u8>::with_capacity(8))))
        .unwrap();

    let provider = services.build();
    let a = provider.get_keyed::<Vec<u8>>("scratch").unwrap();
    let b = provider.get_keyed::<Vec<u8>>("scratch").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(provider.get_keyed::<Vec<u8>>("other").is_err());
    assert!(!provider.contains::<Vec<u8>>());
}
