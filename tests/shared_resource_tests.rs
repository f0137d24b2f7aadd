//! Host-side usage: idle shared data sources
//!
//! One cache entry per shared data-source name; the host closes the resource
//! from an eviction listener once nobody has used it for the idle TTL.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sql_bridge::{Config, EvictionCache, ManualScheduler};

struct DataSource {
    name: String,
    closed: AtomicBool,
}

impl DataSource {
    fn open(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            closed: AtomicBool::new(false),
        })
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct Registry {
    sources: EvictionCache<String, Arc<DataSource>>,
    opened: AtomicUsize,
}

impl Registry {
    fn new(idle_ttl: Duration, scheduler: Arc<ManualScheduler>) -> Self {
        let sources = EvictionCache::with_scheduler(idle_ttl, scheduler);
        sources.add_eviction_listener(|_: &String, ds: &Arc<DataSource>| ds.close());
        Self {
            sources,
            opened: AtomicUsize::new(0),
        }
    }

    /// Returns the shared data source for `name`, opening it on first use.
    fn acquire(&self, name: &str) -> Arc<DataSource> {
        if let Some(ds) = self.sources.get(name).unwrap() {
            return ds;
        }
        let fresh = DataSource::open(name);
        match self.sources.put_if_absent(name.to_string(), fresh.clone()).unwrap() {
            Some(existing) => existing,
            None => {
                self.opened.fetch_add(1, Ordering::SeqCst);
                fresh
            }
        }
    }

    fn release(&self, name: &str) -> Option<Arc<DataSource>> {
        let ds = self.sources.remove(name).unwrap();
        if let Some(ds) = &ds {
            ds.close();
        }
        ds
    }
}

#[test]
fn test_shared_names_reuse_one_resource() {
    let scheduler = Arc::new(ManualScheduler::new());
    let registry = Registry::new(Config::default().idle_ttl(), scheduler);

    let a = registry.acquire("ds1");
    let b = registry.acquire("ds1");
    let c = registry.acquire("ds2");

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(registry.opened.load(Ordering::SeqCst), 2);
    assert_eq!(registry.sources.len(), 2);
}

#[test]
fn test_idle_resource_is_closed_by_listener() {
    let scheduler = Arc::new(ManualScheduler::new());
    let registry = Registry::new(Duration::from_secs(30), scheduler.clone());

    let ds = registry.acquire("ds1");
    scheduler.advance(Duration::from_secs(20));
    registry.acquire("ds1");
    scheduler.advance(Duration::from_secs(20));
    assert!(!ds.is_closed());

    scheduler.advance(Duration::from_secs(10));
    assert!(ds.is_closed());
    assert!(!registry.sources.contains_key("ds1"));

    let reopened = registry.acquire("ds1");
    assert!(!Arc::ptr_eq(&ds, &reopened));
    assert_eq!(reopened.name, "ds1");
    assert_eq!(registry.opened.load(Ordering::SeqCst), 2);
}

#[test]
fn test_explicit_release_closes_once_without_eviction() {
    let scheduler = Arc::new(ManualScheduler::new());
    let registry = Registry::new(Duration::from_secs(30), scheduler.clone());

    let ds = registry.acquire("ds1");
    let released = registry.release("ds1").unwrap();
    assert!(Arc::ptr_eq(&ds, &released));
    assert!(ds.is_closed());

    scheduler.advance(Duration::from_secs(60));
    assert_eq!(registry.sources.stats().evictions, 0);
    assert!(registry.release("ds1").is_none());
}
