use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::metric::Metric;
use crate::snapshot::Snapshot;

/// A source of metrics for a [`Snapshot`].
pub trait Collector {
    /// Adds a non-owning reference to every metric this collector currently holds to `out`.
    fn collect(&self, out: &mut Snapshot);
}

struct Entry {
    metric: Arc<dyn Metric>,
    any: Arc<dyn Any + Send + Sync>,
}

/// A registry of metrics, keyed by name.
///
/// `Registry` owns the metrics registered with it.  Names are unique: registering a second metric
/// under a name that is already taken is refused.
///
/// Every operation takes the same lock, and holds it only for the duration of the map access
/// itself.  In particular, [`collect`](Collector::collect) copies references out and releases the
/// lock before anything is serialized.
#[derive(Default)]
pub struct Registry {
    metrics: Mutex<IndexMap<String, Entry>>,
}

impl Registry {
    /// Creates an empty `Registry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `metric` under its name.
    ///
    /// Returns `true` if the metric was stored, and `false`, leaving the registry untouched, if a
    /// metric with the same name is already registered.
    pub fn register<M: Metric>(&self, metric: Arc<M>) -> bool {
        let name = metric.name().to_string();

        let mut metrics = self.metrics.lock();
        if metrics.contains_key(&name) {
            drop(metrics);
            debug!(metric = name.as_str(), "metric already registered");
            return false;
        }

        let entry = Entry { metric: metric.clone(), any: metric };
        metrics.insert(name, entry);
        true
    }

    /// Unregisters the metric with the given name.
    ///
    /// Returns `true` if the metric existed and was removed, `false` otherwise.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.metrics.lock().shift_remove(name);
        if removed.is_some() {
            debug!(metric = name, "metric unregistered");
        }
        removed.is_some()
    }

    /// Gets the metric with the given name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Metric>> {
        self.metrics.lock().get(name).map(|entry| Arc::clone(&entry.metric))
    }

    /// Gets the metric with the given name, if it is of type `M`.
    pub fn get_as<M: Metric>(&self, name: &str) -> Option<Arc<M>> {
        let any = self.metrics.lock().get(name).map(|entry| Arc::clone(&entry.any))?;
        any.downcast::<M>().ok()
    }

    /// Number of registered metrics.
    pub fn len(&self) -> usize {
        self.metrics.lock().len()
    }

    /// Whether or not no metric is registered.
    pub fn is_empty(&self) -> bool {
        self.metrics.lock().is_empty()
    }
}

impl Collector for Registry {
    fn collect(&self, out: &mut Snapshot) {
        let metrics = self.metrics.lock();
        for (name, entry) in metrics.iter() {
            out.push(name.clone(), Arc::downgrade(&entry.metric));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Collector, Registry};
    use crate::{CounterFamily, GaugeMetric, Metric, Snapshot};
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn gauge(name: &'static str, description: &'static str, initial: f64) -> Arc<GaugeMetric> {
        Arc::new(GaugeMetric::with_options(name, description, initial).expect("name is valid"))
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert!(!registry.unregister("nani"));
        assert!(registry.get("nanidesuka").is_none());
    }

    #[test]
    fn test_register_and_get() {
        let registry = Registry::new();
        let gauge = gauge("my_gauge", "Test gauge", 42.0);
        assert!(registry.register(Arc::clone(&gauge)));
        assert_eq!(registry.len(), 1);

        let metric = registry.get("my_gauge").expect("metric was registered");
        assert_eq!(metric.name(), "my_gauge");
        assert_eq!(metric.description(), "Test gauge");

        let mirror = registry.get_as::<GaugeMetric>("my_gauge").expect("metric is a gauge");
        assert_eq!(mirror.value(), 42.0);
        mirror.increment();
        assert_eq!(gauge.value(), 43.0);

        assert!(registry.get_as::<CounterFamily>("my_gauge").is_none());
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let registry = Registry::new();
        let first = gauge("my_gauge", "Test gauge", 42.0);
        let second = gauge("my_gauge", "Test gauge 2", 2.0);

        assert!(registry.register(Arc::clone(&first)));
        assert!(!registry.register(second));
        assert_eq!(registry.len(), 1);

        let stored = registry.get_as::<GaugeMetric>("my_gauge").expect("metric was registered");
        assert!(Arc::ptr_eq(&stored, &first));
        assert_eq!(stored.description(), "Test gauge");
    }

    #[test]
    fn test_unregister_once() {
        let registry = Registry::new();
        assert!(registry.register(gauge("my_gauge", "Test gauge", 42.0)));

        assert!(registry.unregister("my_gauge"));
        assert!(!registry.unregister("my_gauge"));
        assert!(registry.get("my_gauge").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_collect_in_registration_order() {
        let registry = Registry::new();
        registry.register(gauge("b", "", 0.0));
        registry.register(gauge("a", "", 0.0));
        registry.register(gauge("c", "", 0.0));
        registry.unregister("a");

        let mut snapshot = Snapshot::new();
        registry.collect(&mut snapshot);
        assert_eq!(snapshot.names().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_snapshot_skips_metrics_dropped_after_collection() {
        let registry = Registry::new();
        registry.register(gauge("short_lived", "", 1.0));
        registry.register(gauge("long_lived", "", 2.0));

        let mut snapshot = Snapshot::new();
        registry.collect(&mut snapshot);
        assert!(registry.unregister("short_lived"));

        let live = snapshot.iter().map(|metric| metric.name().to_string()).collect::<Vec<_>>();
        assert_eq!(live, vec!["long_lived".to_string()]);
    }

    #[test]
    fn test_concurrent_registration_of_same_name() {
        const THREADS: usize = 16;

        let registry = Arc::new(Registry::new());
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles = (0..THREADS)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let metric = gauge("contended", "", i as f64);
                    barrier.wait();
                    registry.register(metric)
                })
            })
            .collect::<Vec<_>>();

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().expect("register thread panicked"))
            .filter(|registered| *registered)
            .count();

        assert_eq!(wins, 1);
        assert_eq!(registry.len(), 1);
    }
}
