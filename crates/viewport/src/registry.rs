//! Target registration and dispatch.

use crate::watcher::{TargetId, ViewportWatcher, VisibilityRecord, WatchConfig};
use common::Rect;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Per-target visibility callback.
pub type VisibilityCallback = Box<dyn FnMut(&VisibilityRecord) + Send>;

/// Creates the underlying watcher on first registration. Returning `None`
/// puts the registry into degraded always-visible mode.
pub type WatcherProvider =
    Box<dyn FnOnce(&WatchConfig, DispatchHandle) -> Option<Box<dyn ViewportWatcher>> + Send>;

struct Registration {
    /// Bumped on every (re-)registration so a stale in-flight batch can
    /// never reach a replaced callback.
    generation: u64,
    callback: Arc<Mutex<VisibilityCallback>>,
}

struct Inner {
    registrations: IndexMap<TargetId, Registration>,
    watcher: Option<Box<dyn ViewportWatcher>>,
    degraded: bool,
    started: bool,
    next_generation: u64,
}

/// Handle a watcher pushes visibility batches through.
///
/// Holds only a weak reference: a watcher outliving the registry dispatches
/// into nothing.
#[derive(Clone)]
pub struct DispatchHandle {
    inner: Weak<Mutex<Inner>>,
}

impl DispatchHandle {
    pub fn dispatch(&self, batch: &[VisibilityRecord]) {
        if let Some(inner) = self.inner.upgrade() {
            dispatch_records(&inner, batch);
        }
    }
}

/// Multiplexes one viewport watcher across any number of targets.
///
/// Explicitly constructed and passed around by the host application; there
/// is no process-global instance.
pub struct ObservationRegistry {
    inner: Arc<Mutex<Inner>>,
    provider: Mutex<Option<WatcherProvider>>,
    config: WatchConfig,
}

impl ObservationRegistry {
    pub fn new(provider: WatcherProvider) -> Self {
        Self::with_config(WatchConfig::default(), provider)
    }

    pub fn with_config(config: WatchConfig, provider: WatcherProvider) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                registrations: IndexMap::new(),
                watcher: None,
                degraded: false,
                started: false,
                next_generation: 0,
            })),
            provider: Mutex::new(Some(provider)),
            config,
        }
    }

    /// Register a target. Replaces any existing callback for the same
    /// target. The underlying watcher is created on the first call; if the
    /// provider reports it unavailable, the registry degrades to treating
    /// every target as immediately visible so dependents load eagerly.
    pub fn observe(
        &self,
        target: TargetId,
        callback: impl FnMut(&VisibilityRecord) + Send + 'static,
    ) {
        let start = {
            let mut inner = self.inner.lock();
            let generation = inner.next_generation;
            inner.next_generation += 1;
            inner.registrations.insert(
                target,
                Registration {
                    generation,
                    callback: Arc::new(Mutex::new(Box::new(callback))),
                },
            );
            if inner.started {
                false
            } else {
                inner.started = true;
                true
            }
        };

        let degraded = if start {
            // start_watcher picks up every already-registered target,
            // including this one.
            self.start_watcher();
            self.inner.lock().degraded
        } else {
            let mut inner = self.inner.lock();
            if let Some(watcher) = inner.watcher.as_mut() {
                watcher.watch(target);
            }
            inner.degraded
        };

        if degraded {
            dispatch_records(&self.inner, &[VisibilityRecord::always_visible(target)]);
        }
    }

    /// Stop notifications for a target. No-op when unregistered.
    pub fn unobserve(&self, target: TargetId) {
        let mut inner = self.inner.lock();
        if inner.registrations.shift_remove(&target).is_some() {
            if let Some(watcher) = inner.watcher.as_mut() {
                watcher.unwatch(target);
            }
        }
    }

    /// Disconnect the watcher and drop every registration. Page-teardown
    /// only; the registry does not restart afterwards.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        if let Some(mut watcher) = inner.watcher.take() {
            watcher.disconnect();
        }
        inner.registrations.clear();
    }

    /// Deliver a batch of visibility records to registered callbacks.
    /// Unknown targets are silently skipped; callbacks may observe or
    /// unobserve during dispatch.
    pub fn dispatch(&self, batch: &[VisibilityRecord]) {
        dispatch_records(&self.inner, batch);
    }

    /// Geometry-driven dispatch for hosts that report raw bounds. Applies
    /// the configured margin expansion and threshold, then dispatches.
    pub fn process(&self, viewport: Rect, bounds: &[(TargetId, Rect)]) {
        let expanded = self.config.margins.expand(&viewport);
        let batch: Vec<VisibilityRecord> = bounds
            .iter()
            .map(|(target, rect)| VisibilityRecord {
                target: *target,
                is_visible: rect.coverage_by(&expanded) >= self.config.threshold,
                ratio: rect.coverage_by(&viewport),
                bounds: *rect,
                root_bounds: viewport,
            })
            .collect();
        dispatch_records(&self.inner, &batch);
    }

    /// Number of currently registered targets.
    pub fn len(&self) -> usize {
        self.inner.lock().registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn start_watcher(&self) {
        let provider = self.provider.lock().take();
        let handle = DispatchHandle {
            inner: Arc::downgrade(&self.inner),
        };
        let watcher = provider.and_then(|create| create(&self.config, handle));

        let mut inner = self.inner.lock();
        match watcher {
            Some(mut watcher) => {
                // Targets registered before the watcher came up.
                for target in inner.registrations.keys().copied().collect::<Vec<_>>() {
                    watcher.watch(target);
                }
                inner.watcher = Some(watcher);
            }
            None => {
                tracing::warn!("viewport watching unavailable, treating all targets as visible");
                inner.degraded = true;
            }
        }
    }
}

/// Snapshot the matching registrations under the lock, then invoke outside
/// it. Before each invocation the registration is re-checked by generation,
/// so unobserving a target mid-batch suppresses its remaining records.
fn dispatch_records(inner: &Arc<Mutex<Inner>>, batch: &[VisibilityRecord]) {
    let snapshot: Vec<(u64, Arc<Mutex<VisibilityCallback>>, VisibilityRecord)> = {
        let guard = inner.lock();
        batch
            .iter()
            .filter_map(|record| {
                guard.registrations.get(&record.target).map(|registration| {
                    (
                        registration.generation,
                        registration.callback.clone(),
                        record.clone(),
                    )
                })
            })
            .collect()
    };

    for (generation, callback, record) in snapshot {
        let current = {
            let guard = inner.lock();
            guard
                .registrations
                .get(&record.target)
                .is_some_and(|registration| registration.generation == generation)
        };
        if !current {
            continue;
        }
        (callback.lock())(&record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct NullWatcher {
        watched: Arc<Mutex<Vec<TargetId>>>,
        disconnected: Arc<AtomicBool>,
    }

    impl ViewportWatcher for NullWatcher {
        fn watch(&mut self, target: TargetId) {
            self.watched.lock().push(target);
        }

        fn unwatch(&mut self, target: TargetId) {
            self.watched.lock().retain(|t| *t != target);
        }

        fn disconnect(&mut self) {
            self.disconnected.store(true, Ordering::SeqCst);
        }
    }

    fn registry_with_watcher() -> (ObservationRegistry, Arc<Mutex<Vec<TargetId>>>, Arc<AtomicBool>)
    {
        let watched = Arc::new(Mutex::new(Vec::new()));
        let disconnected = Arc::new(AtomicBool::new(false));
        let (w, d) = (watched.clone(), disconnected.clone());
        let registry = ObservationRegistry::new(Box::new(move |_, _| {
            Some(Box::new(NullWatcher {
                watched: w,
                disconnected: d,
            }) as Box<dyn ViewportWatcher>)
        }));
        (registry, watched, disconnected)
    }

    fn record(target: TargetId, visible: bool) -> VisibilityRecord {
        VisibilityRecord {
            target,
            is_visible: visible,
            ratio: if visible { 1.0 } else { 0.0 },
            bounds: Rect::ZERO,
            root_bounds: Rect::ZERO,
        }
    }

    #[test]
    fn test_watcher_created_lazily() {
        let created = Arc::new(AtomicBool::new(false));
        let c = created.clone();
        let registry = ObservationRegistry::new(Box::new(move |_, _| {
            c.store(true, Ordering::SeqCst);
            None
        }));

        assert!(!created.load(Ordering::SeqCst));
        registry.observe(TargetId(1), |_| {});
        assert!(created.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dispatch_reaches_registered_callback() {
        let (registry, watched, _) = registry_with_watcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        registry.observe(TargetId(7), move |record| {
            s.lock().push(record.is_visible);
        });

        assert_eq!(watched.lock().as_slice(), &[TargetId(7)]);

        registry.dispatch(&[record(TargetId(7), true), record(TargetId(9), true)]);
        assert_eq!(seen.lock().as_slice(), &[true]);
    }

    #[test]
    fn test_reregistration_replaces_callback() {
        let (registry, _, _) = registry_with_watcher();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let f = first.clone();
        registry.observe(TargetId(1), move |_| {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let s = second.clone();
        registry.observe(TargetId(1), move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&[record(TargetId(1), true)]);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unobserve_mid_batch_suppresses_remaining_records() {
        let watched = Arc::new(Mutex::new(Vec::new()));
        let disconnected = Arc::new(AtomicBool::new(false));
        let (w, d) = (watched.clone(), disconnected.clone());
        let registry = Arc::new(ObservationRegistry::new(Box::new(move |_, _| {
            Some(Box::new(NullWatcher {
                watched: w,
                disconnected: d,
            }) as Box<dyn ViewportWatcher>)
        })));

        let b_calls = Arc::new(AtomicUsize::new(0));

        // A's callback unregisters B while the batch is in flight.
        let r = registry.clone();
        registry.observe(TargetId(1), move |_| {
            r.unobserve(TargetId(2));
        });
        let b = b_calls.clone();
        registry.observe(TargetId(2), move |_| {
            b.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&[record(TargetId(1), true), record(TargetId(2), true)]);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_replacement_mid_batch_suppresses_stale_records() {
        let watched = Arc::new(Mutex::new(Vec::new()));
        let disconnected = Arc::new(AtomicBool::new(false));
        let (w, d) = (watched.clone(), disconnected.clone());
        let registry = Arc::new(ObservationRegistry::new(Box::new(move |_, _| {
            Some(Box::new(NullWatcher {
                watched: w,
                disconnected: d,
            }) as Box<dyn ViewportWatcher>)
        })));

        let old_calls = Arc::new(AtomicUsize::new(0));
        let new_calls = Arc::new(AtomicUsize::new(0));

        // A's callback re-registers B while the batch is in flight; the
        // replaced callback must not see B's remaining record.
        let r = registry.clone();
        let n = new_calls.clone();
        registry.observe(TargetId(1), move |_| {
            let n = n.clone();
            r.observe(TargetId(2), move |_| {
                n.fetch_add(1, Ordering::SeqCst);
            });
        });
        let o = old_calls.clone();
        registry.observe(TargetId(2), move |_| {
            o.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&[record(TargetId(1), true), record(TargetId(2), true)]);
        assert_eq!(old_calls.load(Ordering::SeqCst), 0);
        // The replacement only receives batches dispatched after it
        // registered.
        assert_eq!(new_calls.load(Ordering::SeqCst), 0);

        registry.dispatch(&[record(TargetId(2), true)]);
        assert_eq!(old_calls.load(Ordering::SeqCst), 0);
        assert_eq!(new_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_degraded_mode_reports_immediately_visible() {
        let registry = ObservationRegistry::new(Box::new(|_, _| None));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        registry.observe(TargetId(3), move |record| {
            s.lock().push((record.is_visible, record.ratio));
        });

        assert_eq!(seen.lock().as_slice(), &[(true, 1.0)]);
    }

    #[test]
    fn test_shutdown_disconnects_and_clears() {
        let (registry, _, disconnected) = registry_with_watcher();
        registry.observe(TargetId(1), |_| {});
        registry.observe(TargetId(2), |_| {});
        assert_eq!(registry.len(), 2);

        registry.shutdown();
        assert!(disconnected.load(Ordering::SeqCst));
        assert!(registry.is_empty());

        // Dispatch after shutdown is a no-op.
        registry.dispatch(&[record(TargetId(1), true)]);
    }

    #[test]
    fn test_process_applies_margin_and_threshold() {
        let (registry, _, _) = registry_with_watcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        registry.observe(TargetId(1), move |record| {
            s.lock().push((record.is_visible, record.ratio));
        });

        let viewport = Rect::new(0.0, 0.0, 100.0, 1000.0);
        // Fully below the viewport but inside the 50% load-ahead margin.
        let near = Rect::new(0.0, 1200.0, 100.0, 100.0);
        registry.process(viewport, &[(TargetId(1), near)]);

        // Far below even the expanded region.
        let far = Rect::new(0.0, 3000.0, 100.0, 100.0);
        registry.process(viewport, &[(TargetId(1), far)]);

        let seen = seen.lock();
        assert_eq!(seen[0], (true, 0.0));
        assert_eq!(seen[1], (false, 0.0));
    }

    #[test]
    fn test_unobserve_unknown_target_is_noop() {
        let (registry, _, _) = registry_with_watcher();
        registry.unobserve(TargetId(42));
        assert!(registry.is_empty());
    }
}
