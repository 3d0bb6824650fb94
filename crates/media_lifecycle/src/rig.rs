//! Mount/unmount entry points wiring controllers to the registry.

use crate::controller::{LifecycleController, UnitDriver};
use crate::event::UnitEvent;
use crate::surface::MediaSurface;
use crate::unit::{MediaUnit, Phase};
use cdn_url::{build_asset_url, AssetOptions, DeliveryConfig};
use common::CoreError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use viewport::{ObservationRegistry, TargetId};

/// Options for mounting one media element.
#[derive(Clone, Debug, Default)]
pub struct MountOptions {
    /// Relative asset path, resolved through the URL builder.
    pub source_path: String,
    /// Relative poster path, resolved the same way.
    pub poster_path: Option<String>,
    /// Sizing/quality/zone options forwarded to the URL builder.
    pub asset_options: AssetOptions,
    /// Above-the-fold content: bypass deferred loading.
    pub priority: bool,
    pub autoplay: bool,
    pub looping: bool,
}

/// Handle for a mounted unit. The host feeds resource and user events
/// through it; visibility events arrive via the registry automatically.
pub struct MountedUnit {
    target: TargetId,
    controller: Arc<Mutex<dyn UnitDriver>>,
}

impl MountedUnit {
    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn handle(&self, event: UnitEvent) {
        self.controller.lock().handle(event);
    }

    pub fn phase(&self) -> Phase {
        self.controller.lock().phase()
    }

    /// Snapshot of the unit's current state.
    pub fn unit(&self) -> MediaUnit {
        self.controller.lock().unit().clone()
    }
}

/// Dependency-injected service owning the media side of a page.
///
/// Constructed once at host startup with the shared observation registry
/// and delivery configuration; lives for the page lifetime.
pub struct MediaRig {
    registry: Arc<ObservationRegistry>,
    config: Arc<DeliveryConfig>,
    units: Mutex<Vec<Weak<Mutex<dyn UnitDriver>>>>,
    reduced_motion: Mutex<bool>,
    next_target: AtomicU64,
}

impl MediaRig {
    pub fn new(registry: Arc<ObservationRegistry>, config: Arc<DeliveryConfig>) -> Self {
        Self {
            registry,
            config,
            units: Mutex::new(Vec::new()),
            reduced_motion: Mutex::new(false),
            next_target: AtomicU64::new(1),
        }
    }

    pub fn registry(&self) -> &Arc<ObservationRegistry> {
        &self.registry
    }

    pub fn reduced_motion(&self) -> bool {
        *self.reduced_motion.lock()
    }

    /// Broadcast a motion-preference change to every live unit.
    pub fn set_reduced_motion(&self, reduced: bool) {
        *self.reduced_motion.lock() = reduced;
        let controllers: Vec<Arc<Mutex<dyn UnitDriver>>> = {
            let mut units = self.units.lock();
            units.retain(|weak| weak.strong_count() > 0);
            units.iter().filter_map(Weak::upgrade).collect()
        };
        for controller in controllers {
            controller
                .lock()
                .handle(UnitEvent::MotionPreferenceChanged(reduced));
        }
    }

    /// Mount a media element: resolve its delivery URLs, create the
    /// lifecycle controller, and register the target for visibility
    /// notifications.
    pub fn mount<S>(&self, surface: S, options: MountOptions) -> Result<MountedUnit, CoreError>
    where
        S: MediaSurface + 'static,
    {
        let desired_source =
            build_asset_url(&self.config, &options.source_path, &options.asset_options)
                .map_err(CoreError::from)?;
        let poster_url = options
            .poster_path
            .as_deref()
            .map(|path| build_asset_url(&self.config, path, &options.asset_options))
            .transpose()
            .map_err(CoreError::from)?;

        let unit = MediaUnit::new(
            desired_source,
            poster_url,
            options.priority,
            options.autoplay,
            options.looping,
        );
        let reduced = *self.reduced_motion.lock();
        let controller: Arc<Mutex<dyn UnitDriver>> =
            Arc::new(Mutex::new(LifecycleController::new(surface, unit, reduced)));

        let target = TargetId(self.next_target.fetch_add(1, Ordering::Relaxed));
        {
            let mut units = self.units.lock();
            units.retain(|weak| weak.strong_count() > 0);
            units.push(Arc::downgrade(&controller));
        }

        let weak = Arc::downgrade(&controller);
        self.registry.observe(target, move |record| {
            if let Some(controller) = weak.upgrade() {
                controller
                    .lock()
                    .handle(UnitEvent::VisibilityChanged(record.is_visible));
            }
        });

        Ok(MountedUnit { target, controller })
    }

    /// Unmount a unit: stop its notifications, cancel its timers, release
    /// its resource.
    pub fn unmount(&self, unit: MountedUnit) {
        self.registry.unobserve(unit.target);
        unit.controller.lock().handle(UnitEvent::Unmounted);
        // The dropped handle leaves a dead weak ref; pruned on the next
        // mount or broadcast.
    }

    #[cfg(test)]
    fn tracked_units(&self) -> usize {
        self.units.lock().len()
    }
}
