//! Host seam for the underlying viewport-watching mechanism.

use common::{MarginValue, Margins, Rect};

/// Opaque handle to a renderable element, keyed by identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// A visibility change for one target.
#[derive(Clone, Debug)]
pub struct VisibilityRecord {
    pub target: TargetId,
    /// Whether the target intersects the expanded watch region at or above
    /// the configured threshold.
    pub is_visible: bool,
    /// Fraction of the target inside the viewport proper (not the expanded
    /// region), in `[0, 1]`.
    pub ratio: f64,
    /// Target bounds in page coordinates.
    pub bounds: Rect,
    /// Viewport bounds in page coordinates.
    pub root_bounds: Rect,
}

impl VisibilityRecord {
    /// Synthetic always-visible record, used in degraded mode when no
    /// watcher is available.
    pub fn always_visible(target: TargetId) -> Self {
        Self {
            target,
            is_visible: true,
            ratio: 1.0,
            bounds: Rect::ZERO,
            root_bounds: Rect::ZERO,
        }
    }
}

/// Watch region configuration, fixed for the registry's lifetime.
#[derive(Clone, Copy, Debug)]
pub struct WatchConfig {
    /// Margins expanding the viewport into the load-ahead region.
    pub margins: Margins,
    /// Minimal intersection ratio (against the expanded region) counted as
    /// visible.
    pub threshold: f64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        // Trigger loading half a viewport height before the element scrolls
        // into view.
        Self {
            margins: Margins::vertical(MarginValue::Percentage(50.0)),
            threshold: 0.01,
        }
    }
}

/// The underlying viewport-watching mechanism.
///
/// Implementations deliver visibility batches through the `DispatchHandle`
/// they were created with. They must deliver asynchronously: dispatching
/// from inside `watch`/`unwatch` would re-enter the registry lock.
pub trait ViewportWatcher: Send {
    /// Start producing visibility records for a target.
    fn watch(&mut self, target: TargetId);

    /// Stop producing visibility records for a target.
    fn unwatch(&mut self, target: TargetId);

    /// Stop watching everything and release host resources.
    fn disconnect(&mut self);
}
