//! Viewport observation registry.
//!
//! One underlying viewport watcher is multiplexed across every registered
//! target, so a page with many media elements costs a single observation
//! mechanism instead of one per element.

pub mod registry;
pub mod watcher;

pub use registry::{DispatchHandle, ObservationRegistry, WatcherProvider};
pub use watcher::{TargetId, ViewportWatcher, VisibilityRecord, WatchConfig};
