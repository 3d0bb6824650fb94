//! Per-element media lifecycle control.
//!
//! Each rendered image or video gets a [`LifecycleController`]: a state
//! machine that reconciles viewport visibility, resource readiness, and the
//! user's motion preference into deferred loading, play/pause, position
//! preservation, and mute policy.

pub mod controller;
pub mod event;
pub mod rig;
pub mod surface;
pub mod unit;

pub use controller::{LifecycleController, UnitDriver, RETRY_PLAY_DELAY, UNMUTE_VOLUME};
pub use event::{MediaLoadError, UnitEvent};
pub use rig::{MediaRig, MountOptions, MountedUnit};
pub use surface::MediaSurface;
pub use unit::{MediaUnit, Phase, ReadyState};
