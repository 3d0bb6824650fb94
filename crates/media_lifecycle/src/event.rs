//! Controller input events.

use crate::unit::ReadyState;
use thiserror::Error;

/// A media resource load failure.
#[derive(Clone, Debug, Error)]
pub enum MediaLoadError {
    #[error("network error: {0}")]
    Network(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("load aborted")]
    Aborted,
}

/// Everything that can drive a unit's state machine.
///
/// All three asynchronous signal sources (viewport notifications, resource
/// events, preference changes) funnel through this one enum so transitions
/// stay testable without a rendering host.
#[derive(Clone, Debug)]
pub enum UnitEvent {
    /// The observation registry reported the target entering or leaving the
    /// viewport-adjacent region.
    VisibilityChanged(bool),
    /// The resource reached a new readiness level.
    ReadinessReached(ReadyState),
    /// The user's reduced-motion preference changed.
    MotionPreferenceChanged(bool),
    /// A pending play request was accepted by the host.
    PlayAccepted,
    /// A pending play request was rejected (autoplay policy).
    PlayRejected,
    /// The retry timer scheduled after a rejection fired.
    RetryElapsed,
    /// The resource failed to load.
    LoadFailed(MediaLoadError),
    /// User-triggered mute/unmute.
    MuteToggled,
    /// The UI unmounted the element.
    Unmounted,
}
