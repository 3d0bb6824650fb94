//! Host seam for the rendered media element.

use std::time::Duration;

/// The actual rendered element the controller drives.
///
/// Play requests are asynchronous: `request_play` returns immediately and
/// the host later feeds `PlayAccepted` or `PlayRejected` back into the
/// controller. Likewise `schedule_retry` arms a host timer that eventually
/// delivers `RetryElapsed`.
pub trait MediaSurface: Send {
    /// Attach the media source (and poster) and begin fetching.
    fn attach(&mut self, src: &str, poster: Option<&str>, looping: bool);

    /// Detach the source and release the underlying resource.
    fn detach(&mut self);

    /// Ask the host to start playback.
    fn request_play(&mut self);

    fn pause(&mut self);

    /// Current playback position.
    fn position(&mut self) -> Duration;

    fn seek(&mut self, position: Duration);

    fn set_muted(&mut self, muted: bool);

    /// Volume in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f64);

    /// Arm the retry timer; the host delivers `RetryElapsed` after `delay`.
    fn schedule_retry(&mut self, delay: Duration);

    /// Disarm any pending retry timer.
    fn cancel_retry(&mut self);
}
