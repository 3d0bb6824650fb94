//! Per-element media state.

use std::time::Duration;

/// Lifecycle phase of a media unit.
///
/// Non-priority units may cycle back to `Dormant` after leaving the
/// viewport; priority units never return to it after their first load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not loaded, not requested.
    Dormant,
    /// Source attached, resource fetching.
    Loading,
    /// Resource attached but the element is out of view.
    ReadyHidden,
    /// In view and eligible to play.
    ReadyVisible,
}

/// Media resource readiness, ordered from no data to enough for playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    /// No information about the media.
    HaveNothing = 0,
    /// Metadata available; seeking is possible.
    HaveMetadata = 1,
    /// Current frame available.
    HaveCurrentData = 2,
    /// Enough buffered to start playing.
    HaveFutureData = 3,
    /// Enough buffered for uninterrupted playback.
    HaveEnoughData = 4,
}

impl ReadyState {
    /// Whether the resource can be seeked without a silent no-op.
    pub fn supports_seeking(&self) -> bool {
        *self >= ReadyState::HaveMetadata
    }

    /// Whether playback can start.
    pub fn supports_playback(&self) -> bool {
        *self >= ReadyState::HaveFutureData
    }
}

/// State carried by every mounted media element.
#[derive(Clone, Debug)]
pub struct MediaUnit {
    /// Resolved delivery URL for the media resource.
    pub desired_source: String,
    /// Resolved poster URL, if any.
    pub poster_url: Option<String>,
    /// Set at creation, never mutated: priority units bypass deferred
    /// loading entirely.
    pub is_priority: bool,
    pub should_load: bool,
    pub is_visible: bool,
    pub is_reduced_motion: bool,
    pub is_muted: bool,
    /// Playback position preserved across pause/resume cycles.
    pub saved_position: Duration,
    pub autoplay_enabled: bool,
    pub loop_enabled: bool,
}

impl MediaUnit {
    pub fn new(
        desired_source: String,
        poster_url: Option<String>,
        is_priority: bool,
        autoplay_enabled: bool,
        loop_enabled: bool,
    ) -> Self {
        Self {
            desired_source,
            poster_url,
            is_priority,
            should_load: false,
            is_visible: false,
            is_reduced_motion: false,
            // Muted with zero volume by default: autoplay compatibility.
            is_muted: true,
            saved_position: Duration::ZERO,
            autoplay_enabled,
            loop_enabled,
        }
    }
}
