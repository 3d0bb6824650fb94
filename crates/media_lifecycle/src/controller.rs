//! The per-unit lifecycle state machine.

use crate::event::UnitEvent;
use crate::surface::MediaSurface;
use crate::unit::{MediaUnit, Phase, ReadyState};
use std::time::Duration;

/// Delay before the single muted retry after an autoplay rejection.
pub const RETRY_PLAY_DELAY: Duration = Duration::from_millis(350);

/// Volume applied on explicit user unmute. Deliberately below maximum.
pub const UNMUTE_VOLUME: f64 = 0.55;

/// Object-safe view of a controller, so mounted units with different
/// surface types can share one collection.
pub trait UnitDriver: Send {
    fn handle(&mut self, event: UnitEvent);
    fn phase(&self) -> Phase;
    fn unit(&self) -> &MediaUnit;
}

/// State machine for one mounted media element.
///
/// All transitions go through [`handle`](Self::handle); the controller is
/// the only mutator of its unit's state, and events for a single unit are
/// processed in order (single-threaded host queue).
pub struct LifecycleController<S: MediaSurface> {
    unit: MediaUnit,
    phase: Phase,
    ready: ReadyState,
    /// A play request is in flight; further requests coalesce into it.
    play_pending: bool,
    retry_scheduled: bool,
    retry_used: bool,
    /// Set once reduced motion was ever requested; the unit never unloads
    /// again afterwards.
    pinned_loaded: bool,
    /// Load failed; degrade to showing the element without playback.
    show_anyway: bool,
    alive: bool,
    surface: S,
}

impl<S: MediaSurface> LifecycleController<S> {
    /// Mount transition. Priority units and units mounted under an active
    /// reduced-motion preference load immediately; everything else waits
    /// for a visibility notification.
    pub fn new(surface: S, mut unit: MediaUnit, reduced_motion: bool) -> Self {
        unit.is_reduced_motion = reduced_motion;
        let mut controller = Self {
            unit,
            phase: Phase::Dormant,
            ready: ReadyState::HaveNothing,
            play_pending: false,
            retry_scheduled: false,
            retry_used: false,
            pinned_loaded: reduced_motion,
            show_anyway: false,
            alive: true,
            surface,
        };
        if controller.unit.is_priority || reduced_motion {
            controller.begin_load();
        }
        controller
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn unit(&self) -> &MediaUnit {
        &self.unit
    }

    pub fn ready(&self) -> ReadyState {
        self.ready
    }

    /// Single entry point for every state transition.
    pub fn handle(&mut self, event: UnitEvent) {
        if !self.alive {
            // Stale deferred callback after unmount.
            return;
        }

        match event {
            UnitEvent::VisibilityChanged(true) => self.on_entered_region(),
            UnitEvent::VisibilityChanged(false) => self.on_left_region(),
            UnitEvent::ReadinessReached(state) => self.on_readiness(state),
            UnitEvent::MotionPreferenceChanged(reduced) => self.on_motion_preference(reduced),
            UnitEvent::PlayAccepted => self.on_play_accepted(),
            UnitEvent::PlayRejected => self.on_play_rejected(),
            UnitEvent::RetryElapsed => self.on_retry_elapsed(),
            UnitEvent::LoadFailed(err) => {
                tracing::error!(
                    source = %self.unit.desired_source,
                    error = %err,
                    "media resource failed to load, showing anyway"
                );
                self.show_anyway = true;
                self.play_pending = false;
                if self.phase == Phase::Loading {
                    self.phase = if self.unit.is_visible {
                        Phase::ReadyVisible
                    } else {
                        Phase::ReadyHidden
                    };
                }
            }
            UnitEvent::MuteToggled => self.on_mute_toggled(),
            UnitEvent::Unmounted => {
                self.alive = false;
                self.surface.cancel_retry();
                self.retry_scheduled = false;
                if self.phase != Phase::Dormant {
                    self.surface.detach();
                }
                self.phase = Phase::Dormant;
            }
        }
    }

    fn on_entered_region(&mut self) {
        self.unit.is_visible = true;
        match self.phase {
            Phase::Dormant => self.begin_load(),
            Phase::ReadyHidden => {
                self.phase = Phase::ReadyVisible;
                self.maybe_autoplay();
            }
            Phase::Loading | Phase::ReadyVisible => {}
        }
    }

    fn on_left_region(&mut self) {
        self.unit.is_visible = false;
        if self.phase == Phase::Dormant {
            return;
        }

        if self.phase == Phase::ReadyVisible {
            // Hard ordering invariant: read the position before pausing,
            // pausing first can reset it on some hosts. Loading and
            // ReadyHidden units were never asked to play, so nothing to
            // pause there.
            self.capture_then_pause();
        }

        if !self.unit.is_priority && !self.pinned_loaded {
            // Reclaim memory on long pages: non-priority units re-fetch on
            // re-entry instead of holding their resource off-screen.
            self.unload();
        } else if self.phase == Phase::ReadyVisible {
            self.phase = Phase::ReadyHidden;
        }
    }

    fn on_readiness(&mut self, state: ReadyState) {
        self.ready = state;
        if self.phase == Phase::Loading {
            self.phase = if self.unit.is_visible {
                Phase::ReadyVisible
            } else {
                Phase::ReadyHidden
            };
        }
        self.maybe_autoplay();
    }

    fn on_motion_preference(&mut self, reduced: bool) {
        self.unit.is_reduced_motion = reduced;
        if reduced {
            self.unit.should_load = true;
            self.pinned_loaded = true;
            if self.retry_scheduled {
                self.surface.cancel_retry();
                self.retry_scheduled = false;
            }
            match self.phase {
                Phase::Dormant => self.begin_load(),
                Phase::ReadyVisible => self.capture_then_pause(),
                Phase::Loading | Phase::ReadyHidden => {}
            }
        } else {
            self.maybe_autoplay();
        }
    }

    fn on_play_accepted(&mut self) {
        self.play_pending = false;
        self.retry_used = false;
        self.retry_scheduled = false;
        if !self.unit.is_visible && self.phase != Phase::Dormant {
            // Resolved after the unit already left the region.
            self.capture_then_pause();
        }
    }

    fn on_play_rejected(&mut self) {
        if self.phase == Phase::Dormant {
            // Rejection of a play request that unloading already abandoned;
            // the retry budget belongs to the next load cycle.
            return;
        }
        self.play_pending = false;
        if self.retry_used {
            tracing::debug!(
                source = %self.unit.desired_source,
                "muted autoplay retry rejected, giving up"
            );
            return;
        }
        self.retry_used = true;
        self.unit.is_muted = true;
        self.surface.set_muted(true);
        self.surface.set_volume(0.0);
        self.surface.schedule_retry(RETRY_PLAY_DELAY);
        self.retry_scheduled = true;
    }

    fn on_retry_elapsed(&mut self) {
        if !self.retry_scheduled {
            // Timer raced with cancellation.
            return;
        }
        self.retry_scheduled = false;
        if self.phase == Phase::ReadyVisible
            && self.unit.is_visible
            && self.unit.autoplay_enabled
            && !self.unit.is_reduced_motion
            && !self.play_pending
            && self.ready.supports_playback()
        {
            self.surface.request_play();
            self.play_pending = true;
        }
    }

    fn on_mute_toggled(&mut self) {
        if self.unit.is_muted {
            self.unit.is_muted = false;
            self.surface.set_muted(false);
            self.surface.set_volume(UNMUTE_VOLUME);
        } else {
            self.unit.is_muted = true;
            self.surface.set_muted(true);
            self.surface.set_volume(0.0);
        }
    }

    fn begin_load(&mut self) {
        self.unit.should_load = true;
        self.phase = Phase::Loading;
        self.surface.attach(
            &self.unit.desired_source,
            self.unit.poster_url.as_deref(),
            self.unit.loop_enabled,
        );
        self.surface.set_muted(self.unit.is_muted);
        self.surface
            .set_volume(if self.unit.is_muted { 0.0 } else { UNMUTE_VOLUME });
    }

    fn capture_then_pause(&mut self) {
        self.unit.saved_position = self.surface.position();
        self.surface.pause();
    }

    fn unload(&mut self) {
        self.surface.detach();
        self.surface.cancel_retry();
        self.phase = Phase::Dormant;
        self.unit.should_load = false;
        self.ready = ReadyState::HaveNothing;
        self.play_pending = false;
        self.retry_scheduled = false;
        self.retry_used = false;
    }

    fn maybe_autoplay(&mut self) {
        if self.phase != Phase::ReadyVisible
            || !self.unit.is_visible
            || !self.unit.autoplay_enabled
            || self.unit.is_reduced_motion
            || self.play_pending
            || self.show_anyway
            || !self.ready.supports_playback()
        {
            return;
        }
        if self.unit.saved_position > Duration::ZERO && self.ready.supports_seeking() {
            self.surface.seek(self.unit.saved_position);
        }
        self.surface.request_play();
        self.play_pending = true;
    }
}

impl<S: MediaSurface> UnitDriver for LifecycleController<S> {
    fn handle(&mut self, event: UnitEvent) {
        LifecycleController::handle(self, event);
    }

    fn phase(&self) -> Phase {
        LifecycleController::phase(self)
    }

    fn unit(&self) -> &MediaUnit {
        LifecycleController::unit(self)
    }
}
