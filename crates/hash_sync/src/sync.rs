//! Visibility scoring and fragment updates.

use crate::history::{HistorySurface, ScrollBehavior};
use crate::section::{assign_identifiers, SectionRecord, SectionSource};
use common::BoundedRetry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use viewport::{ObservationRegistry, TargetId, VisibilityRecord};

/// Weight of center proximity against visible-area ratio.
const CENTER_WEIGHT: f64 = 0.5;

/// Extra score for near-fully-visible, well-centered sections, matching
/// scroll-snap alignment.
const SNAP_BONUS: f64 = 0.25;
const SNAP_RATIO: f64 = 0.95;
const SNAP_CENTERING: f64 = 0.9;

/// Expected duration of a programmatic scroll; automatic fragment updates
/// are suppressed for this long after one starts.
const SMOOTH_SCROLL_GUARD: Duration = Duration::from_millis(800);
const INSTANT_SCROLL_GUARD: Duration = Duration::from_millis(120);

#[derive(Clone, Copy, Debug, Default)]
struct SectionScore {
    ratio: f64,
    centering: f64,
}

impl SectionScore {
    fn value(&self) -> f64 {
        let mut score = self.ratio + CENTER_WEIGHT * self.centering;
        if self.ratio >= SNAP_RATIO && self.centering >= SNAP_CENTERING {
            score += SNAP_BONUS;
        }
        score
    }
}

/// Keeps the URL fragment equal to the identifier of the most visible
/// section.
pub struct HashSync<H: HistorySurface> {
    sections: Vec<SectionRecord>,
    scores: HashMap<TargetId, SectionScore>,
    surface: H,
    reduced_motion: bool,
    guard_until: Option<Instant>,
    /// Fragment the page loaded with, until the initial scroll lands or the
    /// retry schedule runs out.
    initial_target: Option<String>,
    initial_retry: BoundedRetry,
}

impl<H: HistorySurface> HashSync<H> {
    /// Assign section identifiers and attempt the initial
    /// scroll-to-fragment if the page loaded with one.
    pub fn new(sources: Vec<SectionSource>, surface: H, reduced_motion: bool) -> Self {
        let sections = assign_identifiers(&sources);
        let mut sync = Self {
            sections,
            scores: HashMap::new(),
            surface,
            reduced_motion,
            guard_until: None,
            initial_target: None,
            initial_retry: BoundedRetry::layout_settle(),
        };

        if let Some(fragment) = sync.surface.fragment().filter(|f| !f.is_empty()) {
            sync.initial_target = Some(fragment);
            sync.attempt_initial_scroll();
        }
        sync
    }

    pub fn sections(&self) -> &[SectionRecord] {
        &self.sections
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Next delay before re-attempting the initial scroll, or `None` once
    /// the schedule is exhausted or no attempt is pending. The host waits
    /// out the delay and calls [`retry_initial_scroll`](Self::retry_initial_scroll).
    pub fn next_initial_retry(&mut self) -> Option<Duration> {
        self.initial_target.as_ref()?;
        self.initial_retry.next()
    }

    /// Re-issue the initial scroll; layout may have shifted since the last
    /// attempt.
    pub fn retry_initial_scroll(&mut self) {
        self.attempt_initial_scroll();
        if self.initial_retry.is_exhausted() {
            self.initial_target = None;
        }
    }

    /// Feed one visibility record from the observation mechanism.
    pub fn note_visibility(&mut self, record: &VisibilityRecord) {
        if !self.sections.iter().any(|s| s.target == record.target) {
            return;
        }

        let centering = if record.root_bounds.height > 0.0 {
            let offset = (record.bounds.center_y() - record.root_bounds.center_y()).abs();
            (1.0 - offset / (record.root_bounds.height / 2.0)).max(0.0)
        } else {
            0.0
        };
        self.scores.insert(
            record.target,
            SectionScore {
                ratio: record.ratio,
                centering,
            },
        );

        self.update_fragment();
    }

    /// Back/forward navigation landed on a fragment: scroll to its section,
    /// guarding automatic updates for the scroll's expected duration.
    /// Unknown identifiers are ignored.
    pub fn handle_pop(&mut self, fragment: Option<&str>) {
        let Some(fragment) = fragment.filter(|f| !f.is_empty()) else {
            return;
        };
        let Some(section) = self.sections.iter().find(|s| s.id == fragment) else {
            tracing::debug!(fragment, "no section matches popped fragment");
            return;
        };
        let target = section.target;
        self.scroll_guarded(target);
    }

    /// Whether automatic fragment updates are currently suppressed.
    pub fn is_guarded(&self) -> bool {
        self.guard_until.is_some_and(|until| Instant::now() < until)
    }

    fn attempt_initial_scroll(&mut self) {
        let Some(fragment) = self.initial_target.clone() else {
            return;
        };
        if let Some(section) = self.sections.iter().find(|s| s.id == fragment) {
            let target = section.target;
            self.scroll_guarded(target);
        }
    }

    fn scroll_guarded(&mut self, target: TargetId) {
        let behavior = if self.reduced_motion {
            ScrollBehavior::Instant
        } else {
            ScrollBehavior::Smooth
        };
        self.surface.scroll_to(target, behavior);
        let guard = match behavior {
            ScrollBehavior::Smooth => SMOOTH_SCROLL_GUARD,
            ScrollBehavior::Instant => INSTANT_SCROLL_GUARD,
        };
        self.guard_until = Some(Instant::now() + guard);
    }

    fn update_fragment(&mut self) {
        if self.is_guarded() {
            return;
        }

        let winner = self
            .sections
            .iter()
            .filter_map(|section| {
                self.scores
                    .get(&section.target)
                    .filter(|score| score.ratio > 0.0)
                    .map(|score| (section, score.value()))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((section, _)) = winner {
            if self.surface.fragment().as_deref() != Some(section.id.as_str()) {
                self.surface.replace_fragment(&section.id);
            }
        }
    }
}

/// Handle returned by [`init_hash_sync`]; tearing it down unregisters every
/// section from the registry.
pub struct HashSyncHandle<H: HistorySurface + 'static> {
    sync: Arc<Mutex<HashSync<H>>>,
    targets: Vec<TargetId>,
    registry: Arc<ObservationRegistry>,
}

impl<H: HistorySurface + 'static> HashSyncHandle<H> {
    pub fn sync(&self) -> &Arc<Mutex<HashSync<H>>> {
        &self.sync
    }

    pub fn teardown(self) {
        for target in &self.targets {
            self.registry.unobserve(*target);
        }
    }
}

/// Wire a synchronizer to the shared observation registry.
pub fn init_hash_sync<H: HistorySurface + 'static>(
    registry: Arc<ObservationRegistry>,
    sources: Vec<SectionSource>,
    surface: H,
    reduced_motion: bool,
) -> HashSyncHandle<H> {
    let sync = Arc::new(Mutex::new(HashSync::new(sources, surface, reduced_motion)));
    let targets: Vec<TargetId> = sync.lock().sections().iter().map(|s| s.target).collect();

    for target in &targets {
        let weak = Arc::downgrade(&sync);
        registry.observe(*target, move |record| {
            if let Some(sync) = weak.upgrade() {
                sync.lock().note_visibility(record);
            }
        });
    }

    HashSyncHandle {
        sync,
        targets,
        registry,
    }
}
