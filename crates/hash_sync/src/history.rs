//! Host seam for URL fragment and scrolling.

use viewport::TargetId;

/// How a programmatic scroll should animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// The host's location/history facilities.
///
/// Fragment updates always replace the current history entry; the
/// synchronizer never creates navigation history of its own.
pub trait HistorySurface: Send {
    /// Current URL fragment without the leading `#`, if any.
    fn fragment(&self) -> Option<String>;

    /// Replace the fragment of the current history entry.
    fn replace_fragment(&mut self, id: &str);

    /// Scroll the page so the target section is in view.
    fn scroll_to(&mut self, target: TargetId, behavior: ScrollBehavior);
}
