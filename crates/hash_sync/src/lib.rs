//! Scroll-position / URL-fragment synchronization.
//!
//! Keeps the page fragment equal to the identifier of the most visible
//! section, scrolls to the fragment's section on load and on back/forward
//! navigation, and guards against scroll/hash feedback loops.

pub mod history;
pub mod section;
pub mod sync;

pub use history::{HistorySurface, ScrollBehavior};
pub use section::{assign_identifiers, SectionRecord, SectionSource};
pub use sync::{init_hash_sync, HashSync, HashSyncHandle};
