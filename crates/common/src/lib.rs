//! Shared types used across the media delivery core.

pub mod error;
pub mod geometry;
pub mod retry;

pub use error::{CoreError, CoreResult};
pub use geometry::{MarginValue, Margins, Rect};
pub use retry::BoundedRetry;
