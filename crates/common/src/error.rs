//! Common error types.

use thiserror::Error;

/// Main error type for the media delivery core.
///
/// Every variant degrades to a visible-but-suboptimal state somewhere in the
/// pipeline; nothing here is allowed to take the host page down.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No base URL configured for a delivery zone. Non-fatal: callers fall
    /// back to the raw asset path.
    #[error("no base URL configured for zone: {0}")]
    ConfigurationMissing(String),

    /// An invalid option was passed to the URL builder. Fatal to that call.
    #[error("invalid option: {0}")]
    Validation(String),

    /// A media resource failed to load (network or decode).
    #[error("resource load failed: {0}")]
    ResourceLoad(String),

    /// The host's autoplay policy rejected a play request.
    #[error("autoplay rejected by host policy")]
    AutoplayRejected,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn configuration(zone: impl Into<String>) -> Self {
        Self::ConfigurationMissing(zone.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn resource_load(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
