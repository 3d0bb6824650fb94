//! CDN delivery URL construction.
//!
//! This crate provides:
//! - Zone configuration (named zone → base URL, from the environment or code)
//! - Asset URL building with validated resize/quality options
//! - Adaptive-streaming playlist and thumbnail URL helpers

pub mod builder;
pub mod config;
pub mod streaming;

mod error;

pub use builder::{build_asset_url, AssetOptions};
pub use config::DeliveryConfig;
pub use error::UrlError;
pub use streaming::{playlist_url, thumbnail_url};
