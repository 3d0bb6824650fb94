//! Delivery zone configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Environment variable prefix for zone base URLs, e.g.
/// `MEDIA_CDN_ZONE_STORAGE=https://cdn.example.net`.
const ZONE_ENV_PREFIX: &str = "MEDIA_CDN_ZONE_";

/// Environment variable naming the adaptive-streaming base URL.
const STREAM_BASE_ENV: &str = "MEDIA_CDN_STREAM_BASE";

/// Named zone → base URL mapping plus the streaming base address.
///
/// Absence of a zone mapping is not fatal; the builder falls back to the
/// raw asset path with a logged warning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Zone name → base URL.
    zones: HashMap<String, Url>,
    /// Base URL for streaming playlists and thumbnails.
    stream_base: Option<Url>,
    /// Zone used when a request names none.
    default_zone: String,
}

impl DeliveryConfig {
    pub fn new() -> Self {
        Self {
            zones: HashMap::new(),
            stream_base: None,
            default_zone: "storage".to_string(),
        }
    }

    /// Resolve configuration from environment variables.
    ///
    /// Unparseable values are skipped with a warning rather than failing
    /// startup.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        for (key, value) in std::env::vars() {
            if let Some(zone) = key.strip_prefix(ZONE_ENV_PREFIX) {
                match Url::parse(&value) {
                    Ok(base) => {
                        config.zones.insert(zone.to_ascii_lowercase(), base);
                    }
                    Err(err) => {
                        tracing::warn!(%key, %err, "ignoring unparseable zone base URL");
                    }
                }
            }
        }

        if let Ok(value) = std::env::var(STREAM_BASE_ENV) {
            match Url::parse(&value) {
                Ok(base) => config.stream_base = Some(base),
                Err(err) => {
                    tracing::warn!(%err, "ignoring unparseable streaming base URL");
                }
            }
        }

        config
    }

    pub fn with_zone(mut self, name: impl Into<String>, base: Url) -> Self {
        self.zones.insert(name.into().to_ascii_lowercase(), base);
        self
    }

    pub fn with_stream_base(mut self, base: Url) -> Self {
        self.stream_base = Some(base);
        self
    }

    pub fn with_default_zone(mut self, name: impl Into<String>) -> Self {
        self.default_zone = name.into().to_ascii_lowercase();
        self
    }

    /// Base URL for a zone, if configured.
    pub fn zone_base(&self, name: &str) -> Option<&Url> {
        self.zones.get(&name.to_ascii_lowercase())
    }

    pub fn stream_base(&self) -> Option<&Url> {
        self.stream_base.as_ref()
    }

    pub fn default_zone(&self) -> &str {
        &self.default_zone
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self::new()
    }
}
