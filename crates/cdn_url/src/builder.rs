//! Asset delivery URL construction.

use crate::config::DeliveryConfig;
use crate::error::UrlError;

/// Options appended to an asset URL as query parameters.
///
/// All fields are optional; whatever is provided is validated and emitted,
/// nothing else. Invalid values fail the call instead of being clamped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetOptions {
    /// Target width in pixels, must be positive.
    pub width: Option<u32>,
    /// Target height in pixels, must be positive.
    pub height: Option<u32>,
    /// Compression quality, 1..=100.
    pub quality: Option<u8>,
    /// Aspect ratio hint, e.g. `"16:9"`.
    pub aspect_ratio: Option<String>,
    /// Delivery zone; the configured default zone when absent.
    pub zone: Option<String>,
}

impl AssetOptions {
    fn validate(&self) -> Result<(), UrlError> {
        if let Some(width) = self.width {
            if width == 0 {
                return Err(UrlError::InvalidWidth(width));
            }
        }
        if let Some(height) = self.height {
            if height == 0 {
                return Err(UrlError::InvalidHeight(height));
            }
        }
        if let Some(quality) = self.quality {
            if !(1..=100).contains(&quality) {
                return Err(UrlError::InvalidQuality(quality));
            }
        }
        Ok(())
    }

    fn has_query(&self) -> bool {
        self.width.is_some()
            || self.height.is_some()
            || self.quality.is_some()
            || self.aspect_ratio.is_some()
    }
}

/// Build an absolute delivery URL for a relative asset path.
///
/// The zone's base URL is resolved from `config`; when the requested zone
/// has no base configured, the raw path is returned unchanged with a logged
/// warning. Pure in its inputs: the same path and options always produce
/// the same URL.
pub fn build_asset_url(
    config: &DeliveryConfig,
    path: &str,
    options: &AssetOptions,
) -> Result<String, UrlError> {
    options.validate()?;

    let zone = options.zone.as_deref().unwrap_or_else(|| config.default_zone());
    let Some(base) = config.zone_base(zone) else {
        tracing::warn!(zone, path, "no base URL configured for zone, using raw path");
        return Ok(path.to_string());
    };

    let mut url = base.join(path)?;

    if options.has_query() {
        let mut pairs = url.query_pairs_mut();
        if let Some(width) = options.width {
            pairs.append_pair("w", &width.to_string());
        }
        if let Some(height) = options.height {
            pairs.append_pair("h", &height.to_string());
        }
        if let Some(quality) = options.quality {
            pairs.append_pair("q", &quality.to_string());
        }
        if let Some(ratio) = &options.aspect_ratio {
            pairs.append_pair("ar", ratio);
        }
    }

    Ok(url.into())
}
