//! Adaptive-streaming URL helpers.

use crate::config::DeliveryConfig;
use crate::error::UrlError;

/// Build the HLS playlist URL for a stream content id.
pub fn playlist_url(config: &DeliveryConfig, content_id: &str) -> Result<String, UrlError> {
    stream_url(config, content_id, "playlist.m3u8")
}

/// Build the thumbnail URL for a stream content id.
pub fn thumbnail_url(config: &DeliveryConfig, content_id: &str) -> Result<String, UrlError> {
    stream_url(config, content_id, "thumbnail.jpg")
}

fn stream_url(
    config: &DeliveryConfig,
    content_id: &str,
    file: &str,
) -> Result<String, UrlError> {
    let base = config.stream_base().ok_or(UrlError::StreamBaseMissing)?;

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UrlError::InvalidStreamBase)?
        .pop_if_empty()
        .push(content_id)
        .push(file);

    Ok(url.into())
}
