mod error;
pub use error::RelayError;

use std::{io, time::Duration};

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use futures::TryStreamExt;
use tokio_util::io::{ReaderStream, StreamReader};

use crate::{
    platform::{post_filename, story_filename, MediaKind},
    service::{
        http::{HttpClient, HttpService},
        session::{SessionService, SessionToken},
    },
};

const CHUNK_SIZE: usize = 64 * 1024;

/// Picks the response content type. A missing or generic upstream type falls
/// back to the recorded media type; a specific one corrects `is_video`.
pub fn resolve_content_type(declared: Option<&str>, is_video: bool) -> (String, bool) {
    match declared {
        Some(declared) if !declared.trim().is_empty() && !declared.contains("octet-stream") => {
            let is_video = if declared.contains("video") {
                true
            } else if declared.contains("image") {
                false
            } else {
                is_video
            };
            (declared.to_string(), is_video)
        }
        _ => {
            let fallback = if is_video { "video/mp4" } else { "image/jpeg" };
            (fallback.to_string(), is_video)
        }
    }
}

/// Streams a recorded media item back to the browser as an attachment.
#[derive(Clone)]
pub struct DownloadService {
    http_service: HttpService,
    sessions: SessionService,
}

impl DownloadService {
    pub fn new(sessions: SessionService, read_timeout: Duration) -> Result<Self, RelayError> {
        let http_service = HttpService::streaming(read_timeout).map_err(|e| RelayError::Internal(e.to_string()))?;
        Ok(Self { http_service, sessions })
    }

    pub async fn relay(
        &self,
        token: &SessionToken,
        kind: MediaKind,
        identifier: &str,
        index: usize,
    ) -> Result<Response, RelayError> {
        let identifier = match kind {
            MediaKind::Post => identifier.to_string(),
            MediaKind::Story => identifier.to_lowercase(),
        };

        let record = self
            .sessions
            .get_record(token, kind, &identifier)
            .ok_or(RelayError::SessionExpired(kind))?;
        let item = record.item(index).ok_or(RelayError::InvalidItem(kind))?;

        let media_url = item.download_url.as_str();
        info!(
            "Initiating {:?} download for {} item {} from {:.100}",
            kind, identifier, index, media_url
        );

        let response = self
            .http_service
            .get(media_url)
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                warn!("Upstream error downloading {} item {}: {}", identifier, index, e);
                RelayError::from_transport(kind, e)
            })?;

        let declared = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let (content_type, is_video) = resolve_content_type(declared, item.is_video);

        let filename = match kind {
            MediaKind::Post => post_filename(media_url, is_video),
            MediaKind::Story => story_filename(&record.username, index, media_url, is_video),
        };

        let content_length = response.headers().get(header::CONTENT_LENGTH).cloned();

        let stream = response.bytes_stream().map_err(io::Error::other);
        let body = Body::from_stream(ReaderStream::with_capacity(StreamReader::new(stream), CHUNK_SIZE));

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type.as_str())
            .header(
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
                    .map_err(|e| RelayError::Internal(e.to_string()))?,
            );
        if let Some(length) = content_length {
            builder = builder.header(header::CONTENT_LENGTH, length);
        }

        info!("Serving {}, type: {}", filename, content_type);
        builder.body(body).map_err(|e| RelayError::Internal(e.to_string()))
    }
}
