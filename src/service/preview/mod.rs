mod error;
pub use error::PreviewError;

use std::{io::Cursor, time::Duration};

use base64::{engine::general_purpose::STANDARD, Engine};
use futures::StreamExt;
use image::{codecs::jpeg::JpegEncoder, ImageReader};
use url::Url;

use crate::{
    platform::Preview,
    service::http::{HttpClient, HttpService},
};

const JPEG_QUALITY: u8 = 85;

/// Turns remote images into small inline JPEG thumbnails.
#[derive(Clone)]
pub struct PreviewService {
    http_service: HttpService,
    timeout: Duration,
    max_size: u32,
    max_bytes: usize,
}

impl PreviewService {
    pub fn new(timeout: Duration, max_size: u32, max_bytes: usize) -> Result<Self, PreviewError> {
        let http_service = HttpService::new(timeout)?;
        Ok(Self {
            http_service,
            timeout,
            max_size,
            max_bytes,
        })
    }

    /// Never fails the caller; a broken preview only affects its own item.
    pub async fn fetch(&self, url: Option<&Url>) -> Preview {
        match self.try_fetch(url).await {
            Ok(data_uri) => Preview::Ready(data_uri),
            Err(e) => {
                warn!("Preview failed for {:?}: {}", url.map(Url::as_str), e);
                Preview::Failed(e.to_string())
            }
        }
    }

    pub async fn try_fetch(&self, url: Option<&Url>) -> Result<String, PreviewError> {
        let url = url.ok_or(PreviewError::MissingUrl)?;

        let response = self
            .http_service
            .get_with_timeout(url.as_str(), self.timeout)
            .await?
            .error_for_status()?;
        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(PreviewError::TooLarge(self.max_bytes));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(PreviewError::TooLarge(self.max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        let max_size = self.max_size;
        let jpeg = tokio::task::spawn_blocking(move || render_thumbnail(&bytes, max_size))
            .await
            .map_err(|e| PreviewError::Processing(e.to_string()))??;

        Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
    }
}

/// Decodes `bytes` (first frame only), shrinks to fit `max_size` square keeping
/// the aspect ratio, and re-encodes as RGB JPEG.
pub fn render_thumbnail(bytes: &[u8], max_size: u32) -> Result<Vec<u8>, PreviewError> {
    let image = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?.decode()?;

    let image = if image.width() > max_size || image.height() > max_size {
        image.thumbnail(max_size, max_size)
    } else {
        image
    };

    let mut output = Cursor::new(Vec::new());
    image
        .to_rgb8()
        .write_with_encoder(JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY))?;

    Ok(output.into_inner())
}
