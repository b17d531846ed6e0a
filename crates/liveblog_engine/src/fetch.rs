use std::time::Duration;

use feed_logging::feed_debug;
use futures_util::StreamExt;
use liveblog_core::BlogInfo;

use crate::{BlogSource, FailureKind, TransportError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 1024 * 1024,
        }
    }
}

/// Polls a JSON blog document over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestBlogSource {
    url: reqwest::Url,
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestBlogSource {
    pub fn new(url: &str, settings: FetchSettings) -> Result<Self, TransportError> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            url,
            settings,
            client,
        })
    }

    async fn fetch_body(&self) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    fn too_large(&self, actual: u64) -> TransportError {
        TransportError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl BlogSource for ReqwestBlogSource {
    async fn fetch_blog(&self) -> Result<BlogInfo, TransportError> {
        let bytes = self.fetch_body().await?;
        let info: BlogInfo = serde_json::from_slice(&bytes)
            .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))?;
        feed_debug!("Blog status from {}: {:?}", self.url, info.blog_status);
        Ok(info)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
