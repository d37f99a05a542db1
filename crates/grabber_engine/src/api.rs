use std::time::Duration;

use grabber_logging::{grab_debug, grab_info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::types::{DownloadRequest, ErrorBody, PlaylistRequest};
use crate::{ApiError, ApiFailureKind, DownloadAck, MediaFormat, PlaylistInfo};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base of the backend API, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    /// `None` waits as long as the backend takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait PlaylistApi: Send + Sync {
    /// Resolve a playlist or video URL into its entries.
    async fn playlist_info(&self, url: &str) -> Result<PlaylistInfo, ApiError>;

    /// Submit the whole URL list as one batch job.
    async fn start_download(
        &self,
        urls: &[String],
        format: MediaFormat,
    ) -> Result<DownloadAck, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut base = settings.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidUrl, err.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(ApiFailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidUrl, err.to_string()))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let endpoint = self.endpoint(path)?;
        grab_debug!("POST {}", endpoint);

        let response = self
            .client
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .map(|body| body.error)
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::new(
                ApiFailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl PlaylistApi for ReqwestApiClient {
    async fn playlist_info(&self, url: &str) -> Result<PlaylistInfo, ApiError> {
        let info: PlaylistInfo = self
            .post_json("playlist/info", &PlaylistRequest { url })
            .await?;
        grab_info!(
            "Resolved {} into {} entries",
            url,
            info.entries.len()
        );
        Ok(info)
    }

    async fn start_download(
        &self,
        urls: &[String],
        format: MediaFormat,
    ) -> Result<DownloadAck, ApiError> {
        let ack: DownloadAck = self
            .post_json("download", &DownloadRequest { urls, format })
            .await?;
        grab_info!(
            "Download job accepted: {} url(s), format {:?}, ack count {:?}",
            urls.len(),
            format,
            ack.count
        );
        Ok(ack)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiFailureKind::Decode, err.to_string());
    }
    ApiError::new(ApiFailureKind::Network, err.to_string())
}
