use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Playlist as returned by `POST /playlist/info`.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct PlaylistInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<EntryInfo>,
}

/// One playlist item. Every field is optional; flat playlists often omit `id`.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct EntryInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    #[default]
    Video,
    Mp3,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlaylistRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DownloadRequest<'a> {
    pub urls: &'a [String],
    pub format: MediaFormat,
}

/// Acknowledgement of a batch download request. The job itself is not tracked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct DownloadAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

/// Status values accepted on the progress channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireStatus {
    #[serde(alias = "queued", alias = "downloading")]
    Running,
    Finished,
    Error,
}

/// One push-channel frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressMessage {
    pub video_id: String,
    pub status: WireStatus,
    #[serde(default)]
    pub percent: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PlaylistFetched {
        url: String,
        result: Result<PlaylistInfo, ApiError>,
    },
    DownloadDispatched {
        result: Result<DownloadAck, ApiError>,
    },
    ChannelOpened,
    Progress(ProgressMessage),
    ChannelClosed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiFailureKind,
    /// Server-provided `error` text when available, otherwise the transport error.
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for ApiFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailureKind::InvalidUrl => write!(f, "invalid url"),
            ApiFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailureKind::Timeout => write!(f, "timeout"),
            ApiFailureKind::Network => write!(f, "network error"),
            ApiFailureKind::Decode => write!(f, "invalid response body"),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
