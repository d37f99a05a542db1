use crate::DownloadFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPlaylist { url: String },
    StartDownload { urls: Vec<String>, format: DownloadFormat },
    OpenProgressChannel,
    CloseProgressChannel,
    Notify(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Information,
    Error,
}

/// Blocking-style message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Information,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            text: text.into(),
        }
    }
}
