use crate::{ChannelStatus, DownloadFormat, EntryKey, ProgressEvent, ProgressStatus};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub url_input: String,
    /// A playlist request is in flight; the fetch trigger is disabled.
    pub fetching: bool,
    pub playlist: Option<PlaylistView>,
    pub rows: Vec<EntryRowView>,
    pub selected_count: usize,
    /// Rows whose last progress event is not terminal.
    pub active_downloads: usize,
    pub format: DownloadFormat,
    pub channel: ChannelStatus,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn row(&self, position: usize) -> Option<&EntryRowView> {
        position
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
    }

    pub fn select_all_label(&self) -> &'static str {
        match &self.playlist {
            Some(playlist) if playlist.all_selected => "Deselect All",
            _ => "Select All",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistView {
    pub title: String,
    pub entry_count: usize,
    pub all_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryRowView {
    /// 1-based position in playlist order.
    pub position: usize,
    pub key: EntryKey,
    pub title: String,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub selected: bool,
    pub progress: Option<ProgressView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub status: ProgressStatus,
    pub percent: f64,
    pub message: Option<String>,
    pub download_url: Option<String>,
}

impl ProgressView {
    pub(crate) fn from_event(event: &ProgressEvent) -> Self {
        Self {
            status: event.status,
            percent: event.percent,
            message: event.message.clone(),
            download_url: event.download_url.clone(),
        }
    }
}
