use std::fmt;

use crate::view_model::{AppViewModel, EntryRowView, PlaylistView, ProgressView};
use crate::{EntryKey, FetchedPlaylist, Playlist, ProgressBoard, ProgressEvent, Selection, SelectionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadFormat {
    #[default]
    Video,
    Mp3,
}

impl fmt::Display for DownloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadFormat::Video => f.write_str("video"),
            DownloadFormat::Mp3 => f.write_str("mp3"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChannelStatus {
    /// Not opened yet (before mount).
    #[default]
    Idle,
    Connecting,
    Connected,
    /// Dropped or closed; progress updates stop for the rest of the session.
    Disconnected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    url_input: String,
    fetching: bool,
    playlist: Option<Playlist>,
    selection: Selection,
    progress: ProgressBoard,
    format: DownloadFormat,
    channel: ChannelStatus,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let entries = self.entries();
        let rows = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| EntryRowView {
                position: index + 1,
                key: entry.key().clone(),
                title: entry.title().unwrap_or("Untitled Video").to_string(),
                thumbnail: entry.thumbnail().map(str::to_string),
                duration: entry.duration(),
                selected: self.selection.contains(entry.key()),
                progress: self.progress.lookup(entry).map(ProgressView::from_event),
            })
            .collect::<Vec<_>>();
        let active_downloads = rows
            .iter()
            .filter_map(|row| row.progress.as_ref())
            .filter(|progress| !progress.status.is_terminal())
            .count();

        AppViewModel {
            url_input: self.url_input.clone(),
            fetching: self.fetching,
            playlist: self.playlist.as_ref().map(|playlist| PlaylistView {
                title: playlist.title().unwrap_or("Unknown Playlist").to_string(),
                entry_count: playlist.len(),
                all_selected: self.selection.is_all_selected(playlist.entries()),
            }),
            rows,
            selected_count: self.selection.len(),
            active_downloads,
            format: self.format,
            channel: self.channel.clone(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn progress(&self) -> &ProgressBoard {
        &self.progress
    }

    pub fn format(&self) -> DownloadFormat {
        self.format
    }

    pub fn channel(&self) -> &ChannelStatus {
        &self.channel
    }

    fn entries(&self) -> &[crate::Entry] {
        self.playlist
            .as_ref()
            .map(Playlist::entries)
            .unwrap_or_default()
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        if self.url_input != text {
            self.url_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.fetching = true;
        self.mark_dirty();
    }

    pub(crate) fn end_fetch(&mut self) {
        self.fetching = false;
        self.mark_dirty();
    }

    /// Replace the playlist wholesale and select every entry.
    /// Progress is kept.
    pub(crate) fn replace_playlist(&mut self, fetched: FetchedPlaylist) {
        let playlist = Playlist::from_fetched(fetched);
        self.selection = Selection::all_of(playlist.entries());
        self.playlist = Some(playlist);
        self.mark_dirty();
    }

    pub(crate) fn toggle_entry(&mut self, key: &EntryKey) {
        let entries = self.playlist.as_ref().map(Playlist::entries).unwrap_or_default();
        if self.selection.toggle(entries, key) {
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_all(&mut self) {
        if let Some(playlist) = self.playlist.as_ref() {
            self.selection.toggle_all(playlist.entries());
            self.mark_dirty();
        }
    }

    pub(crate) fn select_first_n(&mut self, raw: &str) -> Result<usize, SelectionError> {
        let entries = self.playlist.as_ref().map(Playlist::entries).unwrap_or_default();
        let selected = self.selection.select_first_n(entries, raw)?;
        self.mark_dirty();
        Ok(selected)
    }

    pub(crate) fn set_format(&mut self, format: DownloadFormat) {
        if self.format != format {
            self.format = format;
            self.mark_dirty();
        }
    }

    /// Download URLs of the selected entries, in playlist order.
    /// Returns the URLs and the number of selected entries that had none.
    pub(crate) fn selected_download_urls(&self) -> (Vec<String>, usize) {
        let mut urls = Vec::with_capacity(self.selection.len());
        let mut missing = 0;
        for entry in self.entries() {
            if !self.selection.contains(entry.key()) {
                continue;
            }
            match entry.download_url() {
                Some(url) => urls.push(url.to_string()),
                None => missing += 1,
            }
        }
        (urls, missing)
    }

    pub(crate) fn set_channel(&mut self, status: ChannelStatus) {
        if self.channel != status {
            self.channel = status;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_progress(&mut self, event: ProgressEvent) {
        self.progress.apply(event);
        self.mark_dirty();
    }
}
