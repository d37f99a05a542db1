use crate::{DownloadFormat, EntryKey, FetchedPlaylist, ProgressEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The front end became active; the progress channel should open.
    Mounted,
    /// The front end is shutting down; the progress channel should close.
    Unmounted,
    /// User edited the playlist URL input.
    UrlInputChanged(String),
    /// User asked to resolve the current URL input.
    FetchClicked,
    /// Backend answered the playlist request.
    PlaylistFetched(Result<FetchedPlaylist, String>),
    /// User flipped one entry's checkbox.
    ToggleEntry(EntryKey),
    /// User clicked the combined Select All / Deselect All control.
    ToggleAllClicked,
    /// User asked to keep only the first N entries; raw input text.
    SelectFirstN(String),
    /// User picked the output format.
    FormatChosen(DownloadFormat),
    /// User clicked Download.
    DownloadClicked,
    /// Backend answered the batch download request with the accepted count.
    DownloadDispatched(Result<usize, String>),
    /// The progress channel connected.
    ChannelOpened,
    /// The progress channel went away and will not come back.
    ChannelClosed { reason: String },
    /// One progress message from the push channel.
    ProgressReceived(ProgressEvent),
    /// UI/render tick to coalesce rendering.
    Tick,
}
