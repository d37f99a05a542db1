//! Grabber core: pure state machine for playlist selection and progress
//! reconciliation, plus view-model helpers.
mod effect;
mod entry;
mod msg;
mod progress;
mod selection;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notice, NoticeSeverity};
pub use entry::{resolve_entry_key, Entry, EntryFields, EntryKey, FetchedPlaylist, Playlist};
pub use msg::Msg;
pub use progress::{ProgressBoard, ProgressEvent, ProgressStatus};
pub use selection::{Selection, SelectionError};
pub use state::{AppState, ChannelStatus, DownloadFormat};
pub use update::update;
pub use view_model::{AppViewModel, EntryRowView, PlaylistView, ProgressView};
