use grabber_logging::{grab_info, grab_warn};

use crate::{AppState, ChannelStatus, Effect, Msg, Notice};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            if matches!(state.channel(), ChannelStatus::Idle) {
                state.set_channel(ChannelStatus::Connecting);
                vec![Effect::OpenProgressChannel]
            } else {
                Vec::new()
            }
        }
        Msg::Unmounted => match state.channel() {
            ChannelStatus::Connecting | ChannelStatus::Connected => {
                state.set_channel(ChannelStatus::Disconnected {
                    reason: "closed".to_string(),
                });
                vec![Effect::CloseProgressChannel]
            }
            ChannelStatus::Idle | ChannelStatus::Disconnected { .. } => Vec::new(),
        },
        Msg::UrlInputChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::FetchClicked => {
            let url = state.url_input().trim().to_string();
            if url.is_empty() {
                vec![Effect::Notify(Notice::error("Please enter a playlist URL"))]
            } else if state.is_fetching() {
                // Trigger is disabled while a fetch is in flight.
                Vec::new()
            } else {
                state.begin_fetch();
                vec![Effect::FetchPlaylist { url }]
            }
        }
        Msg::PlaylistFetched(result) => {
            state.end_fetch();
            match result {
                Ok(fetched) => {
                    grab_info!("Playlist fetched with {} entries", fetched.entries.len());
                    state.replace_playlist(fetched);
                    Vec::new()
                }
                Err(message) => vec![Effect::Notify(Notice::error(format!(
                    "Failed to fetch playlist: {message}"
                )))],
            }
        }
        Msg::ToggleEntry(key) => {
            state.toggle_entry(&key);
            Vec::new()
        }
        Msg::ToggleAllClicked => {
            state.toggle_all();
            Vec::new()
        }
        Msg::SelectFirstN(raw) => match state.select_first_n(&raw) {
            Ok(_) => Vec::new(),
            Err(err) => {
                grab_info!("Rejected selection count: {}", err);
                vec![Effect::Notify(Notice::error("Please enter a valid number"))]
            }
        },
        Msg::FormatChosen(format) => {
            state.set_format(format);
            Vec::new()
        }
        Msg::DownloadClicked => {
            if state.selection().is_empty() {
                return (state, Vec::new());
            }
            let (urls, missing) = state.selected_download_urls();
            if missing > 0 {
                grab_warn!("{} selected entries have no download URL and were skipped", missing);
            }
            if urls.is_empty() {
                Vec::new()
            } else {
                vec![Effect::StartDownload {
                    urls,
                    format: state.format(),
                }]
            }
        }
        Msg::DownloadDispatched(result) => match result {
            Ok(_) => vec![Effect::Notify(Notice::info("Download started!"))],
            Err(message) => {
                grab_warn!("Download request failed: {}", message);
                vec![Effect::Notify(Notice::error("Failed to start download"))]
            }
        },
        Msg::ChannelOpened => {
            state.set_channel(ChannelStatus::Connected);
            Vec::new()
        }
        Msg::ChannelClosed { reason } => {
            state.set_channel(ChannelStatus::Disconnected { reason });
            Vec::new()
        }
        Msg::ProgressReceived(event) => {
            state.apply_progress(event);
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}
