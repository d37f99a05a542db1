use std::sync::{mpsc, Arc};

use grabber_core::{
    DownloadFormat, Effect, EntryFields, FetchedPlaylist, Msg, Notice, ProgressEvent,
    ProgressStatus,
};
use grabber_engine::{
    EngineConfig, EngineError, EngineEvent, EngineHandle, EntryInfo, MediaFormat, PlaylistInfo,
    ProgressMessage, ProgressSink, WireStatus,
};
use grabber_logging::{grab_debug, grab_info, grab_warn};

use super::app::AppEvent;

/// Executes core effects against the engine. Notices are handed back to the
/// caller, which owns the terminal.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, event_tx: mpsc::Sender<AppEvent>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config, Arc::new(MsgSink { tx: event_tx }))?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchPlaylist { url } => {
                    grab_info!("FetchPlaylist url={}", url);
                    self.engine.fetch_playlist(url);
                }
                Effect::StartDownload { urls, format } => {
                    grab_info!("StartDownload count={} format={}", urls.len(), format);
                    self.engine.start_download(urls, map_format(format));
                }
                Effect::OpenProgressChannel => self.engine.open_channel(),
                Effect::CloseProgressChannel => self.engine.close_channel(),
                Effect::Notify(notice) => notices.push(notice),
            }
        }
        notices
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

/// Forwards engine events into the app inbox as core messages.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl ProgressSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if self.tx.send(AppEvent::Msg(map_event(event))).is_err() {
            grab_debug!("App inbox closed; dropping engine event");
        }
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PlaylistFetched { url, result } => Msg::PlaylistFetched(
            result.map(map_playlist).map_err(|err| {
                grab_warn!("Fetching {} failed: {}", url, err);
                err.message
            }),
        ),
        EngineEvent::DownloadDispatched { result } => Msg::DownloadDispatched(
            result
                .map(|ack| ack.count.unwrap_or_default())
                .map_err(|err| err.to_string()),
        ),
        EngineEvent::ChannelOpened => Msg::ChannelOpened,
        EngineEvent::Progress(message) => Msg::ProgressReceived(map_progress(message)),
        EngineEvent::ChannelClosed { reason } => Msg::ChannelClosed { reason },
    }
}

fn map_playlist(info: PlaylistInfo) -> FetchedPlaylist {
    FetchedPlaylist {
        title: info.title,
        entries: info.entries.into_iter().map(map_entry).collect(),
    }
}

fn map_entry(entry: EntryInfo) -> EntryFields {
    EntryFields {
        id: entry.id,
        title: entry.title,
        thumbnail: entry.thumbnail,
        duration: entry.duration,
        url: entry.url,
        webpage_url: entry.webpage_url,
    }
}

fn map_progress(message: ProgressMessage) -> ProgressEvent {
    ProgressEvent {
        video_id: message.video_id,
        status: map_status(message.status),
        percent: message.percent,
        message: message.message,
        download_url: message.download_url,
    }
}

fn map_status(status: WireStatus) -> ProgressStatus {
    match status {
        WireStatus::Running => ProgressStatus::Running,
        WireStatus::Finished => ProgressStatus::Finished,
        WireStatus::Error => ProgressStatus::Error,
    }
}

fn map_format(format: DownloadFormat) -> MediaFormat {
    match format {
        DownloadFormat::Video => MediaFormat::Video,
        DownloadFormat::Mp3 => MediaFormat::Mp3,
    }
}
