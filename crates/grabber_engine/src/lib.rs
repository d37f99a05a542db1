//! Grabber engine: backend HTTP calls, the progress channel and effect execution.
mod api;
mod channel;
mod engine;
mod types;

pub use api::{ApiSettings, PlaylistApi, ReqwestApiClient};
pub use channel::{
    parse_progress_message, ChannelError, ChannelProgressSink, ProgressChannel, ProgressSink,
};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use types::{
    ApiError, ApiFailureKind, DownloadAck, EngineEvent, EntryInfo, MediaFormat, PlaylistInfo,
    ProgressMessage, WireStatus,
};
