use std::sync::mpsc;
use std::sync::Arc;

use futures_util::StreamExt;
use grabber_logging::{grab_debug, grab_info, grab_warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, ProgressMessage};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("could not connect to progress channel {url}: {message}")]
    Connect { url: String, message: String },
    #[error("malformed progress frame: {0}")]
    Malformed(String),
}

/// Receiver of engine events.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Parse one text frame of the progress channel.
pub fn parse_progress_message(text: &str) -> Result<ProgressMessage, ChannelError> {
    serde_json::from_str(text).map_err(|err| ChannelError::Malformed(err.to_string()))
}

/// Session-scoped listener on the backend's progress socket.
///
/// The socket stays private to the listener task. Every accepted frame is
/// forwarded to the sink handed to [`ProgressChannel::open`]; the sink also
/// receives `ChannelOpened` and exactly one `ChannelClosed`. There is no
/// reconnect: once closed, the channel stays closed.
pub struct ProgressChannel {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ProgressChannel {
    /// Connect and listen, returning once the handshake has completed.
    pub async fn open(ws_url: &str, sink: Arc<dyn ProgressSink>) -> Result<Self, ChannelError> {
        let socket = connect(ws_url).await?;
        sink.emit(EngineEvent::ChannelOpened);

        let cancel = CancellationToken::new();
        let task = tokio::spawn(listen(socket, sink, cancel.clone()));
        Ok(Self { cancel, task })
    }

    /// Connect and listen on `runtime` without waiting for the handshake.
    ///
    /// A failed or cancelled connect is reported to the sink as
    /// `ChannelClosed`, so the sink sees exactly one close either way.
    pub fn start(runtime: &Handle, ws_url: &str, sink: Arc<dyn ProgressSink>) -> Self {
        let cancel = CancellationToken::new();
        let task = runtime.spawn(connect_and_listen(ws_url.to_string(), sink, cancel.clone()));
        Self { cancel, task }
    }

    /// Cancel the connect or listener and wait for it to finish.
    pub async fn close(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

async fn connect(ws_url: &str) -> Result<Socket, ChannelError> {
    let (socket, _response) = connect_async(ws_url)
        .await
        .map_err(|err| ChannelError::Connect {
            url: ws_url.to_string(),
            message: err.to_string(),
        })?;
    grab_info!("Progress channel connected to {}", ws_url);
    Ok(socket)
}

async fn connect_and_listen(ws_url: String, sink: Arc<dyn ProgressSink>, cancel: CancellationToken) {
    let connected = tokio::select! {
        _ = cancel.cancelled() => Err("closed by client".to_string()),
        result = connect(&ws_url) => result.map_err(|err| err.to_string()),
    };
    match connected {
        Ok(socket) => {
            sink.emit(EngineEvent::ChannelOpened);
            listen(socket, sink, cancel).await;
        }
        Err(reason) => {
            grab_warn!("Progress channel not opened: {}", reason);
            sink.emit(EngineEvent::ChannelClosed { reason });
        }
    }
}

async fn listen(mut socket: Socket, sink: Arc<dyn ProgressSink>, cancel: CancellationToken) {
    let reason = loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = socket.close(None).await;
                break "closed by client".to_string();
            }
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => forward_text(text.as_str(), sink.as_ref()),
                Some(Ok(Message::Close(frame))) => {
                    break frame
                        .map(|frame| frame.reason.to_string())
                        .filter(|reason| !reason.is_empty())
                        .unwrap_or_else(|| "closed by server".to_string());
                }
                Some(Ok(other)) => grab_debug!("Ignoring non-text progress frame: {:?}", other),
                Some(Err(err)) => break err.to_string(),
                None => break "connection ended".to_string(),
            },
        }
    };
    grab_warn!("Progress channel closed: {}", reason);
    sink.emit(EngineEvent::ChannelClosed { reason });
}

fn forward_text(text: &str, sink: &dyn ProgressSink) {
    match parse_progress_message(text) {
        Ok(message) => sink.emit(EngineEvent::Progress(message)),
        Err(err) => grab_warn!("Dropping progress frame: {} ({})", err, text),
    }
}
