use std::sync::{mpsc, Arc};
use std::thread;

use grabber_logging::grab_info;

use crate::api::{ApiSettings, PlaylistApi, ReqwestApiClient};
use crate::channel::{ProgressChannel, ProgressSink};
use crate::{ApiError, EngineEvent, MediaFormat};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api: ApiSettings,
    /// Progress channel endpoint, e.g. `ws://localhost:8080/ws`.
    pub ws_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            ws_url: "ws://localhost:8080/ws".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build api client: {0}")]
    Api(#[from] ApiError),
}

enum EngineCommand {
    FetchPlaylist { url: String },
    StartDownload { urls: Vec<String>, format: MediaFormat },
    OpenChannel,
    CloseChannel,
}

/// Executes backend calls and owns the progress channel on a background
/// runtime. Results are reported to the sink given at construction.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, sink: Arc<dyn ProgressSink>) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestApiClient::new(config.api)?);
        Self::with_api(api, config.ws_url, sink)
    }

    pub fn with_api(
        api: Arc<dyn PlaylistApi>,
        ws_url: String,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("grabber-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let mut channel: Option<ProgressChannel> = None;
            let mut closing = Vec::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::FetchPlaylist { url } => {
                        let api = api.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let result = api.playlist_info(&url).await;
                            sink.emit(EngineEvent::PlaylistFetched { url, result });
                        });
                    }
                    EngineCommand::StartDownload { urls, format } => {
                        let api = api.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let result = api.start_download(&urls, format).await;
                            sink.emit(EngineEvent::DownloadDispatched { result });
                        });
                    }
                    EngineCommand::OpenChannel => {
                        if channel.is_none() {
                            channel = Some(ProgressChannel::start(
                                runtime.handle(),
                                &ws_url,
                                sink.clone(),
                            ));
                        }
                    }
                    EngineCommand::CloseChannel => {
                        if let Some(open) = channel.take() {
                            closing.push(runtime.spawn(open.close()));
                        }
                    }
                }
            }
            if let Some(open) = channel.take() {
                closing.push(runtime.spawn(open.close()));
            }
            for handle in closing {
                let _ = runtime.block_on(handle);
            }
            grab_info!("Engine worker stopped");
        });

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            worker: Some(worker),
        })
    }

    pub fn fetch_playlist(&self, url: impl Into<String>) {
        self.send(EngineCommand::FetchPlaylist { url: url.into() });
    }

    pub fn start_download(&self, urls: Vec<String>, format: MediaFormat) {
        self.send(EngineCommand::StartDownload { urls, format });
    }

    pub fn open_channel(&self) {
        self.send(EngineCommand::OpenChannel);
    }

    pub fn close_channel(&self) {
        self.send(EngineCommand::CloseChannel);
    }

    /// Close the progress channel and wait for the worker to stop.
    /// Requests still in flight are abandoned.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, command: EngineCommand) {
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(command);
        }
    }

    fn stop(&mut self) {
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
