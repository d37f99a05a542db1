use std::sync::{mpsc, Arc};
use std::time::Duration;

use futures_util::SinkExt;
use grabber_engine::{
    ChannelError, ChannelProgressSink, EngineEvent, ProgressChannel, ProgressMessage, WireStatus,
};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;

/// Accepts one client, sends `frames`, then closes unless told to hold the
/// connection open until `hold` fires.
async fn serve_frames(frames: Vec<&'static str>, hold: Option<oneshot::Receiver<()>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        for frame in frames {
            ws.send(Message::Text(frame.into())).await.unwrap();
        }
        match hold {
            Some(hold) => {
                let _ = hold.await;
                // Drain until the client's close frame arrives.
                use futures_util::StreamExt;
                while let Some(Ok(_)) = ws.next().await {}
            }
            None => {
                let _ = ws.close(None).await;
            }
        }
    });
    format!("ws://{addr}/ws")
}

fn collect(rx: &mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.recv_timeout(Duration::from_secs(5)) {
        let closed = matches!(event, EngineEvent::ChannelClosed { .. });
        events.push(event);
        if closed {
            break;
        }
    }
    events
}

fn running(video_id: &str, percent: f64) -> EngineEvent {
    EngineEvent::Progress(ProgressMessage {
        video_id: video_id.to_string(),
        status: WireStatus::Running,
        percent,
        message: None,
        download_url: None,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn forwards_valid_frames_and_drops_bad_ones() {
    let url = serve_frames(
        vec![
            r#"{"video_id":"a1","status":"downloading","percent":10}"#,
            "{not json",
            r#"{"video_id":"a1","status":"exploded","percent":20}"#,
            r#"{"video_id":"a1","status":"downloading","percent":55}"#,
            r#"{"video_id":"a1","status":"error","percent":0,"message":"Download failed"}"#,
        ],
        None,
    )
    .await;

    let (tx, rx) = mpsc::channel();
    let _channel = ProgressChannel::open(&url, Arc::new(ChannelProgressSink::new(tx)))
        .await
        .expect("open channel");

    let events = tokio::task::spawn_blocking(move || collect(&rx))
        .await
        .unwrap();

    assert_eq!(events.len(), 5);
    assert_eq!(events[0], EngineEvent::ChannelOpened);
    assert_eq!(events[1], running("a1", 10.0));
    assert_eq!(events[2], running("a1", 55.0));
    assert_eq!(
        events[3],
        EngineEvent::Progress(ProgressMessage {
            video_id: "a1".to_string(),
            status: WireStatus::Error,
            percent: 0.0,
            message: Some("Download failed".to_string()),
            download_url: None,
        })
    );
    assert!(matches!(events[4], EngineEvent::ChannelClosed { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn client_close_ends_listener() {
    let (release_tx, release_rx) = oneshot::channel();
    let url = serve_frames(
        vec![r#"{"video_id":"k","status":"running","percent":1}"#],
        Some(release_rx),
    )
    .await;

    let (tx, rx) = mpsc::channel();
    let channel = ProgressChannel::open(&url, Arc::new(ChannelProgressSink::new(tx)))
        .await
        .expect("open channel");

    let first_two = tokio::task::spawn_blocking(move || {
        let opened = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let progress = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        (opened, progress, rx)
    })
    .await
    .unwrap();
    assert_eq!(first_two.0, EngineEvent::ChannelOpened);
    assert_eq!(first_two.1, running("k", 1.0));

    channel.close().await;
    let _ = release_tx.send(());

    let closed = first_two.2.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(
        closed,
        EngineEvent::ChannelClosed {
            reason: "closed by client".to_string()
        }
    );
}

#[tokio::test]
async fn connect_failure_is_reported() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (tx, rx) = mpsc::channel();
    let url = format!("ws://{addr}/ws");
    let result = ProgressChannel::open(&url, Arc::new(ChannelProgressSink::new(tx))).await;

    assert!(matches!(result, Err(ChannelError::Connect { .. })));
    assert!(rx.try_recv().is_err());
}
