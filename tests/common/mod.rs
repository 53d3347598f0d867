#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests"
)]
#![allow(
    unused,
    reason = "Not every test binary uses every helper"
)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt as _, StreamExt as _};
use khwopacoder_client::ws::ConnectionEvent;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// One WebSocket upgrade request seen by the mock server.
#[derive(Debug, Clone)]
pub struct Handshake {
    /// Path and query of the upgrade request
    pub uri: String,
    /// Whether the server completed the upgrade
    pub accepted: bool,
}

impl Handshake {
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap()
    }

    /// Decoded query parameters.
    pub fn query(&self) -> HashMap<String, String> {
        url::Url::parse(&format!("http://mock{}", self.uri))
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    /// The raw query string, exactly as sent.
    pub fn raw_query(&self) -> &str {
        self.uri.split_once('?').map_or("", |(_, query)| query)
    }
}

/// Mock WebSocket server.
pub struct MockWsServer {
    addr: SocketAddr,
    accepting: Arc<AtomicBool>,
    live: Arc<AtomicUsize>,
    /// Broadcast messages to ALL connected clients
    message_tx: broadcast::Sender<String>,
    /// Close every connected client
    close_tx: broadcast::Sender<()>,
    handshake_rx: mpsc::UnboundedReceiver<Handshake>,
    /// Text frames received from clients
    received_rx: mpsc::UnboundedReceiver<String>,
}

impl MockWsServer {
    /// Start a mock WebSocket server on a random port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let accepting = Arc::new(AtomicBool::new(true));
        let live = Arc::new(AtomicUsize::new(0));
        let (message_tx, _) = broadcast::channel::<String>(100);
        let (close_tx, _) = broadcast::channel::<()>(16);
        let (handshake_tx, handshake_rx) = mpsc::unbounded_channel::<Handshake>();
        let (received_tx, received_rx) = mpsc::unbounded_channel::<String>();

        let server_accepting = Arc::clone(&accepting);
        let server_live = Arc::clone(&live);
        let server_message_tx = message_tx.clone();
        let server_close_tx = close_tx.clone();

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };

                // Subscribe before the upgrade so nothing sent right after `Open` is missed
                let mut msg_rx = server_message_tx.subscribe();
                let mut close_rx = server_close_tx.subscribe();

                let accept = server_accepting.load(Ordering::SeqCst);
                let handshake_tx = handshake_tx.clone();
                let callback = move |request: &Request, response: Response| {
                    drop(handshake_tx.send(Handshake {
                        uri: request.uri().to_string(),
                        accepted: accept,
                    }));
                    if accept {
                        Ok(response)
                    } else {
                        let mut rejection = ErrorResponse::new(Some("unavailable".to_owned()));
                        *rejection.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
                        Err(rejection)
                    }
                };

                let Ok(ws_stream) = tokio_tungstenite::accept_hdr_async(stream, callback).await
                else {
                    continue;
                };

                let (mut write, mut read) = ws_stream.split();
                let received_tx = received_tx.clone();
                let live = Arc::clone(&server_live);
                live.fetch_add(1, Ordering::SeqCst);

                tokio::spawn(async move {
                    loop {
                        tokio::select! {
                            msg = read.next() => {
                                match msg {
                                    Some(Ok(Message::Text(text))) => {
                                        drop(received_tx.send(text.to_string()));
                                    }
                                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                                    Some(Ok(_)) => {}
                                }
                            }
                            msg = msg_rx.recv() => {
                                match msg {
                                    Ok(text) => {
                                        if write.send(Message::Text(text.into())).await.is_err() {
                                            break;
                                        }
                                    }
                                    Err(_) => break,
                                }
                            }
                            _ = close_rx.recv() => {
                                drop(write.send(Message::Close(None)).await);
                                break;
                            }
                        }
                    }
                    live.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        Self {
            addr,
            accepting,
            live,
            message_tx,
            close_tx,
            handshake_rx,
            received_rx,
        }
    }

    /// HTTP base URL of the server, as the dashboard would configure it.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Accept or reject (HTTP 503) subsequent upgrade requests.
    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    /// Number of currently open server-side connections.
    pub fn live_connections(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Wait until the number of open connections equals `expected`.
    pub async fn wait_for_live(&self, expected: usize) {
        let deadline = Instant::now() + TIMEOUT;
        while self.live_connections() != expected {
            assert!(
                Instant::now() < deadline,
                "expected {expected} live connections, have {}",
                self.live_connections()
            );
            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, message: &str) {
        drop(self.message_tx.send(message.to_owned()));
    }

    /// Close every connected client with a close frame.
    pub fn close_all(&self) {
        drop(self.close_tx.send(()));
    }

    /// The next upgrade request. Panics after [`TIMEOUT`].
    pub async fn next_handshake(&mut self) -> Handshake {
        timeout(TIMEOUT, self.handshake_rx.recv())
            .await
            .expect("timed out waiting for a handshake")
            .unwrap()
    }

    /// `true` if no upgrade request arrives within `window`.
    pub async fn no_handshake_within(&mut self, window: Duration) -> bool {
        timeout(window, self.handshake_rx.recv()).await.is_err()
    }

    /// The next text frame sent by a client. Panics after [`TIMEOUT`].
    pub async fn next_received(&mut self) -> String {
        timeout(TIMEOUT, self.received_rx.recv())
            .await
            .expect("timed out waiting for a client frame")
            .unwrap()
    }

    /// `true` if no client frame arrives within `window`.
    pub async fn nothing_received_within(&mut self, window: Duration) -> bool {
        timeout(window, self.received_rx.recv()).await.is_err()
    }
}

/// Wait for the first event matching `predicate`, skipping others.
pub async fn wait_for_event<F>(
    events: &mut broadcast::Receiver<ConnectionEvent>,
    predicate: F,
) -> ConnectionEvent
where
    F: Fn(&ConnectionEvent) -> bool,
{
    timeout(TIMEOUT, async {
        loop {
            let event = events.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for a connection event")
}

/// Collect events until `stop` matches (inclusive).
pub async fn collect_events_until<F>(
    events: &mut broadcast::Receiver<ConnectionEvent>,
    stop: F,
) -> Vec<ConnectionEvent>
where
    F: Fn(&ConnectionEvent) -> bool,
{
    timeout(TIMEOUT, async {
        let mut seen = Vec::new();
        loop {
            let event = events.recv().await.unwrap();
            let done = stop(&event);
            seen.push(event);
            if done {
                return seen;
            }
        }
    })
    .await
    .expect("timed out collecting connection events")
}
