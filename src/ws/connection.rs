#![expect(
    clippy::module_name_repetitions,
    reason = "Connection types expose their domain in the name for clarity"
)]

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockWriteGuard, Weak};
use std::time::Duration;

use async_stream::try_stream;
use backoff::backoff::Backoff;
use futures::{SinkExt as _, Stream, StreamExt as _};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum_macros::Display;
use tokio::net::TcpStream;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use super::config::Config;
use super::endpoint;
use super::error::WsError;
use super::subscription::{ControlMessage, TopicSet};
use super::traits::{JsonParser, MessageParser};
use crate::Result;
use crate::auth::{CredentialStore, UserId};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

type MessageCallback<M> = Arc<dyn Fn(&M) + Send + Sync>;

/// Broadcast channel capacity for incoming messages.
const BROADCAST_CAPACITY: usize = 1024;

/// Broadcast channel capacity for lifecycle events.
const EVENT_CAPACITY: usize = 64;

/// Status of the real-time connection as seen by the UI.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// A connection attempt is in flight
    Connecting,
    /// Connected; sends are accepted
    Open,
    /// Not connected (initial state, after a close, and after retries run out)
    Closed,
    /// The transport reported an error; a close usually follows
    Error,
}

impl ConnectionStatus {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Lifecycle notifications, in the order they happen.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connection attempt started. `attempt` is the retry counter at that moment
    /// (`0` for a caller-initiated connect).
    Connecting { attempt: u32 },
    /// The connection opened and subscriptions were replayed
    Opened,
    /// The transport reported an error
    Error,
    /// The connection closed, either unexpectedly or through `disconnect`
    Closed,
    /// An automatic reconnection will run after `delay` as attempt number `attempt`
    ReconnectScheduled { attempt: u32, delay: Duration },
}

/// Frames queued for the session task.
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// The single live connection owned by the manager.
struct Session {
    generation: u64,
    outbound: mpsc::UnboundedSender<Outbound>,
    task: JoinHandle<()>,
    opened: bool,
}

impl Session {
    /// Discard this connection. An open socket gets a close frame; an attempt still in
    /// flight is aborted.
    fn close(self) {
        if self.opened {
            _ = self.outbound.send(Outbound::Close);
        } else {
            self.task.abort();
        }
    }
}

/// Reconnect timer armed after the close of connection `generation`.
struct PendingReconnect {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Mutable connection lifecycle. Every transition happens under one lock so that
/// `connect`, `disconnect`, the session callbacks and the reconnect timer never interleave.
struct Lifecycle {
    generation: u64,
    session: Option<Session>,
    reconnect: Option<PendingReconnect>,
    attempts: u32,
    backoff: Box<dyn Backoff + Send>,
}

impl Lifecycle {
    /// Whether `generation` is the connection currently owned by the manager.
    fn is_current(&self, generation: u64) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.generation == generation)
    }

    fn is_open(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.opened)
    }

    fn cancel_reconnect(&mut self) {
        if let Some(pending) = self.reconnect.take() {
            pending.handle.abort();
        }
    }

    fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
    }
}

struct Inner<M, P> {
    base: Url,
    config: Config,
    store: Arc<dyn CredentialStore>,
    parser: P,
    topics: RwLock<TopicSet>,
    lifecycle: Mutex<Lifecycle>,
    status_tx: watch::Sender<ConnectionStatus>,
    events_tx: broadcast::Sender<ConnectionEvent>,
    inbound_tx: broadcast::Sender<M>,
    last_message: RwLock<Option<M>>,
    callback: RwLock<Option<MessageCallback<M>>>,
}

/// Manages one real-time connection: lifecycle, subscriptions, reconnection and delivery.
///
/// - [`connect`](Self::connect) opens the connection in a background task and returns
///   immediately; [`disconnect`](Self::disconnect) closes it and cancels any pending retry
/// - [`send`](Self::send), [`subscribe`](Self::subscribe) and
///   [`unsubscribe`](Self::unsubscribe) report `false` instead of failing while offline
/// - after an unexpected close a reconnect is scheduled until
///   [`ReconnectConfig::max_attempts`](super::config::ReconnectConfig::max_attempts) is used
///   up; every successful open resets the counter and replays the topic set
/// - inbound frames go through the parser `P`, then to the last-message slot, the
///   [`on_message`](Self::on_message) callback and every [`messages`](Self::messages) stream
///
/// The manager is a cheap handle: clones share the same connection. Background tasks only
/// hold weak references, so dropping the last handle shuts everything down.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use futures::StreamExt as _;
/// use khwopacoder_client::auth::MemoryStore;
/// use khwopacoder_client::ws::{ConnectionManager, JsonParser};
/// use khwopacoder_client::ws::config::Config;
///
/// # async fn example() -> khwopacoder_client::Result<()> {
/// let config = Config::builder().topics(vec!["leaderboard".to_owned()]).build();
/// let store = Arc::new(MemoryStore::new());
/// let connection: ConnectionManager =
///     ConnectionManager::new("http://localhost:8000", config, store, JsonParser)?;
///
/// connection.connect()?;
/// let mut messages = Box::pin(connection.messages());
/// while let Some(message) = messages.next().await {
///     println!("{:?}", message?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConnectionManager<M = Value, P = JsonParser>
where
    M: DeserializeOwned + Debug + Clone + Send + Sync + 'static,
    P: MessageParser<M>,
{
    inner: Arc<Inner<M, P>>,
}

impl<M, P> Clone for ConnectionManager<M, P>
where
    M: DeserializeOwned + Debug + Clone + Send + Sync + 'static,
    P: MessageParser<M>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M, P> ConnectionManager<M, P>
where
    M: DeserializeOwned + Debug + Clone + Send + Sync + 'static,
    P: MessageParser<M>,
{
    /// Create a manager for the server at `base` (for example `https://api.example.com`).
    ///
    /// Nothing is opened until [`connect`](Self::connect) is called.
    pub fn new(
        base: &str,
        config: Config,
        store: Arc<dyn CredentialStore>,
        parser: P,
    ) -> Result<Self> {
        let base = Url::parse(base)?;
        endpoint::websocket_scheme(&base)?;

        let (status_tx, _) = watch::channel(ConnectionStatus::Closed);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let (inbound_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        let lifecycle = Lifecycle {
            generation: 0,
            session: None,
            reconnect: None,
            attempts: 0,
            backoff: config.reconnect.strategy.backoff(),
        };

        Ok(Self {
            inner: Arc::new(Inner {
                base,
                topics: RwLock::new(TopicSet::new(&config.topics)),
                config,
                store,
                parser,
                lifecycle: Mutex::new(lifecycle),
                status_tx,
                events_tx,
                inbound_tx,
                last_message: RwLock::new(None),
                callback: RwLock::new(None),
            }),
        })
    }

    /// Open the connection.
    ///
    /// A no-op while a connection is open. Otherwise any existing connection object and
    /// pending reconnect are discarded, the retry counter starts over, and a new attempt
    /// is started in the background with status [`ConnectionStatus::Connecting`].
    ///
    /// Only local failures are returned (credential store I/O, endpoint construction);
    /// network failures go through the reconnection path.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn connect(&self) -> Result<()> {
        let mut lifecycle = self.inner.lifecycle();
        if lifecycle.is_open() {
            return Ok(());
        }

        lifecycle.attempts = 0;
        lifecycle.backoff.reset();
        self.inner.connect_locked(&mut lifecycle)
    }

    /// Close the connection, cancel any pending reconnect and set status
    /// [`ConnectionStatus::Closed`]. Safe to call in any state.
    pub fn disconnect(&self) {
        self.inner.disconnect();
    }

    /// Serialize and transmit `message`.
    ///
    /// Returns `false` without sending unless the status is [`ConnectionStatus::Open`].
    pub fn send<R: Serialize>(&self, message: &R) -> bool {
        self.inner.send(message)
    }

    /// Add `topic` to the replayed set and announce it to the server.
    ///
    /// The set is updated even when the announcement cannot be sent; the return value only
    /// reports whether the control message went out.
    pub fn subscribe(&self, topic: &str) -> bool {
        self.inner.topics_mut().insert(topic);
        self.inner.send(&ControlMessage::subscribe(topic))
    }

    /// Remove `topic` from the replayed set and tell the server.
    ///
    /// The set is updated even when the message cannot be sent.
    pub fn unsubscribe(&self, topic: &str) -> bool {
        self.inner.topics_mut().remove(topic);
        self.inner.send(&ControlMessage::unsubscribe(topic))
    }

    /// Re-establish an open connection after the signed-in user changed, so the new token
    /// takes effect. Does nothing unless the status is [`ConnectionStatus::Open`], and does
    /// not count as a retry.
    pub fn identity_changed(&self) -> Result<()> {
        self.inner.identity_changed()
    }

    /// Call [`identity_changed`](Self::identity_changed) whenever `identity` publishes a
    /// different user. The task ends when the sender or this manager is dropped.
    pub fn follow_identity(&self, mut identity: watch::Receiver<Option<UserId>>) -> JoinHandle<()> {
        let inner = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            let mut current = identity.borrow_and_update().clone();

            while identity.changed().await.is_ok() {
                let next = identity.borrow_and_update().clone();
                if next == current {
                    continue;
                }
                current = next;

                let Some(inner) = inner.upgrade() else {
                    break;
                };

                #[cfg(feature = "tracing")]
                tracing::debug!(signed_in = current.is_some(), "Identity changed");

                if let Err(e) = inner.identity_changed() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %e, "Unable to reconnect after identity change");
                    #[cfg(not(feature = "tracing"))]
                    let _ = &e;
                }
            }
        })
    }

    /// Register the callback invoked once per inbound message, in arrival order.
    /// Replaces any previous callback.
    pub fn on_message<F>(&self, callback: F)
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        *self
            .inner
            .callback
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    /// Stream of inbound messages received after this call.
    ///
    /// Each call returns an independent stream. A consumer that falls more than
    /// the channel capacity behind receives [`WsError::Lagged`] and the stream ends; call
    /// `messages` again to resume.
    pub fn messages(&self) -> impl Stream<Item = Result<M>> + use<M, P> {
        let mut rx = self.inner.inbound_tx.subscribe();

        try_stream! {
            loop {
                match rx.recv().await {
                    Ok(message) => yield message,
                    Err(RecvError::Lagged(count)) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("Message stream lagged, missed {count} messages");
                        Err(WsError::Lagged { count })?;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    /// The most recently received message.
    #[must_use]
    pub fn last_message(&self) -> Option<M> {
        self.inner
            .last_message
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the current connection status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.inner.status()
    }

    /// Subscribe to status changes.
    #[must_use]
    pub fn status_receiver(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Subscribe to lifecycle events.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Number of automatic reconnection attempts since the last successful open.
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.lifecycle().attempts
    }

    /// The topics replayed on the next (re)connect, in order.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.inner
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_slice()
            .to_vec()
    }

    /// The URL the next connection attempt will use. Generates and persists the client id
    /// if the store has none yet.
    pub fn endpoint(&self) -> Result<Url> {
        self.inner.endpoint()
    }
}

impl<M, P> Inner<M, P>
where
    M: DeserializeOwned + Debug + Clone + Send + Sync + 'static,
    P: MessageParser<M>,
{
    // Poisoned locks are recovered: every critical section leaves the state consistent.
    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn topics_mut(&self) -> RwLockWriteGuard<'_, TopicSet> {
        self.topics.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn status(&self) -> ConnectionStatus {
        *self.status_tx.borrow()
    }

    fn set_status(&self, status: ConnectionStatus) {
        let previous = self.status_tx.send_replace(status);
        if previous == status {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%previous, %status, "Connection status changed");

        let event = match status {
            ConnectionStatus::Open => ConnectionEvent::Opened,
            ConnectionStatus::Closed => ConnectionEvent::Closed,
            ConnectionStatus::Error => ConnectionEvent::Error,
            // announced with its attempt number by `connect_locked`
            ConnectionStatus::Connecting => return,
        };
        self.emit(event);
    }

    fn emit(&self, event: ConnectionEvent) {
        _ = self.events_tx.send(event);
    }

    fn endpoint(&self) -> Result<Url> {
        let client_id = self.store.client_id_or_init()?;
        let token = self.store.token()?;
        let topics = self
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_slice()
            .to_vec();

        endpoint::endpoint(&self.base, &client_id, token.as_ref(), &topics)
    }

    /// Replace whatever connection exists with a fresh attempt.
    fn connect_locked(self: &Arc<Self>, lifecycle: &mut Lifecycle) -> Result<()> {
        let endpoint = self.endpoint()?;

        lifecycle.cancel_reconnect();
        lifecycle.teardown();
        lifecycle.generation = lifecycle.generation.wrapping_add(1);
        let generation = lifecycle.generation;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            endpoint = %endpoint::redacted(&endpoint),
            attempt = lifecycle.attempts,
            "Connecting"
        );

        self.set_status(ConnectionStatus::Connecting);
        self.emit(ConnectionEvent::Connecting {
            attempt: lifecycle.attempts,
        });

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(Self::run_session(
            Arc::downgrade(self),
            generation,
            endpoint,
            outbound_rx,
        ));

        lifecycle.session = Some(Session {
            generation,
            outbound: outbound_tx,
            task,
            opened: false,
        });

        Ok(())
    }

    fn disconnect(&self) {
        let mut lifecycle = self.lifecycle();
        lifecycle.cancel_reconnect();
        lifecycle.teardown();
        self.set_status(ConnectionStatus::Closed);
    }

    fn identity_changed(self: &Arc<Self>) -> Result<()> {
        let mut lifecycle = self.lifecycle();
        if !self.status().is_open() {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Re-establishing connection for new identity");

        lifecycle.cancel_reconnect();
        lifecycle.teardown();
        self.set_status(ConnectionStatus::Closed);
        self.connect_locked(&mut lifecycle)
    }

    fn send<R: Serialize>(&self, message: &R) -> bool {
        let lifecycle = self.lifecycle();
        if !self.status().is_open() {
            return false;
        }
        let Some(session) = lifecycle.session.as_ref().filter(|session| session.opened) else {
            return false;
        };

        match serde_json::to_string(message) {
            Ok(json) => session.outbound.send(Outbound::Text(json)).is_ok(),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "Unable to serialize outbound message");
                #[cfg(not(feature = "tracing"))]
                let _ = &e;
                false
            }
        }
    }

    /// Drive one connection from handshake to close.
    async fn run_session(
        inner: Weak<Self>,
        generation: u64,
        endpoint: Url,
        mut outbound: mpsc::UnboundedReceiver<Outbound>,
    ) {
        match connect_async(endpoint.as_str()).await {
            Ok((ws_stream, _)) => {
                let Some(replay) = inner.upgrade().and_then(|this| this.on_open(generation))
                else {
                    // superseded while the handshake was in flight
                    return;
                };

                if let Err(e) =
                    Self::handle_connection(&inner, generation, ws_stream, replay, &mut outbound)
                        .await
                {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %e, "Connection failed");
                    #[cfg(not(feature = "tracing"))]
                    let _ = &e;

                    if let Some(this) = inner.upgrade() {
                        this.on_error(generation);
                    }
                }
            }
            Err(e) => {
                let error = WsError::Connection(e);
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    endpoint = %endpoint::redacted(&endpoint),
                    error = %error,
                    "Unable to connect"
                );
                #[cfg(not(feature = "tracing"))]
                let _ = &error;

                if let Some(this) = inner.upgrade() {
                    this.on_error(generation);
                }
            }
        }

        if let Some(this) = inner.upgrade() {
            this.on_close(generation);
        }
    }

    /// Handle an active WebSocket connection until it closes or is discarded.
    async fn handle_connection(
        inner: &Weak<Self>,
        generation: u64,
        ws_stream: WsStream,
        replay: Vec<String>,
        outbound: &mut mpsc::UnboundedReceiver<Outbound>,
    ) -> std::result::Result<(), WsError> {
        let (mut write, mut read) = ws_stream.split();

        for frame in replay {
            write
                .send(Message::Text(frame.into()))
                .await
                .map_err(WsError::Connection)?;
        }

        loop {
            tokio::select! {
                // Handle incoming messages
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            #[cfg(feature = "tracing")]
                            tracing::trace!(%text, "Received WebSocket text message");
                            Self::dispatch(inner, generation, text.as_bytes());
                        }
                        Some(Ok(Message::Binary(bytes))) => {
                            Self::dispatch(inner, generation, &bytes);
                        }
                        Some(Ok(Message::Close(_))) => return Ok(()),
                        // dropped without a close frame
                        None => return Err(WsError::ConnectionClosed),
                        Some(Err(e)) => return Err(WsError::Connection(e)),
                        Some(Ok(_)) => {
                            // Ping/pong are answered by tungstenite itself.
                        }
                    }
                }

                // Handle outgoing messages and shutdown requests
                Some(outgoing) = outbound.recv() => {
                    match outgoing {
                        Outbound::Text(text) => {
                            write
                                .send(Message::Text(text.into()))
                                .await
                                .map_err(WsError::Connection)?;
                        }
                        Outbound::Close => {
                            _ = write.send(Message::Close(None)).await;
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    fn dispatch(inner: &Weak<Self>, generation: u64, bytes: &[u8]) {
        let Some(this) = inner.upgrade() else {
            return;
        };

        match this.parser.parse(bytes) {
            Ok(messages) => {
                for message in messages {
                    this.deliver(generation, message);
                }
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "Failed to parse WebSocket message");
                #[cfg(not(feature = "tracing"))]
                let _ = &e;
            }
        }
    }

    fn deliver(&self, generation: u64, message: M) {
        if !self.lifecycle().is_current(generation) {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(?message, "Parsed WebSocket message");

        *self
            .last_message
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.clone());

        let callback = self
            .callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(&message);
        }

        _ = self.inbound_tx.send(message);
    }

    /// Mark `generation` open, reset the retry state and return the replay frames.
    /// `None` means the connection was discarded in the meantime.
    fn on_open(&self, generation: u64) -> Option<Vec<String>> {
        let mut lifecycle = self.lifecycle();
        if !lifecycle.is_current(generation) {
            return None;
        }

        if let Some(session) = lifecycle.session.as_mut() {
            session.opened = true;
        }
        lifecycle.attempts = 0;
        lifecycle.backoff.reset();
        lifecycle.cancel_reconnect();
        self.set_status(ConnectionStatus::Open);

        let replay = self
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .replay_frames();

        #[cfg(feature = "tracing")]
        tracing::debug!(topics = replay.len(), "Connected, replaying subscriptions");

        Some(replay)
    }

    fn on_error(&self, generation: u64) {
        let lifecycle = self.lifecycle();
        if lifecycle.is_current(generation) {
            self.set_status(ConnectionStatus::Error);
        }
    }

    fn on_close(self: &Arc<Self>, generation: u64) {
        let mut lifecycle = self.lifecycle();
        if !lifecycle.is_current(generation) {
            return;
        }

        lifecycle.session = None;
        self.set_status(ConnectionStatus::Closed);

        let max_attempts = self.config.reconnect.max_attempts;
        if lifecycle.attempts >= max_attempts {
            #[cfg(feature = "tracing")]
            tracing::debug!(max_attempts, "Reconnect attempts exhausted");
            return;
        }

        let delay = lifecycle
            .backoff
            .next_backoff()
            .unwrap_or_else(|| self.config.reconnect.strategy.fallback_delay());
        let attempt = lifecycle.attempts.saturating_add(1);

        #[cfg(feature = "tracing")]
        tracing::debug!(attempt, ?delay, "Scheduling reconnect");

        self.emit(ConnectionEvent::ReconnectScheduled { attempt, delay });

        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            if let Some(this) = weak.upgrade() {
                this.fire_reconnect(generation);
            }
        });

        lifecycle.reconnect = Some(PendingReconnect { generation, handle });
    }

    fn fire_reconnect(self: &Arc<Self>, generation: u64) {
        let mut lifecycle = self.lifecycle();
        match lifecycle.reconnect.take() {
            Some(pending) if pending.generation == generation => {}
            other => {
                // cancelled or replaced after the timer elapsed
                lifecycle.reconnect = other;
                return;
            }
        }

        lifecycle.attempts = lifecycle.attempts.saturating_add(1);

        if let Err(e) = self.connect_locked(&mut lifecycle) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "Unable to start reconnection attempt");
            #[cfg(not(feature = "tracing"))]
            let _ = &e;
        }
    }
}

impl<M, P> Drop for Inner<M, P> {
    fn drop(&mut self) {
        let lifecycle = self
            .lifecycle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        lifecycle.cancel_reconnect();
        if let Some(session) = lifecycle.session.take() {
            session.task.abort();
        }
    }
}
