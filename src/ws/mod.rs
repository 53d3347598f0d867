//! Core WebSocket infrastructure.
//!
//! This module provides the connection manager behind the dashboard's live updates. It is
//! generic over the message type, so the same lifecycle can carry raw JSON or the typed
//! messages of [`crate::realtime`].
//!
//! # Architecture
//!
//! - [`ConnectionManager`]: connection lifecycle, reconnection and subscription replay
//! - [`TopicSet`]: the topics re-announced after every (re)connect
//! - [`MessageParser`]: trait for parsing incoming WebSocket frames
//! - [`endpoint`](endpoint::endpoint): builds `{base}/ws?client_id=..&token=..&topics=..`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use khwopacoder_client::auth::MemoryStore;
//! use khwopacoder_client::ws::config::Config;
//! use khwopacoder_client::ws::{ConnectionManager, JsonParser};
//!
//! # async fn example() -> khwopacoder_client::Result<()> {
//! let config = Config::builder().topics(vec!["leaderboard".to_owned()]).build();
//! let store = Arc::new(MemoryStore::new());
//! let connection: ConnectionManager =
//!     ConnectionManager::new("http://localhost:8000", config, store, JsonParser)?;
//! connection.connect()?;
//! connection.subscribe("challenge:42");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod subscription;
pub mod traits;

pub use connection::{ConnectionEvent, ConnectionManager, ConnectionStatus};
#[expect(
    clippy::module_name_repetitions,
    reason = "WsError includes module name for clarity when used outside this module"
)]
pub use error::WsError;
pub use subscription::{ControlMessage, SubscriptionAction, TopicSet};
pub use traits::*;
