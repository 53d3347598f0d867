//! Typed messages of the KhwopaCoder real-time socket.
//!
//! The backend answers on `/ws` with a small set of control messages (connection
//! confirmation and subscription acknowledgements) and forwards application events
//! published to topics. [`Client`] is a [`ConnectionManager`] that decodes frames into
//! [`RealtimeMessage`] instead of raw JSON.
//!
//! # Example
//!
//! ```rust, no_run
//! use std::sync::Arc;
//!
//! use futures::StreamExt as _;
//! use khwopacoder_client::auth::FileStore;
//! use khwopacoder_client::realtime::{self, RealtimeMessage};
//! use khwopacoder_client::ws::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(FileStore::new("credentials.json"));
//!     let config = Config::builder().topics(vec!["leaderboard".to_owned()]).build();
//!     let client = realtime::client(&khwopacoder_client::api_url_from_env(), config, store)?;
//!
//!     client.connect()?;
//!     let mut messages = Box::pin(client.messages());
//!     while let Some(message) = messages.next().await {
//!         if let RealtimeMessage::Other(event) = message? {
//!             println!("{event}");
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod types;

use std::sync::Arc;

pub use types::{ConnectionEstablished, RealtimeMessage, TopicAck, parse_messages};

use crate::Result;
use crate::auth::CredentialStore;
use crate::ws::config::Config;
use crate::ws::{ConnectionManager, MessageParser};

/// Parser decoding frames into [`RealtimeMessage`]s.
#[expect(
    clippy::exhaustive_structs,
    reason = "Callers construct the parser by name"
)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RealtimeParser;

impl MessageParser<RealtimeMessage> for RealtimeParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RealtimeMessage>> {
        parse_messages(bytes)
    }
}

/// Connection manager speaking the typed real-time protocol.
pub type Client = ConnectionManager<RealtimeMessage, RealtimeParser>;

/// Create a typed real-time client for the server at `base`. Nothing is opened until
/// [`ConnectionManager::connect`] is called.
pub fn client(base: &str, config: Config, store: Arc<dyn CredentialStore>) -> Result<Client> {
    ConnectionManager::new(base, config, store, RealtimeParser)
}
