//! Live feed from the dashboard's real-time endpoint.
//!
//! Connects anonymously (or with the token saved by the `dashboard` demo), subscribes to
//! the leaderboard and activity topics and prints what arrives, together with every
//! lifecycle event.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,khwopacoder_client=debug cargo run --example realtime --features tracing
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt as _;
use khwopacoder_client::api_url_from_env;
use khwopacoder_client::auth::FileStore;
use khwopacoder_client::realtime::{self, RealtimeMessage};
use khwopacoder_client::ws::config::{Config, ReconnectConfig, ReconnectStrategy};
use khwopacoder_client::ws::endpoint;
use tokio::time::timeout;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = Arc::new(FileStore::new(".khwopacoder.json"));
    let config = Config::builder()
        .topics(vec!["leaderboard".to_owned(), "activities".to_owned()])
        .reconnect(
            ReconnectConfig::builder()
                .max_attempts(10)
                .strategy(ReconnectStrategy::exponential())
                .build(),
        )
        .build();

    let client = realtime::client(&api_url_from_env(), config, store)?;
    info!(endpoint = %endpoint::redacted(&client.endpoint()?), "Connecting");

    let mut events = client.events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(?event, "Connection event");
        }
    });

    client.connect()?;

    let mut stream = Box::pin(client.messages());
    let mut count = 0;
    while let Ok(Some(result)) = timeout(Duration::from_secs(60), stream.next()).await {
        match result {
            Ok(RealtimeMessage::ConnectionEstablished(established)) => info!(
                client_id = %established.client_id,
                user_id = ?established.user_id,
                topics = ?established.topics,
                "Connection established"
            ),
            Ok(message) => info!(kind = ?message.kind(), ?message, "Message"),
            Err(e) => warn!(error = %e, "Stream error"),
        }

        count += 1;
        if count >= 100 {
            break;
        }
    }

    client.disconnect();
    info!(received = count, status = %client.status(), "Done");
    Ok(())
}
