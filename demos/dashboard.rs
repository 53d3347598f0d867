//! Signs in through the HTTP API and watches the real-time feed as that user.
//!
//! The HTTP client and the connection manager share one credential store, so the token
//! saved by `login` is picked up by the WebSocket handshake. Publishing the new identity
//! reconnects an already open connection with that token.
//!
//! ```sh
//! KHWOPACODER_EMAIL=ram@khwopa.edu.np KHWOPACODER_PASSWORD=... \
//!     RUST_LOG=info cargo run --example dashboard --features api,tracing
//! ```

use std::env;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt as _;
use khwopacoder_client::api::Client;
use khwopacoder_client::api::types::request::{LoginRequest, RankRequest, TopPerformersRequest};
use khwopacoder_client::auth::{CredentialStore, FileStore, IdentityProvider};
use khwopacoder_client::realtime;
use khwopacoder_client::ws::config::Config;
use tokio::time::timeout;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let store = Arc::new(FileStore::new(".khwopacoder.json"));
    let identity = IdentityProvider::default();
    let shared: Arc<dyn CredentialStore> = Arc::<FileStore>::clone(&store);
    let api = Client::from_env()?.with_store(shared);

    let config = Config::builder()
        .topics(vec!["leaderboard".to_owned()])
        .build();
    let live = realtime::client(api.host().as_str(), config, store)?;
    let _follower = live.follow_identity(identity.subscribe());
    live.connect()?;

    match (env::var("KHWOPACODER_EMAIL"), env::var("KHWOPACODER_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            let request = LoginRequest::builder()
                .email(email)
                .password(password)
                .build();
            let token = api.login(&request).await?;
            if let Some(user) = token.user {
                info!(id = %user.id, name = %user.name, points = user.points, "Signed in");
                identity.set(Some(user.id));
            }

            match api.my_rank(&RankRequest::default()).await {
                Ok(rank) => info!(rank = rank.rank, percentile = ?rank.percentile, "My rank"),
                Err(e) => warn!(error = %e, "Unable to fetch rank"),
            }
        }
        _ => info!("KHWOPACODER_EMAIL/KHWOPACODER_PASSWORD unset, staying anonymous"),
    }

    let top = api
        .top_performers(&TopPerformersRequest::builder().limit(5).build())
        .await?;
    for entry in &top {
        info!(rank = entry.rank, name = %entry.name, points = entry.points, "Top performer");
    }

    let challenges = api.challenges().await?;
    info!(count = challenges.len(), "Challenges");

    let mut stream = Box::pin(live.messages());
    while let Ok(Some(result)) = timeout(Duration::from_secs(30), stream.next()).await {
        match result {
            Ok(message) => info!(kind = ?message.kind(), "Live update"),
            Err(e) => warn!(error = %e, "Stream error"),
        }
    }

    live.disconnect();
    Ok(())
}
