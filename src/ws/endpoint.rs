//! Construction of the `{base}/ws` endpoint URL.

use secrecy::{ExposeSecret as _, SecretString};
use url::Url;
use url::form_urlencoded::byte_serialize;

use super::error::WsError;
use crate::Result;
use crate::auth::ClientId;

const WS_PATH: &str = "ws";

/// Build the WebSocket endpoint for `base`.
///
/// `http`/`https` bases are mapped to `ws`/`wss`. The query carries `client_id`, then
/// `token` when present, then `topics` when non-empty. Topics are encoded one by one and
/// joined with a literal comma, so `["a", "b"]` becomes `topics=a,b`.
pub fn endpoint(
    base: &Url,
    client_id: &ClientId,
    token: Option<&SecretString>,
    topics: &[String],
) -> Result<Url> {
    let scheme = websocket_scheme(base)?;

    let mut url = base.clone();
    url.set_scheme(scheme)
        .map_err(|()| WsError::InvalidEndpoint(format!("cannot use scheme `{scheme}`")))?;

    let path = format!("{}/{WS_PATH}", base.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_fragment(None);

    let mut query = format!("client_id={}", encode(&client_id.to_string()));
    if let Some(token) = token {
        query.push_str("&token=");
        query.push_str(&encode(token.expose_secret()));
    }
    if !topics.is_empty() {
        let joined = topics
            .iter()
            .map(|topic| encode(topic))
            .collect::<Vec<_>>()
            .join(",");
        query.push_str("&topics=");
        query.push_str(&joined);
    }
    url.set_query(Some(&query));

    Ok(url)
}

/// The WebSocket scheme matching `base`: `ws` for `http`/`ws`, `wss` for `https`/`wss`.
pub fn websocket_scheme(base: &Url) -> Result<&'static str> {
    match base.scheme() {
        "http" | "ws" => Ok("ws"),
        "https" | "wss" => Ok("wss"),
        other => Err(WsError::InvalidEndpoint(format!(
            "unsupported scheme `{other}` in {}",
            redacted(base)
        ))
        .into()),
    }
}

/// The endpoint without its query string, safe to log.
#[must_use]
pub fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}
