use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::auth::UserId;

/// Message sent by the server on the real-time socket.
///
/// The server tags every message with a `type` field. The types the backend itself emits
/// are decoded into dedicated variants; application payloads broadcast to topics are kept
/// as raw JSON in [`RealtimeMessage::Other`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RealtimeMessage {
    /// First message after the socket opens
    ConnectionEstablished(ConnectionEstablished),
    /// Acknowledges a `subscribe` control message
    Subscribed(TopicAck),
    /// Acknowledges an `unsubscribe` control message
    Unsubscribed(TopicAck),
    /// Any other payload, unchanged
    Other(Value),
}

impl RealtimeMessage {
    /// The `type` tag of this message, if it has one.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::ConnectionEstablished(_) => Some("connection_established"),
            Self::Subscribed(_) => Some("subscribed"),
            Self::Unsubscribed(_) => Some("unsubscribed"),
            Self::Other(value) => value.get("type").and_then(Value::as_str),
        }
    }
}

impl<'de> Deserialize<'de> for RealtimeMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let tag = value.get("type").and_then(Value::as_str);

        let message = match tag {
            Some("connection_established") => Self::ConnectionEstablished(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            ),
            Some("subscribed") => {
                Self::Subscribed(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            Some("unsubscribed") => {
                Self::Unsubscribed(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            _ => Self::Other(value),
        };

        Ok(message)
    }
}

/// Connection confirmation carrying the identity the server resolved.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEstablished {
    #[serde(rename = "type")]
    kind: String,
    /// Client id the server registered (echoes ours, or a fresh one if we sent none)
    pub client_id: String,
    /// User resolved from the token, `None` for anonymous connections
    pub user_id: Option<UserId>,
    /// Topics taken from the connection query
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Subscription acknowledgement.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAck {
    #[serde(rename = "type")]
    kind: String,
    pub topic: String,
}

/// Deserialize messages from the byte slice.
///
/// Handles both single objects and arrays of messages.
/// Returns an empty vector for empty or whitespace-only input.
pub fn parse_messages(bytes: &[u8]) -> crate::Result<Vec<RealtimeMessage>> {
    let trimmed = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(&[][..], |start| &bytes[start..]);

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.first() == Some(&b'[') {
        Ok(serde_json::from_slice(trimmed)?)
    } else {
        let message: RealtimeMessage = serde_json::from_slice(trimmed)?;
        Ok(vec![message])
    }
}
