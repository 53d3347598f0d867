//! Core traits for generic WebSocket infrastructure.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::WsError;

/// Message parser trait for converting raw frames to messages.
///
/// The connection manager calls [`MessageParser::parse`] once per received frame. A parse
/// error is logged and the frame is dropped; the connection is unaffected.
///
/// # Example
///
/// ```ignore
/// pub struct ScoreParser;
///
/// impl MessageParser<ScoreUpdate> for ScoreParser {
///     fn parse(&self, bytes: &[u8]) -> crate::Result<Vec<ScoreUpdate>> {
///         let msg: ScoreUpdate = serde_json::from_slice(bytes)?;
///         Ok(vec![msg])
///     }
/// }
/// ```
pub trait MessageParser<M: DeserializeOwned>: Send + Sync + 'static {
    /// Parse one incoming frame into messages.
    ///
    /// May return an empty vec if the frame carries nothing for the caller.
    fn parse(&self, bytes: &[u8]) -> crate::Result<Vec<M>>;
}

/// Parser that accepts any valid JSON document and yields it untouched.
#[expect(
    clippy::exhaustive_structs,
    reason = "Callers construct the parser by name"
)]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl MessageParser<Value> for JsonParser {
    fn parse(&self, bytes: &[u8]) -> crate::Result<Vec<Value>> {
        let value = serde_json::from_slice(bytes).map_err(WsError::MessageParse)?;
        Ok(vec![value])
    }
}
