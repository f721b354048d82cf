//! JSON wire encoding for trade messages.

use crate::b85;
use crate::trade::{TradeRequest, TradeResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A message that crosses the trade boundary as UTF-8 JSON.
pub trait Wire: Serialize + DeserializeOwned {
    fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    fn from_json(data: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(data)?)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn from_bytes(data: &[u8]) -> Result<Self, WireError> {
        Ok(serde_json::from_slice(data)?)
    }
}

impl Wire for TradeRequest {}
impl Wire for TradeResponse {}

/// Error encoding or decoding a wire message.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed image payload: {0}")]
    Image(b85::DecodeError),
}
