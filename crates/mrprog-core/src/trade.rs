//! Trade messages.
//!
//! A requester sends a [`TradeRequest`]; the worker answers with one or more
//! [`TradeResponse`]s (an `InProgress` response carrying the room code image,
//! then a terminal one).

use crate::b85;
use crate::item::TradeItem;
use crate::wire::WireError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A request to trade one item to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub user_name: String,
    pub user_id: u64,
    pub channel_id: u64,
    /// Originating system (e.g. `switch`, `steam`).
    pub system: String,
    pub game: u8,
    pub trade_id: u64,
    pub trade_item: TradeItem,
    /// Reserved for scheduling; not used by the worker.
    #[serde(default)]
    pub priority: u32,
}

/// Result code of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TradeStatus {
    Success,
    InProgress,
    UserTimeout,
    Retrying,
    Failure,
    CriticalFailure,
    Cancelled,
}

impl TradeStatus {
    pub const ALL: [TradeStatus; 7] = [
        TradeStatus::Success,
        TradeStatus::InProgress,
        TradeStatus::UserTimeout,
        TradeStatus::Retrying,
        TradeStatus::Failure,
        TradeStatus::CriticalFailure,
        TradeStatus::Cancelled,
    ];

    /// Wire code.
    pub fn code(self) -> u8 {
        match self {
            TradeStatus::Success => 0,
            TradeStatus::InProgress => 1,
            TradeStatus::UserTimeout => 2,
            TradeStatus::Retrying => 3,
            TradeStatus::Failure => 4,
            TradeStatus::CriticalFailure => 5,
            TradeStatus::Cancelled => 6,
        }
    }

    /// `InProgress` and `Failure` belong to orchestration layers; a trade
    /// session never ends with them.
    pub fn is_session_terminal(self) -> bool {
        !matches!(self, TradeStatus::InProgress | TradeStatus::Failure)
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TradeStatus::Success => "SUCCESS",
            TradeStatus::InProgress => "IN_PROGRESS",
            TradeStatus::UserTimeout => "USER_TIMEOUT",
            TradeStatus::Retrying => "RETRYING",
            TradeStatus::Failure => "FAILURE",
            TradeStatus::CriticalFailure => "CRITICAL_FAILURE",
            TradeStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

impl TryFrom<u8> for TradeStatus {
    type Error = StatusCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(StatusCodeError { code, kind: "trade status" })
    }
}

impl From<TradeStatus> for u8 {
    fn from(status: TradeStatus) -> Self {
        status.code()
    }
}

/// Status plus an optional human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOutcome {
    pub status: TradeStatus,
    pub message: Option<String>,
}

impl TradeOutcome {
    pub fn new(status: TradeStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    pub fn success() -> Self {
        Self {
            status: TradeStatus::Success,
            message: None,
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(TradeStatus::CriticalFailure, message)
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.status, message),
            None => fmt::Display::fmt(&self.status, f),
        }
    }
}

/// A worker's answer to a [`TradeRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResponse {
    pub request: TradeRequest,
    pub worker_id: String,
    pub status: TradeStatus,
    pub message: Option<String>,
    pub embed: Option<serde_json::Value>,
    /// Base85 text; see [`TradeResponse::image`].
    #[serde(default, deserialize_with = "non_empty")]
    image: Option<String>,
}

/// An empty image string on the wire means no image.
fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|text| !text.is_empty()))
}

impl TradeResponse {
    pub fn new(request: TradeRequest, worker_id: impl Into<String>, status: TradeStatus) -> Self {
        Self {
            request,
            worker_id: worker_id.into(),
            status,
            message: None,
            embed: None,
            image: None,
        }
    }

    /// Build the response for a finished session.
    pub fn from_outcome(
        request: TradeRequest,
        worker_id: impl Into<String>,
        outcome: TradeOutcome,
    ) -> Self {
        let mut response = Self::new(request, worker_id, outcome.status);
        response.message = outcome.message;
        response
    }

    /// Build the `InProgress` response that relays the room code image.
    pub fn room_code(request: TradeRequest, worker_id: impl Into<String>, image: &[u8]) -> Self {
        let mut response = Self::new(request, worker_id, TradeStatus::InProgress);
        response.set_image(Some(image));
        response
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_embed(mut self, embed: serde_json::Value) -> Self {
        self.embed = Some(embed);
        self
    }

    /// Decoded image bytes, if any.
    pub fn image(&self) -> Result<Option<Vec<u8>>, WireError> {
        self.image
            .as_deref()
            .map(b85::decode)
            .transpose()
            .map_err(WireError::Image)
    }

    /// Attach (or clear) the image. An empty payload clears it.
    pub fn set_image(&mut self, data: Option<&[u8]>) {
        self.image = data.filter(|d| !d.is_empty()).map(b85::encode);
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Availability of a trade worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WorkerStatus {
    Offline,
    Disabled,
    Idle,
    Trading,
    Restarting,
}

impl WorkerStatus {
    pub fn code(self) -> u8 {
        match self {
            WorkerStatus::Offline => 0,
            WorkerStatus::Disabled => 1,
            WorkerStatus::Idle => 2,
            WorkerStatus::Trading => 3,
            WorkerStatus::Restarting => 4,
        }
    }

    pub fn accepts_trades(self) -> bool {
        self == WorkerStatus::Idle
    }
}

impl TryFrom<u8> for WorkerStatus {
    type Error = StatusCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        [
            WorkerStatus::Offline,
            WorkerStatus::Disabled,
            WorkerStatus::Idle,
            WorkerStatus::Trading,
            WorkerStatus::Restarting,
        ]
        .into_iter()
        .find(|status| status.code() == code)
        .ok_or(StatusCodeError { code, kind: "worker status" })
    }
}

impl From<WorkerStatus> for u8 {
    fn from(status: WorkerStatus) -> Self {
        status.code()
    }
}

/// Unknown status code on the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code: {code}")]
pub struct StatusCodeError {
    pub code: u8,
    pub kind: &'static str,
}
