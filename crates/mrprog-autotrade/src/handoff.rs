//! One-shot delivery of the room code image.
//!
//! The session holds a [`RoomCodeHandoff`] and settles it exactly once:
//! resolved with the captured image, or cancelled if the room never opened.
//! Dropping an unsettled handoff cancels it, so a waiting
//! [`RoomCodeReceiver`] always wakes up.

use std::fmt;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Create a connected handoff/receiver pair.
pub fn room_code_channel() -> (RoomCodeHandoff, RoomCodeReceiver) {
    let (tx, rx) = oneshot::channel();
    (
        RoomCodeHandoff {
            tx: Some(tx),
            state: HandoffState::Pending,
        },
        RoomCodeReceiver { rx },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffState {
    Pending,
    Resolved,
    Cancelled,
}

impl fmt::Display for HandoffState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandoffState::Pending => f.write_str("pending"),
            HandoffState::Resolved => f.write_str("resolved"),
            HandoffState::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Producer side, owned by the trade session.
#[derive(Debug)]
pub struct RoomCodeHandoff {
    tx: Option<oneshot::Sender<Vec<u8>>>,
    state: HandoffState,
}

impl RoomCodeHandoff {
    pub fn state(&self) -> HandoffState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == HandoffState::Pending
    }

    /// Deliver the PNG-encoded room code. Fails if already settled or if
    /// nobody is listening anymore; either way the handoff is settled after.
    pub fn resolve(&mut self, image: Vec<u8>) -> Result<(), HandoffError> {
        let tx = self.tx.take().ok_or(HandoffError::AlreadySettled(self.state))?;
        self.state = HandoffState::Resolved;
        tx.send(image).map_err(|_| HandoffError::ReceiverDropped)
    }

    /// Cancel if still pending. Returns whether this call did the cancelling.
    pub fn cancel(&mut self) -> bool {
        match self.tx.take() {
            Some(tx) => {
                drop(tx);
                self.state = HandoffState::Cancelled;
                true
            }
            None => false,
        }
    }
}

/// Consumer side, held by whoever relays the room code to the guest.
#[derive(Debug)]
pub struct RoomCodeReceiver {
    rx: oneshot::Receiver<Vec<u8>>,
}

impl RoomCodeReceiver {
    /// Wait for the room code.
    pub async fn recv(self) -> Result<Vec<u8>, HandoffCancelled> {
        self.rx.await.map_err(|_| HandoffCancelled)
    }

    /// `Ok(None)` while the session has not settled the handoff yet.
    pub fn try_recv(&mut self) -> Result<Option<Vec<u8>>, HandoffCancelled> {
        match self.rx.try_recv() {
            Ok(image) => Ok(Some(image)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(HandoffCancelled),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandoffError {
    #[error("room code handoff already {0}")]
    AlreadySettled(HandoffState),
    #[error("room code receiver was dropped")]
    ReceiverDropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("room code handoff was cancelled")]
pub struct HandoffCancelled;
