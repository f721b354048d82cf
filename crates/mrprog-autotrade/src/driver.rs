//! Contracts for the console the trader drives.
//!
//! Controller emulation, frame capture, text recognition and save-state
//! handling are provided by the host; the trader only sees these traits.

use crate::input::Input;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A rectangle of the captured frame, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The emulated controller (the "hands").
#[async_trait]
pub trait Controller: Send + Sync {
    /// Press and release `input`, then wait `settle` before returning.
    async fn press(&self, input: Input, settle: Duration) -> Result<(), DriverError>;
}

/// Frame capture plus text recognition (the "eyes").
#[async_trait]
pub trait Screen: Send + Sync {
    /// Recognize the single line of text inside `region` of the current frame.
    /// `invert` flips the crop before recognition (light text on dark).
    async fn read_text(&self, region: Region, invert: bool) -> Result<String, DriverError>;

    /// Crop `region` of the current frame and encode it as PNG.
    async fn capture_png(&self, region: Region, invert: bool) -> Result<Vec<u8>, DriverError>;
}

/// Restoring the game to a known save.
#[async_trait]
pub trait SaveState: Send + Sync {
    async fn reload_save(&self) -> Result<(), DriverError>;
}

/// Everything a trade session needs from the host.
pub trait Console: Controller + Screen + SaveState {}

impl<T: Controller + Screen + SaveState> Console for T {}

/// Error reported by a host driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("controller: {0}")]
    Controller(String),
    #[error("capture: {0}")]
    Capture(String),
    #[error("text recognition: {0}")]
    Recognition(String),
    #[error("save state: {0}")]
    Save(String),
}
