//! Core types for the MrProg trade worker.
//!
//! This crate holds the vocabulary shared by trade requesters and workers:
//! items, requests, responses and their JSON wire form. Automation lives in
//! `mrprog-autotrade`.

pub mod b85;
mod item;
mod platform;
mod trade;
mod wire;

pub use item::{Chip, ItemParseError, Part, TradeItem, normalize_color};
pub use platform::{Platform, UnknownPlatform};
pub use trade::{
    StatusCodeError, TradeOutcome, TradeRequest, TradeResponse, TradeStatus, WorkerStatus,
};
pub use wire::{Wire, WireError};
