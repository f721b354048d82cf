//! Timing and screen layout settings for trade sessions.
//!
//! Defaults match the console build the worker was tuned against; every field
//! can be overridden from the worker config. Durations are in milliseconds.

use crate::driver::Region;
use crate::matcher::TextMatch;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts and scripted delays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Delay after an ordinary menu press.
    #[serde(rename = "press_settle_ms", with = "millis")]
    pub press_settle: Duration,
    /// Delay after each press of a computed input sequence.
    #[serde(rename = "replay_settle_ms", with = "millis")]
    pub replay_settle: Duration,
    /// Delay after each back-out press when a trade is cancelled early.
    #[serde(rename = "cancel_settle_ms", with = "millis")]
    pub cancel_settle: Duration,
    /// Delay after presses that dismiss dialogs.
    #[serde(rename = "dialog_settle_ms", with = "millis")]
    pub dialog_settle: Duration,
    /// Interval between text recognition attempts while waiting for a label.
    #[serde(rename = "text_poll_ms", with = "millis")]
    pub text_poll: Duration,
    #[serde(rename = "navigate_timeout_ms", with = "millis")]
    pub navigate_timeout: Duration,
    #[serde(rename = "room_code_timeout_ms", with = "millis")]
    pub room_code_timeout: Duration,
    /// How long the room stays open for the guest.
    #[serde(rename = "peer_wait_ms", with = "millis")]
    pub peer_wait: Duration,
    #[serde(rename = "peer_poll_ms", with = "millis")]
    pub peer_poll: Duration,
    /// Pause between seeing the guest and the first confirm.
    #[serde(rename = "join_delay_ms", with = "millis")]
    pub join_delay: Duration,
    /// How long to wait for the trade result once both sides confirmed.
    #[serde(rename = "handshake_timeout_ms", with = "millis")]
    pub handshake_timeout: Duration,
    #[serde(rename = "main_menu_timeout_ms", with = "millis")]
    pub main_menu_timeout: Duration,
    /// Pause before dismissing a retryable error dialog.
    #[serde(rename = "retry_delay_ms", with = "millis")]
    pub retry_delay: Duration,
    /// The "guest left" dialog ignores input for a while.
    #[serde(rename = "guest_left_delay_ms", with = "millis")]
    pub guest_left_delay: Duration,
    /// Pause on the main menu after a completed trade.
    #[serde(rename = "success_delay_ms", with = "millis")]
    pub success_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            press_settle: Duration::from_millis(500),
            replay_settle: Duration::ZERO,
            cancel_settle: Duration::from_millis(200),
            dialog_settle: Duration::from_millis(1000),
            text_poll: Duration::from_millis(250),
            navigate_timeout: Duration::from_secs(10),
            room_code_timeout: Duration::from_secs(15),
            peer_wait: Duration::from_secs(180),
            peer_poll: Duration::from_secs(1),
            join_delay: Duration::from_millis(500),
            handshake_timeout: Duration::from_secs(30),
            main_menu_timeout: Duration::from_secs(10),
            retry_delay: Duration::from_millis(1000),
            guest_left_delay: Duration::from_secs(12),
            success_delay: Duration::from_secs(2),
        }
    }
}

/// Where each label appears and what it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenLayout {
    /// Sort label shown when the chip screen opens.
    pub chip_select: TextMatch,
    /// Where the part under the cursor is named when the part screen
    /// opens. The expected text comes from the catalog.
    pub part_select: Region,
    pub part_select_invert: bool,
    pub room_code: TextMatch,
    /// Crop sent to the guest.
    pub room_code_capture: Region,
    pub room_code_capture_invert: bool,
    /// Lobby occupancy once the guest is in.
    pub lobby_full: TextMatch,
    pub guest_left: TextMatch,
    pub trade_failed: TextMatch,
    pub communication_error: TextMatch,
    pub trade_complete: TextMatch,
    pub main_menu: TextMatch,
}

impl Default for ScreenLayout {
    fn default() -> Self {
        let dialog = Region::new(660, 440, 620, 50);
        Self {
            chip_select: TextMatch::exact("Sort : ID", Region::new(1054, 205, 162, 48)),
            part_select: Region::new(1080, 270, 200, 60),
            part_select_invert: false,
            room_code: TextMatch::prefix("Room Code:", Region::new(1242, 89, 365, 54)),
            room_code_capture: Region::new(1242, 89, 400, 80),
            room_code_capture_invert: true,
            lobby_full: TextMatch::exact("1/15", Region::new(785, 123, 160, 60)),
            guest_left: TextMatch::exact("The guest has already left.", dialog),
            trade_failed: TextMatch::exact("The trade failed.", Region::new(800, 400, 335, 65)),
            communication_error: TextMatch::exact("A communication error occurred.", dialog),
            trade_complete: TextMatch::exact("Trade complete!", Region::new(815, 440, 310, 55)),
            main_menu: TextMatch::exact("NETWORK", Region::new(55, 65, 225, 50)),
        }
    }
}

impl ScreenLayout {
    pub fn part_select(&self, starting_part: &str) -> TextMatch {
        TextMatch::exact(starting_part, self.part_select).inverted(self.part_select_invert)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
