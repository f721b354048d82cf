//! A scripted console for session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mrprog_autotrade::{
    Catalog, Controller, DriverError, Input, Region, SaveState, Screen, ScreenLayout, Sort,
};
use mrprog_core::{Chip, Part, TradeItem, TradeRequest};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub const USER: u64 = 4242;
pub const ROOM_CODE_PNG: &[u8] = b"\x89PNG room code";

/// When a scripted label shows up.
#[derive(Debug, Clone, Copy)]
pub enum When {
    /// Once this many inputs have been pressed.
    Presses(usize),
    /// Once this much time has passed since the console was created.
    Elapsed(Duration),
}

struct Rule {
    when: When,
    region: Region,
    text: String,
}

#[derive(Default)]
struct State {
    presses: Vec<Input>,
    texts: HashMap<Region, String>,
    rules: Vec<Rule>,
    fail_press: Option<usize>,
    reloads: usize,
}

pub struct FakeConsole {
    start: Instant,
    state: Mutex<State>,
}

impl FakeConsole {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            state: Mutex::new(State::default()),
        }
    }

    /// Show `text` at `region` from the start.
    pub fn show(self, region: Region, text: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .texts
            .insert(region, text.to_string());
        self
    }

    pub fn show_when(self, when: When, region: Region, text: &str) -> Self {
        self.state.lock().unwrap().rules.push(Rule {
            when,
            region,
            text: text.to_string(),
        });
        self
    }

    /// Fail the `n`th press (zero-based).
    pub fn fail_press(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_press = Some(n);
        self
    }

    pub fn presses(&self) -> Vec<Input> {
        self.state.lock().unwrap().presses.clone()
    }

    pub fn reloads(&self) -> usize {
        self.state.lock().unwrap().reloads
    }
}

#[async_trait]
impl Controller for FakeConsole {
    async fn press(&self, input: Input, settle: Duration) -> Result<(), DriverError> {
        {
            let mut state = self.state.lock().unwrap();
            if state.fail_press == Some(state.presses.len()) {
                return Err(DriverError::Controller("stick drift".into()));
            }
            state.presses.push(input);
        }
        tokio::time::sleep(settle).await;
        Ok(())
    }
}

#[async_trait]
impl Screen for FakeConsole {
    async fn read_text(&self, region: Region, _invert: bool) -> Result<String, DriverError> {
        let elapsed = self.start.elapsed();
        let mut state = self.state.lock().unwrap();
        let pressed = state.presses.len();

        let mut fired = Vec::new();
        state.rules.retain(|rule| {
            let due = match rule.when {
                When::Presses(n) => pressed >= n,
                When::Elapsed(after) => elapsed >= after,
            };
            if due {
                fired.push((rule.region, rule.text.clone()));
            }
            !due
        });
        state.texts.extend(fired);

        Ok(state.texts.get(&region).cloned().unwrap_or_default())
    }

    async fn capture_png(&self, _region: Region, _invert: bool) -> Result<Vec<u8>, DriverError> {
        Ok(ROOM_CODE_PNG.to_vec())
    }
}

#[async_trait]
impl SaveState for FakeConsole {
    async fn reload_save(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().reloads += 1;
        Ok(())
    }
}

/// Game 6 with twelve chips (same order under every sort) and five parts.
pub fn catalog() -> Catalog {
    let chips: Vec<Chip> = (0..12).map(|i| Chip::new(format!("Chip{i:02}"), 'A')).collect();
    let chip_orders: BTreeMap<Sort, Vec<Chip>> =
        Sort::ALL.into_iter().map(|sort| (sort, chips.clone())).collect();

    Catalog {
        game: 6,
        chip_orders,
        parts: (0..5).map(|i| Part::new(format!("Part{i}"), "White")).collect(),
        nothing: Part::new("Nothing", "None"),
        starting_part: "Part0".into(),
        illegal_chips: Vec::new(),
        illegal_parts: Vec::new(),
    }
}

pub fn request(item: impl Into<TradeItem>) -> TradeRequest {
    TradeRequest {
        user_name: "lan".into(),
        user_id: USER,
        channel_id: 1,
        system: "switch".into(),
        game: 6,
        trade_id: 77,
        trade_item: item.into(),
        priority: 0,
    }
}

pub fn chip(name: &str) -> Chip {
    Chip::new(name, 'A')
}

/// A console already showing the chip screen and the room code.
pub fn room_open(layout: &ScreenLayout) -> FakeConsole {
    FakeConsole::new()
        .show(layout.chip_select.region, "Sort : ID")
        .show(layout.room_code.region, "Room Code: 0123-4567-8901")
}

/// Room open and the guest already in the lobby.
pub fn guest_joined(layout: &ScreenLayout) -> FakeConsole {
    room_open(layout).show(layout.lobby_full.region, "1/15")
}
