//! The scripted trade session.
//!
//! One session drives the console from the main menu through a private trade
//! room and back:
//!
//! 1. navigate to the chip or part selection screen
//! 2. replay the computed cursor inputs and open the room
//! 3. capture the room code and hand it to the caller
//! 4. wait for the guest to join (or leave, or the trade or link to fail)
//! 5. confirm the trade and wait for its result
//!
//! Every exit settles the room code handoff and yields a [`TradeOutcome`].

use crate::cancel::CancelSlot;
use crate::catalog::{Catalog, CatalogError};
use crate::config::{ScreenLayout, Timings};
use crate::driver::{Console, DriverError};
use crate::graph::GraphError;
use crate::handoff::RoomCodeHandoff;
use crate::input::Input;
use crate::matcher::{TextMatch, first_visible, wait_for_any, wait_for_text};
use crate::planner::InputPlanner;
use mrprog_core::{TradeItem, TradeOutcome, TradeRequest, TradeStatus};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::Instrument;

/// Which trade screen a session opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TradeScreen {
    Chip,
    Part,
}

/// Dialogs that end a session once they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    GuestLeft,
    TradeFailed,
    CommunicationError,
    TradeComplete,
}

/// Drives trades on one console.
pub struct AutoTrader<C> {
    console: C,
    planner: InputPlanner,
    part_select: TextMatch,
    layout: ScreenLayout,
    timings: Timings,
    cancel: CancelSlot,
}

impl<C: Console> AutoTrader<C> {
    pub fn new(console: C, catalog: &Catalog) -> Result<Self, CatalogError> {
        Ok(Self::with_planner(console, InputPlanner::new(catalog)?))
    }

    pub fn with_planner(console: C, planner: InputPlanner) -> Self {
        let layout = ScreenLayout::default();
        Self {
            console,
            part_select: layout.part_select(planner.starting_part()),
            planner,
            layout,
            timings: Timings::default(),
            cancel: CancelSlot::new(),
        }
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_layout(mut self, layout: ScreenLayout) -> Self {
        self.part_select = layout.part_select(self.planner.starting_part());
        self.layout = layout;
        self
    }

    /// Share a cancel slot with whoever accepts cancel commands.
    pub fn with_cancel_slot(mut self, cancel: CancelSlot) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn planner(&self) -> &InputPlanner {
        &self.planner
    }

    pub fn game(&self) -> u8 {
        self.planner.game()
    }

    pub fn cancel_slot(&self) -> &CancelSlot {
        &self.cancel
    }

    /// Put the game back into a known state through the host's save reload.
    pub async fn recover(&self) -> Result<(), DriverError> {
        tracing::warn!(game = self.game(), "Reloading save");
        self.console.reload_save().await
    }

    /// Run one trade of whatever kind `request` asks for.
    pub async fn trade(
        &self,
        request: &TradeRequest,
        handoff: RoomCodeHandoff,
    ) -> Result<TradeOutcome, PathError> {
        match &request.trade_item {
            TradeItem::Chip(_) => self.trade_chip(request, handoff).await,
            TradeItem::Part(_) => self.trade_part(request, handoff).await,
        }
    }

    pub async fn trade_chip(
        &self,
        request: &TradeRequest,
        handoff: RoomCodeHandoff,
    ) -> Result<TradeOutcome, PathError> {
        self.check_game(request)?;
        let TradeItem::Chip(chip) = &request.trade_item else {
            return Err(PathError::WrongKind {
                item: request.trade_item.to_string(),
                expected: "chip",
            });
        };
        let inputs = self.planner.chip_inputs(chip)?;
        Ok(self.run(request, TradeScreen::Chip, &inputs, handoff).await)
    }

    pub async fn trade_part(
        &self,
        request: &TradeRequest,
        handoff: RoomCodeHandoff,
    ) -> Result<TradeOutcome, PathError> {
        self.check_game(request)?;
        let TradeItem::Part(part) = &request.trade_item else {
            return Err(PathError::WrongKind {
                item: request.trade_item.to_string(),
                expected: "part",
            });
        };
        let inputs = self.planner.part_inputs(part)?;
        Ok(self.run(request, TradeScreen::Part, &inputs, handoff).await)
    }

    fn check_game(&self, request: &TradeRequest) -> Result<(), PathError> {
        if request.game == self.game() {
            Ok(())
        } else {
            Err(PathError::WrongGame {
                requested: request.game,
                loaded: self.game(),
            })
        }
    }

    async fn run(
        &self,
        request: &TradeRequest,
        screen: TradeScreen,
        inputs: &[Input],
        mut handoff: RoomCodeHandoff,
    ) -> TradeOutcome {
        let span = tracing::info_span!(
            "trade",
            trade_id = request.trade_id,
            user = %request.user_name,
        );

        async move {
            tracing::info!(item = %request.trade_item, inputs = inputs.len(), "Trading");

            let outcome = match self.session(request, screen, inputs, &mut handoff).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(error = %e, "Trade aborted");
                    TradeOutcome::critical(format!("Trade failed due to an error: {e}"))
                }
            };

            if handoff.cancel() {
                tracing::debug!("Room code handoff cancelled");
            }
            tracing::info!(status = %outcome.status, message = ?outcome.message, "Trade finished");
            outcome
        }
        .instrument(span)
        .await
    }

    async fn session(
        &self,
        request: &TradeRequest,
        screen: TradeScreen,
        inputs: &[Input],
        handoff: &mut RoomCodeHandoff,
    ) -> Result<TradeOutcome, DriverError> {
        if !self.navigate(screen).await? {
            handoff.cancel();
            return Ok(TradeOutcome::critical("Unable to open trade screen."));
        }

        for &input in inputs {
            self.console.press(input, self.timings.replay_settle).await?;
        }

        if self.cancel.take_for(request.user_id) {
            tracing::info!("Cancelled by user before opening the room");
            for _ in 0..5 {
                self.console.press(Input::Cancel, self.timings.cancel_settle).await?;
            }
            self.press(Input::Up).await?;
            handoff.cancel();
            return Ok(TradeOutcome::new(TradeStatus::Cancelled, "Trade cancelled by user."));
        }

        self.press(Input::Confirm).await?;
        self.press(Input::Confirm).await?;

        tracing::debug!("Searching for room code");
        if !self.wait_for(&self.layout.room_code, self.timings.room_code_timeout).await? {
            handoff.cancel();
            return Ok(TradeOutcome::critical("Unable to retrieve room code."));
        }

        let image = self
            .console
            .capture_png(self.layout.room_code_capture, self.layout.room_code_capture_invert)
            .await?;
        if let Err(e) = handoff.resolve(image) {
            tracing::warn!(error = %e, "Room code was not delivered");
        }
        tokio::task::yield_now().await;

        self.await_guest(request).await
    }

    async fn navigate(&self, screen: TradeScreen) -> Result<bool, DriverError> {
        // Trade
        self.press(Input::Down).await?;
        self.press(Input::Confirm).await?;

        // Private Trade
        self.press(Input::Down).await?;
        self.press(Input::Confirm).await?;

        // Create Room
        self.press(Input::Confirm).await?;

        let label = match screen {
            TradeScreen::Chip => {
                self.press(Input::Confirm).await?;
                &self.layout.chip_select
            }
            TradeScreen::Part => {
                self.press(Input::Down).await?;
                self.press(Input::Confirm).await?;
                &self.part_select
            }
        };

        // Next
        self.press(Input::Confirm).await?;

        tracing::debug!(?screen, "Waiting for selection screen");
        self.wait_for(label, self.timings.navigate_timeout).await
    }

    async fn await_guest(&self, request: &TradeRequest) -> Result<TradeOutcome, DriverError> {
        let deadline = Instant::now() + self.timings.peer_wait;
        tracing::debug!(wait = ?self.timings.peer_wait, "Waiting for user");

        while Instant::now() < deadline {
            sleep(self.timings.peer_poll).await;

            if self.cancel.take_for(request.user_id) {
                tracing::info!("Cancelled by user while waiting");
                self.dismiss(Input::Cancel).await?;
                self.dismiss(Input::Confirm).await?;
                return Ok(TradeOutcome::new(TradeStatus::Cancelled, "Trade cancelled by user."));
            }

            let interrupts = [
                Interrupt::GuestLeft,
                Interrupt::TradeFailed,
                Interrupt::CommunicationError,
            ];
            if let Some(interrupt) = self.check(&interrupts).await? {
                return self.handle(interrupt).await;
            }

            if self.layout.lobby_full.is_visible(&self.console).await? {
                tracing::debug!("User joined lobby");
                return self.confirm_trade().await;
            }
        }

        tracing::info!("User did not join in time");
        self.dismiss(Input::Cancel).await?;
        self.dismiss(Input::Confirm).await?;
        Ok(TradeOutcome::new(TradeStatus::UserTimeout, "Trade cancelled due to timeout."))
    }

    async fn confirm_trade(&self) -> Result<TradeOutcome, DriverError> {
        sleep(self.timings.join_delay).await;
        self.dismiss(Input::Confirm).await?;
        if let Some(interrupt) = self.check(&[Interrupt::GuestLeft]).await? {
            return self.handle(interrupt).await;
        }

        self.press(Input::Confirm).await?;
        if let Some(interrupt) = self.check(&[Interrupt::GuestLeft]).await? {
            return self.handle(interrupt).await;
        }

        tracing::debug!("Waiting for trade result");
        let candidates = self.candidates(&[
            Interrupt::GuestLeft,
            Interrupt::TradeFailed,
            Interrupt::TradeComplete,
        ]);
        let result = wait_for_any(
            &self.console,
            &candidates,
            self.timings.handshake_timeout,
            self.timings.text_poll,
        )
        .await?;

        match result {
            Some(interrupt) => self.handle(interrupt).await,
            None => Ok(TradeOutcome::critical("Trade failed due to an unexpected state.")),
        }
    }

    async fn handle(&self, interrupt: Interrupt) -> Result<TradeOutcome, DriverError> {
        match interrupt {
            Interrupt::GuestLeft => {
                tracing::info!("User left the room");
                sleep(self.timings.guest_left_delay).await;
                self.dismiss(Input::Cancel).await?;
                self.dismiss(Input::Confirm).await?;
                Ok(TradeOutcome::new(
                    TradeStatus::Cancelled,
                    "User left the room, trade cancelled.",
                ))
            }
            Interrupt::TradeFailed => {
                tracing::warn!("Trade failed, retrying");
                sleep(self.timings.retry_delay).await;
                self.dismiss(Input::Confirm).await?;
                Ok(TradeOutcome::new(TradeStatus::Retrying, "The trade failed. Retrying."))
            }
            Interrupt::CommunicationError => {
                tracing::warn!("Communication error, restarting trade");
                sleep(self.timings.retry_delay).await;
                self.dismiss(Input::Confirm).await?;
                Ok(TradeOutcome::new(
                    TradeStatus::Retrying,
                    "There was a communication error. Retrying.",
                ))
            }
            Interrupt::TradeComplete => {
                self.dismiss(Input::Confirm).await?;
                if self.wait_for(&self.layout.main_menu, self.timings.main_menu_timeout).await? {
                    tracing::debug!("Back at main menu");
                    sleep(self.timings.success_delay).await;
                    Ok(TradeOutcome::success())
                } else {
                    Ok(TradeOutcome::critical(
                        "I think the trade was successful, but something broke.",
                    ))
                }
            }
        }
    }

    fn text_match(&self, interrupt: Interrupt) -> &TextMatch {
        match interrupt {
            Interrupt::GuestLeft => &self.layout.guest_left,
            Interrupt::TradeFailed => &self.layout.trade_failed,
            Interrupt::CommunicationError => &self.layout.communication_error,
            Interrupt::TradeComplete => &self.layout.trade_complete,
        }
    }

    fn candidates(&self, interrupts: &[Interrupt]) -> Vec<(Interrupt, &TextMatch)> {
        interrupts
            .iter()
            .map(|&interrupt| (interrupt, self.text_match(interrupt)))
            .collect()
    }

    async fn check(&self, interrupts: &[Interrupt]) -> Result<Option<Interrupt>, DriverError> {
        first_visible(&self.console, &self.candidates(interrupts)).await
    }

    async fn wait_for(&self, label: &TextMatch, timeout: Duration) -> Result<bool, DriverError> {
        wait_for_text(&self.console, label, timeout, self.timings.text_poll).await
    }

    async fn press(&self, input: Input) -> Result<(), DriverError> {
        self.console.press(input, self.timings.press_settle).await
    }

    async fn dismiss(&self, input: Input) -> Result<(), DriverError> {
        self.console.press(input, self.timings.dialog_settle).await
    }
}

/// The request cannot be turned into inputs; nothing was pressed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("{item} is not a {expected}")]
    WrongKind { item: String, expected: &'static str },
    #[error("request is for game {requested} but this trader runs game {loaded}")]
    WrongGame { requested: u8, loaded: u8 },
}
