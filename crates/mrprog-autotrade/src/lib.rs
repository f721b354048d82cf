//! Trade automation for the MrProg trade worker.
//!
//! The trader turns a requested chip or part into the controller inputs that
//! move the trade screen cursor onto it, then runs a scripted session against
//! a console: open a private room, hand the room code to the requester, wait
//! for them to join and complete the trade.
//!
//! The console itself (controller, frame capture, text recognition, save
//! states) is supplied by the host through the [`Console`] traits.

mod builder;
mod cancel;
mod catalog;
mod config;
mod driver;
mod graph;
mod handoff;
mod input;
mod matcher;
mod planner;
mod session;

pub use builder::{PAGE_SIZE, build_category_graph, build_list, build_single_graph, link_categories};
pub use cancel::CancelSlot;
pub use catalog::{Catalog, CatalogError, Catalogs, Sort};
pub use config::{ScreenLayout, Timings};
pub use driver::{Console, Controller, DriverError, Region, SaveState, Screen};
pub use graph::{GraphError, InputGraph, NodeId, Step};
pub use handoff::{
    HandoffCancelled, HandoffError, HandoffState, RoomCodeHandoff, RoomCodeReceiver,
    room_code_channel,
};
pub use input::Input;
pub use matcher::{Pattern, TextMatch, first_visible, wait_for_any, wait_for_text};
pub use planner::InputPlanner;
pub use session::{AutoTrader, PathError};
