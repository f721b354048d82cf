//! Controller inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete controller command. Doubles as the edge label of an
/// [`InputGraph`](crate::InputGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    /// Jump one page back (L).
    PageBack,
    /// Jump one page forward (R).
    PageForward,
    /// A.
    Confirm,
    /// B.
    Cancel,
    /// Cycle the sort category (+).
    NextCategory,
}

impl Input {
    pub fn is_directional(self) -> bool {
        matches!(self, Input::Up | Input::Down | Input::Left | Input::Right)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Input::Up => "up",
            Input::Down => "down",
            Input::Left => "left",
            Input::Right => "right",
            Input::PageBack => "L",
            Input::PageForward => "R",
            Input::Confirm => "A",
            Input::Cancel => "B",
            Input::NextCategory => "+",
        };
        f.write_str(name)
    }
}
