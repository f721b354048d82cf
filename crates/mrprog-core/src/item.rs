//! Tradable items.
//!
//! Item text formats:
//! - chip: `Name Code` (e.g. `Cannon A`, `Recov10 *`)
//! - part: `Name Color` (e.g. `SuprArmr White`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A battle chip: a name plus its single-letter code (or `*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Chip {
    pub name: String,
    pub code: char,
}

impl Chip {
    pub fn new(name: impl Into<String>, code: char) -> Self {
        Self {
            name: name.into(),
            code,
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.code)
    }
}

impl FromStr for Chip {
    type Err = ItemParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, code) = split_item(s)?;

        let mut chars = code.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) if c == '*' || c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return Err(ItemParseError::InvalidCode(code.to_string())),
        };

        Ok(Self::new(name, code))
    }
}

/// A navi customizer part: a name plus its color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub color: String,
}

impl Part {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.color)
    }
}

impl FromStr for Part {
    type Err = ItemParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, color) = split_item(s)?;
        Ok(Self::new(name, normalize_color(color)))
    }
}

/// Colors are matched as `White`, `Pink`, ... regardless of input casing.
pub fn normalize_color(color: &str) -> String {
    let mut chars = color.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn split_item(s: &str) -> Result<(&str, &str), ItemParseError> {
    let (name, suffix) = s
        .trim()
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| ItemParseError::MissingSuffix(s.to_string()))?;

    let name = name.trim_end();
    if name.is_empty() {
        return Err(ItemParseError::EmptyName);
    }

    Ok((name, suffix))
}

/// Anything a trade request can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeItem {
    Chip(Chip),
    Part(Part),
}

impl fmt::Display for TradeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeItem::Chip(chip) => fmt::Display::fmt(chip, f),
            TradeItem::Part(part) => fmt::Display::fmt(part, f),
        }
    }
}

impl From<Chip> for TradeItem {
    fn from(chip: Chip) -> Self {
        TradeItem::Chip(chip)
    }
}

impl From<Part> for TradeItem {
    fn from(part: Part) -> Self {
        TradeItem::Part(part)
    }
}

/// Error parsing an item string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemParseError {
    #[error("item must be `<name> <code|color>`, got: {0}")]
    MissingSuffix(String),
    #[error("item name cannot be empty")]
    EmptyName,
    #[error("chip code must be a single letter or '*', got: {0}")]
    InvalidCode(String),
}
