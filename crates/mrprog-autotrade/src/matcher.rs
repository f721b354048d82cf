//! Waiting for text to appear on screen.

use crate::driver::{DriverError, Region, Screen};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// What the recognized text must look like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Exact(String),
    Prefix(String),
}

impl Pattern {
    /// Surrounding whitespace from recognition is ignored.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        match self {
            Pattern::Exact(expected) => text == expected,
            Pattern::Prefix(prefix) => text.starts_with(prefix.as_str()),
        }
    }
}

/// A label expected at a known place on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMatch {
    pub pattern: Pattern,
    pub region: Region,
    #[serde(default = "default_invert")]
    pub invert: bool,
}

fn default_invert() -> bool {
    true
}

impl TextMatch {
    pub fn exact(text: impl Into<String>, region: Region) -> Self {
        Self {
            pattern: Pattern::Exact(text.into()),
            region,
            invert: default_invert(),
        }
    }

    pub fn prefix(text: impl Into<String>, region: Region) -> Self {
        Self {
            pattern: Pattern::Prefix(text.into()),
            region,
            invert: default_invert(),
        }
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Read the region once.
    pub async fn is_visible<S: Screen + ?Sized>(&self, screen: &S) -> Result<bool, DriverError> {
        let text = screen.read_text(self.region, self.invert).await?;
        Ok(self.pattern.matches(&text))
    }
}

/// Read each candidate once, in order; the first visible one wins.
pub async fn first_visible<S, K>(
    screen: &S,
    candidates: &[(K, &TextMatch)],
) -> Result<Option<K>, DriverError>
where
    S: Screen + ?Sized,
    K: Copy,
{
    for &(key, matcher) in candidates {
        if matcher.is_visible(screen).await? {
            return Ok(Some(key));
        }
    }
    Ok(None)
}

/// Poll until one candidate is visible or `timeout` passes. Candidates are
/// always read at least once.
pub async fn wait_for_any<S, K>(
    screen: &S,
    candidates: &[(K, &TextMatch)],
    timeout: Duration,
    poll: Duration,
) -> Result<Option<K>, DriverError>
where
    S: Screen + ?Sized,
    K: Copy,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(key) = first_visible(screen, candidates).await? {
            return Ok(Some(key));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        sleep(poll).await;
    }
}

pub async fn wait_for_text<S: Screen + ?Sized>(
    screen: &S,
    matcher: &TextMatch,
    timeout: Duration,
    poll: Duration,
) -> Result<bool, DriverError> {
    Ok(wait_for_any(screen, &[((), matcher)], timeout, poll)
        .await?
        .is_some())
}
