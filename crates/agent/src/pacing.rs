//! Artificial latency and turn cancellation
//!
//! Each session keeps a generation counter in a `watch` channel. Starting a
//! turn bumps the counter; a [`TurnTicket`] taken for an older generation is
//! stale and its pending pauses return early.

use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;

use wofa_config::PacingConfig;

use crate::suggestions::RandomSource;

/// What the next suggestion list is derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionBasis {
    /// The agent's reply to a typed message
    Reply(String),
    /// A suggestion chip the user clicked
    Chip(String),
}

impl SuggestionBasis {
    pub fn text(&self) -> &str {
        match self {
            Self::Reply(text) | Self::Chip(text) => text,
        }
    }
}

/// Delay calculator
#[derive(Debug, Clone)]
pub struct Pacer {
    config: PacingConfig,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }

    pub fn disabled() -> Self {
        Self::new(PacingConfig::disabled())
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Uniform jitter between the thinking bounds
    pub fn thinking_delay(&self, rng: &mut dyn RandomSource) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }
        let min = self.config.thinking_min_ms;
        let max = self.config.thinking_max_ms.max(min);
        Duration::from_millis(rng.gen_range(min..=max))
    }

    /// Proportional to reply length, clamped to the typing bounds
    pub fn typing_delay(&self, text: &str) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }
        let per_char_ms = 60_000 / self.config.typing_chars_per_minute.max(1);
        let chars = text.chars().count() as u64;
        let raw = chars.saturating_mul(per_char_ms);
        let max = self.config.typing_max_ms.max(self.config.typing_min_ms);
        Duration::from_millis(raw.clamp(self.config.typing_min_ms, max))
    }

    pub fn reveal_delay(&self, basis: &SuggestionBasis) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }
        let ms = match basis {
            SuggestionBasis::Reply(_) => self.config.reveal_after_reply_ms,
            SuggestionBasis::Chip(_) => self.config.reveal_after_chip_ms,
        };
        Duration::from_millis(ms)
    }
}

/// Handle on one turn's generation
#[derive(Debug)]
pub struct TurnTicket {
    generation: u64,
    rx: watch::Receiver<u64>,
}

impl TurnTicket {
    pub fn new(generation: u64, rx: watch::Receiver<u64>) -> Self {
        Self { generation, rx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A newer turn (or a reset) has started since this ticket was taken
    pub fn is_stale(&self) -> bool {
        *self.rx.borrow() != self.generation
    }

    /// Sleep for `delay` unless superseded first; true when still current
    pub async fn pause(&mut self, delay: Duration) -> bool {
        if self.is_stale() {
            return false;
        }
        if delay.is_zero() {
            return true;
        }

        let generation = self.generation;
        let rx = &mut self.rx;
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = superseded(rx, generation) => {}
        }
        !self.is_stale()
    }
}

async fn superseded(rx: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if *rx.borrow_and_update() != generation {
            return;
        }
        if rx.changed().await.is_err() {
            // sender gone: nothing can supersede us any more
            std::future::pending::<()>().await;
        }
    }
}
