//! Suggestion rotation
//!
//! Each rotation takes 3-4 items from the active topic's pool and one item
//! from each related topic, then shuffles and truncates to the configured
//! count. Items shown in the previous rotation are picked last.
//!
//! Quick replies are separate: a fixed list picked by phrases in the text
//! of the assistant's last reply.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

use wofa_config::{QuickRepliesConfig, TopicsConfig};
use wofa_core::Topic;

/// Source of randomness for the rotator and pacing jitter
///
/// Any `Send` RNG qualifies; sessions hold one behind a `Box`.
pub trait RandomSource: RngCore + Send {}

impl<T: RngCore + Send> RandomSource for T {}

/// Thread-local RNG, the production default
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RngCore for ThreadRandom {
    fn next_u32(&mut self) -> u32 {
        rand::thread_rng().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        rand::thread_rng().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand::thread_rng().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        rand::thread_rng().try_fill_bytes(dest)
    }
}

/// Reproducible RNG
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Replays a fixed cycle of raw words
#[derive(Debug, Clone)]
pub struct FixedSequence {
    words: Vec<u64>,
    position: usize,
}

impl FixedSequence {
    pub fn new(words: Vec<u64>) -> Self {
        Self { words, position: 0 }
    }

    /// Always yields zero, so every range sample is its lower bound: the
    /// shortest own-topic sample and a deterministic (not identity) shuffle
    pub fn zeros() -> Self {
        Self::new(vec![0])
    }
}

impl RngCore for FixedSequence {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        if self.words.is_empty() {
            return 0;
        }
        let word = self.words[self.position % self.words.len()];
        self.position = self.position.wrapping_add(1);
        word
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

const OWN_MIN: usize = 3;
const OWN_MAX: usize = 4;

#[derive(Debug, Clone)]
pub struct SuggestionRotator {
    topics: Arc<TopicsConfig>,
    count: usize,
    avoid_repeats: bool,
}

impl SuggestionRotator {
    pub fn new(topics: Arc<TopicsConfig>, count: usize) -> Self {
        Self {
            topics,
            count,
            avoid_repeats: true,
        }
    }

    /// Disable deprioritising the previous rotation's items
    pub fn with_avoid_repeats(mut self, avoid_repeats: bool) -> Self {
        self.avoid_repeats = avoid_repeats;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn topics(&self) -> &TopicsConfig {
        &self.topics
    }

    /// Suggestions for a new session
    pub fn initial(&self, rng: &mut dyn RandomSource) -> Vec<String> {
        self.rotate(Topic::Default, &[], rng)
    }

    /// Next chip list for `topic`
    ///
    /// Short pools degrade to "everything available, no repeats".
    pub fn rotate(
        &self,
        topic: Topic,
        previous: &[String],
        rng: &mut dyn RandomSource,
    ) -> Vec<String> {
        let previous: HashSet<&str> = if self.avoid_repeats {
            previous.iter().map(String::as_str).collect()
        } else {
            HashSet::new()
        };

        let mut own = self.candidates(topic, &previous, rng);
        let own_take = rng.gen_range(OWN_MIN..=OWN_MAX);
        own.truncate(own_take);

        let mut picked: Vec<String> = Vec::with_capacity(own.len() + 3);
        let mut seen: HashSet<String> = HashSet::new();
        for item in own {
            if seen.insert(item.clone()) {
                picked.push(item);
            }
        }

        for &related in self.topics.related(topic) {
            let pool = self.candidates(related, &previous, rng);
            if let Some(item) = pool.into_iter().find(|s| !seen.contains(s)) {
                seen.insert(item.clone());
                picked.push(item);
            }
        }

        picked.shuffle(rng);
        picked.truncate(self.count);

        tracing::debug!(topic = %topic, count = picked.len(), "Rotated suggestions");
        picked
    }

    /// Shuffled pool with previously shown items moved to the back
    fn candidates(
        &self,
        topic: Topic,
        previous: &HashSet<&str>,
        rng: &mut dyn RandomSource,
    ) -> Vec<String> {
        let mut pool: Vec<String> = self
            .topics
            .suggestions(topic)
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();
        pool.shuffle(rng);

        let (fresh, stale): (Vec<String>, Vec<String>) = pool
            .into_iter()
            .partition(|s| !previous.contains(s.as_str()));
        fresh.into_iter().chain(stale).collect()
    }
}

/// Reply buttons keyed on the last reply's text
#[derive(Debug, Clone, Default)]
pub struct QuickReplies {
    table: QuickRepliesConfig,
}

impl QuickReplies {
    pub fn new(table: QuickRepliesConfig) -> Self {
        Self { table }
    }

    /// Replies of the first rule whose trigger occurs in `reply_text`
    /// (case-insensitive), else the default list
    pub fn for_reply(&self, reply_text: &str) -> Vec<String> {
        let lower = reply_text.to_lowercase();
        match self
            .table
            .rules
            .iter()
            .find(|rule| lower.contains(rule.trigger.as_str()))
        {
            Some(rule) => {
                tracing::debug!(trigger = %rule.trigger, "Quick replies matched");
                rule.replies.clone()
            }
            None => self.table.default.clone(),
        }
    }
}
