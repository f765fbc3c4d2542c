//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{confidence, conversation, matcher, pacing, sessions};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Directory holding responses/aliases/topics files
    #[serde(default = "default_domain_config_path")]
    pub domain_config_path: String,

    /// Acceptance thresholds and conversation limits
    #[serde(default)]
    pub engine: EngineConfig,

    /// Fuzzy matcher weights
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Artificial thinking/typing delays
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Session manager limits
    #[serde(default)]
    pub sessions: SessionsConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_domain_config_path() -> String {
    "config/domains/sic_life".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            domain_config_path: default_domain_config_path(),
            engine: EngineConfig::default(),
            matcher: MatcherConfig::default(),
            pacing: PacingConfig::default(),
            sessions: SessionsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Engine thresholds and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// A match is accepted only when confidence is strictly above this
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f32,

    /// Accepted matches below this get the hedge prefix
    #[serde(default = "default_hedge_threshold")]
    pub hedge_threshold: f32,

    /// Replies remembered for fallback escalation
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Suggestion chips per rotation
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,

    /// Append the follow-up block to matched answers
    #[serde(default = "default_true")]
    pub include_follow_up: bool,
}

fn default_accept_threshold() -> f32 {
    confidence::ACCEPT_THRESHOLD
}
fn default_hedge_threshold() -> f32 {
    confidence::HEDGE_THRESHOLD
}
fn default_history_limit() -> usize {
    conversation::HISTORY_LIMIT
}
fn default_suggestion_count() -> usize {
    conversation::SUGGESTION_COUNT
}
fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            accept_threshold: default_accept_threshold(),
            hedge_threshold: default_hedge_threshold(),
            history_limit: default_history_limit(),
            suggestion_count: default_suggestion_count(),
            include_follow_up: true,
        }
    }
}

/// Fuzzy matcher tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default = "default_search_text_weight")]
    pub search_text_weight: f32,

    #[serde(default = "default_aliases_weight")]
    pub aliases_weight: f32,

    #[serde(default = "default_category_weight")]
    pub category_weight: f32,

    /// Query tokens shorter than this are ignored
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,

    /// Answer characters folded into the search text
    #[serde(default = "default_answer_prefix_chars")]
    pub answer_prefix_chars: usize,

    /// Query words ignored by the matcher
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

fn default_search_text_weight() -> f32 {
    matcher::SEARCH_TEXT_WEIGHT
}
fn default_aliases_weight() -> f32 {
    matcher::ALIASES_WEIGHT
}
fn default_category_weight() -> f32 {
    matcher::CATEGORY_WEIGHT
}
fn default_min_token_length() -> usize {
    matcher::MIN_TOKEN_LENGTH
}
fn default_answer_prefix_chars() -> usize {
    matcher::ANSWER_PREFIX_CHARS
}
fn default_stop_words() -> Vec<String> {
    matcher::STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            search_text_weight: default_search_text_weight(),
            aliases_weight: default_aliases_weight(),
            category_weight: default_category_weight(),
            min_token_length: default_min_token_length(),
            answer_prefix_chars: default_answer_prefix_chars(),
            stop_words: default_stop_words(),
        }
    }
}

/// Artificial latency for perceived naturalness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// When false every delay is zero
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_thinking_min_ms")]
    pub thinking_min_ms: u64,

    #[serde(default = "default_thinking_max_ms")]
    pub thinking_max_ms: u64,

    #[serde(default = "default_typing_min_ms")]
    pub typing_min_ms: u64,

    #[serde(default = "default_typing_max_ms")]
    pub typing_max_ms: u64,

    #[serde(default = "default_typing_chars_per_minute")]
    pub typing_chars_per_minute: u64,

    /// Suggestion reveal delay after a typed message
    #[serde(default = "default_reveal_after_reply_ms")]
    pub reveal_after_reply_ms: u64,

    /// Suggestion reveal delay after a chip click
    #[serde(default = "default_reveal_after_chip_ms")]
    pub reveal_after_chip_ms: u64,
}

fn default_thinking_min_ms() -> u64 {
    pacing::THINKING_MIN_MS
}
fn default_thinking_max_ms() -> u64 {
    pacing::THINKING_MAX_MS
}
fn default_typing_min_ms() -> u64 {
    pacing::TYPING_MIN_MS
}
fn default_typing_max_ms() -> u64 {
    pacing::TYPING_MAX_MS
}
fn default_typing_chars_per_minute() -> u64 {
    pacing::TYPING_CHARS_PER_MINUTE
}
fn default_reveal_after_reply_ms() -> u64 {
    pacing::REVEAL_AFTER_REPLY_MS
}
fn default_reveal_after_chip_ms() -> u64 {
    pacing::REVEAL_AFTER_CHIP_MS
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thinking_min_ms: default_thinking_min_ms(),
            thinking_max_ms: default_thinking_max_ms(),
            typing_min_ms: default_typing_min_ms(),
            typing_max_ms: default_typing_max_ms(),
            typing_chars_per_minute: default_typing_chars_per_minute(),
            reveal_after_reply_ms: default_reveal_after_reply_ms(),
            reveal_after_chip_ms: default_reveal_after_chip_ms(),
        }
    }
}

impl PacingConfig {
    /// All delays zero; used by tests and batch tooling
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Session manager limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_max_sessions() -> usize {
    sessions::MAX_SESSIONS
}
fn default_idle_timeout_secs() -> u64 {
    sessions::IDLE_TIMEOUT_SECS
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl SessionsConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_engine()?;
        self.validate_matcher()?;
        self.validate_pacing()?;
        self.validate_sessions()?;
        Ok(())
    }

    fn validate_engine(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;

        if !(0.0..=1.0).contains(&engine.accept_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "engine.accept_threshold".to_string(),
                message: format!(
                    "Must be between 0.0 and 1.0, got {}",
                    engine.accept_threshold
                ),
            });
        }

        if !(0.0..=1.0).contains(&engine.hedge_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "engine.hedge_threshold".to_string(),
                message: format!(
                    "Must be between 0.0 and 1.0, got {}",
                    engine.hedge_threshold
                ),
            });
        }

        if engine.accept_threshold >= engine.hedge_threshold {
            return Err(ConfigError::InvalidValue {
                field: "engine.hedge_threshold".to_string(),
                message: format!(
                    "Must be above accept_threshold ({}), got {}",
                    engine.accept_threshold, engine.hedge_threshold
                ),
            });
        }

        if engine.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.history_limit".to_string(),
                message: "Must keep at least one reply".to_string(),
            });
        }

        if engine.suggestion_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.suggestion_count".to_string(),
                message: "Must show at least one suggestion".to_string(),
            });
        }

        Ok(())
    }

    fn validate_matcher(&self) -> Result<(), ConfigError> {
        let m = &self.matcher;
        let weights = [
            ("matcher.search_text_weight", m.search_text_weight),
            ("matcher.aliases_weight", m.aliases_weight),
            ("matcher.category_weight", m.category_weight),
        ];

        for (field, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("Must be between 0.0 and 1.0, got {}", weight),
                });
            }
        }

        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "matcher".to_string(),
                message: "At least one field weight must be positive".to_string(),
            });
        }

        Ok(())
    }

    fn validate_pacing(&self) -> Result<(), ConfigError> {
        let p = &self.pacing;

        if p.thinking_min_ms > p.thinking_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "pacing.thinking_min_ms".to_string(),
                message: format!(
                    "Must not exceed thinking_max_ms ({}), got {}",
                    p.thinking_max_ms, p.thinking_min_ms
                ),
            });
        }

        if p.typing_min_ms > p.typing_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "pacing.typing_min_ms".to_string(),
                message: format!(
                    "Must not exceed typing_max_ms ({}), got {}",
                    p.typing_max_ms, p.typing_min_ms
                ),
            });
        }

        if p.typing_chars_per_minute == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pacing.typing_chars_per_minute".to_string(),
                message: "Must be positive".to_string(),
            });
        }

        Ok(())
    }

    fn validate_sessions(&self) -> Result<(), ConfigError> {
        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.max_sessions".to_string(),
                message: "Must allow at least one session".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("WOFA")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
