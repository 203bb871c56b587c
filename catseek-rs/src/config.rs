use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatSeekError, Result};
use crate::responder::{Category, Classifier, ResponseBank, Responder, DEFAULT_GREETINGS};

/// How the artificial "thinking" delay before a reply is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DelayPolicy {
    /// Sleep the thread; nothing else runs meanwhile
    Blocking,
    /// Await a timer while the typing indicator animates
    #[default]
    Scheduled,
}

/// Built-in reply sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePreset {
    #[default]
    Classic,
    Terse,
}

/// Reply lists, starting from a preset with optional per-category overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsesConfig {
    #[serde(default)]
    pub preset: ResponsePreset,
    #[serde(default)]
    pub hello: Option<Vec<String>>,
    #[serde(default)]
    pub question: Option<Vec<String>>,
    #[serde(default)]
    pub default: Option<Vec<String>>,
}

impl ResponsesConfig {
    /// Build the response bank, failing if any category ends up empty
    pub fn build_bank(&self) -> Result<ResponseBank> {
        let base = match self.preset {
            ResponsePreset::Classic => ResponseBank::classic(),
            ResponsePreset::Terse => ResponseBank::terse(),
        };

        let overrides = [
            (Category::Hello, &self.hello),
            (Category::Question, &self.question),
            (Category::Default, &self.default),
        ];

        let entries: HashMap<Category, Vec<String>> = overrides
            .into_iter()
            .map(|(category, list)| {
                let list = list
                    .clone()
                    .unwrap_or_else(|| base.get(category).to_vec());
                (category, list)
            })
            .collect();

        ResponseBank::from_map(entries)
    }
}

/// Keyword classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Case-insensitive substrings that mark a greeting
    #[serde(default = "default_greetings")]
    pub greetings: Vec<String>,
    /// Character that marks a question
    #[serde(default = "default_question_marker")]
    pub question_marker: char,
}

fn default_greetings() -> Vec<String> {
    DEFAULT_GREETINGS.iter().map(|g| g.to_string()).collect()
}

fn default_question_marker() -> char {
    '?'
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            greetings: default_greetings(),
            question_marker: default_question_marker(),
        }
    }
}

/// Reply delay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    #[serde(default)]
    pub policy: DelayPolicy,
    /// Delay before a reply is shown, in milliseconds
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u64,
}

fn default_response_delay_ms() -> u64 {
    800
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            policy: DelayPolicy::default(),
            response_delay_ms: default_response_delay_ms(),
        }
    }
}

impl DelayConfig {
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }
}

/// Typing indicator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_typing_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_typing_label")]
    pub label: String,
}

fn default_true() -> bool {
    true
}

fn default_typing_interval_ms() -> u64 {
    300
}

fn default_typing_label() -> String {
    "Cat is thinking".to_string()
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_typing_interval_ms(),
            label: default_typing_label(),
        }
    }
}

impl TypingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Imagination animation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_vision_interval_ms")]
    pub interval_ms: u64,
    /// Frames per bounce cycle
    #[serde(default = "default_vision_period")]
    pub period: u64,
    /// How far the art drifts per cycle (0 disables the bounce)
    #[serde(default = "default_bounce_rows")]
    pub bounce_rows: usize,
    /// Frames to play (0 = until cancelled)
    #[serde(default = "default_vision_frames")]
    pub frames: u64,
}

fn default_vision_interval_ms() -> u64 {
    16
}

fn default_vision_period() -> u64 {
    60
}

fn default_bounce_rows() -> usize {
    4
}

fn default_vision_frames() -> u64 {
    60
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_vision_interval_ms(),
            period: default_vision_period(),
            bounce_rows: default_bounce_rows(),
            frames: default_vision_frames(),
        }
    }
}

impl VisionConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Main configuration for catseek
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub responses: ResponsesConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub delay: DelayConfig,
    #[serde(default)]
    pub typing: TypingConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    /// Banner shown when a chat starts (empty = none)
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Prefix chat lines with the time of day
    #[serde(default)]
    pub timestamps: bool,
    /// Fixed RNG seed for reproducible replies
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_greeting() -> String {
    "Hi I'm Catseek. How can I help you today?".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            responses: ResponsesConfig::default(),
            classifier: ClassifierConfig::default(),
            delay: DelayConfig::default(),
            typing: TypingConfig::default(),
            vision: VisionConfig::default(),
            greeting: default_greeting(),
            timestamps: false,
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatSeekError::ConfigError(e.to_string()))?;
        toml::from_str(&content).map_err(|e| CatSeekError::ConfigError(e.to_string()))
    }

    /// Load from an explicit path, else the per-user config file if it
    /// exists, else the built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Merge CLI arguments into this configuration
    /// CLI arguments take precedence over config file values
    pub fn merge_cli_args(
        &mut self,
        delay_policy: Option<DelayPolicy>,
        response_delay_ms: Option<u64>,
        seed: Option<u64>,
    ) {
        if let Some(p) = delay_policy {
            self.delay.policy = p;
        }
        if let Some(ms) = response_delay_ms {
            self.delay.response_delay_ms = ms;
        }
        if seed.is_some() {
            self.seed = seed;
        }
    }

    /// Check every value that could break a running session
    pub fn validate(&self) -> Result<()> {
        if self.typing.interval_ms == 0 {
            return Err(CatSeekError::ConfigError(
                "typing.interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.vision.interval_ms == 0 {
            return Err(CatSeekError::ConfigError(
                "vision.interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.vision.period == 0 {
            return Err(CatSeekError::ConfigError(
                "vision.period must be greater than zero".to_string(),
            ));
        }
        self.responses.build_bank()?;
        self.classifier()?;
        Ok(())
    }

    /// Build the keyword classifier
    pub fn classifier(&self) -> Result<Classifier> {
        Classifier::new(self.classifier.question_marker, &self.classifier.greetings)
    }

    /// Build a responder from the configured bank, classifier and seed
    pub fn responder(&self) -> Result<Responder> {
        let bank = self.responses.build_bank()?;
        let classifier = self.classifier()?;
        Ok(match self.seed {
            Some(seed) => Responder::with_seed(bank, classifier, seed),
            None => Responder::new(bank, classifier),
        })
    }
}

/// Per-user config location, e.g. `~/.config/catseek/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("catseek").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.delay.policy, DelayPolicy::Scheduled);
        assert_eq!(config.delay.response_delay(), Duration::from_millis(800));
        assert_eq!(config.typing.interval(), Duration::from_millis(300));
        assert_eq!(config.vision.interval(), Duration::from_millis(16));
        assert_eq!(config.vision.period, 60);
        assert_eq!(config.classifier.greetings, vec!["hi", "hello", "hey"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = write_config("");
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.delay.response_delay_ms, 800);
        assert_eq!(config.responses.preset, ResponsePreset::Classic);
        assert_eq!(config.greeting, default_greeting());
    }

    #[test]
    fn test_partial_file_overrides() {
        let file = write_config(
            r#"
seed = 7
timestamps = true

[delay]
policy = "blocking"
response_delay_ms = 16

[responses]
preset = "terse"
question = ["Purr?"]

[classifier]
greetings = ["meow"]
"#,
        );
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.delay.policy, DelayPolicy::Blocking);
        assert_eq!(config.delay.response_delay_ms, 16);
        assert_eq!(config.seed, Some(7));
        assert!(config.timestamps);

        let bank = config.responses.build_bank().unwrap();
        assert_eq!(bank.get(Category::Question), ["Purr?".to_string()]);
        assert_eq!(bank.get(Category::Default), ResponseBank::terse().get(Category::Default));

        let responder = config.responder().unwrap();
        assert_eq!(responder.classify("MEOW"), Category::Hello);
        assert_eq!(responder.classify("hello"), Category::Default);
    }

    #[test]
    fn test_empty_category_fails_validation() {
        let file = write_config("[responses]\nhello = []\n");
        let config = Config::from_file(file.path()).unwrap();
        assert!(matches!(
            config.validate(),
            Err(CatSeekError::EmptyCategory(Category::Hello))
        ));
        assert!(config.responder().is_err());
    }

    #[test]
    fn test_zero_interval_fails_validation() {
        let mut config = Config::default();
        config.vision.interval_ms = 0;
        assert!(matches!(config.validate(), Err(CatSeekError::ConfigError(_))));

        let mut config = Config::default();
        config.vision.period = 0;
        assert!(matches!(config.validate(), Err(CatSeekError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let file = write_config("[delay\npolicy = ");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(CatSeekError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Config::load(Some(Path::new("/nonexistent/catseek.toml")));
        assert!(matches!(result, Err(CatSeekError::ConfigError(_))));
    }

    #[test]
    fn test_cli_args_take_precedence() {
        let mut config = Config::default();
        config.merge_cli_args(Some(DelayPolicy::Blocking), Some(16), Some(3));
        assert_eq!(config.delay.policy, DelayPolicy::Blocking);
        assert_eq!(config.delay.response_delay_ms, 16);
        assert_eq!(config.seed, Some(3));

        config.merge_cli_args(None, None, None);
        assert_eq!(config.delay.policy, DelayPolicy::Blocking);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_seeded_config_is_reproducible() {
        let mut config = Config::default();
        config.seed = Some(11);
        let mut a = config.responder().unwrap();
        let mut b = config.responder().unwrap();
        assert_eq!(a.respond("hey"), b.respond("hey"));
    }
}
