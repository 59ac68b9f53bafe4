//! Runtime configuration read from the environment (and an optional `.env`).

use crate::ai::client::{ModelConfig, DEFAULT_MODEL};
use crate::error::ConfigError;
use crate::models::{Difficulty, Language};
use crate::quiz::DEFAULT_MAX_OPTIONS;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_AUDIO_PLAYER: &str = "mpg123 -q";
pub const DEFAULT_LOG_FILE: &str = "language_tutor.log";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub file: PathBuf,
    /// Used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    api_key: Option<String>,
    pub model: String,
    pub max_options: usize,
    /// Program and leading arguments; the audio file path is appended
    pub audio_player: Vec<String>,
    /// Initial selections on the setup form
    pub language: Language,
    pub difficulty: Difficulty,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_options: DEFAULT_MAX_OPTIONS,
            audio_player: split_command(DEFAULT_AUDIO_PLAYER),
            language: Language::default(),
            difficulty: Difficulty::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // a missing .env file is fine
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_options = value("TUTOR_MAX_OPTIONS")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n >= 2)
            .unwrap_or(DEFAULT_MAX_OPTIONS);

        let audio_player = value("TUTOR_AUDIO_PLAYER")
            .map(|v| split_command(&v))
            .filter(|cmd| !cmd.is_empty())
            .unwrap_or(defaults.audio_player);

        let language = match value("TUTOR_LANGUAGE") {
            Some(code) => Language::from_code(&code).unwrap_or_else(|| {
                warn!(
                    "Unsupported TUTOR_LANGUAGE '{}', using {}",
                    code,
                    defaults.language
                );
                defaults.language
            }),
            None => defaults.language,
        };
        let difficulty = value("TUTOR_DIFFICULTY")
            .map(|label| Difficulty::from_label(&label))
            .unwrap_or(defaults.difficulty);

        Self {
            api_key: value("OPENROUTER_API_KEY"),
            model: value("TUTOR_MODEL").unwrap_or(defaults.model),
            max_options,
            audio_player,
            language,
            difficulty,
            log: LogConfig {
                file: value("TUTOR_LOG_FILE")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.log.file),
                filter: defaults.log.filter,
            },
        }
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model: self.model.clone(),
            ..ModelConfig::default()
        }
    }
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
