//! Error types for the tutor.
//!
//! Every error here is recoverable: the UI turns them into status messages.

use thiserror::Error;

/// Quiz engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// A test cannot start before any content has been generated
    #[error("No content to quiz on. Generate some words first.")]
    EmptyContent,

    /// Asked for another question after the session reported completion
    #[error("The test is already complete")]
    SessionComplete,

    /// Answer submitted while no question is on screen
    #[error("There is no question to answer")]
    NoActiveQuestion,

    /// Blank answer submitted
    #[error("Please select an answer")]
    NoSelection,

    /// Report requested while questions remain
    #[error("The test is not finished yet")]
    SessionNotComplete,
}

/// Content generation errors
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Please enter a concept to learn about")]
    EmptyTopic,

    #[error("Please enter a valid positive integer for the number of items (got '{0}')")]
    InvalidCount(String),

    #[error("Failed to create OpenRouter client: {0}")]
    Client(String),

    #[error("OpenRouter API error: {0}")]
    Api(String),

    #[error("Failed to parse generated content: {0}")]
    Parse(String),

    #[error("The model returned no usable word pairs")]
    Empty,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Speech synthesis and playback errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Speech request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Audio file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("No audio found for '{0}'")]
    Missing(String),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENROUTER_API_KEY is not set; add it to the environment or a .env file")]
    MissingApiKey,
}
