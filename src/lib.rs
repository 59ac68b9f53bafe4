pub mod ai;
pub mod ai_worker;
pub mod audio;
pub mod audio_worker;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod session;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use ai::{ContentProvider, ContentRequest, LlmContentProvider, ModelConfig, OpenRouterClient};
pub use audio::{AudioLibrary, AudioPlayer, AudioProvider, SpeechProvider};
pub use config::AppConfig;
pub use error::{AudioError, ConfigError, ContentError, QuizError};
pub use models::{AppState, BilingualPair, Difficulty, Language, QuizMode};
pub use quiz::{AnswerResult, Feedback, NextQuestion, Question, QuizEngine, QuizSession, Report};
pub use session::TutorApp;
