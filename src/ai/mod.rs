pub mod client;
pub mod generator;

// Public API exports
pub use client::{ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use generator::{
    parse_bilingual_response, ContentProvider, ContentRequest, LlmContentProvider,
    DEFAULT_ITEM_COUNT,
};
