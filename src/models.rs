use crate::ai::ContentRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One English item and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BilingualPair {
    source: String,
    target: String,
}

impl BilingualPair {
    /// Returns `None` when either side is blank.
    pub fn new(source: impl AsRef<str>, target: impl AsRef<str>) -> Option<Self> {
        let source = source.as_ref().trim();
        let target = target.as_ref().trim();
        if source.is_empty() || target.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizMode {
    /// English shown, pick the translation
    TextPrompt,
    /// Translation played aloud, pick the English
    AudioPrompt,
}

impl QuizMode {
    pub fn label(&self) -> &'static str {
        match self {
            QuizMode::TextPrompt => "Text Test",
            QuizMode::AudioPrompt => "Listening Test",
        }
    }
}

/// Languages that can be learned. English is always the source side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Spanish,
    Russian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Spanish, Language::Russian];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::Russian => "ru",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::Russian => "Russian",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "es" => Some(Language::Spanish),
            "ru" => Some(Language::Russian),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Language::Spanish => Language::Russian,
            Language::Russian => Language::Spanish,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Elementary,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Elementary,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Elementary => "Elementary",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }

    /// Case-insensitive; unknown labels map to `Intermediate`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" => Difficulty::Beginner,
            "elementary" => Difficulty::Elementary,
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            "expert" => Difficulty::Expert,
            _ => Difficulty::Intermediate,
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|d| d == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|d| d == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub enum AiRequest {
    Generate(ContentRequest),
}

#[derive(Debug)]
pub enum AiResponse {
    Generated {
        request: ContentRequest,
        pairs: Vec<BilingualPair>,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone)]
pub enum AudioRequest {
    /// Pre-synthesize every target item
    Prepare {
        pairs: Vec<BilingualPair>,
        language: Language,
    },
    Play {
        text: String,
    },
    PlayAll {
        texts: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioResponse {
    Prepared { ready: usize, failed: usize },
    Finished,
    /// A play-all request ran to the end; items without a clip are skipped.
    AllPlayed { played: usize },
    Error { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Generating,
    Translations,
    Quiz,
    QuizQuitConfirm,
    Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_trims_and_rejects_blank() {
        let pair = BilingualPair::new("  hello ", "hola\n").unwrap();
        assert_eq!(pair.source(), "hello");
        assert_eq!(pair.target(), "hola");

        assert!(BilingualPair::new("", "hola").is_none());
        assert!(BilingualPair::new("hello", "   ").is_none());
    }

    #[test]
    fn test_language_codes_and_names() {
        assert_eq!(Language::Spanish.code(), "es");
        assert_eq!(Language::Russian.code(), "ru");
        assert_eq!(Language::from_code("RU"), Some(Language::Russian));
        assert_eq!(Language::from_code("en"), None);
        assert_eq!(Language::Spanish.to_string(), "Spanish (es)");
    }

    #[test]
    fn test_difficulty_fallback() {
        assert_eq!(Difficulty::from_label("EXPERT"), Difficulty::Expert);
        assert_eq!(Difficulty::from_label(" beginner "), Difficulty::Beginner);
        assert_eq!(Difficulty::from_label("es"), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_label(""), Difficulty::Intermediate);
        assert_eq!(Difficulty::default(), Difficulty::Intermediate);
    }

    #[test]
    fn test_difficulty_cycles() {
        assert_eq!(Difficulty::Expert.next(), Difficulty::Beginner);
        assert_eq!(Difficulty::Beginner.previous(), Difficulty::Expert);
        assert_eq!(Difficulty::Elementary.next(), Difficulty::Intermediate);
    }
}
