pub mod player;
pub mod tts;

use crate::error::AudioError;
use crate::models::{BilingualPair, Language};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

pub use player::AudioPlayer;
pub use tts::GoogleTts;

/// A synthesized clip ready to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioHandle {
    pub path: PathBuf,
    pub text: String,
    pub language: Language,
}

/// Speech synthesis and playback.
pub trait AudioProvider: Send + Sync {
    fn synthesize(&self, text: &str, language: Language) -> Result<AudioHandle, AudioError>;

    /// Blocks the calling thread until playback ends.
    fn play(&self, handle: &AudioHandle) -> Result<(), AudioError>;

    /// Releases whatever backs a clip that is no longer needed.
    fn discard(&self, _handle: &AudioHandle) {}
}

/// Google TTS for synthesis, [`AudioPlayer`] for playback. Clips are kept in a
/// temporary directory that is removed when the provider is dropped.
pub struct SpeechProvider {
    tts: GoogleTts,
    player: AudioPlayer,
    dir: TempDir,
}

impl SpeechProvider {
    pub fn new(player: AudioPlayer) -> Result<Self, AudioError> {
        let dir = tempfile::Builder::new().prefix("language-tutor-").tempdir()?;
        let tts = GoogleTts::new(dir.path())?;
        Ok(Self {
            tts,
            player,
            dir,
        })
    }

    pub fn audio_dir(&self) -> &Path {
        self.dir.path()
    }
}

impl AudioProvider for SpeechProvider {
    fn synthesize(&self, text: &str, language: Language) -> Result<AudioHandle, AudioError> {
        let path = self.tts.synthesize_to_file(text, language)?;
        Ok(AudioHandle {
            path,
            text: text.to_string(),
            language,
        })
    }

    fn play(&self, handle: &AudioHandle) -> Result<(), AudioError> {
        self.player.play_file(&handle.path)
    }

    fn discard(&self, handle: &AudioHandle) {
        if let Err(e) = std::fs::remove_file(&handle.path) {
            warn!("Could not remove '{}': {}", handle.path.display(), e);
        }
    }
}

/// Prepared audio for the target side of the current word list.
#[derive(Debug, Default)]
pub struct AudioLibrary {
    clips: HashMap<String, AudioHandle>,
    language: Option<Language>,
}

impl AudioLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the library with audio for every target item. Clips from the
    /// previous list are discarded. Items that fail to synthesize are logged
    /// and skipped. Returns `(ready, failed)`.
    pub fn prepare(
        &mut self,
        provider: &dyn AudioProvider,
        pairs: &[BilingualPair],
        language: Language,
    ) -> (usize, usize) {
        for (_, old) in self.clips.drain() {
            provider.discard(&old);
        }
        self.language = Some(language);
        let mut failed = 0;

        for pair in pairs {
            if self.clips.contains_key(pair.target()) {
                continue;
            }
            match provider.synthesize(pair.target(), language) {
                Ok(handle) => {
                    self.clips.insert(pair.target().to_string(), handle);
                }
                Err(e) => {
                    warn!("No audio for '{}': {}", pair.target(), e);
                    failed += 1;
                }
            }
        }

        info!("Prepared audio for {} items ({} failed)", self.len(), failed);
        (self.len(), failed)
    }

    pub fn get(&self, text: &str) -> Option<&AudioHandle> {
        self.clips.get(text)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Plays the clip for `text`, synthesizing it first if it was not prepared.
    pub fn play(&mut self, provider: &dyn AudioProvider, text: &str) -> Result<(), AudioError> {
        if self.get(text).is_none() {
            let language = self
                .language
                .ok_or_else(|| AudioError::Missing(text.to_string()))?;
            let handle = provider.synthesize(text, language)?;
            self.clips.insert(text.to_string(), handle);
        }
        let handle = self
            .get(text)
            .ok_or_else(|| AudioError::Missing(text.to_string()))?;
        provider.play(handle)
    }

    /// Plays prepared clips in order, skipping texts without audio. Returns how
    /// many were played.
    pub fn play_all(
        &self,
        provider: &dyn AudioProvider,
        texts: &[String],
    ) -> Result<usize, AudioError> {
        if self.is_empty() {
            return Err(AudioError::Missing("the current list".to_string()));
        }
        let mut played = 0;
        for text in texts {
            match self.get(text) {
                Some(handle) => {
                    provider.play(handle)?;
                    played += 1;
                }
                None => warn!("Skipping '{}': no audio prepared", text),
            }
        }
        Ok(played)
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockAudioProvider;
    use super::*;

    fn pairs() -> Vec<BilingualPair> {
        vec![
            BilingualPair::new("hello", "hola").unwrap(),
            BilingualPair::new("cat", "gato").unwrap(),
            BilingualPair::new("dog", "perro").unwrap(),
        ]
    }

    #[test]
    fn test_prepare_skips_failures() {
        let provider = MockAudioProvider::failing_on(&["gato"]);
        let mut library = AudioLibrary::new();

        let (ready, failed) = library.prepare(&provider, &pairs(), Language::Spanish);
        assert_eq!((ready, failed), (2, 1));
        assert!(library.get("hola").is_some());
        assert!(library.get("gato").is_none());
        assert_eq!(library.get("perro").unwrap().language, Language::Spanish);
    }

    #[test]
    fn test_prepare_synthesizes_duplicates_once() {
        let provider = MockAudioProvider::default();
        let mut library = AudioLibrary::new();
        let mut list = pairs();
        list.push(BilingualPair::new("hi", "hola").unwrap());

        library.prepare(&provider, &list, Language::Spanish);
        assert_eq!(library.len(), 3);
        assert_eq!(provider.synthesized.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_play_all_skips_missing_audio() {
        let provider = MockAudioProvider::failing_on(&["gato"]);
        let mut library = AudioLibrary::new();
        library.prepare(&provider, &pairs(), Language::Spanish);

        let texts: Vec<String> = pairs().iter().map(|p| p.target().to_string()).collect();
        let played = library.play_all(&provider, &texts).unwrap();
        assert_eq!(played, 2);
        assert_eq!(*provider.played.lock().unwrap(), vec!["hola", "perro"]);
    }

    #[test]
    fn test_play_synthesizes_on_demand() {
        let provider = MockAudioProvider::default();
        let mut library = AudioLibrary::new();
        library.prepare(&provider, &pairs(), Language::Russian);

        library.play(&provider, "кот").unwrap();
        assert!(library.get("кот").is_some());
        assert_eq!(*provider.played.lock().unwrap(), vec!["кот"]);
    }

    #[test]
    fn test_play_without_language_is_missing() {
        let provider = MockAudioProvider::default();
        let mut library = AudioLibrary::new();
        assert!(library.is_empty());
        assert!(matches!(
            library.play(&provider, "hola"),
            Err(AudioError::Missing(_))
        ));
    }

    #[test]
    fn test_prepare_discards_previous_clips() {
        let provider = MockAudioProvider::default();
        let mut library = AudioLibrary::new();
        library.prepare(&provider, &pairs(), Language::Spanish);
        assert!(provider.discarded.lock().unwrap().is_empty());

        let next = vec![BilingualPair::new("red", "rojo").unwrap()];
        library.prepare(&provider, &next, Language::Spanish);

        let mut discarded = provider.discarded.lock().unwrap().clone();
        discarded.sort();
        assert_eq!(discarded, vec!["gato", "hola", "perro"]);
        assert_eq!(library.len(), 1);
        assert!(library.get("hola").is_none());
    }

    #[test]
    fn test_play_all_before_prepare_is_missing() {
        let provider = MockAudioProvider::default();
        let library = AudioLibrary::new();
        assert!(matches!(
            library.play_all(&provider, &["hola".to_string()]),
            Err(AudioError::Missing(_))
        ));
    }

    #[test]
    fn test_speech_provider_removes_discarded_file() {
        let provider = SpeechProvider::new(AudioPlayer::new(vec!["true".to_string()])).unwrap();
        let path = provider.audio_dir().join("es_0000.mp3");
        std::fs::write(&path, b"ID3").unwrap();
        let handle = AudioHandle {
            path: path.clone(),
            text: "hola".to_string(),
            language: Language::Spanish,
        };

        provider.discard(&handle);
        assert!(!path.exists());
    }

    #[test]
    fn test_speech_provider_drop_removes_dir() {
        let provider = SpeechProvider::new(AudioPlayer::new(vec!["true".to_string()])).unwrap();
        let dir = provider.audio_dir().to_path_buf();
        assert!(dir.exists());
        drop(provider);
        assert!(!dir.exists());
    }
}
