use crate::error::AudioError;
use crate::models::Language;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";
/// The endpoint rejects longer text, so requests are split.
pub const MAX_CHUNK_CHARS: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches MP3 speech from the public translate TTS endpoint.
pub struct GoogleTts {
    client: reqwest::blocking::Client,
    output_dir: PathBuf,
    counter: AtomicUsize,
}

impl GoogleTts {
    pub fn new(output_dir: &Path) -> Result<Self, AudioError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0")
            .build()?;

        Ok(Self {
            client,
            output_dir: output_dir.to_path_buf(),
            counter: AtomicUsize::new(0),
        })
    }

    /// Writes the speech for `text` to a new MP3 file and returns its path.
    pub fn synthesize_to_file(&self, text: &str, language: Language) -> Result<PathBuf, AudioError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(AudioError::Synthesis("nothing to speak".to_string()));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let total = chunks.len().to_string();
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let response = self
                .client
                .get(TTS_ENDPOINT)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language.code()),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()?
                .error_for_status()?;
            let bytes = response.bytes()?;
            if bytes.is_empty() {
                return Err(AudioError::Synthesis(format!("empty audio for chunk {}", idx)));
            }
            audio.extend_from_slice(&bytes);
        }

        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self.output_dir.join(format!("{}_{:04}.mp3", language.code(), n));
        let mut file = std::fs::File::create(&path)?;
        file.write_all(&audio)?;
        debug!("Wrote {} bytes of speech to {}", audio.len(), path.display());
        info!("Text-to-speech conversion successful for language '{}'", language.code());

        Ok(path)
    }
}

/// Splits on whitespace into chunks of at most `max_chars` characters. A
/// single word longer than the limit is split mid-word.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            chunks.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
