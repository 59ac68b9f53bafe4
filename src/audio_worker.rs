use crate::audio::{AudioLibrary, AudioProvider};
use crate::models::{AudioRequest, AudioResponse};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Owns the audio library and performs synthesis and blocking playback away
/// from the UI thread. Requests are handled one at a time, so clips never
/// overlap.
pub fn spawn_audio_worker(
    provider: Arc<dyn AudioProvider>,
    audio_tx: Sender<AudioResponse>,
    audio_rx: Receiver<AudioRequest>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("language-tutor::audio_worker".to_string())
        .spawn(move || {
            let mut library = AudioLibrary::new();

            while let Ok(request) = audio_rx.recv() {
                let response = match request {
                    AudioRequest::Prepare { pairs, language } => {
                        let (ready, failed) = library.prepare(provider.as_ref(), &pairs, language);
                        AudioResponse::Prepared { ready, failed }
                    }
                    AudioRequest::Play { text } => match library.play(provider.as_ref(), &text) {
                        Ok(()) => AudioResponse::Finished,
                        Err(e) => {
                            error!("Error during audio playback: {}", e);
                            AudioResponse::Error {
                                error: format!("No audio for '{}': {}", text, e),
                            }
                        }
                    },
                    AudioRequest::PlayAll { texts } => {
                        match library.play_all(provider.as_ref(), &texts) {
                            Ok(played) => {
                                info!("Finished playing {} clips", played);
                                AudioResponse::AllPlayed { played }
                            }
                            Err(e) => {
                                error!("Error during all audio playback: {}", e);
                                AudioResponse::Error {
                                    error: format!("Failed to play all audio: {}", e),
                                }
                            }
                        }
                    }
                };

                if audio_tx.send(response).is_err() {
                    break;
                }
            }
            info!("Audio worker channel disconnected, exiting");
        })
}
