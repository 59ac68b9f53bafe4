use crate::ai::ContentProvider;
use crate::models::{AiRequest, AiResponse};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Runs content generation off the UI thread. The worker exits when the
/// request channel is closed.
pub fn spawn_ai_worker(
    provider: Arc<dyn ContentProvider>,
    ai_tx: Sender<AiResponse>,
    ai_rx: Receiver<AiRequest>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("language-tutor::ai_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to start AI runtime: {}", e);
                    let _ = ai_tx.send(AiResponse::Error {
                        error: format!("Failed to start AI runtime: {}", e),
                    });
                    return;
                }
            };

            while let Ok(AiRequest::Generate(request)) = ai_rx.recv() {
                info!("Worker received request for '{}'", request.topic);
                let result = rt.block_on(provider.generate(&request));

                let response = match result {
                    Ok(pairs) if pairs.is_empty() => AiResponse::Error {
                        error: "Failed to retrieve content.".to_string(),
                    },
                    Ok(pairs) => AiResponse::Generated { request, pairs },
                    Err(e) => {
                        error!("Failed to retrieve bilingual content: {}", e);
                        AiResponse::Error {
                            error: e.to_string(),
                        }
                    }
                };
                if ai_tx.send(response).is_err() {
                    break;
                }
            }
            info!("AI worker channel disconnected, exiting");
        })
}
