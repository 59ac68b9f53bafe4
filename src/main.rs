use crossbeam_channel::unbounded;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use language_tutor::ai::{LlmContentProvider, OpenRouterClient};
use language_tutor::ai_worker::spawn_ai_worker;
use language_tutor::audio::{AudioPlayer, SpeechProvider};
use language_tutor::audio_worker::spawn_audio_worker;
use language_tutor::config::AppConfig;
use language_tutor::{logger, ui, ContentError, TutorApp};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info, warn};

const TICK: Duration = Duration::from_millis(100);

fn main() -> io::Result<()> {
    let config = AppConfig::from_env();
    logger::init(&config.log)?;
    info!("Starting language tutor with model {}", config.model);

    let mut startup_status = None;
    let mut workers: Vec<(&str, JoinHandle<()>)> = Vec::new();

    let ai_channels = match config
        .api_key()
        .map_err(ContentError::from)
        .and_then(|key| OpenRouterClient::new(key, config.model_config()))
    {
        Ok(client) => {
            let (req_tx, req_rx) = unbounded();
            let (resp_tx, resp_rx) = unbounded();
            let provider = Arc::new(LlmContentProvider::new(client));
            workers.push(("ai", spawn_ai_worker(provider, resp_tx, req_rx)?));
            Some((req_tx, resp_rx))
        }
        Err(e) => {
            error!("Content generation unavailable: {}", e);
            startup_status = Some(e.to_string());
            None
        }
    };

    let audio_channels = match SpeechProvider::new(AudioPlayer::new(config.audio_player.clone())) {
        Ok(provider) => {
            info!("Audio clips stored in {}", provider.audio_dir().display());
            let (req_tx, req_rx) = unbounded();
            let (resp_tx, resp_rx) = unbounded();
            workers.push(("audio", spawn_audio_worker(Arc::new(provider), resp_tx, req_rx)?));
            Some((req_tx, resp_rx))
        }
        Err(e) => {
            error!("Audio unavailable: {}", e);
            startup_status.get_or_insert_with(|| format!("Audio unavailable: {}", e));
            None
        }
    };

    let (ai_tx, ai_rx) = ai_channels.unzip();
    let (audio_tx, audio_rx) = audio_channels.unzip();
    let mut app = TutorApp::new(config.max_options, ai_tx, audio_tx);
    app.status = startup_status;
    app.setup.language = config.language;
    app.setup.difficulty = config.difficulty;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, ai_rx, audio_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Closing the request channels ends both worker loops. The audio worker
    // owns the clip directory, which is removed when it returns.
    drop(app);
    for (name, handle) in workers.into_iter().rev() {
        if handle.join().is_err() {
            warn!("The {} worker panicked", name);
        }
    }
    info!("Exiting");

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TutorApp,
    ai_rx: Option<crossbeam_channel::Receiver<language_tutor::models::AiResponse>>,
    audio_rx: Option<crossbeam_channel::Receiver<language_tutor::models::AudioResponse>>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Some(rx) = &ai_rx {
            while let Ok(response) = rx.try_recv() {
                app.process_ai_response(response);
            }
        }
        if let Some(rx) = &audio_rx {
            while let Ok(response) = rx.try_recv() {
                app.process_audio_response(response);
            }
        }

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
