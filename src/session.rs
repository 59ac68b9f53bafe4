use crate::ai::ContentRequest;
use crate::error::ConfigError;
use crate::models::{
    AiRequest, AiResponse, AppState, AudioRequest, AudioResponse, BilingualPair, Difficulty,
    Language, QuizMode,
};
use crate::quiz::{AnswerResult, NextQuestion, Question, QuizEngine, QuizSession, Report};
use crate::utils::{delete_before_cursor, insert_char};
use crossbeam_channel::Sender;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Topic,
    Count,
    Difficulty,
    Language,
}

impl SetupField {
    fn next(self) -> Self {
        match self {
            SetupField::Topic => SetupField::Count,
            SetupField::Count => SetupField::Difficulty,
            SetupField::Difficulty => SetupField::Language,
            SetupField::Language => SetupField::Topic,
        }
    }

    fn previous(self) -> Self {
        match self {
            SetupField::Topic => SetupField::Language,
            SetupField::Count => SetupField::Topic,
            SetupField::Difficulty => SetupField::Count,
            SetupField::Language => SetupField::Difficulty,
        }
    }
}

/// The form shown before any content exists.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub topic: String,
    pub count: String,
    pub difficulty: Difficulty,
    pub language: Language,
    pub focus: SetupField,
    /// Character index into the focused text field
    pub cursor: usize,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            count: crate::ai::DEFAULT_ITEM_COUNT.to_string(),
            difficulty: Difficulty::default(),
            language: Language::default(),
            focus: SetupField::Topic,
            cursor: 0,
        }
    }
}

impl SetupForm {
    pub fn focused_text(&self) -> Option<&str> {
        match self.focus {
            SetupField::Topic => Some(&self.topic),
            SetupField::Count => Some(&self.count),
            _ => None,
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            SetupField::Topic => Some(&mut self.topic),
            SetupField::Count => Some(&mut self.count),
            _ => None,
        }
    }

    fn set_focus(&mut self, focus: SetupField) {
        self.focus = focus;
        self.cursor = self.focused_text().map(|t| t.chars().count()).unwrap_or(0);
    }

    pub fn to_request(&self) -> Result<ContentRequest, crate::error::ContentError> {
        ContentRequest::new(&self.topic, &self.count, self.difficulty, self.language)
    }
}

/// Everything the UI thread owns: screen state, the generated word list, the
/// running test and the channels to both workers.
pub struct TutorApp {
    pub state: AppState,
    pub setup: SetupForm,
    pub topic: String,
    pub pairs: Vec<BilingualPair>,
    pub language: Language,
    pub selected_pair: usize,
    pub status: Option<String>,
    pub audio_busy: bool,
    pub should_quit: bool,
    pub question: Option<Question>,
    /// Nothing is selected until the user moves through the options
    pub selected_option: Option<usize>,
    pub last_result: Option<AnswerResult>,
    pub report: Option<Report>,
    engine: QuizEngine<StdRng>,
    quiz: Option<QuizSession>,
    max_options: usize,
    ai_tx: Option<Sender<AiRequest>>,
    audio_tx: Option<Sender<AudioRequest>>,
}

impl TutorApp {
    pub fn new(
        max_options: usize,
        ai_tx: Option<Sender<AiRequest>>,
        audio_tx: Option<Sender<AudioRequest>>,
    ) -> Self {
        Self::with_rng(max_options, ai_tx, audio_tx, StdRng::from_entropy())
    }

    pub fn with_rng(
        max_options: usize,
        ai_tx: Option<Sender<AiRequest>>,
        audio_tx: Option<Sender<AudioRequest>>,
        rng: StdRng,
    ) -> Self {
        Self {
            state: AppState::Setup,
            setup: SetupForm::default(),
            topic: String::new(),
            pairs: Vec::new(),
            language: Language::default(),
            selected_pair: 0,
            status: None,
            audio_busy: false,
            should_quit: false,
            question: None,
            selected_option: None,
            last_result: None,
            report: None,
            engine: QuizEngine::with_rng(rng),
            quiz: None,
            max_options,
            ai_tx,
            audio_tx,
        }
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.status = Some(message);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Setup => self.handle_setup_key(key),
            AppState::Generating => {}
            AppState::Translations => self.handle_translations_key(key),
            AppState::Quiz => self.handle_quiz_key(key),
            AppState::QuizQuitConfirm => self.handle_quit_confirm_key(key),
            AppState::Summary => self.handle_summary_key(key),
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Enter => {
                self.request_generation();
                return;
            }
            _ => {}
        }

        let form = &mut self.setup;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.set_focus(form.focus.next()),
            KeyCode::BackTab | KeyCode::Up => form.set_focus(form.focus.previous()),
            KeyCode::Left => match form.focus {
                SetupField::Difficulty => form.difficulty = form.difficulty.previous(),
                SetupField::Language => form.language = form.language.next(),
                _ => form.cursor = form.cursor.saturating_sub(1),
            },
            KeyCode::Right => match form.focus {
                SetupField::Difficulty => form.difficulty = form.difficulty.next(),
                SetupField::Language => form.language = form.language.next(),
                _ => {
                    let len = form.focused_text().map(|t| t.chars().count()).unwrap_or(0);
                    form.cursor = (form.cursor + 1).min(len);
                }
            },
            KeyCode::Backspace => {
                let mut cursor = form.cursor;
                if let Some(text) = form.focused_text_mut() {
                    delete_before_cursor(text, &mut cursor);
                }
                form.cursor = cursor;
            }
            KeyCode::Char(c) => {
                let mut cursor = form.cursor;
                if let Some(text) = form.focused_text_mut() {
                    insert_char(text, &mut cursor, c);
                }
                form.cursor = cursor;
            }
            _ => {}
        }
    }

    fn request_generation(&mut self) {
        let request = match self.setup.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };
        let Some(ai_tx) = &self.ai_tx else {
            self.set_status(ConfigError::MissingApiKey.to_string());
            return;
        };

        info!(
            "Requesting {} {} items about '{}' in {}",
            request.count, request.difficulty, request.topic, request.language
        );
        if ai_tx.send(AiRequest::Generate(request)).is_err() {
            self.set_status("Content generator is not running");
            return;
        }
        self.status = None;
        self.state = AppState::Generating;
    }

    pub fn process_ai_response(&mut self, response: AiResponse) {
        match response {
            AiResponse::Generated { request, pairs } => {
                info!("Received {} pairs for '{}'", pairs.len(), request.topic);
                self.topic = request.topic;
                self.language = request.language;
                self.pairs = pairs;
                self.selected_pair = 0;
                self.quiz = None;
                self.report = None;
                self.status = None;
                self.state = AppState::Translations;
                self.send_audio(AudioRequest::Prepare {
                    pairs: self.pairs.clone(),
                    language: self.language,
                });
            }
            AiResponse::Error { error } => {
                self.state = AppState::Setup;
                self.set_status(error);
            }
        }
    }

    pub fn process_audio_response(&mut self, response: AudioResponse) {
        match response {
            AudioResponse::Prepared { ready, failed } => {
                if failed > 0 {
                    self.set_status(format!(
                        "Audio ready for {} items, {} could not be synthesized",
                        ready, failed
                    ));
                }
            }
            AudioResponse::Finished => self.audio_busy = false,
            AudioResponse::AllPlayed { played } => {
                self.audio_busy = false;
                info!("Play-all finished after {} clips", played);
                self.status = Some("Finished playing all audio.".to_string());
            }
            AudioResponse::Error { error } => {
                self.audio_busy = false;
                self.set_status(error);
            }
        }
    }

    fn send_audio(&mut self, request: AudioRequest) {
        let sent = self
            .audio_tx
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());
        if !sent {
            self.audio_busy = false;
            self.set_status("Audio is not available");
        }
    }

    fn play(&mut self, text: String) {
        self.audio_busy = true;
        self.send_audio(AudioRequest::Play { text });
    }

    fn handle_translations_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.selected_pair = self.selected_pair.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_pair + 1 < self.pairs.len() {
                    self.selected_pair += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(pair) = self.pairs.get(self.selected_pair) {
                    let text = pair.target().to_string();
                    self.play(text);
                }
            }
            KeyCode::Char('a') => {
                let texts = self.pairs.iter().map(|p| p.target().to_string()).collect();
                self.audio_busy = true;
                self.send_audio(AudioRequest::PlayAll { texts });
            }
            KeyCode::Char('t') => self.start_quiz(QuizMode::TextPrompt),
            KeyCode::Char('l') => self.start_quiz(QuizMode::AudioPrompt),
            KeyCode::Char('n') | KeyCode::Esc => {
                self.status = None;
                self.state = AppState::Setup;
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    pub fn start_quiz(&mut self, mode: QuizMode) {
        match self.engine.start_session(&self.pairs, mode) {
            Ok(session) => {
                info!("Starting {} with {} items", mode.label(), session.total());
                self.quiz = Some(session);
                self.report = None;
                self.status = None;
                self.advance();
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Moves to the next question, or to the summary once none remain.
    fn advance(&mut self) {
        let Some(session) = self.quiz.as_mut() else {
            return;
        };

        match self.engine.next_question(session, self.max_options) {
            Ok(NextQuestion::Question(question)) => {
                let prompt = (question.mode == QuizMode::AudioPrompt).then(|| question.prompt.clone());
                self.question = Some(question);
                self.selected_option = None;
                self.last_result = None;
                self.state = AppState::Quiz;
                if let Some(text) = prompt {
                    self.play(text);
                }
            }
            Ok(NextQuestion::SessionComplete) => match self.engine.finalize(session) {
                Ok(report) => {
                    info!(
                        "Test finished: {}/{} ({:.2}%)",
                        report.score, report.total, report.percentage
                    );
                    self.report = Some(report);
                    self.question = None;
                    self.last_result = None;
                    self.state = AppState::Summary;
                }
                Err(e) => self.set_status(e.to_string()),
            },
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn submit_selection(&mut self) {
        let (Some(session), Some(question)) = (self.quiz.as_mut(), self.question.as_ref()) else {
            return;
        };
        let chosen = self
            .selected_option
            .and_then(|i| question.options.get(i))
            .map(String::as_str)
            .unwrap_or("");

        match self.engine.submit_answer(session, chosen) {
            Ok(result) => {
                self.status = None;
                self.last_result = Some(result);
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn handle_quiz_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.state = AppState::QuizQuitConfirm;
            return;
        }

        if self.last_result.is_some() {
            if key.code == KeyCode::Enter {
                self.advance();
            }
            return;
        }

        let option_count = self.question.as_ref().map(|q| q.options.len()).unwrap_or(0);
        match key.code {
            KeyCode::Up => {
                self.selected_option = Some(match self.selected_option {
                    Some(i) if i > 0 => i - 1,
                    Some(i) => i,
                    None => 0,
                });
            }
            KeyCode::Down => {
                if option_count > 0 {
                    self.selected_option = Some(match self.selected_option {
                        Some(i) => (i + 1).min(option_count - 1),
                        None => 0,
                    });
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let idx = c.to_digit(10).unwrap_or(0) as usize;
                if (1..=option_count).contains(&idx) {
                    self.selected_option = Some(idx - 1);
                }
            }
            KeyCode::Char('p') => {
                if let Some(question) = &self.question
                    && question.mode == QuizMode::AudioPrompt
                {
                    let text = question.prompt.clone();
                    self.play(text);
                }
            }
            KeyCode::Enter => self.submit_selection(),
            _ => {}
        }
    }

    fn handle_quit_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') => {
                info!("Test abandoned");
                self.quiz = None;
                self.question = None;
                self.last_result = None;
                self.state = AppState::Translations;
            }
            KeyCode::Char('n') | KeyCode::Esc => self.state = AppState::Quiz,
            _ => {}
        }
    }

    fn handle_summary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => {
                let mode = self
                    .quiz
                    .as_ref()
                    .map(|q| q.mode())
                    .unwrap_or(QuizMode::TextPrompt);
                self.start_quiz(mode);
            }
            KeyCode::Char('m') | KeyCode::Esc => {
                self.quiz = None;
                self.state = AppState::Translations;
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }
}
