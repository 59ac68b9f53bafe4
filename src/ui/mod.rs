pub mod layout;
mod menu;
mod quiz;
mod summary;
mod translations;

use crate::models::AppState;
use crate::session::TutorApp;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub use layout::{calculate_quiz_chunks, calculate_setup_chunks, calculate_summary_chunks};
pub use menu::{draw_generating, draw_menu};
pub use quiz::{draw_quit_confirmation, draw_quiz};
pub use summary::draw_summary;
pub use translations::draw_translations;

/// Draws whichever screen `app.state` selects.
pub fn draw(f: &mut Frame, app: &TutorApp) {
    match app.state {
        AppState::Setup => draw_menu(f, app),
        AppState::Generating => draw_generating(f, app),
        AppState::Translations => draw_translations(f, app),
        AppState::Quiz => draw_quiz(f, app),
        AppState::QuizQuitConfirm => draw_quit_confirmation(f),
        AppState::Summary => draw_summary(f, app),
    }
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Key hints on the first line, the status message (if any) below.
fn help_block<'a>(keys: &[(&'a str, &'a str)], status: Option<&'a str>) -> Paragraph<'a> {
    let mut spans = Vec::new();
    for (key, label) in keys {
        spans.push(Span::styled(*key, key_style()));
        spans.push(Span::from(format!(" {}  ", label)));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(status) = status {
        lines.push(Line::from(Span::styled(
            status,
            Style::default().fg(Color::Yellow),
        )));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn title_block(title: String) -> Paragraph<'static> {
    Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}
