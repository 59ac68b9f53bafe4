use crate::models::QuizMode;
use crate::session::TutorApp;
use crate::ui::layout::calculate_quiz_chunks;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{help_block, key_style, title_block};

pub fn draw_quiz(f: &mut Frame, app: &TutorApp) {
    let layout = calculate_quiz_chunks(f.area());
    let (Some(session), Some(question)) = (app.quiz(), app.question.as_ref()) else {
        return;
    };

    let progress = format!(
        "{} - Question {} / {} - Score {}",
        question.mode.label(),
        question.number,
        session.total(),
        session.score()
    );
    f.render_widget(title_block(progress), layout.header_area);

    let prompt_text = match question.mode {
        QuizMode::TextPrompt => {
            let mut text = Text::default();
            text.push_line(Line::from(format!(
                "Choose the {} translation of:",
                app.language.display_name()
            )));
            text.push_line(Line::from(Span::styled(
                question.prompt.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            text
        }
        QuizMode::AudioPrompt => {
            let mut text = Text::default();
            text.push_line(Line::from("Listen and choose the English meaning."));
            text.push_line(Line::from(vec![
                Span::from("Press "),
                Span::styled("p", key_style()),
                Span::from(" to play it again."),
            ]));
            text
        }
    };
    let prompt = Paragraph::new(prompt_text)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(prompt, layout.prompt_area);

    let items: Vec<ListItem> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let selected = app.selected_option == Some(i);
            let marker = if selected { "(•)" } else { "( )" };
            let mut style = Style::default();
            if let Some(result) = &app.last_result {
                if *option == result.correct_answer {
                    style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                } else if selected {
                    style = style.fg(Color::Red).add_modifier(Modifier::BOLD);
                }
            } else if selected {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            ListItem::new(format!("{} {}. {}", marker, i + 1, option)).style(style)
        })
        .collect();

    let options_title = match &app.last_result {
        Some(result) if result.correct => "Correct!".to_string(),
        Some(result) => format!("Incorrect. The right answer is '{}'", result.correct_answer),
        None => "Options".to_string(),
    };
    let options = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(options_title),
    );
    f.render_widget(options, layout.options_area);

    let mut keys = vec![("Esc", "Quit to Translations")];
    if app.last_result.is_some() {
        keys.insert(0, ("Enter", "Next"));
    } else {
        keys.insert(0, ("Enter", "Submit"));
        keys.insert(0, ("↑/↓", "Select"));
        if question.mode == QuizMode::AudioPrompt {
            keys.push(("p", "Replay"));
        }
    }
    f.render_widget(help_block(&keys, app.status.as_deref()), layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit Test")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Discard this test and return to the translations?")
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Discard)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Test)  "),
        Span::styled("Ctrl+C", key_style()),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
