use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::layout::{calculate_list_chunks, calculate_setup_chunks};
use super::{help_block, title_block};
use crate::session::{SetupField, TutorApp};
use crate::utils::{cursor_column, horizontal_scroll};

fn field_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        })
}

/// Scrolls sideways to keep the cursor in view while focused.
fn draw_text_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    cursor: Option<usize>,
) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_col = cursor.map(|c| cursor_column(value, c));
    let scroll = cursor_col.map_or(0, |col| horizontal_scroll(col, inner_width));

    let content = if value.is_empty() {
        Line::from(Span::styled(
            placeholder.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(value.to_string())
    };
    let field = Paragraph::new(content)
        .scroll((0, scroll as u16))
        .block(field_block(title, cursor.is_some()));
    f.render_widget(field, area);

    if let Some(col) = cursor_col {
        let x = area.x + 1 + (col - scroll) as u16;
        f.set_cursor_position((x, area.y + 1));
    }
}

fn draw_selector(f: &mut Frame, area: Rect, title: &str, value: String, focused: bool) {
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let line = Line::from(vec![
        Span::from("◀ "),
        Span::styled(value, style),
        Span::from(" ▶"),
    ]);
    f.render_widget(Paragraph::new(line).block(field_block(title, focused)), area);
}

/// The setup form: topic, item count, difficulty and language.
pub fn draw_menu(f: &mut Frame, app: &TutorApp) {
    let layout = calculate_setup_chunks(f.area());
    let form = &app.setup;

    f.render_widget(title_block("Language Tutor".to_string()), layout.header_area);

    draw_text_field(
        f,
        layout.topic_area,
        "What do you want to learn?",
        &form.topic,
        "e.g. ordering food, colors, the alphabet",
        (form.focus == SetupField::Topic).then_some(form.cursor),
    );
    draw_text_field(
        f,
        layout.count_area,
        "Number of items",
        &form.count,
        "20",
        (form.focus == SetupField::Count).then_some(form.cursor),
    );
    draw_selector(
        f,
        layout.difficulty_area,
        "Difficulty",
        form.difficulty.to_string(),
        form.focus == SetupField::Difficulty,
    );
    draw_selector(
        f,
        layout.language_area,
        "Language",
        form.language.to_string(),
        form.focus == SetupField::Language,
    );

    let help = help_block(
        &[
            ("Tab", "Next Field"),
            ("←/→", "Change"),
            ("Enter", "Generate"),
            ("Esc/Ctrl+C", "Quit"),
        ],
        app.status.as_deref(),
    );
    f.render_widget(help, layout.help_area);
}

pub fn draw_generating(f: &mut Frame, app: &TutorApp) {
    let (header, body, help) = calculate_list_chunks(f.area());
    let form = &app.setup;

    f.render_widget(title_block("Language Tutor".to_string()), header);

    let message = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Generating content...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "{} items about '{}' ({}, {})",
            form.count.trim(),
            form.topic.trim(),
            form.difficulty,
            form.language.display_name()
        )),
    ];
    let body_widget = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body_widget, body);

    f.render_widget(help_block(&[("Ctrl+C", "Exit App")], app.status.as_deref()), help);
}
