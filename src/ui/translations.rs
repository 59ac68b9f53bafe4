use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::layout::calculate_list_chunks;
use super::{help_block, title_block};
use crate::session::TutorApp;

/// Generated pairs, English on the left and the target language on the right.
pub fn draw_translations(f: &mut Frame, app: &TutorApp) {
    let (header, body, help) = calculate_list_chunks(f.area());

    let title = format!("Translations - {} ({} items)", app.topic, app.pairs.len());
    f.render_widget(title_block(title), header);

    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let table_header = Row::new(vec![
        Cell::from("English"),
        Cell::from(app.language.display_name()),
    ])
    .style(header_style)
    .bottom_margin(1);

    let rows: Vec<Row> = app
        .pairs
        .iter()
        .map(|pair| Row::new(vec![pair.source().to_string(), pair.target().to_string()]))
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(table_header)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(app.selected_pair));
    f.render_stateful_widget(table, body, &mut state);

    let status = if app.audio_busy && app.status.is_none() {
        Some("Playing audio...")
    } else {
        app.status.as_deref()
    };
    let keys = [
        ("↑/↓", "Navigate"),
        ("Enter", "Play"),
        ("a", "Play All"),
        ("t", "Text Test"),
        ("l", "Listening Test"),
        ("n", "New Topic"),
        ("q", "Quit"),
    ];
    f.render_widget(help_block(&keys, status), help);
}
