use crate::quiz::Feedback;
use crate::session::TutorApp;
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::truncate_string;
use ratatui::{
    layout::{Alignment, Constraint},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::{help_block, title_block};

fn feedback_color(feedback: Feedback) -> Color {
    match feedback {
        Feedback::Excellent => Color::Green,
        Feedback::Good => Color::Yellow,
        Feedback::NeedsPractice => Color::Red,
    }
}

pub fn draw_summary(f: &mut Frame, app: &TutorApp) {
    let layout = calculate_summary_chunks(f.area());
    let Some(report) = &app.report else {
        return;
    };

    let mode = app.quiz().map(|q| q.mode().label()).unwrap_or("Test");
    f.render_widget(
        title_block(format!("{} Results - {}", mode, app.topic)),
        layout.header_area,
    );

    let score_lines = vec![
        Line::from(format!("Score: {} / {}", report.score, report.total)),
        Line::from(format!("Percentage: {:.2}%", report.percentage)),
        Line::from(""),
        Line::from(Span::styled(
            report.feedback.message(),
            Style::default()
                .fg(feedback_color(report.feedback))
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let score = Paragraph::new(score_lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(score, layout.score_area);

    if report.incorrect_items.is_empty() {
        let perfect = Paragraph::new("No mistakes. Well done!")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Incorrect Answers"));
        f.render_widget(perfect, layout.incorrect_area);
    } else {
        let width = layout.incorrect_area.width.saturating_sub(10) as usize / 3;
        let rows: Vec<Row> = report
            .incorrect_items
            .iter()
            .map(|item| {
                Row::new(vec![
                    Cell::from(item.order.to_string()),
                    Cell::from(truncate_string(&item.prompt_text, width)),
                    Cell::from(truncate_string(&item.correct_answer, width)),
                    Cell::from(truncate_string(&item.user_answer, width)),
                ])
            })
            .collect();

        let header = Row::new(vec!["#", "Prompt", "Correct Answer", "Your Answer"])
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);
        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Incorrect Answers"));
        f.render_widget(table, layout.incorrect_area);
    }

    let keys = [
        ("r", "Retake"),
        ("m", "Translations"),
        ("q", "Quit"),
    ];
    f.render_widget(help_block(&keys, app.status.as_deref()), layout.footer_area);
}
