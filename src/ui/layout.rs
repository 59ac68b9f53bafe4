use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct SetupLayout {
    pub header_area: Rect,
    pub topic_area: Rect,
    pub count_area: Rect,
    pub difficulty_area: Rect,
    pub language_area: Rect,
    pub help_area: Rect,
}

pub struct QuizLayout {
    pub header_area: Rect,
    pub prompt_area: Rect,
    pub options_area: Rect,
    pub help_area: Rect,
}

pub struct SummaryLayout {
    pub header_area: Rect,
    pub score_area: Rect,
    pub incorrect_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_setup_chunks(area: Rect) -> SetupLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area);

    SetupLayout {
        header_area: chunks[0],
        topic_area: chunks[1],
        count_area: chunks[2],
        difficulty_area: chunks[3],
        language_area: chunks[4],
        help_area: chunks[6],
    }
}

/// Shared by the translations table and the generating screen.
pub fn calculate_list_chunks(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(4),
            Constraint::Length(4),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        prompt_area: chunks[1],
        options_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_summary_chunks(area: Rect) -> SummaryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(4),
            Constraint::Length(4),
        ])
        .split(area);

    SummaryLayout {
        header_area: chunks[0],
        score_area: chunks[1],
        incorrect_area: chunks[2],
        footer_area: chunks[3],
    }
}
