mod input;
mod quiz;
mod report;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::App;
use crate::notice::{Notice, NoticeLevel};
use crate::service::QuizService;
use crate::session::Phase;

pub fn render<S: QuizService>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let [body, notice_bar] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    match app.session().phase() {
        Phase::Input => input::render(frame, body, app),
        Phase::Active => quiz::render(frame, body, app),
        Phase::Report => report::render(frame, body, app),
    }

    if let Some(notice) = app.notices().latest() {
        render_notice(frame, notice_bar, notice);
    }
}

fn render_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    let (symbol, color) = match notice.level {
        NoticeLevel::Info => ("i", Color::Cyan),
        NoticeLevel::Success => ("✓", Color::Green),
        NoticeLevel::Error => ("!", Color::Red),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {symbol} "), Style::default().fg(color).bold()),
        Span::styled(notice.message.as_str(), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Formats remaining seconds as `m:ss`.
pub(crate) fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub(crate) fn grade_color(percentage: u8) -> Color {
    match percentage {
        80.. => Color::Green,
        60..=79 => Color::Yellow,
        _ => Color::Red,
    }
}
