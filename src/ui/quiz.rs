use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use super::format_clock;
use crate::app::App;
use crate::models::Question;
use crate::service::QuizService;

const LOW_TIME_SECS: u32 = 60;

pub fn render<S: QuizService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let Some(question) = app.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_progress(frame, chunks[1], app);
    render_question_text(frame, chunks[3], question);
    render_options(
        frame,
        chunks[4],
        question,
        app.option_cursor(),
        app.session().cursor().and_then(|i| app.session().answer_for(i)),
    );
    render_controls(frame, chunks[5]);
}

fn render_header<S: QuizService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let title = app.session().quiz().map_or("", |quiz| quiz.title());
    let remaining = app.session().remaining_seconds().unwrap_or_default();
    let clock_style = if remaining <= LOW_TIME_SECS {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::Gray)
    };

    let [title_area, clock_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(8)]).areas(area);

    frame.render_widget(
        Paragraph::new(title).fg(Color::Cyan).bold(),
        title_area,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(format!("⏱ {}", format_clock(remaining)), clock_style))
            .alignment(Alignment::Right),
        clock_area,
    );
}

fn render_progress<S: QuizService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let total = app.session().quiz().map_or(0, |quiz| quiz.len());
    let current = app.session().cursor().map_or(0, |i| i + 1);
    let answered = app.session().answered_count();
    let ratio = if total > 0 {
        answered as f64 / total as f64
    } else {
        0.0
    };

    let widget = Gauge::default()
        .ratio(ratio)
        .label(format!(
            "Question {current} of {total}  ·  {answered} answered"
        ))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .use_unicode(true);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, question: &Question) {
    let widget = Paragraph::new(question.prompt.as_str())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    highlighted: usize,
    chosen: Option<usize>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_highlighted = index == highlighted;
        let is_chosen = chosen == Some(index);
        let style = match (is_highlighted, is_chosen) {
            (true, _) => Style::default().fg(Color::Cyan).bold(),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_highlighted { ">" } else { " " };
        let check = if is_chosen { "●" } else { "○" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("{check} {}. ", index + 1), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Color::DarkGray)
                .padding(Padding::vertical(1)),
        );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(
        "j/k choose  ·  enter answer  ·  h/l prev/next  ·  s submit  ·  esc new link  ·  q quit",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
