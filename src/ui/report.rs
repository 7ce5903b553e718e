use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use super::grade_color;
use crate::app::App;
use crate::models::{QuestionOutcome, ScoreReport, ScoreSource};
use crate::service::QuizService;
use crate::session::SubmitReason;

pub fn render<S: QuizService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    match app.session().report() {
        Some(report) => {
            let time_up = app.session().submit_reason() == Some(SubmitReason::TimeUp);
            render_score_summary(frame, chunks[1], report, time_up);
            render_question_breakdown(frame, chunks[2], &report.details, app.report_scroll());
        }
        None => render_pending(frame, chunks[1]),
    }
    render_controls(frame, chunks[3]);
}

fn render_pending(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Checking your answers...",
            Style::default().fg(Color::Yellow).bold(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_score_summary(frame: &mut Frame, area: Rect, report: &ScoreReport, time_up: bool) {
    let color = grade_color(report.percentage);
    let mut footnote = vec![Span::styled(
        match report.source {
            ScoreSource::Local => "scored locally",
            ScoreSource::Remote => "verified by the quiz service",
        },
        Style::default().fg(Color::DarkGray),
    )];
    if time_up {
        footnote.push(Span::styled(
            "  ·  time ran out",
            Style::default().fg(Color::Red),
        ));
    }

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}%", report.percentage),
            Style::default().fg(color).bold(),
        )),
        Line::from(Span::styled(
            format!(
                "{} correct out of {} questions",
                report.correct_count, report.total_count
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(footnote),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(
    frame: &mut Frame,
    area: Rect,
    details: &[QuestionOutcome],
    scroll: usize,
) {
    let blocks = details
        .iter()
        .enumerate()
        .skip(scroll)
        .flat_map(|(index, outcome)| outcome_lines(index, outcome));

    let widget = Paragraph::new(blocks.collect::<Vec<_>>())
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn outcome_lines(index: usize, outcome: &QuestionOutcome) -> Vec<Line<'_>> {
    let (symbol, color) = if outcome.is_correct {
        ("+", Color::Green)
    } else {
        ("-", Color::Red)
    };
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {symbol} "), Style::default().fg(color).bold()),
            Span::styled(format!("{:2}. ", index + 1), label),
            Span::styled(outcome.prompt.as_str(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("     Your answer: ", label),
            Span::styled(outcome.selected_label(), Style::default().fg(color)),
        ]),
    ];
    if !outcome.is_correct {
        lines.push(Line::from(vec![
            Span::styled("     Correct answer: ", label),
            Span::styled(
                outcome.correct_answer.as_str(),
                Style::default().fg(Color::Green),
            ),
        ]));
    }
    if !outcome.explanation.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("     Explanation: ", label),
            Span::styled(outcome.explanation.as_str(), Style::default().fg(Color::Gray)),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r retake  ·  n new quiz  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
