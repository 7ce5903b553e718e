use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::service::QuizService;

pub fn render<S: QuizService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let [_, panel, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, panel, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(72),
        Constraint::Fill(1),
    ])
    .areas(panel);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .padding(Padding::horizontal(2));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(inner);

    render_title(frame, chunks[1], chunks[2]);
    render_link_field(frame, chunks[4], app);
    render_settings(frame, chunks[5], app);
    render_status(frame, chunks[6], app);
    render_controls(frame, chunks[8]);
}

fn render_title(frame: &mut Frame, title: Rect, subtitle: Rect) {
    let widget = Paragraph::new(Span::styled(
        "VIDEO QUIZ",
        Style::default().fg(Color::Cyan).bold(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(widget, title);

    let widget = Paragraph::new("Turn a YouTube video into a timed quiz")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, subtitle);
}

fn render_link_field<S: QuizService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let locked = app.session().is_generating();
    let border = if locked { Color::DarkGray } else { Color::Cyan };

    let mut spans = vec![Span::styled(app.url_input(), Style::default().fg(Color::White))];
    if app.url_input().is_empty() {
        spans = vec![Span::styled(
            "https://www.youtube.com/watch?v=...",
            Style::default().fg(Color::DarkGray),
        )];
    }
    if !locked {
        spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
    }

    // Keep the end of long links visible.
    let width = area.width.saturating_sub(4) as usize;
    let overflow = app.url_input().chars().count().saturating_sub(width);

    let widget = Paragraph::new(Line::from(spans))
        .scroll((0, overflow as u16))
        .block(
            Block::default()
                .title(" YouTube link ")
                .borders(Borders::ALL)
                .border_style(border)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_settings<S: QuizService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let params = app.params();
    let line = Line::from(vec![
        Span::styled("Difficulty ", Style::default().fg(Color::DarkGray)),
        Span::styled(params.difficulty.as_str(), Style::default().fg(Color::Yellow)),
        Span::styled("  ·  Language ", Style::default().fg(Color::DarkGray)),
        Span::styled(params.target_lang.as_str(), Style::default().fg(Color::Yellow)),
        Span::styled("  ·  Source ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.source_label(), Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_status<S: QuizService>(frame: &mut Frame, area: Rect, app: &App<S>) {
    if !app.session().is_generating() {
        return;
    }
    let widget = Paragraph::new("Generating quiz, this can take a minute...")
        .alignment(Alignment::Center)
        .fg(Color::Yellow);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("enter generate  ·  tab difficulty  ·  esc quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
