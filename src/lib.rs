//! # video-quiz
//!
//! A terminal client that turns a YouTube video into a timed multiple-choice
//! quiz. A link is sent to a quiz generation service, the user answers
//! against a countdown, and the attempt is scored into a report with
//! per-question explanations.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use video_quiz::{AppError, Config, LocalQuizService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load(None)?;
//!     video_quiz::run(&config, LocalQuizService::bundled(), "offline demo").await
//! }
//! ```
//!
//! The state machine behind the screens is [`QuizSession`], which can be
//! driven without a terminal.

mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod notice;
pub mod protocol;
pub mod scoring;
pub mod service;
pub mod session;
pub mod telemetry;
pub mod terminal;
mod ui;
pub mod validate;

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

pub use app::App;
pub use config::Config;
pub use error::{AppError, GenerationError, InputError, ScoringError, SessionError};
pub use models::{Question, Quiz, ScoreReport};
pub use service::{HttpQuizService, LocalQuizService, QuizService, QuizSource};
pub use session::{Phase, QuizSession, SessionEvent};
pub use validate::VideoUrl;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the quiz in the terminal until the user quits.
///
/// This takes over the terminal and restores it on return, including when
/// the loop fails.
pub async fn run<S: QuizService>(
    config: &Config,
    service: S,
    source_label: &str,
) -> Result<(), AppError> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut app = App::new(service, source_label, config, events_tx);
    info!(session = %app.session().id(), source = source_label, "starting quiz client");

    let mut term = terminal::TerminalGuard::enter()?;
    let result = run_event_loop(&mut term, &mut app, &mut events_rx).await;
    drop(term);

    info!(session = %app.session().id(), "quiz client closed");
    result
}

async fn run_event_loop<S: QuizService>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<S>,
    events: &mut UnboundedReceiver<SessionEvent>,
) -> Result<(), AppError> {
    loop {
        app.expire_notices();
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_input(app, key) {
                    break;
                }
            }
        }

        while let Ok(event) = events.try_recv() {
            app.handle_session_event(event);
        }

        if app.should_quit {
            break;
        }
        tokio::task::yield_now().await;
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input<S: QuizService>(app: &mut App<S>, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.session().phase() {
        Phase::Input => handle_link_input(app, key),
        Phase::Active => handle_quiz_input(app, key.code),
        Phase::Report => handle_report_input(app, key.code),
    }
}

fn handle_link_input<S: QuizService>(app: &mut App<S>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Enter => app.generate(),
        KeyCode::Tab => app.cycle_difficulty(),
        KeyCode::Backspace => app.url_input_pop(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_url_input();
        }
        KeyCode::Char(c) => app.url_input_push(c),
        _ => {}
    }
    false
}

fn handle_quiz_input<S: QuizService>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_highlighted(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
        KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.choose_option(digit as usize - 1);
            }
        }
        KeyCode::Char('s') | KeyCode::Char('S') => app.submit(),
        KeyCode::Esc => app.start_over(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_report_input<S: QuizService>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_report_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_report_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.retake(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.start_over(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
