use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::config::Config;
use crate::models::Question;
use crate::notice::Notices;
use crate::service::{self, GenerationParams, QuizService};
use crate::session::{
    Completion, QuizSession, SessionEvent, SubmitReason, Submission, TickOutcome,
    VerificationRequest,
};

const MAX_URL_LENGTH: usize = 512;

/// The terminal shell around a [`QuizSession`]: the link being typed, the
/// highlighted option, report scrolling, and notifications. Work that has to
/// wait on the network is spawned and reports back through `events`.
pub struct App<S> {
    session: QuizSession,
    service: Arc<S>,
    source_label: String,
    params: GenerationParams,
    request_timeout: Duration,
    events: UnboundedSender<SessionEvent>,
    url_input: String,
    option_cursor: usize,
    report_scroll: usize,
    notices: Notices,
    pub should_quit: bool,
}

impl<S: QuizService> App<S> {
    pub fn new(
        service: S,
        source_label: impl Into<String>,
        config: &Config,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            session: QuizSession::new(config.session_settings(), events.clone()),
            service: Arc::new(service),
            source_label: source_label.into(),
            params: config.generation_params(),
            request_timeout: config.request_timeout(),
            events,
            url_input: String::new(),
            option_cursor: 0,
            report_scroll: 0,
            notices: Notices::default(),
            should_quit: false,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn report_scroll(&self) -> usize {
        self.report_scroll
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn expire_notices(&mut self) {
        self.notices.expire(Instant::now());
    }

    // ── input screen ──────────────────────────────────────────────────────

    pub fn url_input_push(&mut self, c: char) {
        if self.url_input.chars().count() < MAX_URL_LENGTH {
            self.url_input.push(c);
        }
    }

    pub fn url_input_pop(&mut self) {
        self.url_input.pop();
    }

    pub fn clear_url_input(&mut self) {
        self.url_input.clear();
    }

    pub fn cycle_difficulty(&mut self) {
        self.params.difficulty = self.params.difficulty.next();
    }

    /// Validates the typed link and, if it is accepted, asks the quiz service
    /// for a quiz in the background.
    pub fn generate(&mut self) {
        let request = match self.session.request_generation(&self.url_input) {
            Ok(request) => request,
            Err(err) => {
                self.notices.error(err.to_string());
                return;
            }
        };

        self.notices.info("Analyzing video content...");
        let service = Arc::clone(&self.service);
        let params = self.params.clone();
        let deadline = self.request_timeout;
        let events = self.events.clone();

        tokio::spawn(async move {
            let result =
                service::generate_with_deadline(service.as_ref(), &request.video, &params, deadline)
                    .await;
            if events
                .send(SessionEvent::Generated {
                    request: request.id,
                    result,
                })
                .is_err()
            {
                debug!("app closed before generation finished");
            }
        });
    }

    // ── quiz screen ───────────────────────────────────────────────────────

    fn current_options(&self) -> usize {
        self.session
            .current_question()
            .map_or(0, |question| question.options.len())
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn select_next_option(&mut self) {
        let count = self.current_options();
        if count > 0 {
            self.option_cursor = (self.option_cursor + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.current_options();
        if count > 0 {
            self.option_cursor = (self.option_cursor + count - 1) % count;
        }
    }

    /// Answers the current question with the highlighted option and moves on.
    pub fn choose_highlighted(&mut self) {
        self.choose_option(self.option_cursor);
    }

    pub fn choose_option(&mut self, option: usize) {
        let Some(index) = self.session.cursor() else {
            return;
        };
        match self.session.select_answer(index, option) {
            Ok(()) => {
                self.option_cursor = option;
                if index + 1 < self.session.quiz().map_or(0, |quiz| quiz.len()) {
                    self.next_question();
                }
            }
            Err(err) => self.notices.error(err.to_string()),
        }
    }

    pub fn next_question(&mut self) {
        if self.session.next_question().is_ok() {
            self.sync_option_cursor();
        }
    }

    pub fn previous_question(&mut self) {
        if self.session.previous_question().is_ok() {
            self.sync_option_cursor();
        }
    }

    fn sync_option_cursor(&mut self) {
        self.option_cursor = self
            .session
            .cursor()
            .and_then(|index| self.session.answer_for(index))
            .unwrap_or(0);
    }

    pub fn submit(&mut self) {
        match self.session.submit() {
            Ok(submission) => self.after_submission(submission),
            Err(err) => self.notices.error(err.to_string()),
        }
    }

    // ── report screen ─────────────────────────────────────────────────────

    pub fn retake(&mut self) {
        match self.session.retake() {
            Ok(()) => {
                self.option_cursor = 0;
                self.report_scroll = 0;
                self.notices.info("Quiz restarted, good luck!");
            }
            Err(err) => self.notices.error(err.to_string()),
        }
    }

    pub fn start_over(&mut self) {
        self.session.start_over();
        self.url_input.clear();
        self.option_cursor = 0;
        self.report_scroll = 0;
    }

    pub fn scroll_report_down(&mut self) {
        let max_scroll = self
            .session
            .report()
            .map_or(0, |report| report.details.len().saturating_sub(1));
        self.report_scroll = (self.report_scroll + 1).min(max_scroll);
    }

    pub fn scroll_report_up(&mut self) {
        self.report_scroll = self.report_scroll.saturating_sub(1);
    }

    // ── async completions ─────────────────────────────────────────────────

    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Tick { attempt } => {
                if let TickOutcome::Expired(submission) = self.session.tick(attempt) {
                    self.after_submission(submission);
                }
            }
            SessionEvent::Generated { request, result } => {
                match self.session.complete_generation(request, result) {
                    Ok(Completion::Applied) => {
                        self.option_cursor = 0;
                        self.notices.success("Quiz generated successfully!");
                    }
                    Ok(Completion::Stale) => {}
                    Err(err) => self
                        .notices
                        .error(format!("Failed to generate quiz. {err}. Please try again.")),
                }
            }
            SessionEvent::Verified { attempt, result } => {
                match self.session.complete_verification(attempt, result) {
                    Ok(Completion::Applied) => self.announce_score(),
                    Ok(Completion::Stale) => {}
                    Err(err) => {
                        self.notices.error(err.to_string());
                        self.announce_score();
                    }
                }
            }
        }
    }

    fn after_submission(&mut self, submission: Submission) {
        self.report_scroll = 0;
        if self.session.submit_reason() == Some(SubmitReason::TimeUp) {
            self.notices.info("Time is up! Your answers were submitted.");
        }

        match submission {
            Submission::Scored { percentage, .. } => {
                self.notices
                    .success(format!("Quiz completed! You scored {percentage}%"));
            }
            Submission::AwaitingVerification { request, .. } => {
                self.notices.info("Checking your answers...");
                self.spawn_verification(request);
            }
        }
    }

    fn announce_score(&mut self) {
        if let Some(percentage) = self.session.report().map(|report| report.percentage) {
            self.notices
                .success(format!("Quiz completed! You scored {percentage}%"));
        }
    }

    fn spawn_verification(&self, request: VerificationRequest) {
        let service = Arc::clone(&self.service);
        let deadline = self.request_timeout;
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = service::verify_with_deadline(
                service.as_ref(),
                &request.quiz,
                &request.answers,
                deadline,
            )
            .await;
            if events
                .send(SessionEvent::Verified {
                    attempt: request.attempt,
                    result,
                })
                .is_err()
            {
                debug!("app closed before verification finished");
            }
        });
    }
}
