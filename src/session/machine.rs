use std::mem;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{GenerationError, ScoringError, SessionError};
use crate::models::{Answers, Question, Quiz, ScoreReport};
use crate::scoring;
use crate::validate::VideoUrl;

use super::timer::Countdown;
use super::{AttemptId, Phase, RequestId, ScoringMode, SessionEvent, SessionSettings};

/// A generation request the owner should dispatch to the quiz service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub id: RequestId,
    pub video: VideoUrl,
}

/// A finished attempt the owner should send to the verification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub attempt: AttemptId,
    pub quiz: Quiz,
    pub answers: Answers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    Manual,
    TimeUp,
}

/// Result of leaving the Active phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The report is ready.
    Scored { reason: SubmitReason, percentage: u8 },
    /// The report will arrive through [`QuizSession::complete_verification`].
    AwaitingVerification {
        reason: SubmitReason,
        request: VerificationRequest,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to an attempt that is no longer running.
    Ignored,
    Running { remaining: u32 },
    /// The countdown hit zero and the attempt was submitted.
    Expired(Submission),
}

/// Whether a late completion still applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

struct ActiveState {
    attempt: AttemptId,
    quiz: Quiz,
    answers: Answers,
    cursor: usize,
    remaining: u32,
    countdown: Countdown,
}

struct ReportState {
    attempt: AttemptId,
    quiz: Quiz,
    answers: Answers,
    reason: SubmitReason,
    /// `None` while remote verification is in flight.
    report: Option<ScoreReport>,
}

enum State {
    Input { pending: Option<RequestId> },
    Active(ActiveState),
    Report(ReportState),
}

impl State {
    fn idle() -> Self {
        State::Input { pending: None }
    }
}

/// State of one user's quiz-taking, from link entry to report.
pub struct QuizSession {
    id: Uuid,
    settings: SessionSettings,
    state: State,
    events: UnboundedSender<SessionEvent>,
    next_id: u64,
}

impl QuizSession {
    /// Creates a session in the Input phase. Countdown ticks are sent to
    /// `events`; entering the Active phase requires a tokio runtime.
    pub fn new(settings: SessionSettings, events: UnboundedSender<SessionEvent>) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, ?settings, "session created");

        Self {
            id,
            settings,
            state: State::idle(),
            events,
            next_id: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Input { .. } => Phase::Input,
            State::Active(_) => Phase::Active,
            State::Report(_) => Phase::Report,
        }
    }

    /// True while a generation request is outstanding.
    pub fn is_generating(&self) -> bool {
        matches!(self.state, State::Input { pending: Some(_) })
    }

    /// True while the report waits for the verification service.
    pub fn is_verifying(&self) -> bool {
        matches!(&self.state, State::Report(report) if report.report.is_none())
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        match &self.state {
            State::Input { .. } => None,
            State::Active(active) => Some(&active.quiz),
            State::Report(report) => Some(&report.quiz),
        }
    }

    pub fn answers(&self) -> Option<&Answers> {
        match &self.state {
            State::Input { .. } => None,
            State::Active(active) => Some(&active.answers),
            State::Report(report) => Some(&report.answers),
        }
    }

    /// The option chosen for the question at `index`, if any.
    pub fn answer_for(&self, index: usize) -> Option<usize> {
        let question = self.quiz()?.question(index)?;
        self.answers()?.get(&question.id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers().map_or(0, |answers| answers.len())
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        match &self.state {
            State::Active(active) => Some(active.remaining),
            _ => None,
        }
    }

    /// Index of the question being shown in the Active phase.
    pub fn cursor(&self) -> Option<usize> {
        match &self.state {
            State::Active(active) => Some(active.cursor),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            State::Active(active) => active.quiz.question(active.cursor),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&ScoreReport> {
        match &self.state {
            State::Report(report) => report.report.as_ref(),
            _ => None,
        }
    }

    pub fn submit_reason(&self) -> Option<SubmitReason> {
        match &self.state {
            State::Report(report) => Some(report.reason),
            _ => None,
        }
    }

    /// Validates `raw` and marks a generation request as pending.
    pub fn request_generation(&mut self, raw: &str) -> Result<GenerationRequest, SessionError> {
        let State::Input { pending } = &self.state else {
            return Err(self.wrong_phase(Phase::Input));
        };
        if pending.is_some() {
            return Err(SessionError::GenerationPending);
        }

        let video = VideoUrl::parse(raw)?;
        let id = RequestId(self.allocate_id());
        self.state = State::Input { pending: Some(id) };

        info!(session = %self.id, request = id.0, %video, "quiz generation requested");
        Ok(GenerationRequest { id, video })
    }

    /// Applies the outcome of a generation request.
    ///
    /// On success the session enters the Active phase with empty answers and a
    /// fresh countdown. A failure leaves it in the Input phase and is handed
    /// back for the user to see. Results for a request that is no longer
    /// pending are dropped.
    pub fn complete_generation(
        &mut self,
        request: RequestId,
        result: Result<Quiz, GenerationError>,
    ) -> Result<Completion, GenerationError> {
        match self.state {
            State::Input { pending: Some(id) } if id == request => {}
            _ => {
                debug!(session = %self.id, request = request.0, "ignoring stale generation result");
                return Ok(Completion::Stale);
            }
        }

        self.state = State::idle();
        match result {
            Ok(quiz) => {
                info!(session = %self.id, questions = quiz.len(), "quiz ready");
                self.enter_active(quiz);
                Ok(Completion::Applied)
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "quiz generation failed");
                Err(err)
            }
        }
    }

    /// Records `option` as the answer to the question at `question_index`,
    /// replacing any earlier choice.
    pub fn select_answer(&mut self, question_index: usize, option: usize) -> Result<(), SessionError> {
        let active = self.active_mut()?;
        let len = active.quiz.len();
        let question = active
            .quiz
            .question(question_index)
            .ok_or(SessionError::QuestionOutOfRange {
                index: question_index,
                len,
            })?;

        if option >= question.options.len() {
            return Err(SessionError::OptionOutOfRange {
                question: question_index,
                index: option,
                len: question.options.len(),
            });
        }

        let id = question.id;
        active.answers.insert(id, option);
        Ok(())
    }

    pub fn next_question(&mut self) -> Result<usize, SessionError> {
        let cursor = self.cursor().unwrap_or_default();
        self.go_to_question(cursor.saturating_add(1))
    }

    pub fn previous_question(&mut self) -> Result<usize, SessionError> {
        let cursor = self.cursor().unwrap_or_default();
        self.go_to_question(cursor.saturating_sub(1))
    }

    /// Moves the question cursor, clamped to the quiz.
    pub fn go_to_question(&mut self, index: usize) -> Result<usize, SessionError> {
        let active = self.active_mut()?;
        active.cursor = index.min(active.quiz.len() - 1);
        Ok(active.cursor)
    }

    /// Manual submission; every question must have an answer.
    pub fn submit(&mut self) -> Result<Submission, SessionError> {
        let active = self.active_mut()?;
        let remaining = active.quiz.len().saturating_sub(active.answers.len());
        if remaining > 0 {
            return Err(SessionError::Unanswered { remaining });
        }

        match self.take_active() {
            Some(active) => Ok(self.finish(active, SubmitReason::Manual)),
            None => Err(self.wrong_phase(Phase::Active)),
        }
    }

    /// Applies one countdown tick. The tick that brings the countdown to zero
    /// submits the attempt with whatever answers it holds.
    pub fn tick(&mut self, attempt: AttemptId) -> TickOutcome {
        let State::Active(active) = &mut self.state else {
            return TickOutcome::Ignored;
        };
        if active.attempt != attempt {
            return TickOutcome::Ignored;
        }

        active.remaining = active.remaining.saturating_sub(1);
        if active.remaining > 0 {
            return TickOutcome::Running {
                remaining: active.remaining,
            };
        }

        info!(session = %self.id, answered = active.answers.len(), "time is up");
        match self.take_active() {
            Some(active) => TickOutcome::Expired(self.finish(active, SubmitReason::TimeUp)),
            None => TickOutcome::Ignored,
        }
    }

    /// Applies the verification service's answer for a submitted attempt.
    ///
    /// On failure the local score becomes the report and the error is handed
    /// back for the user to see. Either way the report is set exactly once.
    pub fn complete_verification(
        &mut self,
        attempt: AttemptId,
        result: Result<ScoreReport, ScoringError>,
    ) -> Result<Completion, ScoringError> {
        let session = self.id;
        let State::Report(state) = &mut self.state else {
            return Ok(Completion::Stale);
        };
        if state.attempt != attempt || state.report.is_some() {
            debug!(session = %session, "ignoring stale verification result");
            return Ok(Completion::Stale);
        }

        match result {
            Ok(report) => {
                info!(session = %session, percentage = report.percentage, "remote score received");
                state.report = Some(report);
                Ok(Completion::Applied)
            }
            Err(err) => {
                warn!(session = %session, error = %err, "verification failed, scoring locally");
                state.report = Some(scoring::score(state.quiz.questions(), &state.answers));
                Err(err)
            }
        }
    }

    /// Restarts the same quiz with no answers and a full countdown.
    pub fn retake(&mut self) -> Result<(), SessionError> {
        match mem::replace(&mut self.state, State::idle()) {
            State::Report(report) => {
                info!(session = %self.id, "retaking quiz");
                self.enter_active(report.quiz);
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.wrong_phase(Phase::Report))
            }
        }
    }

    /// Drops the quiz and returns to link entry. A pending generation request
    /// is abandoned and its result will be ignored.
    pub fn start_over(&mut self) {
        info!(session = %self.id, from = %self.phase(), "starting over");
        self.state = State::idle();
    }

    fn enter_active(&mut self, quiz: Quiz) {
        let attempt = AttemptId(self.allocate_id());
        let remaining = self.settings.duration_secs;
        let countdown = Countdown::start(attempt, remaining, self.events.clone());

        self.state = State::Active(ActiveState {
            attempt,
            quiz,
            answers: Answers::new(),
            cursor: 0,
            remaining,
            countdown,
        });
    }

    /// Moves the Active state out, leaving the session in Input until the
    /// caller installs the next state.
    fn take_active(&mut self) -> Option<ActiveState> {
        match mem::replace(&mut self.state, State::idle()) {
            State::Active(active) => Some(active),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Scores (or queues verification of) a taken Active state and enters
    /// the Report phase. Dropping the countdown here stops its ticks.
    fn finish(&mut self, active: ActiveState, reason: SubmitReason) -> Submission {
        let ActiveState {
            attempt,
            quiz,
            answers,
            countdown,
            ..
        } = active;
        drop(countdown);

        let (report, submission) = match self.settings.scoring {
            ScoringMode::Local => {
                let report = scoring::score(quiz.questions(), &answers);
                let submission = Submission::Scored {
                    reason,
                    percentage: report.percentage,
                };
                (Some(report), submission)
            }
            ScoringMode::Remote => {
                let request = VerificationRequest {
                    attempt,
                    quiz: quiz.clone(),
                    answers: answers.clone(),
                };
                (None, Submission::AwaitingVerification { reason, request })
            }
        };

        info!(session = %self.id, ?reason, scoring = ?self.settings.scoring, "quiz submitted");
        self.state = State::Report(ReportState {
            attempt,
            quiz,
            answers,
            reason,
            report,
        });
        submission
    }

    fn active_mut(&mut self) -> Result<&mut ActiveState, SessionError> {
        let actual = self.phase();
        match &mut self.state {
            State::Active(active) => Ok(active),
            _ => Err(SessionError::WrongPhase {
                expected: Phase::Active,
                actual,
            }),
        }
    }

    fn wrong_phase(&self, expected: Phase) -> SessionError {
        SessionError::WrongPhase {
            expected,
            actual: self.phase(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}
