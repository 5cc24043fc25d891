//! Decision-cycle controller tying the tilt pipeline to a quiz session.
//!
//! Every frame is classified into a [`Reading`] and published; the reading
//! then gates game actions. A new question always starts from a freshly
//! reset selector, so a hold built up on one question can never confirm the
//! next one.

use crate::{
    config::Config,
    estimator::TiltEstimator,
    landmarks::PoseFrame,
    posture::{PostureEstimator, PostureReading},
    quiz::{AnswerOutcome, FinalStats, NextQuestion, QuestionView, QuizSession},
    reading::Reading,
    selector::TiltSelector,
    sink::ReadingSink,
    Error, Result,
};
use log::{debug, info};
use std::time::{Duration, Instant};

/// Where the game is in its question cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No game running
    Menu,
    /// A question is on screen waiting for a confirmed answer
    Asking,
    /// An answer result is on screen since the given instant
    ShowingResult { since: Instant },
}

/// Something that happened to the game while handling a frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started(QuestionView),
    Question(QuestionView),
    Answered(AnswerOutcome),
    /// Every question was used
    GameOver(FinalStats),
    /// The player left the game
    Ended(FinalStats),
    Paused,
    Resumed,
    /// A confirm was refused
    Rejected(ConfirmOutcome),
}

/// Result of asking to confirm the current selection
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Submitted(AnswerOutcome),
    /// Head is neutral
    NoSelection,
    /// A side is selected but not held long enough
    NotReady,
    /// Not asking a question, or paused
    Ignored,
}

/// Everything produced by one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub reading: Reading,
    pub posture: PostureReading,
    pub events: Vec<GameEvent>,
    /// The player asked to quit from the menu
    pub quit: bool,
}

/// Owns the estimator, the selector and the quiz session for one player
pub struct QuizController {
    estimator: TiltEstimator,
    posture: PostureEstimator,
    selector: TiltSelector,
    session: QuizSession,
    sink: Box<dyn ReadingSink>,
    phase: Phase,
    paused_at: Option<Instant>,
    game_enabled: bool,
    auto_confirm: bool,
    result_display: Duration,
    last_reading: Reading,
    current_question: Option<QuestionView>,
}

impl QuizController {
    /// Build a controller from a validated configuration
    pub fn new(config: &Config, session: QuizSession, sink: Box<dyn ReadingSink>) -> Self {
        Self {
            estimator: config.create_estimator(),
            posture: config.create_posture_estimator(),
            selector: config.create_selector(),
            session,
            sink,
            phase: Phase::Menu,
            paused_at: None,
            game_enabled: true,
            auto_confirm: config.game.auto_confirm,
            result_display: config.game.result_display(),
            last_reading: Reading::no_signal(),
            current_question: None,
        }
    }

    /// Classify and publish readings only; game keys are ignored
    #[must_use]
    pub fn monitor_only(mut self) -> Self {
        self.game_enabled = false;
        self
    }

    /// Handle one frame: advance timers, classify, publish, then apply the
    /// frame's key press.
    pub fn process_frame(&mut self, frame: &PoseFrame, now: Instant) -> Result<FrameOutcome> {
        let mut events = Vec::new();

        if let Phase::ShowingResult { since } = self.phase {
            if !self.is_paused() && now.saturating_duration_since(since) >= self.result_display {
                events.push(self.advance(now)?);
            }
        }

        let reading = self.classify(frame, now);
        self.last_reading = reading;
        self.sink.submit(&reading, now);
        let posture = self.posture.assess(frame);

        if self.auto_confirm && self.phase == Phase::Asking && !self.is_paused() && reading.ready {
            if let ConfirmOutcome::Submitted(outcome) = self.confirm(now)? {
                events.push(GameEvent::Answered(outcome));
            }
        }

        let mut quit = false;
        if let Some(key) = frame.key {
            quit = self.handle_key(key, now, &mut events)?;
        }

        Ok(FrameOutcome {
            reading,
            posture,
            events,
            quit,
        })
    }

    fn classify(&mut self, frame: &PoseFrame, now: Instant) -> Reading {
        let Some(landmarks) = frame.primary_subject() else {
            return Reading::no_signal();
        };

        match self.estimator.estimate(landmarks) {
            Ok(sample) => self.selector.update(sample.angle, sample.confidence, now),
            Err(e) => {
                debug!("Frame {} treated as no signal: {e}", frame.timestamp_ms);
                Reading::no_signal()
            }
        }
    }

    fn handle_key(&mut self, key: char, now: Instant, events: &mut Vec<GameEvent>) -> Result<bool> {
        if !self.game_enabled {
            return Ok(key == 'q');
        }

        match key {
            's' if self.phase == Phase::Menu => {
                events.push(GameEvent::Started(self.start_game(now)?));
            }
            ' ' => match self.confirm(now)? {
                ConfirmOutcome::Submitted(outcome) => events.push(GameEvent::Answered(outcome)),
                ConfirmOutcome::Ignored => {}
                refused => events.push(GameEvent::Rejected(refused)),
            },
            'p' if self.session.is_active() => {
                events.push(self.toggle_pause(now));
            }
            'e' => {
                if let Some(stats) = self.end_game() {
                    events.push(GameEvent::Ended(stats));
                }
            }
            'q' => {
                if let Some(stats) = self.end_game() {
                    events.push(GameEvent::Ended(stats));
                } else {
                    return Ok(true);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Start a new game and show its first question
    pub fn start_game(&mut self, now: Instant) -> Result<QuestionView> {
        let view = self.session.start(now)?;
        self.clear_selection();
        self.paused_at = None;
        self.phase = Phase::Asking;
        self.current_question = Some(view.clone());
        info!("Q{} | {}: {}", view.question_number, view.category, view.question);
        Ok(view)
    }

    /// Submit the current selection if it is a ready left or right tilt
    pub fn confirm(&mut self, now: Instant) -> Result<ConfirmOutcome> {
        if self.phase != Phase::Asking || self.is_paused() {
            return Ok(ConfirmOutcome::Ignored);
        }

        let Some(selection) = self.last_reading.confirmed_side() else {
            return Ok(if self.last_reading.selection.is_neutral() {
                ConfirmOutcome::NoSelection
            } else {
                ConfirmOutcome::NotReady
            });
        };

        let question_id = self
            .session
            .current_question_id()
            .ok_or_else(|| Error::Game("No active question".to_string()))?;
        let response_time = self
            .session
            .question_shown_at()
            .map_or(0.0, |shown| now.saturating_duration_since(shown).as_secs_f64());

        let outcome = self.session.submit_answer(question_id, selection, response_time)?;
        info!(
            "{} -> {} (+{} pts, total {})",
            selection,
            if outcome.correct { "correct" } else { "wrong" },
            outcome.points_earned,
            outcome.total_score
        );
        self.phase = Phase::ShowingResult { since: now };
        Ok(ConfirmOutcome::Submitted(outcome))
    }

    /// Fetch the next decision context
    fn advance(&mut self, now: Instant) -> Result<GameEvent> {
        self.clear_selection();
        match self.session.next_question(now)? {
            NextQuestion::Question(view) => {
                info!("Q{} | {}: {}", view.question_number, view.category, view.question);
                self.phase = Phase::Asking;
                self.current_question = Some(view.clone());
                Ok(GameEvent::Question(view))
            }
            NextQuestion::GameOver(stats) => {
                self.phase = Phase::Menu;
                self.current_question = None;
                Ok(GameEvent::GameOver(stats))
            }
        }
    }

    /// Leave the running game; `None` when no game is running
    pub fn end_game(&mut self) -> Option<FinalStats> {
        if !self.session.is_active() {
            return None;
        }
        let stats = self.session.end();
        self.clear_selection();
        self.phase = Phase::Menu;
        self.paused_at = None;
        self.current_question = None;
        Some(stats)
    }

    /// Pause, or resume and push the result timer forward by the pause length
    fn toggle_pause(&mut self, now: Instant) -> GameEvent {
        match self.paused_at.take() {
            Some(paused_at) => {
                if let Phase::ShowingResult { since } = self.phase {
                    self.phase = Phase::ShowingResult {
                        since: since + now.saturating_duration_since(paused_at),
                    };
                }
                info!("Resumed");
                GameEvent::Resumed
            }
            None => {
                self.paused_at = Some(now);
                info!("Paused");
                GameEvent::Paused
            }
        }
    }

    /// Forget the selection so nothing built up before can be confirmed
    fn clear_selection(&mut self) {
        self.selector.reset();
        self.last_reading = Reading::no_signal();
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub const fn last_reading(&self) -> &Reading {
        &self.last_reading
    }

    pub const fn selector(&self) -> &TiltSelector {
        &self.selector
    }

    pub const fn session(&self) -> &QuizSession {
        &self.session
    }

    pub const fn current_question(&self) -> Option<&QuestionView> {
        self.current_question.as_ref()
    }
}
