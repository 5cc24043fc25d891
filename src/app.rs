//! Main application module: replays a stream of pose frames through the
//! quiz controller.
//!
//! Frames arrive as JSON lines (one [`PoseFrame`] per line) from a file or
//! stdin. Each frame's `timestamp_ms` is mapped onto a monotonic clock so a
//! recorded session replays with its original timing.

use crate::{
    config::Config,
    controller::{GameEvent, QuizController},
    landmarks::PoseFrame,
    posture::PostureKind,
    quiz::{FinalStats, QuizSession},
    sink::{JsonLinesSink, ReadingSink, Throttled},
    Error, Result,
};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where pose frames are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSource {
    /// JSON-lines file
    File(PathBuf),
    /// JSON lines on standard input
    Stdin,
}

/// What the application does with readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Play the quiz, keys drive the game
    #[default]
    Quiz,
    /// Only classify and emit readings
    Monitor,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Frame input
    pub source: FrameSource,
    /// Quiz or monitor
    pub mode: RunMode,
    /// Validated settings
    pub settings: Config,
}

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Frames parsed and classified
    pub frames_processed: u64,
    /// Lines that could not be parsed
    pub frames_skipped: u64,
    /// Frames with nobody in view
    pub frames_without_subject: u64,
    /// Frames scored as bad posture
    pub frames_posture_bad: u64,
    /// Answers submitted
    pub answers: u64,
    /// Stats of the last finished game
    pub final_stats: Option<FinalStats>,
    /// The input asked to quit before it ran out
    pub quit_requested: bool,
}

/// Main application struct
pub struct TiltApp {
    config: AppConfig,
    controller: QuizController,
}

impl TiltApp {
    /// Create an application that writes throttled readings to stdout
    pub fn new(config: AppConfig) -> Result<Self> {
        let interval = config.settings.transmit.interval();
        let sink = Throttled::new(JsonLinesSink::new(io::stdout()), interval);
        Self::with_sink(config, Box::new(sink))
    }

    /// Create an application publishing readings to `sink`
    pub fn with_sink(config: AppConfig, sink: Box<dyn ReadingSink>) -> Result<Self> {
        info!("Initializing head tilt quiz ({:?} mode)", config.mode);
        config.settings.validate()?;

        let bank = config.settings.create_question_bank()?;
        info!("Loaded {} questions", bank.len());
        let session = QuizSession::new(bank, config.settings.game.seed);

        let mut controller = QuizController::new(&config.settings, session, sink);
        if config.mode == RunMode::Monitor {
            controller = controller.monitor_only();
        }

        Ok(Self { config, controller })
    }

    /// Run until the frame source is exhausted or a quit key arrives
    pub fn run(&mut self) -> Result<RunSummary> {
        match self.config.source.clone() {
            FrameSource::File(path) => {
                info!("Reading frames from {}", path.display());
                let file = File::open(&path).map_err(|e| {
                    Error::Capture(format!("Failed to open frame source {}: {e}", path.display()))
                })?;
                self.run_from_reader(BufReader::new(file))
            }
            FrameSource::Stdin => {
                info!("Reading frames from stdin");
                self.run_from_reader(io::stdin().lock())
            }
        }
    }

    /// Run the main loop over any line-oriented frame source
    pub fn run_from_reader<R: BufRead>(&mut self, reader: R) -> Result<RunSummary> {
        let max_failures = self.config.settings.capture.max_consecutive_failures;
        let mut summary = RunSummary::default();
        let mut consecutive_failures = 0u32;
        let mut clock: Option<(Instant, u64)> = None;
        let mut last_posture = PostureKind::NoPerson;

        for (line_no, line) in reader.lines().enumerate() {
            let frame = match line.map_err(Error::from).and_then(|l| parse_line(&l)) {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(e) => {
                    summary.frames_skipped += 1;
                    consecutive_failures += 1;
                    warn!("Skipping frame on line {}: {e}", line_no + 1);
                    if consecutive_failures > max_failures {
                        return Err(Error::Capture(format!(
                            "{consecutive_failures} consecutive unreadable frames, giving up"
                        )));
                    }
                    continue;
                }
            };
            consecutive_failures = 0;

            let (base, first_ms) = *clock.get_or_insert_with(|| (Instant::now(), frame.timestamp_ms));
            let now = base + Duration::from_millis(frame.timestamp_ms.saturating_sub(first_ms));

            if !frame.has_subject() {
                summary.frames_without_subject += 1;
            }

            let outcome = self.controller.process_frame(&frame, now)?;
            summary.frames_processed += 1;

            if outcome.posture.is_bad() {
                summary.frames_posture_bad += 1;
            }
            if outcome.posture.kind != last_posture {
                debug!(
                    "Posture {} -> {} (severity {})",
                    last_posture, outcome.posture.kind, outcome.posture.severity
                );
                last_posture = outcome.posture.kind;
            }

            for event in outcome.events {
                self.record(event, &mut summary);
            }

            if outcome.quit {
                info!("Exit requested by user");
                summary.quit_requested = true;
                break;
            }
        }

        if let Some(stats) = self.controller.end_game() {
            info!("Input ended during a game");
            summary.final_stats = Some(stats);
        }

        info!(
            "Processed {} frames ({} skipped, {} without subject, {} bad posture), {} answers",
            summary.frames_processed,
            summary.frames_skipped,
            summary.frames_without_subject,
            summary.frames_posture_bad,
            summary.answers
        );
        if let Some(stats) = &summary.final_stats {
            info!(
                "Final score {} | {}/{} correct ({:.1}%) | best streak {}",
                stats.score, stats.correct_answers, stats.total_questions, stats.accuracy, stats.best_streak
            );
        }

        Ok(summary)
    }

    fn record(&mut self, event: GameEvent, summary: &mut RunSummary) {
        match event {
            GameEvent::Answered(_) => summary.answers += 1,
            GameEvent::GameOver(stats) => {
                info!("Game over");
                summary.final_stats = Some(stats);
            }
            GameEvent::Ended(stats) => {
                info!("Game ended");
                summary.final_stats = Some(stats);
            }
            GameEvent::Rejected(outcome) => debug!("Confirm refused: {outcome:?}"),
            GameEvent::Started(_) | GameEvent::Question(_) | GameEvent::Paused | GameEvent::Resumed => {}
        }
    }

    pub const fn controller(&self) -> &QuizController {
        &self.controller
    }
}

/// Parse one input line; blank lines yield `None`
fn parse_line(line: &str) -> Result<Option<PoseFrame>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    PoseFrame::from_json_line(trimmed).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::LatestReading;
    use std::io::Cursor;

    fn app(max_failures: u32) -> TiltApp {
        let mut settings = Config::default();
        settings.capture.max_consecutive_failures = max_failures;
        let config = AppConfig {
            source: FrameSource::Stdin,
            mode: RunMode::Quiz,
            settings,
        };
        TiltApp::with_sink(config, Box::new(LatestReading::new())).unwrap()
    }

    #[test]
    fn test_parse_line_blank() {
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("{\"timestamp_ms\": 5}").unwrap().is_some());
        assert!(parse_line("not json").is_err());
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let input = "garbage\n{\"timestamp_ms\": 0}\n\n{\"timestamp_ms\": 33}\n";
        let summary = app(3).run_from_reader(Cursor::new(input)).unwrap();
        assert_eq!(summary.frames_skipped, 1);
        assert_eq!(summary.frames_processed, 2);
        assert_eq!(summary.frames_without_subject, 2);
    }

    #[test]
    fn test_failures_up_to_limit_are_tolerated() {
        let input = "bad\nbad\nbad\n{\"timestamp_ms\": 0}\n";
        let summary = app(3).run_from_reader(Cursor::new(input)).unwrap();
        assert_eq!(summary.frames_skipped, 3);
        assert_eq!(summary.frames_processed, 1);
    }

    #[test]
    fn test_too_many_consecutive_failures_abort() {
        let input = "bad\nbad\nbad\nbad\n{\"timestamp_ms\": 0}\n";
        let result = app(3).run_from_reader(Cursor::new(input));
        assert!(matches!(result, Err(Error::Capture(_))));
    }

    #[test]
    fn test_failure_count_resets_after_good_frame() {
        let input = "bad\nbad\n{\"timestamp_ms\": 0}\nbad\nbad\n";
        let summary = app(3).run_from_reader(Cursor::new(input)).unwrap();
        assert_eq!(summary.frames_skipped, 4);
    }

    #[test]
    fn test_missing_file_is_capture_error() {
        let config = AppConfig {
            source: FrameSource::File(PathBuf::from("/nonexistent/frames.jsonl")),
            mode: RunMode::Monitor,
            settings: Config::default(),
        };
        let mut app = TiltApp::with_sink(config, Box::new(LatestReading::new())).unwrap();
        assert!(matches!(app.run(), Err(Error::Capture(_))));
    }
}
