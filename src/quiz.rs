//! Two-choice quiz content and the per-game session that scores it.
//!
//! A [`QuizSession`] is owned by whoever runs the game and passed around
//! explicitly; there is no process-wide game state.

use crate::{
    constants::{BASE_POINTS, STREAK_MULTIPLIER_STEP, TIME_BONUS_PER_SEC, TIME_BONUS_WINDOW_SECS},
    reading::{round_to, Selection},
    Error, Result,
};
use log::{debug, info};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

/// A question with one answer on each side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub left_answer: String,
    pub right_answer: String,
    /// `LEFT` or `RIGHT`
    pub correct_side: Selection,
    pub category: String,
}

/// Set of questions a session draws from
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

const BUILTIN_QUESTIONS: &[(&str, &str, &str, Selection, &str)] = &[
    ("Python was created in:", "1991", "2000", Selection::Left, "Programming"),
    ("React is a:", "Database", "UI Library", Selection::Right, "Programming"),
    ("JavaScript runs on:", "Server only", "Browser & Server", Selection::Right, "Programming"),
    ("TypeScript is:", "Compiled to JS", "Runs directly", Selection::Left, "Programming"),
    ("HTTP status 404 means:", "Not Found", "Server Error", Selection::Left, "Web Dev"),
    ("REST API uses:", "HTTP Methods", "Only GET", Selection::Left, "Web Dev"),
    ("CSS is used for:", "Styling", "Logic", Selection::Left, "Web Dev"),
    ("Binary 1010 in decimal:", "10", "5", Selection::Left, "CS Basics"),
    ("GPU stands for:", "General Processing", "Graphics Processing", Selection::Right, "Hardware"),
    ("MongoDB is a:", "SQL Database", "NoSQL Database", Selection::Right, "Databases"),
    ("SQL databases are:", "Relational", "Non-relational", Selection::Left, "Databases"),
    ("Machine Learning uses:", "Data patterns", "Magic", Selection::Left, "AI"),
    ("AI stands for:", "Artificial Intelligence", "Automated Internet", Selection::Left, "AI"),
    ("Git is used for:", "Version Control", "Database Storage", Selection::Left, "DevOps"),
    ("Docker is a:", "Programming Language", "Container Platform", Selection::Right, "DevOps"),
    ("Linux is a:", "OS Kernel", "Programming Language", Selection::Left, "Operating Systems"),
    ("Cloud computing means:", "Weather prediction", "Remote servers", Selection::Right, "Cloud"),
    ("The speed of light is:", "300,000 km/s", "150,000 km/s", Selection::Left, "Science"),
    ("What's the capital of Canada?", "Toronto", "Ottawa", Selection::Right, "Geography"),
    ("Who invented the WWW?", "Tim Berners-Lee", "Bill Gates", Selection::Left, "History"),
    ("GitHub is used for:", "Code hosting", "Video streaming", Selection::Left, "DevOps"),
    ("JSON stands for:", "JavaScript Object Notation", "Java Syntax Object Name", Selection::Left, "Web Dev"),
    ("API stands for:", "Application Programming Interface", "Advanced Program Integration", Selection::Left, "Programming"),
    ("Node.js is built on:", "V8 JavaScript Engine", "Python Runtime", Selection::Left, "Programming"),
    ("RAM stands for:", "Random Access Memory", "Read Always Memory", Selection::Left, "Hardware"),
];

impl QuestionBank {
    /// Build a bank, rejecting empty banks, duplicate ids and neutral answers
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::InvalidInput("Question bank is empty".to_string()));
        }

        let mut ids = HashSet::new();
        for question in &questions {
            if !ids.insert(question.id) {
                return Err(Error::InvalidInput(format!("Duplicate question id {}", question.id)));
            }
            if question.correct_side.is_neutral() {
                return Err(Error::InvalidInput(format!(
                    "Question {} must have LEFT or RIGHT as its correct side",
                    question.id
                )));
            }
        }

        Ok(Self { questions })
    }

    /// General-knowledge bank shipped with the crate
    pub fn builtin() -> Self {
        let questions = BUILTIN_QUESTIONS
            .iter()
            .zip(1..)
            .map(|(&(question, left, right, correct_side, category), id)| Question {
                id,
                question: question.to_string(),
                left_answer: left.to_string(),
                right_answer: right.to_string(),
                correct_side,
                category: category.to_string(),
            })
            .collect();
        Self { questions }
    }

    /// Load a YAML list of questions
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let questions: Vec<Question> = serde_yaml::from_str(content)?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// A question as shown to the player; the correct side is withheld
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub id: u32,
    pub question: String,
    pub left_answer: String,
    pub right_answer: String,
    pub category: String,
    /// 1-based position in this game
    pub question_number: usize,
    pub total_questions: usize,
}

/// Result of asking for the next question
#[derive(Debug, Clone, PartialEq)]
pub enum NextQuestion {
    Question(QuestionView),
    /// Every question has been used
    GameOver(FinalStats),
}

/// Scoring of one submitted answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub points_earned: u32,
    pub streak: u32,
    pub correct_answer: Selection,
    pub time_bonus: u32,
    pub streak_multiplier: f64,
    pub total_score: u32,
}

/// Running statistics of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStats {
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    /// Percentage, 1 decimal
    pub accuracy: f64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub active: bool,
}

/// Statistics reported when a game ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalStats {
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
    pub best_streak: u32,
}

#[derive(Debug, Clone)]
struct CurrentQuestion {
    index: usize,
    shown_at: Instant,
    answered: bool,
}

/// One game: question order, scoring and streaks
#[derive(Debug)]
pub struct QuizSession {
    bank: QuestionBank,
    rng: StdRng,
    active: bool,
    current: Option<CurrentQuestion>,
    used: HashSet<u32>,
    score: u32,
    total_questions: u32,
    correct_answers: u32,
    streak: u32,
    best_streak: u32,
}

impl QuizSession {
    /// Create an inactive session. A seed makes the question order repeatable.
    pub fn new(bank: QuestionBank, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            bank,
            rng,
            active: false,
            current: None,
            used: HashSet::new(),
            score: 0,
            total_questions: 0,
            correct_answers: 0,
            streak: 0,
            best_streak: 0,
        }
    }

    /// Reset all statistics and show the first question
    pub fn start(&mut self, now: Instant) -> Result<QuestionView> {
        self.active = true;
        self.current = None;
        self.used.clear();
        self.score = 0;
        self.total_questions = 0;
        self.correct_answers = 0;
        self.streak = 0;
        self.best_streak = 0;
        info!("Game started with {} questions", self.bank.len());

        match self.draw(now) {
            Some(view) => Ok(view),
            None => Err(Error::Game("Question bank is empty".to_string())),
        }
    }

    /// Move on to an unused question, or finish the game
    pub fn next_question(&mut self, now: Instant) -> Result<NextQuestion> {
        if !self.active {
            return Err(Error::Game("Game not active".to_string()));
        }

        match self.draw(now) {
            Some(view) => Ok(NextQuestion::Question(view)),
            None => {
                self.active = false;
                let stats = self.final_stats();
                info!("Game over: score {} ({}% correct)", stats.score, stats.accuracy);
                Ok(NextQuestion::GameOver(stats))
            }
        }
    }

    /// Score an answer to the current question.
    ///
    /// `response_time` is in seconds; answers inside the first five seconds
    /// earn a time bonus and consecutive correct answers raise a multiplier.
    pub fn submit_answer(&mut self, question_id: u32, side: Selection, response_time: f64) -> Result<AnswerOutcome> {
        if !self.active {
            return Err(Error::Game("No active question".to_string()));
        }
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| Error::Game("No active question".to_string()))?;
        let question = &self.bank.questions[current.index];

        if question.id != question_id {
            return Err(Error::Game(format!(
                "Question ID mismatch: expected {}, got {question_id}",
                question.id
            )));
        }
        if current.answered {
            return Err(Error::Game(format!("Question {question_id} already answered")));
        }
        current.answered = true;

        let correct_answer = question.correct_side;
        let correct = side == correct_answer;
        self.total_questions += 1;

        let outcome = if correct {
            self.correct_answers += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);

            let time_bonus = time_bonus(response_time);
            let multiplier = 1.0 + f64::from(self.streak) * STREAK_MULTIPLIER_STEP;
            let points = (f64::from(BASE_POINTS + time_bonus) * multiplier) as u32;
            self.score += points;

            AnswerOutcome {
                correct,
                points_earned: points,
                streak: self.streak,
                correct_answer,
                time_bonus,
                streak_multiplier: round_to(multiplier, 2),
                total_score: self.score,
            }
        } else {
            self.streak = 0;
            AnswerOutcome {
                correct,
                points_earned: 0,
                streak: 0,
                correct_answer,
                time_bonus: 0,
                streak_multiplier: 1.0,
                total_score: self.score,
            }
        };

        debug!(
            "Answer {} to question {}: {} (+{} pts)",
            side,
            question_id,
            if correct { "correct" } else { "wrong" },
            outcome.points_earned
        );
        Ok(outcome)
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            score: self.score,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            accuracy: self.accuracy(),
            current_streak: self.streak,
            best_streak: self.best_streak,
            active: self.active,
        }
    }

    /// Stop the game and report final statistics
    pub fn end(&mut self) -> FinalStats {
        self.active = false;
        let stats = self.final_stats();
        info!(
            "Game ended: score {}, {} questions, best streak {}",
            stats.score, stats.total_questions, stats.best_streak
        );
        stats
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Id of the question on screen, if any
    pub fn current_question_id(&self) -> Option<u32> {
        self.current.as_ref().map(|c| self.bank.questions[c.index].id)
    }

    /// When the current question was shown
    pub fn question_shown_at(&self) -> Option<Instant> {
        self.current.as_ref().map(|c| c.shown_at)
    }

    pub const fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    fn draw(&mut self, now: Instant) -> Option<QuestionView> {
        let available: Vec<usize> = self
            .bank
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| !self.used.contains(&q.id))
            .map(|(i, _)| i)
            .collect();
        let index = *available.choose(&mut self.rng)?;
        let question = &self.bank.questions[index];

        self.used.insert(question.id);
        self.current = Some(CurrentQuestion {
            index,
            shown_at: now,
            answered: false,
        });

        Some(QuestionView {
            id: question.id,
            question: question.question.clone(),
            left_answer: question.left_answer.clone(),
            right_answer: question.right_answer.clone(),
            category: question.category.clone(),
            question_number: self.used.len(),
            total_questions: self.bank.len(),
        })
    }

    fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        round_to(
            f64::from(self.correct_answers) / f64::from(self.total_questions) * 100.0,
            1,
        )
    }

    fn final_stats(&self) -> FinalStats {
        FinalStats {
            score: self.score,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            accuracy: self.accuracy(),
            best_streak: self.best_streak,
        }
    }
}

/// Bonus points for answering inside the bonus window; 0 after it
fn time_bonus(response_time: f64) -> u32 {
    if response_time.is_nan() {
        return 0;
    }
    let remaining = TIME_BONUS_WINDOW_SECS - response_time.max(0.0);
    (remaining * TIME_BONUS_PER_SEC).max(0.0) as u32
}
