//! Quiz sessions over a word list
//!
//! A quiz borrows its list and keeps its own record of which connections are
//! still unasked, so the list itself is never modified by quizzing. Every
//! connection is offered exactly once per pass; after that `next_prompt`
//! returns `None` until `reset_quiz` is called.
//!
//! Answers are checked against the whole list, not only the connection that
//! produced the prompt: if "hello" is stored with both "hallo" and "servus",
//! either one is accepted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::error::{QuizError, Result};
use crate::fuzzy::{self, NearMiss, DEFAULT_NEAR_MISS_THRESHOLD};
use crate::language_pair::is_storable;
use crate::quiz_list::{QuizList, QuizSource};
use crate::settings::Settings;

/// Which side of a connection is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Show `word1`, expect `word2`
    #[default]
    Standard,
    /// Show `word2`, expect `word1`
    Reverse,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Standard => Direction::Reverse,
            Direction::Reverse => Direction::Standard,
        }
    }

    pub(crate) fn prompt_side(self, conn: &Connection) -> &str {
        match self {
            Direction::Standard => conn.word1(),
            Direction::Reverse => conn.word2(),
        }
    }

    pub(crate) fn answer_side(self, conn: &Connection) -> &str {
        match self {
            Direction::Standard => conn.word2(),
            Direction::Reverse => conn.word1(),
        }
    }
}

/// How the next connection is picked from those not yet asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Walk the list in its current order
    #[default]
    Sequential,
    /// Uniform draw without replacement
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// Connections remain to be asked in this pass
    InProgress,
    /// Every connection has been asked
    Exhausted,
}

/// Passed to an [`AnswerObserver`] after each scored answer.
#[derive(Debug, Clone, Copy)]
pub struct AnswerEvent<'e> {
    pub connection: &'e Connection,
    pub direction: Direction,
    pub prompt: &'e str,
    pub answer: &'e str,
    pub expected: &'e str,
    pub correct: bool,
}

/// Hook run whenever a quiz scores an answer.
pub trait AnswerObserver {
    fn on_answered(&mut self, event: &AnswerEvent<'_>);
}

/// Operations shared by every quiz style.
pub trait Quiz {
    /// The next word to translate, or `None` once every connection was asked.
    fn next_prompt(&mut self) -> Option<String>;

    /// The stored translation of the outstanding prompt.
    fn correct_answer(&self) -> Result<&str>;

    /// Scores `answer` for the outstanding prompt.
    fn check_answer(&mut self, answer: &str) -> Result<bool>;

    /// Starts a new pass over the whole list and zeroes the score.
    fn reset_quiz(&mut self);

    fn num_right(&self) -> u32;

    fn num_wrong(&self) -> u32;

    fn state(&self) -> QuizState;
}

#[derive(Debug, Clone, Copy)]
struct IssuedPrompt {
    index: usize,
    direction: Direction,
    answered: bool,
}

/// Free-text quiz: show a word, type its translation.
pub struct FillInVocabQuiz<'a, S: QuizSource + ?Sized = QuizList> {
    list: &'a S,
    direction: Direction,
    case_sensitive: bool,
    selection: SelectionPolicy,
    near_miss_threshold: f64,
    num_right: u32,
    num_wrong: u32,
    /// Indices not yet asked; the next sequential pick is at the end
    remaining: Vec<usize>,
    current: Option<IssuedPrompt>,
    rng: StdRng,
    observer: Option<&'a mut dyn AnswerObserver>,
}

impl<'a, S: QuizSource + ?Sized> FillInVocabQuiz<'a, S> {
    pub fn new(list: &'a S) -> Self {
        let mut quiz = FillInVocabQuiz {
            list,
            direction: Direction::Standard,
            case_sensitive: false,
            selection: SelectionPolicy::Sequential,
            near_miss_threshold: DEFAULT_NEAR_MISS_THRESHOLD,
            num_right: 0,
            num_wrong: 0,
            remaining: Vec::new(),
            current: None,
            rng: StdRng::from_entropy(),
            observer: None,
        };
        quiz.reset_quiz();
        quiz
    }

    pub fn with_settings(list: &'a S, settings: &Settings) -> Self {
        let mut quiz = Self::new(list);
        quiz.direction = settings.direction;
        quiz.case_sensitive = settings.case_sensitive;
        quiz.selection = settings.selection;
        quiz.near_miss_threshold = settings.near_miss_threshold;
        quiz
    }

    /// Fixes the random sequence, for reproducible sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn list(&self) -> &'a S {
        self.list
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Applies from the next prompt; progress is kept.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    pub fn selection(&self) -> SelectionPolicy {
        self.selection
    }

    pub fn set_selection(&mut self, selection: SelectionPolicy) {
        self.selection = selection;
    }

    pub fn set_observer(&mut self, observer: &'a mut dyn AnswerObserver) {
        self.observer = Some(observer);
    }

    /// Connections not yet asked in this pass.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// The connection behind the outstanding prompt.
    pub fn current_connection(&self) -> Option<&'a Connection> {
        let list = self.list;
        self.current.map(|issued| &list.connections()[issued.index])
    }

    fn issued(&self) -> Result<(IssuedPrompt, &'a Connection)> {
        let list = self.list;
        let issued = self.current.ok_or(QuizError::NoPromptIssued)?;
        Ok((issued, &list.connections()[issued.index]))
    }

    fn draw_index(&mut self) -> Option<usize> {
        if self.remaining.is_empty() {
            return None;
        }
        match self.selection {
            SelectionPolicy::Sequential => self.remaining.pop(),
            SelectionPolicy::Random => {
                let pick = self.rng.gen_range(0..self.remaining.len());
                Some(self.remaining.remove(pick))
            }
        }
    }

    /// Whether `answer` is an accepted translation of the outstanding prompt.
    /// Does not change the score.
    pub fn is_correct_answer(&self, answer: &str) -> Result<bool> {
        let (issued, conn) = self.issued()?;
        let (lang1, lang2) = self.list.languages();
        let prompt = issued.direction.prompt_side(conn);

        // No stored word is empty or holds a tab or line break
        if !is_storable(answer) {
            return Ok(false);
        }

        let probe = match issued.direction {
            Direction::Standard => Connection::new(lang1, lang2, prompt, answer)?,
            Direction::Reverse => Connection::new(lang1, lang2, answer, prompt)?,
        };

        Ok(self.list.contains(&probe, self.case_sensitive))
    }

    /// Every translation the list accepts for the outstanding prompt,
    /// without duplicates, in list order.
    pub fn accepted_answers(&self) -> Result<Vec<&'a str>> {
        let (issued, conn) = self.issued()?;
        let prompt = issued.direction.prompt_side(conn);
        let list = self.list;

        let mut answers: Vec<&'a str> = Vec::new();
        for candidate in list.connections() {
            if !self.same_word(issued.direction.prompt_side(candidate), prompt) {
                continue;
            }
            let answer = issued.direction.answer_side(candidate);
            if !answers.iter().any(|a| self.same_word(a, answer)) {
                answers.push(answer);
            }
        }
        Ok(answers)
    }

    /// The accepted answer closest to a wrong `answer`, when it is close
    /// enough to count as a near miss.
    pub fn near_miss(&self, answer: &str) -> Result<Option<NearMiss>> {
        let accepted = self.accepted_answers()?;
        Ok(fuzzy::closest_match(
            answer,
            accepted,
            self.case_sensitive,
            self.near_miss_threshold,
        ))
    }

    fn same_word(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }
}

impl<'a, S: QuizSource + ?Sized> Quiz for FillInVocabQuiz<'a, S> {
    fn next_prompt(&mut self) -> Option<String> {
        let index = match self.draw_index() {
            Some(index) => index,
            None => {
                self.current = None;
                return None;
            }
        };

        self.current = Some(IssuedPrompt {
            index,
            direction: self.direction,
            answered: false,
        });

        let conn = &self.list.connections()[index];
        Some(self.direction.prompt_side(conn).to_string())
    }

    fn correct_answer(&self) -> Result<&str> {
        let (issued, conn) = self.issued()?;
        Ok(issued.direction.answer_side(conn))
    }

    fn check_answer(&mut self, answer: &str) -> Result<bool> {
        let (issued, conn) = self.issued()?;
        if issued.answered {
            return Err(QuizError::PromptAlreadyAnswered);
        }

        let correct = self.is_correct_answer(answer)?;
        if correct {
            self.num_right += 1;
        } else {
            self.num_wrong += 1;
        }
        self.current = Some(IssuedPrompt {
            answered: true,
            ..issued
        });

        if let Some(observer) = self.observer.as_mut() {
            observer.on_answered(&AnswerEvent {
                connection: conn,
                direction: issued.direction,
                prompt: issued.direction.prompt_side(conn),
                answer,
                expected: issued.direction.answer_side(conn),
                correct,
            });
        }

        Ok(correct)
    }

    fn reset_quiz(&mut self) {
        self.remaining = (0..self.list.connections().len()).rev().collect();
        self.current = None;
        self.num_right = 0;
        self.num_wrong = 0;
    }

    fn num_right(&self) -> u32 {
        self.num_right
    }

    fn num_wrong(&self) -> u32 {
        self.num_wrong
    }

    fn state(&self) -> QuizState {
        if self.remaining.is_empty() {
            QuizState::Exhausted
        } else {
            QuizState::InProgress
        }
    }
}
