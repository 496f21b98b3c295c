//! Multiple-choice vocabulary quiz
//!
//! Wraps a [`FillInVocabQuiz`] and, for every prompt, offers the stored
//! translation together with distractors taken from the rest of the list.
//! Scoring goes through the same synonym-tolerant check as the free-text quiz.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{QuizError, Result};
use crate::quiz::{AnswerObserver, FillInVocabQuiz, Quiz, QuizState};
use crate::quiz_list::{QuizList, QuizSource};
use crate::settings::Settings;

/// Options shown per prompt, the correct one included
pub const MAX_OPTIONS: usize = 4;

pub struct MultipleChoiceVocabQuiz<'a, S: QuizSource + ?Sized = QuizList> {
    inner: FillInVocabQuiz<'a, S>,
    options: Vec<String>,
    correct_index: Option<usize>,
    rng: StdRng,
}

impl<'a, S: QuizSource + ?Sized> MultipleChoiceVocabQuiz<'a, S> {
    pub fn new(list: &'a S) -> Self {
        Self::from_quiz(FillInVocabQuiz::new(list))
    }

    pub fn with_settings(list: &'a S, settings: &Settings) -> Self {
        Self::from_quiz(FillInVocabQuiz::with_settings(list, settings))
    }

    pub fn from_quiz(inner: FillInVocabQuiz<'a, S>) -> Self {
        MultipleChoiceVocabQuiz {
            inner,
            options: Vec::new(),
            correct_index: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixes both the prompt order and the option shuffle.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.inner = self.inner.with_seed(seed);
        self.rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        self
    }

    /// The underlying free-text quiz, for direction and case settings.
    pub fn quiz(&self) -> &FillInVocabQuiz<'a, S> {
        &self.inner
    }

    pub fn quiz_mut(&mut self) -> &mut FillInVocabQuiz<'a, S> {
        &mut self.inner
    }

    pub fn set_observer(&mut self, observer: &'a mut dyn AnswerObserver) {
        self.inner.set_observer(observer);
    }

    /// Choices for the outstanding prompt; empty when none is outstanding.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.correct_index
    }

    /// Scores the option at `index`.
    pub fn check_choice(&mut self, index: usize) -> Result<bool> {
        let choice = self
            .options
            .get(index)
            .cloned()
            .ok_or(QuizError::InvalidChoice(index))?;
        self.inner.check_answer(&choice)
    }

    fn build_options(&mut self) -> Result<()> {
        let correct = self.inner.correct_answer()?.to_string();
        let accepted = self.inner.accepted_answers()?;
        let case_sensitive = self.inner.is_case_sensitive();
        let same = |a: &str, b: &str| {
            if case_sensitive {
                a == b
            } else {
                a.to_lowercase() == b.to_lowercase()
            }
        };

        let direction = self.inner.direction();
        let mut distractors: Vec<String> = Vec::new();
        for conn in self.inner.list().connections() {
            let candidate = direction.answer_side(conn);
            if accepted.iter().any(|a| same(a, candidate)) {
                continue;
            }
            if distractors.iter().any(|d| same(d, candidate)) {
                continue;
            }
            distractors.push(candidate.to_string());
        }

        distractors.shuffle(&mut self.rng);
        distractors.truncate(MAX_OPTIONS - 1);

        let correct_index = self.rng.gen_range(0..=distractors.len());
        let mut options = distractors;
        options.insert(correct_index, correct);

        self.options = options;
        self.correct_index = Some(correct_index);
        Ok(())
    }

    fn clear_options(&mut self) {
        self.options.clear();
        self.correct_index = None;
    }
}

impl<'a, S: QuizSource + ?Sized> Quiz for MultipleChoiceVocabQuiz<'a, S> {
    fn next_prompt(&mut self) -> Option<String> {
        self.clear_options();
        let prompt = self.inner.next_prompt()?;
        if let Err(err) = self.build_options() {
            log::warn!("Could not build options for '{}': {}", prompt, err);
        }
        Some(prompt)
    }

    fn correct_answer(&self) -> Result<&str> {
        self.inner.correct_answer()
    }

    /// A typed answer is scored like in the free-text quiz.
    fn check_answer(&mut self, answer: &str) -> Result<bool> {
        self.inner.check_answer(answer)
    }

    fn reset_quiz(&mut self) {
        self.clear_options();
        self.inner.reset_quiz();
    }

    fn num_right(&self) -> u32 {
        self.inner.num_right()
    }

    fn num_wrong(&self) -> u32 {
        self.inner.num_wrong()
    }

    fn state(&self) -> QuizState {
        self.inner.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Direction;

    fn weekdays() -> QuizList {
        let mut list = QuizList::new("Weekdays", "English", "German").unwrap();
        for (en, de) in [
            ("Monday", "Montag"),
            ("Tuesday", "Dienstag"),
            ("Wednesday", "Mittwoch"),
            ("Thursday", "Donnerstag"),
            ("Friday", "Freitag"),
            ("Saturday", "Samstag"),
            ("Saturday", "Sonnabend"),
        ] {
            list.add_words(en, de).unwrap();
        }
        list
    }

    #[test]
    fn test_options_hold_one_correct_answer() {
        let list = weekdays();
        let mut quiz = MultipleChoiceVocabQuiz::new(&list).with_seed(3);

        while let Some(prompt) = quiz.next_prompt() {
            let options = quiz.options().to_vec();
            assert_eq!(options.len(), MAX_OPTIONS, "prompt {}", prompt);

            let index = quiz.correct_index().unwrap();
            assert_eq!(options[index], quiz.correct_answer().unwrap());

            let mut unique = options.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), options.len());

            assert!(quiz.check_choice(index).unwrap());
        }
        assert_eq!(quiz.num_right(), 7);
        assert!(quiz.options().is_empty());
    }

    #[test]
    fn test_synonyms_are_never_distractors() {
        let list = weekdays();
        let mut quiz = MultipleChoiceVocabQuiz::new(&list).with_seed(11);

        let prompt = quiz.next_prompt().unwrap();
        while quiz.correct_answer().unwrap() != "Samstag" {
            assert!(quiz.next_prompt().is_some(), "ran out after {}", prompt);
        }
        assert!(!quiz.options().iter().any(|o| o == "Sonnabend"));
    }

    #[test]
    fn test_small_list_offers_fewer_options() {
        let mut list = QuizList::new("Pair", "English", "French").unwrap();
        list.add_words("yes", "oui").unwrap();
        list.add_words("no", "non").unwrap();

        let mut quiz = MultipleChoiceVocabQuiz::new(&list);
        quiz.quiz_mut().set_direction(Direction::Reverse);
        assert_eq!(quiz.next_prompt().as_deref(), Some("oui"));
        assert_eq!(quiz.options().len(), 2);
        assert!(quiz.options().contains(&"no".to_string()));
    }

    #[test]
    fn test_wrong_and_invalid_choices() {
        let list = weekdays();
        let mut quiz = MultipleChoiceVocabQuiz::new(&list).with_seed(5);
        assert!(matches!(quiz.check_choice(0), Err(QuizError::InvalidChoice(0))));

        quiz.next_prompt();
        let correct = quiz.correct_index().unwrap();
        let wrong = (correct + 1) % quiz.options().len();
        assert!(!quiz.check_choice(wrong).unwrap());
        assert!(matches!(quiz.check_choice(correct), Err(QuizError::PromptAlreadyAnswered)));
        assert!(matches!(quiz.check_choice(9), Err(QuizError::InvalidChoice(9))));
        assert_eq!((quiz.num_right(), quiz.num_wrong()), (0, 1));

        quiz.reset_quiz();
        assert!(quiz.options().is_empty());
        assert_eq!(quiz.state(), QuizState::InProgress);
    }
}
