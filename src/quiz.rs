//! Multiple-choice quiz engine.
//!
//! A [`QuizEngine`] turns a list of [`BilingualPair`]s into a [`QuizSession`]
//! and drives it one question at a time:
//!
//! ```text
//! start_session -> next_question -> submit_answer -> next_question -> ... -> finalize
//! ```
//!
//! The engine does no I/O. Playing the prompt of an audio question is up to
//! the caller.

use crate::error::QuizError;
use crate::models::{BilingualPair, QuizMode};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Used when a caller asks for fewer than two options.
pub const DEFAULT_MAX_OPTIONS: usize = 4;

pub const EXCELLENT_THRESHOLD: f64 = 80.0;
pub const GOOD_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 1-based position in the session
    pub number: usize,
    /// Text shown, or text to be played in audio mode
    pub prompt: String,
    pub answer: String,
    /// English side of the pair, whatever the mode
    pub source_text: String,
    pub mode: QuizMode,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    Question(Question),
    SessionComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub correct: bool,
    pub correct_answer: String,
    pub question_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncorrectItem {
    pub order: usize,
    pub prompt_text: String,
    pub correct_answer: String,
    pub user_answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Excellent,
    Good,
    NeedsPractice,
}

impl Feedback {
    /// Bands are inclusive at their lower bound.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= EXCELLENT_THRESHOLD {
            Feedback::Excellent
        } else if percentage >= GOOD_THRESHOLD {
            Feedback::Good
        } else {
            Feedback::NeedsPractice
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent",
            Feedback::Good => "Good, keep practicing",
            Feedback::NeedsPractice => "Needs more practice",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub feedback: Feedback,
    pub incorrect_items: Vec<IncorrectItem>,
}

/// State of one run through a shuffled set of pairs.
#[derive(Debug, Clone)]
pub struct QuizSession {
    mode: QuizMode,
    pairs: Vec<BilingualPair>,
    pending: VecDeque<BilingualPair>,
    current: Option<Question>,
    questions_asked: usize,
    score: usize,
    incorrect: Vec<IncorrectItem>,
    finished: bool,
}

impl QuizSession {
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn total(&self) -> usize {
        self.pairs.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn questions_asked(&self) -> usize {
        self.questions_asked
    }

    /// Pairs not yet asked
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn incorrect_items(&self) -> &[IncorrectItem] {
        &self.incorrect
    }

    /// Every pair has been asked and answered.
    pub fn is_completed(&self) -> bool {
        self.pending.is_empty() && self.current.is_none()
    }

    /// Distinct answer texts for the given mode, in input order.
    fn answer_pool(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.pairs
            .iter()
            .map(|pair| match self.mode {
                QuizMode::TextPrompt => pair.target(),
                QuizMode::AudioPrompt => pair.source(),
            })
            .filter(|text| seen.insert(*text))
            .collect()
    }
}

pub struct QuizEngine<R: Rng = ThreadRng> {
    rng: R,
}

impl QuizEngine<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for QuizEngine<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn start_session(
        &mut self,
        pairs: &[BilingualPair],
        mode: QuizMode,
    ) -> Result<QuizSession, QuizError> {
        if pairs.is_empty() {
            return Err(QuizError::EmptyContent);
        }

        let mut queue = pairs.to_vec();
        queue.shuffle(&mut self.rng);
        debug!("Started {:?} session with {} pairs", mode, pairs.len());

        Ok(QuizSession {
            mode,
            pairs: pairs.to_vec(),
            pending: queue.into(),
            current: None,
            questions_asked: 0,
            score: 0,
            incorrect: Vec::new(),
            finished: false,
        })
    }

    /// Presents the next question. A question that is still waiting for an
    /// answer is returned again rather than skipped.
    pub fn next_question(
        &mut self,
        session: &mut QuizSession,
        max_options: usize,
    ) -> Result<NextQuestion, QuizError> {
        if session.finished {
            return Err(QuizError::SessionComplete);
        }
        if let Some(question) = &session.current {
            return Ok(NextQuestion::Question(question.clone()));
        }

        let Some(pair) = session.pending.pop_front() else {
            session.finished = true;
            debug!("Session complete after {} questions", session.questions_asked);
            return Ok(NextQuestion::SessionComplete);
        };

        let max_options = if max_options < 2 {
            DEFAULT_MAX_OPTIONS
        } else {
            max_options
        };

        session.questions_asked += 1;
        let (prompt, answer) = match session.mode {
            QuizMode::TextPrompt => (pair.source(), pair.target()),
            QuizMode::AudioPrompt => (pair.target(), pair.source()),
        };

        let pool: Vec<&str> = session
            .answer_pool()
            .into_iter()
            .filter(|text| *text != answer)
            .collect();
        let wanted = (max_options - 1).min(pool.len());
        let mut options: Vec<String> = pool
            .choose_multiple(&mut self.rng, wanted)
            .map(|text| text.to_string())
            .collect();
        options.push(answer.to_string());
        options.shuffle(&mut self.rng);

        let question = Question {
            number: session.questions_asked,
            prompt: prompt.to_string(),
            answer: answer.to_string(),
            source_text: pair.source().to_string(),
            mode: session.mode,
            options,
        };
        session.current = Some(question.clone());

        Ok(NextQuestion::Question(question))
    }

    pub fn submit_answer(
        &mut self,
        session: &mut QuizSession,
        chosen: &str,
    ) -> Result<AnswerResult, QuizError> {
        if session.current.is_none() {
            return Err(QuizError::NoActiveQuestion);
        }
        if chosen.trim().is_empty() {
            return Err(QuizError::NoSelection);
        }
        let Some(question) = session.current.take() else {
            return Err(QuizError::NoActiveQuestion);
        };

        let correct = chosen == question.answer;
        if correct {
            session.score += 1;
        } else {
            session.incorrect.push(IncorrectItem {
                order: question.number,
                prompt_text: question.source_text.clone(),
                correct_answer: question.answer.clone(),
                user_answer: chosen.to_string(),
            });
        }
        debug!(
            "Question {} answered {}",
            question.number,
            if correct { "correctly" } else { "incorrectly" }
        );

        Ok(AnswerResult {
            correct,
            correct_answer: question.answer,
            question_number: question.number,
        })
    }

    pub fn finalize(&self, session: &QuizSession) -> Result<Report, QuizError> {
        if !session.is_completed() {
            return Err(QuizError::SessionNotComplete);
        }

        let total = session.total();
        let percentage = if total == 0 {
            0.0
        } else {
            session.score as f64 / total as f64 * 100.0
        };
        let mut incorrect_items = session.incorrect.clone();
        incorrect_items.sort_by_key(|item| item.order);

        Ok(Report {
            score: session.score,
            total,
            percentage,
            feedback: Feedback::from_percentage(percentage),
            incorrect_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn pairs(items: &[(&str, &str)]) -> Vec<BilingualPair> {
        items
            .iter()
            .map(|(s, t)| BilingualPair::new(s, t).unwrap())
            .collect()
    }

    fn animals() -> Vec<BilingualPair> {
        pairs(&[("hello", "hola"), ("cat", "gato"), ("dog", "perro")])
    }

    fn seeded(seed: u64) -> QuizEngine<StdRng> {
        QuizEngine::with_rng(StdRng::seed_from_u64(seed))
    }

    fn expect_question(next: NextQuestion) -> Question {
        match next {
            NextQuestion::Question(q) => q,
            NextQuestion::SessionComplete => panic!("expected a question"),
        }
    }

    #[test]
    fn test_start_session_rejects_empty_content() {
        let mut engine = seeded(1);
        let result = engine.start_session(&[], QuizMode::TextPrompt);
        assert_eq!(result.unwrap_err(), QuizError::EmptyContent);
    }

    #[test]
    fn test_start_session_resets_counters() {
        let mut engine = seeded(1);
        let session = engine.start_session(&animals(), QuizMode::TextPrompt).unwrap();
        assert_eq!(session.score(), 0);
        assert_eq!(session.questions_asked(), 0);
        assert_eq!(session.remaining(), 3);
        assert!(session.incorrect_items().is_empty());
        assert!(session.current_question().is_none());
        assert!(!session.is_completed());
    }

    #[test]
    fn test_every_pair_asked_exactly_once() {
        for seed in 0..20 {
            let mut engine = seeded(seed);
            let input = pairs(&[
                ("one", "uno"),
                ("two", "dos"),
                ("three", "tres"),
                ("four", "cuatro"),
                ("five", "cinco"),
            ]);
            let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();
            let mut asked = Vec::new();

            for _ in 0..input.len() {
                let q = expect_question(engine.next_question(&mut session, 4).unwrap());
                asked.push(q.prompt.clone());
                engine.submit_answer(&mut session, &q.answer).unwrap();
            }
            assert_eq!(
                engine.next_question(&mut session, 4).unwrap(),
                NextQuestion::SessionComplete
            );

            asked.sort();
            let mut expected: Vec<String> = input.iter().map(|p| p.source().to_string()).collect();
            expected.sort();
            assert_eq!(asked, expected);
            assert!(session.is_completed());
        }
    }

    #[test]
    fn test_text_prompt_scenario_all_correct() {
        let mut engine = seeded(42);
        let input = animals();
        let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();

        for number in 1..=3 {
            let q = expect_question(engine.next_question(&mut session, 3).unwrap());
            assert_eq!(q.number, number);
            assert_eq!(q.options.len(), 3);

            let pair = input.iter().find(|p| p.source() == q.prompt).unwrap();
            assert_eq!(q.answer, pair.target());
            assert_eq!(q.source_text, pair.source());

            let mut options = q.options.clone();
            options.sort();
            let mut all_targets = vec!["gato", "hola", "perro"];
            all_targets.sort();
            assert_eq!(options, all_targets);

            let result = engine.submit_answer(&mut session, &q.answer).unwrap();
            assert!(result.correct);
            assert_eq!(result.question_number, number);
        }
        engine.next_question(&mut session, 3).unwrap();

        let report = engine.finalize(&session).unwrap();
        assert_eq!(report.score, 3);
        assert_eq!(report.total, 3);
        assert!(report.incorrect_items.is_empty());
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.feedback, Feedback::Excellent);
        assert_eq!(report.feedback.message(), "Excellent");
    }

    #[test]
    fn test_text_prompt_scenario_all_wrong() {
        let mut engine = seeded(7);
        let mut session = engine.start_session(&animals(), QuizMode::TextPrompt).unwrap();
        let mut prompts = Vec::new();

        for _ in 0..3 {
            let q = expect_question(engine.next_question(&mut session, 3).unwrap());
            let wrong = q.options.iter().find(|o| **o != q.answer).unwrap().clone();
            prompts.push((q.prompt.clone(), q.answer.clone(), wrong.clone()));
            let result = engine.submit_answer(&mut session, &wrong).unwrap();
            assert!(!result.correct);
            assert_eq!(result.correct_answer, q.answer);
        }
        engine.next_question(&mut session, 3).unwrap();

        let report = engine.finalize(&session).unwrap();
        assert_eq!(report.score, 0);
        assert_eq!(report.total, 3);
        assert_eq!(report.feedback.message(), "Needs more practice");
        let orders: Vec<usize> = report.incorrect_items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        for (item, (prompt, answer, wrong)) in report.incorrect_items.iter().zip(prompts) {
            assert_eq!(item.prompt_text, prompt);
            assert_eq!(item.correct_answer, answer);
            assert_eq!(item.user_answer, wrong);
        }
    }

    #[test]
    fn test_single_pair_session() {
        let mut engine = seeded(3);
        let input = pairs(&[("water", "agua")]);
        let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();

        let q = expect_question(engine.next_question(&mut session, 4).unwrap());
        assert_eq!(q.options, vec!["agua".to_string()]);
        assert!(engine.submit_answer(&mut session, "agua").unwrap().correct);
        assert_eq!(
            engine.next_question(&mut session, 4).unwrap(),
            NextQuestion::SessionComplete
        );

        let report = engine.finalize(&session).unwrap();
        assert_eq!((report.score, report.total), (1, 1));
    }

    #[test]
    fn test_audio_prompt_swaps_sides_and_logs_source_text() {
        let mut engine = seeded(11);
        let input = animals();
        let mut session = engine.start_session(&input, QuizMode::AudioPrompt).unwrap();

        let q = expect_question(engine.next_question(&mut session, 4).unwrap());
        let pair = input.iter().find(|p| p.target() == q.prompt).unwrap();
        assert_eq!(q.answer, pair.source());
        assert_eq!(q.mode, QuizMode::AudioPrompt);
        assert!(q.options.iter().all(|o| ["hello", "cat", "dog"].contains(&o.as_str())));

        let wrong = q.options.iter().find(|o| **o != q.answer).unwrap().clone();
        engine.submit_answer(&mut session, &wrong).unwrap();
        let logged = &session.incorrect_items()[0];
        assert_eq!(logged.prompt_text, pair.source());
        assert_eq!(logged.correct_answer, pair.source());
    }

    #[test]
    fn test_option_count_and_uniqueness() {
        let input = pairs(&[
            ("red", "rojo"),
            ("blue", "azul"),
            ("green", "verde"),
            ("black", "negro"),
            ("white", "blanco"),
            ("grey", "gris"),
        ]);
        for max_options in [2usize, 3, 4, 6, 10] {
            let mut engine = seeded(max_options as u64);
            let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();
            while let NextQuestion::Question(q) = engine.next_question(&mut session, max_options).unwrap() {
                let pool_size = input.len() - 1;
                assert_eq!(q.options.len(), max_options.min(pool_size + 1));
                assert_eq!(q.options.iter().filter(|o| **o == q.answer).count(), 1);
                let unique: HashSet<&String> = q.options.iter().collect();
                assert_eq!(unique.len(), q.options.len());
                engine.submit_answer(&mut session, &q.answer).unwrap();
            }
        }
    }

    #[test]
    fn test_max_options_below_two_falls_back_to_default() {
        let input = pairs(&[
            ("a", "1"),
            ("b", "2"),
            ("c", "3"),
            ("d", "4"),
            ("e", "5"),
            ("f", "6"),
        ]);
        for requested in [0usize, 1] {
            let mut engine = seeded(5);
            let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();
            let q = expect_question(engine.next_question(&mut session, requested).unwrap());
            assert_eq!(q.options.len(), DEFAULT_MAX_OPTIONS);
        }
    }

    #[test]
    fn test_duplicate_answer_texts_collapse_in_pool() {
        let input = pairs(&[("big", "grande"), ("large", "grande"), ("small", "pequeño")]);
        let mut engine = seeded(9);
        let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();

        while let NextQuestion::Question(q) = engine.next_question(&mut session, 4).unwrap() {
            // two distinct target texts in total
            assert_eq!(q.options.len(), 2);
            assert_eq!(q.options.iter().filter(|o| **o == q.answer).count(), 1);
            engine.submit_answer(&mut session, &q.answer).unwrap();
        }
        assert_eq!(engine.finalize(&session).unwrap().score, 3);
    }

    #[test]
    fn test_correct_answer_position_is_not_fixed() {
        let input = animals();
        let mut positions = HashMap::new();
        for seed in 0..60 {
            let mut engine = seeded(seed);
            let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();
            let q = expect_question(engine.next_question(&mut session, 3).unwrap());
            let pos = q.options.iter().position(|o| *o == q.answer).unwrap();
            *positions.entry(pos).or_insert(0) += 1;
        }
        assert_eq!(positions.len(), 3, "correct answer should land in every slot");
    }

    #[test]
    fn test_next_question_while_presented_repeats_it() {
        let mut engine = seeded(2);
        let mut session = engine.start_session(&animals(), QuizMode::TextPrompt).unwrap();
        let first = expect_question(engine.next_question(&mut session, 3).unwrap());
        let again = expect_question(engine.next_question(&mut session, 3).unwrap());
        assert_eq!(first, again);
        assert_eq!(session.questions_asked(), 1);
        assert_eq!(session.remaining(), 2);
    }

    #[test]
    fn test_submit_without_question_fails() {
        let mut engine = seeded(2);
        let mut session = engine.start_session(&animals(), QuizMode::TextPrompt).unwrap();
        assert_eq!(
            engine.submit_answer(&mut session, "hola").unwrap_err(),
            QuizError::NoActiveQuestion
        );

        let q = expect_question(engine.next_question(&mut session, 3).unwrap());
        engine.submit_answer(&mut session, &q.answer).unwrap();
        assert_eq!(
            engine.submit_answer(&mut session, &q.answer).unwrap_err(),
            QuizError::NoActiveQuestion
        );
    }

    #[test]
    fn test_blank_answer_keeps_question_presented() {
        let mut engine = seeded(2);
        let mut session = engine.start_session(&animals(), QuizMode::TextPrompt).unwrap();
        let q = expect_question(engine.next_question(&mut session, 3).unwrap());

        assert_eq!(
            engine.submit_answer(&mut session, "").unwrap_err(),
            QuizError::NoSelection
        );
        assert_eq!(
            engine.submit_answer(&mut session, "   ").unwrap_err(),
            QuizError::NoSelection
        );
        assert_eq!(session.current_question(), Some(&q));
        assert!(engine.submit_answer(&mut session, &q.answer).unwrap().correct);
    }

    #[test]
    fn test_answer_comparison_is_exact() {
        let mut engine = seeded(4);
        let input = pairs(&[("hello", "Hola")]);
        let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();
        engine.next_question(&mut session, 4).unwrap();
        assert!(!engine.submit_answer(&mut session, "hola").unwrap().correct);
    }

    #[test]
    fn test_next_question_after_completion_fails() {
        let mut engine = seeded(8);
        let input = pairs(&[("yes", "sí")]);
        let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();
        engine.next_question(&mut session, 4).unwrap();
        engine.submit_answer(&mut session, "sí").unwrap();
        assert_eq!(
            engine.next_question(&mut session, 4).unwrap(),
            NextQuestion::SessionComplete
        );
        assert_eq!(
            engine.next_question(&mut session, 4).unwrap_err(),
            QuizError::SessionComplete
        );
    }

    #[test]
    fn test_finalize_before_completion_fails() {
        let mut engine = seeded(8);
        let mut session = engine.start_session(&animals(), QuizMode::TextPrompt).unwrap();
        assert_eq!(
            engine.finalize(&session).unwrap_err(),
            QuizError::SessionNotComplete
        );

        // last question presented but unanswered is still incomplete
        for _ in 0..2 {
            let q = expect_question(engine.next_question(&mut session, 3).unwrap());
            engine.submit_answer(&mut session, &q.answer).unwrap();
        }
        engine.next_question(&mut session, 3).unwrap();
        assert_eq!(session.remaining(), 0);
        assert_eq!(
            engine.finalize(&session).unwrap_err(),
            QuizError::SessionNotComplete
        );
    }

    #[test]
    fn test_score_plus_incorrect_equals_total() {
        let input = pairs(&[
            ("sun", "sol"),
            ("moon", "luna"),
            ("star", "estrella"),
            ("sky", "cielo"),
        ]);
        let mut engine = seeded(21);
        let mut session = engine.start_session(&input, QuizMode::TextPrompt).unwrap();
        let mut answer_right = true;
        while let NextQuestion::Question(q) = engine.next_question(&mut session, 4).unwrap() {
            let choice = if answer_right {
                q.answer.clone()
            } else {
                q.options.iter().find(|o| **o != q.answer).unwrap().clone()
            };
            engine.submit_answer(&mut session, &choice).unwrap();
            assert!(session.score() <= session.total());
            answer_right = !answer_right;
        }

        let report = engine.finalize(&session).unwrap();
        assert_eq!(report.score + report.incorrect_items.len(), report.total);
        assert_eq!(report.score, 2);
        assert_eq!(report.percentage, 50.0);
        assert_eq!(report.feedback.message(), "Good, keep practicing");
    }

    #[test]
    fn test_feedback_bands() {
        assert_eq!(Feedback::from_percentage(100.0), Feedback::Excellent);
        assert_eq!(Feedback::from_percentage(80.0), Feedback::Excellent);
        assert_eq!(Feedback::from_percentage(79.99), Feedback::Good);
        assert_eq!(Feedback::from_percentage(50.0), Feedback::Good);
        assert_eq!(Feedback::from_percentage(49.9), Feedback::NeedsPractice);
        assert_eq!(Feedback::from_percentage(0.0), Feedback::NeedsPractice);
    }

    #[test]
    fn test_default_engine_runs_a_session() {
        let mut engine = QuizEngine::new();
        let mut session = engine.start_session(&animals(), QuizMode::AudioPrompt).unwrap();
        while let NextQuestion::Question(q) = engine.next_question(&mut session, 4).unwrap() {
            engine.submit_answer(&mut session, &q.answer).unwrap();
        }
        assert_eq!(engine.finalize(&session).unwrap().score, 3);
    }
}
