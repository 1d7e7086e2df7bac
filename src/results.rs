//! Views derived from a session: score, per-question review, progress.
//! Nothing here is stored; everything is recomputed from the answers.

use crate::models::{OptionLabel, QuizQuestion};
use crate::session::QuizSession;

/// Score summary of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizResults {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

impl QuizResults {
    pub fn from_session(session: &QuizSession) -> Self {
        let correct = session
            .questions()
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                session
                    .answer_for(*index)
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count();

        Self {
            correct,
            answered: session.user_answers().len(),
            total: session.total_questions(),
        }
    }

    /// Questions not answered correctly, unanswered ones included.
    pub fn incorrect(&self) -> usize {
        self.total.saturating_sub(self.correct)
    }

    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 * 100.0 / self.total as f64
        } else {
            0.0
        }
    }

    pub fn performance_message(&self) -> &'static str {
        match self.percentage() {
            p if p >= 90.0 => "Excellent! You've mastered this topic!",
            p if p >= 75.0 => "Great job! You know your stuff!",
            p if p >= 60.0 => "Good effort! You have a solid understanding.",
            p if p >= 40.0 => "Not bad! Keep practicing to improve.",
            _ => "Keep studying! You'll get better with practice.",
        }
    }
}

/// One generated question together with what the user chose.
#[derive(Debug, Clone, Copy)]
pub struct QuestionReview<'a> {
    pub index: usize,
    pub question: &'a QuizQuestion,
    pub user_answer: Option<OptionLabel>,
}

impl QuestionReview<'_> {
    pub fn is_correct(&self) -> bool {
        self.user_answer
            .is_some_and(|answer| self.question.is_correct(answer))
    }
}

pub fn review(session: &QuizSession) -> Vec<QuestionReview<'_>> {
    session
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| QuestionReview {
            index,
            question,
            user_answer: session.answer_for(index),
        })
        .collect()
}

/// `None` while the question is unanswered or not generated yet.
pub fn is_correct(session: &QuizSession, index: usize) -> Option<bool> {
    let question = session.question(index)?;
    session
        .answer_for(index)
        .map(|answer| question.is_correct(answer))
}

/// Fraction of the quiz reached, counting the current question.
pub fn progress(session: &QuizSession) -> f64 {
    let total = session.total_questions();
    if !session.is_started() || total == 0 {
        return 0.0;
    }
    ((session.current_question_index() + 1) as f64 / total as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, QuizSettings};
    use crate::provider::QuestionProvider;
    use crate::provider::testing::ScriptedClient;
    use crate::session::QuizOrchestrator;

    fn results(correct: usize, total: usize) -> QuizResults {
        QuizResults {
            correct,
            answered: total,
            total,
        }
    }

    #[test]
    fn test_percentage_and_message() {
        assert_eq!(results(0, 0).percentage(), 0.0);
        assert_eq!(results(5, 5).percentage(), 100.0);
        assert_eq!(results(5, 5).performance_message(), "Excellent! You've mastered this topic!");
        assert_eq!(results(4, 5).performance_message(), "Great job! You know your stuff!");
        assert_eq!(results(3, 5).performance_message(), "Good effort! You have a solid understanding.");
        assert_eq!(results(2, 5).performance_message(), "Not bad! Keep practicing to improve.");
        assert_eq!(results(1, 5).performance_message(), "Keep studying! You'll get better with practice.");
        assert_eq!(results(3, 5).incorrect(), 2);
    }

    #[tokio::test]
    async fn test_answer_matching_correct_label_scores() {
        let client = ScriptedClient::new()
            .question("Which is B?", 'B')
            .question("Which is D?", 'D');
        let mut quiz = QuizOrchestrator::new(QuestionProvider::new(client));
        quiz.start(QuizSettings::new("Algebra", 5, Difficulty::Easy))
            .await
            .unwrap();

        quiz.answer(OptionLabel::B).unwrap();
        assert_eq!(is_correct(quiz.session(), 0), Some(true));
        assert_eq!(progress(quiz.session()), 0.2);

        quiz.advance().await.unwrap();
        assert_eq!(is_correct(quiz.session(), 1), None);
        quiz.answer(OptionLabel::A).unwrap();
        assert_eq!(is_correct(quiz.session(), 1), Some(false));
        assert_eq!(is_correct(quiz.session(), 2), None);

        let summary = QuizResults::from_session(quiz.session());
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.percentage(), 20.0);

        let reviews = review(quiz.session());
        assert_eq!(reviews.len(), 2);
        assert!(reviews[0].is_correct());
        assert!(!reviews[1].is_correct());
        assert_eq!(reviews[1].user_answer, Some(OptionLabel::A));
    }

    #[test]
    fn test_progress_before_start() {
        assert_eq!(progress(&QuizSession::new()), 0.0);
    }
}
