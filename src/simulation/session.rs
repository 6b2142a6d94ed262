// src/simulation/session.rs

use std::collections::BTreeMap;

use crate::{
    config::{EXAM_DURATION_MINUTES, POINTS_PER_DIFFICULTY},
    models::{
        feedback::{FeedbackRequest, GradingResult},
        question::Question,
    },
    simulation::{SessionError, scoring::ScoreSummary},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    /// Submitted, grading calls in flight. Answers are frozen.
    Evaluating,
    Scored,
}

/// One answered question waiting to be graded.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingJob {
    pub index: usize,
    pub request: FeedbackRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Running { remaining_seconds: u32 },
    /// Time ran out on this tick and the session submitted itself.
    Expired(Vec<GradingJob>),
    /// The session is no longer in progress.
    Stopped,
}

/// State of one timed exam attempt.
///
/// Only answers with non-blank text count as answered. Unanswered questions
/// are neither graded nor part of the maximum score.
#[derive(Debug)]
pub struct ExamSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: BTreeMap<usize, String>,
    remaining_seconds: u32,
    phase: SessionPhase,
    results: BTreeMap<usize, GradingResult>,
    summary: Option<ScoreSummary>,
}

/// Points a question is worth in the simulation.
pub fn max_points_for(question: &Question) -> u32 {
    question.effective_difficulty() as u32 * POINTS_PER_DIFFICULTY
}

/// Formats seconds as `MM:SS`.
pub fn format_time(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

impl ExamSession {
    pub fn new(questions: Vec<Question>, duration_seconds: u32) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        Ok(Self {
            questions,
            current_index: 0,
            answers: BTreeMap::new(),
            remaining_seconds: duration_seconds,
            phase: SessionPhase::InProgress,
            results: BTreeMap::new(),
            summary: None,
        })
    }

    pub fn with_default_duration(questions: Vec<Question>) -> Result<Self, SessionError> {
        Self::new(questions, EXAM_DURATION_MINUTES * 60)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn remaining_time_display(&self) -> String {
        format_time(self.remaining_seconds)
    }

    pub fn results(&self) -> &BTreeMap<usize, GradingResult> {
        &self.results
    }

    pub fn summary(&self) -> Option<&ScoreSummary> {
        self.summary.as_ref()
    }

    // --- Navigation ---

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_index + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current_index.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    /// Jumps to `index`; out-of-range targets are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    // --- Answers ---

    pub fn set_answer(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.set_answer_at(self.current_index, text)
    }

    pub fn set_answer_at(&mut self, index: usize, text: impl Into<String>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::AnswersLocked);
        }
        if index >= self.questions.len() {
            return Err(SessionError::IndexOutOfRange(index));
        }
        self.answers.insert(index, text.into());
        Ok(())
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn has_answered(&self, index: usize) -> bool {
        self.answer(index).is_some_and(|a| !a.trim().is_empty())
    }

    pub fn answered_indices(&self) -> Vec<usize> {
        self.answers
            .keys()
            .copied()
            .filter(|&i| self.has_answered(i))
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.answered_indices().len()
    }

    pub fn progress_percentage(&self) -> f64 {
        self.answered_count() as f64 / self.questions.len() as f64 * 100.0
    }

    // --- Timer & submission ---

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::InProgress {
            return TickOutcome::Stopped;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Running {
                remaining_seconds: self.remaining_seconds,
            };
        }

        tracing::info!("Exam time is up, submitting automatically");
        TickOutcome::Expired(self.freeze())
    }

    /// Ends the attempt and returns the grading jobs for answered questions.
    pub fn submit(&mut self) -> Result<Vec<GradingJob>, SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::AlreadySubmitted);
        }
        Ok(self.freeze())
    }

    fn freeze(&mut self) -> Vec<GradingJob> {
        self.phase = SessionPhase::Evaluating;
        self.answered_indices()
            .into_iter()
            .map(|index| {
                let question = &self.questions[index];
                GradingJob {
                    index,
                    request: FeedbackRequest {
                        question_text: question.question_text.clone(),
                        user_answer: self.answers[&index].clone(),
                        correct_answer: question.reference_answer(),
                        difficulty: question.effective_difficulty(),
                        max_points: max_points_for(question),
                    },
                }
            })
            .collect()
    }

    /// Stores grading results and computes the final score.
    ///
    /// Answered questions without a result count as failed gradings.
    pub fn apply_results(
        &mut self,
        mut results: BTreeMap<usize, GradingResult>,
    ) -> Result<&ScoreSummary, SessionError> {
        if self.phase != SessionPhase::Evaluating {
            return Err(SessionError::NotEvaluating);
        }

        let mut total = 0;
        let mut max = 0;
        let mut graded = BTreeMap::new();

        for index in self.answered_indices() {
            let max_points = max_points_for(&self.questions[index]);
            let result = results
                .remove(&index)
                .unwrap_or_else(|| GradingResult::failed(max_points));

            total += result.score.min(max_points);
            max += max_points;
            graded.insert(index, result);
        }

        self.results = graded;
        self.phase = SessionPhase::Scored;
        let summary = self.summary.insert(ScoreSummary::new(total, max));
        Ok(&*summary)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::question::{QuestionKind, QuestionOption};

    pub(crate) fn question(id: i64, difficulty: u8) -> Question {
        Question {
            id,
            category: "Test".to_string(),
            question_text: format!("Frage {}", id),
            options: vec![QuestionOption::new("A"), QuestionOption::new("B")],
            correct_answer: 0,
            explanation: Some(format!("Lösung {}", id)),
            difficulty: Some(difficulty),
            kind: QuestionKind::FreeText,
            points: None,
            original_task: None,
        }
    }

    fn session(duration: u32) -> ExamSession {
        ExamSession::new(vec![question(1, 1), question(2, 2), question(3, 3)], duration).unwrap()
    }

    fn result(score: u32, max: u32) -> GradingResult {
        GradingResult {
            feedback: "ok".to_string(),
            is_correct: score == max,
            score,
            max_score: max,
        }
    }

    #[test]
    fn test_empty_question_list_is_rejected() {
        assert!(matches!(ExamSession::new(vec![], 60), Err(SessionError::NoQuestions)));
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut s = session(60);
        assert!(!s.previous());
        assert!(s.next());
        assert!(s.next());
        assert!(!s.next());
        assert_eq!(s.current_index(), 2);
        assert!(!s.go_to(3));
        assert!(s.go_to(0));
        assert_eq!(s.current_question().id, 1);
    }

    #[test]
    fn test_answers_survive_navigation() {
        let mut s = session(60);
        s.set_answer("erste Antwort").unwrap();
        s.next();
        s.set_answer("   ").unwrap();
        s.previous();
        assert_eq!(s.answer(0), Some("erste Antwort"));
        assert!(s.has_answered(0));
        assert!(!s.has_answered(1));
        assert_eq!(s.answered_count(), 1);
        assert!((s.progress_percentage() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_submit_grades_only_answered_questions() {
        let mut s = session(60);
        s.set_answer_at(0, "x").unwrap();
        s.set_answer_at(1, "y").unwrap();

        let jobs = s.submit().unwrap();
        assert_eq!(jobs.iter().map(|j| j.index).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(jobs[0].request.max_points, 5);
        assert_eq!(jobs[1].request.max_points, 10);
        assert_eq!(jobs[0].request.correct_answer, "Lösung 1");

        let results = BTreeMap::from([(0, result(5, 5)), (1, result(4, 10))]);
        let summary = s.apply_results(results).unwrap().clone();
        assert_eq!(summary.max_possible_score, 15);
        assert_eq!(summary.total_score, 9);
        assert!(summary.passed);
        assert_eq!(s.phase(), SessionPhase::Scored);
        assert_eq!(s.results().len(), 2);
    }

    #[test]
    fn test_missing_result_counts_as_failed_grading() {
        let mut s = session(60);
        s.set_answer_at(2, "z").unwrap();
        s.submit().unwrap();
        let summary = s.apply_results(BTreeMap::new()).unwrap().clone();
        assert_eq!(summary.total_score, 0);
        assert_eq!(summary.max_possible_score, 15);
        assert_eq!(s.results()[&2].score, 0);
    }

    #[test]
    fn test_answers_are_frozen_after_submit() {
        let mut s = session(60);
        s.submit().unwrap();
        assert!(matches!(s.set_answer("zu spät"), Err(SessionError::AnswersLocked)));
        assert!(matches!(s.submit(), Err(SessionError::AlreadySubmitted)));
    }

    #[test]
    fn test_out_of_range_answer_is_rejected() {
        let mut s = session(60);
        assert!(matches!(s.set_answer_at(7, "x"), Err(SessionError::IndexOutOfRange(7))));
    }

    #[test]
    fn test_countdown_expires_exactly_once() {
        let mut s = session(3);
        s.set_answer_at(1, "y").unwrap();

        assert_eq!(s.tick(), TickOutcome::Running { remaining_seconds: 2 });
        assert_eq!(s.tick(), TickOutcome::Running { remaining_seconds: 1 });
        match s.tick() {
            TickOutcome::Expired(jobs) => assert_eq!(jobs.len(), 1),
            other => panic!("expected expiry, got {:?}", other),
        }
        assert_eq!(s.phase(), SessionPhase::Evaluating);
        assert_eq!(s.remaining_seconds(), 0);
        assert_eq!(s.tick(), TickOutcome::Stopped);
        assert!(matches!(s.submit(), Err(SessionError::AlreadySubmitted)));
    }

    #[test]
    fn test_apply_results_requires_submission() {
        let mut s = session(60);
        assert!(matches!(s.apply_results(BTreeMap::new()), Err(SessionError::NotEvaluating)));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(3600), "60:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(session(59).remaining_time_display(), "00:59");
    }
}
