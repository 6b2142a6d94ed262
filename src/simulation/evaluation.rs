// src/simulation/evaluation.rs

use std::collections::BTreeMap;

use futures::future::join_all;

use crate::{
    ai::FeedbackGateway,
    models::feedback::GradingResult,
    simulation::{ExamSession, GradingJob, ScoreSummary, SessionError},
};

/// Grades all jobs concurrently.
///
/// A failing call only degrades its own question to a zero-score result.
pub async fn evaluate(jobs: Vec<GradingJob>, gateway: &FeedbackGateway) -> BTreeMap<usize, GradingResult> {
    let graded = join_all(jobs.into_iter().map(|job| async move {
        let result = match gateway.grade_answer(&job.request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Grading question {} failed: {}", job.index, e);
                GradingResult::failed(job.request.max_points)
            }
        };
        (job.index, result)
    }))
    .await;

    graded.into_iter().collect()
}

/// Submits the session, grades the answers and stores the score.
pub async fn submit_and_evaluate(
    session: &mut ExamSession,
    gateway: &FeedbackGateway,
) -> Result<ScoreSummary, SessionError> {
    let jobs = session.submit()?;
    let results = evaluate(jobs, gateway).await;
    session.apply_results(results).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ai::{AiError, gateway::tests::ScriptedGenerator},
        simulation::{SessionPhase, session::tests::question},
    };

    #[tokio::test]
    async fn test_every_answered_question_is_graded() {
        let gateway = FeedbackGateway::new(ScriptedGenerator::new(Ok(
            "Punktzahl: 5 / 5\nFeedback: Gut.\nKorrekt: Ja",
        )));
        let mut session = ExamSession::new(vec![question(1, 1), question(2, 1), question(3, 2)], 60).unwrap();
        session.set_answer_at(0, "a").unwrap();
        session.set_answer_at(2, "c").unwrap();

        let summary = submit_and_evaluate(&mut session, &gateway).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Scored);
        assert_eq!(session.results().keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(summary.max_possible_score, 15);
        assert_eq!(summary.total_score, 10);
    }

    #[tokio::test]
    async fn test_failures_degrade_per_question() {
        let gateway = FeedbackGateway::new(ScriptedGenerator::new(Err(AiError::Timeout)));
        let mut session = ExamSession::new(vec![question(1, 3)], 60).unwrap();
        session.set_answer("antwort").unwrap();

        let summary = submit_and_evaluate(&mut session, &gateway).await.unwrap();
        assert_eq!(summary.total_score, 0);
        assert_eq!(summary.max_possible_score, 15);
        assert!(!summary.passed);
        assert_eq!(session.results()[&0], GradingResult::failed(15));
    }

    #[tokio::test]
    async fn test_nothing_answered() {
        let gateway = FeedbackGateway::new(ScriptedGenerator::new(Ok("Punktzahl: 5 / 5")));
        let mut session = ExamSession::new(vec![question(1, 1)], 60).unwrap();

        let summary = submit_and_evaluate(&mut session, &gateway).await.unwrap();
        assert_eq!(summary.max_possible_score, 0);
        assert_eq!(summary.percentage, 0.0);
        assert!(session.results().is_empty());
    }
}
