// src/simulation/mod.rs

//! Timed exam attempts: answering, automatic submission and AI scoring.

pub mod countdown;
pub mod evaluation;
pub mod scoring;
pub mod session;

pub use countdown::{CountdownHandle, spawn_countdown};
pub use evaluation::{evaluate, submit_and_evaluate};
pub use scoring::{Grade, ScoreSummary};
pub use session::{ExamSession, GradingJob, SessionPhase, TickOutcome, format_time};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Keine Prüfungsfragen gefunden")]
    NoQuestions,

    #[error("Die Prüfung wurde bereits abgegeben")]
    AlreadySubmitted,

    #[error("Antworten können nach der Abgabe nicht mehr geändert werden")]
    AnswersLocked,

    #[error("Frage {0} existiert nicht in dieser Prüfung")]
    IndexOutOfRange(usize),

    #[error("Die Prüfung wird gerade nicht bewertet")]
    NotEvaluating,
}
