// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A normalized, UI-ready question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,

    pub category: String,

    pub question_text: String,

    pub options: Vec<QuestionOption>,

    /// Index into `options`.
    pub correct_answer: usize,

    pub explanation: Option<String>,

    /// 1 (easy) to 3 (hard). Records without one are treated as 1.
    pub difficulty: Option<u8>,

    #[serde(default)]
    pub kind: QuestionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_task: Option<OriginalTask>,
}

impl Question {
    pub fn effective_difficulty(&self) -> u8 {
        self.difficulty.unwrap_or(1)
    }

    /// The text handed to the grader as the reference solution.
    ///
    /// Multiple-choice questions use the flagged or indexed option. Imported
    /// free-text questions only carry placeholder options, so their
    /// explanation stands in.
    pub fn reference_answer(&self) -> String {
        match self.kind {
            QuestionKind::MultipleChoice => self
                .options
                .iter()
                .find(|opt| opt.is_correct == Some(true))
                .or_else(|| self.options.get(self.correct_answer))
                .map(|opt| opt.text.clone())
                .unwrap_or_default(),
            QuestionKind::FreeText => self.explanation.clone().unwrap_or_default(),
        }
    }
}

/// How a question is meant to be answered.
///
/// Imported exam questions are free text. Their synthesized options exist
/// only so the quiz and flashcard views can render them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    MultipleChoice,
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl QuestionOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: None,
        }
    }
}

/// Back-reference from an imported question to its place in the exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalTask {
    pub task_number: u32,
    pub task_title: String,
    pub subtask_letter: String,
    pub points: f64,
}

/// DTO for inserting a question. Ids are assigned by the store.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_correct_answer))]
pub struct NewQuestion {
    #[validate(length(min = 1, max = 200))]
    pub category: String,

    #[validate(length(min = 10))]
    pub question_text: String,

    #[validate(length(min = 2), custom(function = validate_options))]
    pub options: Vec<QuestionOption>,

    pub correct_answer: usize,

    pub explanation: Option<String>,

    #[validate(range(min = 1, max = 3))]
    pub difficulty: Option<u8>,

    #[serde(default)]
    pub kind: QuestionKind,

    #[serde(default)]
    pub points: Option<f64>,

    #[serde(default)]
    pub original_task: Option<OriginalTask>,
}

impl NewQuestion {
    pub fn into_question(self, id: i64) -> Question {
        Question {
            id,
            category: self.category,
            question_text: self.question_text,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            difficulty: self.difficulty,
            kind: self.kind,
            points: self.points,
            original_task: self.original_task,
        }
    }
}

impl From<Question> for NewQuestion {
    fn from(q: Question) -> Self {
        Self {
            category: q.category,
            question_text: q.question_text,
            options: q.options,
            correct_answer: q.correct_answer,
            explanation: q.explanation,
            difficulty: q.difficulty,
            kind: q.kind,
            points: q.points,
            original_task: q.original_task,
        }
    }
}

fn validate_options(options: &[QuestionOption]) -> Result<(), validator::ValidationError> {
    if options.iter().any(|opt| opt.text.trim().is_empty()) {
        return Err(validator::ValidationError::new("option_text_cannot_be_empty"));
    }
    Ok(())
}

/// `correct_answer` must index one of the options.
fn validate_correct_answer(question: &NewQuestion) -> Result<(), validator::ValidationError> {
    if question.correct_answer >= question.options.len() {
        return Err(validator::ValidationError::new("correct_answer_out_of_range"));
    }
    Ok(())
}

/// DTO for `POST /api/questions/batch`.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchImportRequest {
    #[validate(nested)]
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Serialize)]
pub struct BatchImportResponse {
    pub message: String,
    pub imported: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}

/// Result of inserting a batch into the store.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub created: Vec<Question>,
    pub skipped: usize,
}

impl From<BatchOutcome> for BatchImportResponse {
    fn from(outcome: BatchOutcome) -> Self {
        let imported = outcome.created.len();
        let message = if imported == 0 {
            "No new questions found to import".to_string()
        } else {
            format!("Successfully imported {} questions", imported)
        };
        Self {
            message,
            imported,
            skipped: outcome.skipped,
            questions: outcome.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: QuestionKind) -> Question {
        Question {
            id: 1,
            category: "Datenbanken".to_string(),
            question_text: "Was bedeutet ACID?".to_string(),
            options: vec![
                QuestionOption::new("Falsch"),
                QuestionOption::new("Atomicity, Consistency, Isolation, Durability"),
            ],
            correct_answer: 1,
            explanation: Some("Transaktionseigenschaften".to_string()),
            difficulty: None,
            kind,
            points: None,
            original_task: None,
        }
    }

    #[test]
    fn test_reference_answer_multiple_choice_uses_index() {
        let q = sample(QuestionKind::MultipleChoice);
        assert_eq!(q.reference_answer(), "Atomicity, Consistency, Isolation, Durability");
    }

    #[test]
    fn test_reference_answer_prefers_flagged_option() {
        let mut q = sample(QuestionKind::MultipleChoice);
        q.options[0].is_correct = Some(true);
        assert_eq!(q.reference_answer(), "Falsch");
    }

    #[test]
    fn test_reference_answer_free_text_uses_explanation() {
        let q = sample(QuestionKind::FreeText);
        assert_eq!(q.reference_answer(), "Transaktionseigenschaften");
    }

    #[test]
    fn test_missing_difficulty_defaults_to_one() {
        assert_eq!(sample(QuestionKind::MultipleChoice).effective_difficulty(), 1);
    }

    #[test]
    fn test_new_question_validation() {
        let mut nq: NewQuestion = sample(QuestionKind::MultipleChoice).into();
        assert!(nq.validate().is_ok());

        nq.difficulty = Some(4);
        assert!(nq.validate().is_err());

        nq.difficulty = Some(2);
        nq.options.truncate(1);
        assert!(nq.validate().is_err());
    }

    #[test]
    fn test_correct_answer_must_index_an_option() {
        let mut nq: NewQuestion = sample(QuestionKind::MultipleChoice).into();
        nq.correct_answer = nq.options.len() - 1;
        assert!(nq.validate().is_ok());

        nq.correct_answer = nq.options.len();
        let errors = nq.validate().unwrap_err();
        assert!(errors.to_string().contains("correct_answer_out_of_range"));

        let batch = BatchImportRequest { questions: vec![sample(QuestionKind::FreeText).into(), nq] };
        assert!(batch.validate().is_err());
    }

    #[test]
    fn test_deserialize_ignores_unknown_id_and_defaults_kind() {
        let nq: NewQuestion = serde_json::from_value(serde_json::json!({
            "id": 42,
            "category": "Netzwerktechnik",
            "questionText": "Welche Schicht nutzt ein Router?",
            "options": [{"text": "Schicht 2"}, {"text": "Schicht 3"}],
            "correctAnswer": 1,
            "explanation": null,
            "difficulty": 2
        }))
        .unwrap();
        assert_eq!(nq.kind, QuestionKind::MultipleChoice);
        assert_eq!(nq.into_question(7).id, 7);
    }
}
