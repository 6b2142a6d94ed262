// src/exam/transform.rs

use crate::{
    exam::ImportError,
    models::{
        exam_document::{ExamDocument, ExamMetadata, ExamSubtask, ExamTask},
        question::{OriginalTask, Question, QuestionKind, QuestionOption},
    },
};

const DEFAULT_CATEGORY: &str = "Allgemein";
const DEFAULT_EXPLANATION: &str = "Siehe IHK-Lösung für detaillierte Erklärung.";

/// Maps exam points onto the 1..=3 difficulty scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyThresholds {
    /// Highest point value still rated easy.
    pub easy_max: f64,
    /// Highest point value still rated medium.
    pub medium_max: f64,
}

impl Default for DifficultyThresholds {
    fn default() -> Self {
        Self {
            easy_max: 2.0,
            medium_max: 4.0,
        }
    }
}

impl DifficultyThresholds {
    pub fn difficulty_for(&self, points: f64) -> u8 {
        if points <= self.easy_max {
            1
        } else if points <= self.medium_max {
            2
        } else {
            3
        }
    }
}

/// How a task is turned into a question category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryRule {
    /// The task's own category label, "Allgemein" when missing.
    #[default]
    TaskCategory,
    /// `"<profession> - <task title>"` from the exam metadata.
    ProfessionAndTitle,
}

impl CategoryRule {
    fn category_for(&self, metadata: &ExamMetadata, task: &ExamTask) -> String {
        let category = match self {
            CategoryRule::TaskCategory => task.category.trim().to_string(),
            CategoryRule::ProfessionAndTitle => {
                let profession = metadata.profession.trim();
                let title = task.title.trim();
                match (profession.is_empty(), title.is_empty()) {
                    (false, false) => format!("{} - {}", profession, title),
                    (true, false) => title.to_string(),
                    (false, true) => profession.to_string(),
                    (true, true) => String::new(),
                }
            }
        };

        if category.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub thresholds: DifficultyThresholds,
    pub category_rule: CategoryRule,
}

/// Parses a raw exam document and converts it with the default options.
pub fn convert_exam_json(raw: &str) -> Result<Vec<Question>, ImportError> {
    let doc: ExamDocument = serde_json::from_str(raw)?;
    Ok(transform(&doc))
}

pub fn transform(doc: &ExamDocument) -> Vec<Question> {
    transform_with(doc, &TransformOptions::default())
}

/// Flattens an exam into questions in document order (task, subtask, sub-part).
///
/// Ids are local to the result and start at 1; the store reassigns them on
/// insert.
pub fn transform_with(doc: &ExamDocument, options: &TransformOptions) -> Vec<Question> {
    let mut questions = Vec::new();

    for task in &doc.tasks {
        let category = options.category_rule.category_for(&doc.exam_metadata, task);

        for subtask in &task.subtasks {
            if let (Some(question), Some(points)) = (non_blank(&subtask.question), subtask.points) {
                questions.push(build_question(
                    questions.len() as i64 + 1,
                    &category,
                    task,
                    subtask,
                    Leaf {
                        question,
                        points,
                        answer_format: subtask.answer_format.as_deref(),
                        scenario_context: subtask.scenario_context.as_deref(),
                        explanation: first_non_blank(&subtask.calculation_needed, &subtask.explanation),
                    },
                    options,
                ));
            }

            for part in &subtask.sub_parts {
                let (Some(question), Some(points)) = (non_blank(&part.question), part.points) else {
                    continue;
                };
                let scenario_context = non_blank(&part.scenario_context)
                    .or_else(|| non_blank(&subtask.scenario_context));

                questions.push(build_question(
                    questions.len() as i64 + 1,
                    &category,
                    task,
                    subtask,
                    Leaf {
                        question,
                        points,
                        answer_format: part.answer_format.as_deref(),
                        scenario_context,
                        explanation: first_non_blank(&part.calculation_needed, &part.explanation),
                    },
                    options,
                ));
            }
        }
    }

    questions
}

/// The question-carrying part of a subtask or sub-part.
struct Leaf<'a> {
    question: &'a str,
    points: f64,
    answer_format: Option<&'a str>,
    scenario_context: Option<&'a str>,
    explanation: Option<&'a str>,
}

fn build_question(
    id: i64,
    category: &str,
    task: &ExamTask,
    subtask: &ExamSubtask,
    leaf: Leaf<'_>,
    options: &TransformOptions,
) -> Question {
    Question {
        id,
        category: category.to_string(),
        question_text: compose_text(&subtask.description, leaf.scenario_context, leaf.question),
        options: options_from_format(leaf.answer_format.unwrap_or_default()),
        correct_answer: 0,
        explanation: Some(leaf.explanation.unwrap_or(DEFAULT_EXPLANATION).to_string()),
        difficulty: Some(options.thresholds.difficulty_for(leaf.points)),
        kind: QuestionKind::FreeText,
        points: Some(leaf.points),
        original_task: Some(OriginalTask {
            task_number: task.task_number,
            task_title: task.title.clone(),
            subtask_letter: subtask.part_letter.clone(),
            points: leaf.points,
        }),
    }
}

fn compose_text(description: &str, scenario_context: Option<&str>, question: &str) -> String {
    let mut sections = Vec::with_capacity(3);
    if !description.trim().is_empty() {
        sections.push(description.trim().to_string());
    }
    if let Some(context) = scenario_context {
        sections.push(format!("Kontext: {}", context.trim()));
    }
    sections.push(format!("Frage: {}", question.trim()));
    sections.join("\n\n")
}

/// Placeholder options derived from the answer-format hint. Index 0 is the
/// conventional "correct" one; the real answer is free text.
fn options_from_format(format: &str) -> Vec<QuestionOption> {
    if format.contains("Ja/Nein") {
        return vec![QuestionOption::new("Ja"), QuestionOption::new("Nein")];
    }

    let label = if format.contains("Liste") {
        "Option"
    } else {
        "Antwortmöglichkeit"
    };
    (1..=4)
        .map(|n| QuestionOption::new(format!("{} {}", label, n)))
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn first_non_blank<'a>(first: &'a Option<String>, second: &'a Option<String>) -> Option<&'a str> {
    non_blank(first).or_else(|| non_blank(second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> ExamDocument {
        serde_json::from_value(value).unwrap()
    }

    fn sample_exam() -> ExamDocument {
        document(json!({
            "exam_metadata": { "exam_title": "AP1 Frühjahr 2025", "profession": "Fachinformatiker" },
            "tasks": [
                {
                    "task_number": 1,
                    "title": "Arbeitsplatz einrichten",
                    "category": "IT-Systeme",
                    "subtasks": [
                        { "part_letter": "a", "description": "Ein Kunde plant neue Arbeitsplätze.",
                          "scenario_context": "Büro mit 12 Mitarbeitern", "question": "Nennen Sie zwei Kriterien.",
                          "points": 2, "answer_format": "Liste" },
                        { "part_letter": "b", "description": "Berechnung",
                          "sub_parts": [
                              { "points": 3, "question": "Berechnen Sie die Kosten.", "answer_format": "Zahl",
                                "calculation_needed": "12 * 899 EUR" },
                              { "points": 1, "question": "Ist ein Leasing sinnvoll?", "answer_format": "Ja/Nein" }
                          ] },
                        { "part_letter": "c", "description": "Nur Text ohne Frage" }
                    ]
                },
                {
                    "task_number": 2,
                    "title": "Datenschutz",
                    "subtasks": [
                        { "part_letter": "a", "description": "DSGVO", "question": "Erläutern Sie Art. 32.", "points": 8 },
                        { "part_letter": "b", "description": "Ohne Punkte", "question": "Wird übersprungen" }
                    ]
                }
            ]
        }))
    }

    #[test]
    fn test_count_matches_leaves_with_question_and_points() {
        let questions = transform(&sample_exam());
        assert_eq!(questions.len(), 4);
    }

    #[test]
    fn test_output_follows_document_order() {
        let questions = transform(&sample_exam());
        let origin: Vec<(u32, &str)> = questions
            .iter()
            .map(|q| {
                let o = q.original_task.as_ref().unwrap();
                (o.task_number, o.subtask_letter.as_str())
            })
            .collect();
        assert_eq!(origin, vec![(1, "a"), (1, "b"), (1, "b"), (2, "a")]);
        assert_eq!(questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_question_text_sections() {
        let questions = transform(&sample_exam());
        assert_eq!(
            questions[0].question_text,
            "Ein Kunde plant neue Arbeitsplätze.\n\nKontext: Büro mit 12 Mitarbeitern\n\nFrage: Nennen Sie zwei Kriterien."
        );
        assert_eq!(questions[1].question_text, "Berechnung\n\nFrage: Berechnen Sie die Kosten.");
    }

    #[test]
    fn test_options_synthesized_from_answer_format() {
        let questions = transform(&sample_exam());
        assert_eq!(questions[0].options[0].text, "Option 1");
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[1].options[3].text, "Antwortmöglichkeit 4");
        assert_eq!(
            questions[2].options.iter().map(|o| o.text.as_str()).collect::<Vec<_>>(),
            vec!["Ja", "Nein"]
        );
        assert!(questions.iter().all(|q| q.correct_answer == 0));
        assert!(questions.iter().all(|q| q.kind == QuestionKind::FreeText));
    }

    #[test]
    fn test_category_and_explanation_defaults() {
        let questions = transform(&sample_exam());
        assert_eq!(questions[0].category, "IT-Systeme");
        assert_eq!(questions[3].category, "Allgemein");
        assert_eq!(questions[1].explanation.as_deref(), Some("12 * 899 EUR"));
        assert_eq!(questions[0].explanation.as_deref(), Some(DEFAULT_EXPLANATION));
    }

    #[test]
    fn test_profession_and_title_category_rule() {
        let options = TransformOptions {
            category_rule: CategoryRule::ProfessionAndTitle,
            ..Default::default()
        };
        let questions = transform_with(&sample_exam(), &options);
        assert_eq!(questions[0].category, "Fachinformatiker - Arbeitsplatz einrichten");
        assert_eq!(questions[3].category, "Fachinformatiker - Datenschutz");
    }

    #[test]
    fn test_difficulty_from_default_thresholds() {
        let questions = transform(&sample_exam());
        let difficulties: Vec<u8> = questions.iter().map(|q| q.difficulty.unwrap()).collect();
        assert_eq!(difficulties, vec![1, 2, 1, 3]);
    }

    #[test]
    fn test_difficulty_is_monotonic() {
        for thresholds in [
            DifficultyThresholds::default(),
            DifficultyThresholds { easy_max: 5.0, medium_max: 10.0 },
        ] {
            let mut last = 0;
            for tenth in 0..200 {
                let d = thresholds.difficulty_for(tenth as f64 / 10.0);
                assert!(d >= last);
                assert!((1..=3).contains(&d));
                last = d;
            }
        }
    }

    #[test]
    fn test_single_subtask_with_sub_part() {
        let doc = document(json!({
            "tasks": [{
                "task_number": 1,
                "title": "T",
                "category": "C",
                "subtasks": [{
                    "part_letter": "a",
                    "description": "D",
                    "points": 3,
                    "question": "Q1",
                    "sub_parts": [{ "points": 6, "question": "Q2", "answer_format": "Text" }]
                }]
            }]
        }));

        let questions = transform(&doc);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].difficulty, Some(2));
        assert_eq!(questions[1].difficulty, Some(3));

        let options = TransformOptions {
            thresholds: DifficultyThresholds { easy_max: 3.0, medium_max: 5.0 },
            ..Default::default()
        };
        let banded = transform_with(&doc, &options);
        assert_eq!(banded[0].difficulty, Some(1));
        assert_eq!(banded[1].difficulty, Some(3));

        for q in questions.iter().chain(banded.iter()) {
            assert_eq!(q.options.len(), 4);
            assert_eq!(q.correct_answer, 0);
        }
    }

    #[test]
    fn test_transform_is_deterministic() {
        let doc = sample_exam();
        assert_eq!(transform(&doc), transform(&doc));
    }

    #[test]
    fn test_empty_tasks_yield_no_questions() {
        let questions = convert_exam_json(r#"{"exam_metadata": {}, "tasks": []}"#).unwrap();
        assert!(questions.is_empty());
    }

    #[test]
    fn test_invalid_json_is_malformed_document() {
        let err = convert_exam_json("{ tasks: [").unwrap_err();
        assert!(matches!(err, ImportError::MalformedDocument(_)));
    }

    #[test]
    fn test_missing_tasks_is_malformed_document() {
        let err = convert_exam_json(r#"{"exam_metadata": {}}"#).unwrap_err();
        assert!(matches!(err, ImportError::MalformedDocument(_)));
    }

    #[test]
    fn test_null_fields_are_treated_as_missing() {
        let raw = r#"{
            "exam_metadata": { "exam_title": "AP2", "area_code": null, "profession": null, "date": null },
            "general_instructions": null,
            "tasks": [{
                "task_number": 1,
                "title": null,
                "category": null,
                "subtasks": [{
                    "part_letter": null,
                    "description": null,
                    "question": "Nennen Sie ein Protokoll.",
                    "points": 2,
                    "sub_parts": null,
                    "image_references": null
                }]
            }]
        }"#;

        let questions = convert_exam_json(raw).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].category, "Allgemein");
        assert_eq!(questions[0].question_text, "Frage: Nennen Sie ein Protokoll.");
        let origin = questions[0].original_task.as_ref().unwrap();
        assert_eq!(origin.task_title, "");
        assert_eq!(origin.subtask_letter, "");
    }
}
