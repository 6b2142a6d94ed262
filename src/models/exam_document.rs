// src/models/exam_document.rs

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One imported IHK exam file.
///
/// Only `tasks` is structurally required. Unknown fields are ignored and
/// every optional field falls back to its default, explicit `null` included,
/// so partially filled exports still import.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExamDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub exam_metadata: ExamMetadata,

    #[serde(default, deserialize_with = "null_as_default")]
    pub general_instructions: Vec<String>,

    #[serde(default)]
    pub overarching_scenario: Option<serde_json::Value>,

    pub tasks: Vec<ExamTask>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExamMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub exam_title: String,
    /// Exam part, e.g. "AP1".
    #[serde(deserialize_with = "null_as_default")]
    pub part: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profession: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profession_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub area_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    pub duration_minutes: Option<u32>,
    pub total_points: Option<f64>,
    pub number_of_tasks: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExamTask {
    pub task_number: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    #[serde(default)]
    pub total_points: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub subtasks: Vec<ExamSubtask>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExamSubtask {
    #[serde(default, deserialize_with = "null_as_default")]
    pub part_letter: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default)]
    pub scenario_context: Option<String>,

    #[serde(default)]
    pub question: Option<String>,

    #[serde(default)]
    pub points: Option<f64>,

    /// Hint on the expected shape of the answer, e.g. "Ja/Nein" or "Liste".
    #[serde(default)]
    pub answer_format: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_parts: Vec<ExamSubPart>,

    #[serde(default)]
    pub data_table: Option<serde_json::Value>,

    #[serde(default)]
    pub text_provided: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub image_references: Vec<String>,

    #[serde(default)]
    pub calculation_needed: Option<String>,

    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExamSubPart {
    pub sub_part_letter: Option<String>,
    pub points: Option<f64>,
    pub question: Option<String>,
    pub answer_format: Option<String>,
    pub calculation_needed: Option<String>,
    pub explanation: Option<String>,
    pub scenario_context: Option<String>,
}
