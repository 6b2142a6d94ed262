// src/models/level.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::config::{LEVEL_COMPLETION_RATIO, MAX_COUNTER_VALUE};

/// A difficulty band of the progressive quiz mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizLevel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub order: u32,
    pub min_difficulty: u8,
    pub max_difficulty: u8,
    /// Questions that must be completed in the previous level to unlock this one.
    pub required_questions_to_unlock: u32,
    pub image_url: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a level.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_band))]
pub struct NewQuizLevel {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 500))]
    pub description: String,

    pub order: u32,

    #[serde(default = "default_difficulty")]
    #[validate(range(min = 1, max = 3))]
    pub min_difficulty: u8,

    #[serde(default = "default_difficulty")]
    #[validate(range(min = 1, max = 3))]
    pub max_difficulty: u8,

    #[serde(default)]
    pub required_questions_to_unlock: u32,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default = "default_color")]
    pub color: String,
}

fn default_difficulty() -> u8 {
    1
}

fn default_color() -> String {
    "#6366f1".to_string()
}

fn validate_band(level: &NewQuizLevel) -> Result<(), ValidationError> {
    if level.min_difficulty > level.max_difficulty {
        return Err(ValidationError::new("min_difficulty_above_max"));
    }
    Ok(())
}

impl NewQuizLevel {
    pub fn into_level(self, id: i64, now: DateTime<Utc>) -> QuizLevel {
        QuizLevel {
            id,
            name: self.name,
            description: self.description,
            order: self.order,
            min_difficulty: self.min_difficulty,
            max_difficulty: self.max_difficulty,
            required_questions_to_unlock: self.required_questions_to_unlock,
            image_url: self.image_url,
            color: self.color,
            created_at: now,
        }
    }
}

/// Levels every fresh store starts with.
pub fn default_levels() -> Vec<NewQuizLevel> {
    vec![
        NewQuizLevel {
            name: "Level 1: Grundlagen".to_string(),
            description: "Einfache Fragen zu IT-Grundlagen und Konzepten".to_string(),
            order: 1,
            min_difficulty: 1,
            max_difficulty: 1,
            required_questions_to_unlock: 0,
            image_url: Some("/images/level1.svg".to_string()),
            color: "#4ade80".to_string(),
        },
        NewQuizLevel {
            name: "Level 2: Fortgeschritten".to_string(),
            description: "Erweiterte Konzepte und Anwendungsfälle".to_string(),
            order: 2,
            min_difficulty: 2,
            max_difficulty: 2,
            required_questions_to_unlock: 5,
            image_url: Some("/images/level2.svg".to_string()),
            color: "#facc15".to_string(),
        },
        NewQuizLevel {
            name: "Level 3: Experte".to_string(),
            description: "Komplexe Zusammenhänge und Prüfungs-Herausforderungen".to_string(),
            order: 3,
            min_difficulty: 3,
            max_difficulty: 3,
            required_questions_to_unlock: 10,
            image_url: Some("/images/level3.svg".to_string()),
            color: "#f87171".to_string(),
        },
    ]
}

/// Progress of one user at one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLevelProgress {
    pub id: i64,
    pub user_id: i64,
    pub level_id: i64,
    pub questions_completed: u32,
    pub questions_correct: u32,
    pub is_unlocked: bool,
    pub is_completed: bool,
    pub last_played: DateTime<Utc>,
}

impl UserLevelProgress {
    /// Completed once at least 80 % of the answered questions were correct.
    pub fn meets_completion(&self) -> bool {
        self.questions_completed > 0
            && self.questions_correct as f64 >= self.questions_completed as f64 * LEVEL_COMPLETION_RATIO
    }

    pub fn apply(&mut self, updates: UpdateLevelProgressRequest, now: DateTime<Utc>) {
        if let Some(v) = updates.questions_completed {
            self.questions_completed = v;
        }
        if let Some(v) = updates.questions_correct {
            self.questions_correct = v;
        }
        if let Some(v) = updates.is_unlocked {
            self.is_unlocked = v;
        }
        if let Some(v) = updates.is_completed {
            self.is_completed = v;
        }
        self.last_played = now;
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUserLevelProgress {
    #[validate(range(min = 1))]
    pub user_id: i64,

    #[validate(range(min = 1))]
    pub level_id: i64,

    #[serde(default)]
    #[validate(range(max = MAX_COUNTER_VALUE))]
    pub questions_completed: u32,

    #[serde(default)]
    #[validate(range(max = MAX_COUNTER_VALUE))]
    pub questions_correct: u32,

    #[serde(default)]
    pub is_unlocked: bool,

    #[serde(default)]
    pub is_completed: bool,
}

impl NewUserLevelProgress {
    pub fn into_progress(self, id: i64, now: DateTime<Utc>) -> UserLevelProgress {
        UserLevelProgress {
            id,
            user_id: self.user_id,
            level_id: self.level_id,
            questions_completed: self.questions_completed,
            questions_correct: self.questions_correct,
            is_unlocked: self.is_unlocked,
            is_completed: self.is_completed,
            last_played: now,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLevelProgressRequest {
    #[validate(range(max = MAX_COUNTER_VALUE))]
    pub questions_completed: Option<u32>,
    #[validate(range(max = MAX_COUNTER_VALUE))]
    pub questions_correct: Option<u32>,
    pub is_unlocked: Option<bool>,
    pub is_completed: Option<bool>,
}

/// Result of one finished quiz session at a level.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_session))]
pub struct LevelSessionRequest {
    #[validate(range(min = 1, max = 1000))]
    pub questions_answered: u32,
    pub questions_correct: u32,
}

fn validate_session(session: &LevelSessionRequest) -> Result<(), ValidationError> {
    if session.questions_correct > session.questions_answered {
        return Err(ValidationError::new("more_correct_than_answered"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSessionOutcome {
    pub progress: UserLevelProgress,
    /// Id of the level this session unlocked, if any.
    pub unlocked_level_id: Option<i64>,
}
