// src/handlers/ai.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    ai::{FeedbackGateway, prompts},
    config::DEFAULT_USER_ID,
    error::AppError,
    models::feedback::{ChatRequest, ChatResponse, FeedbackRequest, HintRequest, StudyTipRequest, StudyTipResponse},
    store::SharedStore,
};

/// Grades a free-text answer with the AI model.
pub async fn feedback(
    State(gateway): State<Arc<FeedbackGateway>>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let result = gateway.grade_answer(&payload).await?;
    Ok(Json(result))
}

pub async fn chat(
    State(gateway): State<Arc<FeedbackGateway>>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = gateway.chat(&payload.message).await?;
    Ok(Json(ChatResponse { response }))
}

/// Short motivational tip. Without a prompt one is built from the user's stats.
pub async fn study_tip(
    State(store): State<SharedStore>,
    State(gateway): State<Arc<FeedbackGateway>>,
    Json(payload): Json<StudyTipRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let prompt = match payload.prompt {
        Some(prompt) => prompt,
        None => {
            let user_id = payload.user_id.unwrap_or(DEFAULT_USER_ID);
            let store = store.read().await;
            let stats = store
                .stats(user_id)
                .ok_or(AppError::NotFound("User stats not found".to_string()))?;
            prompts::study_tip_prompt(stats, payload.category.as_deref())
        }
    };

    let tip = gateway.study_tip(&prompt).await?;
    Ok(Json(StudyTipResponse { tip }))
}

/// Hint for a question that does not give the answer away.
///
/// Never fails because of the model: canned hints for the question's
/// category are returned instead.
pub async fn question_hint(
    State(store): State<SharedStore>,
    State(gateway): State<Arc<FeedbackGateway>>,
    Json(payload): Json<HintRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = match payload.question_id {
        Some(id) => Some(
            store
                .read()
                .await
                .question(id)
                .cloned()
                .ok_or(AppError::NotFound("Question not found".to_string()))?,
        ),
        None => None,
    };

    let prompt = match (payload.prompt, &question) {
        (Some(prompt), _) => prompt,
        (None, Some(question)) => prompts::hint_prompt(&question.question_text),
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either a prompt or a questionId is required".to_string(),
            ));
        }
    };

    let category = question
        .map(|q| q.category)
        .or(payload.category)
        .unwrap_or_default();

    let response = gateway
        .question_hint_or_fallback(&prompt, payload.question_id, &category)
        .await;
    Ok(Json(response))
}
