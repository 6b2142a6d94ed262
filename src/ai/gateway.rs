// src/ai/gateway.rs

use std::sync::Arc;

use crate::{
    ai::{AiError, TextGenerator, fallback::fallback_hints, parse, prompts},
    models::feedback::{FeedbackRequest, GradingResult, HintResponse, HintSource},
};

/// The four AI operations of the app on top of one `TextGenerator`.
#[derive(Clone)]
pub struct FeedbackGateway {
    generator: Arc<dyn TextGenerator>,
}

impl FeedbackGateway {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Grades a free-text answer.
    ///
    /// Only transport-level failures are errors. A reply in an unexpected
    /// shape still yields a result, scored 0.
    pub async fn grade_answer(&self, req: &FeedbackRequest) -> Result<GradingResult, AiError> {
        let prompt = prompts::grading_prompt(req);
        match self.generator.generate(&prompt).await {
            Ok(text) => Ok(parse::parse_grading_reply(&text, req.max_points)),
            Err(AiError::UnparseableResponse(reason)) => {
                tracing::warn!("Grading reply unusable, falling back: {}", reason);
                Ok(parse::parse_grading_reply("", req.max_points))
            }
            Err(e) => Err(e),
        }
    }

    /// Single-turn chat. No history is kept here.
    pub async fn chat(&self, message: &str) -> Result<String, AiError> {
        let text = self.generate(&prompts::chat_prompt(message)).await?;
        Ok(text.trim().to_string())
    }

    pub async fn study_tip(&self, prompt: &str) -> Result<String, AiError> {
        let text = self.generate(prompt).await?;
        Ok(parse::clean_tip(&text))
    }

    pub async fn question_hint(&self, prompt: &str) -> Result<String, AiError> {
        let text = self.generate(prompt).await?;
        Ok(text.trim().to_string())
    }

    /// Like `question_hint`, but never fails: on any error the category's
    /// canned hints are returned instead.
    pub async fn question_hint_or_fallback(
        &self,
        prompt: &str,
        question_id: Option<i64>,
        category: &str,
    ) -> HintResponse {
        match self.question_hint(prompt).await {
            Ok(hint) => HintResponse {
                hints: parse::extract_hints(&hint),
                hint,
                question_id,
                source: HintSource::Ai,
            },
            Err(e) => {
                tracing::warn!("Hint generation failed, using fallback hints: {}", e);
                let hints = fallback_hints(category);
                HintResponse {
                    hint: hints.join("\n"),
                    hints,
                    question_id,
                    source: HintSource::Fallback,
                }
            }
        }
    }

    /// Outside of grading an unusable reply has no fallback and is reported
    /// as a transport problem.
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.generator.generate(prompt).await.map_err(|e| match e {
            AiError::UnparseableResponse(reason) => AiError::Transport(reason),
            other => other,
        })
    }
}
