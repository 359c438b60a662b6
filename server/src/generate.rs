//! Similar-question generation.
//!
//! One-shot pass-through to a chat-completion service. The caller's own
//! stored api key pays for the call; the prompt and sampling parameters
//! are fixed here and not client-controllable.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;

use crate::auth::ApiUser;
use crate::error::AppError;
use crate::state::AppState;

const SYSTEM_PROMPT: &str = "あなたは教育専門のAIアシスタントです。与えられた過去問に基づいて、類似した問題を生成してください。問題の難易度と形式は元の問題と同程度にしてください。";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub exam_content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_content: String,
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if request.exam_content.trim().is_empty() {
        return Err(AppError::BadRequest("過去問の内容が必要です".to_string()));
    }

    let api_key = state.credentials.get(&user.id).await?.ok_or_else(|| {
        AppError::BadRequest("APIキーが設定されていません。設定画面で登録してください。".to_string())
    })?;

    let body = json!({
        "model": "gpt-4o-mini",
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            {
                "role": "user",
                "content": format!(
                    "以下の過去問に基づいて、類似した問題を1つ生成してください：\n\n{}",
                    request.exam_content
                ),
            },
        ],
        "temperature": 0.7,
        "max_tokens": 1000,
    });

    let response = state
        .http
        .post(&state.config.completion_url)
        .bearer_auth(&api_key)
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            error!("completion request failed: {err}");
            AppError::Upstream("AI APIの呼び出しに失敗しました。APIキーを確認してください。".to_string())
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        error!("completion api returned {status}: {detail}");
        return Err(AppError::Upstream(
            "AI APIの呼び出しに失敗しました。APIキーを確認してください。".to_string(),
        ));
    }

    let data: Value = response.json().await.map_err(|err| {
        error!("completion response unreadable: {err}");
        AppError::Upstream("類題の生成に失敗しました".to_string())
    })?;

    let generated = data["choices"][0]["message"]["content"]
        .as_str()
        .filter(|content| !content.is_empty())
        .ok_or_else(|| AppError::Upstream("類題の生成に失敗しました".to_string()))?;

    Ok(Json(GenerateResponse {
        generated_content: generated.to_string(),
    }))
}
