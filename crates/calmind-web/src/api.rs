//! REST API endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use calmind::companion::Companion;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::sound::{AmbientSound, SoundChoice};

/// Shown when a request fails; details stay in the server log.
pub const GENERIC_FAILURE: &str =
    "Something went wrong while preparing a response. Please try again.";

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub companion: Arc<Companion>,
}

/// Request body for POST /api/submit.
#[derive(Deserialize)]
pub struct SubmitRequest {
    pub message: String,
    /// Dropdown label; absent or unknown means no sound.
    #[serde(default)]
    pub sound: Option<String>,
}

/// Response body for POST /api/submit.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub reply: String,
    pub audio: Option<&'static str>,
    pub mood: Option<&'static str>,
    pub clarification: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// POST /api/submit — Answer one message and resolve the sound choice.
///
/// Returns 200 with the reply, or 502 if any stage failed.
pub async fn post_submit(State(app): State<AppState>, Json(body): Json<SubmitRequest>) -> Response {
    let sound = body
        .sound
        .as_deref()
        .map_or(AmbientSound::None, AmbientSound::from_label);

    match app.companion.handle(&body.message).await {
        Ok(reply) => {
            info!(
                "Submit: clarification={}, sound={}",
                reply.is_clarification(),
                sound.label()
            );
            Json(SubmitResponse {
                audio: sound.audio_ref(),
                mood: reply.mood().map(|m| m.name()),
                clarification: reply.is_clarification(),
                reply: reply.into_text(),
            })
            .into_response()
        }
        Err(e) => {
            error!("Submit failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: GENERIC_FAILURE,
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/sounds — Dropdown choices in display order.
pub async fn get_sounds() -> Json<Vec<SoundChoice>> {
    Json(AmbientSound::ALL.into_iter().map(SoundChoice::from).collect())
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_sound_is_optional() {
        let req: SubmitRequest = serde_json::from_str(r#"{"message":"hello there"}"#).unwrap();
        assert_eq!(req.message, "hello there");
        assert!(req.sound.is_none());

        let req: SubmitRequest =
            serde_json::from_str(r#"{"message":"hi","sound":"Rain Sounds"}"#).unwrap();
        assert_eq!(req.sound.as_deref(), Some("Rain Sounds"));
    }

    #[test]
    fn submit_response_serializes_nulls() {
        let resp = SubmitResponse {
            reply: "r".into(),
            audio: None,
            mood: None,
            clarification: true,
        };
        let json = serde_json::to_value(resp).unwrap();
        assert!(json["audio"].is_null());
        assert_eq!(json["clarification"], true);
    }
}
