//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{RoomId, UserId},
    infrastructure::dto::http::{
        ClaimRewardQuery, ClaimSuccessDto, ErrorDetailDto, ErrorResponseDto, LowAttendanceDto,
    },
    ui::state::AppState,
    usecase::ClaimRewardError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Claim the attendance reward of `user_id` for the session of `room_id`
pub async fn claim_reward(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(query): Query<ClaimRewardQuery>,
) -> Response {
    let room_id = match RoomId::try_from(query.room_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Rejecting claim with invalid room id: {}", e);
            return error_detail(StatusCode::BAD_REQUEST, "INVALID_ROOM_ID", e.to_string());
        }
    };

    match state
        .claim_reward_usecase
        .execute(&room_id, UserId::new(user_id))
        .await
    {
        Ok(receipt) => Json(ClaimSuccessDto {
            status: "success".to_string(),
            flowers: receipt.flowers,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for ClaimRewardError {
    fn into_response(self) -> Response {
        match self {
            ClaimRewardError::LowAttendance {
                present_minutes,
                required_minutes,
                percentage,
            } => (
                StatusCode::FORBIDDEN,
                Json(ErrorResponseDto {
                    detail: LowAttendanceDto {
                        error_code: "LOW_ATTENDANCE".to_string(),
                        present: present_minutes,
                        required: required_minutes,
                        percentage,
                    },
                }),
            )
                .into_response(),
            ClaimRewardError::NoActiveSession => error_detail(
                StatusCode::BAD_REQUEST,
                "NO_ACTIVE_SESSION",
                self.to_string(),
            ),
            ClaimRewardError::NotInSession => {
                error_detail(StatusCode::BAD_REQUEST, "NOT_IN_SESSION", self.to_string())
            }
            ClaimRewardError::AlreadyClaimed => {
                error_detail(StatusCode::CONFLICT, "ALREADY_CLAIMED", self.to_string())
            }
            ClaimRewardError::Store(e) => {
                tracing::error!("Reward counter update failed: {}", e);
                error_detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_UNAVAILABLE",
                    "reward counter could not be updated".to_string(),
                )
            }
        }
    }
}

fn error_detail(status: StatusCode, error_code: &str, message: String) -> Response {
    (
        status,
        Json(ErrorResponseDto {
            detail: ErrorDetailDto {
                error_code: error_code.to_string(),
                message,
            },
        }),
    )
        .into_response()
}
