//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Query of `POST /user/{user_id}/claim-reward`
#[derive(Debug, Deserialize)]
pub struct ClaimRewardQuery {
    pub room_id: String,
}

/// Successful claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSuccessDto {
    pub status: String,
    /// Counter value after the increment
    pub flowers: u64,
}

/// Error envelope, `{"detail": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponseDto<T> {
    pub detail: T,
}

/// Diagnostic payload of a low-attendance rejection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowAttendanceDto {
    pub error_code: String,
    /// Minutes present, one decimal
    pub present: f64,
    /// Minutes required, one decimal
    pub required: f64,
    pub percentage: i64,
}

/// Any other claim rejection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetailDto {
    pub error_code: String,
    pub message: String,
}
