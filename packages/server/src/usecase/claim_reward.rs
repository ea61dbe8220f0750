//! UseCase: 報酬受け取り処理
//!
//! A claim is accepted when the user's attendance in the current session
//! generation reaches the configured share of the session length. The room
//! stays locked until the counter is incremented, so a timer restart can not
//! slip in between the eligibility check and the increment.

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{
    AttendanceThreshold, ClaimPolicy, Eligibility, RoomId, RoomRepository, Timestamp, UserId,
    UserRepository,
};

use super::error::ClaimRewardError;

/// Accepted claim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaimReceipt {
    /// Counter value after the increment
    pub flowers: u64,
    pub eligibility: Eligibility,
}

/// 報酬受け取りのユースケース
pub struct ClaimRewardUseCase {
    repository: Arc<dyn RoomRepository>,
    user_repository: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    threshold: AttendanceThreshold,
    policy: ClaimPolicy,
}

impl ClaimRewardUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        user_repository: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
        threshold: AttendanceThreshold,
        policy: ClaimPolicy,
    ) -> Self {
        Self {
            repository,
            user_repository,
            clock,
            threshold,
            policy,
        }
    }

    /// Claim the reward of `user_id` for the session of `room_id`.
    ///
    /// # Errors
    ///
    /// * `NoActiveSession` - the room is unknown or never started a timer
    /// * `NotInSession` - the user has no attendance record in this generation
    /// * `LowAttendance` - the user attended less than the threshold
    /// * `AlreadyClaimed` - the policy allows one claim per generation
    /// * `Store` - the counter could not be incremented
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: UserId,
    ) -> Result<ClaimReceipt, ClaimRewardError> {
        let shared = self
            .repository
            .find(room_id)
            .await
            .ok_or(ClaimRewardError::NoActiveSession)?;
        let mut room = shared.lock().await;
        if room.is_retired() {
            return Err(ClaimRewardError::NoActiveSession);
        }
        let now = Timestamp::new(self.clock.now_millis());

        let eligibility = room.eligibility(user_id, now, self.threshold)?;
        if !eligibility.eligible {
            tracing::info!(
                "User {} claim rejected in room '{}': {}%",
                user_id,
                room_id,
                eligibility.percentage
            );
            return Err(ClaimRewardError::LowAttendance {
                present_minutes: eligibility.present_minutes(),
                required_minutes: eligibility.required_minutes(),
                percentage: eligibility.percentage,
            });
        }
        if !room.claim_permitted(self.policy, user_id) {
            return Err(ClaimRewardError::AlreadyClaimed);
        }

        let flowers = self.user_repository.increment(user_id).await?;
        room.record_claim(user_id);
        tracing::info!(
            "User {} claimed a reward in room '{}' (total {})",
            user_id,
            room_id,
            flowers
        );

        Ok(ClaimReceipt {
            flowers,
            eligibility,
        })
    }
}
