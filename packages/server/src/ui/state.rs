//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::IdentityProvider,
    usecase::{
        ClaimRewardUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        SendChatUseCase, StartTimerUseCase, UpdateStatusUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// Resolves the handshake token to an identity
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// UpdateStatusUseCase（ステータス更新のユースケース）
    pub update_status_usecase: Arc<UpdateStatusUseCase>,
    /// StartTimerUseCase（タイマー開始のユースケース）
    pub start_timer_usecase: Arc<StartTimerUseCase>,
    /// SendChatUseCase（チャット送信のユースケース）
    pub send_chat_usecase: Arc<SendChatUseCase>,
    /// ClaimRewardUseCase（報酬受け取りのユースケース）
    pub claim_reward_usecase: Arc<ClaimRewardUseCase>,
}
