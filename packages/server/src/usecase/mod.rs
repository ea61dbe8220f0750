//! UseCase layer: one struct per operation, wired to the domain interfaces.

mod broadcast;
mod claim_reward;
mod connect_participant;
mod disconnect_participant;
mod error;
mod member;
mod reap_rooms;
mod send_chat;
mod start_timer;
mod update_status;

pub use claim_reward::{ClaimReceipt, ClaimRewardUseCase};
pub use connect_participant::{ConnectParticipantUseCase, ConnectedParticipant};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ClaimRewardError, RoomCommandError, SendChatError};
pub use reap_rooms::ReapIdleRoomsUseCase;
pub use send_chat::SendChatUseCase;
pub use start_timer::StartTimerUseCase;
pub use update_status::UpdateStatusUseCase;
