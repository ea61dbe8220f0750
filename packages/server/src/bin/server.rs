//! Focus room server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin focusroom-server -- --identity s3cret:alice:1 --identity t0ken:bob:2
//! cargo run --bin focusroom-server -- --host 0.0.0.0 --port 3000 --claim-policy once-per-session
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use focusroom_server::{
    config::ServerConfig,
    infrastructure::{
        identity::InMemoryIdentityProvider,
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, InMemoryUserRepository},
    },
    ui::{Server, state::AppState},
    usecase::{
        ClaimRewardUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        ReapIdleRoomsUseCase, SendChatUseCase, StartTimerUseCase, UpdateStatusUseCase,
    },
};
use focusroom_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::parse();
    let threshold = match config.threshold() {
        Ok(threshold) => threshold,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize dependencies in order:
    // 1. Clock and collaborators
    // 2. Repositories
    // 3. MessagePusher
    // 4. UseCases
    // 5. AppState and Server

    // 1. Clock, identity provider
    let clock = Arc::new(SystemClock);
    let identity_provider = Arc::new(InMemoryIdentityProvider::new(config.identities.clone()));
    if identity_provider.is_empty() {
        tracing::warn!("No --identity configured, every connection will be rejected");
    } else {
        tracing::info!("Loaded {} identity token(s)", identity_provider.len());
    }

    // 2. Repositories (in-memory)
    let room_repository = Arc::new(InMemoryRoomRepository::new(clock.clone()));
    let user_repository = Arc::new(InMemoryUserRepository::new());

    // 3. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 4. UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        room_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        room_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let update_status_usecase = Arc::new(UpdateStatusUseCase::new(
        room_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let start_timer_usecase = Arc::new(StartTimerUseCase::new(
        room_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let send_chat_usecase = Arc::new(SendChatUseCase::new(
        room_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
        config.utc_offset_minutes,
    ));
    let claim_reward_usecase = Arc::new(ClaimRewardUseCase::new(
        room_repository.clone(),
        user_repository,
        clock.clone(),
        threshold,
        config.claim_policy.into(),
    ));
    let reap_idle_rooms_usecase = Arc::new(ReapIdleRoomsUseCase::new(
        room_repository,
        clock,
        config.room_idle_ttl_secs(),
    ));

    // 5. Create and run the server
    let app_state = Arc::new(AppState {
        identity_provider,
        connect_participant_usecase,
        disconnect_participant_usecase,
        update_status_usecase,
        start_timer_usecase,
        send_chat_usecase,
        claim_reward_usecase,
    });
    let server = Server::new(
        app_state,
        reap_idle_rooms_usecase,
        Duration::from_secs(config.reap_interval_secs),
    );
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
