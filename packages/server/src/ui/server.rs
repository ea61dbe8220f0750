//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::usecase::ReapIdleRoomsUseCase;

use super::{
    handler::{claim_reward, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Routes of the focus room server
pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws/{room_id}", get(websocket_handler))
        // HTTP エンドポイント
        .route("/user/{user_id}/claim-reward", post(claim_reward))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Focus room server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, reap_idle_rooms_usecase, Duration::from_secs(60));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    /// ReapIdleRoomsUseCase（空き部屋回収のユースケース）
    reap_idle_rooms_usecase: Arc<ReapIdleRoomsUseCase>,
    reap_interval: Duration,
}

impl Server {
    pub fn new(
        app_state: Arc<AppState>,
        reap_idle_rooms_usecase: Arc<ReapIdleRoomsUseCase>,
        reap_interval: Duration,
    ) -> Self {
        Self {
            app_state,
            reap_idle_rooms_usecase,
            reap_interval,
        }
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.app_state);

        let reaper = if self.reap_idle_rooms_usecase.idle_ttl_secs() > 0 {
            Some(spawn_reaper(self.reap_idle_rooms_usecase, self.reap_interval))
        } else {
            tracing::info!("Room expiry disabled");
            None
        };

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Focus room server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/{{room_id}}?token=...", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Some(reaper) = reaper {
            reaper.abort();
        }
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn spawn_reaper(
    usecase: Arc<ReapIdleRoomsUseCase>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            usecase.execute().await;
        }
    })
}
