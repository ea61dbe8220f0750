//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{AuthError, ConnectionId, DurationMinutes, Identity, ParticipantStatus, RoomId},
    infrastructure::dto::websocket::InboundAction,
    ui::state::AppState,
    usecase::SendChatError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(default)]
    pub token: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = match RoomId::try_from(room_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid room id: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // The upgrade always completes so a rejected client sees a policy close code
    match state.identity_provider.authenticate(&query.token).await {
        Ok(identity) => {
            tracing::info!(
                "Authenticated '{}' ({}) for room '{}'",
                identity.username,
                identity.user_id,
                room_id
            );
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, identity)))
        }
        Err(e) => {
            tracing::warn!("Rejecting connection to room '{}': {}", room_id, e);
            Ok(ws.on_upgrade(move |socket| reject_socket(socket, e)))
        }
    }
}

async fn reject_socket(mut socket: WebSocket, reason: AuthError) {
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: Utf8Bytes::from(reason.to_string()),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send policy close frame: {}", e);
    }
}

/// Spawns a task that drains the connection's outbound channel into the socket.
///
/// The channel closes once the room drops this connection, either evicted
/// by a newer one or pruned; the socket is then closed from the server side.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return;
            }
        }
        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: Utf8Bytes::from_static("connection closed by server"),
        };
        let _ = sender.send(Message::Close(Some(frame))).await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId, identity: Identity) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let username = identity.username.clone();

    let connected = state
        .connect_participant_usecase
        .execute(&room_id, identity, tx)
        .await;
    let connection_id = connected.connection_id;

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let room_id_clone = room_id.clone();
    let username_clone = username.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error from '{}': {}", username_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_action(&state_clone, &room_id_clone, connection_id, text.as_str())
                        .await;
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", username_clone);
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state
        .disconnect_participant_usecase
        .execute(&room_id, connection_id)
        .await
    {
        tracing::info!("'{}' disconnected from room '{}'", username, room_id);
    }
}

/// Route one inbound frame to its use case. Invalid frames are dropped.
async fn dispatch_action(
    state: &AppState,
    room_id: &RoomId,
    connection_id: ConnectionId,
    text: &str,
) {
    let Some(action) = InboundAction::parse(text) else {
        return;
    };

    let result = match action {
        InboundAction::StartTimer { duration } => match DurationMinutes::try_from(duration) {
            Ok(duration) => state
                .start_timer_usecase
                .execute(room_id, connection_id, duration)
                .await
                .map(|_| ()),
            Err(e) => {
                tracing::warn!("Ignoring START_TIMER from {}: {}", connection_id, e);
                return;
            }
        },
        InboundAction::Fail => {
            state
                .update_status_usecase
                .execute(room_id, connection_id, ParticipantStatus::Failed)
                .await
        }
        InboundAction::Rejoin => {
            state
                .update_status_usecase
                .execute(room_id, connection_id, ParticipantStatus::Focusing)
                .await
        }
        InboundAction::Chat { message } => {
            match state
                .send_chat_usecase
                .execute(room_id, connection_id, message)
                .await
            {
                Ok(()) => {}
                Err(e @ SendChatError::InvalidMessage(_)) => {
                    tracing::warn!("Dropping chat from {}: {}", connection_id, e);
                }
                Err(e) => tracing::debug!("Dropping chat from {}: {}", connection_id, e),
            }
            return;
        }
        InboundAction::Unrecognized => {
            tracing::debug!("Ignoring unknown action from {}", connection_id);
            return;
        }
    };

    if let Err(e) = result {
        tracing::debug!("Ignoring action from {}: {}", connection_id, e);
    }
}
