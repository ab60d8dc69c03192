use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use pawpal_types::api::SendMessageRequest;
use pawpal_types::events::MarketEvent;
use pawpal_types::models::{Message, new_id};

use crate::{AppState, blocking};

pub async fn get_messages(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let messages = blocking(move || state.market.messages(&booking_id)).await?;
    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.text.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let message = Message {
        id: new_id(),
        booking_id,
        sender_id: req.sender_id,
        text: req.text,
        timestamp: chrono::Utc::now().timestamp_millis(),
    };

    let stored = message.clone();
    blocking({
        let state = state.clone();
        move || state.market.send_message(stored)
    })
    .await?;

    // Push to subscribed WebSocket clients; pollers pick it up on next read.
    state.dispatcher.publish(MarketEvent::MessageCreated {
        message: message.clone(),
    });

    Ok((StatusCode::CREATED, Json(message)))
}
