use serde::{Deserialize, Serialize};

use crate::models::{BookingStatus, Message};

/// Events pushed over the WebSocket gateway. Clients that cannot hold a
/// socket open can fall back to polling the REST endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MarketEvent {
    /// A chat message was posted to a booking.
    MessageCreated { message: Message },

    /// A booking changed status (accepted, rejected, completed).
    BookingUpdated {
        booking_id: String,
        status: BookingStatus,
    },
}

impl MarketEvent {
    /// The booking this event is scoped to.
    pub fn booking_id(&self) -> &str {
        match self {
            Self::MessageCreated { message } => &message.booking_id,
            Self::BookingUpdated { booking_id, .. } => booking_id,
        }
    }
}

/// Commands sent FROM client TO server over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayCommand {
    /// Scope the connection to specific bookings. An empty list (the
    /// default for a fresh connection) means all events are delivered.
    Subscribe { booking_ids: Vec<String> },
}
