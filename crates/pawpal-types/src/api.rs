use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{SopItem, UserRole};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
}

// -- Pets --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub owner_id: String,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub sops: Vec<SopItem>,
}

// -- Bookings --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub pet_id: String,
    pub lover_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBookingStatusRequest {
    pub status: crate::models::BookingStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub user_id: String,
    pub role: UserRole,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_id: String,
    pub text: String,
}

// -- Reviews --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub booking_id: String,
    pub reviewer_id: String,
    pub target_id: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct PendingReviewQuery {
    pub role: UserRole,
}

// -- AI assist --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateSopsRequest {
    pub species: String,
    pub breed: String,
    pub age: u32,
    pub personality: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub booking_id: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SafetyTipRequest {
    pub pet_id: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct SafetyTipResponse {
    pub tip: String,
}
