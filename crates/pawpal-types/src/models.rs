use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ids are plain strings: seed records use readable ids ("owner1", "pet3"),
/// records created at runtime get UUID-v4 ids via [`new_id`].
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Owner,
    Lover,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: String,
    pub location: String,
}

/// A titled care instruction (standard operating procedure) for a pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SopItem {
    pub id: String,
    pub title: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
    pub description: String,
    pub image_url: String,
    pub sops: Vec<SopItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub pet_id: String,
    pub owner_id: String,
    pub lover_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    pub total_price: f64,
}

/// Chat message within a booking. `timestamp` is epoch milliseconds and is
/// the ordering key for transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub booking_id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub booking_id: String,
    pub reviewer_id: String,
    /// The user being reviewed.
    pub target_id: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_wire_format_is_upper_case() {
        assert_eq!(serde_json::to_string(&UserRole::Owner).unwrap(), "\"OWNER\"");
        assert_eq!(serde_json::to_string(&UserRole::Lover).unwrap(), "\"LOVER\"");
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn booking_round_trips_with_camel_case_keys() {
        let json = r#"{
            "id": "b1",
            "petId": "pet1",
            "ownerId": "owner1",
            "loverId": "lover1",
            "startDate": "2023-11-10",
            "endDate": "2023-11-12",
            "status": "PENDING",
            "totalPrice": 150.0
        }"#;

        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.pet_id, "pet1");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.start_date.to_string(), "2023-11-10");

        let back = serde_json::to_value(&booking).unwrap();
        assert_eq!(back["petId"], "pet1");
        assert_eq!(back["startDate"], "2023-11-10");
    }
}
