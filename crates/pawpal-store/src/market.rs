//! Domain accessors over an injected [`Store`]. Every operation loads a
//! whole collection (seeding it on first access), applies a linear
//! filter/find/push, and saves the collection back when it mutated.

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use pawpal_types::models::{Booking, BookingStatus, Message, Pet, Review, User, UserRole};

use crate::{Store, seed};

const USERS: &str = "users";
const PETS: &str = "pets";
const BOOKINGS: &str = "bookings";
const MESSAGES: &str = "messages";
const REVIEWS: &str = "reviews";

pub struct Marketplace {
    store: Box<dyn Store>,
}

impl Marketplace {
    pub fn new(store: Box<dyn Store>) -> Self {
        Self { store }
    }

    fn load_collection<T: DeserializeOwned + Serialize>(
        &self,
        key: &str,
        seed: fn() -> Vec<T>,
    ) -> Result<Vec<T>> {
        match self.store.load(key)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => {
                let items = seed();
                debug!("Seeding collection '{}' ({} records)", key, items.len());
                self.save_collection(key, &items)?;
                Ok(items)
            }
        }
    }

    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        self.store.save(key, &serde_json::to_string(items)?)
    }

    // -- Auth --

    /// Email lookup, case-insensitive. `None` means invalid credentials.
    pub fn login(&self, email: &str) -> Result<Option<User>> {
        let users = self.load_collection(USERS, seed::users)?;
        Ok(users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    /// Returns `false` without mutating when the email is already taken.
    pub fn register(&self, user: User) -> Result<bool> {
        let mut users = self.load_collection(USERS, seed::users)?;
        if users.iter().any(|u| u.email == user.email) {
            return Ok(false);
        }
        users.push(user);
        self.save_collection(USERS, &users)?;
        Ok(true)
    }

    pub fn user(&self, id: &str) -> Result<Option<User>> {
        let users = self.load_collection(USERS, seed::users)?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    // -- Pets --

    pub fn pets(&self) -> Result<Vec<Pet>> {
        self.load_collection(PETS, seed::pets)
    }

    pub fn pets_by_owner(&self, owner_id: &str) -> Result<Vec<Pet>> {
        let mut pets = self.pets()?;
        pets.retain(|p| p.owner_id == owner_id);
        Ok(pets)
    }

    pub fn pet(&self, id: &str) -> Result<Option<Pet>> {
        Ok(self.pets()?.into_iter().find(|p| p.id == id))
    }

    pub fn add_pet(&self, pet: Pet) -> Result<()> {
        let mut pets = self.pets()?;
        pets.push(pet);
        self.save_collection(PETS, &pets)
    }

    /// Replaces the record with a matching id; unknown ids are a no-op.
    pub fn update_pet(&self, pet: Pet) -> Result<bool> {
        let mut pets = self.pets()?;
        match pets.iter_mut().find(|p| p.id == pet.id) {
            Some(slot) => {
                *slot = pet;
                self.save_collection(PETS, &pets)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// No cascade: the pet's bookings and messages are left in place.
    pub fn delete_pet(&self, id: &str) -> Result<()> {
        let mut pets = self.pets()?;
        pets.retain(|p| p.id != id);
        self.save_collection(PETS, &pets)
    }

    // -- Bookings --

    pub fn bookings(&self) -> Result<Vec<Booking>> {
        self.load_collection(BOOKINGS, seed::bookings)
    }

    pub fn bookings_for_user(&self, user_id: &str, role: UserRole) -> Result<Vec<Booking>> {
        let mut bookings = self.bookings()?;
        bookings.retain(|b| match role {
            UserRole::Owner => b.owner_id == user_id,
            UserRole::Lover => b.lover_id == user_id,
        });
        Ok(bookings)
    }

    pub fn booking(&self, id: &str) -> Result<Option<Booking>> {
        Ok(self.bookings()?.into_iter().find(|b| b.id == id))
    }

    pub fn create_booking(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.bookings()?;
        bookings.push(booking);
        self.save_collection(BOOKINGS, &bookings)
    }

    /// Applies a status transition. Unknown ids and illegal transitions are
    /// a no-op returning `false`. Legal transitions:
    /// PENDING -> ACCEPTED | REJECTED, ACCEPTED -> COMPLETED.
    pub fn update_booking_status(&self, id: &str, status: BookingStatus) -> Result<bool> {
        let mut bookings = self.bookings()?;
        let Some(booking) = bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(false);
        };

        let legal = matches!(
            (booking.status, status),
            (BookingStatus::Pending, BookingStatus::Accepted)
                | (BookingStatus::Pending, BookingStatus::Rejected)
                | (BookingStatus::Accepted, BookingStatus::Completed)
        );
        if !legal {
            return Ok(false);
        }

        booking.status = status;
        self.save_collection(BOOKINGS, &bookings)?;
        Ok(true)
    }

    // -- Messages --

    /// All messages for a booking, ascending by timestamp regardless of the
    /// order they were appended in.
    pub fn messages(&self, booking_id: &str) -> Result<Vec<Message>> {
        let mut messages = self.load_collection(MESSAGES, seed::messages)?;
        messages.retain(|m| m.booking_id == booking_id);
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    pub fn last_message(&self, booking_id: &str) -> Result<Option<Message>> {
        Ok(self.messages(booking_id)?.pop())
    }

    pub fn send_message(&self, message: Message) -> Result<()> {
        let mut messages = self.load_collection(MESSAGES, seed::messages)?;
        messages.push(message);
        self.save_collection(MESSAGES, &messages)
    }

    // -- Reviews --

    pub fn reviews_for(&self, target_id: &str) -> Result<Vec<Review>> {
        let mut reviews = self.load_collection(REVIEWS, seed::reviews)?;
        reviews.retain(|r| r.target_id == target_id);
        Ok(reviews)
    }

    /// One review per (booking, reviewer) pair. Returns `false` without
    /// mutating when that pair already reviewed.
    pub fn add_review(&self, review: Review) -> Result<bool> {
        let mut reviews = self.load_collection(REVIEWS, seed::reviews)?;
        if reviews
            .iter()
            .any(|r| r.booking_id == review.booking_id && r.reviewer_id == review.reviewer_id)
        {
            return Ok(false);
        }
        reviews.push(review);
        self.save_collection(REVIEWS, &reviews)?;
        Ok(true)
    }

    /// Completed bookings involving the user (on their role's side) that the
    /// user has not reviewed yet.
    pub fn pending_reviews(&self, user_id: &str, role: UserRole) -> Result<Vec<Booking>> {
        let reviews = self.load_collection(REVIEWS, seed::reviews)?;
        let mut completed = self.bookings_for_user(user_id, role)?;
        completed.retain(|b| b.status == BookingStatus::Completed);
        completed.retain(|b| {
            !reviews
                .iter()
                .any(|r| r.booking_id == b.id && r.reviewer_id == user_id)
        });
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::NaiveDate;
    use pawpal_types::models::new_id;

    fn market() -> Marketplace {
        Marketplace::new(Box::new(MemoryStore::new()))
    }

    fn test_user(id: &str, email: &str, role: UserRole) -> User {
        User {
            id: id.into(),
            name: "Test User".into(),
            email: email.into(),
            role,
            avatar_url: String::new(),
            location: String::new(),
        }
    }

    fn test_message(booking_id: &str, timestamp: i64) -> Message {
        Message {
            id: new_id(),
            booking_id: booking_id.into(),
            sender_id: "lover1".into(),
            text: "hi".into(),
            timestamp,
        }
    }

    fn test_review(booking_id: &str, reviewer_id: &str, target_id: &str) -> Review {
        Review {
            id: new_id(),
            booking_id: booking_id.into(),
            reviewer_id: reviewer_id.into(),
            target_id: target_id.into(),
            rating: 5,
            comment: "great".into(),
            created_at: NaiveDate::from_ymd_opt(2023, 10, 4).unwrap(),
        }
    }

    #[test]
    fn register_rejects_duplicate_email() {
        let m = market();
        let before = m.load_collection(USERS, seed::users).unwrap().len();

        let dup = test_user("x1", "sarah@example.com", UserRole::Owner);
        assert!(!m.register(dup).unwrap());
        assert_eq!(m.load_collection(USERS, seed::users).unwrap().len(), before);
    }

    #[test]
    fn register_new_email_is_retrievable() {
        let m = market();
        let user = test_user("x2", "new@example.com", UserRole::Lover);
        assert!(m.register(user).unwrap());

        let found = m.login("NEW@example.com").unwrap().unwrap();
        assert_eq!(found.id, "x2");
    }

    #[test]
    fn login_unknown_email_is_none() {
        let m = market();
        assert!(m.login("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn pets_by_owner_preserves_insertion_order() {
        let m = market();
        let pets = m.pets_by_owner("owner1").unwrap();
        let ids: Vec<&str> = pets.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["pet1", "pet2", "pet5", "pet10"]);
        assert!(pets.iter().all(|p| p.owner_id == "owner1"));
    }

    #[test]
    fn update_pet_unknown_id_is_noop() {
        let m = market();
        let mut pet = m.pet("pet1").unwrap().unwrap();
        pet.id = "missing".into();
        assert!(!m.update_pet(pet).unwrap());
        assert_eq!(m.pets().unwrap().len(), 10);
    }

    #[test]
    fn delete_pet_does_not_cascade() {
        let m = market();
        m.delete_pet("pet1").unwrap();
        assert!(m.pet("pet1").unwrap().is_none());
        // b1 references pet1 and survives
        assert!(m.booking("b1").unwrap().is_some());
    }

    #[test]
    fn messages_sorted_by_timestamp_regardless_of_insertion() {
        let m = market();
        m.send_message(test_message("b9", 300)).unwrap();
        m.send_message(test_message("b9", 100)).unwrap();
        m.send_message(test_message("b9", 200)).unwrap();

        let msgs = m.messages("b9").unwrap();
        let stamps: Vec<i64> = msgs.iter().map(|m| m.timestamp).collect();
        assert_eq!(stamps, vec![100, 200, 300]);
        assert!(msgs.iter().all(|m| m.booking_id == "b9"));

        assert_eq!(m.last_message("b9").unwrap().unwrap().timestamp, 300);
    }

    #[test]
    fn booking_status_pending_to_accepted_is_visible() {
        let m = market();
        assert!(m.update_booking_status("b1", BookingStatus::Accepted).unwrap());
        assert_eq!(
            m.booking("b1").unwrap().unwrap().status,
            BookingStatus::Accepted
        );
    }

    #[test]
    fn booking_status_unknown_id_is_noop() {
        let m = market();
        assert!(!m.update_booking_status("missing", BookingStatus::Accepted).unwrap());
    }

    #[test]
    fn booking_status_illegal_transition_rejected() {
        let m = market();
        // b2 is COMPLETED, nothing may follow
        assert!(!m.update_booking_status("b2", BookingStatus::Accepted).unwrap());
        // PENDING cannot jump straight to COMPLETED
        assert!(!m.update_booking_status("b1", BookingStatus::Completed).unwrap());
        assert_eq!(
            m.booking("b1").unwrap().unwrap().status,
            BookingStatus::Pending
        );
    }

    #[test]
    fn accepted_booking_can_complete() {
        let m = market();
        assert!(m.update_booking_status("b3", BookingStatus::Completed).unwrap());
        assert_eq!(
            m.booking("b3").unwrap().unwrap().status,
            BookingStatus::Completed
        );
    }

    #[test]
    fn reviews_filtered_by_target() {
        let m = market();
        let reviews = m.reviews_for("lover1").unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].id, "r1");
    }

    #[test]
    fn duplicate_review_per_booking_and_reviewer_rejected() {
        let m = market();
        // owner2 already reviewed b2 in the seed
        assert!(!m.add_review(test_review("b2", "owner2", "lover1")).unwrap());
        // a different reviewer on the same booking is fine
        assert!(m.add_review(test_review("b2", "owner3", "lover1")).unwrap());
    }

    #[test]
    fn pending_reviews_excludes_already_reviewed() {
        let m = market();
        // b2 is COMPLETED; both sides already reviewed it in the seed
        assert!(m.pending_reviews("owner2", UserRole::Owner).unwrap().is_empty());
        assert!(m.pending_reviews("lover1", UserRole::Lover).unwrap().is_empty());

        // complete b3 — lover2 now owes a review, owner1 too
        assert!(m.update_booking_status("b3", BookingStatus::Completed).unwrap());
        let pending = m.pending_reviews("lover2", UserRole::Lover).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "b3");

        // once the review lands it drops out
        assert!(m.add_review(test_review("b3", "lover2", "owner1")).unwrap());
        assert!(m.pending_reviews("lover2", UserRole::Lover).unwrap().is_empty());
    }

    #[test]
    fn first_access_writes_seed_through_the_store() {
        let store = MemoryStore::new();
        assert!(store.load("users").unwrap().is_none());

        let m = Marketplace::new(Box::new(store));
        assert_eq!(m.pets().unwrap().len(), 10);
        // second read comes from the stored copy, not the seed fn
        m.delete_pet("pet1").unwrap();
        assert_eq!(m.pets().unwrap().len(), 9);
    }
}
