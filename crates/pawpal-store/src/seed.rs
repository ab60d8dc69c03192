//! Default collection contents, written to the store on first access.
//! Mirrors the demo data the marketplace ships with.

use chrono::NaiveDate;

use pawpal_types::models::{
    Booking, BookingStatus, Message, Pet, Review, SopItem, User, UserRole,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date")
}

fn user(id: &str, name: &str, email: &str, role: UserRole, location: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        role,
        avatar_url: format!("https://i.pravatar.cc/150?u={}", name.split(' ').next().unwrap_or(id).to_lowercase()),
        location: location.into(),
    }
}

fn sop(id: &str, title: &str, instruction: &str) -> SopItem {
    SopItem {
        id: id.into(),
        title: title.into(),
        instruction: instruction.into(),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("owner1", "Sarah Jenkins", "sarah@example.com", UserRole::Owner, "San Francisco, CA"),
        user("lover1", "Mike Ross", "mike@example.com", UserRole::Lover, "San Francisco, CA"),
        user("owner2", "David Kim", "david@example.com", UserRole::Owner, "San Mateo, CA"),
        user("lover2", "Emily Chen", "emily@example.com", UserRole::Lover, "Oakland, CA"),
        user("owner3", "Jessica Wong", "jessica@example.com", UserRole::Owner, "Berkeley, CA"),
        user("lover3", "Tom Holland", "tom@example.com", UserRole::Lover, "Daly City, CA"),
    ]
}

pub fn pets() -> Vec<Pet> {
    let pet = |id: &str, owner_id: &str, name: &str, species: &str, breed: &str, age: u32,
               description: &str, image_url: &str, sops: Vec<SopItem>| Pet {
        id: id.into(),
        owner_id: owner_id.into(),
        name: name.into(),
        species: species.into(),
        breed: breed.into(),
        age,
        description: description.into(),
        image_url: image_url.into(),
        sops,
    };

    vec![
        pet(
            "pet1", "owner1", "Bella", "Dog", "Golden Retriever", 3,
            "Friendly, loves balls, hates the vacuum. Very good with kids.",
            "https://images.unsplash.com/photo-1552053831-71594a27632d?auto=format&fit=crop&w=800&q=80",
            vec![
                sop("s1", "Feeding", "2 cups of kibble at 8am and 6pm."),
                sop("s2", "Walks", "Needs 30 mins walk twice a day."),
            ],
        ),
        pet(
            "pet2", "owner1", "Luna", "Cat", "Siamese", 5,
            "Vocal, independent, loves high places. Will tap you for food.",
            "https://images.unsplash.com/photo-1513245543132-31f507417b26?auto=format&fit=crop&w=800&q=80",
            vec![sop("s3", "Litter", "Scoop daily.")],
        ),
        pet(
            "pet3", "owner2", "Rocky", "Dog", "French Bulldog", 2,
            "Lazy but lovable. Snorting is normal. Do not over-exercise.",
            "https://images.unsplash.com/photo-1583511655857-d19b40a7a54e?auto=format&fit=crop&w=800&q=80",
            vec![sop("s4", "Temperature", "Keep him cool, he overheats easily.")],
        ),
        pet(
            "pet4", "owner2", "Coco", "Bird", "Cockatiel", 1,
            "Sings the Addams Family theme song. Loves seeds.",
            "https://images.unsplash.com/photo-1552728089-57bdde30ebd1?auto=format&fit=crop&w=800&q=80",
            vec![sop("s5", "Cage", "Cover cage at 8pm sharp.")],
        ),
        pet(
            "pet5", "owner1", "Max", "Dog", "German Shepherd", 4,
            "Very protective but gentle with family. Loves frisbee.",
            "https://images.unsplash.com/photo-1589941013453-ec89f33b5e95?auto=format&fit=crop&w=800&q=80",
            vec![sop("s6", "Exercise", "Needs lots of running.")],
        ),
        pet(
            "pet6", "owner3", "Thumper", "Rabbit", "Holland Lop", 1,
            "Loves cilantro. Hops everywhere. Watch your cables!",
            "https://images.unsplash.com/photo-1585110396065-ec326e297097?auto=format&fit=crop&w=800&q=80",
            vec![
                sop("s7", "Diet", "Unlimited hay. 1/4 cup pellets."),
                sop("s8", "Handling", "Support the bum when holding."),
            ],
        ),
        pet(
            "pet7", "owner3", "Shadow", "Cat", "Bombay", 4,
            "A void that stares back. Very cuddly though.",
            "https://images.unsplash.com/photo-1573865526739-10659fec78a5?auto=format&fit=crop&w=800&q=80",
            vec![sop("s9", "Toys", "Laser pointer is life.")],
        ),
        pet(
            "pet8", "owner2", "Cooper", "Dog", "Australian Shepherd", 2,
            "High energy! Needs a job to do or he gets bored.",
            "https://images.unsplash.com/photo-1596492784531-6e6eb5ea9205?auto=format&fit=crop&w=800&q=80",
            vec![sop("s10", "Activity", "At least 1 hour of fetch.")],
        ),
        pet(
            "pet9", "owner3", "Nemo", "Fish", "Clownfish", 1,
            "Just keep swimming. Lives in a saltwater tank.",
            "https://images.unsplash.com/photo-1524704654690-b56c05c78a00?auto=format&fit=crop&w=800&q=80",
            vec![sop("s11", "Feeding", "Tiny pinch of flakes once a day.")],
        ),
        pet(
            "pet10", "owner1", "Daisy", "Dog", "Beagle", 6,
            "Driven by her nose. Will eat anything she finds.",
            "https://images.unsplash.com/photo-1537151625747-768eb6cf92b2?auto=format&fit=crop&w=800&q=80",
            vec![sop("s12", "Leash", "Never off-leash outside fenced area.")],
        ),
    ]
}

pub fn bookings() -> Vec<Booking> {
    let booking = |id: &str, pet_id: &str, owner_id: &str, lover_id: &str,
                   start: NaiveDate, end: NaiveDate, status: BookingStatus, total_price: f64| {
        Booking {
            id: id.into(),
            pet_id: pet_id.into(),
            owner_id: owner_id.into(),
            lover_id: lover_id.into(),
            start_date: start,
            end_date: end,
            status,
            total_price,
        }
    };

    vec![
        booking("b1", "pet1", "owner1", "lover1", date(2023, 11, 10), date(2023, 11, 12), BookingStatus::Pending, 150.0),
        booking("b2", "pet3", "owner2", "lover1", date(2023, 10, 1), date(2023, 10, 3), BookingStatus::Completed, 200.0),
        booking("b3", "pet2", "owner1", "lover2", date(2023, 12, 5), date(2023, 12, 6), BookingStatus::Accepted, 80.0),
        booking("b4", "pet6", "owner3", "lover3", date(2023, 11, 20), date(2023, 11, 22), BookingStatus::Pending, 100.0),
    ]
}

pub fn messages() -> Vec<Message> {
    let msg = |id: &str, booking_id: &str, sender_id: &str, text: &str, timestamp: i64| Message {
        id: id.into(),
        booking_id: booking_id.into(),
        sender_id: sender_id.into(),
        text: text.into(),
        timestamp,
    };

    vec![
        msg("m1", "b1", "lover1", "Hi! Is Bella good with other dogs?", 1_698_750_000_000),
        msg("m2", "b1", "owner1", "Yes, she loves them!", 1_698_750_500_000),
        msg("m3", "b2", "lover1", "Rocky was a joy to sit!", 1_696_320_000_000),
        msg("m4", "b2", "owner2", "Thanks Mike! He misses you already.", 1_696_325_000_000),
        msg("m5", "b4", "lover3", "Does Thumper chew on furniture?", 1_700_438_400_000),
        msg("m6", "b4", "owner3", "Sometimes baseboards. Keep an eye on him.", 1_700_442_000_000),
    ]
}

pub fn reviews() -> Vec<Review> {
    vec![
        Review {
            id: "r1".into(),
            booking_id: "b2".into(),
            reviewer_id: "owner2".into(),
            target_id: "lover1".into(),
            rating: 5,
            comment: "Mike was fantastic with Rocky. He sent daily updates and followed all instructions.".into(),
            created_at: date(2023, 10, 4),
        },
        Review {
            id: "r2".into(),
            booking_id: "b2".into(),
            reviewer_id: "lover1".into(),
            target_id: "owner2".into(),
            rating: 4,
            comment: "Great owner, clear instructions. Rocky is a bit stubborn on walks though.".into(),
            created_at: date(2023, 10, 4),
        },
    ]
}
