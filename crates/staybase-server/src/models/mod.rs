use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

/// A bookable property listing. Wire names stay camelCase (`owner`,
/// `extraInfo`, ...) so the existing browser client keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    #[serde(rename = "owner")]
    pub owner_id: String,
    pub title: String,
    pub address: String,
    pub photos: Vec<String>,
    pub description: String,
    pub perks: Vec<String>,
    pub extra_info: String,
    pub check_in: String,
    pub check_out: String,
    pub max_guests: i64,
    pub price: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Creation payload for a place. The client sends freshly uploaded photo
/// filenames under `addedPhotos`; they become the place's `photos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, rename = "addedPhotos")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub perks: Vec<String>,
    #[serde(default)]
    pub extra_info: String,
    #[serde(default)]
    pub check_in: String,
    #[serde(default)]
    pub check_out: String,
    #[serde(default)]
    pub max_guests: i64,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(rename = "place")]
    pub place_id: String,
    #[serde(rename = "user")]
    pub user_id: String,
    pub check_in: String,
    pub check_out: String,
    pub number_of_guests: i64,
    pub name: String,
    pub phone: String,
    pub price: f64,
    pub created_at: String,
}

/// Creation payload for a booking; `place` references an existing listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(rename = "place")]
    pub place_id: String,
    #[serde(default)]
    pub check_in: String,
    #[serde(default)]
    pub check_out: String,
    #[serde(default)]
    pub number_of_guests: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub price: f64,
}

/// A booking with its referenced place inlined, the shape the client's
/// bookings page renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithPlace {
    pub id: String,
    pub place: Place,
    #[serde(rename = "user")]
    pub user_id: String,
    pub check_in: String,
    pub check_out: String,
    pub number_of_guests: i64,
    pub name: String,
    pub phone: String,
    pub price: f64,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serialization_never_exposes_password_hash() {
        let user = User {
            id: "u-1".to_string(),
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["name"], "Ann");
        assert!(value.get("password").is_none());
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
    }

    #[test]
    fn place_uses_client_wire_names() {
        let json = serde_json::json!({
            "title": "Sea cottage",
            "address": "1 Shore Rd",
            "addedPhotos": ["a.jpg"],
            "extraInfo": "no pets",
            "checkIn": "14",
            "checkOut": "11",
            "maxGuests": 4,
            "price": 100.0
        });

        let new_place: NewPlace = serde_json::from_value(json).unwrap();
        assert_eq!(new_place.photos, vec!["a.jpg".to_string()]);
        assert_eq!(new_place.extra_info, "no pets");
        assert_eq!(new_place.max_guests, 4);
        // omitted fields fall back to empty
        assert!(new_place.description.is_empty());
        assert!(new_place.perks.is_empty());
    }

    #[test]
    fn booking_wire_shape_references_place_by_key() {
        let booking = Booking {
            id: "b-1".to_string(),
            place_id: "p-1".to_string(),
            user_id: "u-1".to_string(),
            check_in: "2024-06-01".to_string(),
            check_out: "2024-06-05".to_string(),
            number_of_guests: 2,
            name: "Ann".to_string(),
            phone: "555-0100".to_string(),
            price: 400.0,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        };

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["place"], "p-1");
        assert_eq!(value["user"], "u-1");
        assert_eq!(value["numberOfGuests"], 2);
    }
}
