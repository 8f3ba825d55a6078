use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewPlace, Place};

const PLACE_COLS: &str = "id, owner_id, title, address, photos, description, perks, extra_info, check_in, check_out, max_guests, price, created_at, updated_at";

/// Partial update; `None` keeps the stored value. The owner is never part
/// of an update.
#[derive(Debug, Clone, Default)]
pub struct PlaceUpdate {
    pub title: Option<String>,
    pub address: Option<String>,
    pub photos: Option<Vec<String>>,
    pub description: Option<String>,
    pub perks: Option<Vec<String>>,
    pub extra_info: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub max_guests: Option<i64>,
    pub price: Option<f64>,
}

fn row_to_place(row: &rusqlite::Row) -> rusqlite::Result<Place> {
    Ok(Place {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        address: row.get(3)?,
        photos: json_list(row, 4)?,
        description: row.get(5)?,
        perks: json_list(row, 6)?,
        extra_info: row.get(7)?,
        check_in: row.get(8)?,
        check_out: row.get(9)?,
        max_guests: row.get(10)?,
        price: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

// photos and perks are document-style list fields, stored as JSON text
pub(super) fn json_list(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn encode_list(list: &[String]) -> AppResult<String> {
    serde_json::to_string(list)
        .map_err(|e| AppError::Internal(format!("List field serialization failed: {e}")))
}

/// Persists a new place bound to `owner_id`. Fields are stored as given;
/// range validation is not this layer's job.
pub fn create(pool: &DbPool, owner_id: &str, new_place: NewPlace) -> AppResult<Place> {
    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    let photos = encode_list(&new_place.photos)?;
    let perks = encode_list(&new_place.perks)?;

    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO places (id, owner_id, title, address, photos, description, perks, extra_info, check_in, check_out, max_guests, price, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        rusqlite::params![
            id,
            owner_id,
            new_place.title,
            new_place.address,
            photos,
            new_place.description,
            perks,
            new_place.extra_info,
            new_place.check_in,
            new_place.check_out,
            new_place.max_guests,
            new_place.price,
            now,
            now
        ],
    )?;

    Ok(Place {
        id,
        owner_id: owner_id.to_string(),
        title: new_place.title,
        address: new_place.address,
        photos: new_place.photos,
        description: new_place.description,
        perks: new_place.perks,
        extra_info: new_place.extra_info,
        check_in: new_place.check_in,
        check_out: new_place.check_out,
        max_guests: new_place.max_guests,
        price: new_place.price,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// All places belonging to one owner, in creation order.
pub fn list_by_owner(pool: &DbPool, owner_id: &str) -> AppResult<Vec<Place>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLACE_COLS} FROM places WHERE owner_id = ?1 ORDER BY created_at ASC, rowid ASC"
    ))?;
    let rows = stmt.query_map(rusqlite::params![owner_id], row_to_place)?;
    let places: Result<Vec<_>, _> = rows.collect();
    Ok(places?)
}

pub fn get(pool: &DbPool, id: &str) -> AppResult<Place> {
    let conn = pool.get()?;
    conn.query_row(
        &format!("SELECT {PLACE_COLS} FROM places WHERE id = ?1"),
        rusqlite::params![id],
        row_to_place,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("Place not found".into()),
        e => AppError::Database(e),
    })
}

/// Loads the place, refuses anyone but the stored owner, then persists the
/// merged fields. Read-then-write with no version check: two concurrent
/// updates to the same place race last-write-wins.
pub fn update(
    pool: &DbPool,
    id: &str,
    requester_id: &str,
    changes: PlaceUpdate,
) -> AppResult<Place> {
    let existing = get(pool, id)?;

    if existing.owner_id != requester_id {
        return Err(AppError::Forbidden);
    }

    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    let title = changes.title.unwrap_or(existing.title);
    let address = changes.address.unwrap_or(existing.address);
    let photos = changes.photos.unwrap_or(existing.photos);
    let description = changes.description.unwrap_or(existing.description);
    let perks = changes.perks.unwrap_or(existing.perks);
    let extra_info = changes.extra_info.unwrap_or(existing.extra_info);
    let check_in = changes.check_in.unwrap_or(existing.check_in);
    let check_out = changes.check_out.unwrap_or(existing.check_out);
    let max_guests = changes.max_guests.unwrap_or(existing.max_guests);
    let price = changes.price.unwrap_or(existing.price);

    let photos_json = encode_list(&photos)?;
    let perks_json = encode_list(&perks)?;

    let conn = pool.get()?;
    conn.execute(
        "UPDATE places SET title = ?1, address = ?2, photos = ?3, description = ?4, perks = ?5, extra_info = ?6, check_in = ?7, check_out = ?8, max_guests = ?9, price = ?10, updated_at = ?11 WHERE id = ?12",
        rusqlite::params![
            title,
            address,
            photos_json,
            description,
            perks_json,
            extra_info,
            check_in,
            check_out,
            max_guests,
            price,
            now,
            id
        ],
    )?;

    Ok(Place {
        id: existing.id,
        owner_id: existing.owner_id,
        title,
        address,
        photos,
        description,
        perks,
        extra_info,
        check_in,
        check_out,
        max_guests,
        price,
        created_at: existing.created_at,
        updated_at: now,
    })
}

/// The public, unfiltered feed.
pub fn list_all(pool: &DbPool) -> AppResult<Vec<Place>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLACE_COLS} FROM places ORDER BY created_at ASC, rowid ASC"
    ))?;
    let rows = stmt.query_map([], row_to_place)?;
    let places: Result<Vec<_>, _> = rows.collect();
    Ok(places?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::User;
    use crate::store::users;

    fn sample_user(pool: &DbPool, email: &str) -> User {
        users::create(pool, "Owner", email, "p1").unwrap()
    }

    fn sample_place(title: &str, price: f64) -> NewPlace {
        NewPlace {
            title: title.to_string(),
            address: "1 Shore Rd".to_string(),
            photos: vec!["front.jpg".to_string(), "back.jpg".to_string()],
            description: "A cottage by the sea".to_string(),
            perks: vec!["wifi".to_string(), "parking".to_string()],
            extra_info: String::new(),
            check_in: "14".to_string(),
            check_out: "11".to_string(),
            max_guests: 4,
            price,
        }
    }

    #[test]
    fn list_by_owner_returns_exactly_that_owners_places_in_creation_order() {
        let pool = db::create_memory_pool();
        let ann = sample_user(&pool, "a@x.com");
        let bob = sample_user(&pool, "b@x.com");

        let first = create(&pool, &ann.id, sample_place("First", 50.0)).unwrap();
        let second = create(&pool, &ann.id, sample_place("Second", 60.0)).unwrap();
        create(&pool, &bob.id, sample_place("Bob's", 70.0)).unwrap();

        let anns = list_by_owner(&pool, &ann.id).unwrap();
        let ids: Vec<&str> = anns.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
    }

    #[test]
    fn stored_list_fields_keep_their_order() {
        let pool = db::create_memory_pool();
        let ann = sample_user(&pool, "a@x.com");

        let created = create(&pool, &ann.id, sample_place("Cottage", 100.0)).unwrap();
        let loaded = get(&pool, &created.id).unwrap();

        assert_eq!(loaded.photos, vec!["front.jpg", "back.jpg"]);
        assert_eq!(loaded.perks, vec!["wifi", "parking"]);
    }

    #[test]
    fn update_by_a_non_owner_is_forbidden_and_changes_nothing() {
        let pool = db::create_memory_pool();
        let ann = sample_user(&pool, "a@x.com");
        let bob = sample_user(&pool, "b@x.com");
        let place = create(&pool, &ann.id, sample_place("Cottage", 100.0)).unwrap();

        let attempt = update(
            &pool,
            &place.id,
            &bob.id,
            PlaceUpdate {
                price: Some(1.0),
                ..Default::default()
            },
        );

        assert!(matches!(attempt, Err(AppError::Forbidden)));
        let stored = get(&pool, &place.id).unwrap();
        assert_eq!(stored.price, 100.0);
    }

    #[test]
    fn update_merges_only_the_provided_fields() {
        let pool = db::create_memory_pool();
        let ann = sample_user(&pool, "a@x.com");
        let place = create(&pool, &ann.id, sample_place("Cottage", 100.0)).unwrap();

        let updated = update(
            &pool,
            &place.id,
            &ann.id,
            PlaceUpdate {
                title: Some("Renamed cottage".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.title, "Renamed cottage");
        assert_eq!(updated.address, "1 Shore Rd");
        assert_eq!(updated.price, 100.0);
        assert_eq!(updated.owner_id, ann.id);
    }

    #[test]
    fn missing_place_is_not_found() {
        let pool = db::create_memory_pool();

        assert!(matches!(
            get(&pool, "missing"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            update(&pool, "missing", "anyone", PlaceUpdate::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn list_all_is_the_public_feed_across_owners() {
        let pool = db::create_memory_pool();
        let ann = sample_user(&pool, "a@x.com");
        let bob = sample_user(&pool, "b@x.com");

        create(&pool, &ann.id, sample_place("Ann's", 50.0)).unwrap();
        create(&pool, &bob.id, sample_place("Bob's", 60.0)).unwrap();

        let all = list_all(&pool).unwrap();
        assert_eq!(all.len(), 2);
    }
}
