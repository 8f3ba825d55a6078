use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Booking, BookingWithPlace, NewBooking, Place};

use super::places::json_list;

fn row_to_booking_with_place(row: &rusqlite::Row) -> rusqlite::Result<BookingWithPlace> {
    Ok(BookingWithPlace {
        id: row.get(0)?,
        user_id: row.get(1)?,
        check_in: row.get(2)?,
        check_out: row.get(3)?,
        number_of_guests: row.get(4)?,
        name: row.get(5)?,
        phone: row.get(6)?,
        price: row.get(7)?,
        created_at: row.get(8)?,
        place: Place {
            id: row.get(9)?,
            owner_id: row.get(10)?,
            title: row.get(11)?,
            address: row.get(12)?,
            photos: json_list(row, 13)?,
            description: row.get(14)?,
            perks: json_list(row, 15)?,
            extra_info: row.get(16)?,
            check_in: row.get(17)?,
            check_out: row.get(18)?,
            max_guests: row.get(19)?,
            price: row.get(20)?,
            created_at: row.get(21)?,
            updated_at: row.get(22)?,
        },
    })
}

/// Records a booking for `user_id`. The referenced place must exist; a
/// dangling reference is reported as not-found rather than stored.
pub fn create(pool: &DbPool, user_id: &str, new_booking: NewBooking) -> AppResult<Booking> {
    let conn = pool.get()?;

    let place_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM places WHERE id = ?1)",
        rusqlite::params![new_booking.place_id],
        |row| row.get(0),
    )?;
    if !place_exists {
        return Err(AppError::NotFound("Place not found".into()));
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    conn.execute(
        "INSERT INTO bookings (id, place_id, user_id, check_in, check_out, number_of_guests, name, phone, price, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            id,
            new_booking.place_id,
            user_id,
            new_booking.check_in,
            new_booking.check_out,
            new_booking.number_of_guests,
            new_booking.name,
            new_booking.phone,
            new_booking.price,
            now
        ],
    )?;

    Ok(Booking {
        id,
        place_id: new_booking.place_id,
        user_id: user_id.to_string(),
        check_in: new_booking.check_in,
        check_out: new_booking.check_out,
        number_of_guests: new_booking.number_of_guests,
        name: new_booking.name,
        phone: new_booking.phone,
        price: new_booking.price,
        created_at: now,
    })
}

/// The requesting user's bookings with each referenced place inlined, in
/// creation order.
pub fn list_by_user(pool: &DbPool, user_id: &str) -> AppResult<Vec<BookingWithPlace>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT b.id, b.user_id, b.check_in, b.check_out, b.number_of_guests, b.name, b.phone, b.price, b.created_at,
                p.id, p.owner_id, p.title, p.address, p.photos, p.description, p.perks, p.extra_info, p.check_in, p.check_out, p.max_guests, p.price, p.created_at, p.updated_at
         FROM bookings b
         JOIN places p ON p.id = b.place_id
         WHERE b.user_id = ?1
         ORDER BY b.created_at ASC, b.rowid ASC",
    )?;
    let rows = stmt.query_map(rusqlite::params![user_id], row_to_booking_with_place)?;
    let bookings: Result<Vec<_>, _> = rows.collect();
    Ok(bookings?)
}
