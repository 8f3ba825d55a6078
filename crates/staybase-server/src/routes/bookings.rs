use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::error::AppResult;
use crate::models::{Booking, BookingWithPlace, NewBooking, User};
use crate::routes::AppState;
use crate::store::bookings;

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(body): Json<NewBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = bookings::create(&state.db, &user.id, body)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<BookingWithPlace>>> {
    Ok(Json(bookings::list_by_user(&state.db, &user.id)?))
}
