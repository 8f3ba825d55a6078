use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{NewPlace, Place, User};
use crate::routes::AppState;
use crate::store::places;

/// Update payload; the target id travels in the body, not the path, which
/// is the shape the web client has always sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaceRequest {
    pub id: String,
    pub title: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "addedPhotos")]
    pub photos: Option<Vec<String>>,
    pub description: Option<String>,
    pub perks: Option<Vec<String>>,
    pub extra_info: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub max_guests: Option<i64>,
    pub price: Option<f64>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(body): Json<NewPlace>,
) -> AppResult<(StatusCode, Json<Place>)> {
    let place = places::create(&state.db, &user.id, body)?;
    Ok((StatusCode::CREATED, Json(place)))
}

pub async fn user_places(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<Place>>> {
    Ok(Json(places::list_by_owner(&state.db, &user.id)?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Place>> {
    Ok(Json(places::get(&state.db, &id)?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(body): Json<UpdatePlaceRequest>,
) -> AppResult<Json<&'static str>> {
    places::update(
        &state.db,
        &body.id,
        &user.id,
        places::PlaceUpdate {
            title: body.title,
            address: body.address,
            photos: body.photos,
            description: body.description,
            perks: body.perks,
            extra_info: body.extra_info,
            check_in: body.check_in,
            check_out: body.check_out,
            max_guests: body.max_guests,
            price: body.price,
        },
    )?;

    Ok(Json("Ok!"))
}

pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<Vec<Place>>> {
    Ok(Json(places::list_all(&state.db)?))
}
