mod auth;
mod bookings;
mod places;
mod uploads;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::services::ServeDir;

use crate::auth::middleware::require_auth;
use crate::config::Config;
use crate::db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
}

async fn ping() -> Json<&'static str> {
    Json("Test Ok!")
}

pub fn create_router(state: AppState) -> Router {
    // Anyone may browse places and create an account; photo intake is open
    // because the client uploads before the place form is submitted.
    let public = Router::new()
        .route("/test", get(ping))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile))
        .route("/places", get(places::list_all))
        .route("/places/{id}", get(places::get_one))
        .route("/upload-by-link", post(uploads::upload_by_link))
        .route(
            "/upload",
            post(uploads::upload).layer(uploads::upload_body_limit()),
        );

    let protected = Router::new()
        .route("/places", post(places::create).put(places::update))
        .route("/user-places", get(places::user_places))
        .route("/bookings", get(bookings::list).post(bookings::create))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(&state.config.uploads_dir))
        .with_state(state)
}
