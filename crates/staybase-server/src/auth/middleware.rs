use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::token;
use crate::error::AppError;
use crate::routes::AppState;
use crate::store;

/// Cookie the signed session token travels in; the name is what the
/// existing browser client was built against.
pub const SESSION_COOKIE: &str = "token";

/// Rejects the request with 401 unless the credential cookie carries a valid
/// token that resolves to a stored user. The user lands in the request
/// extensions for handlers to pick up.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let claims = token::verify(&state.config.jwt_secret, &token)?;

    // A valid token for a since-deleted user is still not an identity
    let user = store::users::find_by_id(&state.db, &claims.sub).map_err(|e| match e {
        AppError::NotFound(_) => AppError::Unauthorized,
        e => e,
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
