use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::middleware::SESSION_COOKIE;
use crate::auth::token;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::UserPublic;
use crate::routes::AppState;
use crate::store::users;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration returns the created account without a session; the client
/// follows up with a login.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    if body.name.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }

    let user = users::create(&state.db, &body.name, &body.email, &body.password)?;
    Ok((StatusCode::CREATED, Json(UserPublic::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    if body.email.is_empty() {
        return Err(AppError::Validation("Email field is required!".to_string()));
    }

    let user = users::login(&state.db, &body.email, &body.password)?;
    let token = token::issue(&state.config.jwt_secret, &user.id, &user.email)?;
    let cookie = build_session_cookie(&state.config, token);

    Ok((jar.add(cookie), Json(UserPublic::from(user))))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let removal = Cookie::build(SESSION_COOKIE)
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    (jar.add(removal), Json(true))
}

/// The current account, or `null` for anonymous visitors. A missing,
/// expired or forged token degrades to `null` instead of failing; the
/// client renders the logged-out state either way.
pub async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<Option<UserPublic>>> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(Json(None));
    };

    let Ok(claims) = token::verify(&state.config.jwt_secret, cookie.value()) else {
        return Ok(Json(None));
    };

    match users::find_by_id(&state.db, &claims.sub) {
        Ok(user) => Ok(Json(Some(user.into()))),
        Err(AppError::NotFound(_)) => Ok(Json(None)),
        Err(e) => Err(e),
    }
}

fn build_session_cookie(config: &Config, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(time::Duration::days(token::TOKEN_TTL_DAYS))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    if config.secure_cookies {
        cookie.set_secure(true);
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config(secure_cookies: bool) -> Config {
        Config {
            server_port: 4000,
            sqlite_path: ":memory:".to_string(),
            uploads_dir: "/tmp/uploads".to_string(),
            jwt_secret: "secret".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            secure_cookies,
        }
    }

    #[test]
    fn session_cookie_is_http_only_and_long_lived() {
        let cookie = build_session_cookie(&sample_config(false), "tok".to_string());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn session_cookie_honors_the_secure_flag() {
        let cookie = build_session_cookie(&sample_config(true), "tok".to_string());
        assert_eq!(cookie.secure(), Some(true));
    }
}
