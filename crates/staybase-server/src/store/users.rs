use uuid::Uuid;

use crate::auth::password;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::User;

const USER_COLS: &str = "id, name, email, password_hash, created_at";

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Registers a new user. The password is hashed before it touches the
/// database; a taken email maps to `DuplicateEmail`.
pub fn create(pool: &DbPool, name: &str, email: &str, password: &str) -> AppResult<User> {
    let password_hash = password::hash_password(password)?;
    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    let conn = pool.get()?;
    let result = conn.execute(
        "INSERT INTO users (id, name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id, name, email, password_hash, now],
    );

    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(AppError::DuplicateEmail);
        }
        Err(e) => return Err(AppError::Database(e)),
    }

    Ok(User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash,
        created_at: now,
    })
}

/// Looks the user up by email and checks the password against the stored
/// hash. Unknown email and bad password are distinct failures.
pub fn login(pool: &DbPool, email: &str, password: &str) -> AppResult<User> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
            rusqlite::params![email],
            row_to_user,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("User not found".into()),
            e => AppError::Database(e),
        })?;

    let valid = password::verify_password(password, &user.password_hash)?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    Ok(user)
}

pub fn find_by_id(pool: &DbPool, id: &str) -> AppResult<User> {
    let conn = pool.get()?;
    conn.query_row(
        &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
        rusqlite::params![id],
        row_to_user,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("User not found".into()),
        e => AppError::Database(e),
    })
}
