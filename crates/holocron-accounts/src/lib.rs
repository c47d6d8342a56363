//! User accounts and per-user favorites for the Holocron backend.
//!
//! Users own favorite links into the catalog tables: one join table for
//! planets and one for characters. Both join tables carry a schema-level
//! UNIQUE constraint on the (user, target) pair, so "already a favorite"
//! is detected by the insert itself. There is no check-then-act window
//! in which two concurrent requests could both create the link.
//!
//! Passwords never touch the database in plain text; see [`password`].

pub mod password;

use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("user not found: {0}")]
    UserNotFound(i64),
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    #[error("favorite link already exists")]
    DuplicateFavorite,
    #[error("favorite link not found")]
    FavoriteNotFound,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

/// True when the error is a UNIQUE constraint failure.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// A registered user. The `password_hash` field is an Argon2id PHC string
/// and must never be serialized onto the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Database ID.
    pub id: i64,
    /// Email address, unique across all users.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// Creates a new user from an email and an already-hashed password.
///
/// Returns [`AccountError::DuplicateEmail`] if the email is taken.
pub fn create_user(
    conn: &Connection,
    email: &str,
    password_hash: &str,
) -> Result<User, AccountError> {
    conn.execute(
        "INSERT INTO users (email, password_hash) VALUES (?1, ?2)",
        params![email, password_hash],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AccountError::DuplicateEmail(email.to_string())
        } else {
            AccountError::Database(e)
        }
    })?;

    get_user(conn, conn.last_insert_rowid())
}

/// Retrieves a user by ID.
pub fn get_user(conn: &Connection, id: i64) -> Result<User, AccountError> {
    conn.query_row(
        "SELECT id, email, password_hash, created_at FROM users WHERE id = ?1",
        [id],
        map_row_to_user,
    )
    .optional()?
    .ok_or(AccountError::UserNotFound(id))
}

/// Lists all users, oldest first.
pub fn list_users(conn: &Connection) -> Result<Vec<User>, AccountError> {
    let mut stmt =
        conn.prepare("SELECT id, email, password_hash, created_at FROM users ORDER BY id ASC")?;

    let rows = stmt.query_map([], map_row_to_user)?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

fn map_row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Links a planet to a user's favorites.
///
/// Returns [`AccountError::DuplicateFavorite`] if the link already exists.
/// Caller is responsible for verifying that both the user and the planet
/// exist (the distinction drives the 404-vs-400 split at the API layer).
pub fn add_favorite_planet(
    conn: &Connection,
    user_id: i64,
    planet_id: i64,
) -> Result<(), AccountError> {
    conn.execute(
        "INSERT INTO favorite_planets (user_id, planet_id) VALUES (?1, ?2)",
        params![user_id, planet_id],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AccountError::DuplicateFavorite
        } else {
            AccountError::Database(e)
        }
    })?;
    Ok(())
}

/// Removes a planet from a user's favorites.
///
/// Returns [`AccountError::FavoriteNotFound`] if no such link exists.
pub fn remove_favorite_planet(
    conn: &Connection,
    user_id: i64,
    planet_id: i64,
) -> Result<(), AccountError> {
    let count = conn.execute(
        "DELETE FROM favorite_planets WHERE user_id = ?1 AND planet_id = ?2",
        params![user_id, planet_id],
    )?;
    if count == 0 {
        return Err(AccountError::FavoriteNotFound);
    }
    Ok(())
}

/// Links a character to a user's favorites.
///
/// Returns [`AccountError::DuplicateFavorite`] if the link already exists.
pub fn add_favorite_character(
    conn: &Connection,
    user_id: i64,
    character_id: i64,
) -> Result<(), AccountError> {
    conn.execute(
        "INSERT INTO favorite_characters (user_id, character_id) VALUES (?1, ?2)",
        params![user_id, character_id],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AccountError::DuplicateFavorite
        } else {
            AccountError::Database(e)
        }
    })?;
    Ok(())
}

/// Removes a character from a user's favorites.
///
/// Returns [`AccountError::FavoriteNotFound`] if no such link exists.
pub fn remove_favorite_character(
    conn: &Connection,
    user_id: i64,
    character_id: i64,
) -> Result<(), AccountError> {
    let count = conn.execute(
        "DELETE FROM favorite_characters WHERE user_id = ?1 AND character_id = ?2",
        params![user_id, character_id],
    )?;
    if count == 0 {
        return Err(AccountError::FavoriteNotFound);
    }
    Ok(())
}
