//! User endpoints: registration, listing, and lookup by id.

use crate::api::{internal, required_field, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use holocron_accounts::{password::hash_password, AccountError, User};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Request body for `POST /user`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public view of a user. The stored hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Handler for `POST /user`.
///
/// Hashes the password inside the blocking task (Argon2 is CPU-bound)
/// and inserts; a duplicate email is rejected by the schema's UNIQUE
/// constraint and reported as 400.
pub async fn create_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(email), Some(password)) = (
        required_field(payload.email),
        required_field(payload.password),
    ) else {
        return Err(ApiError::BadRequest("campos requeridos".to_string()));
    };

    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        let hash =
            hash_password(&password).map_err(|e| internal("password hashing failed", e))?;
        holocron_accounts::create_user(&conn, &email, &hash).map_err(|e| match e {
            AccountError::DuplicateEmail(_) => {
                ApiError::BadRequest("El usuario ya existe".to_string())
            }
            other => internal("user insert failed", other),
        })
    })
    .await
    .map_err(|e| internal("create_user task join error", e))??;

    Ok((
        StatusCode::CREATED,
        Json(json!({"msg": "Usuario creado con éxito"})),
    ))
}

/// Handler for `GET /users`.
pub async fn list_users_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        holocron_accounts::list_users(&conn).map_err(|e| internal("user listing failed", e))
    })
    .await
    .map_err(|e| internal("list_users task join error", e))??;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Handler for `GET /usuarios/{id}`.
pub async fn get_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        holocron_accounts::get_user(&conn, user_id).map_err(|e| match e {
            AccountError::UserNotFound(_) => {
                ApiError::NotFound("Usuario no encontrado".to_string())
            }
            other => internal("user lookup failed", other),
        })
    })
    .await
    .map_err(|e| internal("get_user task join error", e))??;

    Ok(Json(user.into()))
}
