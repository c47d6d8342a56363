//! Favorite endpoints: linking users to catalog planets and characters.
//!
//! The 404-vs-400 split: a missing user or catalog record is 404, an
//! already-existing link is 400. The link insert itself relies on the
//! join table's UNIQUE constraint, so two concurrent adds of the same
//! pair resolve to one 201 and one 400.

use crate::api::{internal, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use holocron_accounts::AccountError;
use holocron_catalog::CatalogError;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Request body for all favorite endpoints.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Resolves the user referenced by a favorite request, or fails with the
/// endpoint's 404 message. A missing or absent `user_id` takes the same
/// path as an unknown one.
fn require_user(
    conn: &Connection,
    user_id: Option<i64>,
    missing_msg: &str,
) -> Result<i64, ApiError> {
    let user_id = user_id.unwrap_or(0);
    match holocron_accounts::get_user(conn, user_id) {
        Ok(user) => Ok(user.id),
        Err(AccountError::UserNotFound(_)) => Err(ApiError::NotFound(missing_msg.to_string())),
        Err(other) => Err(internal("user lookup failed", other)),
    }
}

/// Handler for `POST /favorite/planet/{planet_id}`.
pub async fn add_favorite_planet_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(planet_id): Path<i64>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;

        let user_id = require_user(&conn, payload.user_id, "Usuario o planeta no encontrado")?;
        match holocron_catalog::get_planet(&conn, planet_id) {
            Ok(_) => {}
            Err(CatalogError::PlanetNotFound(_)) => {
                return Err(ApiError::NotFound(
                    "Usuario o planeta no encontrado".to_string(),
                ))
            }
            Err(other) => return Err(internal("planet lookup failed", other)),
        }

        holocron_accounts::add_favorite_planet(&conn, user_id, planet_id).map_err(|e| match e {
            AccountError::DuplicateFavorite => {
                ApiError::BadRequest("El planeta ya está en la lista de favoritos".to_string())
            }
            other => internal("favorite insert failed", other),
        })
    })
    .await
    .map_err(|e| internal("add_favorite_planet task join error", e))??;

    Ok((
        StatusCode::CREATED,
        Json(json!({"msg": "Planeta añadido a favoritos"})),
    ))
}

/// Handler for `DELETE /favorite/planet/{planet_id}`.
pub async fn remove_favorite_planet_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(planet_id): Path<i64>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<Json<Value>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;

        let user_id = require_user(&conn, payload.user_id, "Usuario no encontrado")?;

        holocron_accounts::remove_favorite_planet(&conn, user_id, planet_id).map_err(|e| match e {
            AccountError::FavoriteNotFound => {
                ApiError::NotFound("Favorito no encontrado".to_string())
            }
            other => internal("favorite delete failed", other),
        })
    })
    .await
    .map_err(|e| internal("remove_favorite_planet task join error", e))??;

    Ok(Json(json!({"msg": "Planeta eliminado de favoritos"})))
}

/// Handler for `POST /favorite/people/{people_id}`.
pub async fn add_favorite_character_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(character_id): Path<i64>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;

        let user_id = require_user(&conn, payload.user_id, "Usuario o personaje no encontrado")?;
        match holocron_catalog::get_character(&conn, character_id) {
            Ok(_) => {}
            Err(CatalogError::CharacterNotFound(_)) => {
                return Err(ApiError::NotFound(
                    "Usuario o personaje no encontrado".to_string(),
                ))
            }
            Err(other) => return Err(internal("character lookup failed", other)),
        }

        holocron_accounts::add_favorite_character(&conn, user_id, character_id).map_err(|e| {
            match e {
                AccountError::DuplicateFavorite => ApiError::BadRequest(
                    "El personaje ya está en la lista de favoritos".to_string(),
                ),
                other => internal("favorite insert failed", other),
            }
        })
    })
    .await
    .map_err(|e| internal("add_favorite_character task join error", e))??;

    Ok((
        StatusCode::CREATED,
        Json(json!({"msg": "Personaje añadido a favoritos"})),
    ))
}

/// Handler for `DELETE /favorite/people/{people_id}`.
pub async fn remove_favorite_character_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(character_id): Path<i64>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<Json<Value>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;

        let user_id = require_user(&conn, payload.user_id, "Usuario no encontrado")?;

        holocron_accounts::remove_favorite_character(&conn, user_id, character_id).map_err(|e| {
            match e {
                AccountError::FavoriteNotFound => {
                    ApiError::NotFound("Favorito no encontrado".to_string())
                }
                other => internal("favorite delete failed", other),
            }
        })
    })
    .await
    .map_err(|e| internal("remove_favorite_character task join error", e))??;

    Ok(Json(json!({"msg": "Personaje eliminado de favoritos"})))
}
