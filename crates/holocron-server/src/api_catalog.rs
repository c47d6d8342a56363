//! Catalog endpoints: planets and characters (the `/people` surface).
//!
//! The wire field names are the legacy Spanish ones (`nombre_planeta`,
//! `raza_personaje`, ...) that existing clients send and expect back;
//! internally everything is the English schema. Note the planet read
//! serializer exposes `habitantes`, not `habitantes_planeta`. Clients
//! depend on that asymmetry.

use crate::api::{internal, required_field, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use holocron_catalog::{Character, CatalogError, NewCharacter, NewPlanet, Planet};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Request body for `POST /planets`.
#[derive(Debug, Deserialize)]
pub struct CreatePlanetRequest {
    #[serde(default, rename = "nombre_planeta")]
    pub name: Option<String>,
    #[serde(default, rename = "ubicacion_planeta")]
    pub location: Option<String>,
    #[serde(default, rename = "habitantes_planeta")]
    pub inhabitants: Option<String>,
}

/// Wire form of a planet record.
#[derive(Debug, Serialize)]
pub struct PlanetResponse {
    pub id: i64,
    #[serde(rename = "nombre_planeta")]
    pub name: String,
    #[serde(rename = "ubicacion_planeta")]
    pub location: String,
    #[serde(rename = "habitantes")]
    pub inhabitants: String,
}

impl From<Planet> for PlanetResponse {
    fn from(planet: Planet) -> Self {
        Self {
            id: planet.id,
            name: planet.name,
            location: planet.location,
            inhabitants: planet.inhabitants,
        }
    }
}

/// Request body for `POST /people`.
#[derive(Debug, Deserialize)]
pub struct CreateCharacterRequest {
    #[serde(default, rename = "nombre_personaje")]
    pub name: Option<String>,
    #[serde(default, rename = "peliculas_personaje")]
    pub films: Option<String>,
    #[serde(default, rename = "raza_personaje")]
    pub species: Option<String>,
}

/// Wire form of a character record.
#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    pub id: i64,
    #[serde(rename = "nombre_personaje")]
    pub name: String,
    #[serde(rename = "peliculas_personaje")]
    pub films: String,
    #[serde(rename = "raza_personaje")]
    pub species: String,
}

impl From<Character> for CharacterResponse {
    fn from(character: Character) -> Self {
        Self {
            id: character.id,
            name: character.name,
            films: character.films,
            species: character.species,
        }
    }
}

/// Handler for `POST /planets`.
pub async fn create_planet_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreatePlanetRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(name), Some(location), Some(inhabitants)) = (
        required_field(payload.name),
        required_field(payload.location),
        required_field(payload.inhabitants),
    ) else {
        return Err(ApiError::BadRequest("Error campos obligatorios".to_string()));
    };

    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        let new = NewPlanet {
            name,
            location,
            inhabitants,
        };
        holocron_catalog::create_planet(&conn, &new).map_err(|e| match e {
            CatalogError::DuplicateName(_) => {
                ApiError::BadRequest("El planeta ya existe".to_string())
            }
            other => internal("planet insert failed", other),
        })
    })
    .await
    .map_err(|e| internal("create_planet task join error", e))??;

    Ok((
        StatusCode::CREATED,
        Json(json!({"msg": "Planeta agregado con éxito"})),
    ))
}

/// Handler for `GET /planets`.
pub async fn list_planets_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<PlanetResponse>>, ApiError> {
    let planets = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        holocron_catalog::list_planets(&conn).map_err(|e| internal("planet listing failed", e))
    })
    .await
    .map_err(|e| internal("list_planets task join error", e))??;

    Ok(Json(planets.into_iter().map(PlanetResponse::from).collect()))
}

/// Handler for `GET /planets/{id}`.
pub async fn get_planet_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(planet_id): Path<i64>,
) -> Result<Json<PlanetResponse>, ApiError> {
    let planet = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        holocron_catalog::get_planet(&conn, planet_id).map_err(|e| match e {
            CatalogError::PlanetNotFound(_) => {
                ApiError::NotFound("Planeta no encontrado".to_string())
            }
            other => internal("planet lookup failed", other),
        })
    })
    .await
    .map_err(|e| internal("get_planet task join error", e))??;

    Ok(Json(planet.into()))
}

/// Handler for `POST /people`.
pub async fn create_character_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(name), Some(films), Some(species)) = (
        required_field(payload.name),
        required_field(payload.films),
        required_field(payload.species),
    ) else {
        return Err(ApiError::BadRequest("Error campos obligatorios".to_string()));
    };

    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        let new = NewCharacter {
            name,
            films,
            species,
        };
        holocron_catalog::create_character(&conn, &new).map_err(|e| match e {
            CatalogError::DuplicateName(_) => {
                ApiError::BadRequest("El personaje ya existe".to_string())
            }
            other => internal("character insert failed", other),
        })
    })
    .await
    .map_err(|e| internal("create_character task join error", e))??;

    Ok((
        StatusCode::CREATED,
        Json(json!({"msg": "Personaje agregado con éxito"})),
    ))
}

/// Handler for `GET /people`.
pub async fn list_characters_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<CharacterResponse>>, ApiError> {
    let characters = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        holocron_catalog::list_characters(&conn)
            .map_err(|e| internal("character listing failed", e))
    })
    .await
    .map_err(|e| internal("list_characters task join error", e))??;

    Ok(Json(
        characters.into_iter().map(CharacterResponse::from).collect(),
    ))
}

/// Handler for `GET /people/{id}`.
pub async fn get_character_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(character_id): Path<i64>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let character = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| internal("db connection failed", e))?;
        holocron_catalog::get_character(&conn, character_id).map_err(|e| match e {
            CatalogError::CharacterNotFound(_) => {
                ApiError::NotFound("Personaje no encontrado".to_string())
            }
            other => internal("character lookup failed", other),
        })
    })
    .await
    .map_err(|e| internal("get_character task join error", e))??;

    Ok(Json(character.into()))
}
