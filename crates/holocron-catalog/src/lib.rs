//! Catalog records for the Holocron backend: planets and characters.
//!
//! Implements creation, single-record lookup, and listing for the two
//! catalog tables. Both tables enforce name uniqueness at the schema
//! level; the duplicate case surfaces as [`CatalogError::DuplicateName`]
//! rather than being detected by a separate pre-insert query, so two
//! concurrent inserts of the same name cannot both succeed.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("planet not found: {0}")]
    PlanetNotFound(i64),
    #[error("character not found: {0}")]
    CharacterNotFound(i64),
    #[error("name already exists: {0}")]
    DuplicateName(String),
}

/// True when the error is a UNIQUE constraint failure (as opposed to any
/// other constraint class, e.g. NOT NULL or foreign key).
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// A catalog planet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Planet {
    /// Database ID.
    pub id: i64,
    /// Display name, unique across the catalog.
    pub name: String,
    /// Where the planet sits (e.g. "Outer Rim").
    pub location: String,
    /// Free-text description of the inhabitants.
    pub inhabitants: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// Fields for creating a new planet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlanet {
    pub name: String,
    pub location: String,
    pub inhabitants: String,
}

/// A catalog character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    /// Database ID.
    pub id: i64,
    /// Display name, unique across the catalog.
    pub name: String,
    /// Films the character appears in.
    pub films: String,
    /// Species of the character.
    pub species: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// Fields for creating a new character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    pub films: String,
    pub species: String,
}

/// Creates a new planet and returns the stored row.
///
/// Returns [`CatalogError::DuplicateName`] if a planet with the same name
/// already exists.
pub fn create_planet(conn: &Connection, new: &NewPlanet) -> Result<Planet, CatalogError> {
    conn.execute(
        "INSERT INTO planets (name, location, inhabitants) VALUES (?1, ?2, ?3)",
        params![new.name, new.location, new.inhabitants],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            CatalogError::DuplicateName(new.name.clone())
        } else {
            CatalogError::Database(e)
        }
    })?;

    get_planet(conn, conn.last_insert_rowid())
}

/// Retrieves a planet by ID.
pub fn get_planet(conn: &Connection, id: i64) -> Result<Planet, CatalogError> {
    conn.query_row(
        "SELECT id, name, location, inhabitants, created_at FROM planets WHERE id = ?1",
        [id],
        map_row_to_planet,
    )
    .optional()?
    .ok_or(CatalogError::PlanetNotFound(id))
}

/// Lists all planets, oldest first.
pub fn list_planets(conn: &Connection) -> Result<Vec<Planet>, CatalogError> {
    let mut stmt = conn
        .prepare("SELECT id, name, location, inhabitants, created_at FROM planets ORDER BY id ASC")?;

    let rows = stmt.query_map([], map_row_to_planet)?;
    let mut planets = Vec::new();
    for row in rows {
        planets.push(row?);
    }
    Ok(planets)
}

fn map_row_to_planet(row: &Row) -> rusqlite::Result<Planet> {
    Ok(Planet {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        inhabitants: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Creates a new character and returns the stored row.
///
/// Returns [`CatalogError::DuplicateName`] if a character with the same
/// name already exists.
pub fn create_character(conn: &Connection, new: &NewCharacter) -> Result<Character, CatalogError> {
    conn.execute(
        "INSERT INTO characters (name, films, species) VALUES (?1, ?2, ?3)",
        params![new.name, new.films, new.species],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            CatalogError::DuplicateName(new.name.clone())
        } else {
            CatalogError::Database(e)
        }
    })?;

    get_character(conn, conn.last_insert_rowid())
}

/// Retrieves a character by ID.
pub fn get_character(conn: &Connection, id: i64) -> Result<Character, CatalogError> {
    conn.query_row(
        "SELECT id, name, films, species, created_at FROM characters WHERE id = ?1",
        [id],
        map_row_to_character,
    )
    .optional()?
    .ok_or(CatalogError::CharacterNotFound(id))
}

/// Lists all characters, oldest first.
pub fn list_characters(conn: &Connection) -> Result<Vec<Character>, CatalogError> {
    let mut stmt =
        conn.prepare("SELECT id, name, films, species, created_at FROM characters ORDER BY id ASC")?;

    let rows = stmt.query_map([], map_row_to_character)?;
    let mut characters = Vec::new();
    for row in rows {
        characters.push(row?);
    }
    Ok(characters)
}

fn map_row_to_character(row: &Row) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(0)?,
        name: row.get(1)?,
        films: row.get(2)?,
        species: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use holocron_db::run_migrations;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().expect("failed to open in-memory db");
        run_migrations(&conn).expect("failed to run migrations");
        conn
    }

    fn tatooine() -> NewPlanet {
        NewPlanet {
            name: "Tatooine".to_string(),
            location: "Outer Rim".to_string(),
            inhabitants: "Sand People".to_string(),
        }
    }

    #[test]
    fn test_create_and_get_planet() {
        let conn = setup_db();

        let created = create_planet(&conn, &tatooine()).expect("create planet failed");
        assert_eq!(created.name, "Tatooine");
        assert!(created.id > 0);

        let fetched = get_planet(&conn, created.id).expect("get planet failed");
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_duplicate_planet_name() {
        let conn = setup_db();

        create_planet(&conn, &tatooine()).expect("first create failed");
        let err = create_planet(&conn, &tatooine()).unwrap_err();
        match err {
            CatalogError::DuplicateName(name) => assert_eq!(name, "Tatooine"),
            other => panic!("expected DuplicateName, got {other:?}"),
        }

        // Exactly one row survived.
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM planets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_get_planet_not_found() {
        let conn = setup_db();

        let err = get_planet(&conn, 42).unwrap_err();
        match err {
            CatalogError::PlanetNotFound(id) => assert_eq!(id, 42),
            other => panic!("expected PlanetNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_list_planets_ordered_by_id() {
        let conn = setup_db();
        assert!(list_planets(&conn).unwrap().is_empty());

        create_planet(&conn, &tatooine()).unwrap();
        create_planet(
            &conn,
            &NewPlanet {
                name: "Hoth".to_string(),
                location: "Anoat sector".to_string(),
                inhabitants: "Wampas".to_string(),
            },
        )
        .unwrap();

        let planets = list_planets(&conn).expect("list planets failed");
        assert_eq!(planets.len(), 2);
        assert_eq!(planets[0].name, "Tatooine");
        assert_eq!(planets[1].name, "Hoth");
    }

    #[test]
    fn test_create_and_get_character() {
        let conn = setup_db();

        let new = NewCharacter {
            name: "Luke Skywalker".to_string(),
            films: "IV, V, VI".to_string(),
            species: "Human".to_string(),
        };
        let created = create_character(&conn, &new).expect("create character failed");
        assert_eq!(created.species, "Human");

        let fetched = get_character(&conn, created.id).expect("get character failed");
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_duplicate_character_name() {
        let conn = setup_db();

        let new = NewCharacter {
            name: "Chewbacca".to_string(),
            films: "IV, V, VI".to_string(),
            species: "Wookiee".to_string(),
        };
        create_character(&conn, &new).expect("first create failed");
        let err = create_character(&conn, &new).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }

    #[test]
    fn test_get_character_not_found() {
        let conn = setup_db();

        let err = get_character(&conn, 7).unwrap_err();
        assert!(matches!(err, CatalogError::CharacterNotFound(7)));
    }

    #[test]
    fn test_list_characters() {
        let conn = setup_db();

        for (name, species) in [("Leia Organa", "Human"), ("R2-D2", "Droid")] {
            create_character(
                &conn,
                &NewCharacter {
                    name: name.to_string(),
                    films: "IV".to_string(),
                    species: species.to_string(),
                },
            )
            .unwrap();
        }

        let characters = list_characters(&conn).expect("list characters failed");
        assert_eq!(characters.len(), 2);
        assert_eq!(characters[1].name, "R2-D2");
    }
}
