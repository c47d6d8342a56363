use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use holocron_db::{create_pool, run_migrations, DbPool, PoolSettings};
use holocron_server::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn setup_app() -> (axum::Router, DbPool) {
    let db_id = uuid::Uuid::new_v4();
    let db_path = format!("file:memdb{}?mode=memory&cache=shared", db_id);
    let pool = create_pool(&db_path, PoolSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }
    (app(AppState { pool: pool.clone() }), pool)
}

async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn tatooine() -> Value {
    json!({
        "nombre_planeta": "Tatooine",
        "ubicacion_planeta": "Outer Rim",
        "habitantes_planeta": "Sand People"
    })
}

fn luke() -> Value {
    json!({
        "nombre_personaje": "Luke Skywalker",
        "peliculas_personaje": "IV, V, VI",
        "raza_personaje": "Human"
    })
}

#[tokio::test]
async fn test_create_planet_success() {
    let (app, _pool) = setup_app();

    let (status, body) = send_json(&app, "POST", "/planets", tatooine()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["msg"], "Planeta agregado con éxito");
}

#[tokio::test]
async fn test_planet_wire_format() {
    let (app, _pool) = setup_app();
    send_json(&app, "POST", "/planets", tatooine()).await;

    let (status, body) = send_get(&app, "/planets/1").await;
    assert_eq!(status, StatusCode::OK);
    // The read serializer uses `habitantes`, not `habitantes_planeta` —
    // existing clients depend on this asymmetry.
    assert_eq!(
        body,
        json!({
            "id": 1,
            "nombre_planeta": "Tatooine",
            "ubicacion_planeta": "Outer Rim",
            "habitantes": "Sand People"
        })
    );
}

#[tokio::test]
async fn test_create_planet_missing_fields() {
    let (app, _pool) = setup_app();

    for body in [
        json!({}),
        json!({"nombre_planeta": "Tatooine"}),
        json!({"nombre_planeta": "Tatooine", "ubicacion_planeta": "Outer Rim"}),
        json!({"nombre_planeta": "", "ubicacion_planeta": "Outer Rim", "habitantes_planeta": "x"}),
    ] {
        let (status, response) = send_json(&app, "POST", "/planets", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body was: {body}");
        assert_eq!(response["msg"], "Error campos obligatorios");
    }
}

#[tokio::test]
async fn test_duplicate_planet_name() {
    let (app, pool) = setup_app();

    send_json(&app, "POST", "/planets", tatooine()).await;
    let (status, body) = send_json(&app, "POST", "/planets", tatooine()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "El planeta ya existe");

    let conn = pool.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM planets", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_list_planets() {
    let (app, _pool) = setup_app();

    let (status, body) = send_get(&app, "/planets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    send_json(&app, "POST", "/planets", tatooine()).await;

    let (status, body) = send_get(&app, "/planets").await;
    assert_eq!(status, StatusCode::OK);
    let planets = body.as_array().expect("expected an array");
    assert_eq!(planets.len(), 1);
    assert_eq!(planets[0]["nombre_planeta"], "Tatooine");
}

#[tokio::test]
async fn test_get_planet_not_found() {
    let (app, _pool) = setup_app();

    let (status, body) = send_get(&app, "/planets/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Planeta no encontrado");
}

#[tokio::test]
async fn test_create_character_success() {
    let (app, _pool) = setup_app();

    let (status, body) = send_json(&app, "POST", "/people", luke()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["msg"], "Personaje agregado con éxito");
}

#[tokio::test]
async fn test_character_wire_format() {
    let (app, _pool) = setup_app();
    send_json(&app, "POST", "/people", luke()).await;

    let (status, body) = send_get(&app, "/people/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "nombre_personaje": "Luke Skywalker",
            "peliculas_personaje": "IV, V, VI",
            "raza_personaje": "Human"
        })
    );
}

#[tokio::test]
async fn test_create_character_missing_fields() {
    let (app, _pool) = setup_app();

    let (status, body) = send_json(
        &app,
        "POST",
        "/people",
        json!({"nombre_personaje": "Luke Skywalker"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Error campos obligatorios");
}

#[tokio::test]
async fn test_duplicate_character_name() {
    let (app, _pool) = setup_app();

    send_json(&app, "POST", "/people", luke()).await;
    let (status, body) = send_json(&app, "POST", "/people", luke()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "El personaje ya existe");
}

#[tokio::test]
async fn test_list_characters() {
    let (app, _pool) = setup_app();

    send_json(&app, "POST", "/people", luke()).await;
    send_json(
        &app,
        "POST",
        "/people",
        json!({
            "nombre_personaje": "R2-D2",
            "peliculas_personaje": "IV",
            "raza_personaje": "Droid"
        }),
    )
    .await;

    let (status, body) = send_get(&app, "/people").await;
    assert_eq!(status, StatusCode::OK);
    let characters = body.as_array().expect("expected an array");
    assert_eq!(characters.len(), 2);
    assert_eq!(characters[1]["raza_personaje"], "Droid");
}

#[tokio::test]
async fn test_get_character_not_found() {
    let (app, _pool) = setup_app();

    let (status, body) = send_get(&app, "/people/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Personaje no encontrado");
}
