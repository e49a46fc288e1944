use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use std::{path::PathBuf, sync::Arc};
use tower::ServiceExt;

use engine::{COLLECTION, DirectoryStore, DocumentStore, Engine, SqliteStore};
use migration::MigratorTrait;
use uuid::Uuid;

async fn directory_app() -> (Router, Engine, Arc<dyn DocumentStore>) {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_dbs")
        .join(format!("api_{}", Uuid::new_v4()));
    let store: Arc<dyn DocumentStore> = Arc::new(DirectoryStore::open(root).await.unwrap());
    app(store)
}

async fn sqlite_app() -> (Router, Engine, Arc<dyn DocumentStore>) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    app(Arc::new(SqliteStore::new(db)))
}

fn app(store: Arc<dyn DocumentStore>) -> (Router, Engine, Arc<dyn DocumentStore>) {
    let engine = Engine::builder()
        .shared_store(Arc::clone(&store))
        .build()
        .unwrap();
    (server::router(engine.clone()), engine, store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn put_raw(store: &Arc<dyn DocumentStore>, id: i64, name: &str, date: &str, amount: f64) {
    let doc = json!({
        "id": id,
        "name": name,
        "amount": amount,
        "currency": "USD",
        "date": date,
        "note": "",
    });
    store.put(COLLECTION, &id.to_string(), &doc).await.unwrap();
}

#[tokio::test]
async fn add_register_assigns_id_and_persists() {
    for (app, engine, _store) in [directory_app().await, sqlite_app().await] {
        let before = Utc::now().timestamp();
        let body = json!({
            "id": 7,
            "name": "rent",
            "amount": 850.5,
            "currency": "USD",
            "date": "2024-06-01T09:30:00-05:00",
            "note": "June",
        });
        let (status, created) = send(&app, post("/addRegister", body.to_string())).await;
        assert_eq!(status, StatusCode::OK);

        let id = created["id"].as_i64().unwrap();
        assert!(id >= before);
        assert_eq!(created["name"], "rent");
        assert_eq!(created["amount"], 850.5);
        assert_eq!(created["currency"], "USD");
        assert_eq!(created["date"], "2024-06-01T09:30:00-05:00");
        assert_eq!(created["note"], "June");

        let stored = engine.registers().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);

        let (status, listed) = send(&app, get("/getRegister")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([created]));
    }
}

#[tokio::test]
async fn add_register_ignores_content_type() {
    let (app, _engine, _store) = directory_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/addRegister")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"name":"food","date":"2024-06-01T00:00:00Z"}"#))
        .unwrap();

    let (status, created) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["amount"], 0.0);
    assert_eq!(created["note"], "");
}

#[tokio::test]
async fn malformed_body_is_rejected_without_writes() {
    let (app, engine, _store) = directory_app().await;

    let (status, body) = send(&app, post("/addRegister", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, _) = send(&app, post("/addRegister", r#"{"name": "rent"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(engine.registers().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_store_answers_with_empty_results() {
    for (app, _engine, _store) in [directory_app().await, sqlite_app().await] {
        let (status, body) = send(&app, get("/getRegister?name=rent&currency=USD")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send(&app, get("/getMonthConsumption?name=rent&currency=USD")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalConsumption"].as_f64(), Some(0.0));
    }
}

#[tokio::test]
async fn get_register_filters_by_date_range() {
    let (app, _engine, store) = directory_app().await;
    put_raw(&store, 1, "rent", "2024-01-01T00:00:00Z", 10.0).await;
    put_raw(&store, 2, "rent", "2024-06-01T00:00:00Z", 20.0).await;
    put_raw(&store, 3, "rent", "2024-12-01T00:00:00Z", 30.0).await;
    put_raw(&store, 4, "food", "2024-06-01T00:00:00Z", 5.0).await;

    let uri = "/getRegister?name=rent&currency=USD&startDate=2024-02-01T00:00:00Z&endDate=2024-11-01T00:00:00Z";
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2]);

    let (_, again) = send(&app, get(uri)).await;
    assert_eq!(body, again);

    let (_, all) = send(&app, get("/getRegister?name=&currency=")).await;
    assert_eq!(all.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unparsable_dates_do_not_restrict_results() {
    let (app, _engine, store) = directory_app().await;
    put_raw(&store, 1, "rent", "2024-01-01T00:00:00Z", 10.0).await;
    put_raw(&store, 2, "rent", "2024-06-01T00:00:00Z", 20.0).await;

    let (status, body) = send(&app, get("/getRegister?startDate=last-week&endDate=2024")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn month_consumption_sums_recent_registers() {
    let (app, _engine, store) = sqlite_app().await;
    let now = Utc::now();
    put_raw(&store, 1, "rent", &(now - Duration::days(10)).to_rfc3339(), 100.0).await;
    put_raw(&store, 2, "rent", &(now - Duration::days(40)).to_rfc3339(), 50.0).await;

    let (status, body) = send(&app, get("/getMonthConsumption?name=rent&currency=USD")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalConsumption"].as_f64(), Some(100.0));
}

#[tokio::test]
async fn corrupted_document_is_a_server_error() {
    let (app, _engine, store) = directory_app().await;
    store
        .put(COLLECTION, "1", &json!({"unexpected": true}))
        .await
        .unwrap();

    let (status, body) = send(&app, get("/getRegister")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some());

    let (status, _) = send(&app, get("/getMonthConsumption?name=a&currency=b")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn empty_consumption_serializes_as_positive_zero() {
    let (app, _engine, store) = directory_app().await;
    let old = (Utc::now() - Duration::days(90)).to_rfc3339();
    put_raw(&store, 1, "rent", &old, 10.0).await;

    for uri in [
        "/getMonthConsumption?name=rent&currency=USD",
        "/getMonthConsumption?name=food&currency=USD",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"totalConsumption":0.0}"#);
    }
}

#[tokio::test]
async fn repeated_query_parameters_use_first_value() {
    let (app, _engine, store) = directory_app().await;
    let recent = (Utc::now() - Duration::days(1)).to_rfc3339();
    put_raw(&store, 1, "a", &recent, 10.0).await;
    put_raw(&store, 2, "b", &recent, 20.0).await;

    let (status, body) = send(&app, get("/getRegister?name=a&name=b")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a"]);

    let (status, body) = send(
        &app,
        get("/getMonthConsumption?name=b&name=a&currency=USD&currency=EUR"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalConsumption"].as_f64(), Some(20.0));
}

#[tokio::test]
async fn add_register_accepts_null_fields() {
    let (app, _engine, _store) = directory_app().await;
    let body = r#"{"name":"rent","amount":null,"currency":"USD","note":null,"date":"2024-06-01T00:00:00Z"}"#;

    let (status, created) = send(&app, post("/addRegister", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["amount"], 0.0);
    assert_eq!(created["note"], "");
}
