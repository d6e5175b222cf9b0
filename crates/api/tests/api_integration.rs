//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain::{Argon2PasswordEncoder, InMemoryMailer, Services};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup_with_mailer() -> (Router, InMemoryMailer) {
    let mailer = InMemoryMailer::new();
    let services = Services {
        password_encoder: Arc::new(Argon2PasswordEncoder::with_params(1024, 1, 1).unwrap()),
        mailer: Arc::new(mailer.clone()),
    };
    let state = api::create_in_memory_state(&services);
    (api::create_app(state, get_metrics_handle()), mailer)
}

fn setup() -> Router {
    setup_with_mailer().0
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, uri: &str, body: Value) -> i64 {
    let (status, json) = send(app, "POST", uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "memory");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    create(&app, "/api/authors", json!({ "name": "Quiroga" })).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

mod authors {
    use super::*;

    #[tokio::test]
    async fn test_author_lifecycle() {
        let app = setup();

        let (status, json) =
            send(&app, "POST", "/api/authors", Some(json!({ "name": "Onetti" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["message"], "Author created successfully!");
        let id = json["data"]["id"].as_i64().unwrap();

        let (status, json) = send(
            &app,
            "PUT",
            &format!("/api/authors/{id}"),
            Some(json!({ "name": "Juan Carlos Onetti" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], "Author updated successfully!");

        let (status, json) = send(&app, "GET", &format!("/api/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], id);
        assert_eq!(json["data"]["name"], "Juan Carlos Onetti");

        let (status, json) = send(&app, "GET", "/api/authors", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "DELETE", &format!("/api/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, "GET", &format!("/api/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], format!("Author {id} not found"));
    }

    #[tokio::test]
    async fn test_blank_name_is_bad_request() {
        let app = setup();

        let (status, json) = send(&app, "POST", "/api/authors", Some(json!({ "name": " " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Author name is required");
    }

    #[tokio::test]
    async fn test_update_missing_author_is_not_found() {
        let app = setup();

        let (status, _) =
            send(&app, "PUT", "/api/authors/42", Some(json!({ "name": "" }))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = setup();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/authors")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"name\": "))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let app = setup();

        let (status, json) = send(&app, "GET", "/api/authors/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn test_subject_and_category_lifecycle() {
        let app = setup();

        let subject = create(&app, "/api/subjects", json!({ "description": "Poetry" })).await;
        let (status, json) = send(&app, "GET", &format!("/api/subjects/{subject}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["description"], "Poetry");

        let category = create(
            &app,
            "/api/categories",
            json!({ "name": "  Classics ", "description": "Old books" }),
        )
        .await;
        let (_, json) = send(&app, "GET", &format!("/api/categories/{category}"), None).await;
        assert_eq!(json["data"]["name"], "Classics");
        assert_eq!(json["data"]["description"], "Old books");

        let (status, _) = send(&app, "DELETE", &format!("/api/subjects/{subject}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", &format!("/api/subjects/{subject}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_book_with_relations() {
        let app = setup();
        let author = create(&app, "/api/authors", json!({ "name": "Storni" })).await;
        let subject = create(&app, "/api/subjects", json!({ "description": "Poetry" })).await;

        let book = create(
            &app,
            "/api/books",
            json!({
                "title": "Ocre",
                "edition": 1,
                "publishYear": 1925,
                "price": 1200,
                "publisher": "Babel",
                "subjectIds": [subject, 99],
                "authorIds": [author]
            }),
        )
        .await;

        let (status, json) = send(&app, "GET", &format!("/api/books/{book}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["title"], "Ocre");
        assert_eq!(data["publishYear"], "1925");
        assert_eq!(data["authors"][0]["name"], "Storni");
        assert_eq!(data["subjects"].as_array().unwrap().len(), 1);

        let (status, json) = send(
            &app,
            "PUT",
            &format!("/api/books/{book}"),
            Some(json!({
                "title": "Ocre",
                "edition": 0,
                "publishYear": "1925",
                "price": 1200,
                "publisher": "Babel"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Edition must be at least 1, got 0");
    }

    #[tokio::test]
    async fn test_books_by_author_report() {
        let app = setup();
        let author = create(&app, "/api/authors", json!({ "name": "Storni" })).await;
        create(&app, "/api/authors", json!({ "name": "Idle" })).await;
        for title in ["Ocre", "Mundo de siete pozos"] {
            create(
                &app,
                "/api/books",
                json!({
                    "title": title,
                    "edition": 1,
                    "publishYear": "1934",
                    "price": 900,
                    "publisher": "Tor",
                    "authorIds": [author]
                }),
            )
            .await;
        }

        let (status, json) = send(&app, "GET", "/api/reports/books-by-author", None).await;

        assert_eq!(status, StatusCode::OK);
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["authorName"], "Storni");
        assert_eq!(rows[0]["bookTitles"], "Mundo de siete pozos, Ocre");
        assert_eq!(rows[1]["bookTitles"], Value::Null);
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn test_create_user_sends_welcome_mail() {
        let (app, mailer) = setup_with_mailer();

        let id = create(
            &app,
            "/api/users",
            json!({ "email": "ada@example.com", "roles": ["ROLE_ADMIN"], "name": "Ada" }),
        )
        .await;

        let (status, json) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let user = &json["data"];
        assert_eq!(user["email"], "ada@example.com");
        assert_eq!(user["roles"], json!(["ROLE_ADMIN", "ROLE_USER"]));
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
        assert!(user["createdAt"].is_string());

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let app = setup();
        create(&app, "/api/users", json!({ "email": "ada@example.com" })).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/users",
            Some(json!({ "email": "ada@example.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "A user with this email already exists");
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let app = setup();

        let (status, json) = send(
            &app,
            "POST",
            "/api/users",
            Some(json!({ "email": "ada@example.com", "roles": ["ROLE_ROOT"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid role: ROLE_ROOT");

        let (status, json) =
            send(&app, "POST", "/api/users", Some(json!({ "email": "nope" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Please provide a valid email address");
    }

    #[tokio::test]
    async fn test_list_users_paginates_newest_first() {
        let app = setup();
        for email in ["a@example.com", "b@other.org", "c@example.com"] {
            create(&app, "/api/users", json!({ "email": email })).await;
        }

        let (status, json) = send(&app, "GET", "/api/users?page=1&limit=1&search=example", None).await;

        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["users"].as_array().unwrap().len(), 1);
        assert_eq!(data["users"][0]["email"], "c@example.com");
        assert_eq!(
            data["pagination"],
            json!({ "page": 1, "limit": 1, "total": 2, "pages": 2 })
        );

        let (_, json) = send(&app, "GET", "/api/users?limit=abc", None).await;
        assert_eq!(json["data"]["pagination"]["limit"], 10);
        assert_eq!(json["data"]["pagination"]["total"], 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let app = setup();
        let id = create(&app, "/api/users", json!({ "email": "ada@example.com" })).await;

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/users/{id}"),
            Some(json!({
                "email": "lovelace@example.com",
                "name": "Ada Lovelace",
                "password": "Analytical1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
        assert_eq!(json["data"]["email"], "lovelace@example.com");
        assert_eq!(json["data"]["name"], "Ada Lovelace");

        let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, json) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], format!("User {id} not found"));
    }
}
