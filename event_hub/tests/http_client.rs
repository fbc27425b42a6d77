//! Integration tests for the reqwest-backed API client.
//!
//! Runs every endpoint against a local mock server and checks paths,
//! authorization headers, bodies and error mapping.

use event_hub::api::{ApiError, ErrorPayload, EventsApi, HttpEventsApi};
use event_hub::models::{Credentials, ProfileImage, Registration};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn event_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "user": "alice",
        "title": "RustConf",
        "description": "Talks",
        "date": "2026-09-10",
        "time": "09:00:00",
        "event_type": "Conference",
        "organizer": "Rust Foundation",
        "location": "Montreal",
        "capacity": 500,
        "event_code": "#RUST"
    })
}

fn profile_json(picture: Option<&str>) -> serde_json::Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "full_name": "",
        "profile_picture": picture,
        "created_events": [],
        "registered_events": []
    })
}

async fn setup() -> (MockServer, HttpEventsApi) {
    let server = MockServer::start().await;
    let api = HttpEventsApi::new(format!("{}/api/", server.uri()));
    (server, api)
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_list_events_anonymous_has_no_authorization() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/events/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json(1)])))
        .expect(1)
        .mount(&server)
        .await;

    let events = api.list_events(None).await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_code, "#RUST");
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_list_events_with_bearer_token() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/events/"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let events = api.list_events(Some("tok")).await.unwrap();

    assert!(events.is_empty());
}

#[tokio::test]
async fn test_registration_count() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/events/42/registration_count/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"registration_count": 17})),
        )
        .mount(&server)
        .await;

    assert_eq!(api.registration_count(42).await.unwrap(), 17);
}

#[tokio::test]
async fn test_register_posts_form() {
    let (server, api) = setup().await;
    let registration = Registration {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        ..Default::default()
    };
    Mock::given(method("POST"))
        .and(path("/api/events/3/register/"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone_number": "",
            "preferred_contact_method": "Email",
            "city": "",
            "event_attendance_mode": "In-Person",
            "emergency_contact": ""
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    api.register_for_event("tok", 3, &registration).await.unwrap();
}

#[tokio::test]
async fn test_delete_and_unregister_paths() {
    let (server, api) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/5/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/6/register/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api.delete_event("tok", 5).await.unwrap();
    api.unregister_from_event("tok", 6).await.unwrap();
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_obtain_tokens() {
    let (server, api) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({"username": "alice", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a1", "refresh": "r1"})),
        )
        .mount(&server)
        .await;

    let tokens = api
        .obtain_tokens(&Credentials {
            username: "alice".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(tokens.access, "a1");
    assert_eq!(tokens.refresh, "r1");
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_rejection_carries_status_and_body() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .mount(&server)
        .await;

    let err = api.fetch_profile("expired").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(
        err.payload().and_then(ErrorPayload::detail),
        Some("Given token not valid for any token type")
    );
}

#[tokio::test]
async fn test_html_error_body_is_text() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/events/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<h1>Bad Gateway</h1>"))
        .mount(&server)
        .await;

    let err = api.list_events(None).await.unwrap_err();

    assert_eq!(
        err.payload(),
        Some(&ErrorPayload::Text("<h1>Bad Gateway</h1>".to_string()))
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/events/1/registration_count/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = api.registration_count(1).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)), "unexpected error: {err:?}");
}

// ============================================================================
// Profile picture
// ============================================================================

#[tokio::test]
async fn test_upload_profile_picture_is_multipart() {
    let (server, api) = setup().await;
    Mock::given(method("PATCH"))
        .and(path("/api/profile/"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(profile_json(Some("/media/profile_pics/me.png"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let image = ProfileImage::from_file_name("me.png", vec![0x89, 0x50, 0x4e, 0x47]);
    let profile = api.upload_profile_picture("tok", &image).await.unwrap();

    assert_eq!(
        profile.profile_picture.as_deref(),
        Some("/media/profile_pics/me.png")
    );
    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"profile_picture\""));
    assert!(body.contains("filename=\"me.png\""));
}

#[tokio::test]
async fn test_clear_profile_picture_sends_null() {
    let (server, api) = setup().await;
    Mock::given(method("PATCH"))
        .and(path("/api/profile/"))
        .and(body_json(json!({"profile_picture": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(None)))
        .expect(1)
        .mount(&server)
        .await;

    let profile = api.clear_profile_picture("tok").await.unwrap();

    assert!(profile.profile_picture.is_none());
    assert!(profile.full_name.is_none());
}
