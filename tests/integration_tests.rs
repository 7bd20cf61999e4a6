use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use tower::ServiceExt;

use studio_booking::config::AppConfig;
use studio_booking::db;
use studio_booking::router::build_router;
use studio_booking::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "s3cret".to_string(),
        admin_token: "test-token".to_string(),
        default_slot_minutes: 90,
        cancelled_blocks_slot: false,
        hide_past_slots: false,
        cors_origins: vec!["*".to_string()],
        default_whatsapp_number: "+5588998376642".to_string(),
    }
}

fn test_app() -> Router {
    test_app_with(test_config())
}

fn test_app_with(config: AppConfig) -> Router {
    let conn = db::init_db(":memory:").unwrap();
    build_router(Arc::new(AppState::new(conn, config)))
}

/// A date of the given weekday at least a week before today.
fn recent(weekday: Weekday) -> String {
    let mut date: NaiveDate = Local::now().date_naive() - Duration::days(7);
    while date.weekday() != weekday {
        date = date.pred_opt().unwrap();
    }
    date.format("%Y-%m-%d").to_string()
}

/// A date of the given weekday at least a week from today.
fn upcoming(weekday: Weekday) -> String {
    let mut date: NaiveDate = Local::now().date_naive() + Duration::days(7);
    while date.weekday() != weekday {
        date = date.succ_opt().unwrap();
    }
    date.format("%Y-%m-%d").to_string()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn admin_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value, admin: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if admin {
        builder = builder.header("Authorization", "Bearer test-token");
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn first_service_id(app: &Router) -> String {
    let (_, services) = send(app, get("/api/services")).await;
    services[0]["id"].as_str().unwrap().to_string()
}

async fn slots(app: &Router, date: &str) -> Vec<String> {
    let (status, body) = send(app, get(&format!("/api/bookings/available-slots?date={date}"))).await;
    assert_eq!(status, StatusCode::OK);
    body["available_slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn booking_body(service_id: &str, date: &str, time: &str) -> serde_json::Value {
    serde_json::json!({
        "customer_name": "Fernanda",
        "phone": "+5588955556666",
        "service_id": service_id,
        "date": date,
        "time": time,
    })
}

// ── Health & Auth ──

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_success() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({"username": "admin", "password": "s3cret"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "test-token");
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({"username": "admin", "password": "nope"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = test_app();
    let (status, _) = send(&app, get("/api/bookings")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/bookings")
        .header("Authorization", "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/settings", serde_json::json!({"whatsapp_number": "+1"}), false),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Availability ──

#[tokio::test]
async fn test_default_weekday_slots() {
    let app = test_app();
    assert_eq!(
        slots(&app, &upcoming(Weekday::Mon)).await,
        vec!["08:00", "09:30", "11:00", "12:30", "14:00", "15:30"]
    );
    assert_eq!(slots(&app, &upcoming(Weekday::Sat)).await, vec!["08:00", "09:30"]);
    assert!(slots(&app, &upcoming(Weekday::Sun)).await.is_empty());
}

#[tokio::test]
async fn test_slots_malformed_date() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/bookings/available-slots?date=2030-13-40")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid date"));
}

#[tokio::test]
async fn test_slots_unknown_service() {
    let app = test_app();
    let date = upcoming(Weekday::Mon);
    let (status, _) = send(
        &app,
        get(&format!("/api/bookings/available-slots?date={date}&service_id=missing")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let service_id = first_service_id(&app).await;
    let (status, body) = send(
        &app,
        get(&format!("/api/bookings/available-slots?date={date}&service_id={service_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_slots"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_date_status_matches_slots() {
    let app = test_app();
    for weekday in [Weekday::Mon, Weekday::Wed, Weekday::Sat, Weekday::Sun] {
        let date = upcoming(weekday);
        let (status, body) = send(&app, get(&format!("/api/bookings/date-status?date={date}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], date.as_str());
        assert_eq!(body["disabled"].as_bool().unwrap(), slots(&app, &date).await.is_empty());
    }
}

#[tokio::test]
async fn test_past_dates_keep_slots_by_default() {
    let app = test_app();
    let monday = recent(Weekday::Mon);
    assert_eq!(slots(&app, &monday).await.len(), 6);
    let (_, body) = send(&app, get(&format!("/api/bookings/date-status?date={monday}"))).await;
    assert_eq!(body["disabled"], false);
}

#[tokio::test]
async fn test_date_status_matches_slots_when_hiding_past() {
    let app = test_app_with(AppConfig {
        hide_past_slots: true,
        ..test_config()
    });
    for date in [recent(Weekday::Mon), recent(Weekday::Sun), upcoming(Weekday::Mon)] {
        let (status, body) = send(&app, get(&format!("/api/bookings/date-status?date={date}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["disabled"].as_bool().unwrap(), slots(&app, &date).await.is_empty(), "{date}");
    }
    assert!(slots(&app, &recent(Weekday::Mon)).await.is_empty());
    assert!(!slots(&app, &upcoming(Weekday::Mon)).await.is_empty());
}

// ── Bookings ──

#[tokio::test]
async fn test_booking_flow() {
    let app = test_app();
    let service_id = first_service_id(&app).await;
    let date = upcoming(Weekday::Tue);

    let (status, created) = send(
        &app,
        json_request("POST", "/api/bookings", booking_body(&service_id, &date, "11:00"), false),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["date"], date.as_str());
    assert_eq!(created["whatsapp_number"], "+5588998376642");
    assert!(!created["service_name"].as_str().unwrap().is_empty());

    assert!(!slots(&app, &date).await.contains(&"11:00".to_string()));

    let (status, body) = send(
        &app,
        json_request("POST", "/api/bookings", booking_body(&service_id, &date, "11:00"), false),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already booked"));

    let (status, list) = send(&app, admin_get("/api/bookings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let id = created["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/api/bookings/{id}/status?status=cancelled"), serde_json::json!({}), true),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(slots(&app, &date).await.contains(&"11:00".to_string()));
}

#[tokio::test]
async fn test_booking_rejects_closed_day_and_off_grid() {
    let app = test_app();
    let service_id = first_service_id(&app).await;

    let (status, _) = send(
        &app,
        json_request("POST", "/api/bookings", booking_body(&service_id, &upcoming(Weekday::Sun), "08:00"), false),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/bookings", booking_body(&service_id, &upcoming(Weekday::Mon), "08:45"), false),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/bookings", booking_body(&service_id, "tomorrow", "08:00"), false),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_unknown_service() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request("POST", "/api/bookings", booking_body("missing", &upcoming(Weekday::Mon), "08:00"), false),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_status_validation() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request("PUT", "/api/bookings/missing/status?status=confirmed", serde_json::json!({}), true),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/bookings/missing/status?status=archived", serde_json::json!({}), true),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Business Hours ──

#[tokio::test]
async fn test_business_hours_listing() {
    let app = test_app();
    let (status, hours) = send(&app, get("/api/business-hours")).await;
    assert_eq!(status, StatusCode::OK);
    let hours = hours.as_array().unwrap();
    assert_eq!(hours.len(), 7);
    for (i, h) in hours.iter().enumerate() {
        assert_eq!(h["day_of_week"], i as u64);
    }
    assert_eq!(hours[6]["is_open"], false);
}

#[tokio::test]
async fn test_open_sunday_enables_date() {
    let app = test_app();
    let sunday = upcoming(Weekday::Sun);

    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            "/api/business-hours/6",
            serde_json::json!({"is_open": true, "open_time": "10:00", "close_time": "13:00", "interval_minutes": 60}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_open"], true);

    assert_eq!(slots(&app, &sunday).await, vec!["10:00", "11:00", "12:00"]);
    let (_, body) = send(&app, get(&format!("/api/bookings/date-status?date={sunday}"))).await;
    assert_eq!(body["disabled"], false);
}

#[tokio::test]
async fn test_close_monday_disables_date() {
    let app = test_app();
    let monday = upcoming(Weekday::Mon);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/business-hours/0", serde_json::json!({"is_open": false}), true),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(slots(&app, &monday).await.is_empty());
    let (_, body) = send(&app, get(&format!("/api/bookings/date-status?date={monday}"))).await;
    assert_eq!(body["disabled"], true);
}

#[tokio::test]
async fn test_business_hours_validation() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request("PUT", "/api/business-hours/7", serde_json::json!({"is_open": true}), true),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/business-hours/1",
            serde_json::json!({"is_open": true, "open_time": "18:00", "close_time": "09:00"}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/business-hours/1", serde_json::json!({"is_open": true, "open_time": "9h"}), true),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Services ──

#[tokio::test]
async fn test_service_lifecycle() {
    let app = test_app();

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/api/services",
            serde_json::json!({"name": "Lash Lifting", "description": "Natural curl", "price": 120.0}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["active"], true);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        json_request("PUT", &format!("/api/services/{id}"), serde_json::json!({"active": false}), true),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Lash Lifting");
    assert_eq!(updated["active"], false);

    let (_, public) = send(&app, get("/api/services")).await;
    assert!(!public.as_array().unwrap().iter().any(|s| s["id"] == id.as_str()));
    let (_, all) = send(&app, get("/api/services?active_only=false")).await;
    assert!(all.as_array().unwrap().iter().any(|s| s["id"] == id.as_str()));

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/services/{id}"))
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/api/services/{id}"), serde_json::json!({"price": 1.0}), true),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_service_negative_price_rejected() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/services",
            serde_json::json!({"name": "Broken", "description": "", "price": -5.0}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Settings & Upload ──

#[tokio::test]
async fn test_settings_roundtrip() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/settings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["whatsapp_number"], "+5588998376642");

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/settings", serde_json::json!({"whatsapp_number": "+5511988887777"}), true),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/api/settings")).await;
    assert_eq!(body["whatsapp_number"], "+5511988887777");
}

fn multipart_request(field: &str, admin: bool) -> Request<Body> {
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"lash.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         hi\r\n\
         --{boundary}--\r\n"
    );
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/upload-image")
        .header("Content-Type", format!("multipart/form-data; boundary={boundary}"));
    if admin {
        builder = builder.header("Authorization", "Bearer test-token");
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_upload_image() {
    let app = test_app();
    let (status, body) = send(&app, multipart_request("file", true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image_url"], "data:image/png;base64,aGk=");

    let (status, _) = send(&app, multipart_request("other", true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, multipart_request("file", false)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
