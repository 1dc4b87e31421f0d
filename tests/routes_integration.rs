//! End-to-end tests against the router with an in-memory repository.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use plek_backend::db::repositories::LocalRepository;
use plek_backend::db::repository::{
    BookingRepository, FullRepository, PostRepository, SessionRepository,
};
use plek_backend::http::{create_router, AppState};
use plek_backend::models::{NewBooking, PaymentStatus, Post, StayRange};
use plek_backend::services::{EntitlementVerifier, StaticEntitlements};

const POST_ID: &str = "post-1";
const ENTITLED_TOKEN: &str = "token-entitled";
const PLAIN_TOKEN: &str = "token-plain";

async fn app() -> (Router, Arc<LocalRepository>) {
    let repo = Arc::new(LocalRepository::new());
    repo.store_post(&Post {
        id: POST_ID.to_string(),
        slug: "cabin".to_string(),
        host_id: "cust-host".to_string(),
        title: "Cabin".to_string(),
        nightly_rate: Some(150.0),
        package_settings: vec![],
    })
    .await
    .unwrap();
    repo.insert_session(ENTITLED_TOKEN, "cust-1").await.unwrap();
    repo.insert_session(PLAIN_TOKEN, "cust-2").await.unwrap();

    let billing = StaticEntitlements::new();
    billing.grant("cust-1");

    let state = AppState::new(
        Arc::clone(&repo) as Arc<dyn FullRepository>,
        Arc::new(billing) as Arc<dyn EntitlementVerifier>,
    );
    (create_router(state), repo)
}

async fn seed_booking(repo: &LocalRepository, from: &str, to: &str) {
    repo.create_booking(&NewBooking {
        post_id: POST_ID.to_string(),
        customer_id: "cust-9".to_string(),
        guests: vec![],
        range: StayRange::new(from.parse().unwrap(), to.parse().unwrap()).unwrap(),
        payment_status: PaymentStatus::Paid,
    })
    .await
    .unwrap();
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn availability_respects_checkout_day() {
    let (app, repo) = app().await;
    seed_booking(&repo, "2024-03-04", "2024-03-06").await;

    // Overlapping the booked nights.
    let response = app
        .clone()
        .oneshot(get(
            "/api/bookings/check-availability?postId=post-1&startDate=2024-03-04&endDate=2024-03-06",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["isAvailable"], false);

    // Starting on the checkout day is free.
    let response = app
        .oneshot(get(
            "/api/bookings/check-availability?postId=cabin&startDate=2024-03-06&endDate=2024-03-08",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["isAvailable"], true);
}

#[tokio::test]
async fn availability_validates_input() {
    let (app, _) = app().await;

    let response = app
        .clone()
        .oneshot(get(
            "/api/bookings/check-availability?postId=post-1&startDate=2024-03-04",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // Inverted range.
    let response = app
        .oneshot(get(
            "/api/bookings/check-availability?postId=post-1&startDate=2024-03-08&endDate=2024-03-04",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_creation_requires_a_session() {
    let (app, _) = app().await;
    let response = app
        .oneshot(post_json(
            "/api/bookings",
            None,
            json!({"postId": POST_ID, "fromDate": "2024-05-01", "toDate": "2024-05-03"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn conflicting_booking_returns_contract_message() {
    let (app, repo) = app().await;
    seed_booking(&repo, "2024-05-01", "2024-05-05").await;

    let response = app
        .oneshot(post_json(
            "/api/bookings",
            Some(PLAIN_TOKEN),
            json!({"postId": POST_ID, "fromDate": "2024-05-04", "toDate": "2024-05-06"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BOOKING_CONFLICT");
    assert_eq!(body["message"], "Booking dates are not available.");
}

#[tokio::test]
async fn booking_accepts_datetime_bounds() {
    let (app, _) = app().await;
    let response = app
        .oneshot(post_json(
            "/api/bookings",
            Some(PLAIN_TOKEN),
            json!({
                "postId": "cabin",
                "fromDate": "2024-05-01T18:00:00Z",
                "toDate": "2024-05-03T09:00:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["fromDate"], "2024-05-01");
    assert_eq!(body["toDate"], "2024-05-03");
}

#[tokio::test]
async fn unavailable_dates_are_gated_on_entitlement() {
    let (app, repo) = app().await;
    seed_booking(&repo, "2024-03-04", "2024-03-06").await;

    let response = app
        .clone()
        .oneshot(get_auth(
            "/api/bookings/unavailable-dates?postId=post-1",
            ENTITLED_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["unavailableDates"],
        json!(["2024-03-04", "2024-03-05"])
    );

    // Non-subscribers see an open calendar, not an error.
    let response = app
        .oneshot(get_auth(
            "/api/bookings/unavailable-dates?postId=post-1",
            PLAIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["unavailableDates"], json!([]));
}

#[tokio::test]
async fn estimate_rejects_unknown_package() {
    let (app, _) = app().await;
    let response = app
        .oneshot(post_json(
            "/api/estimates",
            Some(ENTITLED_TOKEN),
            json!({
                "postId": POST_ID,
                "fromDate": "2024-06-01",
                "toDate": "2024-06-04",
                "packageType": "no-such-package"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "PACKAGE_NOT_FOUND");
    assert_eq!(body["message"], "Package not found");
}

#[tokio::test]
async fn estimate_prices_a_catalog_product() {
    let (app, _) = app().await;
    let response = app
        .oneshot(post_json(
            "/api/estimates",
            Some(ENTITLED_TOKEN),
            json!({
                "postId": POST_ID,
                "fromDate": "2024-06-01",
                "toDate": "2024-06-08",
                "packageType": "plek_weekly"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    // 135 fixed price × 7 nights × 1.0
    assert_eq!(body["total"], 945.0);
    assert_eq!(body["packageLabel"], "Weekly Stay");
}

#[tokio::test]
async fn package_creation_validates_multiplier() {
    let (app, _) = app().await;
    let response = app
        .oneshot(post_json(
            "/api/packages",
            Some(ENTITLED_TOKEN),
            json!({
                "postId": POST_ID,
                "name": "Overpriced",
                "category": "standard",
                "multiplier": 5.0,
                "minNights": 1,
                "maxNights": 7
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn suggest_returns_best_fit_for_stay_length() {
    let (app, _) = app().await;
    let response = app
        .oneshot(get("/api/packages/suggest?postId=post-1&nights=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["package"]["id"], "plek_weekly");
}

#[tokio::test]
async fn journey_snapshot_round_trips_per_customer() {
    let (app, _) = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/journey/post-1")
                .header(header::CONTENT_TYPE, "application/json")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {ENTITLED_TOKEN}"),
                )
                .body(Body::from(
                    json!({"packageRef": "plek_weekly", "fromDate": "2024-06-01"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_auth("/api/journey/post-1", ENTITLED_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["packageRef"], "plek_weekly");

    // Another customer has no snapshot for the same post.
    let response = app
        .oneshot(get_auth("/api/journey/post-1", PLAIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
