//! Database-backed coverage of the registration handlers: the deadline gate
//! on the write path, the upsert behind a double confirm, and the
//! already-paid guard that runs before any storage call.

mod common;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, Request, StatusCode};
use axum::Extension;
use chrono::{Duration as DayOffset, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use api::app::build_router;
use api::error::AppError;
use api::routes::registrations::{confirm_registration, registration_page, RegistrationPageView};
use infra::repos::RegistrationRepo;

use common::*;

#[sqlx::test(migrations = "../../migrations")]
async fn double_confirm_writes_exactly_one_row(pool: PgPool) {
    let state = test_state(pool.clone());
    let user_id = seed_player(&pool).await;
    let event_id = seed_event(&pool, None).await;

    for _ in 0..2 {
        let axum::Json(view) = confirm_registration(
            State(state.clone()),
            Extension(claims_for(user_id)),
            Path(event_id),
        )
        .await
        .expect("confirm");

        match view {
            RegistrationPageView::Registration { registration, .. } => {
                assert!(registration.is_some());
            }
            RegistrationPageView::NeedsProfile => panic!("profile was seeded"),
        }
    }

    assert_eq!(registration_count(&pool, event_id, user_id).await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn confirm_after_the_deadline_writes_nothing(pool: PgPool) {
    let state = test_state(pool.clone());
    let user_id = seed_player(&pool).await;
    let yesterday = Utc::now().date_naive() - DayOffset::days(1);
    let event_id = seed_event(&pool, Some(yesterday)).await;

    let err = confirm_registration(
        State(state),
        Extension(claims_for(user_id)),
        Path(event_id),
    )
    .await
    .expect_err("closed event must reject the confirm");

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(registration_count(&pool, event_id, user_id).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn registration_page_without_a_profile_writes_nothing(pool: PgPool) {
    let state = test_state(pool.clone());
    let event_id = seed_event(&pool, None).await;
    let stranger = uuid::Uuid::new_v4();

    let axum::Json(view) = registration_page(
        State(state),
        Extension(claims_for(stranger)),
        Path(event_id),
    )
    .await
    .expect("page");

    assert!(matches!(view, RegistrationPageView::NeedsProfile));
    assert_eq!(registration_count(&pool, event_id, stranger).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_payment_proof_is_rejected_before_any_storage_call(pool: PgPool) {
    let state = test_state(pool.clone());
    let user_id = seed_player(&pool).await;
    let event_id = seed_event(&pool, None).await;

    let repo = RegistrationRepo::new(pool.clone());
    repo.confirm(event_id, user_id, "Open").await.unwrap();
    repo.mark_paid(event_id, user_id, "kept/upi.png").await.unwrap();

    let boundary = "registryboundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"upi.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         not-really-a-png\r\n\
         --{boundary}--\r\n"
    );

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/events/{event_id}/payment-proof"))
                .header(AUTHORIZATION, bearer_for(user_id))
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    // The storage URL is unroutable, so a 400 (not a 502) proves the guard
    // fired before the upload was even attempted.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json["error"].as_str().unwrap().contains("already recorded"));

    let row = repo.find(event_id, user_id).await.unwrap().unwrap();
    assert_eq!(row.payment_screenshot.as_deref(), Some("kept/upi.png"));
}
