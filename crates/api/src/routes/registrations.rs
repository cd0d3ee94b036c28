//! The event registration page and its two write actions.

use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use infra::models::{EventRow, PaymentStatus, RegistrationRow};
use infra::registration::{
    can_confirm, can_upload_payment_proof, derive_state, status_message, RegistrationState,
};
use infra::repos::{EventRepo, ProfileRepo, RegistrationRepo};

use crate::auth::Claims;
use crate::error::AppError;
use crate::services::documents::{payment_proof_path, UploadedFile};
use crate::services::storage::PAYMENT_PROOFS_BUCKET;
use crate::state::AppState;

/// Everything the registration page needs, derived fresh from the latest
/// read. `needs_profile` tells the client to route through the
/// complete-your-profile flow before anything is written.
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum RegistrationPageView {
    NeedsProfile,
    Registration {
        event: EventRow,
        state: RegistrationState,
        status_message: Option<&'static str>,
        can_confirm: bool,
        can_upload_payment_proof: bool,
        registration: Option<RegistrationRow>,
    },
}

/// Pure projection of the page from the loaded rows; no I/O.
pub fn project_registration_page(
    event: EventRow,
    registration: Option<RegistrationRow>,
    today: NaiveDate,
) -> RegistrationPageView {
    let state = derive_state(registration.as_ref(), event.registration_deadline, today);
    let message = registration
        .as_ref()
        .map(|r| status_message(r.payment_status, r.verification_status));

    RegistrationPageView::Registration {
        event,
        state,
        status_message: message,
        can_confirm: can_confirm(state),
        can_upload_payment_proof: can_upload_payment_proof(state),
        registration,
    }
}

async fn load_page(
    state: &AppState,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<(Option<EventRow>, Option<RegistrationRow>, bool), AppError> {
    let has_profile = ProfileRepo::new(state.db.clone()).get(user_id).await?.is_some();
    let event = EventRepo::new(state.db.clone()).get(event_id).await?;
    let registration = match &event {
        Some(_) => {
            RegistrationRepo::new(state.db.clone())
                .find(event_id, user_id)
                .await?
        }
        None => None,
    };
    Ok((event, registration, has_profile))
}

/// GET /events/:id/registration
pub async fn registration_page(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationPageView>, AppError> {
    let user_id = claims.user_id()?;

    let (event, registration, has_profile) = load_page(&state, event_id, user_id).await?;
    if !has_profile {
        return Ok(Json(RegistrationPageView::NeedsProfile));
    }
    let event = event.ok_or(AppError::NotFound("event"))?;

    let today = Utc::now().date_naive();
    Ok(Json(project_registration_page(event, registration, today)))
}

/// POST /events/:id/registration: confirm participation.
///
/// The (event_id, user_id) conflict target makes a double submission a silent
/// no-op; the response is always re-derived from a fresh read.
pub async fn confirm_registration(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationPageView>, AppError> {
    let user_id = claims.user_id()?;

    let (event, registration, has_profile) = load_page(&state, event_id, user_id).await?;
    if !has_profile {
        return Err(AppError::BadRequest(
            "complete your profile before registering".to_string(),
        ));
    }
    let event = event.ok_or(AppError::NotFound("event"))?;

    let today = Utc::now().date_naive();
    if derive_state(registration.as_ref(), event.registration_deadline, today)
        == RegistrationState::Closed
    {
        return Err(AppError::BadRequest(
            "registration is closed for this event".to_string(),
        ));
    }

    let registrations = RegistrationRepo::new(state.db.clone());
    registrations.confirm(event_id, user_id, "Open").await?;

    let fresh = registrations.find(event_id, user_id).await?;
    Ok(Json(project_registration_page(event, fresh, today)))
}

/// POST /events/:id/payment-proof: upload a screenshot and flip payment to
/// paid. The already-paid guard runs before the blob write so a second upload
/// never touches storage; a blob written before a failed row update is an
/// accepted orphan, surfaced as the update's error.
pub async fn upload_payment_proof(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<RegistrationPageView>, AppError> {
    let user_id = claims.user_id()?;

    let events = EventRepo::new(state.db.clone());
    let registrations = RegistrationRepo::new(state.db.clone());

    let event = events.get(event_id).await?.ok_or(AppError::NotFound("event"))?;
    let registration = registrations
        .find(event_id, user_id)
        .await?
        .ok_or(AppError::NotFound("registration"))?;

    if registration.payment_status == PaymentStatus::Paid {
        return Err(AppError::BadRequest(
            "payment already recorded for this registration".to_string(),
        ));
    }

    let file = read_payment_file(&mut multipart).await?;
    file.ensure_allowed()?;

    let path = payment_proof_path(user_id, event_id, &file.filename, Utc::now());
    state
        .storage()
        .upload(PAYMENT_PROOFS_BUCKET, &path, file.bytes, &file.content_type, false)
        .await?;

    let updated = registrations.mark_paid(event_id, user_id, &path).await?;
    if updated.is_none() {
        // Lost a race with another upload; the guard column kept the first win.
        return Err(AppError::BadRequest(
            "payment already recorded for this registration".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    Ok(Json(project_registration_page(event, updated, today)))
}

async fn read_payment_file(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            return super::read_file_field(field).await;
        }
    }
    Err(AppError::BadRequest(
        "multipart field \"file\" is required".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use infra::models::VerificationStatus;

    fn event(deadline: Option<NaiveDate>) -> EventRow {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        EventRow {
            id: Uuid::new_v4(),
            name: "State Open".to_string(),
            location: "City Hall".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 12).unwrap(),
            start_time: None,
            end_time: None,
            fee_amount: Some(500),
            organizer: None,
            support_whatsapp: None,
            description: None,
            rules_link: None,
            image_url: None,
            registration_deadline: deadline,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn registration(payment: PaymentStatus, verification: VerificationStatus) -> RegistrationRow {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        RegistrationRow {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category: "Open".to_string(),
            payment_status: payment,
            verification_status: verification,
            payment_screenshot: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn unregistered_page_offers_confirm_only() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let view = project_registration_page(event(None), None, today);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["view"], "registration");
        assert_eq!(json["state"], "unregistered");
        assert_eq!(json["can_confirm"], true);
        assert_eq!(json["can_upload_payment_proof"], false);
        assert!(json["status_message"].is_null());
    }

    #[test]
    fn closed_page_offers_nothing() {
        let deadline = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let view = project_registration_page(event(Some(deadline)), None, today);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "closed");
        assert_eq!(json["can_confirm"], false);
        assert_eq!(json["can_upload_payment_proof"], false);
    }

    #[test]
    fn pending_payment_page_shows_payment_prompt() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let reg = registration(PaymentStatus::Pending, VerificationStatus::Pending);
        let view = project_registration_page(event(None), Some(reg), today);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "pending_payment");
        assert_eq!(
            json["status_message"],
            "Registration submitted, payment required"
        );
        assert_eq!(json["can_upload_payment_proof"], true);
        assert_eq!(json["can_confirm"], false);
    }

    #[test]
    fn organizer_approval_is_reflected_on_read() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let reg = registration(PaymentStatus::Paid, VerificationStatus::Approved);
        let view = project_registration_page(event(None), Some(reg), today);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "approved");
        assert_eq!(json["status_message"], "Participation confirmed");
        assert_eq!(json["can_upload_payment_proof"], false);
    }

    #[test]
    fn paid_page_awaits_verification() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let reg = registration(PaymentStatus::Paid, VerificationStatus::Pending);
        let view = project_registration_page(event(None), Some(reg), today);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "pending_verification");
        assert_eq!(json["status_message"], "Awaiting organizer approval");
    }
}
