//! Registration workflow states.
//!
//! The participation lifecycle per (user, event) is a small state machine
//! derived from two persisted status fields plus the event deadline. It is
//! computed fresh on every read; nothing here is cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{PaymentStatus, RegistrationRow, VerificationStatus};

/// Participation state for one (user, event) pair.
///
/// `Closed` is reachable only before a registration exists: once a row is in
/// place the deadline no longer matters. `payment_status` moves only
/// pending → paid, `verification_status` only pending → approved (the latter
/// flipped by organizers outside this service).
///
/// ```
/// use infra::registration::{derive_state, RegistrationState};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let deadline = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// assert_eq!(derive_state(None, Some(deadline), today), RegistrationState::Closed);
/// assert_eq!(derive_state(None, None, today), RegistrationState::Unregistered);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    Unregistered,
    PendingPayment,
    PendingVerification,
    Approved,
    Closed,
}

pub fn derive_state(
    registration: Option<&RegistrationRow>,
    deadline: Option<NaiveDate>,
    today: NaiveDate,
) -> RegistrationState {
    match registration {
        None => {
            if deadline_passed(deadline, today) {
                RegistrationState::Closed
            } else {
                RegistrationState::Unregistered
            }
        }
        Some(reg) => match (reg.verification_status, reg.payment_status) {
            (VerificationStatus::Approved, _) => RegistrationState::Approved,
            (_, PaymentStatus::Paid) => RegistrationState::PendingVerification,
            (_, PaymentStatus::Pending) => RegistrationState::PendingPayment,
        },
    }
}

/// The deadline day itself is still open; closed strictly after.
pub fn deadline_passed(deadline: Option<NaiveDate>, today: NaiveDate) -> bool {
    matches!(deadline, Some(d) if today > d)
}

/// User-facing status line, precedence: approved, then paid, then pending.
pub fn status_message(payment: PaymentStatus, verification: VerificationStatus) -> &'static str {
    match (verification, payment) {
        (VerificationStatus::Approved, _) => "Participation confirmed",
        (_, PaymentStatus::Paid) => "Awaiting organizer approval",
        (_, PaymentStatus::Pending) => "Registration submitted, payment required",
    }
}

/// Confirming is only offered while no row exists and the deadline is open.
pub fn can_confirm(state: RegistrationState) -> bool {
    state == RegistrationState::Unregistered
}

/// A proof upload is only accepted while payment is still owed.
pub fn can_upload_payment_proof(state: RegistrationState) -> bool {
    state == RegistrationState::PendingPayment
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn row(payment: PaymentStatus, verification: VerificationStatus) -> RegistrationRow {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
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

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unregistered_until_deadline_passes() {
        let deadline = day(2026, 3, 15);

        assert_eq!(
            derive_state(None, Some(deadline), day(2026, 3, 14)),
            RegistrationState::Unregistered
        );
        // The deadline day itself still accepts registrations.
        assert_eq!(
            derive_state(None, Some(deadline), day(2026, 3, 15)),
            RegistrationState::Unregistered
        );
        assert_eq!(
            derive_state(None, Some(deadline), day(2026, 3, 16)),
            RegistrationState::Closed
        );
    }

    #[test]
    fn no_deadline_means_always_open() {
        assert_eq!(
            derive_state(None, None, day(2030, 1, 1)),
            RegistrationState::Unregistered
        );
    }

    #[test]
    fn existing_registration_ignores_deadline() {
        let reg = row(PaymentStatus::Pending, VerificationStatus::Pending);
        let long_gone = day(2020, 1, 1);
        assert_eq!(
            derive_state(Some(&reg), Some(long_gone), day(2026, 6, 1)),
            RegistrationState::PendingPayment
        );
    }

    #[test]
    fn approval_takes_precedence_over_payment() {
        // Organizer approval wins even if payment was never marked paid.
        let reg = row(PaymentStatus::Pending, VerificationStatus::Approved);
        assert_eq!(
            derive_state(Some(&reg), None, day(2026, 6, 1)),
            RegistrationState::Approved
        );

        let reg = row(PaymentStatus::Paid, VerificationStatus::Approved);
        assert_eq!(
            derive_state(Some(&reg), None, day(2026, 6, 1)),
            RegistrationState::Approved
        );
    }

    #[test]
    fn paid_waits_for_verification() {
        let reg = row(PaymentStatus::Paid, VerificationStatus::Pending);
        assert_eq!(
            derive_state(Some(&reg), None, day(2026, 6, 1)),
            RegistrationState::PendingVerification
        );
    }

    #[test]
    fn status_messages_follow_precedence() {
        assert_eq!(
            status_message(PaymentStatus::Pending, VerificationStatus::Approved),
            "Participation confirmed"
        );
        assert_eq!(
            status_message(PaymentStatus::Paid, VerificationStatus::Pending),
            "Awaiting organizer approval"
        );
        assert_eq!(
            status_message(PaymentStatus::Pending, VerificationStatus::Pending),
            "Registration submitted, payment required"
        );
    }

    #[test]
    fn action_guards() {
        assert!(can_confirm(RegistrationState::Unregistered));
        assert!(!can_confirm(RegistrationState::Closed));
        assert!(!can_confirm(RegistrationState::PendingPayment));
        assert!(!can_confirm(RegistrationState::Approved));

        assert!(can_upload_payment_proof(RegistrationState::PendingPayment));
        assert!(!can_upload_payment_proof(RegistrationState::PendingVerification));
        assert!(!can_upload_payment_proof(RegistrationState::Approved));
        assert!(!can_upload_payment_proof(RegistrationState::Unregistered));
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&RegistrationState::PendingVerification).unwrap();
        assert_eq!(json, "\"pending_verification\"");
    }
}
