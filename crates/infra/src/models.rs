use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    Coach,
    Referee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Dob,
    Certificate,
}

impl DocumentType {
    /// Path segment used when namespacing uploaded blobs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Dob => "dob",
            DocumentType::Certificate => "certificate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
}

/// Identity-linked profile; `id` equals the identity provider's subject id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub city: String,
    pub state: String,
    pub fide_id: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub profile_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle owned by organizers; read-only from this service.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub fee_amount: Option<i32>,
    pub organizer: Option<String>,
    pub support_whatsapp: Option<String>,
    pub description: Option<String>,
    pub rules_link: Option<String>,
    pub image_url: Option<String>,
    pub registration_deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub payment_status: PaymentStatus,
    pub verification_status: VerificationStatus,
    pub payment_screenshot: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of the "my registrations" panel: registration joined to its event.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRegistrationRow {
    pub event_id: Uuid,
    pub event_name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category: String,
    pub payment_status: PaymentStatus,
    pub verification_status: VerificationStatus,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_url: String,
    pub visibility: Visibility,
    pub bucket: String,
    pub created_at: DateTime<Utc>,
}
