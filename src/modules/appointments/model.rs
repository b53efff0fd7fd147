//! Appointment booking models.
//!
//! Bookings may be anonymous; when an authenticated user books, their id is
//! attached for the history view. Every appointment starts at `pending` and
//! only admins move it through the state machine:
//! `pending -> {confirmed, cancelled}`, `confirmed -> completed`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use acadex_core::{PaginationMeta, PaginationParams};

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub student_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub class_type: Option<String>,
    pub subject: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status values stored in `appointments.status`.
pub mod appointment_status {
    pub const PENDING: &str = "pending";
    pub const CONFIRMED: &str = "confirmed";
    pub const CANCELLED: &str = "cancelled";
    pub const COMPLETED: &str = "completed";
}

/// Admin-initiated transitions. `pending` can be confirmed or cancelled;
/// `confirmed` can be completed; `cancelled` and `completed` are terminal.
pub fn is_valid_transition(from: &str, to: &str) -> bool {
    use appointment_status::*;
    matches!(
        (from, to),
        (PENDING, CONFIRMED) | (PENDING, CANCELLED) | (CONFIRMED, COMPLETED)
    )
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentDto {
    #[validate(length(min = 1, max = 100, message = "Student name is required"))]
    pub student_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub class_type: Option<String>,
    pub subject: Option<String>,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 20, message = "Time is required"))]
    pub time: String,
    pub notes: Option<String>,
}

/// Target status as accepted by the admin status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => appointment_status::CONFIRMED,
            Self::Cancelled => appointment_status::CANCELLED,
            Self::Completed => appointment_status::COMPLETED,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatusDto {
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AppointmentFilterParams {
    /// Filter by lifecycle status (pending, confirmed, cancelled, completed).
    pub status: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAppointmentsResponse {
    pub data: Vec<Appointment>,
    pub meta: PaginationMeta,
}
