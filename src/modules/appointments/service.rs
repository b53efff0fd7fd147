use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::{AppError, PaginationMeta};

use crate::modules::appointments::model::{
    Appointment, AppointmentFilterParams, CreateAppointmentDto, PaginatedAppointmentsResponse,
    UpdateAppointmentStatusDto, appointment_status, is_valid_transition,
};

const APPOINTMENT_COLUMNS: &str = "id, user_id, student_name, email, phone, class_type, subject, \
     date, time, notes, status, created_at, updated_at";

pub struct AppointmentService;

impl AppointmentService {
    /// Create a booking. `user_id` is the authenticated caller when there is
    /// one; anonymous bookings store no user reference. Status always starts
    /// at pending, regardless of caller.
    #[instrument(skip(db, dto), fields(appointment.email = %dto.email))]
    pub async fn create_appointment(
        db: &PgPool,
        dto: CreateAppointmentDto,
        user_id: Option<Uuid>,
    ) -> Result<Appointment, AppError> {
        let query = format!(
            "INSERT INTO appointments (user_id, student_name, email, phone, class_type,
                                       subject, date, time, notes, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        let appointment = sqlx::query_as::<_, Appointment>(&query)
            .bind(user_id)
            .bind(&dto.student_name)
            .bind(&dto.email)
            .bind(&dto.phone)
            .bind(&dto.class_type)
            .bind(&dto.subject)
            .bind(dto.date)
            .bind(&dto.time)
            .bind(&dto.notes)
            .bind(appointment_status::PENDING)
            .fetch_one(db)
            .await?;

        Ok(appointment)
    }

    #[instrument(skip(db, filters))]
    pub async fn get_appointments(
        db: &PgPool,
        filters: AppointmentFilterParams,
    ) -> Result<PaginatedAppointmentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let (total, appointments) = match &filters.status {
            Some(status) => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM appointments WHERE status = $1",
                )
                .bind(status)
                .fetch_one(db)
                .await?;

                let query = format!(
                    "SELECT {} FROM appointments WHERE status = $1
                     ORDER BY date ASC, created_at DESC
                     LIMIT {} OFFSET {}",
                    APPOINTMENT_COLUMNS, limit, offset
                );
                let appointments = sqlx::query_as::<_, Appointment>(&query)
                    .bind(status)
                    .fetch_all(db)
                    .await?;
                (total, appointments)
            }
            None => {
                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments")
                    .fetch_one(db)
                    .await?;

                let query = format!(
                    "SELECT {} FROM appointments
                     ORDER BY date ASC, created_at DESC
                     LIMIT {} OFFSET {}",
                    APPOINTMENT_COLUMNS, limit, offset
                );
                let appointments = sqlx::query_as::<_, Appointment>(&query)
                    .fetch_all(db)
                    .await?;
                (total, appointments)
            }
        };

        Ok(PaginatedAppointmentsResponse {
            data: appointments,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    /// A user's own bookings, newest first.
    #[instrument(skip(db))]
    pub async fn get_appointments_for_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, AppError> {
        let query = format!(
            "SELECT {} FROM appointments WHERE user_id = $1 ORDER BY created_at DESC",
            APPOINTMENT_COLUMNS
        );
        let appointments = sqlx::query_as::<_, Appointment>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await?;

        Ok(appointments)
    }

    /// Apply an admin status transition, enforcing the state machine. An
    /// illegal transition is a client error, not a silent overwrite.
    #[instrument(skip(db))]
    pub async fn update_status(
        db: &PgPool,
        appointment_id: Uuid,
        dto: UpdateAppointmentStatusDto,
    ) -> Result<Appointment, AppError> {
        let current = sqlx::query_scalar::<_, String>(
            "SELECT status FROM appointments WHERE id = $1",
        )
        .bind(appointment_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Appointment not found")))?;

        let target = dto.status.as_str();
        if !is_valid_transition(&current, target) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Cannot move appointment from {} to {}",
                current,
                target
            )));
        }

        let query = format!(
            "UPDATE appointments SET status = $1, updated_at = NOW()
             WHERE id = $2 AND status = $3
             RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        let appointment = sqlx::query_as::<_, Appointment>(&query)
            .bind(target)
            .bind(appointment_id)
            .bind(&current)
            .fetch_optional(db)
            .await?
            // Status moved underneath us between the read and the write
            .ok_or_else(|| {
                AppError::conflict(anyhow::anyhow!("Appointment status changed concurrently"))
            })?;

        Ok(appointment)
    }

    #[instrument(skip(db))]
    pub async fn delete_appointment(db: &PgPool, appointment_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(appointment_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Appointment not found"
            )));
        }

        Ok(())
    }
}
