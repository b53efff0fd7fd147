use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use acadex_core::AppError;

use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::middleware::role::RequireAdmin;
use crate::modules::appointments::model::{
    Appointment, AppointmentFilterParams, CreateAppointmentDto, PaginatedAppointmentsResponse,
    UpdateAppointmentStatusDto,
};
use crate::modules::appointments::service::AppointmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Book an appointment (public).
///
/// Anonymous bookings are allowed; when the caller is logged in, the booking
/// is attached to their account for the history view.
#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentDto,
    responses(
        (status = 201, description = "Appointment requested", body = Appointment),
        (status = 400, description = "Invalid input")
    ),
    tag = "Appointments"
)]
#[instrument(skip(state, caller, dto))]
pub async fn create_appointment(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAppointmentDto>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let user_id = caller.as_ref().map(|user| user.user_id());

    let appointment = AppointmentService::create_appointment(&state.db, dto, user_id).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(AppointmentFilterParams),
    responses(
        (status = 200, description = "Paginated appointments", body = PaginatedAppointmentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Appointments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_appointments(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<AppointmentFilterParams>,
) -> Result<Json<PaginatedAppointmentsResponse>, AppError> {
    let appointments = AppointmentService::get_appointments(&state.db, filters).await?;

    Ok(Json(appointments))
}

/// The caller's own bookings.
#[utoipa::path(
    get,
    path = "/api/appointments/my",
    responses(
        (status = 200, description = "The caller's appointments", body = Vec<Appointment>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Appointments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_my_appointments(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments =
        AppointmentService::get_appointments_for_user(&state.db, auth_user.user_id()).await?;

    Ok(Json(appointments))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    request_body = UpdateAppointmentStatusDto,
    responses(
        (status = 200, description = "Status updated", body = Appointment),
        (status = 400, description = "Illegal status transition"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Appointment not found")
    ),
    tag = "Appointments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateAppointmentStatusDto>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentService::update_status(&state.db, id, dto).await?;

    Ok(Json(appointment))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Appointment not found")
    ),
    tag = "Appointments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_appointment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AppointmentService::delete_appointment(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
