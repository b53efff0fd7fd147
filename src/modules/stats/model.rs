use serde::Serialize;
use utoipa::ToSchema;

use crate::modules::appointments::model::Appointment;
use crate::modules::messages::model::Message;

/// Aggregate counts and recent activity for the admin dashboard landing page.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub counts: StatsCounts,
    pub recent_messages: Vec<Message>,
    pub recent_appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsCounts {
    pub classes: i64,
    pub courses: i64,
    pub materials: i64,
    pub users: i64,
    pub messages: i64,
    pub unread_messages: i64,
    pub appointments: i64,
    pub pending_appointments: i64,
}
