use sqlx::PgPool;
use tracing::instrument;

use acadex_core::AppError;

use crate::modules::appointments::model::{Appointment, appointment_status};
use crate::modules::messages::model::{Message, message_status};
use crate::modules::stats::model::{StatsCounts, StatsResponse};

const RECENT_LIMIT: i64 = 5;

pub struct StatsService;

impl StatsService {
    #[instrument(skip(db))]
    pub async fn get_stats(db: &PgPool) -> Result<StatsResponse, AppError> {
        let counts = StatsCounts {
            classes: Self::count(db, "SELECT COUNT(*) FROM classes").await?,
            courses: Self::count(db, "SELECT COUNT(*) FROM courses").await?,
            materials: Self::count(db, "SELECT COUNT(*) FROM materials").await?,
            users: Self::count(db, "SELECT COUNT(*) FROM users").await?,
            messages: Self::count(db, "SELECT COUNT(*) FROM messages").await?,
            unread_messages: Self::count_by_status(
                db,
                "SELECT COUNT(*) FROM messages WHERE status = $1",
                message_status::UNREAD,
            )
            .await?,
            appointments: Self::count(db, "SELECT COUNT(*) FROM appointments").await?,
            pending_appointments: Self::count_by_status(
                db,
                "SELECT COUNT(*) FROM appointments WHERE status = $1",
                appointment_status::PENDING,
            )
            .await?,
        };

        let recent_messages = sqlx::query_as::<_, Message>(
            "SELECT id, name, email, phone, subject, message, status, admin_reply,
                    created_at, updated_at
             FROM messages ORDER BY created_at DESC LIMIT $1",
        )
        .bind(RECENT_LIMIT)
        .fetch_all(db)
        .await?;

        let recent_appointments = sqlx::query_as::<_, Appointment>(
            "SELECT id, user_id, student_name, email, phone, class_type, subject, date, time,
                    notes, status, created_at, updated_at
             FROM appointments ORDER BY created_at DESC LIMIT $1",
        )
        .bind(RECENT_LIMIT)
        .fetch_all(db)
        .await?;

        Ok(StatsResponse {
            counts,
            recent_messages,
            recent_appointments,
        })
    }

    async fn count(db: &PgPool, query: &str) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>(query).fetch_one(db).await?)
    }

    async fn count_by_status(db: &PgPool, query: &str, status: &str) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>(query)
            .bind(status)
            .fetch_one(db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_stats_counts_and_recents(pool: PgPool) {
        sqlx::query("INSERT INTO classes (name, slug) VALUES ('A Level', 'a-level')")
            .execute(&pool)
            .await
            .unwrap();
        for i in 0..7 {
            sqlx::query(
                "INSERT INTO messages (name, email, message) VALUES ($1, 'p@test.com', 'Hi')",
            )
            .bind(format!("Sender {}", i))
            .execute(&pool)
            .await
            .unwrap();
        }
        sqlx::query(
            "INSERT INTO appointments (student_name, email, date, time)
             VALUES ('Sam', 's@test.com', '2026-09-14', '16:00')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let stats = StatsService::get_stats(&pool).await.unwrap();

        assert_eq!(stats.counts.classes, 1);
        assert_eq!(stats.counts.messages, 7);
        assert_eq!(stats.counts.unread_messages, 7);
        assert_eq!(stats.counts.appointments, 1);
        assert_eq!(stats.counts.pending_appointments, 1);
        // Recents are capped at five, newest first
        assert_eq!(stats.recent_messages.len(), 5);
        assert_eq!(stats.recent_appointments.len(), 1);
    }
}
