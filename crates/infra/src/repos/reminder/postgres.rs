use super::IReminderRepo;
use remindly_domain::Reminder;
use sqlx::{types::Json, PgPool};

const REMINDERS_KEY: &str = "reminders";

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn load_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let row: Option<(Json<Vec<Reminder>>,)> = sqlx::query_as(
            r#"
            SELECT value FROM key_values
            WHERE key = $1
            "#,
        )
        .bind(REMINDERS_KEY)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(reminders,)| reminders.0).unwrap_or_default())
    }

    async fn save_all(&self, reminders: &[Reminder]) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO key_values (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
                SET value = EXCLUDED.value
            "#,
        )
        .bind(REMINDERS_KEY)
        .bind(Json(reminders))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
