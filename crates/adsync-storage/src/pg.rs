//! Direct Postgres backend over sqlx.

use adsync_core::{Record, SyncRunCompletion, SyncRunStart};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::{RecordStore, RunLogId, StoreError};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("migrations applied");
        Ok(())
    }
}

fn checked_identifier(name: &str) -> Result<&str, StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

fn run_log_key(id: &RunLogId) -> Result<i64, StoreError> {
    id.0.parse().map_err(|_| StoreError::InvalidRunId(id.0.clone()))
}

/// Builds the `(id, date)` upsert for a batch bound as a single jsonb array (`$1`).
pub fn upsert_statement(table: &str, columns: &[&str]) -> Result<String, StoreError> {
    let table = checked_identifier(table)?;
    let columns = columns
        .iter()
        .map(|c| checked_identifier(c).map(|c| format!("\"{c}\"")))
        .collect::<Result<Vec<_>, _>>()?;
    let column_list = columns.join(", ");

    let updates = columns
        .iter()
        .filter(|c| c.as_str() != "\"id\"" && c.as_str() != "\"date\"")
        .map(|c| format!("{c} = EXCLUDED.{c}"))
        .collect::<Vec<_>>();
    let on_conflict = if updates.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };

    Ok(format!(
        "INSERT INTO \"{table}\" ({column_list}) \
         SELECT {column_list} FROM jsonb_populate_recordset(NULL::\"{table}\", $1) \
         ON CONFLICT (\"id\", \"date\") {on_conflict}"
    ))
}

#[async_trait]
impl RecordStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert_run(&self, entry: &SyncRunStart) -> Result<RunLogId, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sync_log (started_at, status, records_synced, error_message) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(entry.started_at)
        .bind(entry.status.as_str())
        .bind(i64::try_from(entry.records_synced).unwrap_or(i64::MAX))
        .bind(entry.error_message.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(RunLogId(id.to_string()))
    }

    async fn complete_run(
        &self,
        id: &RunLogId,
        completion: &SyncRunCompletion,
    ) -> Result<(), StoreError> {
        let key = run_log_key(id)?;
        sqlx::query(
            "UPDATE sync_log SET completed_at = $1, status = $2, records_synced = $3, \
             error_message = $4 WHERE id = $5",
        )
        .bind(completion.completed_at)
        .bind(completion.status.as_str())
        .bind(i64::try_from(completion.records_synced).unwrap_or(i64::MAX))
        .bind(completion.error_message.as_deref())
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert(&self, table: &str, records: &[Record]) -> Result<usize, StoreError> {
        let Some(first) = records.first() else {
            return Ok(0);
        };
        let columns = first.columns().collect::<Vec<_>>();
        let statement = upsert_statement(table, &columns)?;
        let payload = serde_json::to_value(records)?;
        let result = sqlx::query(&statement)
            .bind(payload)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() as usize)
    }
}
