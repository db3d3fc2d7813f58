//! PostgreSQL-backed [`ReadingStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ReadingStore, StoreError};
use crate::Reading;

// ---

/// Persistence gateway over a shared [`PgPool`].
///
/// The pool is the only owner of physical connections; concurrent use from
/// the ingestion tasks and the HTTP handlers is handled by pool checkout,
/// not by locking here.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgStore {
    // ---
    async fn patient_id_by_document(&self, document: &str) -> Result<Option<i32>, StoreError> {
        // ---
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM patients WHERE document = $1 ORDER BY id LIMIT 1",
        )
        .bind(document)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn default_state_id(&self) -> Result<Option<i32>, StoreError> {
        // ---
        let id = sqlx::query_scalar::<_, i32>("SELECT id FROM clinical_states ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }

    async fn insert_reading(
        &self,
        patient_id: i32,
        metric: i16,
        value: f64,
        state_id: i32,
    ) -> Result<(), StoreError> {
        // ---
        sqlx::query(
            r#"
            INSERT INTO readings (patient_id, metric, value, recorded_at, state_id)
            VALUES ($1, $2, $3, now(), $4)
            "#,
        )
        .bind(patient_id)
        .bind(metric)
        .bind(value)
        .bind(state_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_reading(&self) -> Result<Option<Reading>, StoreError> {
        // ---
        let reading = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, patient_id, metric, value, recorded_at, state_id
            FROM readings
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }
}
