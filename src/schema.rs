//! Database schema management for `vitalflow-bridge`.
//!
//! Ensures required tables and indexes exist before ingestion or serving
//! begins. Applied once on startup from `main.rs`. Patient and
//! clinical-state rows are owned by the external registration process and
//! are never seeded here.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create the database schema if it does not exist (idempotent).
///
/// Creates the `patients` and `clinical_states` lookup tables and the
/// `readings` table that both the ingestion pipeline and `POST /insertData`
/// append to. Safe to call on every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    // Patient registry; the bridge only ever reads it.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id       SERIAL PRIMARY KEY,
            document TEXT NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clinical_states (
            id   SERIAL PRIMARY KEY,
            name TEXT NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Reading rows are append-only; recorded_at is assigned by the database.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id          SERIAL PRIMARY KEY,
            patient_id  INTEGER          NOT NULL REFERENCES patients (id),
            metric      SMALLINT         NOT NULL,
            value       DOUBLE PRECISION NOT NULL,
            recorded_at TIMESTAMPTZ      NOT NULL DEFAULT now(),
            state_id    INTEGER          NOT NULL REFERENCES clinical_states (id)
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Basic indexes for the identity lookup and per-patient queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_patients_document
            ON patients (document);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_readings_patient_id
            ON readings (patient_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
