//! Persistence gateway for the vitals bridge.
//!
//! Every database touch — identity resolution, reading writes, and the HTTP
//! surface's queries — goes through the [`ReadingStore`] trait, so the
//! ingestion pipeline and the API share one storage contract. The production
//! implementation is [`PgStore`]; unit tests substitute the in-memory store
//! from `mock`.

use async_trait::async_trait;
use thiserror::Error;

use crate::Reading;

mod postgres;

#[cfg(test)]
pub mod mock;

pub use postgres::PgStore;

// ---

/// Errors surfaced by the persistence gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database query failed.
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Storage contract shared by the ingestion pipeline and the HTTP surface.
///
/// Connection ownership and concurrency live behind this seam; callers hold
/// an `Arc<dyn ReadingStore>` and never see the pool.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Internal id of the first patient whose document number matches, if
    /// one exists.
    async fn patient_id_by_document(&self, document: &str) -> Result<Option<i32>, StoreError>;

    /// Id of the first clinical state under a stable ordering, if any exist.
    async fn default_state_id(&self) -> Result<Option<i32>, StoreError>;

    /// Append one reading row; the store assigns the timestamp.
    async fn insert_reading(
        &self,
        patient_id: i32,
        metric: i16,
        value: f64,
        state_id: i32,
    ) -> Result<(), StoreError>;

    /// Most recently inserted reading row, if any.
    async fn latest_reading(&self) -> Result<Option<Reading>, StoreError>;
}
