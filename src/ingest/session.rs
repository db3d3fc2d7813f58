//! Per-connection identity resolution.

use thiserror::Error;
use tracing::info;

use crate::{ReadingStore, StoreError};

// ---

/// Why an ingestion session could not establish its identity.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No patient row matches the configured document number.
    #[error("no patient found for document {0}")]
    PatientNotFound(String),
    /// The clinical-state table is empty.
    #[error("no clinical states available")]
    NoStatesAvailable,
    /// An identity lookup failed at the storage layer.
    #[error("identity lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Identity and default state for one broker session.
///
/// Resolved once per connection, immutable afterwards, and copied into
/// every per-message handler; all readings of the session are attributed to
/// these two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub patient_id: i32,
    pub state_id: i32,
}

impl SessionContext {
    // ---
    /// Look up the patient by document number, then the default clinical
    /// state, in that order. Both must succeed before any subscription.
    pub async fn resolve(store: &dyn ReadingStore, document: &str) -> Result<Self, SessionError> {
        // ---
        let patient_id = store
            .patient_id_by_document(document)
            .await?
            .ok_or_else(|| SessionError::PatientNotFound(document.to_string()))?;

        let state_id = store
            .default_state_id()
            .await?
            .ok_or(SessionError::NoStatesAvailable)?;

        info!(patient_id, state_id, "resolved ingestion identity for document {document}");
        Ok(Self { patient_id, state_id })
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::store::mock::MemoryStore;

    const DOCUMENT: &str = "456789123";

    #[tokio::test]
    async fn resolves_patient_and_default_state() {
        // ---
        let store = MemoryStore::new().with_patient(4, DOCUMENT).with_state(2);

        let ctx = SessionContext::resolve(&store, DOCUMENT).await.unwrap();

        assert_eq!(ctx, SessionContext { patient_id: 4, state_id: 2 });
        assert_eq!(store.patient_lookups(), 1);
        assert_eq!(store.state_lookups(), 1);
    }

    #[tokio::test]
    async fn picks_first_state_when_several_exist() {
        // ---
        let store = MemoryStore::new()
            .with_patient(4, DOCUMENT)
            .with_state(3)
            .with_state(9);

        let ctx = SessionContext::resolve(&store, DOCUMENT).await.unwrap();
        assert_eq!(ctx.state_id, 3);
    }

    #[tokio::test]
    async fn fails_when_document_is_unknown() {
        // ---
        let store = MemoryStore::new().with_state(2);

        let err = SessionContext::resolve(&store, DOCUMENT).await.unwrap_err();

        assert!(matches!(err, SessionError::PatientNotFound(doc) if doc == DOCUMENT));
        // The patient lookup fails first, so the state is never queried.
        assert_eq!(store.state_lookups(), 0);
    }

    #[tokio::test]
    async fn fails_when_no_states_exist() {
        // ---
        let store = MemoryStore::new().with_patient(4, DOCUMENT);

        let err = SessionContext::resolve(&store, DOCUMENT).await.unwrap_err();
        assert!(matches!(err, SessionError::NoStatesAvailable));
    }

    #[tokio::test]
    async fn surfaces_storage_failures() {
        // ---
        let store = MemoryStore::new().with_patient(4, DOCUMENT).with_state(2);
        store.set_failing(true);

        let err = SessionContext::resolve(&store, DOCUMENT).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
    }
}
