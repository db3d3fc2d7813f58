//! In-memory [`ReadingStore`] used by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{ReadingStore, StoreError};
use crate::Reading;

// ---

/// One captured insert, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertedRow {
    pub patient_id: i32,
    pub metric: i16,
    pub value: f64,
    pub state_id: i32,
}

/// Test double with a patient/state fixture, an insert log, lookup call
/// counters, and a switch that turns every operation into a storage failure.
#[derive(Default)]
pub struct MemoryStore {
    patients: Vec<(i32, String)>,
    states: Vec<i32>,
    rows: Mutex<Vec<InsertedRow>>,
    patient_lookups: AtomicUsize,
    state_lookups: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patient(mut self, id: i32, document: &str) -> Self {
        self.patients.push((id, document.to_string()));
        self
    }

    pub fn with_state(mut self, id: i32) -> Self {
        self.states.push(id);
        self
    }

    /// Make every subsequent operation fail as if the database were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<InsertedRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn patient_lookups(&self) -> usize {
        self.patient_lookups.load(Ordering::SeqCst)
    }

    pub fn state_lookups(&self) -> usize {
        self.state_lookups.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Query(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    // ---
    async fn patient_id_by_document(&self, document: &str) -> Result<Option<i32>, StoreError> {
        self.patient_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self
            .patients
            .iter()
            .find(|(_, doc)| doc == document)
            .map(|(id, _)| *id))
    }

    async fn default_state_id(&self) -> Result<Option<i32>, StoreError> {
        self.state_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self.states.first().copied())
    }

    async fn insert_reading(
        &self,
        patient_id: i32,
        metric: i16,
        value: f64,
        state_id: i32,
    ) -> Result<(), StoreError> {
        self.check_available()?;

        self.rows.lock().unwrap().push(InsertedRow {
            patient_id,
            metric,
            value,
            state_id,
        });
        Ok(())
    }

    async fn latest_reading(&self) -> Result<Option<Reading>, StoreError> {
        self.check_available()?;

        let rows = self.rows.lock().unwrap();
        Ok(rows.last().map(|row| Reading {
            id: rows.len() as i32,
            patient_id: row.patient_id,
            metric: row.metric,
            value: row.value,
            recorded_at: Utc::now(),
            state_id: row.state_id,
        }))
    }
}
