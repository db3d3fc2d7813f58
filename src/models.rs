//! Data models for the vitals ingestion bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---

/// The five metric kinds carried by the monitoring topics.
///
/// The numeric codes are the stable storage values; they never change once
/// assigned and the set is closed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    BodyTemperature,
    HeartRate,
    OxygenSaturation,
    AmbientTemperature,
    AmbientHumidity,
}

impl MetricKind {
    // ---
    /// Every kind, in code order.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::BodyTemperature,
        MetricKind::HeartRate,
        MetricKind::OxygenSaturation,
        MetricKind::AmbientTemperature,
        MetricKind::AmbientHumidity,
    ];

    /// Numeric code stored in the `metric` column.
    pub fn code(self) -> i16 {
        // ---
        match self {
            MetricKind::BodyTemperature => 1,
            MetricKind::HeartRate => 2,
            MetricKind::OxygenSaturation => 3,
            MetricKind::AmbientTemperature => 4,
            MetricKind::AmbientHumidity => 5,
        }
    }

    /// Channel segment under `Monitoring/{document}/`.
    pub fn topic_suffix(self) -> &'static str {
        // ---
        match self {
            MetricKind::BodyTemperature => "BodyTemp",
            MetricKind::HeartRate => "HeartRate",
            MetricKind::OxygenSaturation => "OxygenSaturation",
            MetricKind::AmbientTemperature => "AmbientTemp",
            MetricKind::AmbientHumidity => "AmbientHumidity",
        }
    }
}

/// One persisted reading row, as served by `GET /data`.
///
/// Rows are append-only: the bridge creates them and never updates or
/// deletes them. `recorded_at` is assigned by the database at insert time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    // ---
    pub id: i32,
    pub patient_id: i32,
    pub metric: i16,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
    pub state_id: i32,
}

/// Request body for `POST /insertData`.
///
/// Inserted as given, bypassing the ingestion pipeline; intended for
/// testing the storage path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRequest {
    // ---
    pub patient_id: i32,
    pub metric: i16,
    pub value: f64,
    pub state: i32,
}
