//! MQTT ingestion pipeline (gateway module).
//!
//! `controller` owns the broker session; `session`, `topics`, and `pipeline`
//! are its building blocks. Everything the rest of the crate needs is
//! re-exported here.

mod controller;
mod pipeline;
mod session;
mod topics;

pub use controller::{run, IngestError};
