//! Per-message classify/validate pipeline.
//!
//! Every inbound publish is reduced to a [`Disposition`] before any side
//! effect happens: either it carries a known metric and a finite value, or
//! it is dropped — silently for foreign channels, with a log for garbage
//! payloads.

use crate::MetricKind;

use super::topics::TopicSet;

// ---

/// Outcome of classifying and validating one inbound message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disposition {
    /// Message carries a known metric and a finite numeric value.
    Accepted { metric: MetricKind, value: f64 },
    /// Topic is not one of the five monitoring channels; dropped silently.
    UnmappedTopic,
    /// Payload did not parse as a finite decimal number; dropped.
    InvalidPayload,
}

/// Classify the topic, then validate the payload, in that order.
pub fn evaluate(topics: &TopicSet, topic: &str, payload: &[u8]) -> Disposition {
    // ---
    let Some(metric) = topics.classify(topic) else {
        return Disposition::UnmappedTopic;
    };

    match parse_value(payload) {
        Some(value) => Disposition::Accepted { metric, value },
        None => Disposition::InvalidPayload,
    }
}

/// Interpret the payload bytes as a decimal floating-point number.
///
/// Surrounding whitespace is tolerated; anything that is not UTF-8, does
/// not parse, or parses to a non-finite value (NaN, ±inf) is rejected.
pub fn parse_value(payload: &[u8]) -> Option<f64> {
    // ---
    let text = std::str::from_utf8(payload).ok()?;
    let value: f64 = text.trim().parse().ok()?;
    value.is_finite().then_some(value)
}
