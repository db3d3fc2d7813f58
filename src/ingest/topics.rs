//! Topic classification for the monitoring channels.

use crate::MetricKind;

/// Prefix shared by every monitoring channel.
const TOPIC_ROOT: &str = "Monitoring";

// ---

/// The five fixed topic names for one deployment's document number.
///
/// Built once at session start. Classification is exact string equality, so
/// a channel for any other document — or any channel outside the fixed
/// five — maps to nothing.
#[derive(Debug)]
pub struct TopicSet {
    entries: [(String, MetricKind); 5],
}

impl TopicSet {
    // ---
    pub fn new(document: &str) -> Self {
        // ---
        let entries = MetricKind::ALL
            .map(|kind| (format!("{TOPIC_ROOT}/{document}/{}", kind.topic_suffix()), kind));
        Self { entries }
    }

    /// Map an inbound topic name to its metric kind, or `None` for any
    /// channel outside the fixed five. Callers treat `None` as "drop
    /// silently", not as an error.
    pub fn classify(&self, topic: &str) -> Option<MetricKind> {
        // ---
        self.entries
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, kind)| *kind)
    }

    /// The five topic names, for the subscription request.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}
