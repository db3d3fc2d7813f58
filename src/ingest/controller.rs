//! Ingestion controller: broker session lifecycle and per-message dispatch.
//!
//! One task owns the broker event loop. On every connect acknowledgment it
//! resolves the session identity and subscribes to the five monitoring
//! topics as a single request; afterwards each publish is classified,
//! validated, and written independently. A slow or failing write never
//! stalls the delivery loop, and a failed identity resolution ends the
//! session without subscribing to anything.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, SubscribeFilter};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{Config, ReadingStore};

use super::pipeline::{self, Disposition};
use super::session::{SessionContext, SessionError};
use super::topics::TopicSet;

/// Broker keep-alive interval.
const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Pause before polling again after an established connection drops.
const RECONNECT_PAUSE: Duration = Duration::from_secs(5);

/// Capacity of the broker client's request queue.
const CLIENT_QUEUE_CAP: usize = 64;

/// Default MQTT port when the broker URL carries none.
const DEFAULT_MQTT_PORT: u16 = 1883;

// ---

/// Errors that end an ingestion session.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The configured broker address could not be interpreted.
    #[error("invalid broker url `{url}`: {reason}")]
    BrokerUrl { url: String, reason: String },
    /// The broker connection failed before it was ever established.
    #[error("broker connection failed: {0}")]
    Connect(#[from] rumqttc::ConnectionError),
    /// A broker request (subscription) could not be issued.
    #[error("broker request failed: {0}")]
    Request(#[from] rumqttc::ClientError),
    /// Identity resolution failed; ingestion must not proceed.
    #[error("session identity resolution failed: {0}")]
    Session(#[from] SessionError),
}

/// Run the ingestion session until it ends.
///
/// The returned error is fatal for this session only: the HTTP surface
/// keeps serving, and retrying is a process-restart decision, not ours.
pub async fn run(store: Arc<dyn ReadingStore>, cfg: Config) -> Result<(), IngestError> {
    // ---
    let topics = TopicSet::new(&cfg.patient_document);
    let (host, port) = broker_endpoint(&cfg.mqtt_broker_url)?;

    let client_id = format!("vitalflow-bridge-{}", std::process::id());
    let mut options = MqttOptions::new(client_id, host, port);
    options.set_keep_alive(KEEP_ALIVE);

    let (client, mut event_loop) = AsyncClient::new(options, CLIENT_QUEUE_CAP);

    info!("Connecting to broker at {}", cfg.mqtt_broker_url);

    let mut session: Option<SessionContext> = None;
    let mut connected_once = false;

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                // ---
                info!("Connected to broker at {}", cfg.mqtt_broker_url);
                connected_once = true;

                // Identity is resolved once per connection, strictly before
                // the subscription request; a failure here must leave the
                // session unsubscribed.
                let ctx = SessionContext::resolve(store.as_ref(), &cfg.patient_document).await?;

                let filters: Vec<SubscribeFilter> = topics
                    .names()
                    .map(|name| SubscribeFilter::new(name.to_string(), QoS::AtMostOnce))
                    .collect();
                client.subscribe_many(filters).await?;

                info!(
                    patient_id = ctx.patient_id,
                    state_id = ctx.state_id,
                    "Subscribed to monitoring topics for document {}",
                    cfg.patient_document
                );
                session = Some(ctx);
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                // ---
                if let Some(ctx) = session {
                    handle_message(&store, ctx, &topics, &publish.topic, &publish.payload);
                }
            }
            Ok(_) => {}
            Err(err) if !connected_once => {
                return Err(IngestError::Connect(err));
            }
            Err(err) => {
                // The client reconnects on the next poll; identity will be
                // resolved again when the fresh connect acknowledgment
                // arrives.
                warn!("Broker connection lost: {err}; reconnecting");
                session = None;
                tokio::time::sleep(RECONNECT_PAUSE).await;
            }
        }
    }
}

// ---

/// Classify, validate, and dispatch one inbound message.
///
/// Accepted readings are written on a detached task so a slow insert cannot
/// hold up delivery of the next message; a write failure is logged and the
/// reading is lost. Completion order across messages is not defined.
fn handle_message(
    store: &Arc<dyn ReadingStore>,
    session: SessionContext,
    topics: &TopicSet,
    topic: &str,
    payload: &[u8],
) -> Disposition {
    // ---
    let disposition = pipeline::evaluate(topics, topic, payload);

    match disposition {
        Disposition::Accepted { metric, value } => {
            debug!(topic, value, code = metric.code(), "reading accepted");

            let store = Arc::clone(store);
            let topic = topic.to_string();
            tokio::spawn(async move {
                if let Err(err) = store
                    .insert_reading(session.patient_id, metric.code(), value, session.state_id)
                    .await
                {
                    error!(topic = %topic, "failed to persist reading: {err}");
                }
            });
        }
        Disposition::InvalidPayload => {
            warn!(topic, "dropping message with non-numeric payload");
        }
        Disposition::UnmappedTopic => {}
    }

    disposition
}

fn broker_endpoint(raw: &str) -> Result<(String, u16), IngestError> {
    // ---
    let url = Url::parse(raw).map_err(|err| IngestError::BrokerUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;

    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| IngestError::BrokerUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        })?
        .to_string();

    Ok((host, url.port().unwrap_or(DEFAULT_MQTT_PORT)))
}
