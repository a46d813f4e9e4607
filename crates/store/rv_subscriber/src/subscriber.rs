//! Per-topic bridge subscription management.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use rv_rosbridge::{BridgeMessage, ClientOp, ConnectionHandle};

use crate::camera::{CameraEvent, CameraFallback, COMPRESSED_IMAGE_TYPE, RAW_IMAGE_TYPE};

/// A single active topic registration.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub topic_name: String,
    pub msg_type: String,
}

/// The result of routing one inbound message.
#[derive(Debug)]
pub struct Routed {
    /// The subscription the message matched.
    pub subscription: Subscription,

    /// Set when the message resolved a pending camera probe.
    pub camera_event: Option<CameraEvent>,
}

/// Manages subscriptions to individual bridge topics.
///
/// Each topic has at most one active subscription; re-subscribing replaces
/// the previous registration (the camera fallback relies on this). Received
/// messages are routed by exact topic-name match.
pub struct SubscriptionManager {
    handle: ConnectionHandle,
    subscriptions: HashMap<String, Subscription>,
    cameras: HashMap<String, CameraFallback>,
    probe_timeout: Duration,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new(handle: ConnectionHandle, probe_timeout: Duration) -> Self {
        Self {
            handle,
            subscriptions: HashMap::new(),
            cameras: HashMap::new(),
            probe_timeout,
        }
    }

    /// Register a subscription and send the wire op. Re-subscribing to the
    /// same topic replaces the previous registration.
    pub fn subscribe(&mut self, topic_name: &str, msg_type: &str) {
        tracing::info!("Subscribing to {topic_name} ({msg_type})");

        let previous = self.subscriptions.insert(
            topic_name.to_owned(),
            Subscription {
                topic_name: topic_name.to_owned(),
                msg_type: msg_type.to_owned(),
            },
        );
        if previous.is_some() {
            tracing::debug!("Replaced existing subscription on {topic_name}");
        }

        self.handle
            .send_op(ClientOp::subscribe(topic_name, msg_type));
    }

    /// Remove a subscription. Safe to call when no subscription exists.
    /// Any camera probe tied to the topic dies with it, so a late-firing
    /// deadline cannot resurrect the subscription.
    pub fn unsubscribe(&mut self, topic_name: &str) {
        if self.subscriptions.remove(topic_name).is_some() {
            self.handle.send_op(ClientOp::unsubscribe(topic_name));
            tracing::info!("Unsubscribed from {topic_name}");
        } else {
            tracing::debug!("Not subscribed to {topic_name}");
        }

        self.cameras.retain(|_, cam| cam.active_topic() != topic_name);
    }

    /// Begin a camera subscription with the compressed→raw fallback probe:
    /// subscribe `<base>/compressed` and arm the probe deadline.
    pub fn subscribe_camera(&mut self, base_topic: &str, now: Instant) {
        let cam = CameraFallback::new(base_topic, now + self.probe_timeout);
        self.subscribe(&cam.compressed_topic(), COMPRESSED_IMAGE_TYPE);
        self.cameras.insert(base_topic.to_owned(), cam);
    }

    /// Route an inbound message to its subscription by exact topic name.
    /// Returns `None` for topics with no active subscription (including
    /// compressed frames arriving after a fallback already committed raw).
    pub fn route(&mut self, msg: &BridgeMessage) -> Option<Routed> {
        let subscription = match self.subscriptions.get(&msg.topic_name) {
            Some(sub) => sub.clone(),
            None => {
                tracing::debug!("Dropping message on unsubscribed topic {}", msg.topic_name);
                return None;
            }
        };

        let mut camera_event = None;
        for cam in self.cameras.values_mut() {
            if cam.is_probing() && cam.compressed_topic() == msg.topic_name {
                cam.commit_compressed();
                camera_event = Some(CameraEvent::CommittedCompressed {
                    topic: msg.topic_name.clone(),
                });
            }
        }

        Some(Routed {
            subscription,
            camera_event,
        })
    }

    /// Earliest pending probe deadline, if any camera is still probing.
    pub fn next_probe_deadline(&self) -> Option<Instant> {
        self.cameras
            .values()
            .filter_map(CameraFallback::probe_deadline)
            .min()
    }

    /// Fire probes whose deadline has passed: unsubscribe the silent
    /// compressed topic and subscribe the bare topic as a raw stream.
    pub fn handle_probe_timeout(&mut self, now: Instant) -> Vec<CameraEvent> {
        let expired: Vec<String> = self
            .cameras
            .iter()
            .filter(|(_, cam)| cam.deadline_passed(now))
            .map(|(base, _)| base.clone())
            .collect();

        let mut events = Vec::with_capacity(expired.len());
        for base in expired {
            if let Some(cam) = self.cameras.get_mut(&base) {
                cam.commit_raw();
            }
            let compressed_topic = format!("{base}/compressed");
            tracing::info!(
                "No compressed frames on {compressed_topic}, falling back to raw {base}"
            );
            self.unsubscribe(&compressed_topic);
            self.subscribe(&base, RAW_IMAGE_TYPE);
            events.push(CameraEvent::FellBackToRaw {
                compressed_topic,
                raw_topic: base,
            });
        }
        events
    }

    /// Re-send every active registration, used when the link (re)opens.
    pub fn resubscribe_all(&self) {
        for sub in self.subscriptions.values() {
            self.handle
                .send_op(ClientOp::subscribe(&sub.topic_name, &sub.msg_type));
        }
    }

    /// Check if a topic is currently subscribed.
    pub fn is_subscribed(&self, topic_name: &str) -> bool {
        self.subscriptions.contains_key(topic_name)
    }

    /// Get the list of currently subscribed topic names.
    pub fn subscribed_topics(&self) -> Vec<String> {
        self.subscriptions.keys().cloned().collect()
    }
}
