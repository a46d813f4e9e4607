//! Per-topic subscription management and message routing.
//!
//! This crate tracks which bridge topics are subscribed, routes inbound
//! messages by exact topic-name match, and runs the compressed→raw camera
//! fallback probe.

mod camera;
mod subscriber;

pub use camera::{CameraEvent, CameraFallback, COMPRESSED_IMAGE_TYPE, RAW_IMAGE_TYPE};
pub use subscriber::{Routed, Subscription, SubscriptionManager};
