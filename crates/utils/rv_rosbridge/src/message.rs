//! Message type representing data received from the bridge.

/// A message received on a subscribed rosbridge topic.
#[derive(Debug, Clone)]
pub struct BridgeMessage {
    /// The topic the message arrived on (e.g., `/scan`).
    pub topic_name: String,

    /// The JSON payload of the message.
    pub msg: serde_json::Value,

    /// Wall-clock receive time in nanoseconds since Unix epoch.
    pub receive_time_ns: u64,
}
