//! Wire types for the rosbridge JSON protocol.
//!
//! rosbridge speaks JSON over a persistent WebSocket. Every frame is an
//! object whose `op` field names the operation:
//! ```text
//! {"op": "subscribe",   "topic": "/scan", "type": "sensor_msgs/LaserScan"}
//! {"op": "unsubscribe", "topic": "/scan"}
//! {"op": "publish",     "topic": "/move_base_simple/goal", "type": "...", "msg": {...}}
//! ```
//! Inbound frames reuse the `publish` op with just `{topic, msg}`; the
//! bridge also emits `status` frames for its own diagnostics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operations sent from the client to the bridge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ClientOp {
    /// Open a typed subscription on a topic.
    Subscribe {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
    },

    /// Close the subscription on a topic.
    Unsubscribe { topic: String },

    /// Fire-and-forget publish of a message on a topic.
    Publish {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
        msg: Value,
    },
}

impl ClientOp {
    pub fn subscribe(topic: impl Into<String>, msg_type: impl Into<String>) -> Self {
        Self::Subscribe {
            topic: topic.into(),
            msg_type: msg_type.into(),
        }
    }

    pub fn unsubscribe(topic: impl Into<String>) -> Self {
        Self::Unsubscribe {
            topic: topic.into(),
        }
    }

    pub fn publish(topic: impl Into<String>, msg_type: impl Into<String>, msg: Value) -> Self {
        Self::Publish {
            topic: topic.into(),
            msg_type: msg_type.into(),
            msg,
        }
    }

    /// The topic this operation addresses.
    pub fn topic(&self) -> &str {
        match self {
            Self::Subscribe { topic, .. }
            | Self::Unsubscribe { topic }
            | Self::Publish { topic, .. } => topic,
        }
    }
}

/// Severity of a bridge-reported status frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Error,
    Warning,
    #[default]
    Info,
    None,
}

/// Operations received from the bridge.
///
/// Frames with an unrecognized `op` fail to parse and are dropped by the
/// driver at debug level; the protocol defines more ops than this client
/// consumes.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ServerOp {
    /// An inbound message on a subscribed topic.
    Publish { topic: String, msg: Value },

    /// A diagnostic report from the bridge itself.
    Status {
        #[serde(default)]
        level: StatusLevel,
        #[serde(default)]
        msg: String,
    },
}

impl ServerOp {
    /// Parse a single inbound wire frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscribe_wire_format() {
        let op = ClientOp::subscribe("/scan", "sensor_msgs/LaserScan");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "subscribe", "topic": "/scan", "type": "sensor_msgs/LaserScan"})
        );
    }

    #[test]
    fn test_unsubscribe_wire_format() {
        let op = ClientOp::unsubscribe("/scan");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "unsubscribe", "topic": "/scan"})
        );
    }

    #[test]
    fn test_publish_wire_format() {
        let op = ClientOp::publish(
            "/move_base/cancel",
            "actionlib_msgs/GoalID",
            json!({"stamp": {"secs": 0, "nsecs": 0}, "id": ""}),
        );
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({
                "op": "publish",
                "topic": "/move_base/cancel",
                "type": "actionlib_msgs/GoalID",
                "msg": {"stamp": {"secs": 0, "nsecs": 0}, "id": ""}
            })
        );
    }

    #[test]
    fn test_parse_inbound_publish() {
        let frame = r#"{"op": "publish", "topic": "/scan", "msg": {"ranges": [1.0]}}"#;
        let op = ServerOp::parse(frame).expect("should parse");
        match op {
            ServerOp::Publish { topic, msg } => {
                assert_eq!(topic, "/scan");
                assert_eq!(msg["ranges"][0], 1.0);
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn test_parse_inbound_publish_ignores_extra_fields() {
        let frame = r#"{"op": "publish", "id": "x1", "topic": "/scan", "msg": {}, "latch": false}"#;
        assert!(ServerOp::parse(frame).is_ok());
    }

    #[test]
    fn test_parse_status() {
        let frame = r#"{"op": "status", "level": "warning", "msg": "unknown topic"}"#;
        let op = ServerOp::parse(frame).expect("should parse");
        match op {
            ServerOp::Status { level, msg } => {
                assert_eq!(level, StatusLevel::Warning);
                assert_eq!(msg, "unknown topic");
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn test_parse_status_defaults() {
        let op = ServerOp::parse(r#"{"op": "status"}"#).expect("should parse");
        match op {
            ServerOp::Status { level, msg } => {
                assert_eq!(level, StatusLevel::Info);
                assert!(msg.is_empty());
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_op_rejected() {
        assert!(ServerOp::parse(r#"{"op": "fragment", "data": "..."}"#).is_err());
        assert!(ServerOp::parse("not json at all").is_err());
        assert!(ServerOp::parse(r#"{"topic": "/scan"}"#).is_err());
    }

    #[test]
    fn test_op_topic_accessor() {
        assert_eq!(ClientOp::unsubscribe("/odom").topic(), "/odom");
        assert_eq!(
            ClientOp::publish("/goal", "geometry_msgs/PoseStamped", json!({})).topic(),
            "/goal"
        );
    }
}
