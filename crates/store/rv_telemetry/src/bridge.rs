//! Bridge orchestrator routing inbound messages to the appropriate decoder.

use std::collections::HashMap;

use serde::Deserialize as _;

use rv_rosbridge::{BridgeMessage, LinkState};

use crate::decoders::{compressed_image, image, laser_scan, path};
use crate::error::DecodeError;
use crate::kind::MessageKind;
use crate::nav_status::{NavSignal, NavStatusMachine};
use crate::ros::actionlib_msgs::GoalStatusArray;
use crate::ros::nav_msgs::Path;
use crate::ros::sensor_msgs::{CompressedImage, Image, LaserScan};
use crate::sink::TelemetrySink;

/// Converts inbound bridge messages into renderer-ready structures.
///
/// Topics are bound to a [`MessageKind`] when added; each inbound message
/// dispatches to the decoder for its topic's kind and the result is emitted
/// to the sink. Also owns the navigation status machine, since goal state
/// is driven both by status messages and by operator commands.
pub struct TelemetryBridge<S> {
    sink: S,
    active: HashMap<String, MessageKind>,
    nav: NavStatusMachine,
}

impl<S: TelemetrySink> TelemetryBridge<S> {
    /// Create a new bridge emitting into the given sink.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            active: HashMap::new(),
            nav: NavStatusMachine::new(),
        }
    }

    /// Bind a topic to a decoder by its declared type name. Returns `true`
    /// if the type is supported.
    pub fn add_topic(&mut self, topic_name: &str, type_name: &str) -> bool {
        match MessageKind::from_type_name(type_name) {
            Some(kind) => {
                tracing::info!("Bridge: added decoder for {topic_name} ({type_name})");
                self.active.insert(topic_name.to_owned(), kind);
                true
            }
            None => {
                tracing::warn!(
                    "No decoder available for message type {type_name} (topic: {topic_name})"
                );
                false
            }
        }
    }

    /// Remove a topic from the bridge.
    pub fn remove_topic(&mut self, topic_name: &str) {
        if self.active.remove(topic_name).is_some() {
            tracing::info!("Bridge: removed decoder for {topic_name}");
        }
    }

    /// Process a single inbound message. A decode failure drops the frame:
    /// the sink is not called and the previous valid frame stands.
    pub fn process_message(&mut self, msg: &BridgeMessage) -> Result<(), DecodeError> {
        let Some(kind) = self.active.get(&msg.topic_name).copied() else {
            return Ok(());
        };

        match kind {
            MessageKind::LaserScan => {
                let scan = LaserScan::deserialize(&msg.msg)?;
                self.sink.on_scan_decoded(&laser_scan::decode_scan(&scan));
            }
            MessageKind::RawImage => {
                let img = Image::deserialize(&msg.msg)?;
                self.sink.on_image_decoded(&image::decode_raw_image(&img)?);
            }
            MessageKind::CompressedImage => {
                let img = CompressedImage::deserialize(&msg.msg)?;
                self.sink
                    .on_image_decoded(&compressed_image::decode_compressed_image(&img)?);
            }
            MessageKind::Path => {
                let plan = Path::deserialize(&msg.msg)?;
                self.sink.on_path_decoded(&path::decode_path(&plan));
            }
            MessageKind::GoalStatus => {
                let array = GoalStatusArray::deserialize(&msg.msg)?;
                if let Some(signal) = self.nav.ingest(&array) {
                    self.sink.on_nav_signal(&signal);
                    if signal == NavSignal::GoalReached {
                        self.sink.on_goal_marker_update(None);
                    }
                }
            }
        }

        Ok(())
    }

    /// Record an operator goal and show its marker.
    pub fn set_goal(&mut self, x: f64, y: f64) {
        self.nav.set_goal([x, y]);
        self.sink.on_goal_marker_update(Some([x, y]));
    }

    /// Clear the held goal and hide its marker (operator cancel).
    pub fn clear_goal(&mut self) {
        self.nav.clear_goal();
        self.sink.on_goal_marker_update(None);
    }

    /// Forward a link transition to the sink. A drop resets the status
    /// machine: goal state does not survive a disconnect.
    pub fn connection_status(&mut self, state: LinkState, message: &str) {
        if state == LinkState::Disconnected {
            self.nav.reset();
        }
        self.sink.on_connection_status(state, message);
    }

    /// The currently held goal, if any.
    pub fn goal(&self) -> Option<[f64; 2]> {
        self.nav.goal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::decoders::image::ImageFrame;
    use crate::decoders::laser_scan::DecodedPoints;

    #[derive(Debug, PartialEq)]
    enum SinkCall {
        Scan(usize),
        Image(u32, u32),
        Path(usize),
        Marker(Option<[f64; 2]>),
        Nav(String),
        Status(LinkState),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<SinkCall>,
    }

    impl TelemetrySink for RecordingSink {
        fn on_scan_decoded(&mut self, points: &DecodedPoints) {
            self.calls.push(SinkCall::Scan(points.len()));
        }
        fn on_image_decoded(&mut self, frame: &ImageFrame) {
            self.calls.push(SinkCall::Image(frame.width, frame.height));
        }
        fn on_path_decoded(&mut self, waypoints: &[[f32; 2]]) {
            self.calls.push(SinkCall::Path(waypoints.len()));
        }
        fn on_goal_marker_update(&mut self, position: Option<[f64; 2]>) {
            self.calls.push(SinkCall::Marker(position));
        }
        fn on_nav_signal(&mut self, signal: &NavSignal) {
            self.calls.push(SinkCall::Nav(signal.to_string()));
        }
        fn on_connection_status(&mut self, state: LinkState, _message: &str) {
            self.calls.push(SinkCall::Status(state));
        }
    }

    fn message(topic: &str, msg: serde_json::Value) -> BridgeMessage {
        BridgeMessage {
            topic_name: topic.to_owned(),
            msg,
            receive_time_ns: 0,
        }
    }

    fn scan_json(ranges: serde_json::Value) -> serde_json::Value {
        json!({
            "angle_min": 0.0,
            "angle_max": 3.14,
            "angle_increment": 0.1,
            "range_min": 0.1,
            "range_max": 10.0,
            "ranges": ranges,
        })
    }

    fn status_json(codes: &[u8]) -> serde_json::Value {
        json!({
            "status_list": codes
                .iter()
                .map(|c| json!({"goal_id": {"stamp": {"secs": 0, "nsecs": 0}, "id": "g"}, "status": c}))
                .collect::<Vec<_>>(),
        })
    }

    fn bridge() -> TelemetryBridge<RecordingSink> {
        TelemetryBridge::new(RecordingSink::default())
    }

    #[test]
    fn test_add_topic_rejects_unknown_type() {
        let mut bridge = bridge();
        assert!(bridge.add_topic("/scan", "sensor_msgs/LaserScan"));
        assert!(!bridge.add_topic("/tf", "tf2_msgs/TFMessage"));
    }

    #[test]
    fn test_scan_dispatch() {
        let mut bridge = bridge();
        bridge.add_topic("/scan", "sensor_msgs/LaserScan");

        bridge
            .process_message(&message("/scan", scan_json(json!([1.0, null, 20.0, 2.0]))))
            .unwrap();

        // The null and out-of-range readings contribute nothing.
        assert_eq!(bridge.sink.calls, vec![SinkCall::Scan(2)]);
    }

    #[test]
    fn test_unknown_topic_ignored() {
        let mut bridge = bridge();
        bridge
            .process_message(&message("/scan", scan_json(json!([1.0]))))
            .unwrap();
        assert!(bridge.sink.calls.is_empty());
    }

    #[test]
    fn test_decode_failure_drops_frame() {
        let mut bridge = bridge();
        bridge.add_topic("/cam", "sensor_msgs/Image");

        let bad = json!({
            "height": 1, "width": 1, "encoding": "yuv422", "data": [0, 0],
        });
        assert!(bridge.process_message(&message("/cam", bad)).is_err());
        assert!(bridge.sink.calls.is_empty());
    }

    #[test]
    fn test_raw_image_dispatch() {
        let mut bridge = bridge();
        bridge.add_topic("/cam", "sensor_msgs/Image");

        let msg = json!({
            "height": 1, "width": 2, "encoding": "rgb8", "data": [1, 2, 3, 4, 5, 6],
        });
        bridge.process_message(&message("/cam", msg)).unwrap();
        assert_eq!(bridge.sink.calls, vec![SinkCall::Image(2, 1)]);
    }

    #[test]
    fn test_path_dispatch_delivers_empty_path() {
        let mut bridge = bridge();
        bridge.add_topic("/plan", "nav_msgs/Path");

        bridge
            .process_message(&message("/plan", json!({"poses": []})))
            .unwrap();
        assert_eq!(bridge.sink.calls, vec![SinkCall::Path(0)]);
    }

    #[test]
    fn test_goal_reached_hides_marker() {
        let mut bridge = bridge();
        bridge.add_topic("/move_base/status", "actionlib_msgs/GoalStatusArray");
        bridge.set_goal(1.0, 2.0);

        bridge
            .process_message(&message("/move_base/status", status_json(&[3])))
            .unwrap();

        assert_eq!(
            bridge.sink.calls,
            vec![
                SinkCall::Marker(Some([1.0, 2.0])),
                SinkCall::Nav("goal reached".to_owned()),
                SinkCall::Marker(None),
            ]
        );
        assert_eq!(bridge.goal(), None);
    }

    #[test]
    fn test_idle_status_suppressed() {
        let mut bridge = bridge();
        bridge.add_topic("/move_base/status", "actionlib_msgs/GoalStatusArray");

        bridge
            .process_message(&message("/move_base/status", status_json(&[0])))
            .unwrap();
        assert!(bridge.sink.calls.is_empty());
    }

    #[test]
    fn test_disconnect_resets_goal_state() {
        let mut bridge = bridge();
        bridge.add_topic("/move_base/status", "actionlib_msgs/GoalStatusArray");
        bridge.set_goal(1.0, 2.0);

        bridge.connection_status(LinkState::Disconnected, "connection closed");
        assert_eq!(bridge.goal(), None);

        // PENDING after the drop is idle chatter again.
        bridge
            .process_message(&message("/move_base/status", status_json(&[0])))
            .unwrap();
        assert_eq!(
            bridge.sink.calls,
            vec![
                SinkCall::Marker(Some([1.0, 2.0])),
                SinkCall::Status(LinkState::Disconnected),
            ]
        );
    }

    #[test]
    fn test_fallback_replaces_decoder() {
        let mut bridge = bridge();
        bridge.add_topic("/cam/compressed", "sensor_msgs/CompressedImage");

        bridge.remove_topic("/cam/compressed");
        bridge.add_topic("/cam", "sensor_msgs/Image");

        let msg = json!({
            "height": 1, "width": 1, "encoding": "mono8", "data": [7],
        });
        bridge.process_message(&message("/cam", msg)).unwrap();
        assert_eq!(bridge.sink.calls, vec![SinkCall::Image(1, 1)]);
    }
}
