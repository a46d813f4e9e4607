//! Tagged message kinds dispatched by the telemetry bridge.

/// The finite set of message kinds this client decodes.
///
/// Topics are bound to a kind by their declared ROS type name when they
/// are added to the bridge; the dispatcher selects a decoder by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    LaserScan,
    RawImage,
    CompressedImage,
    Path,
    GoalStatus,
}

impl MessageKind {
    /// Resolve a declared ROS type name to a kind, if supported.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "sensor_msgs/LaserScan" => Some(Self::LaserScan),
            "sensor_msgs/Image" => Some(Self::RawImage),
            "sensor_msgs/CompressedImage" => Some(Self::CompressedImage),
            "nav_msgs/Path" => Some(Self::Path),
            "actionlib_msgs/GoalStatusArray" => Some(Self::GoalStatus),
            _ => None,
        }
    }

    /// The ROS type name for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::LaserScan => "sensor_msgs/LaserScan",
            Self::RawImage => "sensor_msgs/Image",
            Self::CompressedImage => "sensor_msgs/CompressedImage",
            Self::Path => "nav_msgs/Path",
            Self::GoalStatus => "actionlib_msgs/GoalStatusArray",
        }
    }
}
