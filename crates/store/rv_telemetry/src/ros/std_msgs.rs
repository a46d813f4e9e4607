//! Definitions for the ROS `std_msgs` package.

use serde::{Deserialize, Serialize};

/// A point in time as seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub secs: u32,
    pub nsecs: u32,
}

/// Standard metadata carried by most ROS messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub seq: u32,

    #[serde(default)]
    pub stamp: Time,

    /// The frame this data is associated with.
    #[serde(default)]
    pub frame_id: String,
}
