//! Definitions for the ROS `nav_msgs` package.

use serde::{Deserialize, Serialize};

use super::geometry_msgs::PoseStamped;
use super::std_msgs::Header;

/// An array of poses that represents a path for a robot to follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    #[serde(default)]
    pub header: Header,

    /// The poses along the path. An empty list is a valid "no path".
    #[serde(default)]
    pub poses: Vec<PoseStamped>,
}
