//! Definitions for the ROS `actionlib_msgs` package.

use serde::{Deserialize, Serialize};

use super::std_msgs::{Header, Time};

/// A goal identifier. An empty id with a zero stamp addresses every
/// outstanding goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalID {
    #[serde(default)]
    pub stamp: Time,

    #[serde(default)]
    pub id: String,
}

/// Status of a single navigation goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalStatus {
    #[serde(default)]
    pub goal_id: GoalID,

    /// Numeric status code, 0..=9 on the wire.
    pub status: u8,

    #[serde(default)]
    pub text: String,
}

/// Status report for every goal the action server knows about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalStatusArray {
    #[serde(default)]
    pub header: Header,

    /// Per-goal statuses; the last entry is the most recent goal.
    #[serde(default)]
    pub status_list: Vec<GoalStatus>,
}
