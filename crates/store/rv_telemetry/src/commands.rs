//! Outbound command encoders.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::ros::actionlib_msgs::GoalID;
use crate::ros::geometry_msgs::{Point, Pose, PoseStamped, Quaternion};
use crate::ros::std_msgs::{Header, Time};

/// Frame operator goals are expressed in.
const GOAL_FRAME_ID: &str = "map";

fn now_stamp() -> Time {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Time {
        secs: elapsed.as_secs() as u32,
        nsecs: elapsed.subsec_nanos(),
    }
}

/// Build a navigation goal pose at (x, y) with the given heading.
///
/// The heading becomes a unit quaternion about the vertical axis:
/// `z = sin(yaw/2)`, `w = cos(yaw/2)`.
pub fn goal_message(x: f64, y: f64, yaw: f64) -> PoseStamped {
    let half = yaw / 2.0;
    PoseStamped {
        header: Header {
            seq: 0,
            stamp: now_stamp(),
            frame_id: GOAL_FRAME_ID.to_owned(),
        },
        pose: Pose {
            position: Point { x, y, z: 0.0 },
            orientation: Quaternion {
                x: 0.0,
                y: 0.0,
                z: half.sin(),
                w: half.cos(),
            },
        },
    }
}

/// Build a cancel command. An empty id with a zero stamp addresses every
/// outstanding goal; this client has no per-goal cancel.
pub fn cancel_message() -> GoalID {
    GoalID {
        stamp: Time::default(),
        id: String::new(),
    }
}
