//! Path decoder: `nav_msgs/Path` → planar waypoints.

use crate::ros::nav_msgs::Path;

/// Extract the (x, y) waypoint sequence from a planned path.
///
/// An empty message still yields an (empty) result: "no path" is a valid
/// value the renderer uses to clear a stale path, distinct from a path
/// that never arrived.
pub fn decode_path(path: &Path) -> Vec<[f32; 2]> {
    path.poses
        .iter()
        .map(|ps| {
            let p = &ps.pose.position;
            [p.x as f32, p.y as f32]
        })
        .collect()
}
