//! The renderer-facing output interface.

use rv_rosbridge::LinkState;

use crate::decoders::image::ImageFrame;
use crate::decoders::laser_scan::DecodedPoints;
use crate::nav_status::NavSignal;

/// Consumer of the core's decoded outputs.
///
/// The renderer is purely a sink: nothing flows back through this trait.
/// Each callback supersedes the previous value of its stream wholesale;
/// on a decode failure no callback fires and the previous value stands.
pub trait TelemetrySink {
    /// A decoded range scan.
    fn on_scan_decoded(&mut self, points: &DecodedPoints);

    /// A decoded camera frame, already normalized to RGBA.
    fn on_image_decoded(&mut self, frame: &ImageFrame);

    /// The latest planned path; empty means "no path".
    fn on_path_decoded(&mut self, waypoints: &[[f32; 2]]);

    /// Show (`Some`) or hide (`None`) the goal marker.
    fn on_goal_marker_update(&mut self, position: Option<[f64; 2]>);

    /// A navigation status signal.
    fn on_nav_signal(&mut self, signal: &NavSignal);

    /// The bridge link changed state.
    fn on_connection_status(&mut self, state: LinkState, message: &str);
}
