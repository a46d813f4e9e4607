//! Console sink: logs decoded telemetry in place of a real renderer.

use rv_rosbridge::LinkState;
use rv_telemetry::{DecodedPoints, ImageFrame, NavSignal, TelemetrySink};

/// How many frames between per-stream summary lines.
const SUMMARY_EVERY: u64 = 50;

/// Logs a summary of every decoded output.
///
/// Stands in for the renderer: a real frontend would feed these into a
/// point cloud, a canvas, and a set of markers instead.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    scans: u64,
    frames: u64,
    paths: u64,
}

impl TelemetrySink for ConsoleSink {
    fn on_scan_decoded(&mut self, points: &DecodedPoints) {
        self.scans += 1;
        if self.scans == 1 || self.scans.is_multiple_of(SUMMARY_EVERY) {
            tracing::info!("scan #{}: {} points", self.scans, points.len());
        } else {
            tracing::debug!("scan #{}: {} points", self.scans, points.len());
        }
    }

    fn on_image_decoded(&mut self, frame: &ImageFrame) {
        self.frames += 1;
        if self.frames == 1 || self.frames.is_multiple_of(SUMMARY_EVERY) {
            tracing::info!(
                "camera frame #{}: {}x{} ({})",
                self.frames,
                frame.width,
                frame.height,
                frame.source_encoding
            );
        } else {
            tracing::debug!("camera frame #{}: {}x{}", self.frames, frame.width, frame.height);
        }
    }

    fn on_path_decoded(&mut self, waypoints: &[[f32; 2]]) {
        self.paths += 1;
        if waypoints.is_empty() {
            tracing::debug!("path cleared");
        } else {
            tracing::debug!("path with {} waypoints", waypoints.len());
        }
    }

    fn on_goal_marker_update(&mut self, position: Option<[f64; 2]>) {
        match position {
            Some([x, y]) => tracing::info!("goal marker at ({x:.2}, {y:.2})"),
            None => tracing::info!("goal marker hidden"),
        }
    }

    fn on_nav_signal(&mut self, signal: &NavSignal) {
        tracing::info!("navigation: {signal}");
    }

    fn on_connection_status(&mut self, state: LinkState, message: &str) {
        tracing::info!("connection {state}: {message}");
    }
}
