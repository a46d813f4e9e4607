//! Compressed→raw camera stream fallback.
//!
//! A camera subscription first probes `<topic>/compressed`. If a frame
//! arrives before the deadline the probe commits to the compressed stream
//! for the rest of the session; if the deadline passes with zero frames it
//! falls back to the bare raw topic. The fallback runs at most once per
//! camera subscription lifetime.

use tokio::time::Instant;

/// Declared type of the compressed camera stream.
pub const COMPRESSED_IMAGE_TYPE: &str = "sensor_msgs/CompressedImage";

/// Declared type of the raw camera stream.
pub const RAW_IMAGE_TYPE: &str = "sensor_msgs/Image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeState {
    /// Subscribed to the compressed topic, waiting for the first frame.
    Probing { deadline: Instant },
    CommittedCompressed,
    CommittedRaw,
}

/// Probe state for one camera subscription.
#[derive(Debug, Clone)]
pub struct CameraFallback {
    base_topic: String,
    state: ProbeState,
}

impl CameraFallback {
    pub fn new(base_topic: &str, deadline: Instant) -> Self {
        Self {
            base_topic: base_topic.to_owned(),
            state: ProbeState::Probing { deadline },
        }
    }

    pub fn base_topic(&self) -> &str {
        &self.base_topic
    }

    pub fn compressed_topic(&self) -> String {
        format!("{}/compressed", self.base_topic)
    }

    /// The topic this camera currently receives frames on.
    pub fn active_topic(&self) -> String {
        match self.state {
            ProbeState::Probing { .. } | ProbeState::CommittedCompressed => self.compressed_topic(),
            ProbeState::CommittedRaw => self.base_topic.clone(),
        }
    }

    pub fn is_probing(&self) -> bool {
        matches!(self.state, ProbeState::Probing { .. })
    }

    /// The pending probe deadline, if still probing.
    pub fn probe_deadline(&self) -> Option<Instant> {
        match self.state {
            ProbeState::Probing { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub fn deadline_passed(&self, now: Instant) -> bool {
        matches!(self.state, ProbeState::Probing { deadline } if now >= deadline)
    }

    /// A compressed frame arrived in time: stay on the compressed stream.
    /// No-op unless probing.
    pub fn commit_compressed(&mut self) {
        if self.is_probing() {
            self.state = ProbeState::CommittedCompressed;
        }
    }

    /// The probe timed out: switch to the raw stream. No-op unless probing.
    pub fn commit_raw(&mut self) {
        if self.is_probing() {
            self.state = ProbeState::CommittedRaw;
        }
    }
}

/// Probe resolutions surfaced to the application so it can mirror the
/// change into its decoder table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    /// The compressed stream answered in time.
    CommittedCompressed { topic: String },

    /// The probe timed out; the compressed subscription was replaced by
    /// the raw one.
    FellBackToRaw {
        compressed_topic: String,
        raw_topic: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_probing_topics() {
        let cam = CameraFallback::new("/camera/rgb/image_raw", Instant::now());
        assert_eq!(cam.compressed_topic(), "/camera/rgb/image_raw/compressed");
        assert_eq!(cam.active_topic(), "/camera/rgb/image_raw/compressed");
        assert!(cam.is_probing());
    }

    #[test]
    fn test_commit_compressed_clears_deadline() {
        let mut cam = CameraFallback::new("/cam", Instant::now());
        cam.commit_compressed();
        assert!(!cam.is_probing());
        assert!(cam.probe_deadline().is_none());
        assert_eq!(cam.active_topic(), "/cam/compressed");
    }

    #[test]
    fn test_commit_raw_switches_active_topic() {
        let mut cam = CameraFallback::new("/cam", Instant::now());
        cam.commit_raw();
        assert_eq!(cam.active_topic(), "/cam");
    }

    #[test]
    fn test_fallback_runs_at_most_once() {
        let mut cam = CameraFallback::new("/cam", Instant::now());
        cam.commit_compressed();
        // A stale timeout after committing must not flip the stream.
        cam.commit_raw();
        assert_eq!(cam.active_topic(), "/cam/compressed");
    }

    #[test]
    fn test_deadline_passed() {
        let now = Instant::now();
        let cam = CameraFallback::new("/cam", now + Duration::from_millis(3000));
        assert!(!cam.deadline_passed(now));
        assert!(cam.deadline_passed(now + Duration::from_millis(3000)));
        assert!(cam.deadline_passed(now + Duration::from_millis(4000)));
    }
}
