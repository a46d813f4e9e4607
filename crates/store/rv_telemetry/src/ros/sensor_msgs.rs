//! Definitions for the ROS `sensor_msgs` package.

use serde::{Deserialize, Serialize};

use super::std_msgs::Header;
use super::ByteData;

/// A single range-finder sweep with uniform angular spacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserScan {
    #[serde(default)]
    pub header: Header,

    /// Start angle of the sweep (radians).
    pub angle_min: f32,

    /// End angle of the sweep (radians).
    pub angle_max: f32,

    /// Angular distance between readings (radians).
    pub angle_increment: f32,

    #[serde(default)]
    pub time_increment: f32,

    #[serde(default)]
    pub scan_time: f32,

    /// Minimum valid range (meters).
    pub range_min: f32,

    /// Maximum valid range (meters).
    pub range_max: f32,

    /// Range readings (meters). rosbridge encodes NaN as JSON `null`.
    #[serde(deserialize_with = "super::nullable_f32_vec")]
    pub ranges: Vec<f32>,

    #[serde(default, deserialize_with = "super::nullable_f32_vec")]
    pub intensities: Vec<f32>,
}

/// An uncompressed camera frame with an explicit pixel encoding tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub header: Header,

    /// Image height (rows).
    pub height: u32,

    /// Image width (columns).
    pub width: u32,

    /// Pixel encoding tag (`rgb8`, `bgr8`, `rgba8`, `bgra8`, `mono8`).
    pub encoding: String,

    #[serde(default)]
    pub is_bigendian: u8,

    /// Full row length in bytes.
    #[serde(default)]
    pub step: u32,

    /// The pixel data, `step * height` bytes.
    pub data: ByteData,
}

/// A container-compressed camera frame (JPEG or PNG).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedImage {
    #[serde(default)]
    pub header: Header,

    /// Container format tag (e.g., `jpeg`, `png`).
    #[serde(default)]
    pub format: String,

    /// The container bytes.
    pub data: ByteData,
}
