//! Serde definitions of the ROS message shapes carried by the bridge.
//!
//! Field shapes follow the ROS1 JSON encoding rosbridge uses on the wire:
//! times are `{secs, nsecs}`, byte arrays arrive base64-encoded (or as a
//! plain JSON array), and range arrays may contain `null` where the robot
//! reported NaN.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

pub mod actionlib_msgs;
pub mod geometry_msgs;
pub mod nav_msgs;
pub mod sensor_msgs;
pub mod std_msgs;

/// A byte payload as rosbridge delivers it: base64 text or a plain JSON
/// byte array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ByteData {
    Base64(String),
    Raw(Vec<u8>),
}

impl ByteData {
    /// Decode to raw bytes, decoding base64 text if needed.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        match self {
            Self::Base64(text) => BASE64.decode(text),
            Self::Raw(bytes) => Ok(bytes.clone()),
        }
    }

    /// Encode raw bytes the way rosbridge sends them.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::Base64(BASE64.encode(bytes))
    }
}

/// Deserialize a float array in which `null` stands for NaN.
pub(crate) fn nullable_f32_vec<'de, D>(deserializer: D) -> Result<Vec<f32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values = Vec::<Option<f32>>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f32::NAN)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_data_base64_roundtrip() {
        let data = ByteData::from_bytes(&[0, 1, 2, 255]);
        assert_eq!(data.decode().unwrap(), vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_byte_data_accepts_both_wire_shapes() {
        let from_text: ByteData = serde_json::from_str("\"AAEC\"").unwrap();
        assert_eq!(from_text.decode().unwrap(), vec![0, 1, 2]);

        let from_array: ByteData = serde_json::from_str("[0, 1, 2]").unwrap();
        assert_eq!(from_array.decode().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_byte_data_rejects_invalid_base64() {
        let data = ByteData::Base64("not base64!!".to_owned());
        assert!(data.decode().is_err());
    }
}
