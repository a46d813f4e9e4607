//! Error types for telemetry decoding.

use thiserror::Error;

/// Failures while decoding an inbound frame.
///
/// A decode failure always narrows to "drop this frame": the previous
/// valid frame stays with the renderer and the stream continues.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The JSON payload does not match the declared message shape.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    /// The byte payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The compressed container failed to decode.
    #[error("container decode failed: {0}")]
    Container(#[from] image::ImageError),

    /// The pixel encoding tag is not one this client can transcode.
    #[error("unsupported pixel encoding `{0}`")]
    UnsupportedEncoding(String),

    /// The payload length does not match the declared dimensions.
    #[error("{width}x{height} {encoding} frame needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        encoding: String,
        expected: usize,
        actual: usize,
    },

    /// The frame is larger than the renderer will accept.
    #[error("image dimensions {0}x{1} exceed limit")]
    OversizedImage(u32, u32),
}
