//! Compressed image decoder: JPEG/PNG container → canonical RGBA.

use crate::decoders::image::{ImageFrame, MAX_IMAGE_DIM};
use crate::error::DecodeError;
use crate::ros::sensor_msgs::CompressedImage;

/// Decode a container-compressed frame.
///
/// The container decode itself is delegated to the `image` crate, which
/// sniffs the format from the payload's magic bytes; this function packages
/// the result and maps failures into [`DecodeError`]. No partial image is
/// ever produced.
pub fn decode_compressed_image(img: &CompressedImage) -> Result<ImageFrame, DecodeError> {
    let bytes = img.data.decode()?;
    let decoded = image::load_from_memory(&bytes)?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width > MAX_IMAGE_DIM || height > MAX_IMAGE_DIM {
        return Err(DecodeError::OversizedImage(width, height));
    }

    Ok(ImageFrame {
        width,
        height,
        source_encoding: img.format.clone(),
        rgba: rgba.into_raw(),
    })
}
