//! Raw image decoder: `sensor_msgs/Image` → canonical RGBA.

use crate::error::DecodeError;
use crate::ros::sensor_msgs::Image;

pub(crate) const MAX_IMAGE_DIM: u32 = 8192;

/// A camera frame normalized to a canonical RGBA byte buffer.
///
/// `rgba.len() == width * height * 4` always holds; a source frame that
/// cannot satisfy it is a decode failure, not a partial image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,

    /// The encoding the frame arrived in (`rgb8`, `jpeg`, …).
    pub source_encoding: String,

    /// RGBA pixel bytes, row-major.
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
enum PixelLayout {
    Rgb8,
    Bgr8,
    Rgba8,
    Bgra8,
    Mono8,
}

impl PixelLayout {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "rgb8" => Some(Self::Rgb8),
            "bgr8" => Some(Self::Bgr8),
            "rgba8" => Some(Self::Rgba8),
            "bgra8" => Some(Self::Bgra8),
            "mono8" | "grayscale" => Some(Self::Mono8),
            _ => None,
        }
    }

    fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Mono8 => 1,
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }
}

/// Transcode a raw-encoded frame into RGBA.
pub fn decode_raw_image(img: &Image) -> Result<ImageFrame, DecodeError> {
    if img.width > MAX_IMAGE_DIM || img.height > MAX_IMAGE_DIM {
        return Err(DecodeError::OversizedImage(img.width, img.height));
    }

    let layout = PixelLayout::from_tag(&img.encoding)
        .ok_or_else(|| DecodeError::UnsupportedEncoding(img.encoding.clone()))?;

    let bytes = img.data.decode()?;
    let pixels = img.width as usize * img.height as usize;
    let expected = pixels * layout.bytes_per_pixel();
    if bytes.len() != expected {
        return Err(DecodeError::SizeMismatch {
            width: img.width,
            height: img.height,
            encoding: img.encoding.clone(),
            expected,
            actual: bytes.len(),
        });
    }

    let mut rgba = Vec::with_capacity(pixels * 4);
    match layout {
        PixelLayout::Rgb8 => {
            for px in bytes.chunks_exact(3) {
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        PixelLayout::Bgr8 => {
            for px in bytes.chunks_exact(3) {
                rgba.extend_from_slice(&[px[2], px[1], px[0], 255]);
            }
        }
        PixelLayout::Rgba8 => rgba.extend_from_slice(&bytes),
        PixelLayout::Bgra8 => {
            for px in bytes.chunks_exact(4) {
                rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        }
        PixelLayout::Mono8 => {
            for &v in &bytes {
                rgba.extend_from_slice(&[v, v, v, 255]);
            }
        }
    }

    Ok(ImageFrame {
        width: img.width,
        height: img.height,
        source_encoding: img.encoding.clone(),
        rgba,
    })
}
