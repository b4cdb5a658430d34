//! Thumbnail rendering: decode, flatten to opaque RGB, shrink, re-encode as JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage};

use crate::error::Result;

/// Largest width and height of a thumbnail
pub const THUMBNAIL_MAX_DIMENSION: u32 = 400;
pub const THUMBNAIL_JPEG_QUALITY: u8 = 85;
pub const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Gray and RGB pass through; alpha, palette and deep-color images become 8-bit RGB.
/// Alpha is dropped, not composited.
pub fn normalize_color(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Shrink proportionally to fit `max` x `max`. Smaller images are left alone.
pub fn fit_within(image: DynamicImage, max: u32) -> DynamicImage {
    if image.width() <= max && image.height() <= max {
        return image;
    }
    image.resize(max, max, FilterType::Lanczos3)
}

/// Produce thumbnail bytes from any decodable source image.
pub fn render_thumbnail(source: &[u8]) -> Result<Vec<u8>> {
    let image = image::load_from_memory(source)?;
    let (width, height) = (image.width(), image.height());

    let image = fit_within(normalize_color(image), THUMBNAIL_MAX_DIMENSION);

    let mut buffer = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, THUMBNAIL_JPEG_QUALITY);
        match &image {
            DynamicImage::ImageLuma8(gray) => {
                encoder.encode(gray.as_raw(), gray.width(), gray.height(), ColorType::L8)?
            }
            other => {
                let rgb = other.to_rgb8();
                encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?
            }
        }
    }

    tracing::debug!(
        source_width = width,
        source_height = height,
        width = image.width(),
        height = image.height(),
        bytes = buffer.len(),
        "rendered thumbnail"
    );
    Ok(buffer)
}
