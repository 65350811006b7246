use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::config::Precision;
use crate::errors::DatasetError;

/// Element type of a decoded pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Unsigned 8-bit channel values.
    U8,
    /// 32-bit floating-point channel values.
    F32,
    /// 64-bit floating-point channel values.
    F64,
}

/// Dense pixel storage in one of the supported element widths.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelBuffer {
    /// 8-bit channels, row-major, interleaved.
    U8(Vec<u8>),
    /// 32-bit float channels, row-major, interleaved.
    F32(Vec<f32>),
    /// 64-bit float channels, row-major, interleaved.
    F64(Vec<f64>),
}

impl PixelBuffer {
    /// Total number of channel values in the buffer.
    pub fn len(&self) -> usize {
        match self {
            PixelBuffer::U8(v) => v.len(),
            PixelBuffer::F32(v) => v.len(),
            PixelBuffer::F64(v) => v.len(),
        }
    }

    /// Whether the buffer holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type of the buffer.
    pub fn element(&self) -> ElementKind {
        match self {
            PixelBuffer::U8(_) => ElementKind::U8,
            PixelBuffer::F32(_) => ElementKind::F32,
            PixelBuffer::F64(_) => ElementKind::F64,
        }
    }
}

/// A fully decoded image: dense pixels plus shape metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    /// Interleaved, row-major channel values.
    pub pixels: PixelBuffer,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel count; 1 for grayscale, 3 for color.
    pub channels: u32,
    /// Element type of `pixels`.
    pub element: ElementKind,
}

impl DecodedImage {
    /// Shape as (width, height, channels).
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.channels)
    }
}

/// Native bit depth of a decoded source, before channel conversion.
enum SourceDepth {
    Eight,
    Float,
    Wide,
}

fn classify(image: &DynamicImage) -> SourceDepth {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => SourceDepth::Eight,
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => SourceDepth::Float,
        _ => SourceDepth::Wide,
    }
}

/// Decodes `bytes` into a dense pixel tensor.
///
/// 8-bit sources keep their native `u8` elements; higher-depth sources decode
/// to the configured floating-point precision. Channel count follows the
/// `grayscale` flag regardless of the source's own channel layout.
pub fn decode_image(
    bytes: &[u8],
    grayscale: bool,
    precision: Precision,
    path: &str,
) -> Result<DecodedImage, DatasetError> {
    let image = image::load_from_memory(bytes).map_err(|err| DatasetError::ImageDecode {
        path: path.to_string(),
        reason: err.to_string(),
    })?;
    let width = image.width();
    let height = image.height();
    let channels: u32 = if grayscale { 1 } else { 3 };

    let pixels = match classify(&image) {
        SourceDepth::Eight => {
            if grayscale {
                PixelBuffer::U8(image.to_luma8().into_raw())
            } else {
                PixelBuffer::U8(image.to_rgb8().into_raw())
            }
        }
        SourceDepth::Float => to_float_pixels(&image, grayscale, Precision::F32),
        SourceDepth::Wide => to_float_pixels(&image, grayscale, precision),
    };

    let element = pixels.element();
    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
        element,
    })
}

fn to_float_pixels(image: &DynamicImage, grayscale: bool, precision: Precision) -> PixelBuffer {
    let raw = if grayscale {
        image.to_luma32f().into_raw()
    } else {
        image.to_rgb32f().into_raw()
    };
    match precision {
        Precision::F32 => PixelBuffer::F32(raw),
        Precision::F64 => PixelBuffer::F64(raw.into_iter().map(f64::from).collect()),
    }
}
