//! Photo preparation applied before image bytes reach a capture.
//!
//! # Responsibility
//! - Crop camera output to the centered square the feed renders.
//! - Re-encode as JPEG so stored blobs stay small.
//!
//! # Invariants
//! - The crop side is `min(width, height)`; the crop is centered on both
//!   axes, odd remainders rounding toward the top-left.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CAPTURE_JPEG_QUALITY: u8 = 80;

/// Centered square region inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

#[derive(Debug)]
pub enum PhotoError {
    /// Input bytes were empty.
    Empty,
    Decode(ImageError),
    Encode(ImageError),
}

impl Display for PhotoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "photo data is empty"),
            Self::Decode(err) => write!(f, "failed to decode photo: {err}"),
            Self::Encode(err) => write!(f, "failed to encode photo: {err}"),
        }
    }
}

impl Error for PhotoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Empty => None,
            Self::Decode(err) | Self::Encode(err) => Some(err),
        }
    }
}

pub fn square_crop_rect(width: u32, height: u32) -> CropRect {
    let side = width.min(height);
    CropRect {
        x: (width - side) / 2,
        y: (height - side) / 2,
        side,
    }
}

pub fn crop_to_square(image: &DynamicImage) -> DynamicImage {
    let rect = square_crop_rect(image.width(), image.height());
    image.crop_imm(rect.x, rect.y, rect.side, rect.side)
}

/// Decodes raw camera bytes, crops them square and returns JPEG bytes.
///
/// # Errors
/// - `PhotoError::Empty` for zero-length input.
/// - `PhotoError::Decode` when the format is unknown or the data is corrupt.
pub fn prepare_capture_photo(raw: &[u8]) -> Result<Vec<u8>, PhotoError> {
    if raw.is_empty() {
        return Err(PhotoError::Empty);
    }

    let decoded = image::load_from_memory(raw).map_err(PhotoError::Decode)?;
    let square = crop_to_square(&decoded).to_rgb8();

    let mut encoded = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut encoded, CAPTURE_JPEG_QUALITY);
    encoder.encode_image(&square).map_err(PhotoError::Encode)?;
    Ok(encoded)
}
