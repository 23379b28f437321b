// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding, RGB normalization and data-URL encoding

pub mod dimensions;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use thiserror::Error;

pub use dimensions::{derive_edit_dimensions, EditDimensions, DEFAULT_LONG_SIDE};

/// Maximum image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Decode an image given either as plain base64 or as a `data:` URL
pub fn decode_image_input(input: &str) -> Result<(DynamicImage, ImageInfo), ImageError> {
    let payload = strip_data_url(input.trim());
    if payload.is_empty() {
        return Err(ImageError::EmptyData);
    }
    let bytes = STANDARD.decode(payload)?;
    decode_image_bytes(&bytes)
}

/// Decode user-supplied image bytes (multipart uploads, files); enforces [`MAX_IMAGE_SIZE`]
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }
    decode_image_bytes_unbounded(bytes)
}

/// Decode image bytes without the upload cap. Engine output at 2048x2048
/// routinely exceeds it.
pub fn decode_image_bytes_unbounded(
    bytes: &[u8],
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
    };

    Ok((img, info))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF87a / GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        _ => Err(ImageError::UnsupportedFormat),
    }
}

/// Drop alpha / palette / 16-bit channels; the engine only takes RGB8
pub fn to_rgb(image: &DynamicImage) -> RgbImage {
    image.to_rgb8()
}

/// RGB-normalize and encode as PNG bytes
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let rgb = DynamicImage::ImageRgb8(to_rgb(image));
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}

pub fn encode_png_base64(image: &DynamicImage) -> Result<String, ImageError> {
    Ok(STANDARD.encode(encode_png(image)?))
}

/// PNG data URL, the form the lighting widget loads its reference image from
pub fn to_data_url(image: &DynamicImage) -> Result<String, ImageError> {
    Ok(format!("data:image/png;base64,{}", encode_png_base64(image)?))
}

fn strip_data_url(input: &str) -> &str {
    if input.starts_with("data:") {
        match input.find(";base64,") {
            Some(index) => &input[index + ";base64,".len()..],
            None => "",
        }
    } else {
        input
    }
}
