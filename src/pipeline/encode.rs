//! Image encoding: `DynamicImage` → base64 PNG data URL.
//!
//! Vision APIs accept images as base64 data URLs embedded in the JSON
//! request body. PNG over JPEG: lossless compression keeps rendered text
//! crisp, and compression artefacts measurably hurt transcription accuracy
//! at low resolutions.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as a `data:image/png;base64,…` URL.
pub fn encode_page(img: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded page image → {} bytes base64", b64.len());

    Ok(format!("data:image/png;base64,{b64}"))
}
