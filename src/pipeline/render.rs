//! PDF rasterisation: render a single page to a `DynamicImage` via pdfium.
//!
//! pdfium wraps a C++ library with thread-local state that is not safe to
//! call from async contexts, so the work runs under
//! `tokio::task::spawn_blocking`. One page per call: the aggregator
//! processes pages strictly in sequence, so there is nothing to gain from
//! batching and a per-page call keeps the memory high-water mark to a
//! single bitmap.

use crate::error::OcrError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Rasterise one page (1-based) of a PDF.
///
/// `max_pixels` caps the longer edge of the output bitmap; the other edge
/// scales proportionally.
pub async fn render_page(
    pdf_path: &Path,
    page: usize,
    max_pixels: u32,
) -> Result<DynamicImage, OcrError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || render_page_blocking(&path, page, max_pixels))
        .await
        .map_err(|e| OcrError::Internal(format!("Render task panicked: {e}")))?
}

fn render_page_blocking(
    pdf_path: &Path,
    page: usize,
    max_pixels: u32,
) -> Result<DynamicImage, OcrError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| OcrError::PdfRead {
            path: pdf_path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    if page == 0 || page > total {
        return Err(OcrError::RenderFailed {
            page,
            detail: format!("page out of range (document has {total} pages)"),
        });
    }

    let pdf_page = pages
        .get((page - 1) as u16)
        .map_err(|e| OcrError::RenderFailed {
            page,
            detail: format!("{e:?}"),
        })?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let bitmap = pdf_page
        .render_with_config(&render_config)
        .map_err(|e| OcrError::RenderFailed {
            page,
            detail: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    debug!("Rendered page {} → {}x{} px", page, image.width(), image.height());

    Ok(image)
}
