//! Page counting via lopdf.
//!
//! Counting is a separate stage from rendering: it needs no pdfium binding
//! and no network, so `pdfocr --count-only` and the zero-page check both
//! work with nothing but the file. lopdf parses the page tree directly;
//! parsing is CPU-bound, hence `spawn_blocking`.

use crate::error::OcrError;
use std::path::Path;
use tokio::task::spawn_blocking;
use tracing::debug;

/// Count the pages of a PDF.
///
/// Returns [`OcrError::PdfRead`] if the file cannot be parsed as a PDF.
pub async fn count_pages(pdf_path: &Path) -> Result<usize, OcrError> {
    let path = pdf_path.to_path_buf();

    spawn_blocking(move || {
        let doc = lopdf::Document::load(&path).map_err(|e| OcrError::PdfRead {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        let count = doc.get_pages().len();
        debug!("{}: {} pages", path.display(), count);
        Ok(count)
    })
    .await
    .map_err(|e| OcrError::Internal(format!("Page-count task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Dictionary, Document, Object};
    use std::io::Write;

    /// Build a minimal PDF with `num_pages` blank pages.
    fn blank_pdf(num_pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for _ in 0..num_pages {
            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            );
            kids.push(Object::Reference(doc.add_object(page)));
        }

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(num_pages as i64));
        pages.set("Kids", Object::Array(kids));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f
    }

    #[tokio::test]
    async fn counts_pages_of_generated_pdf() {
        let f = write_temp(&blank_pdf(3));
        assert_eq!(count_pages(f.path()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn empty_page_tree_counts_zero() {
        let f = write_temp(&blank_pdf(0));
        assert_eq!(count_pages(f.path()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn garbage_file_is_a_read_error() {
        let f = write_temp(b"this is not a pdf at all");
        let err = count_pages(f.path()).await.unwrap_err();
        assert!(matches!(err, OcrError::PdfRead { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = count_pages(Path::new("/no/such/file.pdf")).await.unwrap_err();
        assert!(matches!(err, OcrError::PdfRead { .. }));
    }
}
