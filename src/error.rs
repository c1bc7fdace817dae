//! Error types for the pdfocr library.
//!
//! A single [`OcrError`] enum covers the whole taxonomy because a run is
//! all-or-nothing: one page exhausting its retries aborts the document, so
//! there is no separate "non-fatal page error" type to carry alongside
//! partial output. [`OcrError::PageFailed`] is the retry-exhausted case;
//! everything else fails before the first OCR call or while writing output.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfocr library.
#[derive(Debug, Error)]
pub enum OcrError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No Azure credentials were supplied; processing is refused before any call.
    #[error(
        "Azure OpenAI credentials are not configured.\n\
         Provide an API key, base URL, and API version via OcrConfig::builder().credentials(...)\n\
         or the AZURE_API_KEY / AZURE_API_BASE / AZURE_API_VERSION environment variables."
    )]
    MissingCredentials,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The PDF could not be parsed for a page count.
    #[error("Failed to read PDF '{path}': {detail}")]
    PdfRead { path: PathBuf, detail: String },

    /// The document has no pages; there is nothing to OCR.
    #[error("No pages found in the PDF '{path}'.")]
    EmptyDocument { path: PathBuf },

    /// pdfium could not rasterise a page for the vision request.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// A single OCR request failed. Retried up to the configured bound.
    #[error("OCR request for page {page} failed: {detail}")]
    OcrRequest { page: usize, detail: String },

    /// A page exhausted every retry attempt; the whole run is aborted.
    #[error("Page {page} failed after {attempts} attempts: {detail}")]
    PageFailed {
        page: usize,
        attempts: u32,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_failed_display() {
        let e = OcrError::PageFailed {
            page: 4,
            attempts: 3,
            detail: "HTTP 503".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Page 4"), "got: {msg}");
        assert!(msg.contains("3 attempts"), "got: {msg}");
        assert!(msg.contains("HTTP 503"), "got: {msg}");
    }

    #[test]
    fn empty_document_display() {
        let e = OcrError::EmptyDocument {
            path: PathBuf::from("scan.pdf"),
        };
        assert!(e.to_string().contains("No pages found"));
    }

    #[test]
    fn missing_credentials_names_env_vars() {
        let msg = OcrError::MissingCredentials.to_string();
        assert!(msg.contains("AZURE_API_KEY"));
        assert!(msg.contains("AZURE_API_BASE"));
        assert!(msg.contains("AZURE_API_VERSION"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = OcrError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("not a valid PDF"));
    }
}
