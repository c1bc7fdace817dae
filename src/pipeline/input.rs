//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! pdfium and lopdf both want a file-system path, so URL inputs are
//! downloaded into a `TempDir` that stays alive until processing completes.
//! The `%PDF` magic is checked up front on every path; a garbage file should
//! fail here with a readable error, not deep inside a PDF parser.

use crate::error::OcrError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input — either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; PDF downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Fail with [`OcrError::NotAPdf`] unless `bytes` starts with the PDF magic.
/// Inputs shorter than the magic (truncated downloads, empty files) fail
/// too, with the available bytes zero-padded into the reported magic.
pub(crate) fn check_pdf_magic(bytes: &[u8], path: &Path) -> Result<(), OcrError> {
    let mut magic = [0u8; 4];
    let head = bytes.len().min(4);
    magic[..head].copy_from_slice(&bytes[..head]);
    if &magic != b"%PDF" {
        return Err(OcrError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

/// Resolve the input string to a local PDF file path.
///
/// URLs are downloaded to a temporary directory; local paths are validated
/// for existence, readability, and PDF magic.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, OcrError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

fn resolve_local(path_str: &str) -> Result<ResolvedInput, OcrError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(OcrError::FileNotFound { path });
    }

    let mut magic = [0u8; 4];
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let read = f.read(&mut magic).unwrap_or(0);
            check_pdf_magic(&magic[..read], &path)?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(OcrError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(OcrError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, OcrError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| OcrError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            OcrError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            OcrError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(OcrError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = filename_from_url(url);
    let temp_dir = TempDir::new().map_err(|e| OcrError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response.bytes().await.map_err(|e| OcrError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    check_pdf_magic(&bytes, &file_path)?;

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| OcrError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Extract a reasonable filename from the final URL path segment.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }
    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn url_detection() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn filename_falls_back_when_url_has_no_file_segment() {
        assert_eq!(filename_from_url("https://example.com/a/scan.pdf"), "scan.pdf");
        assert_eq!(filename_from_url("https://example.com/"), "downloaded.pdf");
        assert_eq!(filename_from_url("https://example.com/docs"), "downloaded.pdf");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = resolve_input("/definitely/not/a/real/file.pdf", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn non_pdf_magic_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello, this is plain text").unwrap();
        let err = resolve_input(f.path().to_str().unwrap(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn file_shorter_than_magic_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%P").unwrap();
        let err = resolve_input(f.path().to_str().unwrap(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::NotAPdf { .. }), "got: {err}");
    }

    #[test]
    fn empty_bytes_fail_the_magic_check() {
        let err = check_pdf_magic(b"", Path::new("x.pdf")).unwrap_err();
        assert!(matches!(err, OcrError::NotAPdf { magic: [0, 0, 0, 0], .. }));
    }

    #[tokio::test]
    async fn pdf_magic_is_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.5\n...").unwrap();
        let resolved = resolve_input(f.path().to_str().unwrap(), 5).await.unwrap();
        assert_eq!(resolved.path(), f.path());
    }
}
