//! Whole-document processing: sequential page iteration and report assembly.
//!
//! Pages go through the engine strictly one at a time, in ascending order:
//! a page must finish (success or exhausted retries) before the next
//! starts, and an exhausted page aborts the run — partial results are
//! discarded, never returned. The only suspension points are the retry
//! delay and the awaited OCR response.

use crate::config::OcrConfig;
use crate::engine::{AzureOcrEngine, OcrEngine};
use crate::error::OcrError;
use crate::output::{file_label, DocumentReport, PageText};
use crate::pipeline::{input, pagecount};
use crate::retry;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// OCR a PDF file or URL into a [`DocumentReport`].
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — local file path or HTTP/HTTPS URL to a PDF
/// * `config` — run configuration
///
/// # Errors
/// Returns `Err(OcrError)` when processing is refused (missing credentials,
/// unreadable input), the document has no pages, or any single page
/// exhausts its retry attempts. There is no partial-success output.
pub async fn process_document(
    input_str: impl AsRef<str>,
    config: &OcrConfig,
) -> Result<DocumentReport, OcrError> {
    let input_str = input_str.as_ref();
    info!("Starting OCR run: {}", input_str);

    let engine = resolve_engine(config)?;
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path();

    process_resolved(pdf_path, engine.as_ref(), config).await
}

/// OCR in-memory PDF bytes into a [`DocumentReport`].
///
/// The bytes must start with the `%PDF` magic, same as file and URL
/// inputs. They are written once to a managed temp file before processing
/// begins and are not touched again; the file is removed on return.
/// `name` supplies the report's `fileName` (truncated at the first `.`),
/// since the temp path is meaningless to the caller.
pub async fn process_bytes(
    bytes: &[u8],
    name: &str,
    config: &OcrConfig,
) -> Result<DocumentReport, OcrError> {
    let engine = resolve_engine(config)?;
    input::check_pdf_magic(bytes, Path::new(name))?;

    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| OcrError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| OcrError::Internal(format!("tempfile write: {e}")))?;

    let report = process_resolved(tmp.path(), engine.as_ref(), config).await?;
    Ok(DocumentReport {
        file_name: file_label(Path::new(name)),
        ..report
    })
}

/// OCR a PDF and write the JSON report to a file.
///
/// Uses atomic write (temp file + rename) so a crash cannot leave a
/// half-written report. Nothing is written when processing fails.
pub async fn process_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &OcrConfig,
) -> Result<DocumentReport, OcrError> {
    let report = process_document(input_str, config).await?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| OcrError::Internal(format!("report serialisation: {e}")))?;
    write_json(output_path.as_ref(), &json).await?;
    Ok(report)
}

/// Write a JSON string to `path` atomically (temp file + rename).
pub async fn write_json(path: &Path, json: &str) -> Result<(), OcrError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OcrError::OutputWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json)
        .await
        .map_err(|e| OcrError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| OcrError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Count the pages of a PDF file or URL without running any OCR.
///
/// Needs no credentials.
pub async fn page_count(input_str: impl AsRef<str>) -> Result<usize, OcrError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120).await?;
    pagecount::count_pages(resolved.path()).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Pick the engine: an injected one wins, otherwise build the Azure engine
/// from credentials. Refuses the run before any call when neither is
/// available.
fn resolve_engine(config: &OcrConfig) -> Result<Arc<dyn OcrEngine>, OcrError> {
    if let Some(ref engine) = config.engine {
        return Ok(Arc::clone(engine));
    }
    Ok(Arc::new(AzureOcrEngine::from_config(config)?))
}

/// Sequential page loop over an already-resolved local file.
async fn process_resolved(
    pdf_path: &Path,
    engine: &dyn OcrEngine,
    config: &OcrConfig,
) -> Result<DocumentReport, OcrError> {
    // A read failure is reported and treated as an empty document rather
    // than a distinct error: either way there is nothing to OCR.
    let total_pages = match pagecount::count_pages(pdf_path).await {
        Ok(n) => n,
        Err(e) => {
            warn!("Could not determine page count: {e}");
            0
        }
    };
    if total_pages == 0 {
        return Err(OcrError::EmptyDocument {
            path: pdf_path.to_path_buf(),
        });
    }
    info!("PDF has {} pages", total_pages);

    if let Some(ref hook) = config.progress {
        hook.on_document_start(total_pages);
    }

    let mut pages = Vec::with_capacity(total_pages);
    for page in 1..=total_pages {
        if let Some(ref hook) = config.progress {
            hook.on_page_start(page, total_pages);
        }

        let result = retry::with_attempts(config.max_attempts, config.retry_delay, |attempt| {
            if attempt > 1 {
                if let Some(ref hook) = config.progress {
                    hook.on_page_retry(page, attempt, config.max_attempts);
                }
            }
            engine.ocr_page(pdf_path, page)
        })
        .await;

        let content = match result {
            Ok(text) => text,
            Err(e) => {
                if let Some(ref hook) = config.progress {
                    hook.on_page_failed(page, &e.to_string());
                }
                // Everything extracted so far is dropped with `pages`.
                return Err(OcrError::PageFailed {
                    page,
                    attempts: config.max_attempts,
                    detail: e.to_string(),
                });
            }
        };

        let page_text = PageText::new(page, content);
        if let Some(ref hook) = config.progress {
            hook.on_page_done(page, total_pages, page_text.content_length);
        }
        pages.push(page_text);
    }

    if let Some(ref hook) = config.progress {
        hook.on_document_done(total_pages);
    }

    let report = DocumentReport::assemble(file_label(pdf_path), pages);
    info!(
        "OCR complete: {} pages, {} words in, {} chars out",
        report.pages.len(),
        report.input_tokens,
        report.output_tokens
    );
    Ok(report)
}
