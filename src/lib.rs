//! # pdfocr
//!
//! OCR PDF documents page-by-page with a hosted vision language model and
//! assemble the results into a JSON report.
//!
//! Classic OCR stacks struggle with scans, handwriting, and mixed layouts;
//! a vision LLM reads the page as a human would. This crate owns the glue
//! around that call: sequential page iteration, bounded retry on failure,
//! and report assembly.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file, bytes, or URL
//!  ├─ 2. Pagecount  count pages via lopdf; zero pages fails fast
//!  ├─ 3. Per page   rasterise (pdfium) → base64 PNG → vision OCR call,
//!  │                strictly in page order, ≤ 3 attempts with a fixed delay
//!  └─ 4. Report     pages + naive token counts + synthetic timing, as JSON
//! ```
//!
//! A run is all-or-nothing: any page that exhausts its attempts aborts the
//! document and partial results are discarded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfocr::{process_document, OcrConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OcrConfig::builder()
//!         .credentials("api-key", "https://myresource.openai.azure.com", "2024-02-15-preview")
//!         .build()?;
//!     let report = process_document("document.pdf", &config).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfocr` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod prompts;
pub mod retry;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{AzureCredentials, OcrConfig, OcrConfigBuilder};
pub use engine::{AzureOcrEngine, OcrEngine};
pub use error::OcrError;
pub use output::{DocumentReport, ErrorReport, PageText, COMPLETION_TIME_PER_PAGE_MS};
pub use process::{page_count, process_bytes, process_document, process_to_file};
pub use progress::{NoopProgress, OcrProgress, ProgressHook};
