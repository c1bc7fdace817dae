//! Report types: per-page text and the assembled document report.
//!
//! The JSON shape is fixed by downstream consumers:
//!
//! ```json
//! {
//!   "pages": [{"page": 1, "content": "…", "contentLength": 42}],
//!   "fileName": "contract",
//!   "inputTokens": 310,
//!   "outputTokens": 1843,
//!   "completionTime": 600
//! }
//! ```
//!
//! The token figures are deliberately naive: `inputTokens` counts
//! whitespace-delimited words and `outputTokens` counts characters, summed
//! across pages. They are rough size indicators, not tokenizer output.
//! `completionTime` is synthetic — a fixed per-page constant, not wall-clock
//! time. On failure the report is replaced wholesale by [`ErrorReport`].

use crate::error::OcrError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Synthetic per-page duration used for `completionTime`, in milliseconds.
pub const COMPLETION_TIME_PER_PAGE_MS: u64 = 200;

/// Extracted text for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    /// 1-based page number.
    pub page: usize,
    /// Text returned by the OCR engine, trimmed.
    pub content: String,
    /// Character count of `content` (characters, not bytes).
    pub content_length: usize,
}

impl PageText {
    /// Wrap OCR output for a page, deriving `content_length` from `content`.
    pub fn new(page: usize, content: impl Into<String>) -> Self {
        let content = content.into();
        let content_length = content.chars().count();
        Self {
            page,
            content,
            content_length,
        }
    }
}

/// The assembled whole-document report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    /// One entry per page, in ascending page order.
    pub pages: Vec<PageText>,
    /// Input basename, truncated at the first `.`.
    pub file_name: String,
    /// Sum of whitespace-delimited word counts across pages.
    pub input_tokens: u64,
    /// Sum of character counts across pages.
    pub output_tokens: u64,
    /// Synthetic duration estimate: page count × [`COMPLETION_TIME_PER_PAGE_MS`].
    pub completion_time: u64,
}

impl DocumentReport {
    /// Assemble the report from per-page results.
    ///
    /// `pages` must already be in ascending page order; the aggregator
    /// produces them that way.
    pub fn assemble(file_name: impl Into<String>, pages: Vec<PageText>) -> Self {
        let input_tokens = pages
            .iter()
            .map(|p| p.content.split_whitespace().count() as u64)
            .sum();
        let output_tokens = pages
            .iter()
            .map(|p| p.content.chars().count() as u64)
            .sum();
        let completion_time = pages.len() as u64 * COMPLETION_TIME_PER_PAGE_MS;

        Self {
            pages,
            file_name: file_name.into(),
            input_tokens,
            output_tokens,
            completion_time,
        }
    }
}

/// The failure report: a single `error` key, replacing the document report
/// entirely. No partial page data is ever attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl From<&OcrError> for ErrorReport {
    fn from(e: &OcrError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

/// Derive the report's `fileName` from a path: basename, truncated at the
/// first `.` (so `report.v2.pdf` becomes `report`, matching the historical
/// behaviour consumers depend on).
pub fn file_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn page_text_counts_chars_not_bytes() {
        let p = PageText::new(1, "héllo");
        assert_eq!(p.content_length, 5);
        assert_eq!(p.content.len(), 6); // UTF-8 bytes, for contrast
    }

    #[test]
    fn assemble_sums_words_and_chars() {
        // Pages "A B" and "C": 2 + 1 words, 3 + 1 chars.
        let pages = vec![PageText::new(1, "A B"), PageText::new(2, "C")];
        let report = DocumentReport::assemble("doc", pages);
        assert_eq!(report.input_tokens, 3);
        assert_eq!(report.output_tokens, 4);
        assert_eq!(report.completion_time, 2 * COMPLETION_TIME_PER_PAGE_MS);
    }

    #[test]
    fn assemble_empty_page_list() {
        let report = DocumentReport::assemble("doc", vec![]);
        assert_eq!(report.input_tokens, 0);
        assert_eq!(report.output_tokens, 0);
        assert_eq!(report.completion_time, 0);
        assert!(report.pages.is_empty());
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let report = DocumentReport::assemble("scan", vec![PageText::new(1, "hello world")]);
        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["pages", "fileName", "inputTokens", "outputTokens", "completionTime"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        let page = &value["pages"][0];
        assert_eq!(page["page"], 1);
        assert_eq!(page["content"], "hello world");
        assert_eq!(page["contentLength"], 11);
    }

    #[test]
    fn error_report_has_single_key() {
        let e = OcrError::EmptyDocument {
            path: PathBuf::from("x.pdf"),
        };
        let value = serde_json::to_value(ErrorReport::from(&e)).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj["error"].as_str().unwrap().contains("No pages"));
    }

    #[test]
    fn file_label_truncates_at_first_dot() {
        assert_eq!(file_label(Path::new("/tmp/report.v2.pdf")), "report");
        assert_eq!(file_label(Path::new("scan.pdf")), "scan");
        assert_eq!(file_label(Path::new("noext")), "noext");
    }
}
