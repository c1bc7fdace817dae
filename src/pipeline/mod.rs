//! Pipeline stages for document OCR.
//!
//! Each submodule implements exactly one step, so each is independently
//! testable and a stage can be swapped (e.g. a different page counter)
//! without touching the others.
//!
//! ```text
//! input ──▶ pagecount ──▶ [per page: render ──▶ encode ──▶ OCR request]
//! (path/URL)  (lopdf)       (pdfium)   (base64 PNG)  (engine)
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local file
//! 2. [`pagecount`] — count pages via lopdf; runs in `spawn_blocking`
//! 3. [`render`]    — rasterise one page; pdfium is not async-safe, so this
//!    also runs in `spawn_blocking`
//! 4. [`encode`]    — PNG-encode and base64-wrap the page bitmap for the
//!    multimodal request body

pub mod encode;
pub mod input;
pub mod pagecount;
pub mod render;
