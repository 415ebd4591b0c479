//! PDF text extraction for uploaded lab reports.
//!
//! Per-page text is concatenated in page order with no separators. Parse
//! failures come back as [`AssistantError::PdfRead`], whose rendered
//! message keeps the "Error reading PDF: " prefix clients display.

use crate::error::{AssistantError, Result};

pub fn extract_text(pdf_bytes: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| AssistantError::PdfRead(e.to_string()))?;
    Ok(pages.concat())
}
