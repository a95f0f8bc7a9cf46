use super::ExtractError;

/// Extracts text page by page. Pages with no extractable text (scanned
/// images) are dropped; the rest are joined with a newline.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed documents instead of returning Err.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractError::Pdf("Unable to read the PDF document".to_string()))?
        .map_err(|e| ExtractError::Pdf(format!("Unable to read the PDF document: {e}")))?;

    Ok(join_text_pages(pages))
}

fn join_text_pages(pages: Vec<String>) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
