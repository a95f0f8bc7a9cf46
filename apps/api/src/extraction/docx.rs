use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
/// Ceiling on the inflated size of `word/document.xml`. Upload limits only
/// bound the compressed archive.
const MAX_DOCUMENT_XML_BYTES: u64 = 16 * 1024 * 1024;

/// Extracts paragraph text from `word/document.xml` inside the DOCX archive.
/// Paragraphs whose trimmed text is empty are skipped; the rest are joined
/// with a newline. Table cells are paragraphs too and are included.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    extract_with_limit(bytes, MAX_DOCUMENT_XML_BYTES)
}

fn extract_with_limit(bytes: &[u8], limit: u64) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(format!("Unable to read the DOCX document: {e}")))?;

    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| ExtractError::Docx(format!("Invalid DOCX: missing {DOCUMENT_PART}")))?;
    if part.size() > limit {
        return Err(too_large(limit));
    }

    // The declared size is not trusted; the read itself is capped too.
    let mut document_xml = String::new();
    part.take(limit + 1)
        .read_to_string(&mut document_xml)
        .map_err(|e| ExtractError::Docx(format!("Failed to read {DOCUMENT_PART}: {e}")))?;
    if document_xml.len() as u64 > limit {
        return Err(too_large(limit));
    }

    let paragraphs = paragraphs_from_xml(&document_xml)?;
    Ok(paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn too_large(limit: u64) -> ExtractError {
    ExtractError::Docx(format!(
        "{DOCUMENT_PART} expands beyond {limit} bytes; refusing to read it"
    ))
}

/// Walks the WordprocessingML body, collecting the run text of each
/// top-level `<w:p>`. Paragraphs nested inside another (text boxes) fold
/// into their parent.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if depth == 0 {
                        current.clear();
                    }
                    depth += 1;
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if depth > 0 {
                    match e.local_name().as_ref() {
                        b"tab" => current.push('\t'),
                        b"br" | b"cr" => current.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text && depth > 0 => {
                let text = e
                    .unescape()
                    .map_err(|e| ExtractError::Docx(format!("XML parse error: {e}")))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(format!("XML parse error: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
