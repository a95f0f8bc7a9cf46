//! Document Text Extractor: turns an uploaded resume into plain text.
//!
//! Only PDF and DOCX are accepted. Every failure is absorbed here: the caller
//! always gets a string (empty on failure) plus a notice explaining why.
//! An empty string means "skip skill extraction".

pub mod docx;
pub mod pdf;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::outcome::{Notice, NoticeKind, Staged};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    Pdf(String),

    #[error("{0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Case-insensitive match on the declared extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    fn parse(self, bytes: &[u8]) -> Result<String, ExtractError> {
        match self {
            DocumentFormat::Pdf => pdf::extract_pdf_text(bytes),
            DocumentFormat::Docx => docx::extract_docx_text(bytes),
        }
    }
}

/// An upload as received: raw bytes and the extension taken from its filename.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Bytes,
    pub extension: String,
}

impl UploadedDocument {
    pub fn from_filename(filename: &str, bytes: Bytes) -> Self {
        Self {
            bytes,
            extension: extension_of(filename),
        }
    }
}

/// Everything after the last `.`, lower-cased. A name without a dot yields itself.
pub fn extension_of(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Extracts text synchronously on the current thread.
pub fn extract(document: &UploadedDocument) -> Staged<String> {
    let Some(format) = DocumentFormat::from_extension(&document.extension) else {
        return unsupported(&document.extension);
    };
    finish(format, format.parse(&document.bytes))
}

/// Extracts text on the blocking pool. Parsing is CPU-bound, and a panic
/// inside a parser surfaces as an extraction failure rather than a crash.
pub async fn extract_in_background(document: UploadedDocument) -> Staged<String> {
    tokio::task::spawn_blocking(move || extract(&document))
        .await
        .unwrap_or_else(|e| {
            warn!("Extraction task aborted: {e}");
            Staged::degraded(
                String::new(),
                Notice::new(
                    NoticeKind::ExtractionFailure,
                    format!("Error extracting text from file: {e}"),
                ),
            )
        })
}

fn unsupported(extension: &str) -> Staged<String> {
    warn!("Rejected upload with unsupported extension '{extension}'");
    Staged::degraded(
        String::new(),
        Notice::new(
            NoticeKind::UnsupportedFormat,
            "Unsupported file format. Please upload a PDF or DOCX file.",
        ),
    )
}

fn finish(format: DocumentFormat, result: Result<String, ExtractError>) -> Staged<String> {
    match result {
        Ok(text) if text.trim().is_empty() => {
            warn!("{format:?} upload produced no extractable text");
            Staged::degraded(
                String::new(),
                Notice::new(
                    NoticeKind::EmptyExtraction,
                    "No text could be extracted from the uploaded file.",
                ),
            )
        }
        Ok(text) => {
            info!("Extracted {} characters from {format:?} upload", text.len());
            Staged::ok(text)
        }
        Err(e) => {
            warn!("{format:?} extraction failed: {e}");
            Staged::degraded(
                String::new(),
                Notice::new(
                    NoticeKind::ExtractionFailure,
                    format!("Error extracting text from file: {e}"),
                ),
            )
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;

    /// Builds a minimal DOCX whose body holds one `<w:p>` per paragraph.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| {
                if p.is_empty() {
                    "<w:p/>".to_string()
                } else {
                    format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#)
                }
            })
            .collect();
        docx_with_body(&body)
    }

    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Builds a PDF with one page per entry; `None` produces a page with an
    /// empty content stream (what a scanned, image-only page looks like to a
    /// text extractor).
    pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
