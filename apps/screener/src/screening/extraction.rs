//! Document text extraction: turns uploaded bytes into Unicode text.
//!
//! Sits in front of the ranking pipeline. Callers bound each call with a size
//! limit and a timeout; the pipeline only ever sees the resulting text, and
//! treats empty text as `ExtractionEmpty`.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, bytes: Bytes, filename: &str) -> Result<String, ExtractionError>;
}

/// Default extractor: plain text, PDF and DOCX.
pub struct DocumentExtractor;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DocumentKind {
    Text,
    Pdf,
    Docx,
}

fn document_kind(filename: &str) -> Result<DocumentKind, ExtractionError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "md" | "text" => Ok(DocumentKind::Text),
        "pdf" => Ok(DocumentKind::Pdf),
        "docx" => Ok(DocumentKind::Docx),
        other => Err(ExtractionError::Unsupported(if other.is_empty() {
            filename.to_string()
        } else {
            format!(".{other}")
        })),
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract_text(&self, bytes: Bytes, filename: &str) -> Result<String, ExtractionError> {
        match document_kind(filename)? {
            DocumentKind::Text => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            DocumentKind::Pdf => {
                // pdf parsing is CPU-bound
                tokio::task::spawn_blocking(move || {
                    pdf_extract::extract_text_from_mem(&bytes)
                        .map_err(|e| ExtractionError::Pdf(e.to_string()))
                })
                .await
                .map_err(|e| ExtractionError::Task(e.to_string()))?
            }
            DocumentKind::Docx => tokio::task::spawn_blocking(move || docx_text(&bytes))
                .await
                .map_err(|e| ExtractionError::Task(e.to_string()))?,
        }
    }
}

/// Body paragraphs of a Word document, one per line. Tables, headers and
/// footers are not read.
fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}
