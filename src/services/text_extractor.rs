use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::models::domain::{ContentType, UploadedFile};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("error reading PDF: {0}")]
    MalformedPdf(String),

    #[error("error reading text file: {0}")]
    InvalidUtf8(String),

    #[error("document contains no extractable text")]
    NoText,

    #[error("extraction task failed: {0}")]
    TaskFailed(String),
}

/// Converts an uploaded file into one string. PDF parsing is CPU-bound, so it
/// runs on the blocking pool.
pub async fn extract_text(upload: &UploadedFile) -> Result<String, ExtractionError> {
    let text = match upload.content_type {
        ContentType::Text => decode_utf8(&upload.bytes)?,
        ContentType::Pdf => {
            let bytes = upload.bytes.clone();
            tokio::task::spawn_blocking(move || extract_pdf(&bytes))
                .await
                .map_err(|e| ExtractionError::TaskFailed(e.to_string()))??
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }

    log::info!(
        "Extracted {} characters from '{}' ({})",
        text.chars().count(),
        upload.filename,
        upload.content_type.as_mime()
    );

    Ok(text)
}

/// Picks the extraction route from the upload's content type, falling back to
/// the filename extension when the client sent no useful type.
pub fn detect_content_type(
    content_type: Option<&str>,
    filename: &str,
) -> Result<ContentType, ExtractionError> {
    let declared = content_type
        .map(str::trim)
        .filter(|mime| !mime.is_empty() && !mime.starts_with("application/octet-stream"));

    match declared {
        Some(mime) => ContentType::from_mime(mime)
            .ok_or_else(|| ExtractionError::UnsupportedContentType(mime.to_string())),
        None => ContentType::from_filename(filename).ok_or_else(|| {
            ExtractionError::UnsupportedContentType(format!(
                "cannot determine type of '{}'",
                filename
            ))
        }),
    }
}

pub fn decode_utf8(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::InvalidUtf8(e.to_string()))
}

/// Page texts each followed by a newline. A page without text leaves an empty line.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = extract_pages(bytes)?;
    Ok(join_pages(&pages))
}

pub fn join_pages(pages: &[String]) -> String {
    let capacity = pages.iter().map(|p| p.len() + 1).sum();
    pages
        .iter()
        .fold(String::with_capacity(capacity), |mut text, page| {
            text.push_str(page);
            text.push('\n');
            text
        })
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    // pdf-extract panics on some malformed inputs
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::MalformedPdf(e.to_string())),
        Err(_) => Err(ExtractionError::MalformedPdf(
            "PDF parser aborted on a malformed document".to_string(),
        )),
    }
}
