// Résumé text extraction from uploaded PDF bytes.
//
// The upload is written to a named temp file for `pdf-extract`; the file is
// removed when its guard drops, whichever way extraction ends.

use std::io::Write;

use bytes::Bytes;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Extracted text with fewer non-whitespace characters than this is rejected.
pub const MIN_RESUME_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ResumeTextError {
    #[error("uploaded file is empty")]
    EmptyUpload,

    #[error("failed to stage upload for extraction: {0}")]
    TempFile(#[from] std::io::Error),

    #[error("could not read PDF: {0}")]
    Unreadable(String),

    #[error("PDF contains too little text ({found} characters); is it a scanned image?")]
    TooLittleText { found: usize },
}

/// Accepts `application/pdf` uploads or files named `*.pdf`.
pub fn is_pdf_upload(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    let by_type = content_type
        .map(|ct| ct.trim().eq_ignore_ascii_case("application/pdf"))
        .unwrap_or(false);
    let by_name = file_name
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    by_type || by_name
}

/// Extracts plain text from PDF bytes on a blocking worker.
pub async fn extract_resume_text(data: Bytes) -> Result<String, ResumeTextError> {
    if data.is_empty() {
        return Err(ResumeTextError::EmptyUpload);
    }

    let text = tokio::task::spawn_blocking(move || extract_via_temp_file(&data))
        .await
        .map_err(|e| ResumeTextError::Unreadable(format!("extraction worker failed: {e}")))??;

    ensure_enough_text(text)
}

fn extract_via_temp_file(data: &[u8]) -> Result<String, ResumeTextError> {
    let mut staged = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".pdf")
        .tempfile()?;
    staged.write_all(data)?;
    staged.flush()?;
    debug!("Staged {} byte upload at {}", data.len(), staged.path().display());

    read_pdf(&staged)
}

fn read_pdf(staged: &NamedTempFile) -> Result<String, ResumeTextError> {
    pdf_extract::extract_text(staged.path()).map_err(|e| ResumeTextError::Unreadable(e.to_string()))
}

pub fn ensure_enough_text(text: String) -> Result<String, ResumeTextError> {
    let found = text.chars().filter(|c| !c.is_whitespace()).count();
    if found < MIN_RESUME_CHARS {
        return Err(ResumeTextError::TooLittleText { found });
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_upload_by_type_or_name() {
        assert!(is_pdf_upload(None, Some("application/pdf")));
        assert!(is_pdf_upload(Some("CV.PDF"), None));
        assert!(is_pdf_upload(Some("cv.pdf"), Some("application/octet-stream")));
        assert!(!is_pdf_upload(Some("cv.docx"), Some("application/msword")));
        assert!(!is_pdf_upload(None, None));
    }

    #[test]
    fn test_ensure_enough_text_rejects_short_text() {
        let err = ensure_enough_text("  Jane Doe \n Engineer  ".to_string()).unwrap_err();
        assert!(matches!(err, ResumeTextError::TooLittleText { found: 15 }));
    }

    #[test]
    fn test_ensure_enough_text_trims() {
        let body = "Experienced engineer with a decade of distributed systems work.";
        let text = ensure_enough_text(format!("\n\n{body}\n")).unwrap();
        assert_eq!(text, body);
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let err = extract_resume_text(Bytes::new()).await.unwrap_err();
        assert!(matches!(err, ResumeTextError::EmptyUpload));
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_are_unreadable() {
        let err = extract_resume_text(Bytes::from_static(b"this is not a pdf document"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResumeTextError::Unreadable(_)));
    }

    #[test]
    fn test_staged_file_is_removed_after_failed_read() {
        let staged = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        let path = staged.path().to_path_buf();
        assert!(read_pdf(&staged).is_err());
        drop(staged);
        assert!(!path.exists());
    }
}
