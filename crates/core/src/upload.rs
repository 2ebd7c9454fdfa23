//! File upload contract used by `file` questions and file columns of
//! repeatable rows. The stored answer is the public URL the uploader returns.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.-]").expect("valid regex"));

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("이미지 또는 PDF 파일만 업로드 가능합니다. ({0})")]
    UnsupportedType(String),

    #[error("파일이 너무 큽니다. ({size} > {max} bytes)")]
    TooLarge { size: usize, max: usize },

    /// Storage backend failure; the client may retry.
    #[error("파일 업로드에 실패했습니다: {0}")]
    Transient(String),
}

/// Stores bytes and returns a public URL.
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, UploadError>;
}

/// Accept `image/*` and PDF up to `max_bytes`.
pub fn check_upload(content_type: &str, size: usize, max_bytes: usize) -> Result<(), UploadError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !(mime.starts_with("image/") || mime == PDF_CONTENT_TYPE) {
        return Err(UploadError::UnsupportedType(content_type.to_string()));
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            max: max_bytes,
        });
    }
    Ok(())
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    UNSAFE_NAME_CHARS.replace_all(name, "_").into_owned()
}

/// Storage name for an upload: millisecond timestamp plus the sanitized
/// original name.
pub fn stored_file_name(original: &str, timestamp_millis: i64) -> String {
    format!("{timestamp_millis}_{}", sanitize_file_name(original))
}
