//! File storage backends for uploaded documents.
//!
//! `PortalState` holds an `Arc<dyn FileStorage>` chosen from config:
//! [`http::HttpFileStorage`] posts to the portal's upload endpoint,
//! [`s3::S3FileStorage`] writes straight to a bucket.

pub mod http;
pub mod s3;

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::PortalError;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A file picked by the user, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Reads a file from disk, inferring its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, PortalError> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, mime_type_for(path), Bytes::from(bytes)))
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MIME_TYPE,
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Stores a file under a logical key and returns its public URL.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(&self, key: &str, file: &FileUpload) -> Result<String, PortalError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_from_path_infers_pdf() {
        let mut tmp = tempfile::Builder::new().suffix(".PDF").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.7").unwrap();
        let file = FileUpload::from_path(tmp.path()).await.unwrap();
        assert_eq!(file.content_type, PDF_MIME_TYPE);
        assert_eq!(file.size(), 8);
        assert!(file.name.ends_with(".PDF"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileUpload::from_path(&dir.path().join("nope.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope.pdf"));
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        assert_eq!(mime_type_for(Path::new("resume")), "application/octet-stream");
        assert_eq!(
            mime_type_for(Path::new("resume.docx")),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }
}
