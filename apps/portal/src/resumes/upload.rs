use thiserror::Error;
use tracing::debug;

use crate::storage::{FileUpload, PDF_MIME_TYPE};

/// Why a dropped file was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("Resume cannot be empty!")]
    NoFile,

    #[error("Please upload only one file.")]
    TooManyFiles(usize),

    #[error("Only PDF files are accepted.")]
    WrongType(String),

    #[error("Please upload a PDF file that is less than {}MB.", megabytes(.limit))]
    TooLarge { size: u64, limit: u64 },
}

fn megabytes(bytes: &u64) -> String {
    let bytes = *bytes;
    if bytes % 1_000_000 == 0 {
        (bytes / 1_000_000).to_string()
    } else {
        format!("{:.1}", bytes as f64 / 1_000_000.0)
    }
}

/// Accepts exactly one PDF of at most `max_bytes`.
pub fn check_resume_file(
    mut files: Vec<FileUpload>,
    max_bytes: u64,
) -> Result<FileUpload, FileRejection> {
    let file = match files.len() {
        0 => return Err(FileRejection::NoFile),
        1 => files.remove(0),
        n => return Err(FileRejection::TooManyFiles(n)),
    };

    if !file.content_type.eq_ignore_ascii_case(PDF_MIME_TYPE) {
        debug!("Rejected {} ({})", file.name, file.content_type);
        return Err(FileRejection::WrongType(file.content_type));
    }
    if file.size() > max_bytes {
        debug!("Rejected {} ({} bytes)", file.name, file.size());
        return Err(FileRejection::TooLarge {
            size: file.size(),
            limit: max_bytes,
        });
    }
    Ok(file)
}
