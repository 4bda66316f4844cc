use crate::domain::model::UploadSummary;
use crate::utils::error::{ErrorCategory, EtlError};
use std::fmt;

/// Outcome line shown to the user after every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Parsed { count: usize },
    Saved { count: usize },
    Reloaded { count: usize },
    Cleared,
    Uploaded {
        created: u64,
        updated: u64,
        errors: usize,
    },
    NothingToUpload,
    ParseFailed(String),
    UploadFailed(String),
    StoreFailed(String),
    Failed(String),
}

impl Status {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Status::ParseFailed(_)
                | Status::UploadFailed(_)
                | Status::StoreFailed(_)
                | Status::Failed(_)
        )
    }

    /// 依錯誤類別轉成對應的失敗狀態
    pub fn from_error(error: &EtlError) -> Self {
        match error.category() {
            ErrorCategory::Network => Status::UploadFailed(error.to_string()),
            ErrorCategory::Storage => Status::StoreFailed(error.to_string()),
            ErrorCategory::Parse | ErrorCategory::Validation => {
                Status::ParseFailed(error.to_string())
            }
            ErrorCategory::Configuration | ErrorCategory::System => {
                Status::Failed(error.to_string())
            }
        }
    }
}

impl From<&UploadSummary> for Status {
    fn from(summary: &UploadSummary) -> Self {
        Status::Uploaded {
            created: summary.created,
            updated: summary.updated,
            errors: summary.errors.len(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Parsed { count } => write!(f, "Parsed file: {} rows", count),
            Status::Saved { count } => write!(f, "Saved {} records to local store", count),
            Status::Reloaded { count } => {
                write!(f, "Reloaded {} records from local store", count)
            }
            Status::Cleared => write!(f, "Local store cleared"),
            Status::Uploaded {
                created,
                updated,
                errors,
            } => {
                write!(f, "Upload complete: {} created, {} updated", created, updated)?;
                if *errors > 0 {
                    write!(f, ", {} errors reported", errors)?;
                }
                Ok(())
            }
            Status::NothingToUpload => write!(f, "Nothing to upload: no employee rows found"),
            Status::ParseFailed(message) => write!(f, "Parse error: {}", message),
            Status::UploadFailed(message) => write!(f, "Upload failed: {}", message),
            Status::StoreFailed(message) => write!(f, "Local store error: {}", message),
            Status::Failed(message) => write!(f, "Error: {}", message),
        }
    }
}
