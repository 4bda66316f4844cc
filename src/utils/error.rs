use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Local store error: {0}")]
    StoreError(#[from] redb::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatusError { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Row {row}: {message}: {record}")]
    ValidationError {
        row: usize,
        message: String,
        record: String,
    },
}

/// 錯誤分類，對應使用者看到的狀態訊息種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Validation,
    Storage,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::SpreadsheetError(_) | EtlError::ProcessingError { .. } => {
                ErrorCategory::Parse
            }
            EtlError::ValidationError { .. } => ErrorCategory::Validation,
            EtlError::StoreError(_) => ErrorCategory::Storage,
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Network,
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_)
            | EtlError::TaskError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤可直接重試
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::HttpStatusError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            EtlError::TaskError(_) => ErrorSeverity::Critical,
            EtlError::StoreError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::SpreadsheetError(_) => {
                "Make sure the file is a valid .xlsx or .xls workbook and is not password protected"
            }
            EtlError::ProcessingError { .. } => {
                "Check that the first sheet has a header row followed by data rows"
            }
            EtlError::ValidationError { .. } => {
                "Fill in a numeric employee_id (사번) for every row, or use `save` to keep rows locally"
            }
            EtlError::StoreError(_) => {
                "Check that the store file is writable and not opened by another process"
            }
            EtlError::ApiError(_) => "Check network connectivity and the configured api.base_url",
            EtlError::HttpStatusError { status, .. } => match status {
                401 | 403 => "Check the session cookie or authorization header in [api.headers]",
                404 => "Check api.base_url and api.bulk_path",
                s if *s >= 500 => "The server failed to process the batch, try again later",
                _ => "Check the rejected records in the server response",
            },
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the file path exists and is accessible"
            }
            EtlError::SerializationError(_) => "The data could not be encoded as JSON",
            EtlError::TaskError(_) => "Internal error, re-run with -v for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Parse => format!("Parse error: {}", self),
            ErrorCategory::Validation => format!("Validation error: {}", self),
            ErrorCategory::Storage => format!("Local store error: {}", self),
            ErrorCategory::Network => format!("Upload failed: {}", self),
            ErrorCategory::Configuration => format!("Configuration error: {}", self),
            ErrorCategory::System => format!("Error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
