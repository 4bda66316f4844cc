pub mod etl;
pub mod header_map;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod status;

pub use crate::domain::model::{CellValue, Employee, FieldValue, SheetData, UploadSummary};
pub use crate::domain::ports::{BulkUploader, ConfigProvider, EmployeeStore, Pipeline, Storage};
pub use crate::utils::error::Result;
